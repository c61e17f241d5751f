//! # Signing
//!
//! Creates detached CAdES signatures over text payloads and files. Files are
//! fully buffered and signed as base64 content.

use base64ct::{Base64, Encoding as _};
use futures::future::try_join_all;
use tracing::instrument;

use crate::Result;
use crate::certificate::Certificate;
use crate::error::{Error, describe};
use crate::facade::SigningFacade;
use crate::input::{Encoding, FileSource, SignInput, Signed};
use crate::provider::{ContentEncoding, CryptoProvider, ObjectType, SignedData, Signer};

impl<P: CryptoProvider> SigningFacade<P> {
    /// Sign `input` with `certificate`, routing on the input variant: text
    /// to [`Self::sign_string`], a single file to [`Self::sign_file`], and a
    /// batch of files to [`Self::sign_file_list`].
    ///
    /// # Errors
    ///
    /// Returns the error of the operation the input was routed to.
    #[instrument(level = "debug", skip_all, fields(thumbprint = %certificate.thumbprint))]
    pub async fn sign(
        &self, certificate: &Certificate<P::Certificate>, input: SignInput,
    ) -> Result<Signed> {
        match input {
            SignInput::Text(text) => {
                tracing::debug!("sign: text");
                self.sign_string(certificate, &text, Encoding::Text).await.map(Signed::Single)
            }
            SignInput::File(file) => {
                tracing::debug!("sign: file {}", file.name());
                self.sign_file(certificate, &file).await.map(Signed::Single)
            }
            SignInput::Files(files) => {
                tracing::debug!("sign: {} files", files.len());
                self.sign_file_list(certificate, &files).await.map(Signed::Batch)
            }
        }
    }

    /// Create a detached signature over `data`. With [`Encoding::Text`] the
    /// data is base64-encoded first; with [`Encoding::Base64`] it is passed
    /// through unchanged.
    ///
    /// Returns the provider's signature blob, typically base64-encoded CMS.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SigningFailed`] if the provider rejects any step, for
    /// example when the private key is inaccessible or the user cancels the
    /// PIN prompt.
    #[instrument(level = "debug", skip_all, fields(thumbprint = %certificate.thumbprint))]
    pub async fn sign_string(
        &self, certificate: &Certificate<P::Certificate>, data: &str, encoding: Encoding,
    ) -> Result<String> {
        let content = match encoding {
            Encoding::Text => Base64::encode_string(data.as_bytes()),
            Encoding::Base64 => data.to_string(),
        };

        let mut signer = self
            .provider
            .create_signer()
            .await
            .map_err(failed(&format!("failed to create {}", ObjectType::Signer)))?;
        signer
            .set_certificate(certificate.handle())
            .await
            .map_err(failed("failed to set certificate"))?;
        signer.set_options(self.options.chain).await.map_err(failed("failed to set chain option"))?;

        let mut signed_data = self
            .provider
            .create_signed_data()
            .await
            .map_err(failed(&format!("failed to create {}", ObjectType::SignedData)))?;
        signed_data
            .set_content_encoding(ContentEncoding::Base64ToBinary)
            .await
            .map_err(failed("failed to set content encoding"))?;
        signed_data.set_content(content).await.map_err(failed("failed to set content"))?;

        tracing::debug!("sign_string::sign_cades");
        signed_data
            .sign_cades(&signer, self.options.signature_type, self.options.detached)
            .await
            .map_err(failed("sign failed"))
    }

    /// Create a detached signature over the content of `file`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileReadFailed`] if the file cannot be buffered, or
    /// [`Error::SigningFailed`] if the provider rejects signing.
    #[instrument(level = "debug", skip_all, fields(file = %file.name()))]
    pub async fn sign_file(
        &self, certificate: &Certificate<P::Certificate>, file: &FileSource,
    ) -> Result<String> {
        let content = file.read_base64().await.inspect_err(|e| {
            tracing::error!("failed to read {}: {e}", file.name());
        })?;
        self.sign_string(certificate, &content, Encoding::Base64).await
    }

    /// Sign every file in `files` concurrently. Signatures are returned in
    /// input order.
    ///
    /// # Errors
    ///
    /// Fails as a whole if any single file fails to sign; no partial results
    /// are returned.
    #[instrument(level = "debug", skip_all, fields(files = files.len()))]
    pub async fn sign_file_list(
        &self, certificate: &Certificate<P::Certificate>, files: &[FileSource],
    ) -> Result<Vec<String>> {
        try_join_all(files.iter().map(|file| self.sign_file(certificate, file))).await
    }
}

fn failed(context: &str) -> impl FnOnce(anyhow::Error) -> Error + '_ {
    move |e| {
        tracing::error!("{context}: {e:#}");
        Error::SigningFailed(describe(context, &e))
    }
}
