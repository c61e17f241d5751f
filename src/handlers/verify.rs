//! # Verification
//!
//! Verifies detached CAdES signatures. Verification failure of any kind,
//! including provider errors, is reported as [`Verification::Invalid`]
//! rather than as an error.

use base64ct::{Base64, Encoding as _};
use tracing::instrument;

use crate::certificate::{SignatureInfo, Verification};
use crate::facade::SigningFacade;
use crate::input::Encoding;
use crate::provider::{self, ContentEncoding, CryptoProvider, SignedData};

impl<P: CryptoProvider> SigningFacade<P> {
    /// Verify `signature` over `data`. With [`Encoding::Base64`] the data is
    /// passed through unchanged; with [`Encoding::Text`] it is base64-encoded
    /// first.
    ///
    /// Returns the signers, in provider-reported order, when the signature is
    /// valid.
    #[instrument(level = "debug", skip_all)]
    pub async fn verify(
        &self, data: &str, signature: &str, encoding: Encoding,
    ) -> Verification<P::Certificate> {
        match self.signers(data, signature, encoding).await {
            Ok(signers) => {
                tracing::debug!("verify: {} signers", signers.len());
                Verification::Valid(signers)
            }
            Err(e) => {
                tracing::warn!("verify failed: {e:#}");
                Verification::Invalid
            }
        }
    }

    async fn signers(
        &self, data: &str, signature: &str, encoding: Encoding,
    ) -> provider::Result<Vec<SignatureInfo<P::Certificate>>> {
        let content = match encoding {
            Encoding::Text => Base64::encode_string(data.as_bytes()),
            Encoding::Base64 => data.to_string(),
        };

        let mut signed_data = self.provider.create_signed_data().await?;
        signed_data.set_content_encoding(ContentEncoding::Base64ToBinary).await?;
        signed_data.set_content(content).await?;

        tracing::debug!("verify::verify_cades");
        signed_data
            .verify_cades(signature, self.options.signature_type, self.options.detached)
            .await?;

        let mut signers = vec![];
        for signer in provider::items(&signed_data.signers().await?).await? {
            signers.push(SignatureInfo::from_provider(&signer).await?);
        }
        Ok(signers)
    }
}
