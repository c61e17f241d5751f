//! # Certificate Listing
//!
//! Lists the time-valid certificates of a system store. The store is a
//! scoped resource: once opened, it is closed exactly once before the
//! operation returns, whether or not enumeration succeeded.

use tracing::instrument;

use crate::Result;
use crate::certificate::Certificate;
use crate::error::{Error, describe};
use crate::facade::SigningFacade;
use crate::options::StoreParams;
use crate::provider::{self, Certificates, CryptoProvider, FindCriteria, ObjectType, Store};

impl<P: CryptoProvider> SigningFacade<P> {
    /// List the certificates in a store that are currently within their
    /// validity period. When `store` is `None`, the store configured in
    /// [`crate::Options`] is used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreAccessFailed`] if the store cannot be created,
    /// opened, enumerated, or closed. Enumeration errors are returned after
    /// the store has been closed.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_certificates(
        &self, store: Option<&StoreParams>,
    ) -> Result<Vec<Certificate<P::Certificate>>> {
        let params = store.unwrap_or(&self.options.store);

        let mut store = self
            .provider
            .create_store()
            .await
            .map_err(failed(&format!("failed to create {}", ObjectType::Store)))?;
        store
            .open(params.location, &params.name, params.mode)
            .await
            .map_err(failed(&format!("failed to open store {}", params.name)))?;

        let listed = time_valid(&store).await;
        let closed = store.close().await;

        let certificates = listed.map_err(failed("failed to enumerate certificates"))?;
        closed.map_err(failed(&format!("failed to close store {}", params.name)))?;

        tracing::debug!("get_certificates: {} certificates", certificates.len());
        Ok(certificates)
    }
}

async fn time_valid<S: Store>(store: &S) -> provider::Result<Vec<Certificate<S::Certificate>>> {
    tracing::debug!("get_certificates::time_valid");

    let valid = store.certificates().await?.find(FindCriteria::TimeValid).await?;

    let mut certificates = vec![];
    for handle in provider::items(&valid).await? {
        certificates.push(Certificate::from_provider(handle).await?);
    }
    Ok(certificates)
}

fn failed(context: &str) -> impl FnOnce(anyhow::Error) -> Error + '_ {
    move |e| {
        tracing::error!("{context}: {e:#}");
        Error::StoreAccessFailed(describe(context, &e))
    }
}
