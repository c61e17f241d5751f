//! # CSP Information

use tracing::instrument;

use crate::Result;
use crate::certificate::CspInfo;
use crate::error::{Error, describe};
use crate::facade::SigningFacade;
use crate::provider::{About, CryptoProvider, ObjectType};

impl<P: CryptoProvider> SigningFacade<P> {
    /// Query the version and name of the installed CSP.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProviderQueryFailed`] if the about object cannot be
    /// created or queried.
    #[instrument(level = "debug", skip(self))]
    pub async fn check_csp(&self) -> Result<CspInfo> {
        let about = self
            .provider
            .create_about()
            .await
            .map_err(failed(&format!("failed to create {}", ObjectType::About)))?;

        Ok(CspInfo {
            version: about.csp_version().await.map_err(failed("failed to read CSP version"))?,
            name: about.csp_name().await.map_err(failed("failed to read CSP name"))?,
        })
    }
}

fn failed(context: &str) -> impl FnOnce(anyhow::Error) -> Error + '_ {
    move |e| {
        tracing::error!("{context}: {e:#}");
        Error::ProviderQueryFailed(describe(context, &e))
    }
}
