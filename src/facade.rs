//! # Signing Facade
//!
//! `SigningFacade` surfaces certificate listing, signing, and verification
//! over an injected [`CryptoProvider`]. Operation handlers live in the
//! `handlers` module; this module holds construction and initialization.

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::Result;
use crate::error::{Error, describe};
use crate::options::Options;
use crate::provider::{CryptoProvider, ObjectType};

/// The signing facade.
///
/// The facade holds no mutable state, so a single instance can serve
/// concurrent callers. Provider objects are created per operation and never
/// shared between calls.
#[derive(Clone, Debug)]
pub struct SigningFacade<P> {
    pub(crate) provider: P,
    pub(crate) options: Options,
}

/// Proof that the provider activated and answered the activation probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Readiness {
    /// When the probe succeeded.
    pub activated_at: DateTime<Utc>,
}

impl<P: CryptoProvider> SigningFacade<P> {
    /// Create a facade with default [`Options`].
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, Options::default())
    }

    /// Create a facade with the provided options.
    #[must_use]
    pub const fn with_options(provider: P, options: Options) -> Self {
        Self { provider, options }
    }

    /// The injected provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The facade's options.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Wait for the provider to activate, then probe it by creating a store
    /// object.
    ///
    /// A failed attempt is terminal for that attempt only: `init` can be
    /// called again. Must be called from within a Tokio runtime, which
    /// supplies the activation timer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProviderUnavailable`] if the provider fails to
    /// activate, does not activate within the configured timeout, or the
    /// probe fails.
    #[instrument(level = "debug", skip(self))]
    pub async fn init(&self) -> Result<Readiness> {
        let timeout = self.options.activation_timeout();

        match tokio::time::timeout(timeout, self.provider.activated()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!("provider failed to activate: {e:#}");
                let detail = describe("provider failed to activate", &e);
                return Err(Error::ProviderUnavailable(detail));
            }
            Err(_) => {
                tracing::error!("provider not activated within {timeout:?}");
                return Err(Error::ProviderUnavailable(format!(
                    "provider not activated within {timeout:?}"
                )));
            }
        }

        tracing::debug!("init::probe");
        if let Err(e) = self.provider.create_store().await {
            tracing::error!("probe failed creating {}: {e:#}", ObjectType::Store);
            return Err(Error::ProviderUnavailable(describe(
                &format!("probe failed creating {}", ObjectType::Store),
                &e,
            )));
        }

        Ok(Readiness {
            activated_at: Utc::now(),
        })
    }
}
