//! # Options
//!
//! Facade configuration. Every field has a default matching the plugin's
//! conventional settings, so `Options::default()` is usable as is and
//! partial configuration can be deserialized.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::provider::{ChainOption, OpenMode, SignatureType, StoreLocation};

/// Name of the personal certificate store.
pub const MY_STORE: &str = "My";

/// Default time allowed for the provider to activate.
pub const DEFAULT_ACTIVATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Facade configuration.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Store opened by `get_certificates` when none is specified.
    pub store: StoreParams,

    /// Chain embedding for new signatures.
    pub chain: ChainOption,

    /// Signature type used to sign and verify.
    pub signature_type: SignatureType,

    /// Whether signatures are detached from the signed content.
    pub detached: bool,

    /// Milliseconds to wait for the provider to activate during `init`.
    pub activation_timeout_ms: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            store: StoreParams::default(),
            chain: ChainOption::WholeChain,
            signature_type: SignatureType::CadesBes,
            detached: true,
            activation_timeout_ms: u64::try_from(DEFAULT_ACTIVATION_TIMEOUT.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

impl Options {
    /// Time allowed for the provider to activate.
    #[must_use]
    pub const fn activation_timeout(&self) -> Duration {
        Duration::from_millis(self.activation_timeout_ms)
    }

    /// Set the activation timeout.
    #[must_use]
    pub fn with_activation_timeout(mut self, timeout: Duration) -> Self {
        self.activation_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the default store.
    #[must_use]
    pub fn with_store(mut self, store: StoreParams) -> Self {
        self.store = store;
        self
    }
}

/// Parameters used to open a certificate store.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreParams {
    /// Store location.
    pub location: StoreLocation,

    /// System store name.
    pub name: String,

    /// Open mode.
    pub mode: OpenMode,
}

impl Default for StoreParams {
    fn default() -> Self {
        Self {
            location: StoreLocation::CurrentUser,
            name: MY_STORE.into(),
            mode: OpenMode::MaximumAllowed,
        }
    }
}

impl StoreParams {
    /// Parameters for the named store at `location`, opened with the highest
    /// permitted access.
    #[must_use]
    pub fn new(location: StoreLocation, name: impl Into<String>) -> Self {
        Self {
            location,
            name: name.into(),
            mode: OpenMode::MaximumAllowed,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(options.store.name, "My");
        assert_eq!(options.store.location, StoreLocation::CurrentUser);
        assert_eq!(options.store.mode, OpenMode::MaximumAllowed);
        assert_eq!(options.chain, ChainOption::WholeChain);
        assert!(options.detached);
        assert_eq!(options.activation_timeout(), DEFAULT_ACTIVATION_TIMEOUT);
    }

    // Partial configuration falls back to defaults.
    #[test]
    fn partial() {
        let options: Options = serde_json::from_value(json!({
            "store": {"location": "localMachine"},
            "activationTimeoutMs": 250
        }))
        .expect("should deserialize");

        assert_eq!(options.store.location, StoreLocation::LocalMachine);
        assert_eq!(options.store.name, "My");
        assert_eq!(options.activation_timeout(), Duration::from_millis(250));
        assert_eq!(options.signature_type, SignatureType::CadesBes);
    }
}
