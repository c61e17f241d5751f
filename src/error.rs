//! # Facade Errors
//!
//! This module defines the errors surfaced by the signing facade. Provider
//! rejections are caught at the facade boundary, traced, and re-raised as one
//! of these variants.
//!
//! Signature verification failures are not errors: see
//! [`crate::Verification`].

use std::fmt::Display;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Signing facade error codes.
#[derive(Error, Debug, Deserialize)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// The provider did not activate, or the activation probe failed.
    #[error(r#"{{"error": "provider_unavailable", "error_description": "{0}"}}"#)]
    ProviderUnavailable(String),

    /// The provider rejected a signing request. For example, the certificate
    /// has no accessible private key or the user cancelled the PIN prompt.
    #[error(r#"{{"error": "signing_failed", "error_description": "{0}"}}"#)]
    SigningFailed(String),

    /// The certificate store could not be opened, enumerated, or closed.
    #[error(r#"{{"error": "store_access_failed", "error_description": "{0}"}}"#)]
    StoreAccessFailed(String),

    /// Provider metadata (CSP version and name) could not be queried.
    #[error(r#"{{"error": "provider_query_failed", "error_description": "{0}"}}"#)]
    ProviderQueryFailed(String),

    /// File content could not be buffered for signing.
    #[error(r#"{{"error": "file_read_failed", "error_description": "{0}"}}"#)]
    FileReadFailed(String),
}

/// Serialized form of an [`Error`].
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,

    /// Error description, including the underlying cause.
    pub error_description: String,
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::Error as SerdeError;

        let Ok(error) = serde_json::from_str::<ErrorResponse>(&self.to_string()) else {
            return Err(SerdeError::custom("issue deserializing Error"));
        };
        error.serialize(serializer)
    }
}

impl Error {
    /// Transform error to a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.to_string()).unwrap_or_default()
    }

    /// The error code, e.g. `signing_failed`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable(_) => "provider_unavailable",
            Self::SigningFailed(_) => "signing_failed",
            Self::StoreAccessFailed(_) => "store_access_failed",
            Self::ProviderQueryFailed(_) => "provider_query_failed",
            Self::FileReadFailed(_) => "file_read_failed",
        }
    }
}

/// Escape a provider message so it can be embedded in the JSON `Display`
/// form of an [`Error`].
pub(crate) fn describe(context: &str, cause: &anyhow::Error) -> String {
    escape(format!("{context}: {cause:#}"))
}

/// Escape any message for embedding in the JSON `Display` form of an
/// [`Error`].
pub(crate) fn escape(detail: impl Display) -> String {
    let quoted = serde_json::to_string(&detail.to_string()).unwrap_or_default();
    quoted.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or_default().to_string()
}

#[cfg(test)]
mod test {
    use anyhow::anyhow;
    use serde_json::{Value, json};

    use super::*;

    // Test that error details are returned as json.
    #[test]
    fn err_json() {
        let err = Error::SigningFailed("no private key".into());
        let ser: Value = serde_json::from_str(&err.to_string()).unwrap();
        assert_eq!(ser, json!({"error":"signing_failed", "error_description": "no private key"}));
    }

    #[test]
    fn err_serialize() {
        let err = Error::StoreAccessFailed("store locked".into());
        let ser = serde_json::to_value(&err).unwrap();
        assert_eq!(
            ser,
            json!({"error":"store_access_failed", "error_description": "store locked"})
        );
        assert_eq!(err.to_json(), ser);
        assert_eq!(err.code(), "store_access_failed");
    }

    // Quotes and backslashes in provider messages must not break the JSON form.
    #[test]
    fn describe_escapes() {
        let cause = anyhow!(r#"object "CAdESCOM.Store" failed at C:\plugin"#);
        let err = Error::ProviderUnavailable(describe("probe failed", &cause));
        let ser = err.to_json();
        assert_eq!(
            ser["error_description"],
            r#"probe failed: object "CAdESCOM.Store" failed at C:\plugin"#
        );
    }

    #[test]
    fn escape_path() {
        let err = Error::FileReadFailed(escape(r#"cannot read C:\docs\"q".pdf"#));
        let ser = err.to_json();
        assert!(ser.is_object());
        assert_eq!(ser["error_description"], r#"cannot read C:\docs\"q".pdf"#);
    }
}
