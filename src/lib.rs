//! An async facade over a CAdES cryptographic provider, such as a browser
//! signing plugin or a native CSP bridge, for listing certificates, creating
//! detached signatures, and verifying signatures.
//!
//! # Design
//!
//! **Provider**
//!
//! All cryptography is delegated to the provider: key access, hashing,
//! signing, chain validation, and trust decisions. Implementors supply it by
//! implementing the [`provider`] traits, which mirror the plugin's object
//! model (store, signer, signed data, and about objects). Every provider call
//! is asynchronous and fallible.
//!
//! **Facade**
//!
//! [`SigningFacade`] sequences provider calls and normalizes results.
//! Certificates are returned as [`Certificate`] values with parsed subject and
//! issuer [`DistinguishedName`]s. Signing accepts a [`SignInput`]: text, a
//! single file, or a batch of files signed concurrently.
//!
//! Signing failures are errors. Verification failures are not: they are
//! reported as [`Verification::Invalid`].
//!
//! # Example
//!
//! ```rust,ignore
//! let facade = SigningFacade::new(provider);
//! facade.init().await?;
//!
//! let certificates = facade.get_certificates(None).await?;
//! let signature = facade.sign(&certificates[0], SignInput::from("hello")).await?;
//! ```

pub mod certificate;
pub mod dn;
mod error;
mod facade;
mod handlers;
pub mod input;
pub mod options;
pub mod provider;
pub mod test_utils;

pub use certificate::{Certificate, CspInfo, SignatureInfo, Verification};
pub use dn::DistinguishedName;
pub use error::{Error, ErrorResponse};
pub use facade::{Readiness, SigningFacade};
pub use input::{Encoding, FileSource, SignInput, Signed};
pub use options::{Options, StoreParams};
pub use provider::CryptoProvider;

/// Result type for the signing facade.
pub type Result<T, E = Error> = std::result::Result<T, E>;
