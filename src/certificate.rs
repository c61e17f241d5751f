//! # Certificates
//!
//! Normalized views of provider-native certificates and signers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dn::{self, DistinguishedName};
use crate::provider::{ProviderCertificate, Result, SignerInfo};

/// A certificate, normalized from the provider's object model.
///
/// The provider-native handle is kept so the certificate can be used for
/// signing. It is not serialized.
#[derive(Clone, Debug, Serialize)]
#[serde(bound = "", rename_all = "camelCase")]
pub struct Certificate<C> {
    /// Parsed subject DN.
    pub subject: DistinguishedName,

    /// Parsed issuer DN.
    pub issuer: DistinguishedName,

    /// X.509 version.
    pub version: u32,

    /// Serial number.
    pub serial_number: String,

    /// Thumbprint, unique within a store.
    pub thumbprint: String,

    /// Start of the validity period.
    pub valid_from: DateTime<Utc>,

    /// End of the validity period.
    pub valid_to: DateTime<Utc>,

    /// Whether the private key is available for signing.
    pub has_private_key: bool,

    /// Whether the provider considers the certificate valid.
    pub is_valid: bool,

    #[serde(skip)]
    handle: C,
}

impl<C: ProviderCertificate> Certificate<C> {
    /// Read a provider certificate into its normalized form.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if any certificate property cannot be
    /// read.
    pub async fn from_provider(handle: C) -> Result<Self> {
        Ok(Self {
            subject: dn::parse(&handle.subject_name().await?),
            issuer: dn::parse(&handle.issuer_name().await?),
            version: handle.version().await?,
            serial_number: handle.serial_number().await?,
            thumbprint: handle.thumbprint().await?,
            valid_from: handle.valid_from().await?,
            valid_to: handle.valid_to().await?,
            has_private_key: handle.has_private_key().await?,
            is_valid: handle.is_valid().await?,
            handle,
        })
    }

    /// The provider-native certificate.
    #[must_use]
    pub const fn handle(&self) -> &C {
        &self.handle
    }

    /// Whether `at` falls within the certificate's validity period.
    #[must_use]
    pub fn is_time_valid(&self, at: DateTime<Utc>) -> bool {
        self.valid_from <= at && at <= self.valid_to
    }
}

/// A signer found on a verified signature.
#[derive(Clone, Debug, Serialize)]
#[serde(bound = "", rename_all = "camelCase")]
pub struct SignatureInfo<C> {
    /// Signing time recorded in the signature.
    pub signing_time: DateTime<Utc>,

    /// The signer's certificate.
    pub certificate: Certificate<C>,
}

impl<C: ProviderCertificate> SignatureInfo<C> {
    /// Read a provider signer into its normalized form.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the signing time or certificate cannot
    /// be read.
    pub async fn from_provider(signer: &impl SignerInfo<Certificate = C>) -> Result<Self> {
        Ok(Self {
            signing_time: signer.signing_time().await?,
            certificate: Certificate::from_provider(signer.certificate().await?).await?,
        })
    }
}

/// Outcome of signature verification.
///
/// Verification failure is an expected outcome, so it is reported here rather
/// than as an error.
#[derive(Clone, Debug)]
pub enum Verification<C> {
    /// The signature is valid. Signers are in provider-reported order.
    Valid(Vec<SignatureInfo<C>>),

    /// The signature is malformed, does not match the content, or was
    /// rejected by provider policy.
    Invalid,
}

impl<C> Verification<C> {
    /// Returns `true` if the signature verified.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The signers, if the signature verified.
    #[must_use]
    pub fn signers(&self) -> Option<&[SignatureInfo<C>]> {
        match self {
            Self::Valid(signers) => Some(signers),
            Self::Invalid => None,
        }
    }

    /// Convert into the signers, if the signature verified.
    #[must_use]
    pub fn into_signers(self) -> Option<Vec<SignatureInfo<C>>> {
        match self {
            Self::Valid(signers) => Some(signers),
            Self::Invalid => None,
        }
    }
}

/// Serializes as the signer list, or `false` when verification failed.
impl<C> Serialize for Verification<C> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Valid(signers) => signers.serialize(serializer),
            Self::Invalid => serializer.serialize_bool(false),
        }
    }
}

/// Installed CSP details.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CspInfo {
    /// CSP version.
    pub version: String,

    /// CSP name.
    pub name: String,
}
