//! # Provider
//!
//! The provider traits exported by this module are used to inject the
//! external cryptographic provider into the facade. The provider owns every
//! cryptographic operation: key access, hashing, signing, chain validation,
//! and trust decisions. The facade only sequences calls and normalizes
//! results.
//!
//! The traits mirror the object model of a CAdES browser plugin: a store
//! object holding a filterable certificate collection, a signer bound to a
//! certificate, a signed-data object that signs and verifies content, and an
//! about object describing the installed CSP. All calls are asynchronous and
//! may fail at any await point.

use std::fmt::{self, Debug, Display};
use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result is used for all external errors.
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// The external cryptographic provider.
pub trait CryptoProvider: Send + Sync {
    /// Provider-native certificate handle.
    type Certificate: ProviderCertificate;

    /// Certificate store object.
    type Store: Store<Certificate = Self::Certificate>;

    /// Signer object.
    type Signer: Signer<Certificate = Self::Certificate>;

    /// Signed-data object.
    type SignedData: SignedData<Signer = Self::Signer, Certificate = Self::Certificate>;

    /// CSP information object.
    type About: About;

    /// Resolves once the provider has finished loading. A provider that
    /// never activates never resolves.
    fn activated(&self) -> impl Future<Output = Result<()>> + Send;

    /// Create a new, unopened certificate store object.
    fn create_store(&self) -> impl Future<Output = Result<Self::Store>> + Send;

    /// Create a new signer object.
    fn create_signer(&self) -> impl Future<Output = Result<Self::Signer>> + Send;

    /// Create a new signed-data object.
    fn create_signed_data(&self) -> impl Future<Output = Result<Self::SignedData>> + Send;

    /// Create a new CSP information object.
    fn create_about(&self) -> impl Future<Output = Result<Self::About>> + Send;
}

/// A 1-based, indexed collection of provider objects.
pub trait Collection: Send + Sync {
    /// The type of object held by the collection.
    type Item: Send;

    /// The number of items in the collection.
    fn count(&self) -> impl Future<Output = Result<usize>> + Send;

    /// Get the item at `index`, where the first item has index 1.
    fn item(&self, index: usize) -> impl Future<Output = Result<Self::Item>> + Send;
}

/// A certificate collection that can be narrowed by search criteria.
pub trait Certificates: Collection + Sized {
    /// Return a new collection holding only the certificates that match
    /// `criteria`.
    fn find(&self, criteria: FindCriteria) -> impl Future<Output = Result<Self>> + Send;
}

/// A system certificate store. Every successful `open` must be paired with
/// exactly one `close`.
pub trait Store: Send + Sync {
    /// Provider-native certificate handle.
    type Certificate: ProviderCertificate;

    /// The store's certificate collection.
    type Certificates: Certificates<Item = Self::Certificate>;

    /// Open the named store at `location`.
    fn open(
        &mut self, location: StoreLocation, name: &str, mode: OpenMode,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Close the store.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// The certificates held by the open store.
    fn certificates(&self) -> impl Future<Output = Result<Self::Certificates>> + Send;
}

/// Read access to a provider-native certificate.
pub trait ProviderCertificate: Clone + Debug + Send + Sync {
    /// Subject distinguished name.
    fn subject_name(&self) -> impl Future<Output = Result<String>> + Send;

    /// Issuer distinguished name.
    fn issuer_name(&self) -> impl Future<Output = Result<String>> + Send;

    /// X.509 version.
    fn version(&self) -> impl Future<Output = Result<u32>> + Send;

    /// Serial number, as a hex string.
    fn serial_number(&self) -> impl Future<Output = Result<String>> + Send;

    /// Thumbprint, as a hex string.
    fn thumbprint(&self) -> impl Future<Output = Result<String>> + Send;

    /// Start of the validity period.
    fn valid_from(&self) -> impl Future<Output = Result<DateTime<Utc>>> + Send;

    /// End of the validity period.
    fn valid_to(&self) -> impl Future<Output = Result<DateTime<Utc>>> + Send;

    /// Whether the private key for the certificate is available.
    fn has_private_key(&self) -> impl Future<Output = Result<bool>> + Send;

    /// Whether the provider considers the certificate valid under its
    /// current policy.
    fn is_valid(&self) -> impl Future<Output = Result<bool>> + Send;
}

/// A signer bound to a certificate.
pub trait Signer: Send + Sync {
    /// Provider-native certificate handle.
    type Certificate: ProviderCertificate;

    /// Bind the signing certificate.
    fn set_certificate(
        &mut self, certificate: &Self::Certificate,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Set which part of the certificate chain is embedded in signatures.
    fn set_options(&mut self, options: ChainOption) -> impl Future<Output = Result<()>> + Send;
}

/// Signs content and verifies signatures over content.
pub trait SignedData: Send + Sync {
    /// The signer type accepted by [`SignedData::sign_cades`].
    type Signer: Signer;

    /// Provider-native certificate handle.
    type Certificate: ProviderCertificate;

    /// Signer details available after verification.
    type SignerInfo: SignerInfo<Certificate = Self::Certificate>;

    /// The collection of signers available after verification.
    type Signers: Collection<Item = Self::SignerInfo>;

    /// Set how `content` is to be interpreted.
    fn set_content_encoding(
        &mut self, encoding: ContentEncoding,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Set the content to sign or verify.
    fn set_content(&mut self, content: String) -> impl Future<Output = Result<()>> + Send;

    /// Create a CAdES signature over the content and return the encoded
    /// signature blob.
    fn sign_cades(
        &self, signer: &Self::Signer, signature_type: SignatureType, detached: bool,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Verify a CAdES signature over the content.
    fn verify_cades(
        &self, signature: &str, signature_type: SignatureType, detached: bool,
    ) -> impl Future<Output = Result<()>> + Send;

    /// The signers found by the last successful verification.
    fn signers(&self) -> impl Future<Output = Result<Self::Signers>> + Send;
}

/// A signer found on a verified signature.
pub trait SignerInfo: Send + Sync {
    /// Provider-native certificate handle.
    type Certificate: ProviderCertificate;

    /// The signing time recorded in the signature.
    fn signing_time(&self) -> impl Future<Output = Result<DateTime<Utc>>> + Send;

    /// The signer's certificate.
    fn certificate(&self) -> impl Future<Output = Result<Self::Certificate>> + Send;
}

/// Information about the installed CSP.
pub trait About: Send + Sync {
    /// CSP version, e.g. `5.0.12000`.
    fn csp_version(&self) -> impl Future<Output = Result<String>> + Send;

    /// CSP name.
    fn csp_name(&self) -> impl Future<Output = Result<String>> + Send;
}

/// Provider object types, named by their plugin program identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectType {
    /// `CAdESCOM.Store`
    Store,
    /// `CAdESCOM.CPSigner`
    Signer,
    /// `CAdESCOM.CadesSignedData`
    SignedData,
    /// `CAdESCOM.About`
    About,
}

impl ObjectType {
    /// The program identifier used to create the object.
    #[must_use]
    pub const fn prog_id(self) -> &'static str {
        match self {
            Self::Store => "CAdESCOM.Store",
            Self::Signer => "CAdESCOM.CPSigner",
            Self::SignedData => "CAdESCOM.CadesSignedData",
            Self::About => "CAdESCOM.About",
        }
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prog_id())
    }
}

/// Certificate store location.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StoreLocation {
    /// In-memory store.
    Memory = 0,
    /// Local machine store.
    LocalMachine = 1,
    /// Current user store.
    #[default]
    CurrentUser = 2,
    /// Active Directory store.
    ActiveDirectory = 3,
    /// Certificates on attached smart cards.
    SmartCard = 4,
}

/// Store open mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OpenMode {
    /// Read only.
    ReadOnly = 0,
    /// Read and write.
    ReadWrite = 1,
    /// Highest access level permitted to the caller.
    #[default]
    MaximumAllowed = 2,
}

/// Certificate search criteria.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FindCriteria {
    /// Certificates within their validity period at the current time.
    TimeValid = 9,
}

/// Which part of the certificate chain is embedded in a signature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChainOption {
    /// The whole chain, except the root.
    ChainExceptRoot = 0,
    /// The whole chain, including the root.
    #[default]
    WholeChain = 1,
    /// Only the signing certificate.
    EndCertOnly = 2,
}

/// How signed-data content is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentEncoding {
    /// Content is a UTF-16LE string.
    Utf16LeString = 0,
    /// Content is base64 and is decoded to binary before hashing.
    Base64ToBinary = 1,
}

/// CAdES signature type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SignatureType {
    /// CAdES-BES.
    #[default]
    CadesBes = 0x01,
    /// CAdES-T.
    CadesT = 0x05,
    /// CAdES-X Long Type 1.
    CadesXLongType1 = 0x5D,
}

/// Read every item of a collection, in index order.
///
/// # Errors
///
/// Returns the provider's error if the count or any item cannot be read.
pub async fn items<C: Collection>(collection: &C) -> Result<Vec<C::Item>> {
    let count = collection.count().await?;
    let mut items = Vec::with_capacity(count);
    for index in 1..=count {
        items.push(collection.item(index).await?);
    }
    Ok(items)
}
