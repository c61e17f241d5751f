use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail};
use base64ct::{Base64, Encoding};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::Barrier;

use crate::certificate::CspInfo;
use crate::provider::{
    About, Certificates, ChainOption, Collection, ContentEncoding, CryptoProvider, FindCriteria,
    OpenMode, ProviderCertificate, Result, SignatureType, SignedData, Signer, SignerInfo, Store,
    StoreLocation,
};
use crate::test_utils::sample;

/// Provider calls that can be made to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fault {
    CreateStore,
    OpenStore,
    Enumerate,
    CloseStore,
    CreateSigner,
    Sign,
    CreateSignedData,
    CreateAbout,
    CspVersion,
}

/// How the provider responds to activation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Activation {
    #[default]
    Ready,
    Rejected,
    Never,
}

#[derive(Debug)]
struct State {
    certificates: Vec<MockCertificate>,
    activation: Activation,
    faults: HashSet<Fault>,
    rejected_content: HashSet<String>,
    opened: Vec<(StoreLocation, String, OpenMode)>,
    closed: usize,
    signed: usize,
    gate: Option<Arc<Barrier>>,
    csp: CspInfo,
}

impl Default for State {
    fn default() -> Self {
        Self {
            certificates: vec![sample::signer(), sample::no_key(), sample::expired()],
            activation: Activation::Ready,
            faults: HashSet::new(),
            rejected_content: HashSet::new(),
            opened: vec![],
            closed: 0,
            signed: 0,
            gate: None,
            csp: CspInfo {
                version: "5.0.12000".into(),
                name: "Crypto-Pro GOST R 34.10-2012 Cryptographic Service Provider".into(),
            },
        }
    }
}

/// In-memory provider. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct MockProvider {
    state: Arc<Mutex<State>>,
}

impl MockProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the certificates held by the store.
    pub fn set_certificates(&self, certificates: Vec<MockCertificate>) {
        self.state.lock().expect("should lock").certificates = certificates;
    }

    pub fn set_activation(&self, activation: Activation) {
        self.state.lock().expect("should lock").activation = activation;
    }

    pub fn fail(&self, fault: Fault) {
        self.state.lock().expect("should lock").faults.insert(fault);
    }

    pub fn clear_faults(&self) {
        self.state.lock().expect("should lock").faults.clear();
    }

    /// Reject signing of this exact content.
    pub fn reject_content(&self, data: &[u8]) {
        self.state.lock().expect("should lock").rejected_content.insert(Base64::encode_string(data));
    }

    /// Hold every `sign_cades` call until `signers` calls are in progress.
    pub fn gate_signing(&self, signers: usize) {
        self.state.lock().expect("should lock").gate = Some(Arc::new(Barrier::new(signers)));
    }

    /// Parameters of every store `open` call.
    #[must_use]
    pub fn opened(&self) -> Vec<(StoreLocation, String, OpenMode)> {
        self.state.lock().expect("should lock").opened.clone()
    }

    /// Number of store `close` calls.
    #[must_use]
    pub fn closed(&self) -> usize {
        self.state.lock().expect("should lock").closed
    }

    /// Number of signatures created.
    #[must_use]
    pub fn signed(&self) -> usize {
        self.state.lock().expect("should lock").signed
    }

    fn check(&self, fault: Fault) -> Result<()> {
        if self.state.lock().expect("should lock").faults.contains(&fault) {
            bail!("{fault:?} rejected by provider");
        }
        Ok(())
    }

    fn certificate(&self, thumbprint: &str) -> Option<MockCertificate> {
        let state = self.state.lock().expect("should lock");
        state.certificates.iter().find(|c| c.thumbprint == thumbprint).cloned()
    }
}

impl CryptoProvider for MockProvider {
    type About = MockAbout;
    type Certificate = MockCertificate;
    type SignedData = MockSignedData;
    type Signer = MockSigner;
    type Store = MockStore;

    async fn activated(&self) -> Result<()> {
        let activation = self.state.lock().expect("should lock").activation;
        match activation {
            Activation::Ready => Ok(()),
            Activation::Rejected => Err(anyhow!("plugin not activated")),
            Activation::Never => std::future::pending().await,
        }
    }

    async fn create_store(&self) -> Result<MockStore> {
        self.check(Fault::CreateStore)?;
        Ok(MockStore {
            provider: self.clone(),
            open: false,
        })
    }

    async fn create_signer(&self) -> Result<MockSigner> {
        self.check(Fault::CreateSigner)?;
        Ok(MockSigner::default())
    }

    async fn create_signed_data(&self) -> Result<MockSignedData> {
        self.check(Fault::CreateSignedData)?;
        Ok(MockSignedData {
            provider: self.clone(),
            encoding: None,
            content: None,
            signers: Mutex::new(vec![]),
        })
    }

    async fn create_about(&self) -> Result<MockAbout> {
        self.check(Fault::CreateAbout)?;
        Ok(MockAbout {
            provider: self.clone(),
        })
    }
}

/// A certificate held by the mock store.
#[derive(Clone, Debug)]
pub struct MockCertificate {
    pub subject: String,
    pub issuer: String,
    pub version: u32,
    pub serial_number: String,
    pub thumbprint: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub has_private_key: bool,
    pub is_valid: bool,
}

impl ProviderCertificate for MockCertificate {
    async fn subject_name(&self) -> Result<String> {
        Ok(self.subject.clone())
    }

    async fn issuer_name(&self) -> Result<String> {
        Ok(self.issuer.clone())
    }

    async fn version(&self) -> Result<u32> {
        Ok(self.version)
    }

    async fn serial_number(&self) -> Result<String> {
        Ok(self.serial_number.clone())
    }

    async fn thumbprint(&self) -> Result<String> {
        Ok(self.thumbprint.clone())
    }

    async fn valid_from(&self) -> Result<DateTime<Utc>> {
        Ok(self.valid_from)
    }

    async fn valid_to(&self) -> Result<DateTime<Utc>> {
        Ok(self.valid_to)
    }

    async fn has_private_key(&self) -> Result<bool> {
        Ok(self.has_private_key)
    }

    async fn is_valid(&self) -> Result<bool> {
        Ok(self.is_valid)
    }
}

#[derive(Debug)]
pub struct MockStore {
    provider: MockProvider,
    open: bool,
}

impl Store for MockStore {
    type Certificate = MockCertificate;
    type Certificates = MockCertificates;

    async fn open(&mut self, location: StoreLocation, name: &str, mode: OpenMode) -> Result<()> {
        self.provider.check(Fault::OpenStore)?;
        self.provider.state.lock().expect("should lock").opened.push((
            location,
            name.to_string(),
            mode,
        ));
        self.open = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.provider.state.lock().expect("should lock").closed += 1;
        self.open = false;
        self.provider.check(Fault::CloseStore)
    }

    async fn certificates(&self) -> Result<MockCertificates> {
        if !self.open {
            bail!("store is not open");
        }
        let items = self.provider.state.lock().expect("should lock").certificates.clone();
        Ok(MockCertificates {
            provider: self.provider.clone(),
            items,
        })
    }
}

#[derive(Debug)]
pub struct MockCertificates {
    provider: MockProvider,
    items: Vec<MockCertificate>,
}

impl Collection for MockCertificates {
    type Item = MockCertificate;

    async fn count(&self) -> Result<usize> {
        Ok(self.items.len())
    }

    async fn item(&self, index: usize) -> Result<MockCertificate> {
        self.provider.check(Fault::Enumerate)?;
        index
            .checked_sub(1)
            .and_then(|i| self.items.get(i))
            .cloned()
            .ok_or_else(|| anyhow!("index {index} out of range"))
    }
}

impl Certificates for MockCertificates {
    async fn find(&self, criteria: FindCriteria) -> Result<Self> {
        let now = Utc::now();
        let items = match criteria {
            FindCriteria::TimeValid => self
                .items
                .iter()
                .filter(|c| c.valid_from <= now && now <= c.valid_to)
                .cloned()
                .collect(),
        };
        Ok(Self {
            provider: self.provider.clone(),
            items,
        })
    }
}

#[derive(Debug, Default)]
pub struct MockSigner {
    certificate: Option<MockCertificate>,
    chain: Option<ChainOption>,
}

impl Signer for MockSigner {
    type Certificate = MockCertificate;

    async fn set_certificate(&mut self, certificate: &MockCertificate) -> Result<()> {
        self.certificate = Some(certificate.clone());
        Ok(())
    }

    async fn set_options(&mut self, options: ChainOption) -> Result<()> {
        self.chain = Some(options);
        Ok(())
    }
}

// The mock's signature blob: base64 of this JSON document.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    thumbprint: String,
    digest: String,
    signing_time: DateTime<Utc>,
    signature_type: SignatureType,
}

#[derive(Debug)]
pub struct MockSignedData {
    provider: MockProvider,
    encoding: Option<ContentEncoding>,
    content: Option<String>,
    signers: Mutex<Vec<MockSignerInfo>>,
}

impl MockSignedData {
    fn digest(&self) -> Result<String> {
        let Some(content) = &self.content else {
            bail!("content not set");
        };
        let bytes = match self.encoding {
            Some(ContentEncoding::Base64ToBinary) => Base64::decode_vec(content)
                .map_err(|e| anyhow!("content is not valid base64: {e}"))?,
            Some(ContentEncoding::Utf16LeString) | None => {
                content.encode_utf16().flat_map(u16::to_le_bytes).collect()
            }
        };
        Ok(Base64::encode_string(&Sha256::digest(&bytes)))
    }
}

impl SignedData for MockSignedData {
    type Certificate = MockCertificate;
    type SignerInfo = MockSignerInfo;
    type Signers = MockSigners;
    type Signer = MockSigner;

    async fn set_content_encoding(&mut self, encoding: ContentEncoding) -> Result<()> {
        self.encoding = Some(encoding);
        Ok(())
    }

    async fn set_content(&mut self, content: String) -> Result<()> {
        self.content = Some(content);
        Ok(())
    }

    async fn sign_cades(
        &self, signer: &MockSigner, signature_type: SignatureType, detached: bool,
    ) -> Result<String> {
        self.provider.check(Fault::Sign)?;
        if !detached {
            bail!("attached signatures are not supported");
        }
        let Some(certificate) = &signer.certificate else {
            bail!("signer certificate not set");
        };
        if !certificate.has_private_key {
            bail!("private key not found for certificate {}", certificate.thumbprint);
        }
        let (rejected, gate) = {
            let state = self.provider.state.lock().expect("should lock");
            let rejected =
                self.content.as_ref().is_some_and(|c| state.rejected_content.contains(c));
            (rejected, state.gate.clone())
        };
        if rejected {
            bail!("operation cancelled by user");
        }
        if let Some(gate) = gate {
            gate.wait().await;
        }

        let blob = Blob {
            thumbprint: certificate.thumbprint.clone(),
            digest: self.digest()?,
            signing_time: Utc::now(),
            signature_type,
        };
        self.provider.state.lock().expect("should lock").signed += 1;

        Ok(Base64::encode_string(&serde_json::to_vec(&blob)?))
    }

    async fn verify_cades(
        &self, signature: &str, signature_type: SignatureType, detached: bool,
    ) -> Result<()> {
        if !detached {
            bail!("attached signatures are not supported");
        }
        let decoded =
            Base64::decode_vec(signature).map_err(|e| anyhow!("malformed signature: {e}"))?;
        let blob: Blob =
            serde_json::from_slice(&decoded).map_err(|e| anyhow!("malformed signature: {e}"))?;

        if blob.signature_type != signature_type {
            bail!("unexpected signature type {:?}", blob.signature_type);
        }
        if blob.digest != self.digest()? {
            bail!("signature does not match content");
        }
        let Some(certificate) = self.provider.certificate(&blob.thumbprint) else {
            bail!("signer certificate {} not found", blob.thumbprint);
        };
        if !certificate.is_valid {
            bail!("signer certificate {} is not valid", blob.thumbprint);
        }

        *self.signers.lock().expect("should lock") = vec![MockSignerInfo {
            signing_time: blob.signing_time,
            certificate,
        }];
        Ok(())
    }

    async fn signers(&self) -> Result<MockSigners> {
        Ok(MockSigners {
            items: self.signers.lock().expect("should lock").clone(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct MockSignerInfo {
    signing_time: DateTime<Utc>,
    certificate: MockCertificate,
}

impl SignerInfo for MockSignerInfo {
    type Certificate = MockCertificate;

    async fn signing_time(&self) -> Result<DateTime<Utc>> {
        Ok(self.signing_time)
    }

    async fn certificate(&self) -> Result<MockCertificate> {
        Ok(self.certificate.clone())
    }
}

#[derive(Debug)]
pub struct MockSigners {
    items: Vec<MockSignerInfo>,
}

impl Collection for MockSigners {
    type Item = MockSignerInfo;

    async fn count(&self) -> Result<usize> {
        Ok(self.items.len())
    }

    async fn item(&self, index: usize) -> Result<MockSignerInfo> {
        index
            .checked_sub(1)
            .and_then(|i| self.items.get(i))
            .cloned()
            .ok_or_else(|| anyhow!("index {index} out of range"))
    }
}

#[derive(Debug)]
pub struct MockAbout {
    provider: MockProvider,
}

impl About for MockAbout {
    async fn csp_version(&self) -> Result<String> {
        self.provider.check(Fault::CspVersion)?;
        Ok(self.provider.state.lock().expect("should lock").csp.version.clone())
    }

    async fn csp_name(&self) -> Result<String> {
        Ok(self.provider.state.lock().expect("should lock").csp.name.clone())
    }
}
