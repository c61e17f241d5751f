#![allow(dead_code)]

use cades_facade::test_utils::{MockCertificate, MockProvider, init_tracer, sample};
use cades_facade::{Certificate, SigningFacade};
use rstest::fixture;

#[fixture]
pub fn provider() -> MockProvider {
    init_tracer();
    MockProvider::new()
}

pub fn facade(provider: &MockProvider) -> SigningFacade<MockProvider> {
    SigningFacade::new(provider.clone())
}

/// The sample certificate with an accessible private key.
pub async fn signer() -> Certificate<MockCertificate> {
    Certificate::from_provider(sample::signer()).await.expect("should read certificate")
}

/// A sample certificate without a private key.
pub async fn no_key() -> Certificate<MockCertificate> {
    Certificate::from_provider(sample::no_key()).await.expect("should read certificate")
}
