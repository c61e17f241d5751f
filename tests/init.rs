//! Tests for provider activation and CSP queries

mod utils;

use std::time::Duration;

use assert_let_bind::assert_let;
use cades_facade::test_utils::{Activation, Fault, MockProvider};
use cades_facade::{Error, Options, SigningFacade};
use chrono::Utc;
use rstest::rstest;
use utils::{facade, provider};

#[rstest]
#[tokio::test]
async fn ready(provider: MockProvider) {
    let before = Utc::now();
    let readiness = facade(&provider).init().await.expect("should activate");
    assert!(readiness.activated_at >= before);
}

#[rstest]
#[tokio::test]
async fn rejected(provider: MockProvider) {
    provider.set_activation(Activation::Rejected);

    let result = facade(&provider).init().await;
    assert_let!(Err(Error::ProviderUnavailable(description)), result);
    assert!(description.contains("plugin not activated"));
}

// Activation that never settles is bounded by the configured timeout.
#[rstest]
#[tokio::test]
async fn timeout(provider: MockProvider) {
    provider.set_activation(Activation::Never);
    let options = Options::default().with_activation_timeout(Duration::from_millis(50));

    let result = SigningFacade::with_options(provider, options).init().await;
    assert_let!(Err(Error::ProviderUnavailable(description)), result);
    assert!(description.contains("not activated within"));
}

#[rstest]
#[tokio::test]
async fn probe_fails(provider: MockProvider) {
    provider.fail(Fault::CreateStore);

    let result = facade(&provider).init().await;
    assert_let!(Err(Error::ProviderUnavailable(description)), result);
    assert!(description.contains("probe failed"));
}

// A failed attempt does not prevent a later one from succeeding.
#[rstest]
#[tokio::test]
async fn retry(provider: MockProvider) {
    let facade = facade(&provider);

    provider.set_activation(Activation::Rejected);
    provider.fail(Fault::CreateStore);
    assert!(facade.init().await.is_err());

    provider.set_activation(Activation::Ready);
    assert!(facade.init().await.is_err());

    provider.clear_faults();
    assert!(facade.init().await.is_ok());
}

#[rstest]
#[tokio::test]
async fn check_csp(provider: MockProvider) {
    let csp = facade(&provider).check_csp().await.expect("should query");

    assert_eq!(csp.version, "5.0.12000");
    assert!(csp.name.starts_with("Crypto-Pro"));

    let value = serde_json::to_value(&csp).expect("should serialize");
    assert_eq!(value["version"], "5.0.12000");
}

#[rstest]
#[case::create_about(Fault::CreateAbout)]
#[case::csp_version(Fault::CspVersion)]
#[tokio::test]
async fn csp_query_fails(provider: MockProvider, #[case] fault: Fault) {
    provider.fail(fault);

    let result = facade(&provider).check_csp().await;
    assert_let!(Err(Error::ProviderQueryFailed(description)), result);
    assert!(description.contains("rejected by provider"));
}

// Errors serialize to the JSON shape reported to callers.
#[rstest]
#[tokio::test]
async fn error_json(provider: MockProvider) {
    provider.fail(Fault::CreateAbout);

    let err = facade(&provider).check_csp().await.expect_err("should fail");
    let value: serde_json::Value = serde_json::from_str(&err.to_string()).expect("should be json");
    assert_eq!(value["error"], "provider_query_failed");
    assert!(value["error_description"].as_str().is_some_and(|d| d.contains("CreateAbout")));
}
