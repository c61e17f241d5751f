//! Tests for signature verification

mod utils;

use base64ct::{Base64, Encoding as _};
use cades_facade::test_utils::{Fault, MockProvider, sample};
use cades_facade::{Encoding, Verification};
use rstest::rstest;
use utils::{facade, provider, signer};

async fn signed(provider: &MockProvider, data: &[u8]) -> (String, String) {
    let content = Base64::encode_string(data);
    let signature = facade(provider)
        .sign_string(&signer().await, &content, Encoding::Base64)
        .await
        .expect("should sign");
    (content, signature)
}

#[rstest]
#[tokio::test]
async fn valid(provider: MockProvider) {
    let (content, signature) = signed(&provider, b"contract").await;

    let verification = facade(&provider).verify(&content, &signature, Encoding::Base64).await;
    let Verification::Valid(signers) = verification else {
        panic!("signature should be valid");
    };

    assert_eq!(signers.len(), 1);
    let certificate = &signers[0].certificate;
    assert_eq!(certificate.thumbprint, sample::SIGNER_THUMBPRINT);
    assert_eq!(certificate.subject.name.as_deref(), Some("Иванов Иван"));
    assert!(signers[0].signing_time <= chrono::Utc::now());
}

// A tampered signature resolves to `Invalid`, never an error or a panic.
#[rstest]
#[tokio::test]
async fn tampered(provider: MockProvider) {
    let (content, signature) = signed(&provider, b"contract").await;
    let facade = facade(&provider);

    let decoded = Base64::decode_vec(&signature).expect("should decode");
    let mut blob: serde_json::Value = serde_json::from_slice(&decoded).expect("should parse");
    blob["digest"] = Base64::encode_string(&[0u8; 32]).into();
    let tampered = Base64::encode_string(&serde_json::to_vec(&blob).expect("should serialize"));

    let verification = facade.verify(&content, &tampered, Encoding::Base64).await;
    assert!(!verification.is_valid());
    assert!(verification.signers().is_none());
}

#[rstest]
#[case::garbage("not a signature")]
#[case::empty("")]
#[case::not_json("aGVsbG8=")]
#[tokio::test]
async fn malformed(provider: MockProvider, #[case] signature: &str) {
    let content = Base64::encode_string(b"contract");
    let verification = facade(&provider).verify(&content, signature, Encoding::Base64).await;
    assert!(matches!(verification, Verification::Invalid));
}

#[rstest]
#[tokio::test]
async fn content_mismatch(provider: MockProvider) {
    let (_, signature) = signed(&provider, b"contract").await;

    let other = Base64::encode_string(b"contract v2");
    let verification = facade(&provider).verify(&other, &signature, Encoding::Base64).await;
    assert!(!verification.is_valid());
}

// Signers whose certificate the provider no longer trusts fail verification.
#[rstest]
#[tokio::test]
async fn revoked_signer(provider: MockProvider) {
    let (content, signature) = signed(&provider, b"contract").await;

    let mut revoked = sample::signer();
    revoked.is_valid = false;
    provider.set_certificates(vec![revoked]);

    let verification = facade(&provider).verify(&content, &signature, Encoding::Base64).await;
    assert!(!verification.is_valid());
}

// Provider failures are also reported as `Invalid`.
#[rstest]
#[tokio::test]
async fn provider_fails(provider: MockProvider) {
    let (content, signature) = signed(&provider, b"contract").await;
    provider.fail(Fault::CreateSignedData);

    let verification = facade(&provider).verify(&content, &signature, Encoding::Base64).await;
    assert!(!verification.is_valid());
}

// Failed verification serializes as `false`.
#[rstest]
#[tokio::test]
async fn serialize(provider: MockProvider) {
    let (content, signature) = signed(&provider, b"contract").await;
    let facade = facade(&provider);

    let invalid = facade.verify(&content, "bad", Encoding::Base64).await;
    let value = serde_json::to_value(&invalid).expect("should serialize");
    assert_eq!(value, serde_json::json!(false));

    let valid = facade.verify(&content, &signature, Encoding::Base64).await;
    let value = serde_json::to_value(&valid).expect("should serialize");
    let signers = value.as_array().expect("should be an array");
    assert_eq!(signers.len(), 1);
    assert_eq!(signers[0]["certificate"]["thumbprint"], sample::SIGNER_THUMBPRINT);
    assert!(signers[0]["signingTime"].is_string());
}
