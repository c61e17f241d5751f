use chrono::{Duration, Utc};

use crate::test_utils::MockCertificate;

pub const SIGNER_THUMBPRINT: &str = "0A1B2C3D4E5F60718293A4B5C6D7E8F901234567";
pub const NO_KEY_THUMBPRINT: &str = "1122334455667788990011223344556677889900";
pub const EXPIRED_THUMBPRINT: &str = "FFEEDDCCBBAA99887766554433221100FFEEDDCC";

pub const ISSUER_DN: &str = r#"CN="УЦ ""Тест""", O="ООО ""Тест""", L=Москва, S=77 г. Москва, E=ca@example.com, ИНН=007701234567, ОГРН=1027700132195"#;

/// A current certificate with an accessible private key.
#[must_use]
pub fn signer() -> MockCertificate {
    MockCertificate {
        subject: "CN=Иванов Иван, T=Директор, O=ООО Ромашка, OU=Администрация, STREET=\"ул. Ленина, д. 1\", L=Москва, S=77 г. Москва, E=ivanov@example.com, СНИЛС=12345678901, ИНН=007701234567, ОГРН=1027700132195".into(),
        issuer: ISSUER_DN.into(),
        version: 3,
        serial_number: "7C00000123ABCDEF".into(),
        thumbprint: SIGNER_THUMBPRINT.into(),
        valid_from: Utc::now() - Duration::days(30),
        valid_to: Utc::now() + Duration::days(335),
        has_private_key: true,
        is_valid: true,
    }
}

/// A current certificate without a private key.
#[must_use]
pub fn no_key() -> MockCertificate {
    MockCertificate {
        subject: "CN=Smith John, O=Acme".into(),
        thumbprint: NO_KEY_THUMBPRINT.into(),
        serial_number: "7C00000456ABCDEF".into(),
        has_private_key: false,
        ..signer()
    }
}

/// A certificate whose validity period has ended.
#[must_use]
pub fn expired() -> MockCertificate {
    MockCertificate {
        subject: "CN=Петров Пётр, O=ООО Ромашка".into(),
        thumbprint: EXPIRED_THUMBPRINT.into(),
        serial_number: "7C00000789ABCDEF".into(),
        valid_from: Utc::now() - Duration::days(400),
        valid_to: Utc::now() - Duration::days(35),
        is_valid: false,
        ..signer()
    }
}
