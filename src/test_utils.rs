//! # Test Utilities
//!
//! An in-memory provider implementation that can be used for testing and
//! examples. Faults can be injected at each provider call, and store
//! open/close calls are counted.

#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod provider;
pub mod sample;

use std::sync::Once;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub use self::provider::{Activation, Fault, MockCertificate, MockProvider};

// initalise tracing once for all tests
static INIT: Once = Once::new();

/// Initialise tracing for tests. Defaults to `error` level unless `RUST_LOG`
/// is set.
///
/// # Panics
///
/// Panics if the tracing subscriber cannot be set.
pub fn init_tracer() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
        let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
        tracing::subscriber::set_global_default(subscriber).expect("subscriber set");
    });
}
