//! Shared setup for client integration tests
#![allow(dead_code)]

use std::sync::Arc;

use vcider::crypto::Credential;
use vcider::testkit::{FixedClock, MockTransport};
use vcider::transport::ApiClient;

pub const API_ID: &str = "AID123";
pub const API_SECRET: &str = "SECRET456";
pub const NOW: i64 = 1_700_000_000;

pub struct TestEnv {
    pub api: ApiClient,
    pub transport: Arc<MockTransport>,
    pub clock: Arc<FixedClock>,
}

/// A client over a scripted transport, pinned at [`NOW`]
pub fn setup_test_env(base_uri: &str) -> TestEnv {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("vcider=debug")
        .try_init();

    let transport = Arc::new(MockTransport::new());
    let clock = Arc::new(FixedClock::new(NOW));
    let api = ApiClient::with_transport(
        base_uri,
        credential(),
        transport.clone(),
        clock.clone(),
    )
    .unwrap();

    TestEnv {
        api,
        transport,
        clock,
    }
}

pub fn credential() -> Credential {
    Credential::new(API_ID, API_SECRET).unwrap()
}
