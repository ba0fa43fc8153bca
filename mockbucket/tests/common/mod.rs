//! Shared fixtures for integration tests.
//!
//! Every test builds its own bucket; nothing is shared between tests.

#![allow(dead_code)]

use mockbucket::{
    backend::BucketBackendBuilder,
    bucket::DocumentBucket,
    clock::ManualClock,
    memory::InMemoryBucket,
};
use tracing_subscriber::EnvFilter;

/// Installs a log subscriber honouring `RUST_LOG`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A fresh bucket driven by a manual clock, plus a handle to that clock.
pub async fn manual_bucket() -> (ManualClock, DocumentBucket<InMemoryBucket>) {
    init_tracing();

    let clock = ManualClock::default();
    let backend = InMemoryBucket::builder()
        .name("test")
        .clock(clock.clone())
        .build()
        .await
        .expect("in-memory bucket always builds");

    (clock, DocumentBucket::new(backend))
}
