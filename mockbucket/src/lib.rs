//! Main mockbucket crate: an in-memory stand-in for a clustered key/value document client.
//!
//! This crate is the primary entry point for users of mockbucket. It re-exports the core
//! types and the in-memory backend so that tests can swap a real bucket for a mock one
//! without changing how they call it.
//!
//! # Features
//!
//! - **CAS semantics** - Insert, replace, remove, upsert and touch with optimistic concurrency
//! - **Expiration** - Documents lapse lazily against an injectable clock
//! - **Simulated durability** - Replication/persistence requests are acknowledged, not performed
//! - **Typed facade** - Read back exactly the value (and `Arc`) you stored
//! - **Explicit boundaries** - Query, search and sub-document calls fail with `Unsupported`
//!
//! # Quick Start
//!
//! ```ignore
//! use mockbucket::{prelude::*, memory::InMemoryBucket};
//!
//! #[tokio::main]
//! async fn main() {
//!     let bucket = DocumentBucket::new(InMemoryBucket::builder().build().await.unwrap());
//!
//!     // Create a document
//!     let inserted = bucket
//!         .insert("airline_10", "40-Mile Air".to_string(), MutationOptions::new())
//!         .await
//!         .unwrap();
//!     assert_eq!(inserted.cas, Cas::SEED);
//!
//!     // Replace it, guarding against concurrent writers
//!     let replaced = bucket
//!         .replace("airline_10", "Forty Mile Air".to_string(), MutationOptions::new().cas(inserted.cas))
//!         .await
//!         .unwrap();
//!     assert!(replaced.success());
//!
//!     // A stale CAS is reported, not raised
//!     let stale = bucket
//!         .replace("airline_10", "40 Mile".to_string(), MutationOptions::new().cas(inserted.cas))
//!         .await
//!         .unwrap();
//!     assert_eq!(stale.status, ResponseStatus::DocumentMutationDetected);
//!
//!     bucket.shutdown().await.unwrap();
//! }
//! ```
//!
//! # Deterministic expiry
//!
//! Inject a [`ManualClock`](clock::ManualClock) and move it explicitly:
//!
//! ```ignore
//! use mockbucket::{prelude::*, clock::ManualClock, memory::InMemoryBucket};
//! use chrono::Duration;
//!
//! let clock = ManualClock::default();
//! let bucket = DocumentBucket::new(InMemoryBucket::with_clock(clock.clone()));
//!
//! bucket.insert("session", 1u32, MutationOptions::new().expiration(Duration::seconds(30))).await?;
//! clock.advance(Duration::seconds(31));
//! assert_eq!(bucket.get::<u32>("session").await?.status, ResponseStatus::KeyNotFound);
//! ```
//!
//! # Backends
//!
//! - [`memory`] - The in-memory bucket and its active-entry view

pub mod prelude;

pub use mockbucket_core::{backend, bucket, cas, clock, config, document, error, options, result, status};

/// In-memory bucket implementations.
pub mod memory {
    pub use mockbucket_memory::{ActiveEntries, InMemoryBucket, InMemoryBucketBuilder};
}
