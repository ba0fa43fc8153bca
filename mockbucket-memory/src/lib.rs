//! In-memory bucket backend for mockbucket.
//!
//! This crate provides a thread-safe, in-memory implementation of the `BucketBackend` trait
//! that stands in for a clustered key/value client in tests.
//!
//! # Features
//!
//! - **Per-key atomicity** - Every mutation is a single read-decide-write on one slot
//! - **Optimistic concurrency** - CAS versions start at 100 and grow by one per mutation
//! - **Lazy expiration** - Expired documents are invisible but stay in their slot until overwritten
//! - **Simulated durability** - Durability requirements are acknowledged, never waited on
//! - **Seeding helpers** - Direct slot access for arranging test fixtures
//!
//! # Quick Start
//!
//! ```ignore
//! use mockbucket::{prelude::*, memory::InMemoryBucket};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bucket = DocumentBucket::new(InMemoryBucket::builder().build().await?);
//!
//!     bucket.upsert("airport_1254", "Calais Dunkerque".to_string(), MutationOptions::new()).await?;
//!     assert!(bucket.exists("airport_1254").await?);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as mockbucket_memory;

pub mod bucket;
pub mod slots;
pub mod view;

pub use bucket::{InMemoryBucket, InMemoryBucketBuilder};
pub use view::ActiveEntries;
