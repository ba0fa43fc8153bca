//! Core types and traits for an in-memory stand-in of a clustered key/value document client.
//!
//! This crate is the core of the mockbucket project and provides:
//!
//! - **Time** ([`clock`]) - Injectable clocks so expiration is deterministic under test
//! - **Documents** ([`document`]) - Stored records, their version stamps and expiry
//! - **CAS tokens** ([`cas`]) - Optimistic concurrency version stamps
//! - **Statuses and durability** ([`status`]) - Outcome codes and simulated durability
//! - **Results and options** ([`result`], [`options`]) - What operations take and return
//! - **Backend abstraction** ([`backend`]) - The primitive operations a bucket must provide
//! - **Typed facade** ([`bucket`]) - Typed, bulk and unsupported client operations
//! - **Configuration** ([`config`]) - Serde-backed bucket settings
//! - **Error handling** ([`error`]) - Precondition and unsupported-operation errors
//!
//! # Example
//!
//! ```ignore
//! use mockbucket_core::{bucket::DocumentBucket, options::MutationOptions};
//!
//! let bucket = DocumentBucket::new(backend);
//! let inserted = bucket.insert("route_1", 42u32, MutationOptions::new()).await?;
//! assert!(inserted.success());
//! ```

#[allow(unused_extern_crates)]
extern crate self as mockbucket_core;

pub mod backend;
pub mod bucket;
pub mod cas;
pub mod clock;
pub mod config;
pub mod document;
pub mod error;
pub mod options;
pub mod result;
pub mod status;
