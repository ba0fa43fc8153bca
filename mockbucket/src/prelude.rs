//! Convenient re-exports of commonly used types from mockbucket.
//!
//! ```ignore
//! use mockbucket::prelude::*;
//! ```
//!
//! This provides access to:
//! - The typed bucket facade and backend traits
//! - CAS tokens, statuses and durability types
//! - Options, results and error types

pub use mockbucket_core::{
    backend::{BucketBackend, BucketBackendBuilder},
    bucket::{BulkResults, Document, DocumentBucket},
    cas::Cas,
    clock::{Clock, ManualClock, SystemClock},
    config::BucketConfig,
    document::{Content, DocumentRecord},
    error::{BucketError, BucketResult},
    options::MutationOptions,
    result::OperationResult,
    status::{Durability, DurabilityRequirement, PersistTo, ReplicateTo, ResponseStatus},
};
