//! Error types and result types for bucket operations.
//!
//! Normal domain outcomes such as a missing key or a CAS mismatch are not errors; they are
//! reported through [`ResponseStatus`](crate::status::ResponseStatus) inside an
//! [`OperationResult`](crate::result::OperationResult). The variants here are reserved for
//! precondition violations and for parts of the client surface the mock does not emulate.
//! Use [`BucketResult<T>`] as the return type for fallible operations.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all the ways a call into a bucket can fail outright.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BucketError {
    /// A required argument was missing or malformed, e.g. an empty document key.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The bucket has been disposed and no longer accepts operations.
    /// The argument is the bucket name.
    #[error("Bucket {0} has been disposed")]
    Disposed(String),
    /// The operation exists on a real cluster client but is not emulated by the mock.
    #[error("Operation not supported by the in-memory bucket: {0}")]
    Unsupported(String),
    /// The stored content is not of the requested type.
    #[error("Document {key} does not hold content of type {expected}")]
    ContentType {
        /// The document key that was read.
        key: String,
        /// The Rust type name the caller asked for.
        expected: &'static str,
    },
    /// Invalid bucket configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A specialized `Result` type for bucket operations.
pub type BucketResult<T> = Result<T, BucketError>;

impl From<SerdeJsonError> for BucketError {
    fn from(err: SerdeJsonError) -> Self {
        BucketError::Serialization(err.to_string())
    }
}

/// Rejects keys a real cluster would refuse before any I/O happens.
pub fn validate_key(key: &str) -> BucketResult<()> {
    if key.is_empty() {
        return Err(BucketError::InvalidArgument("document key must not be empty".into()));
    }

    Ok(())
}
