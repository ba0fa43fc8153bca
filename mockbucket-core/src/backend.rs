//! Bucket backend abstraction.
//!
//! [`BucketBackend`] is the contract between the typed [`DocumentBucket`](crate::bucket::DocumentBucket)
//! facade and whatever holds the documents. It consists of exactly the primitive
//! single-key operations; everything else a client offers (typed wrappers, bulk calls,
//! option permutations) is layered on top of these.
//!
//! # Domain outcomes vs. errors
//!
//! A missing key, an insert on an existing key or a CAS mismatch are ordinary outcomes and
//! come back as `Ok` with the matching [`ResponseStatus`](crate::status::ResponseStatus).
//! `Err` is reserved for precondition violations such as an empty key or a call after the
//! backend has been disposed.
//!
//! # Example
//!
//! ```ignore
//! use mockbucket_core::{backend::BucketBackend, document::into_content, options::MutationOptions};
//!
//! let backend = MyBackendImpl::new();
//! let inserted = backend.insert("airline_10", into_content("40-Mile Air"), MutationOptions::new()).await?;
//! let fetched = backend.get("airline_10").await?;
//! assert_eq!(fetched.cas, inserted.cas);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use chrono::Duration;
use std::fmt::Debug;

use crate::{
    document::Content,
    error::BucketResult,
    options::MutationOptions,
    result::OperationResult,
};

/// Abstract interface for a key/value document bucket.
///
/// # Thread Safety
///
/// Implementations must be safe to call from many tasks at once. Mutations on the same
/// key must be linearizable; mutations on different keys carry no ordering guarantee.
#[async_trait]
pub trait BucketBackend: Send + Sync + Debug {
    /// Name of the bucket, used in logs and errors.
    fn name(&self) -> &str;

    /// Returns `true` if `key` holds a live, unexpired document.
    async fn exists(&self, key: &str) -> BucketResult<bool>;

    /// Reads a document.
    ///
    /// Returns [`KeyNotFound`](crate::status::ResponseStatus::KeyNotFound) if the key is
    /// absent or expired.
    async fn get(&self, key: &str) -> BucketResult<OperationResult>;

    /// Reads a document and resets its expiry to `now + expiration`.
    ///
    /// A zero or negative `expiration` clears the expiry. The document's CAS moves forward
    /// by one and the new CAS is reported.
    async fn get_and_touch(&self, key: &str, expiration: Duration) -> BucketResult<OperationResult>;

    /// Resets a document's expiry like [`get_and_touch`](Self::get_and_touch), without
    /// returning the content.
    async fn touch(&self, key: &str, expiration: Duration) -> BucketResult<OperationResult<()>>;

    /// Creates a document. Fails with `KeyExists` if a live document is already stored.
    async fn insert(
        &self,
        key: &str,
        content: Content,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>>;

    /// Replaces a live document, subject to the optional CAS check.
    async fn replace(
        &self,
        key: &str,
        content: Content,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>>;

    /// Removes a live document, subject to the optional CAS check.
    async fn remove(&self, key: &str, options: MutationOptions) -> BucketResult<OperationResult<()>>;

    /// Creates or replaces a document. Only a CAS mismatch makes it fail.
    async fn upsert(
        &self,
        key: &str,
        content: Content,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>>;

    /// Tears the backend down. Subsequent calls fail.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> BucketResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> BucketBackend for &B
where
    B: BucketBackend,
{
    fn name(&self) -> &str {
        (*self).name()
    }

    async fn exists(&self, key: &str) -> BucketResult<bool> {
        (*self).exists(key).await
    }

    async fn get(&self, key: &str) -> BucketResult<OperationResult> {
        (*self).get(key).await
    }

    async fn get_and_touch(&self, key: &str, expiration: Duration) -> BucketResult<OperationResult> {
        (*self)
            .get_and_touch(key, expiration)
            .await
    }

    async fn touch(&self, key: &str, expiration: Duration) -> BucketResult<OperationResult<()>> {
        (*self).touch(key, expiration).await
    }

    async fn insert(
        &self,
        key: &str,
        content: Content,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        (*self)
            .insert(key, content, options)
            .await
    }

    async fn replace(
        &self,
        key: &str,
        content: Content,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        (*self)
            .replace(key, content, options)
            .await
    }

    async fn remove(&self, key: &str, options: MutationOptions) -> BucketResult<OperationResult<()>> {
        (*self).remove(key, options).await
    }

    async fn upsert(
        &self,
        key: &str,
        content: Content,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        (*self)
            .upsert(key, content, options)
            .await
    }
}

/// Factory trait for creating backend instances.
#[async_trait]
pub trait BucketBackendBuilder {
    type Backend: BucketBackend;

    async fn build(self) -> BucketResult<Self::Backend>;
}
