//! Typed, client-facing facade over a [`BucketBackend`].
//!
//! [`DocumentBucket`] is what test code talks to. It forwards every call to the backend's
//! primitive operations, converting between concrete Rust types and type-erased
//! [`Content`](crate::document::Content), and adds the conveniences a real client offers:
//! [`Document`] values, bulk operations, and explicit [`BucketError::Unsupported`]
//! answers for the parts of the client surface that have no in-memory counterpart.
//!
//! # Example
//!
//! ```ignore
//! use mockbucket::{prelude::*, memory::InMemoryBucket};
//!
//! #[tokio::main]
//! async fn main() {
//!     let bucket = DocumentBucket::new(InMemoryBucket::builder().build().await.unwrap());
//!
//!     bucket.insert("airline_10", "40-Mile Air".to_string(), MutationOptions::new()).await.unwrap();
//!
//!     let result = bucket.get::<String>("airline_10").await.unwrap();
//!     assert_eq!(result.value.as_deref().map(String::as_str), Some("40-Mile Air"));
//! }
//! ```

use chrono::Duration;
use futures::future::join_all;
use serde_json::Value;
use std::{any::Any, collections::HashMap, sync::Arc};
use tracing::debug;

use crate::{
    backend::BucketBackend,
    cas::Cas,
    document::downcast_content,
    error::{BucketError, BucketResult},
    options::MutationOptions,
    result::OperationResult,
};

/// A typed document as a client sees it: key, version and content.
///
/// `expiration` is a relative duration applied when the document is written back with
/// [`DocumentBucket::upsert_document`] or [`DocumentBucket::replace_document`].
#[derive(Debug)]
pub struct Document<T> {
    pub id: String,
    pub cas: Cas,
    pub expiration: Option<Duration>,
    pub content: Arc<T>,
}

impl<T> Document<T> {
    /// A new document with no CAS and no expiration.
    pub fn new(id: impl Into<String>, content: T) -> Self {
        Self {
            id: id.into(),
            cas: Cas::NONE,
            expiration: None,
            content: Arc::new(content),
        }
    }

    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = Some(expiration);
        self
    }
}

impl<T> Clone for Document<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            cas: self.cas,
            expiration: self.expiration,
            content: self.content.clone(),
        }
    }
}

/// Results of a bulk operation, one independent entry per key.
pub type BulkResults<T> = HashMap<String, BucketResult<OperationResult<T>>>;

/// A typed bucket bound to a specific backend implementation.
#[derive(Debug)]
pub struct DocumentBucket<B: BucketBackend> {
    backend: B,
}

impl<B: BucketBackend> DocumentBucket<B> {
    /// Creates a new facade over `backend`.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The underlying backend, for seeding helpers and inspection.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn name(&self) -> &str {
        self.backend.name()
    }

    /// Returns `true` if `key` holds a live document.
    pub async fn exists(&self, key: &str) -> BucketResult<bool> {
        self.backend.exists(key).await
    }

    /// Reads the document under `key` as a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`BucketError::ContentType`] if the document holds some other type.
    pub async fn get<T: Any + Send + Sync>(&self, key: &str) -> BucketResult<OperationResult<Arc<T>>> {
        self.backend
            .get(key)
            .await?
            .try_map_value(|content| downcast_content::<T>(key, content))
    }

    /// Reads the document under `key` and resets its expiry.
    pub async fn get_and_touch<T: Any + Send + Sync>(
        &self,
        key: &str,
        expiration: Duration,
    ) -> BucketResult<OperationResult<Arc<T>>> {
        self.backend
            .get_and_touch(key, expiration)
            .await?
            .try_map_value(|content| downcast_content::<T>(key, content))
    }

    /// Resets the expiry of the document under `key`.
    pub async fn touch(&self, key: &str, expiration: Duration) -> BucketResult<OperationResult<()>> {
        self.backend.touch(key, expiration).await
    }

    pub async fn insert<T: Any + Send + Sync>(
        &self,
        key: &str,
        value: T,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        self.insert_arc(key, Arc::new(value), options).await
    }

    /// Inserts an already shared value; later reads return this same `Arc`.
    pub async fn insert_arc<T: Any + Send + Sync>(
        &self,
        key: &str,
        value: Arc<T>,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        self.backend.insert(key, value, options).await
    }

    pub async fn replace<T: Any + Send + Sync>(
        &self,
        key: &str,
        value: T,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        self.replace_arc(key, Arc::new(value), options).await
    }

    pub async fn replace_arc<T: Any + Send + Sync>(
        &self,
        key: &str,
        value: Arc<T>,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        self.backend.replace(key, value, options).await
    }

    pub async fn upsert<T: Any + Send + Sync>(
        &self,
        key: &str,
        value: T,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        self.upsert_arc(key, Arc::new(value), options).await
    }

    pub async fn upsert_arc<T: Any + Send + Sync>(
        &self,
        key: &str,
        value: Arc<T>,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        self.backend.upsert(key, value, options).await
    }

    pub async fn remove(&self, key: &str, options: MutationOptions) -> BucketResult<OperationResult<()>> {
        self.backend.remove(key, options).await
    }

    /// Reads the document under `key` as a [`Document`].
    pub async fn get_document<T: Any + Send + Sync>(
        &self,
        key: &str,
    ) -> BucketResult<OperationResult<Document<T>>> {
        let result = self.get::<T>(key).await?;
        let cas = result.cas;

        Ok(result.map_value(|content| Document {
            id: key.to_string(),
            cas,
            expiration: None,
            content,
        }))
    }

    /// Writes `document` back, checking its CAS unless it is [`Cas::NONE`].
    pub async fn upsert_document<T: Any + Send + Sync>(
        &self,
        document: &Document<T>,
    ) -> BucketResult<OperationResult<()>> {
        self.upsert_arc(&document.id, document.content.clone(), Self::document_options(document))
            .await
    }

    /// Replaces the stored document with `document`, checking its CAS unless it is
    /// [`Cas::NONE`].
    pub async fn replace_document<T: Any + Send + Sync>(
        &self,
        document: &Document<T>,
    ) -> BucketResult<OperationResult<()>> {
        self.replace_arc(&document.id, document.content.clone(), Self::document_options(document))
            .await
    }

    fn document_options<T>(document: &Document<T>) -> MutationOptions {
        MutationOptions {
            cas: document.cas,
            expiration: document.expiration,
            ..MutationOptions::default()
        }
    }

    /// Reads many keys concurrently.
    ///
    /// Each key is an independent call; one key failing has no effect on the others.
    pub async fn get_many<T, I, K>(&self, keys: I) -> BulkResults<Arc<T>>
    where
        T: Any + Send + Sync,
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let calls = keys
            .into_iter()
            .map(Into::into)
            .map(|key: String| async move {
                let result = self.get::<T>(&key).await;
                (key, result)
            })
            .collect::<Vec<_>>();
        debug!(bucket = self.name(), keys = calls.len(), "bulk get");

        join_all(calls).await.into_iter().collect()
    }

    /// Upserts many documents concurrently with the same options.
    pub async fn upsert_many<T, I, K>(&self, items: I, options: MutationOptions) -> BulkResults<()>
    where
        T: Any + Send + Sync,
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
    {
        let calls = items
            .into_iter()
            .map(|(key, value)| {
                let key: String = key.into();
                async move {
                    let result = self.upsert(&key, value, options).await;
                    (key, result)
                }
            })
            .collect::<Vec<_>>();
        debug!(bucket = self.name(), keys = calls.len(), "bulk upsert");

        join_all(calls).await.into_iter().collect()
    }

    /// Removes many keys concurrently with the same options.
    pub async fn remove_many<I, K>(&self, keys: I, options: MutationOptions) -> BulkResults<()>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let calls = keys
            .into_iter()
            .map(Into::into)
            .map(|key: String| async move {
                let result = self.remove(&key, options).await;
                (key, result)
            })
            .collect::<Vec<_>>();
        debug!(bucket = self.name(), keys = calls.len(), "bulk remove");

        join_all(calls).await.into_iter().collect()
    }

    /// N1QL-style queries are not emulated.
    pub async fn query(&self, _statement: &str) -> BucketResult<Vec<Value>> {
        unsupported("query")
    }

    /// Full-text search is not emulated.
    pub async fn search(&self, _index: &str, _query: Value) -> BucketResult<Vec<Value>> {
        unsupported("search")
    }

    /// Sub-document reads are not emulated.
    pub async fn lookup_in(&self, _key: &str, _paths: &[&str]) -> BucketResult<Vec<Value>> {
        unsupported("lookup_in")
    }

    /// Sub-document mutations are not emulated.
    pub async fn mutate_in(&self, _key: &str, _path: &str, _value: Value) -> BucketResult<OperationResult<()>> {
        unsupported("mutate_in")
    }

    /// Counters are not emulated.
    pub async fn increment(&self, _key: &str, _delta: u64) -> BucketResult<OperationResult<u64>> {
        unsupported("increment")
    }

    /// Counters are not emulated.
    pub async fn decrement(&self, _key: &str, _delta: u64) -> BucketResult<OperationResult<u64>> {
        unsupported("decrement")
    }

    /// Binary appends are not emulated.
    pub async fn append(&self, _key: &str, _value: &[u8]) -> BucketResult<OperationResult<()>> {
        unsupported("append")
    }

    /// Binary prepends are not emulated.
    pub async fn prepend(&self, _key: &str, _value: &[u8]) -> BucketResult<OperationResult<()>> {
        unsupported("prepend")
    }

    /// There are no replicas to observe.
    pub async fn observe(&self, _key: &str, _cas: Cas) -> BucketResult<OperationResult<()>> {
        unsupported("observe")
    }

    /// Shuts down the bucket and its backend.
    pub async fn shutdown(self) -> BucketResult<()> {
        self.backend.shutdown().await
    }
}

fn unsupported<T>(operation: &str) -> BucketResult<T> {
    debug!(operation, "unsupported operation requested");
    Err(BucketError::Unsupported(operation.to_string()))
}
