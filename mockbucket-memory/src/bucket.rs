//! In-memory bucket implementation.
//!
//! [`InMemoryBucket`] implements the primitive operations synchronously on top of a
//! [`SlotMap`]. The [`BucketBackend`] implementation simply awaits nothing and forwards to
//! those synchronous methods, so callers using the async facade and callers poking the
//! bucket directly in test setup observe exactly the same state.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::{debug, info, trace, warn};

use mockbucket_core::{
    backend::{BucketBackend, BucketBackendBuilder},
    clock::{Clock, ClockRef, SystemClock},
    config::BucketConfig,
    document::{Content, DocumentRecord, RecordFactory},
    error::{BucketError, BucketResult, validate_key},
    options::MutationOptions,
    result::OperationResult,
    status::{Durability, ResponseStatus},
};

use crate::{
    slots::{SlotMap, Transition},
    view::ActiveEntries,
};

/// Thread-safe in-memory document bucket.
///
/// # Thread Safety
///
/// `InMemoryBucket` is cloneable and every clone shares the same slots, clock and
/// disposed flag. Mutations on one key are serialized by the slot map; mutations on
/// different keys proceed independently.
///
/// # Lifecycle
///
/// [`dispose`](Self::dispose) makes every primitive operation fail with
/// [`BucketError::Disposed`]. It does not clear the slots, and the seeding helpers
/// ([`put`](Self::put), [`try_get_raw`](Self::try_get_raw), [`remove_raw`](Self::remove_raw),
/// [`clear`](Self::clear)) keep working so that test fixtures can still inspect state.
///
/// # Example
///
/// ```ignore
/// use mockbucket_memory::InMemoryBucket;
/// use mockbucket_core::{document::into_content, options::MutationOptions, cas::Cas};
///
/// let bucket = InMemoryBucket::new();
/// let inserted = bucket.insert("hotel_1", into_content("Medway"), MutationOptions::new())?;
/// assert_eq!(inserted.cas, Cas::SEED);
/// # Ok::<(), mockbucket_core::error::BucketError>(())
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryBucket {
    name: Arc<str>,
    slots: Arc<SlotMap>,
    factory: RecordFactory,
    disposed: Arc<AtomicBool>,
}

impl Default for InMemoryBucket {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBucket {
    /// Creates an empty bucket named `default`, reading the system clock.
    pub fn new() -> Self {
        Self::from_parts(&BucketConfig::default(), Arc::new(SystemClock))
    }

    /// Creates an empty bucket reading time from `clock`.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self::from_parts(&BucketConfig::default(), Arc::new(clock))
    }

    /// Creates a builder for configuring a bucket.
    pub fn builder() -> InMemoryBucketBuilder {
        InMemoryBucketBuilder::default()
    }

    fn from_parts(config: &BucketConfig, clock: ClockRef) -> Self {
        Self {
            name: Arc::from(config.name.as_str()),
            slots: Arc::new(SlotMap::with_capacity(config.capacity)),
            factory: RecordFactory::new(clock).with_default_expiration(config.default_expiration()),
            disposed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The configured bucket name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The clock expiry is resolved and evaluated against.
    pub fn clock(&self) -> &ClockRef {
        self.factory.clock()
    }

    /// Marks the bucket as torn down. Idempotent.
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            info!(bucket = %self.name, "bucket disposed");
        }
    }

    /// Whether [`dispose`](Self::dispose) has been called on this bucket or any clone.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> BucketResult<()> {
        if self.is_disposed() {
            warn!(bucket = %self.name, "operation attempted on disposed bucket");
            return Err(BucketError::Disposed(self.name.to_string()));
        }

        Ok(())
    }

    fn precheck(&self, key: &str) -> BucketResult<()> {
        self.ensure_open()?;
        validate_key(key).inspect_err(|err| warn!(bucket = %self.name, error = %err, "rejected call"))
    }

    fn note_timeout(&self, key: &str, options: &MutationOptions) {
        if let Some(timeout) = options.timeout {
            trace!(bucket = %self.name, key, ?timeout, "timeout accepted but not enforced");
        }
    }

    fn log_outcome<T>(&self, operation: &'static str, result: &OperationResult<T>) {
        debug!(
            bucket = %self.name,
            key = %result.id,
            status = %result.status,
            cas = %result.cas,
            "{}",
            operation
        );
    }

    fn live(&self, key: &str, now: DateTime<Utc>) -> Option<DocumentRecord> {
        self.slots
            .try_get(key)
            .filter(|record| !record.is_expired(now))
    }

    /// Returns `true` if `key` holds a live, unexpired document.
    pub fn exists(&self, key: &str) -> BucketResult<bool> {
        self.precheck(key)?;

        Ok(self.live(key, self.factory.now()).is_some())
    }

    /// Reads a document without side effects.
    pub fn get(&self, key: &str) -> BucketResult<OperationResult> {
        self.precheck(key)?;

        let result = match self.live(key, self.factory.now()) {
            Some(record) => OperationResult::found(key, record.cas(), record.content().clone()),
            None => OperationResult::failed(key, ResponseStatus::KeyNotFound),
        };

        self.log_outcome("get", &result);
        Ok(result)
    }

    /// Reads a document and resets its expiry to `now + expiration`.
    pub fn get_and_touch(&self, key: &str, expiration: Duration) -> BucketResult<OperationResult> {
        self.precheck(key)?;

        let result = self.slots.atomic_update(
            key,
            || self.factory.now(),
            |_| Transition::Keep(OperationResult::failed(key, ResponseStatus::KeyNotFound)),
            |current, now| {
                let touched = self.factory.touched(current, expiration, now);
                let result = OperationResult::found(key, touched.cas(), touched.content().clone());

                Transition::Write(touched, result)
            },
        );

        self.log_outcome("get_and_touch", &result);
        Ok(result)
    }

    /// Resets a document's expiry to `now + expiration`.
    pub fn touch(&self, key: &str, expiration: Duration) -> BucketResult<OperationResult<()>> {
        self.precheck(key)?;

        let result = self.slots.atomic_update(
            key,
            || self.factory.now(),
            |_| Transition::Keep(OperationResult::failed(key, ResponseStatus::KeyNotFound)),
            |current, now| {
                let touched = self.factory.touched(current, expiration, now);
                let result = OperationResult::mutated(key, touched.cas(), Durability::Unspecified);

                Transition::Write(touched, result)
            },
        );

        self.log_outcome("touch", &result);
        Ok(result)
    }

    /// Creates a document if the key is absent or expired.
    pub fn insert(
        &self,
        key: &str,
        content: Content,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        self.precheck(key)?;
        self.note_timeout(key, &options);

        let result = self.slots.atomic_update(
            key,
            || self.factory.now(),
            |now| {
                let record = self.factory.create(content, options.expiration, now);
                let result = OperationResult::mutated(key, record.cas(), options.durability.outcome());

                Transition::Write(record, result)
            },
            |_, _| Transition::Keep(OperationResult::failed(key, ResponseStatus::KeyExists)),
        );

        self.log_outcome("insert", &result);
        Ok(result)
    }

    /// Replaces a live document, checking `options.cas` unless it is
    /// [`Cas::NONE`](mockbucket_core::cas::Cas::NONE).
    pub fn replace(
        &self,
        key: &str,
        content: Content,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        self.precheck(key)?;
        self.note_timeout(key, &options);

        let result = self.slots.atomic_update(
            key,
            || self.factory.now(),
            |_| Transition::Keep(OperationResult::failed(key, ResponseStatus::KeyNotFound)),
            |current, now| self.overwrite(key, current, content, &options, now),
        );

        self.log_outcome("replace", &result);
        Ok(result)
    }

    /// Removes a live document, checking `options.cas` unless it is
    /// [`Cas::NONE`](mockbucket_core::cas::Cas::NONE).
    ///
    /// On success the result carries the CAS of the removed document.
    pub fn remove(&self, key: &str, options: MutationOptions) -> BucketResult<OperationResult<()>> {
        self.precheck(key)?;
        self.note_timeout(key, &options);

        let result = self.slots.atomic_update(
            key,
            || self.factory.now(),
            |_| Transition::Keep(OperationResult::failed(key, ResponseStatus::KeyNotFound)),
            |current, _| {
                if !options.cas.permits(current.cas()) {
                    return Transition::Keep(OperationResult::failed(
                        key,
                        ResponseStatus::DocumentMutationDetected,
                    ));
                }

                Transition::Clear(OperationResult::mutated(
                    key,
                    current.cas(),
                    options.durability.outcome(),
                ))
            },
        );

        self.log_outcome("remove", &result);
        Ok(result)
    }

    /// Creates or replaces a document. Only a CAS mismatch on a live document fails.
    pub fn upsert(
        &self,
        key: &str,
        content: Content,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        self.precheck(key)?;
        self.note_timeout(key, &options);

        let created = content.clone();
        let result = self.slots.atomic_update(
            key,
            || self.factory.now(),
            |now| {
                let record = self.factory.create(created, options.expiration, now);
                let result = OperationResult::mutated(key, record.cas(), options.durability.outcome());

                Transition::Write(record, result)
            },
            |current, now| self.overwrite(key, current, content, &options, now),
        );

        self.log_outcome("upsert", &result);
        Ok(result)
    }

    /// Shared CAS-checked successor write used by replace and upsert.
    fn overwrite(
        &self,
        key: &str,
        current: &DocumentRecord,
        content: Content,
        options: &MutationOptions,
        now: DateTime<Utc>,
    ) -> Transition<OperationResult<()>> {
        if !options.cas.permits(current.cas()) {
            return Transition::Keep(OperationResult::failed(
                key,
                ResponseStatus::DocumentMutationDetected,
            ));
        }

        let record = self.factory.successor(current, content, options.expiration, now);
        let result = OperationResult::mutated(key, record.cas(), options.durability.outcome());

        Transition::Write(record, result)
    }

    /// Documents live right now, evaluated against a single clock reading.
    pub fn active_entries(&self) -> BucketResult<ActiveEntries> {
        self.ensure_open()?;

        let now = self.factory.now();
        Ok(ActiveEntries::new(now, self.slots.live_at(now)))
    }

    /// Stores `record` directly, bypassing CAS and expiry rules.
    pub fn put(&self, key: impl Into<String>, record: DocumentRecord) {
        self.slots.put(key, record);
    }

    /// The raw slot contents for `key`, even if expired.
    pub fn try_get_raw(&self, key: &str) -> Option<DocumentRecord> {
        self.slots.try_get(key)
    }

    /// Clears the slot for `key` unconditionally.
    pub fn remove_raw(&self, key: &str) -> bool {
        self.slots.remove(key)
    }

    /// Removes every document.
    pub fn clear(&self) {
        self.slots.clear();
    }

    /// Number of occupied slots, counting expired records that have not been overwritten.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

#[async_trait]
impl BucketBackend for InMemoryBucket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self, key: &str) -> BucketResult<bool> {
        InMemoryBucket::exists(self, key)
    }

    async fn get(&self, key: &str) -> BucketResult<OperationResult> {
        InMemoryBucket::get(self, key)
    }

    async fn get_and_touch(&self, key: &str, expiration: Duration) -> BucketResult<OperationResult> {
        InMemoryBucket::get_and_touch(self, key, expiration)
    }

    async fn touch(&self, key: &str, expiration: Duration) -> BucketResult<OperationResult<()>> {
        InMemoryBucket::touch(self, key, expiration)
    }

    async fn insert(
        &self,
        key: &str,
        content: Content,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        InMemoryBucket::insert(self, key, content, options)
    }

    async fn replace(
        &self,
        key: &str,
        content: Content,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        InMemoryBucket::replace(self, key, content, options)
    }

    async fn remove(&self, key: &str, options: MutationOptions) -> BucketResult<OperationResult<()>> {
        InMemoryBucket::remove(self, key, options)
    }

    async fn upsert(
        &self,
        key: &str,
        content: Content,
        options: MutationOptions,
    ) -> BucketResult<OperationResult<()>> {
        InMemoryBucket::upsert(self, key, content, options)
    }

    async fn shutdown(self) -> BucketResult<()> {
        self.dispose();

        Ok(())
    }
}

/// Builder for constructing [`InMemoryBucket`] instances.
///
/// # Example
///
/// ```ignore
/// use mockbucket_memory::InMemoryBucket;
/// use mockbucket_core::{backend::BucketBackendBuilder, clock::ManualClock};
///
/// #[tokio::main]
/// async fn main() {
///     let bucket = InMemoryBucket::builder()
///         .name("travel-sample")
///         .clock(ManualClock::default())
///         .build()
///         .await
///         .unwrap();
/// }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBucketBuilder {
    config: BucketConfig,
    clock: Option<ClockRef>,
}

impl InMemoryBucketBuilder {
    /// Replaces every configured setting with `config`.
    pub fn config(mut self, config: BucketConfig) -> Self {
        self.config = config;
        self
    }

    /// Name reported in logs and in [`BucketError::Disposed`].
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Initial capacity hint for the slot map.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Expiration applied to mutations that do not specify one.
    pub fn default_expiration_secs(mut self, secs: u32) -> Self {
        self.config.default_expiration_secs = secs;
        self
    }

    /// Reads time from `clock` instead of the system clock.
    pub fn clock(self, clock: impl Clock + 'static) -> Self {
        self.clock_ref(Arc::new(clock))
    }

    /// Uses an already shared clock.
    pub fn clock_ref(mut self, clock: ClockRef) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validates the configuration and creates the bucket.
    ///
    /// # Errors
    ///
    /// Returns [`BucketError::Configuration`] if the configuration is invalid.
    pub fn open(self) -> BucketResult<InMemoryBucket> {
        self.config.validate()?;

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock));
        let bucket = InMemoryBucket::from_parts(&self.config, clock);
        debug!(bucket = %bucket.name, capacity = self.config.capacity, "bucket opened");

        Ok(bucket)
    }
}

#[async_trait]
impl BucketBackendBuilder for InMemoryBucketBuilder {
    type Backend = InMemoryBucket;

    async fn build(self) -> BucketResult<Self::Backend> {
        self.open()
    }
}
