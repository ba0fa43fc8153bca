//! Stored document records and the factory that creates them.
//!
//! A bucket holds heterogeneous documents, so content is type-erased as [`Content`], an
//! `Arc<dyn Any>`. Reads hand back the same `Arc` that was stored, which lets callers
//! compare payloads by identity with [`Arc::ptr_eq`] and downcast to the concrete type
//! when they need it.

use chrono::{DateTime, Duration, Utc};
use std::{any::Any, fmt, sync::Arc};

use crate::{
    cas::Cas,
    clock::ClockRef,
    error::{BucketError, BucketResult},
};

/// Type-erased document payload.
pub type Content = Arc<dyn Any + Send + Sync>;

/// Wraps a value as document content.
pub fn into_content<T: Any + Send + Sync>(value: T) -> Content {
    Arc::new(value)
}

/// Recovers the concrete type of a payload read from `key`.
///
/// # Errors
///
/// Returns [`BucketError::ContentType`] if the payload holds some other type.
pub fn downcast_content<T: Any + Send + Sync>(key: &str, content: Content) -> BucketResult<Arc<T>> {
    content
        .downcast::<T>()
        .map_err(|_| BucketError::ContentType {
            key: key.to_string(),
            expected: std::any::type_name::<T>(),
        })
}

/// A stored document: content, version stamp and optional absolute expiry.
///
/// Records are never mutated in place. Every successful write replaces the record in its
/// slot with a new one built by a [`RecordFactory`].
#[derive(Clone)]
pub struct DocumentRecord {
    content: Content,
    cas: Cas,
    expires_at: Option<DateTime<Utc>>,
}

impl DocumentRecord {
    pub fn new(content: Content, cas: Cas, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { content, cas, expires_at }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn cas(&self) -> Cas {
        self.cas
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the record has lapsed at `now`.
    ///
    /// Expiry is strict: a record expiring at `t` is still visible at exactly `t`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if now > expires_at)
    }

    /// Attempts to view the content as a `T`.
    pub fn content_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.content.clone().downcast::<T>().ok()
    }
}

impl fmt::Debug for DocumentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentRecord")
            .field("content", &format_args!("<{:p}>", Arc::as_ptr(&self.content)))
            .field("cas", &self.cas)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Builds [`DocumentRecord`]s, turning relative expirations into absolute timestamps.
#[derive(Debug, Clone)]
pub struct RecordFactory {
    clock: ClockRef,
    default_expiration: Option<Duration>,
}

impl RecordFactory {
    /// Creates a factory reading time from `clock`, with no default expiration.
    pub fn new(clock: ClockRef) -> Self {
        Self {
            clock,
            default_expiration: None,
        }
    }

    /// Sets the expiration applied when a mutation does not specify one.
    pub fn with_default_expiration(mut self, expiration: Option<Duration>) -> Self {
        self.default_expiration = expiration;
        self
    }

    pub fn clock(&self) -> &ClockRef {
        &self.clock
    }

    /// Reads the clock once. Callers pass the reading on to the builder methods below so
    /// that one operation sees one instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Resolves a relative expiration against `now`.
    ///
    /// `None` falls back to the default expiration. A zero or negative duration means
    /// "never expires", as does a duration too large to represent.
    pub fn resolve_expiration(&self, expiration: Option<Duration>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let expiration = expiration.or(self.default_expiration)?;

        if expiration <= Duration::zero() {
            return None;
        }

        now.checked_add_signed(expiration)
    }

    /// A brand new record at [`Cas::SEED`].
    pub fn create(&self, content: Content, expiration: Option<Duration>, now: DateTime<Utc>) -> DocumentRecord {
        DocumentRecord::new(content, Cas::SEED, self.resolve_expiration(expiration, now))
    }

    /// A record replacing `previous`, one version later.
    pub fn successor(
        &self,
        previous: &DocumentRecord,
        content: Content,
        expiration: Option<Duration>,
        now: DateTime<Utc>,
    ) -> DocumentRecord {
        DocumentRecord::new(content, previous.cas.next(), self.resolve_expiration(expiration, now))
    }

    /// `previous` with its expiry reset to `now + expiration`, one version later.
    ///
    /// Unlike mutations, a touch always carries an explicit expiration, so a zero
    /// duration clears the expiry instead of applying the default.
    pub fn touched(&self, previous: &DocumentRecord, expiration: Duration, now: DateTime<Utc>) -> DocumentRecord {
        DocumentRecord::new(
            previous.content.clone(),
            previous.cas.next(),
            self.resolve_expiration(Some(expiration), now),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};

    fn factory() -> (ManualClock, RecordFactory) {
        let clock = ManualClock::default();
        let factory = RecordFactory::new(Arc::new(clock.clone()));
        (clock, factory)
    }

    #[test]
    fn expiry_is_strictly_after_the_timestamp() {
        let (clock, factory) = factory();
        let record = factory.create(into_content(1u8), Some(Duration::seconds(10)), clock.now());
        let expires_at = clock.now() + Duration::seconds(10);

        assert_eq!(record.expires_at(), Some(expires_at));
        assert!(!record.is_expired(expires_at));
        assert!(record.is_expired(expires_at + Duration::nanoseconds(1)));
    }

    #[test]
    fn non_positive_expiration_never_expires() {
        let (clock, factory) = factory();
        let zero = factory.create(into_content(()), Some(Duration::zero()), clock.now());
        let negative = factory.create(into_content(()), Some(Duration::seconds(-3)), clock.now());

        clock.advance(Duration::days(3650));
        assert_eq!(zero.expires_at(), None);
        assert_eq!(negative.expires_at(), None);
        assert!(!zero.is_expired(clock.now()));
    }

    #[test]
    fn default_expiration_applies_only_when_unspecified() {
        let (clock, factory) = factory();
        let factory = factory.with_default_expiration(Some(Duration::minutes(1)));

        let defaulted = factory.create(into_content(()), None, clock.now());
        let explicit = factory.create(into_content(()), Some(Duration::zero()), clock.now());

        assert_eq!(defaulted.expires_at(), Some(clock.now() + Duration::minutes(1)));
        assert_eq!(explicit.expires_at(), None);
    }

    #[test]
    fn successors_and_touches_bump_the_version() {
        let (clock, factory) = factory();
        let first = factory.create(into_content("a"), None, clock.now());
        assert_eq!(first.cas(), Cas::SEED);

        let second = factory.successor(&first, into_content("b"), None, clock.now());
        assert_eq!(second.cas(), Cas::new(101));

        let touched = factory.touched(&second, Duration::seconds(2), clock.now());
        assert_eq!(touched.cas(), Cas::new(102));
        assert!(Arc::ptr_eq(touched.content(), second.content()));
        assert_eq!(touched.expires_at(), Some(clock.now() + Duration::seconds(2)));

        let cleared = factory.touched(&touched, Duration::zero(), clock.now());
        assert_eq!(cleared.expires_at(), None);
    }

    #[test]
    fn expiration_resolves_against_the_given_instant() {
        let (clock, factory) = factory();
        let taken = clock.now();
        clock.advance(Duration::hours(1));

        let record = factory.create(into_content(()), Some(Duration::seconds(5)), taken);
        assert_eq!(record.expires_at(), Some(taken + Duration::seconds(5)));
        assert_eq!(factory.resolve_expiration(None, taken), None);
    }

    #[test]
    fn downcasting_reports_the_expected_type() {
        let content = into_content(42u32);
        assert_eq!(*downcast_content::<u32>("n", content.clone()).unwrap(), 42);

        let err = downcast_content::<String>("n", content).unwrap_err();
        assert!(matches!(err, BucketError::ContentType { ref key, .. } if key == "n"));
    }
}
