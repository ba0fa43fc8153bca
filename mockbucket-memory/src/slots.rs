//! Concurrent key to record map with an atomic read-decide-write primitive.
//!
//! Slots live in a sharded [`DashMap`]. [`SlotMap::atomic_update`] takes the entry for a
//! key, which holds that shard's write lock until the callback's decision has been
//! applied, so no other update or removal on the same key can interleave. Keys in other
//! shards are unaffected.
//!
//! A cleared slot is simply absent from the map; there is no separate tombstone value.

use chrono::{DateTime, Utc};
use dashmap::{DashMap, mapref::entry::Entry};

use mockbucket_core::document::DocumentRecord;

/// What an update callback wants done with the slot.
#[derive(Debug)]
pub enum Transition<R> {
    /// Store the record and return `R`.
    Write(DocumentRecord, R),
    /// Clear the slot and return `R`.
    Clear(R),
    /// Leave the slot untouched (an expired record stays in place) and return `R`.
    Keep(R),
}

/// Thread-safe mapping from document key to its current record.
#[derive(Debug, Default)]
pub struct SlotMap {
    slots: DashMap<String, DocumentRecord>,
}

impl SlotMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with room for at least `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: DashMap::with_capacity(capacity),
        }
    }

    /// Snapshot of the raw slot, expired or not.
    pub fn try_get(&self, key: &str) -> Option<DocumentRecord> {
        self.slots
            .get(key)
            .map(|slot| slot.value().clone())
    }

    /// Stores `record` unconditionally.
    pub fn put(&self, key: impl Into<String>, record: DocumentRecord) {
        self.slots.insert(key.into(), record);
    }

    /// Atomically inspects and updates the slot for `key`.
    ///
    /// `clock` is read exactly once, after the key's lock is held, and that reading is
    /// both the instant expiry is judged against and the one handed to the callbacks.
    /// `not_found` runs when the slot is empty or holds a record expired at that instant;
    /// `found` runs with the live record otherwise. The returned [`Transition`] is applied
    /// before the lock is released.
    ///
    /// The callbacks run under the shard lock and must not call back into this map.
    pub fn atomic_update<R>(
        &self,
        key: &str,
        clock: impl FnOnce() -> DateTime<Utc>,
        not_found: impl FnOnce(DateTime<Utc>) -> Transition<R>,
        found: impl FnOnce(&DocumentRecord, DateTime<Utc>) -> Transition<R>,
    ) -> R {
        match self.slots.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let now = clock();
                let transition = if entry.get().is_expired(now) {
                    not_found(now)
                } else {
                    found(entry.get(), now)
                };

                match transition {
                    Transition::Write(record, result) => {
                        entry.insert(record);
                        result
                    }
                    Transition::Clear(result) => {
                        entry.remove();
                        result
                    }
                    Transition::Keep(result) => result,
                }
            }
            Entry::Vacant(entry) => match not_found(clock()) {
                Transition::Write(record, result) => {
                    entry.insert(record);
                    result
                }
                Transition::Clear(result) | Transition::Keep(result) => result,
            },
        }
    }

    /// Clears the slot for `key`, returning whether anything was there.
    pub fn remove(&self, key: &str) -> bool {
        self.slots.remove(key).is_some()
    }

    /// Clears every slot.
    pub fn clear(&self) {
        self.slots.clear();
    }

    /// Number of occupied slots, including expired records not yet overwritten.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is occupied, counting expired records.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Key-sorted copies of every record still live at `now`.
    pub fn live_at(&self, now: DateTime<Utc>) -> Vec<(String, DocumentRecord)> {
        let mut live = self
            .slots
            .iter()
            .filter(|slot| !slot.value().is_expired(now))
            .map(|slot| (slot.key().clone(), slot.value().clone()))
            .collect::<Vec<_>>();

        live.sort_by(|a, b| a.0.cmp(&b.0));
        live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use mockbucket_core::{cas::Cas, document::into_content};

    fn record(cas: u64, expires_at: Option<DateTime<Utc>>) -> DocumentRecord {
        DocumentRecord::new(into_content(cas), Cas::new(cas), expires_at)
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::default()
    }

    #[test]
    fn vacant_slot_runs_not_found_and_writes() {
        let slots = SlotMap::new();
        let outcome = slots.atomic_update(
            "k",
            epoch,
            |_| Transition::Write(record(100, None), "created"),
            |_, _| Transition::Keep("found"),
        );

        assert_eq!(outcome, "created");
        assert_eq!(slots.try_get("k").map(|r| r.cas()), Some(Cas::SEED));
    }

    #[test]
    fn vacant_slot_is_not_created_on_failure() {
        let slots = SlotMap::new();
        slots.atomic_update("k", epoch, |_| Transition::Keep(()), |_, _| Transition::Keep(()));
        slots.atomic_update("k", epoch, |_| Transition::Clear(()), |_, _| Transition::Keep(()));

        assert!(slots.is_empty());
    }

    #[test]
    fn live_slot_runs_found() {
        let slots = SlotMap::new();
        slots.put("k", record(100, None));

        let seen = slots.atomic_update(
            "k",
            epoch,
            |_| Transition::Keep(None),
            |current, _| Transition::Write(record(current.cas().next().value(), None), Some(current.cas())),
        );

        assert_eq!(seen, Some(Cas::SEED));
        assert_eq!(slots.try_get("k").map(|r| r.cas()), Some(Cas::new(101)));
    }

    #[test]
    fn expired_slot_is_treated_as_absent_but_kept_on_failure() {
        let slots = SlotMap::new();
        let expires_at = epoch() + Duration::seconds(1);
        slots.put("k", record(100, Some(expires_at)));

        let later = expires_at + Duration::seconds(1);
        let found = slots.atomic_update("k", || later, |_| Transition::Keep(false), |_, _| Transition::Keep(true));

        assert!(!found);
        assert_eq!(slots.len(), 1, "failed updates leave the expired record in place");
        assert!(slots.live_at(later).is_empty());

        slots.atomic_update("k", || later, |_| Transition::Write(record(100, None), ()), |_, _| Transition::Keep(()));
        assert_eq!(slots.live_at(later).len(), 1);
    }

    #[test]
    fn clock_is_read_once_and_shared_with_the_callback() {
        let slots = SlotMap::new();
        let expires_at = epoch() + Duration::seconds(1);
        slots.put("k", record(100, Some(expires_at)));

        let mut reads = 0;
        let seen = slots.atomic_update(
            "k",
            || {
                reads += 1;
                expires_at + Duration::seconds(1)
            },
            |now| Transition::Keep(Some(now)),
            |_, _| Transition::Keep(None),
        );

        assert_eq!(reads, 1);
        assert_eq!(seen, Some(expires_at + Duration::seconds(1)));
    }

    #[test]
    fn clear_transition_removes_the_slot() {
        let slots = SlotMap::new();
        slots.put("k", record(100, None));

        slots.atomic_update("k", epoch, |_| Transition::Keep(()), |_, _| Transition::Clear(()));

        assert!(slots.try_get("k").is_none());
        assert!(!slots.remove("k"));
    }

    #[test]
    fn raw_reads_do_not_filter_expired_records() {
        let slots = SlotMap::new();
        slots.put("k", record(100, Some(epoch())));

        assert!(slots.try_get("k").is_some());
        assert!(slots.remove("k"));
    }

    #[test]
    fn live_at_is_sorted_and_filtered() {
        let slots = SlotMap::with_capacity(4);
        slots.put("b", record(100, None));
        slots.put("a", record(100, None));
        slots.put("c", record(100, Some(epoch())));

        let keys = slots
            .live_at(epoch() + Duration::seconds(1))
            .into_iter()
            .map(|(key, _)| key)
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

        slots.clear();
        assert!(slots.is_empty());
    }
}
