//! Concurrent in-memory stats source.
//!
//! [`UninvertedStatsRegistry`] tracks which uninverted fields are currently
//! cached and how large they are estimated to be. The owning cache calls
//! [`insert`](UninvertedStatsRegistry::insert) when it builds an entry and
//! [`remove`](UninvertedStatsRegistry::remove) /
//! [`purge_reader`](UninvertedStatsRegistry::purge_reader) when entries go
//! away; metric collection only reads.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                    UninvertedStatsRegistry                        │
//! │                                                                   │
//! │   len: AtomicUsize          (cheap count, no lock)                │
//! │                                                                   │
//! │   entries: RwLock<IndexMap<EntryKey, FieldCacheEntry>>            │
//! │            (insertion order; replacing a key keeps its slot)      │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `len` is written only while the write lock is held, so a reader that
//! takes the read lock sees a `len` equal to `entries.len()`. The lock-free
//! [`entry_count`](StatsSnapshotSource::entry_count) may observe a value from
//! just before or just after a concurrent mutation.
//!
//! The aggregate size is summed at read time and saturates at `u64::MAX`.

use std::sync::atomic::{AtomicUsize, Ordering};

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxBuildHasher;
use tracing::trace;

use crate::error::SourceError;
use crate::source::entry::{CacheKind, FieldCacheEntry};
use crate::source::snapshot::CacheStatsSnapshot;
use crate::source::traits::StatsSnapshotSource;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey {
    reader_key: String,
    field: String,
    kind: CacheKind,
}

impl EntryKey {
    fn of(entry: &FieldCacheEntry) -> Self {
        Self {
            reader_key: entry.reader_key.clone(),
            field: entry.field.clone(),
            kind: entry.kind,
        }
    }
}

type EntryMap = IndexMap<EntryKey, FieldCacheEntry, FxBuildHasher>;

fn total_bytes_of(entries: &EntryMap) -> u64 {
    entries
        .values()
        .fold(0u64, |acc, e| acc.saturating_add(e.estimated_bytes))
}

/// Thread-safe registry of cached uninverted fields.
#[derive(Debug, Default)]
pub struct UninvertedStatsRegistry {
    entries: RwLock<EntryMap>,
    len: AtomicUsize,
}

impl UninvertedStatsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry. Replacing an existing `(reader, field, kind)` keeps
    /// its original position and returns the previous descriptor.
    pub fn insert(&self, entry: FieldCacheEntry) -> Option<FieldCacheEntry> {
        let key = EntryKey::of(&entry);
        let mut entries = self.entries.write();
        let previous = entries.insert(key, entry);
        self.len.store(entries.len(), Ordering::Release);
        previous
    }

    /// Drops a single entry.
    pub fn remove(
        &self,
        reader_key: &str,
        field: &str,
        kind: CacheKind,
    ) -> Option<FieldCacheEntry> {
        let key = EntryKey {
            reader_key: reader_key.to_string(),
            field: field.to_string(),
            kind,
        };
        let mut entries = self.entries.write();
        let removed = entries.shift_remove(&key)?;
        self.len.store(entries.len(), Ordering::Release);
        Some(removed)
    }

    /// Drops every entry built from `reader_key`. Returns how many were removed.
    pub fn purge_reader(&self, reader_key: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| key.reader_key != reader_key);
        let purged = before - entries.len();
        self.len.store(entries.len(), Ordering::Release);
        trace!(reader_key, purged, "purged field cache entries");
        purged
    }

    /// Removes all entries.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.clear();
        self.len.store(0, Ordering::Release);
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of estimated bytes across all entries, saturating at `u64::MAX`.
    pub fn total_bytes(&self) -> u64 {
        total_bytes_of(&self.entries.read())
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> Vec<FieldCacheEntry> {
        self.entries.read().values().cloned().collect()
    }
}

impl StatsSnapshotSource for UninvertedStatsRegistry {
    fn entry_count(&self) -> usize {
        self.len()
    }

    fn snapshot(&self) -> Result<CacheStatsSnapshot, SourceError> {
        let entries = self.entries.read();
        let described = entries.values().map(FieldCacheEntry::describe).collect();
        Ok(CacheStatsSnapshot::new(described, total_bytes_of(&entries)))
    }
}
