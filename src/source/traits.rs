//! Source traits consumed by metric collection.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────┐
//!   │     StatsSnapshotSource      │  Send + Sync, &self only
//!   │  entry_count()  -> usize     │  cheap, infallible
//!   │  snapshot()     -> Result<>  │  expensive, may fail
//!   └──────────────┬───────────────┘
//!                  │
//!        ┌─────────┴──────────┐
//!        ▼                    ▼
//!  UninvertedStatsRegistry   test fakes / owner-provided caches
//! ```
//!
//! Implementations own their synchronization. Callers may query from several
//! reporting threads at once and never hold a lock across the two calls, so
//! the count and the snapshot are not guaranteed to agree with each other.

use std::sync::Arc;

use crate::error::SourceError;
use crate::source::snapshot::CacheStatsSnapshot;

/// Read-only access to field cache statistics.
pub trait StatsSnapshotSource: Send + Sync {
    /// Number of cached entries right now.
    fn entry_count(&self) -> usize;

    /// Full per-entry breakdown plus aggregate estimated size.
    fn snapshot(&self) -> Result<CacheStatsSnapshot, SourceError>;
}

impl<S: StatsSnapshotSource + ?Sized> StatsSnapshotSource for Arc<S> {
    fn entry_count(&self) -> usize {
        (**self).entry_count()
    }

    fn snapshot(&self) -> Result<CacheStatsSnapshot, SourceError> {
        (**self).snapshot()
    }
}
