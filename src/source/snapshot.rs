/// Point-in-time view of the field cache.
///
/// Only valid at the instant it was produced; the source may change right
/// after. `entries` keeps the source's enumeration order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub entries: Vec<String>,
    pub total_size: u64,
}

impl CacheStatsSnapshot {
    pub fn new(entries: Vec<String>, total_size: u64) -> Self {
        Self {
            entries,
            total_size,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
