//! Introspection bean for the uninverted field value cache.
//!
//! [`FieldCacheBean`] reports the field cache through a [`MetricManager`].
//! Every collection decides how much detail to produce:
//!
//! ```text
//! collect(detailed)
//!   │
//!   ├─ detailed && !disable_entry_list && !disable_jmx_entry_list
//!   │     source.snapshot()            (expensive)
//!   │     entries_count = entries.len()
//!   │     total_size    = total estimated bytes
//!   │     entry#0..entry#n-1 = descriptors, in snapshot order
//!   │
//!   └─ otherwise
//!         source.entry_count()         (cheap)
//!         entries_count = count
//! ```
//!
//! The returned mapping is built fresh on every call; its key set depends on
//! which branch ran.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use fieldcache_introspect::prelude::*;
//!
//! let registry = Arc::new(UninvertedStatsRegistry::new());
//! registry.insert(FieldCacheEntry::new("seg_0", "price", CacheKind::Numeric, 2048));
//!
//! let manager = MetricManager::new();
//! let mut bean = FieldCacheBean::new(registry.clone(), FieldCacheBeanConfig::default());
//! bean.initialize_metrics(&manager, "node", "core").unwrap();
//!
//! let report = manager.registry("node").report(ReportPath::Detailed);
//! let (name, metrics) = &report[0];
//! assert_eq!(name, "CACHE.core.fieldCache");
//! let metrics = metrics.as_ref().unwrap();
//! assert_eq!(metrics.get("entries_count").and_then(MetricValue::as_number), Some(1));
//! assert_eq!(metrics.get("total_size").and_then(MetricValue::as_number), Some(2048));
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::config::FieldCacheBeanConfig;
use crate::error::IntrospectError;
use crate::metrics::manager::{MetricManager, MetricRegistry};
use crate::metrics::traits::{Category, InfoBean, MetricProducer, MetricsCollector};
use crate::metrics::value::MetricsMap;
use crate::source::traits::StatsSnapshotSource;

/// Logical metric name the bean registers under.
pub const FIELD_CACHE_METRIC: &str = "fieldCache";

pub const ENTRIES_COUNT_KEY: &str = "entries_count";
pub const TOTAL_SIZE_KEY: &str = "total_size";
pub const ENTRY_KEY_PREFIX: &str = "entry#";

const DESCRIPTION: &str = "Provides introspection of the field value cache";

/// Key for the entry at position `index` of a detailed report.
pub fn entry_key(index: usize) -> String {
    format!("{ENTRY_KEY_PREFIX}{index}")
}

/// The lazily evaluated part of the bean, shared with the metric registry.
pub struct FieldCacheCollector {
    source: Arc<dyn StatsSnapshotSource>,
    config: FieldCacheBeanConfig,
}

impl FieldCacheCollector {
    pub fn new(source: Arc<dyn StatsSnapshotSource>, config: FieldCacheBeanConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> FieldCacheBeanConfig {
        self.config
    }

    fn collect_detailed(&self) -> Result<MetricsMap, IntrospectError> {
        let snapshot = self.source.snapshot().map_err(|err| {
            warn!(error = %err, "field cache snapshot failed");
            err
        })?;

        let mut map = MetricsMap::with_capacity(snapshot.len() + 2);
        map.insert(ENTRIES_COUNT_KEY, snapshot.len());
        map.insert(TOTAL_SIZE_KEY, snapshot.total_size);
        for (i, entry) in snapshot.entries.into_iter().enumerate() {
            map.insert(entry_key(i), entry);
        }
        Ok(map)
    }

    fn collect_summary(&self) -> MetricsMap {
        let mut map = MetricsMap::with_capacity(1);
        map.insert(ENTRIES_COUNT_KEY, self.source.entry_count());
        map
    }
}

impl MetricsCollector for FieldCacheCollector {
    fn collect(&self, detailed: bool) -> Result<MetricsMap, IntrospectError> {
        let list_entries = detailed && self.config.entry_list_enabled();
        trace!(detailed, list_entries, "collecting field cache metrics");

        if list_entries {
            self.collect_detailed()
        } else {
            Ok(self.collect_summary())
        }
    }
}

/// Reports the field value cache through a metric manager.
pub struct FieldCacheBean {
    collector: Arc<FieldCacheCollector>,
    registry: Option<Arc<MetricRegistry>>,
    metric_names: BTreeSet<String>,
}

impl FieldCacheBean {
    pub fn new(source: Arc<dyn StatsSnapshotSource>, config: FieldCacheBeanConfig) -> Self {
        Self {
            collector: Arc::new(FieldCacheCollector::new(source, config)),
            registry: None,
            metric_names: BTreeSet::new(),
        }
    }

    pub fn config(&self) -> FieldCacheBeanConfig {
        self.collector.config()
    }

    /// Builds the current metrics mapping. See the module docs for the shape.
    pub fn collect(&self, detailed: bool) -> Result<MetricsMap, IntrospectError> {
        self.collector.collect(detailed)
    }
}

impl std::fmt::Debug for FieldCacheBean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCacheBean")
            .field("config", &self.config())
            .field("registry", &self.registry.as_ref().map(|r| r.name().to_string()))
            .field("metric_names", &self.metric_names)
            .finish()
    }
}

impl InfoBean for FieldCacheBean {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn category(&self) -> Category {
        Category::Cache
    }

    fn metric_names(&self) -> Vec<String> {
        self.metric_names.iter().cloned().collect()
    }
}

impl MetricProducer for FieldCacheBean {
    fn initialize_metrics(
        &mut self,
        manager: &MetricManager,
        registry_name: &str,
        scope: &str,
    ) -> Result<(), IntrospectError> {
        let collector: Arc<dyn MetricsCollector> = self.collector.clone();
        let full_name = manager.register(
            &*self,
            registry_name,
            collector,
            true,
            FIELD_CACHE_METRIC,
            Category::Cache,
            scope,
        )?;
        self.registry = Some(manager.registry(registry_name));
        self.metric_names.insert(full_name);
        Ok(())
    }

    fn metric_registry(&self) -> Option<Arc<MetricRegistry>> {
        self.registry.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::metrics::value::MetricValue;
    use crate::source::snapshot::CacheStatsSnapshot;

    struct FixedSource {
        count: usize,
        snapshot: CacheStatsSnapshot,
    }

    impl FixedSource {
        fn new(entries: &[&str], total_size: u64) -> Arc<Self> {
            Arc::new(Self {
                count: entries.len(),
                snapshot: CacheStatsSnapshot::new(
                    entries.iter().map(|e| e.to_string()).collect(),
                    total_size,
                ),
            })
        }
    }

    impl StatsSnapshotSource for FixedSource {
        fn entry_count(&self) -> usize {
            self.count
        }

        fn snapshot(&self) -> Result<CacheStatsSnapshot, SourceError> {
            Ok(self.snapshot.clone())
        }
    }

    struct BrokenSource;

    impl StatsSnapshotSource for BrokenSource {
        fn entry_count(&self) -> usize {
            7
        }

        fn snapshot(&self) -> Result<CacheStatsSnapshot, SourceError> {
            Err(SourceError::Unavailable("closed".into()))
        }
    }

    fn all_configs() -> [FieldCacheBeanConfig; 4] {
        [
            FieldCacheBeanConfig::new(false, false),
            FieldCacheBeanConfig::new(true, false),
            FieldCacheBeanConfig::new(false, true),
            FieldCacheBeanConfig::new(true, true),
        ]
    }

    #[test]
    fn detailed_lists_entries_in_order() {
        let bean = FieldCacheBean::new(
            FixedSource::new(&["f1", "f2"], 500),
            FieldCacheBeanConfig::default(),
        );
        let expected: MetricsMap = [
            ("entries_count", MetricValue::Number(2)),
            ("total_size", MetricValue::Number(500)),
            ("entry#0", MetricValue::Text("f1".into())),
            ("entry#1", MetricValue::Text("f2".into())),
        ]
        .into_iter()
        .collect();
        assert_eq!(bean.collect(true).unwrap(), expected);
    }

    #[test]
    fn summary_only_has_count() {
        for config in all_configs() {
            let bean = FieldCacheBean::new(FixedSource::new(&["a", "b", "c"], 9), config);
            let map = bean.collect(false).unwrap();
            assert_eq!(map.len(), 1);
            assert_eq!(
                map.get(ENTRIES_COUNT_KEY).and_then(MetricValue::as_number),
                Some(3)
            );
        }
    }

    #[test]
    fn any_disable_flag_forces_summary() {
        for config in &all_configs()[1..] {
            let bean = FieldCacheBean::new(FixedSource::new(&["a"], 10), *config);
            assert_eq!(bean.collect(true).unwrap(), bean.collect(false).unwrap());
        }
    }

    #[test]
    fn detailed_path_follows_entry_list_enabled() {
        for config in all_configs() {
            let bean = FieldCacheBean::new(FixedSource::new(&["a", "b"], 4), config);
            let map = bean.collect(true).unwrap();
            assert_eq!(map.contains_key(TOTAL_SIZE_KEY), config.entry_list_enabled());
            assert_eq!(map.contains_key("entry#1"), config.entry_list_enabled());
        }
    }

    #[test]
    fn empty_snapshot_reports_zeroes() {
        let bean = FieldCacheBean::new(FixedSource::new(&[], 0), FieldCacheBeanConfig::default());
        let map = bean.collect(true).unwrap();
        let expected: MetricsMap = [("entries_count", 0u64), ("total_size", 0u64)]
            .into_iter()
            .collect();
        assert_eq!(map, expected);
        assert!(!map.keys().any(|k| k.starts_with(ENTRY_KEY_PREFIX)));
    }

    #[test]
    fn snapshot_failure_propagates_on_detailed_path() {
        let bean = FieldCacheBean::new(Arc::new(BrokenSource), FieldCacheBeanConfig::default());
        let err = bean.collect(true).unwrap_err();
        assert_eq!(
            err,
            IntrospectError::Source(SourceError::Unavailable("closed".into()))
        );
    }

    #[test]
    fn snapshot_failure_is_not_consulted_on_summary_path() {
        let bean = FieldCacheBean::new(
            Arc::new(BrokenSource),
            FieldCacheBeanConfig::new(true, false),
        );
        let map = bean.collect(true).unwrap();
        assert_eq!(map.get(ENTRIES_COUNT_KEY).and_then(MetricValue::as_number), Some(7));
    }

    #[test]
    fn identity_fields() {
        let bean = FieldCacheBean::new(FixedSource::new(&[], 0), FieldCacheBeanConfig::default());
        assert!(bean.name().ends_with("FieldCacheBean"));
        assert_eq!(bean.description(), DESCRIPTION);
        assert_eq!(bean.category(), Category::Cache);
        assert!(bean.metric_names().is_empty());
        assert!(bean.metric_registry().is_none());
    }

    #[test]
    fn initialize_registers_single_detail_capable_metric() {
        let manager = MetricManager::new();
        let mut bean =
            FieldCacheBean::new(FixedSource::new(&["x"], 1), FieldCacheBeanConfig::default());
        bean.initialize_metrics(&manager, "node", "core").unwrap();

        assert_eq!(bean.metric_names(), vec!["CACHE.core.fieldCache".to_string()]);
        let registry = bean.metric_registry().expect("registry set");
        assert_eq!(registry.name(), "node");
        assert_eq!(registry.names(), bean.metric_names());
        assert_eq!(registry.exposes_detail("CACHE.core.fieldCache"), Some(true));

        let listed = manager.beans("node");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category, Category::Cache);
        assert_eq!(listed[0].metric_names, bean.metric_names());
    }

    #[test]
    fn initialize_with_empty_registry_name_fails_cleanly() {
        let manager = MetricManager::new();
        let mut bean =
            FieldCacheBean::new(FixedSource::new(&[], 0), FieldCacheBeanConfig::default());
        assert!(bean.initialize_metrics(&manager, "", "core").is_err());
        assert!(bean.metric_registry().is_none());
        assert!(bean.metric_names().is_empty());
    }

    #[test]
    fn entry_key_format() {
        assert_eq!(entry_key(0), "entry#0");
        assert_eq!(entry_key(999), "entry#999");
    }
}
