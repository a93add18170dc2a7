//! Named metric registries and the manager that owns them.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                           MetricManager                              │
//! │                                                                      │
//! │   registries: RwLock<FxHashMap<String, Arc<MetricRegistry>>>         │
//! │   beans:      RwLock<FxHashMap<String, Vec<BeanDescriptor>>>         │
//! │                                                                      │
//! │   registry("node") ──► Arc<MetricRegistry>  (created on first use)   │
//! │                                                                      │
//! │   ┌──────────────────────────────────────────────────────────────┐   │
//! │   │ MetricRegistry "node"                                        │   │
//! │   │   gauges: RwLock<BTreeMap<full name, Gauge>>                 │   │
//! │   │     "CACHE.core.fieldCache" ─► Gauge { collector,            │   │
//! │   │                                         expose_detail }      │   │
//! │   └──────────────────────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Report paths
//!
//! | Path                   | Gauge with `expose_detail` | Other gauges     |
//! |------------------------|----------------------------|------------------|
//! | [`ReportPath::Scrape`]   | `collect(false)`           | `collect(false)` |
//! | [`ReportPath::Detailed`] | `collect(true)`            | `collect(false)` |
//!
//! Locks are released before any collector runs, so a slow collector never
//! blocks registration or other reports.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::error::IntrospectError;
use crate::metrics::traits::{Category, InfoBean, MetricsCollector};
use crate::metrics::value::MetricsMap;

/// Which consumer is asking for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPath {
    /// Periodic scrape; always terse.
    Scrape,
    /// Explicit attribute access; detail-capable gauges report everything.
    Detailed,
}

/// Identity of a registered bean, as shown in introspection listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanDescriptor {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub metric_names: Vec<String>,
}

#[derive(Clone)]
struct Gauge {
    collector: Arc<dyn MetricsCollector>,
    expose_detail: bool,
}

/// Composes `category.scope.metric`, skipping empty segments.
pub fn full_metric_name(category: Category, scope: &str, metric_name: &str) -> String {
    [category.as_str(), scope, metric_name]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(".")
}

/// A named set of lazily evaluated gauges.
pub struct MetricRegistry {
    name: String,
    gauges: RwLock<BTreeMap<String, Gauge>>,
}

impl std::fmt::Debug for MetricRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricRegistry")
            .field("name", &self.name)
            .field("gauges", &self.names())
            .finish()
    }
}

impl MetricRegistry {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gauges: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered metric names in lexical order.
    pub fn names(&self) -> Vec<String> {
        self.gauges.read().keys().cloned().collect()
    }

    /// Whether `metric` asked to be invoked with detail on the detailed path.
    pub fn exposes_detail(&self, metric: &str) -> Option<bool> {
        self.gauges.read().get(metric).map(|g| g.expose_detail)
    }

    /// Invokes a single gauge. Returns `None` for unknown names.
    pub fn collect(
        &self,
        metric: &str,
        detailed: bool,
    ) -> Option<Result<MetricsMap, IntrospectError>> {
        let collector = self.gauges.read().get(metric).map(|g| Arc::clone(&g.collector))?;
        Some(collector.collect(detailed))
    }

    /// Invokes every gauge for the given path.
    ///
    /// A failing gauge yields an `Err` in its slot and does not affect the
    /// others.
    pub fn report(
        &self,
        path: ReportPath,
    ) -> Vec<(String, Result<MetricsMap, IntrospectError>)> {
        let gauges: Vec<(String, Gauge)> = self
            .gauges
            .read()
            .iter()
            .map(|(name, gauge)| (name.clone(), gauge.clone()))
            .collect();

        gauges
            .into_iter()
            .map(|(name, gauge)| {
                let detailed = path == ReportPath::Detailed && gauge.expose_detail;
                let result = gauge.collector.collect(detailed);
                if let Err(err) = &result {
                    warn!(
                        registry = %self.name,
                        metric = %name,
                        error = %err,
                        "metric collection failed"
                    );
                }
                (name, result)
            })
            .collect()
    }

    fn put(&self, metric: String, gauge: Gauge) {
        if self.gauges.write().insert(metric.clone(), gauge).is_some() {
            warn!(registry = %self.name, metric = %metric, "replaced existing metric");
        }
    }
}

/// Owner of all named registries.
#[derive(Debug, Default)]
pub struct MetricManager {
    registries: RwLock<FxHashMap<String, Arc<MetricRegistry>>>,
    beans: RwLock<FxHashMap<String, Vec<BeanDescriptor>>>,
}

impl MetricManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registry called `name`, creating it on first use.
    pub fn registry(&self, name: &str) -> Arc<MetricRegistry> {
        if let Some(existing) = self.registries.read().get(name) {
            return Arc::clone(existing);
        }
        let mut registries = self.registries.write();
        Arc::clone(
            registries
                .entry(name.to_string())
                .or_insert_with(|| {
                    debug!(registry = name, "created metric registry");
                    Arc::new(MetricRegistry::new(name))
                }),
        )
    }

    pub fn has_registry(&self, name: &str) -> bool {
        self.registries.read().contains_key(name)
    }

    /// Registry names in lexical order.
    pub fn registry_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registries.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Drops a registry together with its bean listing.
    pub fn remove_registry(&self, name: &str) -> bool {
        self.beans.write().remove(name);
        self.registries.write().remove(name).is_some()
    }

    /// Registers `collector` under `category.scope.metric_name` in
    /// `registry_name` and lists `bean` for that registry.
    ///
    /// An existing gauge with the same full name is replaced. Returns the
    /// full metric name.
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        &self,
        bean: &dyn InfoBean,
        registry_name: &str,
        collector: Arc<dyn MetricsCollector>,
        expose_detail: bool,
        metric_name: &str,
        category: Category,
        scope: &str,
    ) -> Result<String, IntrospectError> {
        if registry_name.is_empty() {
            return Err(IntrospectError::InvalidName("registry name is empty".into()));
        }
        if metric_name.is_empty() {
            return Err(IntrospectError::InvalidName("metric name is empty".into()));
        }

        let full_name = full_metric_name(category, scope, metric_name);
        self.registry(registry_name).put(
            full_name.clone(),
            Gauge {
                collector,
                expose_detail,
            },
        );
        self.record_bean(registry_name, bean, &full_name);

        debug!(
            registry = registry_name,
            metric = %full_name,
            expose_detail,
            bean = bean.name(),
            "registered metric"
        );
        Ok(full_name)
    }

    /// Beans listed for `registry_name`, in registration order.
    pub fn beans(&self, registry_name: &str) -> Vec<BeanDescriptor> {
        self.beans
            .read()
            .get(registry_name)
            .cloned()
            .unwrap_or_default()
    }

    fn record_bean(&self, registry_name: &str, bean: &dyn InfoBean, full_name: &str) {
        let mut beans = self.beans.write();
        let listed = beans.entry(registry_name.to_string()).or_default();
        let descriptor = match listed.iter_mut().position(|d| d.name == bean.name()) {
            Some(pos) => &mut listed[pos],
            None => {
                listed.push(BeanDescriptor {
                    name: bean.name().to_string(),
                    description: bean.description().to_string(),
                    category: bean.category(),
                    metric_names: Vec::new(),
                });
                let last = listed.len() - 1;
                &mut listed[last]
            },
        };
        if !descriptor.metric_names.iter().any(|n| n == full_name) {
            descriptor.metric_names.push(full_name.to_string());
        }
    }
}
