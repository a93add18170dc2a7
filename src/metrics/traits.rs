//! # Metrics Trait Hierarchy
//!
//! Collection, identity, and registration are split into small traits so a
//! bean can be reported by any manager without knowing how reports are
//! transported.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────┐        ┌──────────────────────────┐
//!   │        InfoBean          │        │     MetricProducer       │
//!   │  name/description/       │        │  initialize_metrics()    │
//!   │  category/metric_names   │        │  metric_registry()       │
//!   └────────────┬─────────────┘        └────────────┬─────────────┘
//!                │                                   │
//!                └───────────────┬───────────────────┘
//!                                ▼
//!                        ┌───────────────┐   register(collector)   ┌───────────────┐
//!                        │ FieldCacheBean│ ──────────────────────► │ MetricManager │
//!                        └───────────────┘                         └───────┬───────┘
//!                                                                          │ report(path)
//!                                                                          ▼
//!                                                              ┌────────────────────────┐
//!                                                              │   MetricsCollector     │
//!                                                              │   collect(detailed)    │
//!                                                              └────────────────────────┘
//! ```
//!
//! ## Design Goals
//! - **Pull-based**: collectors compute a fresh [`MetricsMap`] on every call
//!   and retain nothing between calls.
//! - **Shared across threads**: collectors are `Send + Sync` and are invoked
//!   through `&self` from any reporting thread.

use std::fmt;
use std::sync::Arc;

use crate::error::IntrospectError;
use crate::metrics::manager::{MetricManager, MetricRegistry};
use crate::metrics::value::MetricsMap;

/// Coarse grouping used when listing beans and composing metric names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Core,
    Cache,
    Query,
    Update,
    Searcher,
    Index,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Core => "CORE",
            Category::Cache => "CACHE",
            Category::Query => "QUERY",
            Category::Update => "UPDATE",
            Category::Searcher => "SEARCHER",
            Category::Index => "INDEX",
            Category::Other => "OTHER",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static identity of an introspectable component.
pub trait InfoBean {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn category(&self) -> Category;

    /// Full names of the metrics this bean has registered.
    fn metric_names(&self) -> Vec<String>;
}

/// Lazily evaluated metrics, invoked by a manager whenever a report is built.
pub trait MetricsCollector: Send + Sync {
    fn collect(&self, detailed: bool) -> Result<MetricsMap, IntrospectError>;
}

impl<F> MetricsCollector for F
where
    F: Fn(bool) -> Result<MetricsMap, IntrospectError> + Send + Sync,
{
    fn collect(&self, detailed: bool) -> Result<MetricsMap, IntrospectError> {
        self(detailed)
    }
}

/// A component that registers its metrics with a [`MetricManager`].
pub trait MetricProducer {
    fn initialize_metrics(
        &mut self,
        manager: &MetricManager,
        registry_name: &str,
        scope: &str,
    ) -> Result<(), IntrospectError>;

    /// Registry handle obtained during initialization.
    fn metric_registry(&self) -> Option<Arc<MetricRegistry>>;
}
