//! fieldcache-introspect: diagnostic introspection of an uninverted field
//! value cache through a metrics registry.
//!
//! See [`bean`] for the reporting rules and [`metrics::manager`] for how
//! reports are requested.

pub mod bean;
pub mod config;
pub mod error;
pub mod metrics;
pub mod prelude;
pub mod source;

pub use crate::bean::{FieldCacheBean, FieldCacheCollector};
pub use crate::config::FieldCacheBeanConfig;
pub use crate::metrics::manager::{MetricManager, MetricRegistry, ReportPath};
pub use crate::metrics::value::{MetricValue, MetricsMap};
pub use crate::source::registry::UninvertedStatsRegistry;
pub use crate::source::snapshot::CacheStatsSnapshot;
pub use crate::source::traits::StatsSnapshotSource;
