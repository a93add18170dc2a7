pub use crate::bean::FieldCacheBean;
pub use crate::config::FieldCacheBeanConfig;
pub use crate::error::{IntrospectError, SourceError};
pub use crate::metrics::manager::{MetricManager, ReportPath};
pub use crate::metrics::traits::{Category, InfoBean, MetricProducer, MetricsCollector};
pub use crate::metrics::value::{MetricValue, MetricsMap};
pub use crate::source::entry::{CacheKind, FieldCacheEntry};
pub use crate::source::registry::UninvertedStatsRegistry;
pub use crate::source::snapshot::CacheStatsSnapshot;
pub use crate::source::traits::StatsSnapshotSource;
