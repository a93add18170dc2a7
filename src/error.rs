//! Error types for fieldcache-introspect.
//!
//! ## Key Components
//!
//! - [`SourceError`]: Returned by a
//!   [`StatsSnapshotSource`](crate::source::traits::StatsSnapshotSource) when the
//!   expensive snapshot query cannot be served.
//! - [`IntrospectError`]: Returned by metric collection and registration.
//! - [`ConfigError`]: Returned when toggle configuration cannot be parsed.
//!
//! ## Example Usage
//!
//! ```
//! use fieldcache_introspect::error::{IntrospectError, SourceError};
//!
//! let err: IntrospectError = SourceError::Unavailable("cache closed".into()).into();
//! assert!(err.to_string().contains("cache closed"));
//! ```

use thiserror::Error;

// ---------------------------------------------------------------------------
// SourceError
// ---------------------------------------------------------------------------

/// Error raised by a stats source while producing a full snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The source could not produce a snapshot right now.
    #[error("field cache stats unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// IntrospectError
// ---------------------------------------------------------------------------

/// Error returned by metric collection and registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntrospectError {
    /// The stats source failed while serving a detailed collection.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A registry or metric name was rejected.
    #[error("invalid metric name: {0}")]
    InvalidName(String),
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when toggle configuration input cannot be parsed.
///
/// # Example
///
/// ```
/// use fieldcache_introspect::config::FieldCacheBeanConfig;
///
/// let err = FieldCacheBeanConfig::from_json("{ not json").unwrap_err();
/// assert!(err.to_string().starts_with("invalid field cache config"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field cache config: {0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- SourceError ------------------------------------------------------

    #[test]
    fn source_display_shows_reason() {
        let err = SourceError::Unavailable("reader closed".into());
        assert_eq!(
            err.to_string(),
            "field cache stats unavailable: reader closed"
        );
    }

    // -- IntrospectError --------------------------------------------------

    #[test]
    fn introspect_wraps_source_transparently() {
        let source = SourceError::Unavailable("x".into());
        let err = IntrospectError::from(source.clone());
        assert_eq!(err.to_string(), source.to_string());
        assert_eq!(err, IntrospectError::Source(source));
    }

    #[test]
    fn invalid_name_display() {
        let err = IntrospectError::InvalidName("registry name is empty".into());
        assert_eq!(
            err.to_string(),
            "invalid metric name: registry name is empty"
        );
    }

    #[test]
    fn introspect_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<IntrospectError>();
        assert_error::<SourceError>();
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_message_accessor() {
        let err = ConfigError::new("bad flag");
        assert_eq!(err.message(), "bad flag");
        assert_eq!(err.to_string(), "invalid field cache config: bad flag");
    }

    #[test]
    fn config_clone_and_eq() {
        let a = ConfigError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }
}
