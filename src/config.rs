//! Toggle configuration for [`FieldCacheBean`](crate::bean::FieldCacheBean).
//!
//! Two independent switches decide whether a detailed collection may list
//! every cached entry:
//!
//! | Flag                      | Env key                              | Default |
//! |---------------------------|--------------------------------------|---------|
//! | `disable_entry_list`      | `FIELDCACHE_DISABLE_ENTRY_LIST`      | `false` |
//! | `disable_jmx_entry_list`  | `FIELDCACHE_DISABLE_ENTRY_LIST_JMX`  | `false` |
//!
//! The flags are resolved once by the owning bootstrap code and handed to the
//! bean constructor. Nothing in this crate re-reads them afterwards.
//!
//! ## Example
//!
//! ```
//! use fieldcache_introspect::config::FieldCacheBeanConfig;
//!
//! let config = FieldCacheBeanConfig::from_lookup(|key| match key {
//!     "FIELDCACHE_DISABLE_ENTRY_LIST_JMX" => Some("TRUE".to_string()),
//!     _ => None,
//! });
//! assert!(!config.disable_entry_list);
//! assert!(config.disable_jmx_entry_list);
//! assert!(!config.entry_list_enabled());
//! ```

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// Env key suppressing the per-entry breakdown on every path.
pub const DISABLE_ENTRY_LIST_KEY: &str = "FIELDCACHE_DISABLE_ENTRY_LIST";

/// Env key suppressing the per-entry breakdown on the detailed reporting path.
pub const DISABLE_JMX_ENTRY_LIST_KEY: &str = "FIELDCACHE_DISABLE_ENTRY_LIST_JMX";

/// Immutable toggle flags for the field cache bean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldCacheBeanConfig {
    /// Suppress the expensive per-entry breakdown regardless of caller intent.
    pub disable_entry_list: bool,
    /// Suppress the per-entry breakdown when the consumer asks for detail.
    pub disable_jmx_entry_list: bool,
}

impl FieldCacheBeanConfig {
    pub fn new(disable_entry_list: bool, disable_jmx_entry_list: bool) -> Self {
        Self {
            disable_entry_list,
            disable_jmx_entry_list,
        }
    }

    /// Resolves both flags from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves both flags through an arbitrary key lookup.
    ///
    /// A flag is set only when its value is `true`, ignoring ASCII case.
    /// Missing keys and any other value leave the flag unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            disable_entry_list: flag_value(DISABLE_ENTRY_LIST_KEY, lookup(DISABLE_ENTRY_LIST_KEY)),
            disable_jmx_entry_list: flag_value(
                DISABLE_JMX_ENTRY_LIST_KEY,
                lookup(DISABLE_JMX_ENTRY_LIST_KEY),
            ),
        };
        debug!(
            disable_entry_list = config.disable_entry_list,
            disable_jmx_entry_list = config.disable_jmx_entry_list,
            "resolved field cache bean toggles"
        );
        config
    }

    /// Parses a JSON document; absent fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(input).map_err(|e| ConfigError::new(e.to_string()))
    }

    /// Returns `true` when a detailed collection may list entries: neither
    /// `disable_entry_list` nor `disable_jmx_entry_list` is set.
    #[inline]
    pub fn entry_list_enabled(&self) -> bool {
        !self.disable_entry_list && !self.disable_jmx_entry_list
    }
}

fn flag_value(key: &str, raw: Option<String>) -> bool {
    match raw {
        None => false,
        Some(value) => {
            let enabled = value.eq_ignore_ascii_case("true");
            if !enabled && !value.is_empty() && !value.eq_ignore_ascii_case("false") {
                debug!(key, value = %value, "ignoring non-boolean toggle value");
            }
            enabled
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(
        pairs: &'static [(&'static str, &'static str)],
    ) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_are_false() {
        let config = FieldCacheBeanConfig::default();
        assert!(!config.disable_entry_list);
        assert!(!config.disable_jmx_entry_list);
        assert!(config.entry_list_enabled());
    }

    #[test]
    fn missing_keys_resolve_to_defaults() {
        let config = FieldCacheBeanConfig::from_lookup(|_| None);
        assert_eq!(config, FieldCacheBeanConfig::default());
    }

    #[test]
    fn true_is_case_insensitive() {
        let config = FieldCacheBeanConfig::from_lookup(lookup_from(&[
            (DISABLE_ENTRY_LIST_KEY, "True"),
            (DISABLE_JMX_ENTRY_LIST_KEY, "tRuE"),
        ]));
        assert!(config.disable_entry_list);
        assert!(config.disable_jmx_entry_list);
    }

    #[test]
    fn other_values_do_not_enable() {
        for raw in ["1", "yes", "on", "", "false", " true"] {
            let config = FieldCacheBeanConfig::from_lookup(move |key: &str| {
                (key == DISABLE_ENTRY_LIST_KEY).then(|| raw.to_string())
            });
            assert!(!config.disable_entry_list, "value {raw:?} must not enable");
        }
    }

    #[test]
    fn either_flag_disables_entry_list() {
        assert!(!FieldCacheBeanConfig::new(true, false).entry_list_enabled());
        assert!(!FieldCacheBeanConfig::new(false, true).entry_list_enabled());
        assert!(!FieldCacheBeanConfig::new(true, true).entry_list_enabled());
        assert!(FieldCacheBeanConfig::new(false, false).entry_list_enabled());
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = FieldCacheBeanConfig::from_json(r#"{"disable_jmx_entry_list": true}"#)
            .expect("valid config");
        assert_eq!(config, FieldCacheBeanConfig::new(false, true));

        let empty = FieldCacheBeanConfig::from_json("{}").expect("valid config");
        assert_eq!(empty, FieldCacheBeanConfig::default());
    }

    #[test]
    fn json_rejects_wrong_types() {
        let err = FieldCacheBeanConfig::from_json(r#"{"disable_entry_list": "yes"}"#).unwrap_err();
        assert!(!err.message().is_empty());
    }
}
