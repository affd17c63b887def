//! Mapper configuration.
//!
//! Configs derive serde traits so they can be embedded in an application's
//! own settings file:
//! - `name`: label attached to the mapper's log events
//! - `parallel`: tuning for bulk conversion on the `parallel` feature

use serde::{Deserialize, Serialize};

/// Default input length below which bulk conversion stays sequential.
pub const DEFAULT_MIN_PARALLEL_LEN: usize = 1024;

/// Settings for a [`Mapper`](crate::Mapper).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Label used in log events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Parallel bulk conversion settings.
    #[serde(default)]
    pub parallel: ParallelConfig,
}

/// Parallel bulk conversion settings.
///
/// Only consulted by `par_map_list` (`parallel` feature).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Worker threads for a dedicated pool. Uses rayon's global pool when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,

    /// Inputs shorter than this are converted sequentially.
    #[serde(default = "default_min_len")]
    pub min_len: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            threads: None,
            min_len: DEFAULT_MIN_PARALLEL_LEN,
        }
    }
}

fn default_min_len() -> usize {
    DEFAULT_MIN_PARALLEL_LEN
}

impl MapperConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log label.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the number of worker threads for parallel bulk conversion.
    pub fn threads(mut self, threads: usize) -> Self {
        self.parallel.threads = Some(threads);
        self
    }

    /// Set the input length at which bulk conversion goes parallel.
    pub fn min_parallel_len(mut self, len: usize) -> Self {
        self.parallel.min_len = len;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = MapperConfig::new()
            .name("orders")
            .threads(4)
            .min_parallel_len(16);

        assert_eq!(config.name.as_deref(), Some("orders"));
        assert_eq!(config.parallel.threads, Some(4));
        assert_eq!(config.parallel.min_len, 16);
    }

    #[test]
    fn test_defaults() {
        let config = MapperConfig::default();

        assert!(config.name.is_none());
        assert!(config.parallel.threads.is_none());
        assert_eq!(config.parallel.min_len, DEFAULT_MIN_PARALLEL_LEN);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: MapperConfig = serde_json::from_str(r#"{"name": "orders"}"#).unwrap();

        assert_eq!(config.name.as_deref(), Some("orders"));
        assert_eq!(config.parallel, ParallelConfig::default());
    }

    #[test]
    fn test_deserialize_missing_min_len() {
        let config: MapperConfig =
            serde_json::from_str(r#"{"parallel": {"threads": 2}}"#).unwrap();

        assert!(config.name.is_none());
        assert_eq!(config.parallel.threads, Some(2));
        assert_eq!(config.parallel.min_len, DEFAULT_MIN_PARALLEL_LEN);
    }

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let value = serde_json::to_value(MapperConfig::new().min_parallel_len(8)).unwrap();

        assert_eq!(value, serde_json::json!({"parallel": {"min_len": 8}}));
    }
}
