//! Application configuration

use std::env;

use anyhow::{Context, Result};

use crate::domain::value_objects::EffortPolicy;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Entity store backend: "memory" or "sqlite"
    pub store_backend: String,
    /// SQLite database file (sqlite backend only)
    pub sqlite_path: String,
    /// Buffered change notices per subscriber
    pub notify_capacity: usize,
    /// Effort settlement rules
    pub effort: EffortPolicy,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            store_backend: lookup("NEXUS_STORE_BACKEND")
                .unwrap_or_else(|| "memory".to_string())
                .to_lowercase(),
            sqlite_path: lookup("NEXUS_SQLITE_PATH")
                .unwrap_or_else(|| "./data/nexus.db".to_string()),
            notify_capacity: lookup("NEXUS_NOTIFY_CAPACITY")
                .unwrap_or_else(|| "64".to_string())
                .parse()
                .context("NEXUS_NOTIFY_CAPACITY must be a positive integer")?,
            effort: EffortPolicy::from_lookup(&lookup),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.store_backend, "memory");
        assert_eq!(config.sqlite_path, "./data/nexus.db");
        assert_eq!(config.notify_capacity, 64);
        assert_eq!(config.effort, EffortPolicy::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("NEXUS_STORE_BACKEND", "SQLite"),
            ("NEXUS_SQLITE_PATH", "/tmp/n.db"),
            ("NEXUS_MAX_EFFORT", "4"),
        ]
        .into_iter()
        .collect();
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.store_backend, "sqlite");
        assert_eq!(config.sqlite_path, "/tmp/n.db");
        assert_eq!(config.effort.max_effort, 4);
    }

    #[test]
    fn test_bad_capacity_is_an_error() {
        let result = AppConfig::from_lookup(|k| {
            (k == "NEXUS_NOTIFY_CAPACITY").then(|| "lots".to_string())
        });
        assert!(result.is_err());
    }
}
