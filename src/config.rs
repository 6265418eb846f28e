use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::travel::Batching;

/// Environment variable consulted when the config file carries no API key.
pub const API_KEY_ENV: &str = "GRAPHHOPPER_API_KEY";

/// Settings of the routing service used for travel-time matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Matrix endpoint; the key is appended as `?key=...`.
    pub base_url: String,
    pub api_key: Option<String>,
    pub vehicle: String,
    /// Points per side of a chunked request.
    pub batch_size: usize,
    /// Largest origins × destinations product per request.
    pub max_elements: usize,
    pub timeout_secs: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://graphhopper.com/api/1/matrix".to_string(),
            api_key: None,
            vehicle: "car".to_string(),
            batch_size: 5,
            max_elements: 100,
            timeout_secs: 10,
        }
    }
}

impl RoutingConfig {
    /// Read a JSON config; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[config] read {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("[config] parse {}", path.display()))
    }

    /// Fill a missing key from `env` (the value of `GRAPHHOPPER_API_KEY`).
    pub fn resolve_api_key(mut self, env: Option<String>) -> Self {
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            self.api_key = env.filter(|key| !key.is_empty());
        }
        self
    }

    /// Fill a missing key from the process environment.
    pub fn with_env_api_key(self) -> Self {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    /// Batching derived from the configured limits.
    pub fn batching(&self, split: bool) -> Batching {
        match split {
            true => Batching::Split { max_elements: self.max_elements },
            false => Batching::Chunked { group_size: self.batch_size },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routing.json");
        fs::write(&path, r#"{ "vehicle": "foot", "batch_size": 8 }"#).unwrap();

        let config = RoutingConfig::load(&path).unwrap();
        assert_eq!(config.vehicle, "foot");
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.max_elements, 100);
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn file_key_wins_over_environment() {
        let config = RoutingConfig { api_key: Some("file".into()), ..Default::default() };
        assert_eq!(config.resolve_api_key(Some("env".into())).api_key.as_deref(), Some("file"));

        let config = RoutingConfig::default().resolve_api_key(Some("env".into()));
        assert_eq!(config.api_key.as_deref(), Some("env"));

        let config = RoutingConfig::default().resolve_api_key(Some(String::new()));
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn batching_follows_limits() {
        let config = RoutingConfig::default();
        assert_eq!(config.batching(false), Batching::Chunked { group_size: 5 });
        assert_eq!(config.batching(true), Batching::Split { max_elements: 100 });
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routing.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(RoutingConfig::load(&path).is_err());
    }
}
