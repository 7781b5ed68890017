//! Scheduler configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Deployment configuration for the placement scheduler.
///
/// Every field has a default, so a partial (or empty) TOML file yields a
/// working configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum placement attempts per request. 1 disables retry tracking.
    pub max_attempts: u32,
    /// Heartbeat age in seconds beyond which a host is treated as down.
    pub service_down_time_secs: u64,
    /// Registry topic naming the share-service fleet.
    pub share_topic: String,
    /// Host filters, applied in order.
    pub default_filters: Vec<String>,
    /// Host weighers, combined by weighted sum.
    pub default_weighers: Vec<String>,
    /// Optional JSON file of runtime-tunable options.
    pub options_path: Option<PathBuf>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            service_down_time_secs: 60,
            share_topic: "share".to_string(),
            default_filters: vec![
                "availability_zone".to_string(),
                "capacity".to_string(),
            ],
            default_weighers: vec!["capacity".to_string()],
            options_path: None,
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SchedulerConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = SchedulerConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.service_down_time_secs, 60);
        assert_eq!(config.share_topic, "share");
        assert_eq!(config.default_filters, vec!["availability_zone", "capacity"]);
        assert_eq!(config.default_weighers, vec!["capacity"]);
        assert!(config.options_path.is_none());
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config: SchedulerConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.share_topic, "share");
    }

    #[test]
    fn partial_toml_overrides_some_fields() {
        let toml_str = r#"
max_attempts = 5
default_filters = ["capacity"]
"#;
        let config: SchedulerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.default_filters, vec!["capacity"]);
        // Untouched fields keep their defaults.
        assert_eq!(config.service_down_time_secs, 60);
        assert_eq!(config.default_weighers, vec!["capacity"]);
    }

    #[test]
    fn from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scheduler.toml");
        std::fs::write(&path, "share_topic = \"backup\"\n").unwrap();

        let config = SchedulerConfig::from_file(&path).unwrap();
        assert_eq!(config.share_topic, "backup");
        assert_eq!(config.max_attempts, 3);
    }
}
