//! Effective configuration with provenance
//!
//! Captures the merged configuration plus where it came from and whether
//! synchronization drifted from the persisted file.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::merge::sync_with_schema;
use crate::config::store::{self, ConfigError};
use crate::diag::Diagnostics;
use crate::schema::{PluginDefaults, SCHEMA_ID, SCHEMA_VERSION};

/// Where the user side of the merge came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    /// File path (None when running from built-in defaults only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of the raw file bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Merged configuration with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// The merged configuration object
    pub config: Value,

    /// The contributing user config source
    pub source: ConfigSource,

    /// Whether synchronization found drift or gaps against the file
    pub changed: bool,
}

impl EffectiveConfig {
    /// Build the effective config from an optional persisted file.
    ///
    /// A missing file merges an empty user config, which yields the schema
    /// defaults with `changed == true`.
    pub fn build(path: Option<&Path>, diag: &dyn Diagnostics) -> Result<Self, ConfigError> {
        let (user, source) = match path {
            Some(path) if path.exists() => {
                let (value, digest) = store::read_config_file(path)?;
                (
                    value,
                    ConfigSource {
                        path: Some(path.display().to_string()),
                        digest: Some(digest),
                    },
                )
            }
            _ => (
                Value::Object(Map::new()),
                ConfigSource {
                    path: None,
                    digest: None,
                },
            ),
        };

        let defaults = PluginDefaults::default().to_value();
        let (config, changed) = sync_with_schema(&defaults, &user, diag);

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config,
            source,
            changed,
        })
    }

    /// Get a config value by dot-separated path
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.config;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Get a bool by path, with a caller-supplied default when absent or
    /// not a bool
    pub fn get_bool(&self, path: &str, default: bool) -> bool {
        self.get(path).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Get a string by path
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Get an integer by path
    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(Value::as_i64)
    }

    /// Raw view of the exempt `prompts` sequence, untouched by the merge
    pub fn prompts(&self) -> Option<&Value> {
        self.config.get("prompts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::CaptureSink;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_without_file_yields_defaults() {
        let diag = CaptureSink::new();
        let config = EffectiveConfig::build(None, &diag).unwrap();

        assert_eq!(config.schema_version, SCHEMA_VERSION);
        assert_eq!(config.schema_id, SCHEMA_ID);
        assert!(config.changed);
        assert!(config.source.path.is_none());
        assert!(config.get_bool("plugin.enabled", false));
        assert!(!config.get_bool("plugin.debug_mode", true));
        assert!(config.prompts().is_none());
    }

    #[test]
    fn test_build_from_file_tracks_provenance() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [plugin]
            enabled = false
            debug_mode = true

            [[prompts]]
            name = "persona"
            content = "hello"
            "#,
        )
        .unwrap();

        let diag = CaptureSink::new();
        let config = EffectiveConfig::build(Some(&path), &diag).unwrap();

        assert!(!config.changed);
        assert!(!config.get_bool("plugin.enabled", true));
        assert!(config.get_bool("plugin.debug_mode", false));
        assert_eq!(config.source.path.as_deref(), Some(path.to_str().unwrap()));
        assert_eq!(config.source.digest.as_ref().map(|d| d.len()), Some(64));

        let prompts = config.prompts().unwrap().as_array().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0]["name"], "persona");
    }

    #[test]
    fn test_missing_path_treated_as_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("does_not_exist.toml");

        let diag = CaptureSink::new();
        let config = EffectiveConfig::build(Some(&path), &diag).unwrap();

        assert!(config.changed);
        assert!(config.source.path.is_none());
    }

    #[test]
    fn test_get_missing_path_uses_default() {
        let diag = CaptureSink::new();
        let config = EffectiveConfig::build(None, &diag).unwrap();

        assert!(config.get("plugin.missing").is_none());
        assert!(config.get_bool("plugin.missing", true));
        assert!(!config.get_bool("plugin.missing", false));
        assert!(config.get_str("plugin.enabled").is_none()); // wrong type
    }
}
