//! Versioned default configuration schema
//!
//! Hardcoded defaults for the schema-backed portion of `config.toml`. The
//! `[[prompts]]` section is intentionally absent from the schema: its shape
//! is user-owned and never defaulted or validated.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Schema version for config.toml
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "prompt-injector/config@1";

/// Human-readable descriptions for top-level config sections, written as
/// comments by the default-file bootstrap
pub const SECTION_DESCRIPTIONS: &[(&str, &str)] = &[("plugin", "Base plugin settings")];

/// Default values for the `[plugin]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginDefaults {
    /// Master switch for the whole plugin (default: true)
    pub enabled: bool,

    /// Verbose per-injection logging (default: false)
    pub debug_mode: bool,
}

impl Default for PluginDefaults {
    fn default() -> Self {
        Self {
            enabled: true,
            debug_mode: false,
        }
    }
}

impl PluginDefaults {
    /// Convert to a JSON value tree for schema synchronization.
    ///
    /// Callers get a fresh tree on every call; merges must never mutate
    /// shared schema storage.
    pub fn to_value(&self) -> Value {
        json!({
            "plugin": {
                "enabled": self.enabled,
                "debug_mode": self.debug_mode,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = PluginDefaults::default();
        assert!(defaults.enabled);
        assert!(!defaults.debug_mode);
    }

    #[test]
    fn test_to_value() {
        let value = PluginDefaults::default().to_value();
        assert_eq!(value["plugin"]["enabled"], true);
        assert_eq!(value["plugin"]["debug_mode"], false);
    }

    #[test]
    fn test_to_value_returns_fresh_tree() {
        let defaults = PluginDefaults::default();
        let mut first = defaults.to_value();
        first["plugin"]["enabled"] = json!(false);

        // A second call is unaffected by mutation of the first.
        assert_eq!(defaults.to_value()["plugin"]["enabled"], true);
    }

    #[test]
    fn test_schema_has_no_prompts_key() {
        let value = PluginDefaults::default().to_value();
        assert!(value.get("prompts").is_none());
    }
}
