//! Prompt record model
//!
//! One `PromptRecord` per `[[prompts]]` entry in the plugin configuration
//! file. Fields are lenient: everything except `content` has a default, so
//! a minimal record is just a `content` line.

use serde::{Deserialize, Serialize};

/// A single user-authored prompt record from the `[[prompts]]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRecord {
    /// Identifier; a positional placeholder is generated when absent
    #[serde(default)]
    pub name: Option<String>,

    /// Literal prompt text; must be non-empty after trimming
    #[serde(default)]
    pub content: String,

    /// Ordering weight among rules targeting the same insertion point.
    /// Documented range is 1-200; values are passed through unclamped.
    #[serde(default = "default_priority")]
    pub priority: i64,

    /// Whether this record targets the KFC insertion points
    #[serde(default = "default_enabled")]
    pub enable_kfc: bool,

    /// Whether this record targets the AFC insertion points
    #[serde(default = "default_enabled")]
    pub enable_afc: bool,

    /// Master on/off switch for this record
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_priority() -> i64 {
    100
}

fn default_enabled() -> bool {
    true
}

impl PromptRecord {
    /// Record name, falling back to `custom_prompt_<index>` when absent.
    /// `index` is the record's 1-based position in the sequence.
    pub fn effective_name(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("custom_prompt_{index}"),
        }
    }
}
