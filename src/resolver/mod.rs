//! Rule resolver - compiles prompt records into placement rules
//!
//! The resolver is a pure gate: one raw `[[prompts]]` mapping in, zero or
//! one compiled component out. A record that passes validation yields one
//! append rule per enabled insertion point; anything else yields a
//! structured skip reason and the caller moves on to the next record.

mod result;

pub use result::SkipReason;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::PromptRecord;

/// KFC-side insertion points, in injection coverage order.
///
/// These names are part of the contract with the prompt-assembly pipeline
/// and must match it verbatim. Adding an insertion point is a one-line
/// change here, not a config migration.
pub const KFC_TARGETS: [&str; 5] = [
    "kfc_unified_prompt",
    "kfc_main",
    "kfc_style_prompt",
    "kfc_planner",
    "kfc_replyer",
];

/// AFC-side insertion points
pub const AFC_TARGETS: [&str; 2] = ["s4u_style_prompt", "normal_style_prompt"];

/// Placement semantics for injected text.
///
/// Only append is used today; the field exists so serialized rules stay
/// forward compatible with other modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionMode {
    Append,
}

/// One placement rule: which insertion point receives the content, how,
/// and with what weight relative to other rules on the same target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRule {
    pub target: String,
    pub mode: InjectionMode,
    pub priority: i64,
}

/// Registration metadata for one resolved component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub name: String,
    pub description: String,
    pub rules: Vec<PlacementRule>,
}

/// A compiled prompt component: a valid record's name, placement rules,
/// and content, frozen at resolution time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptComponent {
    name: String,
    description: String,
    rules: Vec<PlacementRule>,
    content: String,
    source_index: usize,
}

impl PromptComponent {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[PlacementRule] {
        &self.rules
    }

    /// 1-based position of the source record in the `[[prompts]]` sequence
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Metadata handed to the host registry
    pub fn info(&self) -> ComponentInfo {
        ComponentInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            rules: self.rules.clone(),
        }
    }

    /// The stored content, verbatim. All validation and trimming happened
    /// once at resolution; this is a pure accessor.
    pub fn provide_content(&self) -> &str {
        &self.content
    }
}

/// Resolve one raw record mapping into a compiled component.
///
/// Pure function: (record, index) -> component | skip reason. `index` is
/// the record's 1-based position in the `[[prompts]]` sequence. A mapping
/// that cannot be decoded (wrong shape, wrong value type) skips with
/// `SkipReason::Invalid` rather than failing the load pass.
pub fn resolve(raw: &Value, index: usize) -> Result<PromptComponent, SkipReason> {
    let record: PromptRecord = serde_json::from_value(raw.clone())
        .map_err(|e| SkipReason::Invalid(e.to_string()))?;
    resolve_record(&record, index)
}

/// Resolve an already-decoded record
pub fn resolve_record(record: &PromptRecord, index: usize) -> Result<PromptComponent, SkipReason> {
    if !record.enabled {
        return Err(SkipReason::Disabled);
    }

    let content = record.content.trim();
    if content.is_empty() {
        return Err(SkipReason::EmptyContent);
    }

    let mut rules = Vec::new();
    if record.enable_kfc {
        for target in KFC_TARGETS {
            rules.push(PlacementRule {
                target: target.to_string(),
                mode: InjectionMode::Append,
                priority: record.priority,
            });
        }
    }
    if record.enable_afc {
        for target in AFC_TARGETS {
            rules.push(PlacementRule {
                target: target.to_string(),
                mode: InjectionMode::Append,
                priority: record.priority,
            });
        }
    }

    if rules.is_empty() {
        return Err(SkipReason::NoTargets);
    }

    let name = record.effective_name(index);
    Ok(PromptComponent {
        description: format!("Custom prompt: {name}"),
        name,
        rules,
        content: content.to_string(),
        source_index: index,
    })
}
