//! Plugin surface: the load pass and host registration
//!
//! Feeds the raw `[[prompts]]` sequence through the resolver, one record at
//! a time. Failures are contained at the record boundary: a rejected record
//! is logged and recorded, and the pass continues. Only a structurally
//! invalid section (not a sequence) aborts the whole section, yielding zero
//! components without failing the host.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EffectiveConfig;
use crate::diag::Diagnostics;
use crate::resolver::{self, ComponentInfo, PromptComponent, SkipReason};

/// One record that failed resolution, with its reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// 1-based position in the `[[prompts]]` sequence
    pub index: usize,

    /// Record name, or the generated placeholder
    pub name: String,

    /// Why the record was skipped
    pub reason: SkipReason,
}

/// Outcome of one load pass over the `[[prompts]]` sequence
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Successfully compiled components, in record order
    pub components: Vec<PromptComponent>,

    /// Records that were skipped, with reasons
    pub skipped: Vec<SkippedRecord>,

    /// The section was present but not a sequence; nothing was loaded
    pub malformed_section: bool,
}

/// Run the load pass over a raw configuration mapping.
///
/// Each element of the `prompts` sequence goes through the resolver with
/// its 1-based index; a failure on one record never aborts the pass.
pub fn load_components(raw_config: &Value, diag: &dyn Diagnostics) -> LoadReport {
    let mut report = LoadReport::default();

    let prompts = match raw_config.get("prompts") {
        Some(value) => value,
        None => {
            diag.info("no [[prompts]] records configured; nothing to register");
            return report;
        }
    };

    let records = match prompts.as_array() {
        Some(records) => records,
        None => {
            diag.warn("config key 'prompts' is not a sequence; use [[prompts]] blocks - section ignored");
            report.malformed_section = true;
            return report;
        }
    };

    for (position, raw) in records.iter().enumerate() {
        let index = position + 1;
        match resolver::resolve(raw, index) {
            Ok(component) => {
                diag.info(&format!(
                    "compiled prompt '{}' ({} rule(s))",
                    component.name(),
                    component.rules().len()
                ));
                report.components.push(component);
            }
            Err(reason) => {
                let name = raw
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("custom_prompt_{index}"));
                let message = format!("prompt '{name}' skipped: {}", reason.to_machine_string());
                if reason.is_informational() {
                    diag.info(&message);
                } else {
                    diag.warn(&message);
                }
                report.skipped.push(SkippedRecord { index, name, reason });
            }
        }
    }

    diag.info(&format!(
        "resolved {} of {} prompt record(s)",
        report.components.len(),
        records.len()
    ));
    report
}

/// The plugin: an effective config plus the components resolved from it
pub struct PromptInjectorPlugin {
    config: EffectiveConfig,
    report: LoadReport,
}

impl PromptInjectorPlugin {
    /// Run the load pass against an already-merged configuration
    pub fn from_config(config: EffectiveConfig, diag: &dyn Diagnostics) -> Self {
        let report = load_components(&config.config, diag);
        Self { config, report }
    }

    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// `(metadata, component)` pairs for the host registry.
    ///
    /// Empty when the plugin master switch is off; individual records keep
    /// their own `enabled` flag on top of this.
    pub fn registrations(&self) -> Vec<(ComponentInfo, &PromptComponent)> {
        if !self.config.get_bool("plugin.enabled", true) {
            return Vec::new();
        }
        self.report
            .components
            .iter()
            .map(|c| (c.info(), c))
            .collect()
    }

    /// Injection-time content accessor.
    ///
    /// Returns the component's stored content verbatim; under `debug_mode`
    /// it also reports what is being injected.
    pub fn inject<'a>(&self, component: &'a PromptComponent, diag: &dyn Diagnostics) -> &'a str {
        if self.config.get_bool("plugin.debug_mode", false) {
            let priority = component.rules().first().map(|r| r.priority).unwrap_or(100);
            diag.info(&format!(
                "injecting '{}' | priority={} | rules={} | {} chars",
                component.name(),
                priority,
                component.rules().len(),
                component.provide_content().len()
            ));
        }
        component.provide_content()
    }
}
