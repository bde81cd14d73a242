//! Custom prompt injection lane
//!
//! This crate resolves user-authored `[[prompts]]` records from a TOML
//! config file into placement rules for the host prompt-assembly pipeline,
//! and keeps the persisted configuration in sync with the versioned schema
//! while leaving the repeatable `[[prompts]]` section untouched.

pub mod config;
pub mod diag;
pub mod plugin;
pub mod record;
pub mod resolver;
pub mod schema;

pub use config::{ConfigError, EffectiveConfig};
pub use diag::{CaptureSink, Diagnostics, TracingSink};
pub use plugin::{LoadReport, PromptInjectorPlugin, SkippedRecord};
pub use record::PromptRecord;
pub use resolver::{resolve, InjectionMode, PlacementRule, PromptComponent, SkipReason};
