//! Config file boundary: TOML load, two-pass save, default bootstrap
//!
//! The persisted file has two zones: schema-backed tables written through
//! the normal serializer, and the repeatable `[[prompts]]` section appended
//! afterwards as an independent write pass. A failed append is reported but
//! never rolls back the already-written standard section.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::config::merge::EXEMPT_TOP_LEVEL_KEYS;
use crate::diag::Diagnostics;
use crate::schema::{PluginDefaults, SCHEMA_ID, SECTION_DESCRIPTIONS};

/// Default config file name, relative to the plugin's data directory
pub const DEFAULT_CONFIG_FILE_NAME: &str = "config.toml";

/// Errors at the config file boundary
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::string::FromUtf8Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config file already exists: {0}")]
    AlreadyExists(PathBuf),
}

/// Read and parse a config file, returning the parsed mapping and the
/// SHA-256 digest of the raw file bytes
pub fn read_config_file(path: &Path) -> Result<(Value, String), ConfigError> {
    let bytes = fs::read(path)?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes)?;
    let parsed: toml::Value = toml::from_str(&contents)?;

    Ok((toml_to_json(parsed), digest))
}

/// Convert a TOML value to a JSON value
pub fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            Value::Object(map)
        }
    }
}

/// Convert a JSON value to a TOML value.
///
/// TOML has no null; nulls are normalized to the empty string.
pub fn json_to_toml(value: &Value) -> toml::Value {
    match value {
        Value::Null => toml::Value::String(String::new()),
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => toml::Value::Integer(i),
            None => toml::Value::Float(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => toml::Value::String(s.clone()),
        Value::Array(arr) => toml::Value::Array(arr.iter().map(json_to_toml).collect()),
        Value::Object(map) => {
            let table: toml::map::Map<String, toml::Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), json_to_toml(v)))
                .collect();
            toml::Value::Table(table)
        }
    }
}

/// Serialize the schema-backed portion of a config, one top-level table at
/// a time so each section gets its description comment
fn render_standard_sections(config: &Value) -> Result<String, ConfigError> {
    let mut out = format!("# Managed by prompt-injector (schema: {SCHEMA_ID})\n");

    if let Some(map) = config.as_object() {
        for (key, value) in map {
            if EXEMPT_TOP_LEVEL_KEYS.contains(&key.as_str()) {
                continue;
            }

            out.push('\n');
            if let Some((_, desc)) = SECTION_DESCRIPTIONS.iter().find(|(s, _)| s == key) {
                out.push_str(&format!("# {desc}\n"));
            }

            let mut section = toml::map::Map::new();
            section.insert(key.clone(), json_to_toml(value));
            out.push_str(&toml::to_string(&toml::Value::Table(section))?);
        }
    }

    Ok(out)
}

const PROMPTS_BANNER: &str = "\n# ========================================\n\
# Prompt injection records (repeatable)\n\
# Each [[prompts]] block is one independent injection\n\
# ========================================\n\n";

/// Write a merged config back to disk.
///
/// The schema-backed tables are written first; a `prompts` array, when
/// present, is appended as a distinct pass. Append failure is reported
/// through the diagnostics sink and does not fail the save.
pub fn save_config(path: &Path, config: &Value, diag: &dyn Diagnostics) -> Result<(), ConfigError> {
    let standard = render_standard_sections(config)?;
    fs::write(path, standard)?;

    if let Some(prompts) = config.get("prompts").filter(|p| p.is_array()) {
        if let Err(e) = append_prompts_section(path, prompts) {
            diag.error(&format!("appending [[prompts]] section failed: {e}"));
        } else {
            let count = prompts.as_array().map(Vec::len).unwrap_or(0);
            diag.info(&format!("appended [[prompts]] section ({count} record(s))"));
        }
    }

    Ok(())
}

fn append_prompts_section(path: &Path, prompts: &Value) -> Result<(), ConfigError> {
    let mut table = toml::map::Map::new();
    table.insert("prompts".to_string(), json_to_toml(prompts));
    let rendered = toml::to_string(&toml::Value::Table(table))?;

    let mut file = fs::OpenOptions::new().append(true).open(path)?;
    file.write_all(PROMPTS_BANNER.as_bytes())?;
    file.write_all(rendered.as_bytes())?;
    Ok(())
}

const SAMPLE_PROMPTS_SECTION: &str = r#"
# ========================================
# Prompt injection records (repeatable)
# Each [[prompts]] block is one independent injection
# Add as many [[prompts]] blocks as needed
# ========================================

# Full example (commented):
# [[prompts]]
# name = "custom_character"    # unique identifier (a placeholder is generated when absent)
# content = """Your prompt"""  # literal text to inject (required)
# enable_kfc = false           # inject into the KFC insertion points
# enable_afc = false           # inject into the AFC insertion points
# priority = 100               # weight among rules on the same target (1-200)
# enabled = true               # master switch for this record

# Uncomment the toggles below and edit the content to activate:
[[prompts]]
name = "custom_character"
content = """Your prompt"""
enable_kfc = false
enable_afc = false
priority = 100
enabled = true
"#;

/// Bootstrap a fresh default config file, including a sample `[[prompts]]`
/// block with both target groups off so it resolves to nothing until edited
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }

    let defaults = PluginDefaults::default().to_value();
    let mut contents = render_standard_sections(&defaults)?;
    contents.push_str(SAMPLE_PROMPTS_SECTION);

    fs::write(path, contents)?;
    Ok(())
}
