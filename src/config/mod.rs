//! Configuration: schema synchronization and the config.toml boundary
//!
//! The persisted file has a schema-backed zone (kept in sync with the
//! versioned defaults) and a schema-exempt `[[prompts]]` zone that belongs
//! to the user and passes through merges untouched.

mod effective;
mod merge;
mod store;

pub use effective::{ConfigSource, EffectiveConfig};
pub use merge::{sync_with_schema, EXEMPT_TOP_LEVEL_KEYS};
pub use store::{
    json_to_toml, read_config_file, save_config, toml_to_json, write_default_config, ConfigError,
    DEFAULT_CONFIG_FILE_NAME,
};
