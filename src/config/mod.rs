//! Layered configuration
//!
//! Implements the 4-layer configuration merge:
//! 1. Built-in base defaults
//! 2. Host/user config (~/.config/buildvar/config.toml)
//! 3. Project config (buildvar.toml)
//! 4. CLI `--set` overrides

mod defaults;
mod effective;
mod merge;

pub use defaults::BuiltinDefaults;
pub use effective::{
    ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig, ProjectConfig, VariantDecl,
    PROJECT_CONFIG_FILE,
};
pub use merge::{deep_merge, dotted_override, merge_layers};
