//! buildvar - build-variant configuration resolver
//!
//! Loads a layered base configuration and variant declarations, then
//! resolves each named variant (debug, release, ...) into a validated set
//! of toolchain, signing and optimization settings for a build orchestrator.

pub mod config;
pub mod fingerprint;
pub mod loader;
pub mod signing;
pub mod telemetry;

pub use buildvar_core::{
    BaseConfig, BuildVariant, ErrorKind, ErrorReport, VariantError, VariantOutcome,
    VariantOverrides, VariantResolver, VariantState,
};
pub use config::{ConfigError, EffectiveConfig, ProjectConfig};
pub use fingerprint::variant_key;
pub use loader::{load, load_effective, LoadError, LoadOptions, Loaded};
