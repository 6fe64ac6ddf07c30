//! Build a resolver for one invocation from the configuration layers.

use buildvar_core::{VariantError, VariantResolver};
use serde_json::Value;
use std::path::PathBuf;

use crate::config::{deep_merge, dotted_override, ConfigError, EffectiveConfig, ProjectConfig};

/// Where to read configuration from.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Host config; skipped when the file does not exist
    pub host_config: Option<PathBuf>,

    /// Project config; must exist when set
    pub project_config: Option<PathBuf>,

    /// `dotted.key=value` overrides, applied in order
    pub overrides: Vec<(String, String)>,
}

impl LoadOptions {
    /// CLI overrides as one JSON layer, or None when there are none.
    pub fn cli_layer(&self) -> Option<Value> {
        if self.overrides.is_empty() {
            return None;
        }
        let layer = self
            .overrides
            .iter()
            .map(|(key, value)| dotted_override(key, value))
            .fold(Value::Object(serde_json::Map::new()), deep_merge);
        Some(layer)
    }
}

/// Resolver plus the provenance of the configuration it was built from.
#[derive(Debug)]
pub struct Loaded {
    pub effective: EffectiveConfig,
    pub resolver: VariantResolver,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Variant(#[from] VariantError),
}

/// Read every layer and register the declared variants.
pub fn load(options: &LoadOptions) -> Result<Loaded, LoadError> {
    let (effective, project) = build_layers(options)?;
    let resolver = build_resolver(&project)?;
    Ok(Loaded {
        effective,
        resolver,
    })
}

/// Read every layer without registering variants.
pub fn load_effective(options: &LoadOptions) -> Result<EffectiveConfig, ConfigError> {
    let (effective, _) = build_layers(options)?;
    Ok(effective)
}

fn build_layers(options: &LoadOptions) -> Result<(EffectiveConfig, ProjectConfig), ConfigError> {
    EffectiveConfig::build(
        options.host_config.as_deref(),
        options.project_config.as_deref(),
        options.cli_layer(),
    )
}

/// Register the project's variants, in declaration order.
pub fn build_resolver(project: &ProjectConfig) -> Result<VariantResolver, VariantError> {
    let mut resolver = VariantResolver::new(project.base());
    for decl in &project.variants {
        resolver.register(decl.name.clone(), decl.overrides())?;
        tracing::debug!(variant = %decl.name, "registered variant");
    }
    Ok(resolver)
}
