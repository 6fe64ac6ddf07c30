//! Effective configuration with full provenance
//!
//! The effective config captures the merged base configuration and variant
//! declarations plus information about where each value came from.

use buildvar_core::{
    BaseConfig, OptimizationOverrides, OptimizationPolicy, SigningIdentity, SigningOverrides,
    ToolchainOverrides, ToolchainSpec, VariantOverrides,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// Schema version for effective_config
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "buildvar/effective_config@1";

/// Project config file name, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "buildvar.toml";

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Host,
    Project,
    Cli,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    /// Origin of this source
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// One `[[variants]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantDecl {
    pub name: String,

    #[serde(default)]
    pub toolchain: ToolchainOverrides,

    #[serde(default)]
    pub signing: SigningOverrides,

    #[serde(default)]
    pub optimization: OptimizationOverrides,
}

impl VariantDecl {
    pub fn overrides(&self) -> VariantOverrides {
        VariantOverrides {
            toolchain: self.toolchain.clone(),
            signing: self.signing.clone(),
            optimization: self.optimization.clone(),
        }
    }
}

/// Typed view of the merged layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub toolchain: ToolchainSpec,

    #[serde(default)]
    pub signing: SigningIdentity,

    #[serde(default)]
    pub optimization: OptimizationPolicy,

    /// Variant declarations, registered in this order
    #[serde(default)]
    pub variants: Vec<VariantDecl>,
}

impl ProjectConfig {
    pub fn base(&self) -> BaseConfig {
        BaseConfig {
            toolchain: self.toolchain.clone(),
            signing: self.signing.clone(),
            optimization: self.optimization.clone(),
        }
    }
}

/// Effective configuration with full provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// The merged configuration object (secrets redacted)
    pub config: Value,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,

    /// Redacted key paths
    pub redactions: Vec<String>,
}

/// Keys that contain secrets and should be redacted
const SECRET_KEYS: &[&str] = &[
    "password",
    "token",
    "secret",
    "private_key",
    "api_key",
    "credential",
];

impl EffectiveConfig {
    /// Build effective config from layers, returning it with the typed
    /// project config extracted before redaction.
    pub fn build(
        host_config_path: Option<&Path>,
        project_config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<(Self, ProjectConfig), ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: Built-in defaults
        layers.push(BuiltinDefaults::default().to_value());
        sources.push(ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        });

        // Layer 2: Host config (optional, skipped when absent)
        if let Some(path) = host_config_path {
            if path.exists() {
                let (value, digest) = Self::load_toml_file(path)?;
                tracing::debug!(path = %path.display(), %digest, "loaded host config");
                layers.push(value);
                sources.push(ConfigSource {
                    origin: ConfigOrigin::Host,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                });
            }
        }

        // Layer 3: Project config (must exist when given)
        if let Some(path) = project_config_path {
            let (value, digest) = Self::load_toml_file(path)?;
            tracing::debug!(path = %path.display(), %digest, "loaded project config");
            layers.push(value);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Project,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        // Layer 4: CLI overrides
        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let mut merged = merge_layers(layers);

        let project: ProjectConfig = serde_json::from_value(merged.clone())
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        let redactions = Self::redact_secrets(&mut merged);

        let effective = Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config: merged,
            sources,
            redactions,
        };
        Ok((effective, project))
    }

    /// Default host config path: `$XDG_CONFIG_HOME/buildvar/config.toml`,
    /// falling back to `~/.config/buildvar/config.toml`.
    pub fn default_host_path() -> Option<PathBuf> {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            if !xdg.is_empty() {
                return Some(PathBuf::from(xdg).join("buildvar/config.toml"));
            }
        }
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config/buildvar/config.toml"))
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::Parse(format!("{}: invalid UTF-8: {}", path.display(), e)))?;

        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;

        Ok((Self::toml_to_json(toml_value), digest))
    }

    /// Convert TOML Value to JSON Value
    fn toml_to_json(toml: toml::Value) -> Value {
        match toml {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Number(i.into()),
            toml::Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Self::toml_to_json).collect())
            }
            toml::Value::Table(table) => Value::Object(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Self::toml_to_json(v)))
                    .collect(),
            ),
        }
    }

    /// Redact secrets in the config, returning list of redacted paths
    fn redact_secrets(value: &mut Value) -> Vec<String> {
        let mut redactions = Vec::new();
        Self::redact_recursive(value, String::new(), &mut redactions);
        redactions
    }

    fn redact_recursive(value: &mut Value, path: String, redactions: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    let key_lower = key.to_lowercase();
                    let current_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };

                    let is_secret = SECRET_KEYS.iter().any(|s| key_lower.contains(s));

                    // Empty values carry nothing worth hiding.
                    let is_blank = val.as_str().map_or(false, str::is_empty);

                    if is_secret && !is_blank && !val.is_object() && !val.is_array() {
                        *val = Value::String("[REDACTED]".to_string());
                        redactions.push(current_path);
                    } else {
                        Self::redact_recursive(val, current_path, redactions);
                    }
                }
            }
            Value::Array(arr) => {
                for (i, val) in arr.iter_mut().enumerate() {
                    let current_path = format!("{}[{}]", path, i);
                    Self::redact_recursive(val, current_path, redactions);
                }
            }
            _ => {}
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildvar_core::PlatformLevel;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "{}", contents).unwrap();
        temp
    }

    #[test]
    fn test_build_with_defaults_only() {
        let (config, project) = EffectiveConfig::build(None, None, None).unwrap();

        assert_eq!(config.schema_version, SCHEMA_VERSION);
        assert_eq!(config.config["toolchain"]["min_platform"], 21);
        assert_eq!(config.config["toolchain"]["ndk_version"], "27.0.12077973");
        assert_eq!(project.toolchain.target_platform, PlatformLevel::Latest);
        assert!(project.variants.is_empty());
    }

    #[test]
    fn test_build_with_cli_override() {
        let cli = serde_json::json!({"toolchain": {"min_platform": 24}});
        let (config, project) = EffectiveConfig::build(None, None, Some(cli)).unwrap();

        assert_eq!(config.config["toolchain"]["min_platform"], 24);
        assert_eq!(project.toolchain.min_platform, 24);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let cli = serde_json::json!({"toolchain": {"min_sdk": 24}});
        let result = EffectiveConfig::build(None, None, Some(cli));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bad_platform_level_rejected() {
        let cli = serde_json::json!({"toolchain": {"target_platform": "tiramisu"}});
        let err = EffectiveConfig::build(None, None, Some(cli)).unwrap_err();
        assert!(err.to_string().contains("tiramisu"));
    }

    #[test]
    fn test_missing_project_file_is_error() {
        let result = EffectiveConfig::build(None, Some(Path::new("/nonexistent/buildvar.toml")), None);
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_missing_host_file_is_skipped() {
        let (config, _) =
            EffectiveConfig::build(Some(Path::new("/nonexistent/config.toml")), None, None).unwrap();
        assert_eq!(config.sources.len(), 1);
    }

    #[test]
    fn test_load_project_variants_in_order() {
        let temp = toml_file(
            r#"
[toolchain]
min_platform = 23

[[variants]]
name = "release"
optimization = { shrink_code = true, shrink_resources = true }

[[variants]]
name = "debug"
"#,
        );

        let (config, project) = EffectiveConfig::build(None, Some(temp.path()), None).unwrap();

        assert_eq!(config.config["toolchain"]["min_platform"], 23);
        // builtin values survive the deep merge
        assert_eq!(project.toolchain.ndk_version, "27.0.12077973");
        let names: Vec<_> = project.variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["release", "debug"]);
        assert_eq!(
            project.variants[0].overrides().optimization.shrink_resources,
            Some(true)
        );
        assert!(project.variants[1].overrides().is_empty());
    }

    #[test]
    fn test_parse_error() {
        let temp = toml_file("[toolchain\nmin_platform = ");
        let result = EffectiveConfig::build(None, Some(temp.path()), None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_credential_redacted_but_typed_value_kept() {
        let temp = toml_file(
            r#"
[[variants]]
name = "release"
signing = { alias = "upload", credential_ref = "env:UPLOAD_PW", keystore_location = "upload.jks" }
"#,
        );

        let (config, project) = EffectiveConfig::build(None, Some(temp.path()), None).unwrap();

        assert_eq!(
            config.config["variants"][0]["signing"]["credential_ref"],
            "[REDACTED]"
        );
        assert!(config
            .redactions
            .contains(&"variants[0].signing.credential_ref".to_string()));
        // base credential_ref is empty and stays visible
        assert_eq!(config.config["signing"]["credential_ref"], "");
        assert_eq!(
            project.variants[0].signing.credential_ref.as_ref().unwrap().as_str(),
            "env:UPLOAD_PW"
        );
    }

    #[test]
    fn test_sources_tracked_with_digest() {
        let temp = toml_file("[toolchain]\nmin_platform = 21\n");
        let cli = serde_json::json!({"optimization": {"shrink_code": true}});
        let (config, _) = EffectiveConfig::build(None, Some(temp.path()), Some(cli)).unwrap();

        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.sources[0].origin, ConfigOrigin::Builtin);
        assert_eq!(config.sources[1].origin, ConfigOrigin::Project);
        assert_eq!(config.sources[1].digest.as_ref().unwrap().len(), 64);
        assert_eq!(config.sources[2].origin, ConfigOrigin::Cli);
    }

    #[test]
    fn test_host_layer_below_project() {
        let host = toml_file("[toolchain]\nmin_platform = 23\nndk_version = \"26.3.11579264\"\n");
        let repo = toml_file("[toolchain]\nmin_platform = 24\n");

        let (_, project) =
            EffectiveConfig::build(Some(host.path()), Some(repo.path()), None).unwrap();

        assert_eq!(project.toolchain.min_platform, 24);
        assert_eq!(project.toolchain.ndk_version, "26.3.11579264");
    }

    #[test]
    fn test_float_ndk_version_rejected() {
        let temp = toml_file("[toolchain]\nndk_version = 27.0\n");
        let err = EffectiveConfig::build(None, Some(temp.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_quoted_ndk_version_kept_verbatim() {
        let temp = toml_file("[toolchain]\nndk_version = \"26.10\"\n");
        let (_, project) = EffectiveConfig::build(None, Some(temp.path()), None).unwrap();
        assert_eq!(project.toolchain.ndk_version, "26.10");
    }
}
