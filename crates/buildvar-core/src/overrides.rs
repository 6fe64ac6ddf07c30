//! Partial variant configuration and the per-field merge.
//!
//! Every leaf is optional. A present field replaces the base field; an
//! absent one keeps it. `rule_files` is a single field, so a present list
//! replaces the base list entirely.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::model::{
    api_level, version_string, BaseConfig, BuildVariant, CredentialRef, OptimizationPolicy, PlatformLevel,
    SigningIdentity, ToolchainSpec,
};

/// Toolchain fields a variant may override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainOverrides {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "version_string::deserialize_option"
    )]
    pub compile_level: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "version_string::deserialize_option"
    )]
    pub target_level: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "version_string::deserialize_option"
    )]
    pub ndk_version: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "api_level::deserialize_option"
    )]
    pub min_platform: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_platform: Option<PlatformLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile_platform: Option<PlatformLevel>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "version_string::deserialize_option"
    )]
    pub jvm_target: Option<String>,
}

/// Signing fields a variant may override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigningOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_ref: Option<CredentialRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keystore_location: Option<PathBuf>,
}

/// Optimization fields a variant may override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptimizationOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shrink_code: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shrink_resources: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_files: Option<Vec<PathBuf>>,
}

/// The fields in which a variant differs from the base configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantOverrides {
    #[serde(default)]
    pub toolchain: ToolchainOverrides,

    #[serde(default)]
    pub signing: SigningOverrides,

    #[serde(default)]
    pub optimization: OptimizationOverrides,
}

impl VariantOverrides {
    /// Overrides that change nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Fully specified overrides equal to `base`.
    pub fn from_base(base: &BaseConfig) -> Self {
        let toolchain = &base.toolchain;
        let signing = &base.signing;
        let optimization = &base.optimization;

        Self {
            toolchain: ToolchainOverrides {
                compile_level: Some(toolchain.compile_level.clone()),
                target_level: Some(toolchain.target_level.clone()),
                ndk_version: Some(toolchain.ndk_version.clone()),
                min_platform: Some(toolchain.min_platform),
                target_platform: Some(toolchain.target_platform),
                compile_platform: Some(toolchain.compile_platform),
                jvm_target: toolchain.jvm_target.clone(),
            },
            signing: SigningOverrides {
                alias: Some(signing.alias.clone()),
                credential_ref: Some(signing.credential_ref.clone()),
                keystore_location: Some(signing.keystore_location.clone()),
            },
            optimization: OptimizationOverrides {
                shrink_code: Some(optimization.shrink_code),
                shrink_resources: Some(optimization.shrink_resources),
                rule_files: Some(optimization.rule_files.clone()),
            },
        }
    }

    /// Whether no field is overridden.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn shrink_code(mut self, enabled: bool) -> Self {
        self.optimization.shrink_code = Some(enabled);
        self
    }

    pub fn shrink_resources(mut self, enabled: bool) -> Self {
        self.optimization.shrink_resources = Some(enabled);
        self
    }

    pub fn rule_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.optimization.rule_files = Some(files.into_iter().map(Into::into).collect());
        self
    }

    pub fn signing(mut self, identity: SigningIdentity) -> Self {
        self.signing = SigningOverrides {
            alias: Some(identity.alias),
            credential_ref: Some(identity.credential_ref),
            keystore_location: Some(identity.keystore_location),
        };
        self
    }

    pub fn min_platform(mut self, level: u32) -> Self {
        self.toolchain.min_platform = Some(level);
        self
    }

    pub fn target_platform(mut self, level: PlatformLevel) -> Self {
        self.toolchain.target_platform = Some(level);
        self
    }

    pub fn compile_platform(mut self, level: PlatformLevel) -> Self {
        self.toolchain.compile_platform = Some(level);
        self
    }
}

/// Apply `overrides` to `base`, producing a new variant named `name`.
///
/// The base is never modified.
pub fn merge(base: &BaseConfig, name: &str, overrides: &VariantOverrides) -> BuildVariant {
    BuildVariant {
        name: name.to_string(),
        toolchain: merge_toolchain(&base.toolchain, &overrides.toolchain),
        signing: merge_signing(&base.signing, &overrides.signing),
        optimization: merge_optimization(&base.optimization, &overrides.optimization),
    }
}

fn merge_toolchain(base: &ToolchainSpec, over: &ToolchainOverrides) -> ToolchainSpec {
    ToolchainSpec {
        compile_level: pick(&over.compile_level, &base.compile_level),
        target_level: pick(&over.target_level, &base.target_level),
        ndk_version: pick(&over.ndk_version, &base.ndk_version),
        min_platform: over.min_platform.unwrap_or(base.min_platform),
        target_platform: over.target_platform.unwrap_or(base.target_platform),
        compile_platform: over.compile_platform.unwrap_or(base.compile_platform),
        jvm_target: over.jvm_target.clone().or_else(|| base.jvm_target.clone()),
    }
}

fn merge_signing(base: &SigningIdentity, over: &SigningOverrides) -> SigningIdentity {
    SigningIdentity {
        alias: pick(&over.alias, &base.alias),
        credential_ref: pick(&over.credential_ref, &base.credential_ref),
        keystore_location: pick(&over.keystore_location, &base.keystore_location),
    }
}

fn merge_optimization(base: &OptimizationPolicy, over: &OptimizationOverrides) -> OptimizationPolicy {
    OptimizationPolicy {
        shrink_code: over.shrink_code.unwrap_or(base.shrink_code),
        shrink_resources: over.shrink_resources.unwrap_or(base.shrink_resources),
        rule_files: pick(&over.rule_files, &base.rule_files),
    }
}

fn pick<T: Clone>(over: &Option<T>, base: &T) -> T {
    over.as_ref().unwrap_or(base).clone()
}
