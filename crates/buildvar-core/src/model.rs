//! Variant data model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Platform API level, either pinned or tracking the newest available SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PlatformLevelRepr", into = "PlatformLevelRepr")]
pub enum PlatformLevel {
    /// Newest SDK known to the toolchain at build time.
    Latest,
    /// A concrete API level.
    Api(u32),
}

impl PlatformLevel {
    /// The concrete API level, if pinned.
    pub fn api(&self) -> Option<u32> {
        match self {
            PlatformLevel::Latest => None,
            PlatformLevel::Api(level) => Some(*level),
        }
    }

    pub fn is_latest(&self) -> bool {
        matches!(self, PlatformLevel::Latest)
    }
}

impl fmt::Display for PlatformLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformLevel::Latest => write!(f, "latest"),
            PlatformLevel::Api(level) => write!(f, "{}", level),
        }
    }
}

impl FromStr for PlatformLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("latest") {
            return Ok(PlatformLevel::Latest);
        }
        trimmed
            .parse::<u32>()
            .map(PlatformLevel::Api)
            .map_err(|_| format!("invalid platform level '{}': expected \"latest\" or an API number", s))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PlatformLevelRepr {
    Number(u32),
    Text(String),
}

impl TryFrom<PlatformLevelRepr> for PlatformLevel {
    type Error = String;

    fn try_from(repr: PlatformLevelRepr) -> Result<Self, Self::Error> {
        match repr {
            PlatformLevelRepr::Number(level) => Ok(PlatformLevel::Api(level)),
            PlatformLevelRepr::Text(text) => text.parse(),
        }
    }
}

impl From<PlatformLevel> for PlatformLevelRepr {
    fn from(level: PlatformLevel) -> Self {
        match level {
            PlatformLevel::Latest => PlatformLevelRepr::Text("latest".to_string()),
            PlatformLevel::Api(api) => PlatformLevelRepr::Number(api),
        }
    }
}

/// Compiler and platform versions used to produce a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainSpec {
    /// Source compatibility level (e.g. "11")
    #[serde(deserialize_with = "version_string::deserialize")]
    pub compile_level: String,

    /// Target bytecode compatibility level (e.g. "11")
    #[serde(deserialize_with = "version_string::deserialize")]
    pub target_level: String,

    /// Native development kit version (e.g. "27.0.12077973")
    #[serde(deserialize_with = "version_string::deserialize")]
    pub ndk_version: String,

    /// Lowest platform API level the artifact installs on
    #[serde(deserialize_with = "api_level::deserialize")]
    pub min_platform: u32,

    /// Platform API level the artifact is tested against
    pub target_platform: PlatformLevel,

    /// Platform SDK the sources are compiled against
    pub compile_platform: PlatformLevel,

    /// JVM target for other compilers; follows `target_level` when unset
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "version_string::deserialize_option"
    )]
    pub jvm_target: Option<String>,
}

impl ToolchainSpec {
    /// Effective JVM target.
    pub fn effective_jvm_target(&self) -> &str {
        self.jvm_target.as_deref().unwrap_or(&self.target_level)
    }
}

/// Version fields accept `"11"` or `11` and store the text form.
///
/// Floats are rejected: `27.0` or `26.10` would lose digits on the way to text.
pub(crate) mod version_string {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged, expecting = "a version string or an integer")]
    enum Repr {
        Text(String),
        Integer(u64),
    }

    impl From<Repr> for String {
        fn from(repr: Repr) -> Self {
            match repr {
                Repr::Text(text) => text,
                Repr::Integer(n) => n.to_string(),
            }
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Repr::deserialize(deserializer).map(String::from)
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(Option::<Repr>::deserialize(deserializer)?.map(String::from))
    }
}

/// API levels accept `21` or `"21"`.
pub(crate) mod api_level {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged, expecting = "an API level")]
    enum Repr {
        Number(u32),
        Text(String),
    }

    fn parse<E: Error>(repr: Repr) -> Result<u32, E> {
        match repr {
            Repr::Number(n) => Ok(n),
            Repr::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid API level '{}'", text))),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        parse(Repr::deserialize(deserializer)?)
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u32>, D::Error> {
        Option::<Repr>::deserialize(deserializer)?
            .map(parse)
            .transpose()
    }
}

/// Opaque reference to a signing credential (e.g. `env:STORE_PASSWORD`).
///
/// The resolver never dereferences it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialRef(String);

impl CredentialRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for CredentialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Credentials used to sign an artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigningIdentity {
    /// Key alias inside the keystore
    pub alias: String,

    /// Handle to the store/key password
    pub credential_ref: CredentialRef,

    /// Keystore file
    pub keystore_location: PathBuf,
}

impl SigningIdentity {
    pub fn new(
        alias: impl Into<String>,
        credential_ref: impl Into<String>,
        keystore_location: impl Into<PathBuf>,
    ) -> Self {
        Self {
            alias: alias.into(),
            credential_ref: CredentialRef::new(credential_ref),
            keystore_location: keystore_location.into(),
        }
    }

    /// First empty field, in declaration order.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.alias.trim().is_empty() {
            Some("alias")
        } else if self.credential_ref.is_empty() {
            Some("credential_ref")
        } else if self.keystore_location.to_string_lossy().trim().is_empty() {
            Some("keystore_location")
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.first_missing_field().is_none()
    }
}

/// Code and resource shrinking settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptimizationPolicy {
    pub shrink_code: bool,

    pub shrink_resources: bool,

    /// Keep/obfuscation rule files, applied in order
    #[serde(default)]
    pub rule_files: Vec<PathBuf>,
}

impl OptimizationPolicy {
    /// Whether any shrinking is enabled (a release-grade variant).
    pub fn is_enabled(&self) -> bool {
        self.shrink_code || self.shrink_resources
    }
}

/// Base configuration every variant starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    pub toolchain: ToolchainSpec,

    #[serde(default)]
    pub signing: SigningIdentity,

    #[serde(default)]
    pub optimization: OptimizationPolicy,
}

/// A fully resolved build variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildVariant {
    /// Unique variant name (e.g. "debug", "release")
    pub name: String,

    pub toolchain: ToolchainSpec,

    pub signing: SigningIdentity,

    pub optimization: OptimizationPolicy,
}

impl BuildVariant {
    /// Variant that carries the base configuration unchanged.
    pub fn from_base(name: impl Into<String>, base: &BaseConfig) -> Self {
        Self {
            name: name.into(),
            toolchain: base.toolchain.clone(),
            signing: base.signing.clone(),
            optimization: base.optimization.clone(),
        }
    }

    /// Whether this variant shrinks code or resources.
    pub fn is_release_grade(&self) -> bool {
        self.optimization.is_enabled()
    }

    /// Strip the name, leaving the configuration.
    pub fn to_config(&self) -> BaseConfig {
        BaseConfig {
            toolchain: self.toolchain.clone(),
            signing: self.signing.clone(),
            optimization: self.optimization.clone(),
        }
    }
}
