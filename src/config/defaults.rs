//! Built-in base configuration (layer 1)
//!
//! Hardcoded defaults for every base field. Signing is left empty so that
//! release-grade variants must name their own identity.

use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Source compatibility level (default: "11")
    pub compile_level: String,

    /// Target compatibility level (default: "11")
    pub target_level: String,

    /// NDK version (default: "27.0.12077973")
    pub ndk_version: String,

    /// Minimum platform API level (default: 21)
    pub min_platform: u32,

    /// Target platform level (default: "latest")
    pub target_platform: String,

    /// Compile platform level (default: "latest")
    pub compile_platform: String,

    /// Shrink code (default: false)
    pub shrink_code: bool,

    /// Shrink resources (default: false)
    pub shrink_resources: bool,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            compile_level: "11".to_string(),
            target_level: "11".to_string(),
            ndk_version: "27.0.12077973".to_string(),
            min_platform: 21,
            target_platform: "latest".to_string(),
            compile_platform: "latest".to_string(),
            shrink_code: false,
            shrink_resources: false,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "toolchain": {
                "compile_level": self.compile_level,
                "target_level": self.target_level,
                "ndk_version": self.ndk_version,
                "min_platform": self.min_platform,
                "target_platform": self.target_platform,
                "compile_platform": self.compile_platform
            },
            "signing": {
                "alias": "",
                "credential_ref": "",
                "keystore_location": ""
            },
            "optimization": {
                "shrink_code": self.shrink_code,
                "shrink_resources": self.shrink_resources,
                "rule_files": []
            },
            "variants": []
        })
    }
}
