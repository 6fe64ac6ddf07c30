//! Resolution and validation errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    DuplicateVariant,
    UnknownVariant,
    ToolchainConflict,
    OptimizationPolicy,
    IncompleteSigning,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DuplicateVariant => "DUPLICATE_VARIANT",
            ErrorKind::UnknownVariant => "UNKNOWN_VARIANT",
            ErrorKind::ToolchainConflict => "TOOLCHAIN_CONFLICT",
            ErrorKind::OptimizationPolicy => "OPTIMIZATION_POLICY",
            ErrorKind::IncompleteSigning => "INCOMPLETE_SIGNING",
        }
    }

    /// Whether the error came from the validation pass rather than lookup.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorKind::ToolchainConflict
                | ErrorKind::OptimizationPolicy
                | ErrorKind::IncompleteSigning
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure to register, resolve or validate one variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariantError {
    #[error("variant '{variant}' is already registered")]
    DuplicateVariant { variant: String },

    #[error("variant '{variant}' is not registered")]
    UnknownVariant { variant: String },

    #[error("variant '{variant}': toolchain conflict on {field}: {detail}")]
    ToolchainConflict {
        variant: String,
        field: &'static str,
        detail: String,
    },

    #[error("variant '{variant}': shrink_resources requires {field} to be enabled")]
    OptimizationPolicy { variant: String, field: &'static str },

    #[error("variant '{variant}': signing field {field} is empty but the variant enables shrinking")]
    IncompleteSigning { variant: String, field: &'static str },
}

impl VariantError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VariantError::DuplicateVariant { .. } => ErrorKind::DuplicateVariant,
            VariantError::UnknownVariant { .. } => ErrorKind::UnknownVariant,
            VariantError::ToolchainConflict { .. } => ErrorKind::ToolchainConflict,
            VariantError::OptimizationPolicy { .. } => ErrorKind::OptimizationPolicy,
            VariantError::IncompleteSigning { .. } => ErrorKind::IncompleteSigning,
        }
    }

    pub fn variant(&self) -> &str {
        match self {
            VariantError::DuplicateVariant { variant }
            | VariantError::UnknownVariant { variant }
            | VariantError::ToolchainConflict { variant, .. }
            | VariantError::OptimizationPolicy { variant, .. }
            | VariantError::IncompleteSigning { variant, .. } => variant,
        }
    }

    /// Dotted path of the offending field, when the error is about one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            VariantError::DuplicateVariant { .. } | VariantError::UnknownVariant { .. } => None,
            VariantError::ToolchainConflict { field, .. }
            | VariantError::OptimizationPolicy { field, .. }
            | VariantError::IncompleteSigning { field, .. } => Some(*field),
        }
    }

    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            variant: self.variant().to_string(),
            kind: self.kind(),
            field: self.field().map(str::to_string),
            message: self.to_string(),
        }
    }
}

/// Serializable `(variant, kind, field)` triple handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub variant: String,

    pub kind: ErrorKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    pub message: String,
}

impl ErrorReport {
    /// Compact code, e.g. `OPTIMIZATION_POLICY:broken:optimization.shrink_code`.
    pub fn to_code(&self) -> String {
        match &self.field {
            Some(field) => format!("{}:{}:{}", self.kind, self.variant, field),
            None => format!("{}:{}", self.kind, self.variant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let err = VariantError::OptimizationPolicy {
            variant: "broken".to_string(),
            field: "optimization.shrink_code",
        };
        assert_eq!(err.kind(), ErrorKind::OptimizationPolicy);
        assert_eq!(err.variant(), "broken");
        assert_eq!(err.field(), Some("optimization.shrink_code"));
        assert!(err.kind().is_validation());

        let err = VariantError::UnknownVariant {
            variant: "staging".to_string(),
        };
        assert_eq!(err.field(), None);
        assert!(!err.kind().is_validation());
    }

    #[test]
    fn test_report_code() {
        let report = VariantError::IncompleteSigning {
            variant: "release".to_string(),
            field: "signing.alias",
        }
        .to_report();
        assert_eq!(report.to_code(), "INCOMPLETE_SIGNING:release:signing.alias");

        let report = VariantError::DuplicateVariant {
            variant: "debug".to_string(),
        }
        .to_report();
        assert_eq!(report.to_code(), "DUPLICATE_VARIANT:debug");
    }

    #[test]
    fn test_report_serialization() {
        let report = VariantError::ToolchainConflict {
            variant: "legacy".to_string(),
            field: "toolchain.min_platform",
            detail: "min_platform 30 exceeds target_platform 28".to_string(),
        }
        .to_report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "TOOLCHAIN_CONFLICT");
        assert_eq!(json["field"], "toolchain.min_platform");
    }
}
