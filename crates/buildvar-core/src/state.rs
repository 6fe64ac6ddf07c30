//! Per-variant lifecycle
//!
//! UNREGISTERED → REGISTERED → RESOLVED → VALIDATED, with terminal
//! RESOLUTION_FAILED / VALIDATION_FAILED carrying the error kind.
//! Failed variants are never retried; the caller registers a corrected
//! override in a fresh resolver. `VariantResolver::lifecycle` walks this
//! table for one variant.

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantState {
    Unregistered,
    Registered,
    /// Overrides applied, not yet validated
    Resolved,
    Validated,
    ResolutionFailed(ErrorKind),
    ValidationFailed(ErrorKind),
}

impl VariantState {
    /// Check if transition from this state to target is valid
    pub fn can_transition_to(&self, target: VariantState) -> bool {
        match (self, target) {
            (VariantState::Unregistered, VariantState::Registered) => true,
            (VariantState::Unregistered, VariantState::ResolutionFailed(_)) => true,
            (VariantState::Registered, VariantState::Resolved) => true,
            (VariantState::Registered, VariantState::ResolutionFailed(_)) => true,
            (VariantState::Resolved, VariantState::Validated) => true,
            (VariantState::Resolved, VariantState::ValidationFailed(_)) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for VariantState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariantState::Unregistered => write!(f, "UNREGISTERED"),
            VariantState::Registered => write!(f, "REGISTERED"),
            VariantState::Resolved => write!(f, "RESOLVED"),
            VariantState::Validated => write!(f, "VALIDATED"),
            VariantState::ResolutionFailed(kind) => write!(f, "RESOLUTION_FAILED({})", kind),
            VariantState::ValidationFailed(kind) => write!(f, "VALIDATION_FAILED({})", kind),
        }
    }
}
