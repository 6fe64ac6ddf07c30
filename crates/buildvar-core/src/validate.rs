//! Consistency checks for a resolved variant.
//!
//! Checks run in a fixed order and stop at the first failure:
//! 1. toolchain platform levels
//! 2. optimization policy (`shrink_resources` implies `shrink_code`)
//! 3. signing completeness for release-grade variants
//!
//! Validation never repairs a variant.

use crate::error::VariantError;
use crate::model::{BuildVariant, PlatformLevel};

/// Validate `variant`, returning it unchanged on success.
pub fn validate(variant: BuildVariant) -> Result<BuildVariant, VariantError> {
    check(&variant)?;
    Ok(variant)
}

/// Run every check against a borrowed variant.
pub fn check(variant: &BuildVariant) -> Result<(), VariantError> {
    check_toolchain(variant)?;
    check_optimization(variant)?;
    check_signing(variant)
}

fn check_toolchain(variant: &BuildVariant) -> Result<(), VariantError> {
    let toolchain = &variant.toolchain;
    let min = toolchain.min_platform;

    // Latest satisfies every bound; only concrete pairs can conflict.
    if let Some(target) = toolchain.target_platform.api() {
        if min > target {
            return Err(conflict(
                variant,
                "toolchain.min_platform",
                format!("min_platform {} exceeds target_platform {}", min, target),
            ));
        }
    }

    if let PlatformLevel::Api(compile) = toolchain.compile_platform {
        if let Some(target) = toolchain.target_platform.api() {
            if target > compile {
                return Err(conflict(
                    variant,
                    "toolchain.target_platform",
                    format!("target_platform {} exceeds compile_platform {}", target, compile),
                ));
            }
        }
        if min > compile {
            return Err(conflict(
                variant,
                "toolchain.min_platform",
                format!("min_platform {} exceeds compile_platform {}", min, compile),
            ));
        }
    }

    Ok(())
}

fn check_optimization(variant: &BuildVariant) -> Result<(), VariantError> {
    let policy = &variant.optimization;
    if policy.shrink_resources && !policy.shrink_code {
        return Err(VariantError::OptimizationPolicy {
            variant: variant.name.clone(),
            field: "optimization.shrink_code",
        });
    }
    Ok(())
}

fn check_signing(variant: &BuildVariant) -> Result<(), VariantError> {
    if !variant.is_release_grade() {
        return Ok(());
    }

    let field = match variant.signing.first_missing_field() {
        None => return Ok(()),
        Some("alias") => "signing.alias",
        Some("credential_ref") => "signing.credential_ref",
        Some(_) => "signing.keystore_location",
    };

    Err(VariantError::IncompleteSigning {
        variant: variant.name.clone(),
        field,
    })
}

fn conflict(variant: &BuildVariant, field: &'static str, detail: String) -> VariantError {
    VariantError::ToolchainConflict {
        variant: variant.name.clone(),
        field,
        detail,
    }
}
