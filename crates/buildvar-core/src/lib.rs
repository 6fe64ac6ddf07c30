//! Build-variant resolution.
//!
//! A [`VariantResolver`] holds a base configuration (toolchain, signing,
//! optimization) and a registry of named variant overrides. Resolving a
//! variant applies its overrides to the base field by field and validates
//! the result, producing an immutable [`BuildVariant`] or a structured
//! [`VariantError`] naming the variant and the offending field.

mod error;
mod model;
mod overrides;
mod registry;
mod resolver;
mod state;
mod validate;

pub use error::{ErrorKind, ErrorReport, VariantError};
pub use model::{
    BaseConfig, BuildVariant, CredentialRef, OptimizationPolicy, PlatformLevel, SigningIdentity,
    ToolchainSpec,
};
pub use overrides::{
    merge, OptimizationOverrides, SigningOverrides, ToolchainOverrides, VariantOverrides,
};
pub use registry::{RegistryEntry, VariantRegistry};
pub use resolver::{OutcomeReport, ResolveAll, VariantOutcome, VariantResolver};
pub use state::VariantState;
pub use validate::{check, validate};
