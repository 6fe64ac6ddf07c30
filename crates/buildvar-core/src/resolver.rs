//! Variant resolver.
//!
//! Owns the base configuration and the registry for one build invocation.
//! Registration is lazy; resolution applies the overrides to the base and
//! validates the result, without touching resolver state.

use serde::Serialize;

use crate::error::{ErrorKind, ErrorReport, VariantError};
use crate::model::{BaseConfig, BuildVariant};
use crate::overrides::{merge, VariantOverrides};
use crate::registry::VariantRegistry;
use crate::state::VariantState;
use crate::validate;

#[derive(Debug, Clone)]
pub struct VariantResolver {
    base: BaseConfig,
    registry: VariantRegistry,
}

impl VariantResolver {
    pub fn new(base: BaseConfig) -> Self {
        Self {
            base,
            registry: VariantRegistry::new(),
        }
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }

    pub fn registry(&self) -> &VariantRegistry {
        &self.registry
    }

    /// Register `overrides` under a new variant name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        overrides: VariantOverrides,
    ) -> Result<(), VariantError> {
        self.registry.insert(name, overrides)
    }

    /// Resolve and validate one variant.
    pub fn resolve(&self, name: &str) -> Result<BuildVariant, VariantError> {
        let merged = self.merge_only(name)?;
        validate::validate(merged)
    }

    /// Apply overrides without validating (the RESOLVED state).
    pub fn merge_only(&self, name: &str) -> Result<BuildVariant, VariantError> {
        let overrides = self
            .registry
            .get(name)
            .ok_or_else(|| VariantError::UnknownVariant {
                variant: name.to_string(),
            })?;
        Ok(merge(&self.base, name, overrides))
    }

    /// Check a variant; returns it unchanged on success.
    pub fn validate(&self, variant: BuildVariant) -> Result<BuildVariant, VariantError> {
        validate::validate(variant)
    }

    /// Every registered variant, in registration order.
    ///
    /// The sequence is lazy and may be iterated again by cloning it or
    /// calling this method again.
    pub fn resolve_all(&self) -> ResolveAll<'_> {
        ResolveAll {
            resolver: self,
            next: 0,
        }
    }

    /// State a variant reaches when resolved now.
    pub fn state(&self, name: &str) -> VariantState {
        self.lifecycle(name)
            .last()
            .copied()
            .unwrap_or(VariantState::Unregistered)
    }

    /// Every state a variant passes through when resolved now, starting
    /// at UNREGISTERED and ending in a terminal state.
    pub fn lifecycle(&self, name: &str) -> Vec<VariantState> {
        let mut path = vec![VariantState::Unregistered];

        if !self.contains(name) {
            advance(&mut path, VariantState::ResolutionFailed(ErrorKind::UnknownVariant));
            return path;
        }
        advance(&mut path, VariantState::Registered);

        let merged = match self.merge_only(name) {
            Ok(variant) => variant,
            Err(err) => {
                advance(&mut path, VariantState::ResolutionFailed(err.kind()));
                return path;
            }
        };
        advance(&mut path, VariantState::Resolved);

        match validate::check(&merged) {
            Ok(()) => advance(&mut path, VariantState::Validated),
            Err(err) => advance(&mut path, VariantState::ValidationFailed(err.kind())),
        }
        path
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.registry.names()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

fn advance(path: &mut Vec<VariantState>, next: VariantState) {
    if let Some(current) = path.last() {
        debug_assert!(current.can_transition_to(next), "{} -> {}", current, next);
    }
    path.push(next);
}

/// Outcome of resolving one variant during enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantOutcome {
    pub name: String,
    pub result: Result<BuildVariant, VariantError>,
}

impl VariantOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn to_report(&self) -> OutcomeReport {
        match &self.result {
            Ok(variant) => OutcomeReport {
                name: self.name.clone(),
                ok: true,
                variant: Some(variant.clone()),
                error: None,
            },
            Err(err) => OutcomeReport {
                name: self.name.clone(),
                ok: false,
                variant: None,
                error: Some(err.to_report()),
            },
        }
    }
}

/// Serializable form of [`VariantOutcome`].
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeReport {
    pub name: String,

    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<BuildVariant>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

/// Lazy enumeration returned by [`VariantResolver::resolve_all`].
#[derive(Debug, Clone)]
pub struct ResolveAll<'a> {
    resolver: &'a VariantResolver,
    next: usize,
}

impl Iterator for ResolveAll<'_> {
    type Item = VariantOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.resolver.registry.entries().get(self.next)?;
        self.next += 1;
        let result = validate::validate(merge(&self.resolver.base, &entry.name, &entry.overrides));
        Some(VariantOutcome {
            name: entry.name.clone(),
            result,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.resolver.registry.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ResolveAll<'_> {}
