//! Variant registry: unique names mapped to overrides, kept in
//! registration order.

use std::collections::HashMap;

use crate::error::VariantError;
use crate::overrides::VariantOverrides;

/// A registered variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub name: String,
    pub overrides: VariantOverrides,
}

/// Name → overrides mapping, populated once per build invocation.
#[derive(Debug, Clone, Default)]
pub struct VariantRegistry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
}

impl VariantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `overrides` under `name`. Fails if the name is taken.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        overrides: VariantOverrides,
    ) -> Result<(), VariantError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(VariantError::DuplicateVariant { variant: name });
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(RegistryEntry { name, overrides });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&VariantOverrides> {
        self.index.get(name).map(|&i| &self.entries[i].overrides)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
