//! Registration of diagnostic fields with the history system.
//!
//! Fire methods declare the diagnostic series they produce once, during
//! initialisation.
//! The history system itself lives outside this crate; it only needs to
//! implement [`FieldRegistry`].
//! [`FieldCatalog`] is an in-memory registry used by drivers that do not write
//! history files, and by tests.
//!
//! # Example
//!
//! ```rust
//! use cnfire_core::decomp::EntityKind;
//! use cnfire_core::fields::{FieldCatalog, FieldDefinition, FieldRegistry};
//!
//! let mut catalog = FieldCatalog::new();
//! catalog
//!     .register(
//!         FieldDefinition::new("FAREA_BURNED", "proportion/sec", EntityKind::Column, "fractional area burned"),
//!         10,
//!     )
//!     .unwrap();
//! assert_eq!(catalog.get("FAREA_BURNED").unwrap().size, 10);
//! assert!(catalog.register(
//!     FieldDefinition::new("FAREA_BURNED", "proportion/sec", EntityKind::Column, ""),
//!     10,
//! ).is_err());
//! ```

use crate::decomp::EntityKind;
use crate::errors::{FireError, FireResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata of a diagnostic field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Unique history name (e.g. "FAREA_BURNED")
    pub name: String,
    pub unit: String,
    /// Entity the field is indexed by
    pub kind: EntityKind,
    /// Human-readable description
    pub description: String,
}

impl FieldDefinition {
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        kind: EntityKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            kind,
            description: description.into(),
        }
    }
}

/// A field that has been registered along with its allocated size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredField {
    pub definition: FieldDefinition,
    /// Number of entries allocated for the partition
    pub size: usize,
}

/// Receives field registrations from fire methods
pub trait FieldRegistry {
    /// Register a field with `size` entries
    ///
    /// Registering the same name twice is an error.
    fn register(&mut self, definition: FieldDefinition, size: usize) -> FireResult<()>;
}

/// In-memory [`FieldRegistry`] preserving registration order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldCatalog {
    fields: Vec<RegisteredField>,
    lookup: HashMap<String, usize>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredField> {
        self.lookup.get(name).map(|i| &self.fields[*i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|f| f.definition.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldRegistry for FieldCatalog {
    fn register(&mut self, definition: FieldDefinition, size: usize) -> FireResult<()> {
        if self.lookup.contains_key(&definition.name) {
            return Err(FireError::FieldAlreadyRegistered(definition.name));
        }
        self.lookup
            .insert(definition.name.clone(), self.fields.len());
        self.fields.push(RegisteredField { definition, size });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_preserves_order() {
        let mut catalog = FieldCatalog::new();
        for name in ["B", "A", "C"] {
            catalog
                .register(FieldDefinition::new(name, "1", EntityKind::Patch, ""), 3)
                .unwrap();
        }
        assert_eq!(catalog.names(), vec!["B", "A", "C"]);
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains("A"));
        assert!(!catalog.contains("D"));
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut catalog = FieldCatalog::new();
        let def = FieldDefinition::new("NFIRE", "counts/km2/sec", EntityKind::Column, "");
        catalog.register(def.clone(), 2).unwrap();
        let err = catalog.register(def, 2).unwrap_err();
        assert!(matches!(err, FireError::FieldAlreadyRegistered(name) if name == "NFIRE"));
        assert_eq!(catalog.len(), 1);
    }
}
