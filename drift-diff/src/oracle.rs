//! Type compatibility oracle.
//!
//! The engine never interprets type descriptors itself. Whether one type
//! can substitute for another is answered by a [`TypeOracle`], injected by
//! the caller. New field types are supported by extending the oracle, not
//! by touching the classifier.

use indexmap::IndexSet;
use smol_str::SmolStr;
use std::collections::HashSet;
use thiserror::Error;

use drift_schema::FieldType;

/// Verdict on substituting one type for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TypeCompatibility {
    /// Same storage representation.
    Identical,
    /// Every old value fits the new type.
    Widening,
    /// Some old values may not fit the new type.
    Narrowing,
    /// No meaningful conversion exists.
    Incompatible,
}

impl std::fmt::Display for TypeCompatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identical => write!(f, "identical"),
            Self::Widening => write!(f, "widening"),
            Self::Narrowing => write!(f, "narrowing"),
            Self::Incompatible => write!(f, "incompatible"),
        }
    }
}

/// The oracle could not resolve a type descriptor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown type `{type_name}`")]
pub struct UnresolvedType {
    /// The type name that could not be resolved.
    pub type_name: SmolStr,
}

impl UnresolvedType {
    /// Create a new unresolved-type error.
    pub fn new(type_name: impl Into<SmolStr>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

/// Judges whether one field type can be safely substituted for another.
pub trait TypeOracle {
    /// Compare two type descriptors.
    ///
    /// Returns an error when either descriptor names a type unknown to the
    /// oracle; the classifier downgrades such changes to a conservative
    /// breaking verdict rather than guessing.
    fn compare(&self, old: &FieldType, new: &FieldType) -> Result<TypeCompatibility, UnresolvedType>;
}

/// Table-driven oracle over a registry of known types and widening pairs.
///
/// Widening is directional: registering `integer -> bigint` makes the
/// reverse comparison a narrowing. Types known to the registry but not
/// related by any pair are incompatible.
#[derive(Debug, Clone, Default)]
pub struct TableOracle {
    /// Known type names, in registration order.
    types: IndexSet<SmolStr>,
    /// Directed widening pairs (old, new).
    widenings: HashSet<(SmolStr, SmolStr)>,
}

impl TableOracle {
    /// Create an empty oracle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an oracle pre-loaded with the common scalar types and
    /// widening lattice.
    pub fn with_defaults() -> Self {
        let mut oracle = Self::new();
        for name in [
            "integer",
            "biginteger",
            "float",
            "decimal",
            "string",
            "text",
            "boolean",
            "date",
            "datetime",
            "json",
            "uuid",
        ] {
            oracle = oracle.with_type(name);
        }
        oracle
            .with_widening("integer", "biginteger")
            .with_widening("integer", "decimal")
            .with_widening("integer", "float")
            .with_widening("biginteger", "decimal")
            .with_widening("string", "text")
            .with_widening("date", "datetime")
    }

    /// Register a known type name.
    pub fn with_type(mut self, name: impl Into<SmolStr>) -> Self {
        self.types.insert(name.into());
        self
    }

    /// Register a directed widening pair; both names become known types.
    pub fn with_widening(mut self, old: impl Into<SmolStr>, new: impl Into<SmolStr>) -> Self {
        let old = old.into();
        let new = new.into();
        self.types.insert(old.clone());
        self.types.insert(new.clone());
        self.widenings.insert((old, new));
        self
    }

    /// Check if a type name is known.
    pub fn knows(&self, name: &str) -> bool {
        self.types.contains(name)
    }
}

impl TypeOracle for TableOracle {
    fn compare(
        &self,
        old: &FieldType,
        new: &FieldType,
    ) -> Result<TypeCompatibility, UnresolvedType> {
        for ty in [old, new] {
            if !self.knows(ty.as_str()) {
                return Err(UnresolvedType::new(ty.name.clone()));
            }
        }

        if old == new {
            return Ok(TypeCompatibility::Identical);
        }

        let pair = (old.name.clone(), new.name.clone());
        if self.widenings.contains(&pair) {
            return Ok(TypeCompatibility::Widening);
        }
        let reverse = (new.name.clone(), old.name.clone());
        if self.widenings.contains(&reverse) {
            return Ok(TypeCompatibility::Narrowing);
        }

        Ok(TypeCompatibility::Incompatible)
    }
}
