//! Field definitions for the Drift entity model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{FieldType, Value};

/// A single typed attribute of a schema.
///
/// The closed set of universally applicable attributes is modeled directly;
/// type-specific keys live in the `extra` bag and are compared generically
/// by the differ without knowledge of their semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, unique within a schema.
    pub name: SmolStr,
    /// Opaque type descriptor.
    pub field_type: FieldType,
    /// Whether the field accepts null.
    pub nullable: bool,
    /// Whether the field carries a unique constraint.
    pub unique: bool,
    /// Whether the field is indexed.
    pub index: bool,
    /// Default value, if any.
    pub default: Option<Value>,
    /// Maximum length, for sized types.
    pub length: Option<u32>,
    /// Numeric precision, for decimal types.
    pub precision: Option<u32>,
    /// Numeric scale, for decimal types.
    pub scale: Option<u32>,
    /// Ordered validation-rule tokens (opaque to the engine).
    pub rules: Vec<SmolStr>,
    /// Documentation comment.
    pub comment: Option<String>,
    /// Type-specific attributes, keyed and compared generically.
    pub extra: IndexMap<SmolStr, Value>,
}

impl Field {
    /// Create a new required field with no constraints.
    pub fn new(name: impl Into<SmolStr>, field_type: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            nullable: false,
            unique: false,
            index: false,
            default: None,
            length: None,
            precision: None,
            scale: None,
            rules: Vec::new(),
            comment: None,
            extra: IndexMap::new(),
        }
    }

    /// Get the field name as a string slice.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Mark the field unique.
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Mark the field indexed.
    pub fn with_index(mut self, index: bool) -> Self {
        self.index = index;
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the maximum length.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Set precision and scale.
    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Append a validation rule token.
    pub fn with_rule(mut self, rule: impl Into<SmolStr>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Set the documentation comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set a type-specific extra attribute.
    pub fn with_extra(mut self, key: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Check if the field carries any size constraint.
    pub fn is_sized(&self) -> bool {
        self.length.is_some() || self.precision.is_some() || self.scale.is_some()
    }

    /// Check if the field carries a specific validation rule.
    pub fn has_rule(&self, rule: &str) -> bool {
        self.rules.iter().any(|r| r == rule)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.field_type)?;
        if let Some(length) = self.length {
            write!(f, "({})", length)?;
        } else if let (Some(p), Some(s)) = (self.precision, self.scale) {
            write!(f, "({},{})", p, s)?;
        }
        if self.nullable {
            write!(f, "?")?;
        }
        if self.unique {
            write!(f, " @unique")?;
        }
        if self.index {
            write!(f, " @index")?;
        }
        if let Some(default) = &self.default {
            write!(f, " @default({})", default)?;
        }
        Ok(())
    }
}
