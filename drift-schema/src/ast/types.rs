//! Opaque type descriptors.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// An opaque field type descriptor.
///
/// The entity model never interprets the descriptor; whether one type can
/// substitute for another is answered by the type compatibility oracle in
/// the diff engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
    /// The type identifier (e.g., `integer`, `string`, `decimal`).
    pub name: SmolStr,
}

impl FieldType {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self { name: name.into() }
    }

    /// Get the type name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_equality() {
        assert_eq!(FieldType::new("integer"), FieldType::from("integer"));
        assert_ne!(FieldType::new("integer"), FieldType::new("string"));
    }

    #[test]
    fn test_field_type_display() {
        assert_eq!(FieldType::new("decimal").to_string(), "decimal");
    }
}
