//! Top-level schema definition.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{Field, Relationship, Value};

/// A complete schema: one named, versioned data-model definition.
///
/// Fields and relationships are keyed by name in declaration order, so
/// lookups are O(1) and iteration is deterministic. Instances are treated
/// as immutable once constructed; the diff engine never mutates them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name.
    pub name: SmolStr,
    /// Storage identifier (table name).
    pub table: SmolStr,
    /// All fields, unique by name, in declaration order.
    pub fields: IndexMap<SmolStr, Field>,
    /// All relationships, unique by name, in declaration order.
    pub relationships: IndexMap<SmolStr, Relationship>,
    /// Boolean/scalar schema flags (timestamps, soft-delete, ...).
    pub options: IndexMap<SmolStr, Value>,
    /// Free-form metadata.
    pub metadata: IndexMap<SmolStr, Value>,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new(name: impl Into<SmolStr>, table: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            ..Default::default()
        }
    }

    /// Add a field to the schema. Replaces any field with the same name.
    pub fn add_field(&mut self, field: Field) {
        self.fields.insert(field.name.clone(), field);
    }

    /// Add a relationship to the schema. Replaces on duplicate name.
    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships
            .insert(relationship.name.clone(), relationship);
    }

    /// Builder-style field addition.
    pub fn with_field(mut self, field: Field) -> Self {
        self.add_field(field);
        self
    }

    /// Builder-style relationship addition.
    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.add_relationship(relationship);
        self
    }

    /// Set a schema option flag.
    pub fn with_option(mut self, key: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Set a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Get a relationship by name.
    pub fn get_relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }

    /// Get all field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|s| s.as_str())
    }

    /// Get all relationship names in declaration order.
    pub fn relationship_names(&self) -> impl Iterator<Item = &str> {
        self.relationships.keys().map(|s| s.as_str())
    }

    /// Check if the schema records created/updated timestamps.
    pub fn has_timestamps(&self) -> bool {
        self.options
            .get("timestamps")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Check if the schema uses soft deletion.
    pub fn has_soft_delete(&self) -> bool {
        self.options
            .get("soft_delete")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Get statistics about the schema.
    pub fn stats(&self) -> SchemaStats {
        SchemaStats {
            field_count: self.fields.len(),
            relationship_count: self.relationships.len(),
            option_count: self.options.len(),
        }
    }
}

/// Schema statistics for debugging/info.
#[derive(Debug, Clone, Default)]
pub struct SchemaStats {
    /// Number of fields.
    pub field_count: usize,
    /// Number of relationships.
    pub relationship_count: usize,
    /// Number of option flags.
    pub option_count: usize,
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        write!(
            f,
            "Schema {} ({}: {} fields, {} relationships)",
            self.name, self.table, stats.field_count, stats.relationship_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::RelationshipKind;
    use pretty_assertions::assert_eq;

    fn make_schema() -> Schema {
        Schema::new("User", "users")
            .with_field(Field::new("id", "integer"))
            .with_field(Field::new("email", "string").with_length(255).with_unique(true))
            .with_relationship(Relationship::new("posts", RelationshipKind::HasMany, "Post"))
    }

    #[test]
    fn test_schema_lookup() {
        let schema = make_schema();
        assert!(schema.get_field("id").is_some());
        assert!(schema.get_field("missing").is_none());
        assert!(schema.get_relationship("posts").is_some());
    }

    #[test]
    fn test_schema_declaration_order() {
        let schema = make_schema();
        let names: Vec<&str> = schema.field_names().collect();
        assert_eq!(names, vec!["id", "email"]);
    }

    #[test]
    fn test_schema_duplicate_field_replaces() {
        let mut schema = make_schema();
        schema.add_field(Field::new("email", "text"));
        assert_eq!(schema.fields.len(), 2);
        assert_eq!(
            schema.get_field("email").unwrap().field_type.as_str(),
            "text"
        );
    }

    #[test]
    fn test_schema_options() {
        let schema = Schema::new("Post", "posts")
            .with_option("timestamps", true)
            .with_option("soft_delete", false);

        assert!(schema.has_timestamps());
        assert!(!schema.has_soft_delete());
        assert!(!Schema::new("Bare", "bare").has_timestamps());
    }

    #[test]
    fn test_schema_serde_round_trip() {
        let schema = make_schema().with_option("timestamps", true);
        let json = serde_json::to_string(&schema).unwrap();
        let parsed: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schema);
    }

    #[test]
    fn test_schema_stats_and_display() {
        let schema = make_schema();
        let stats = schema.stats();
        assert_eq!(stats.field_count, 2);
        assert_eq!(stats.relationship_count, 1);
        assert_eq!(
            schema.to_string(),
            "Schema User (users: 2 fields, 1 relationships)"
        );
    }
}
