//! Structural validation for schema entities.
//!
//! This module checks the invariants the diff engine assumes:
//! - Field and relationship names are non-empty and do not collide
//! - Non-polymorphic relationships name a target schema
//! - Pivot descriptors appear exactly on many-to-many relationships
//! - Precision/scale combinations are well-formed

use tracing::debug;

use crate::ast::Schema;
use crate::error::{SchemaError, SchemaResult};

/// Schema validator collecting all structural violations.
#[derive(Debug, Default)]
pub struct Validator {
    /// Collected validation errors.
    errors: Vec<SchemaError>,
}

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a schema, reporting every violation at once.
    pub fn validate(&mut self, schema: &Schema) -> SchemaResult<()> {
        self.errors.clear();

        self.check_fields(schema);
        self.check_relationships(schema);
        self.check_name_conflicts(schema);

        debug!(
            schema = %schema.name,
            errors = self.errors.len(),
            "schema validation finished"
        );

        match SchemaError::aggregate(std::mem::take(&mut self.errors)) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn check_fields(&mut self, schema: &Schema) {
        for field in schema.fields.values() {
            if field.name.is_empty() {
                self.errors
                    .push(SchemaError::empty_field_name(schema.name.as_str()));
            }
            if field.field_type.as_str().is_empty() {
                self.errors.push(SchemaError::EmptyFieldType {
                    schema: schema.name.to_string(),
                    field: field.name.to_string(),
                });
            }
            // Scale is meaningless without precision and must not exceed it.
            let size_ok = match (field.precision, field.scale) {
                (None, Some(_)) => false,
                (Some(p), Some(s)) => s <= p,
                _ => true,
            };
            if !size_ok {
                self.errors.push(SchemaError::InvalidSizeConstraint {
                    schema: schema.name.to_string(),
                    field: field.name.to_string(),
                });
            }
        }
    }

    fn check_relationships(&mut self, schema: &Schema) {
        for rel in schema.relationships.values() {
            if rel.name.is_empty() {
                self.errors.push(SchemaError::EmptyRelationshipName {
                    schema: schema.name.to_string(),
                });
            }
            if rel.kind.requires_target() && rel.target.as_deref().is_none_or(str::is_empty) {
                self.errors.push(SchemaError::missing_target(
                    schema.name.as_str(),
                    rel.name.as_str(),
                    rel.kind.to_string(),
                ));
            }
            if rel.kind.uses_pivot() && rel.pivot.is_none() {
                self.errors.push(SchemaError::MissingPivot {
                    schema: schema.name.to_string(),
                    relationship: rel.name.to_string(),
                });
            }
            if !rel.kind.uses_pivot() && rel.pivot.is_some() {
                self.errors.push(SchemaError::UnexpectedPivot {
                    schema: schema.name.to_string(),
                    relationship: rel.name.to_string(),
                    kind: rel.kind.to_string(),
                });
            }
        }
    }

    fn check_name_conflicts(&mut self, schema: &Schema) {
        for name in schema.relationships.keys() {
            if schema.fields.contains_key(name) {
                self.errors
                    .push(SchemaError::name_conflict(schema.name.as_str(), name.as_str()));
            }
        }
    }
}

/// Validate a schema's structural invariants.
pub fn validate_schema(schema: &Schema) -> SchemaResult<()> {
    Validator::new().validate(schema)
}
