//! Error types for schema structural validation.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Structural invariant violations in a schema entity.
///
/// These are caller errors: a schema that trips one of these must not be
/// handed to the diff engine, and the engine refuses it outright rather
/// than producing a partial result.
#[derive(Error, Debug, Diagnostic)]
pub enum SchemaError {
    /// A field has an empty name.
    #[error("schema `{schema}` contains a field with an empty name")]
    #[diagnostic(code(drift::schema::empty_field_name))]
    EmptyFieldName { schema: String },

    /// A relationship has an empty name.
    #[error("schema `{schema}` contains a relationship with an empty name")]
    #[diagnostic(code(drift::schema::empty_relationship_name))]
    EmptyRelationshipName { schema: String },

    /// A field has an empty type descriptor.
    #[error("field `{schema}.{field}` has an empty type")]
    #[diagnostic(code(drift::schema::empty_field_type))]
    EmptyFieldType { schema: String, field: String },

    /// A non-polymorphic relationship is missing its target.
    #[error("relationship `{schema}.{relationship}` ({kind}) has no target schema")]
    #[diagnostic(code(drift::schema::missing_target))]
    MissingTarget {
        schema: String,
        relationship: String,
        kind: String,
    },

    /// A many-to-many relationship is missing its pivot descriptor.
    #[error("relationship `{schema}.{relationship}` is many-to-many but has no pivot descriptor")]
    #[diagnostic(code(drift::schema::missing_pivot))]
    MissingPivot {
        schema: String,
        relationship: String,
    },

    /// A pivot descriptor is present on a kind that does not use one.
    #[error("relationship `{schema}.{relationship}` ({kind}) must not carry a pivot descriptor")]
    #[diagnostic(code(drift::schema::unexpected_pivot))]
    UnexpectedPivot {
        schema: String,
        relationship: String,
        kind: String,
    },

    /// Scale declared without precision, or exceeding it.
    #[error("field `{schema}.{field}` has an invalid precision/scale combination")]
    #[diagnostic(code(drift::schema::invalid_size))]
    InvalidSizeConstraint { schema: String, field: String },

    /// A field and a relationship share the same name.
    #[error("`{schema}.{name}` is declared both as a field and as a relationship")]
    #[diagnostic(code(drift::schema::name_conflict))]
    NameConflict { schema: String, name: String },

    /// Validation error with multiple issues.
    #[error("schema validation failed with {count} error(s)")]
    #[diagnostic(code(drift::schema::validation_failed))]
    ValidationFailed {
        count: usize,
        #[related]
        errors: Vec<SchemaError>,
    },
}

impl SchemaError {
    /// Create an empty-field-name error.
    pub fn empty_field_name(schema: impl Into<String>) -> Self {
        Self::EmptyFieldName {
            schema: schema.into(),
        }
    }

    /// Create a missing-target error.
    pub fn missing_target(
        schema: impl Into<String>,
        relationship: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self::MissingTarget {
            schema: schema.into(),
            relationship: relationship.into(),
            kind: kind.into(),
        }
    }

    /// Create a name-conflict error.
    pub fn name_conflict(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NameConflict {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Wrap a list of errors into a single aggregate failure.
    ///
    /// Returns `None` when the list is empty.
    pub fn aggregate(errors: Vec<SchemaError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self::ValidationFailed {
                count: errors.len(),
                errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::missing_target("Post", "author", "belongs-to");
        assert!(err.to_string().contains("Post.author"));
        assert!(err.to_string().contains("belongs-to"));
    }

    #[test]
    fn test_aggregate_empty_is_none() {
        assert!(SchemaError::aggregate(vec![]).is_none());
    }

    #[test]
    fn test_aggregate_counts() {
        let err = SchemaError::aggregate(vec![
            SchemaError::empty_field_name("User"),
            SchemaError::name_conflict("User", "posts"),
        ])
        .unwrap();
        assert!(err.to_string().contains("2 error(s)"));
    }
}
