//! Error types for the comparison engine.

use drift_schema::SchemaError;
use thiserror::Error;

/// Result type alias for comparison operations.
pub type DiffResult<T> = Result<T, DiffError>;

/// Errors that abort a schema comparison.
///
/// Oracle failures never appear here: they are recovered per change and
/// surface as conservative `Breaking`/`High` classifications instead.
#[derive(Debug, Error)]
pub enum DiffError {
    /// One of the input schemas violates a structural invariant.
    #[error("structural error in schema `{schema}`")]
    Structural {
        /// Name of the offending schema.
        schema: String,
        /// The underlying validation failure.
        #[source]
        source: SchemaError,
    },
}

impl DiffError {
    /// Create a structural error for a named input schema.
    pub fn structural(schema: impl Into<String>, source: SchemaError) -> Self {
        Self::Structural {
            schema: schema.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_display() {
        let err = DiffError::structural("User", SchemaError::empty_field_name("User"));
        assert!(err.to_string().contains("User"));
    }

    #[test]
    fn test_structural_error_source() {
        use std::error::Error;
        let err = DiffError::structural("User", SchemaError::empty_field_name("User"));
        assert!(err.source().is_some());
    }
}
