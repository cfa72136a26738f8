//! The comparison engine facade.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

#[cfg(feature = "tracing")]
use tracing::debug;

use drift_schema::{Schema, validate_schema};

use crate::aggregate::{DiffSummary, aggregate};
use crate::classify::{ChangeClassifier, ClassifiedChange};
use crate::differ::{diff_fields, diff_relationships};
use crate::error::{DiffError, DiffResult};
use crate::impact::{MigrationImpact, analyze_impact};
use crate::oracle::TypeOracle;

/// The complete, immutable result of comparing two schema versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDiff {
    /// Name of the compared schema (taken from the new version).
    pub schema_name: SmolStr,
    /// Storage identifier of the compared schema.
    pub table: SmolStr,
    /// Counts, compatibility verdict, and impact level.
    pub summary: DiffSummary,
    /// Classified field changes, in deterministic order.
    pub field_changes: Vec<ClassifiedChange>,
    /// Classified relationship changes, in deterministic order.
    pub relationship_changes: Vec<ClassifiedChange>,
    /// The breaking subset of all changes, field changes first.
    pub breaking_changes: Vec<ClassifiedChange>,
    /// Derived migration operations, risk, and complexity.
    pub migration_impact: MigrationImpact,
}

impl SchemaDiff {
    /// Check if the diff contains any breaking change. O(1).
    pub fn has_breaking_changes(&self) -> bool {
        !self.breaking_changes.is_empty()
    }

    /// Check if the two schemas were identical.
    pub fn is_empty(&self) -> bool {
        self.field_changes.is_empty() && self.relationship_changes.is_empty()
    }

    /// Get a one-line human-readable summary of the diff.
    pub fn summary_line(&self) -> String {
        let mut parts = Vec::new();

        let fields = &self.summary.fields;
        if fields.added > 0 {
            parts.push(format!("add {} fields", fields.added));
        }
        if fields.removed > 0 {
            parts.push(format!("remove {} fields", fields.removed));
        }
        if fields.modified > 0 {
            parts.push(format!("modify {} fields", fields.modified));
        }

        let rels = &self.summary.relationships;
        if rels.added > 0 {
            parts.push(format!("add {} relationships", rels.added));
        }
        if rels.removed > 0 {
            parts.push(format!("remove {} relationships", rels.removed));
        }
        if rels.modified > 0 {
            parts.push(format!("modify {} relationships", rels.modified));
        }

        if parts.is_empty() {
            "no changes".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Compares two schema versions and produces a [`SchemaDiff`].
///
/// The comparator holds no mutable state; one instance can serve any
/// number of comparisons, concurrently if desired.
pub struct SchemaComparator<'a> {
    oracle: &'a dyn TypeOracle,
}

impl<'a> SchemaComparator<'a> {
    /// Create a comparator over a type compatibility oracle.
    pub fn new(oracle: &'a dyn TypeOracle) -> Self {
        Self { oracle }
    }

    /// Compare an old and a new schema version.
    ///
    /// Both inputs are validated first; a structural violation aborts the
    /// comparison with no partial result. Oracle failures do not abort:
    /// they surface as conservative breaking classifications on the
    /// affected changes.
    pub fn compare(&self, old: &Schema, new: &Schema) -> DiffResult<SchemaDiff> {
        validate_schema(old).map_err(|e| DiffError::structural(old.name.as_str(), e))?;
        validate_schema(new).map_err(|e| DiffError::structural(new.name.as_str(), e))?;

        let classifier = ChangeClassifier::new(self.oracle);

        let field_changes: Vec<ClassifiedChange> = diff_fields(&old.fields, &new.fields)
            .into_iter()
            .map(|c| classifier.classify(c))
            .collect();

        let relationship_changes: Vec<ClassifiedChange> =
            diff_relationships(&old.relationships, &new.relationships)
                .into_iter()
                .map(|c| classifier.classify(c))
                .collect();

        let summary = aggregate(&field_changes, &relationship_changes);

        let breaking_changes: Vec<ClassifiedChange> = field_changes
            .iter()
            .chain(&relationship_changes)
            .filter(|c| c.is_breaking())
            .cloned()
            .collect();

        let all_changes: Vec<ClassifiedChange> = field_changes
            .iter()
            .chain(&relationship_changes)
            .cloned()
            .collect();
        let migration_impact = analyze_impact(&all_changes);

        #[cfg(feature = "tracing")]
        debug!(
            schema = %new.name,
            field_changes = field_changes.len(),
            relationship_changes = relationship_changes.len(),
            compatibility = %summary.compatibility,
            "schema comparison finished"
        );

        Ok(SchemaDiff {
            schema_name: new.name.clone(),
            table: new.table.clone(),
            summary,
            field_changes,
            relationship_changes,
            breaking_changes,
            migration_impact,
        })
    }
}
