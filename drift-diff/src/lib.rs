//! # drift-diff
//!
//! Schema comparison engine for Drift.
//!
//! This crate compares two versions of a schema definition and produces:
//! - Structural field and relationship diffs with attribute-level detail
//! - A severity (breaking/non-breaking) and data-loss-risk classification
//!   for every change
//! - An overall compatibility verdict and impact level
//! - The abstract migration operations implied by the diff, with an
//!   estimated complexity
//! - A structured text report
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌─────────────────┐   ┌─────────────────┐
//! │ Schema old │──▶│ Field Differ    │──▶│ Change          │
//! │ Schema new │──▶│ Relation Differ │   │ Classifier      │◀── Type Oracle
//! └────────────┘   └─────────────────┘   └─────────────────┘
//!                                                │
//!                             ┌──────────────────┼────────────────┐
//!                             ▼                  ▼                ▼
//!                     ┌──────────────┐  ┌────────────────┐  ┌──────────┐
//!                     │ Aggregator   │  │ Impact Analyzer│  │ Report   │
//!                     │ (verdict)    │  │ (operations)   │  │ Formatter│
//!                     └──────────────┘  └────────────────┘  └──────────┘
//! ```
//!
//! Everything is synchronous and stateless per call: the comparator holds
//! no mutable state, so independent comparisons can run concurrently
//! without coordination.
//!
//! ## Example
//!
//! ```rust
//! use drift_diff::{ReportFormatter, SchemaComparator, TableOracle};
//! use drift_schema::{Field, Schema};
//!
//! let old = Schema::new("User", "users")
//!     .with_field(Field::new("id", "integer"))
//!     .with_field(Field::new("name", "string").with_length(255));
//! let new = old
//!     .clone()
//!     .with_field(Field::new("age", "integer").with_nullable(true));
//!
//! let oracle = TableOracle::with_defaults();
//! let diff = SchemaComparator::new(&oracle).compare(&old, &new)?;
//!
//! assert!(!diff.has_breaking_changes());
//! assert!(diff.migration_impact.requires_migration);
//! println!("{}", ReportFormatter::new().render(&diff));
//! # Ok::<(), drift_diff::DiffError>(())
//! ```

pub mod aggregate;
pub mod classify;
pub mod differ;
pub mod engine;
pub mod error;
pub mod impact;
pub mod oracle;
pub mod report;

// Re-exports
pub use aggregate::{ChangeCounts, Compatibility, DiffSummary, ImpactLevel, aggregate};
pub use classify::{ChangeClassifier, ClassifiedChange, DataLossRisk, Severity};
pub use differ::{ChangeKind, FieldAttributeChange, RelationshipAttributeChange};
pub use engine::{SchemaComparator, SchemaDiff};
pub use error::{DiffError, DiffResult};
pub use impact::{
    Complexity, MigrationImpact, MigrationOperation, OperationType, analyze_impact,
};
pub use oracle::{TableOracle, TypeCompatibility, TypeOracle, UnresolvedType};
pub use report::ReportFormatter;
