//! Deriving migration operations and complexity from classified changes.
//!
//! Risk is copied from the classifier, never re-derived; the classifier is
//! the single source of truth for severity and data-loss judgments.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::classify::{ClassifiedChange, DataLossRisk};
use crate::differ::{ChangeKind, RelationshipAttributeChange};
use drift_schema::Relationship;

/// An abstract structural migration operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    /// Add a column for a new field.
    AddColumn,
    /// Drop the column of a removed field.
    DropColumn,
    /// Alter a column's type or size.
    AlterColumn,
    /// Add or re-point a foreign key constraint.
    AddForeignKey,
    /// Drop a foreign key constraint.
    DropForeignKey,
    /// Create a pivot table for a many-to-many relationship.
    CreatePivotTable,
    /// Drop a pivot table.
    DropPivotTable,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddColumn => write!(f, "add column"),
            Self::DropColumn => write!(f, "drop column"),
            Self::AlterColumn => write!(f, "alter column"),
            Self::AddForeignKey => write!(f, "add foreign key"),
            Self::DropForeignKey => write!(f, "drop foreign key"),
            Self::CreatePivotTable => write!(f, "create pivot table"),
            Self::DropPivotTable => write!(f, "drop pivot table"),
        }
    }
}

/// One structural operation implied by the diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationOperation {
    /// Kind of structural change.
    pub operation_type: OperationType,
    /// Affected field, relationship, or pivot table name.
    pub name: SmolStr,
    /// Risk copied from the originating classified change.
    pub risk_level: DataLossRisk,
}

/// Estimated effort of applying the migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Complexity {
    /// Couple of low-risk operations.
    Low,
    /// A handful of operations, or medium-risk ones.
    Medium,
    /// Many operations without a simpler characterization.
    High,
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Migration metadata derived from a diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationImpact {
    /// Whether any structural operation is required.
    pub requires_migration: bool,
    /// Operations, one per change requiring a structural step, in change
    /// order.
    pub operations: Vec<MigrationOperation>,
    /// Maximum data-loss risk across all contributing changes.
    pub data_loss_risk: DataLossRisk,
    /// Estimated effort.
    pub complexity: Complexity,
}

/// Derive migration impact from classified changes.
pub fn analyze_impact(changes: &[ClassifiedChange]) -> MigrationImpact {
    let operations: Vec<MigrationOperation> =
        changes.iter().filter_map(operation_for).collect();

    let requires_migration = !operations.is_empty();

    let data_loss_risk = operations
        .iter()
        .map(|op| op.risk_level)
        .max()
        .unwrap_or(DataLossRisk::None);

    let has_high = operations
        .iter()
        .any(|op| op.risk_level == DataLossRisk::High);
    let has_medium = operations
        .iter()
        .any(|op| op.risk_level == DataLossRisk::Medium);

    let complexity = if operations.len() <= 2 && !has_high {
        Complexity::Low
    } else if operations.len() <= 6 || has_medium {
        Complexity::Medium
    } else {
        Complexity::High
    };

    MigrationImpact {
        requires_migration,
        operations,
        data_loss_risk,
        complexity,
    }
}

/// Map one classified change to its structural operation, if any.
fn operation_for(classified: &ClassifiedChange) -> Option<MigrationOperation> {
    let risk = classified.data_loss_risk;

    match &classified.change {
        ChangeKind::FieldAdded { field } => Some(MigrationOperation {
            operation_type: OperationType::AddColumn,
            name: field.name.clone(),
            risk_level: risk,
        }),
        ChangeKind::FieldRemoved { field } => Some(MigrationOperation {
            operation_type: OperationType::DropColumn,
            name: field.name.clone(),
            risk_level: risk,
        }),
        ChangeKind::FieldModified { name, changes } => {
            // Only type and size changes alter the column shape; flag,
            // default, rule, and comment changes are metadata-only.
            let alters_column = changes.iter().any(|c| {
                matches!(c, crate::differ::FieldAttributeChange::Type { .. }) || c.is_size_change()
            });
            alters_column.then(|| MigrationOperation {
                operation_type: OperationType::AlterColumn,
                name: name.clone(),
                risk_level: risk,
            })
        }
        ChangeKind::RelationshipAdded { .. } => None,
        ChangeKind::RelationshipRemoved { relationship } => {
            removal_operation(relationship).map(|(operation_type, name)| MigrationOperation {
                operation_type,
                name,
                risk_level: risk,
            })
        }
        ChangeKind::RelationshipModified { name, changes } => {
            modification_operation(name, changes).map(|(operation_type, name)| {
                MigrationOperation {
                    operation_type,
                    name,
                    risk_level: risk,
                }
            })
        }
    }
}

/// Structural operation implied by removing a relationship.
///
/// Inverse-side removals (`has-one`, `has-many`, morphs from the target)
/// change no storage and need no operation.
fn removal_operation(relationship: &Relationship) -> Option<(OperationType, SmolStr)> {
    if relationship.kind.uses_pivot() {
        let name = relationship
            .pivot
            .as_ref()
            .map(|p| p.table.clone())
            .unwrap_or_else(|| relationship.name.clone());
        return Some((OperationType::DropPivotTable, name));
    }
    if relationship.kind.owns_foreign_key() {
        return Some((OperationType::DropForeignKey, relationship.name.clone()));
    }
    None
}

/// Structural operation implied by modifying a relationship.
fn modification_operation(
    name: &SmolStr,
    changes: &[RelationshipAttributeChange],
) -> Option<(OperationType, SmolStr)> {
    for change in changes {
        if let RelationshipAttributeChange::Kind { old, new } = change {
            if new.uses_pivot() && !old.uses_pivot() {
                return Some((OperationType::CreatePivotTable, name.clone()));
            }
            if old.uses_pivot() && !new.uses_pivot() {
                return Some((OperationType::DropPivotTable, name.clone()));
            }
            return Some((OperationType::AddForeignKey, name.clone()));
        }
    }
    for change in changes {
        if let RelationshipAttributeChange::Pivot { old, new } = change {
            return match (old, new) {
                (Some(_), None) => Some((OperationType::DropPivotTable, name.clone())),
                _ => Some((OperationType::CreatePivotTable, name.clone())),
            };
        }
    }
    if changes.is_empty() {
        return None;
    }
    // Remaining cases are target/foreignKey/localKey rebinds.
    Some((OperationType::AddForeignKey, name.clone()))
}
