//! Folding classified changes into an overall compatibility verdict.

use serde::{Deserialize, Serialize};

use crate::classify::{ClassifiedChange, DataLossRisk};
use crate::differ::ChangeKind;

/// Overall compatibility verdict for a schema pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compatibility {
    /// No changes at all.
    FullyCompatible,
    /// Only non-breaking changes.
    PartiallyCompatible,
    /// At least one breaking change.
    Incompatible,
}

impl std::fmt::Display for Compatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FullyCompatible => write!(f, "fully compatible"),
            Self::PartiallyCompatible => write!(f, "partially compatible"),
            Self::Incompatible => write!(f, "incompatible"),
        }
    }
}

/// Overall impact of applying the new schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImpactLevel {
    /// At most two non-breaking changes.
    Low,
    /// Low-risk breaking changes, or more than two non-breaking ones.
    Medium,
    /// A breaking change with medium or high data-loss risk.
    High,
}

impl std::fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Added/removed/modified counts for one change category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    /// Entries present only in the new schema.
    pub added: usize,
    /// Entries present only in the old schema.
    pub removed: usize,
    /// Entries present in both with differing attributes.
    pub modified: usize,
}

impl ChangeCounts {
    /// Total number of changes in this category.
    pub fn total(&self) -> usize {
        self.added + self.removed + self.modified
    }
}

/// Summary statistics and verdicts for a whole diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Field change counts.
    pub fields: ChangeCounts,
    /// Relationship change counts.
    pub relationships: ChangeCounts,
    /// Overall compatibility verdict.
    pub compatibility: Compatibility,
    /// Overall impact level.
    pub impact_level: ImpactLevel,
}

/// Fold classified field and relationship changes into a summary.
///
/// Counts come straight from the classified lists; nothing is recomputed
/// from the raw differs.
pub fn aggregate(
    field_changes: &[ClassifiedChange],
    relationship_changes: &[ClassifiedChange],
) -> DiffSummary {
    let fields = count_category(field_changes);
    let relationships = count_category(relationship_changes);

    let total = field_changes.len() + relationship_changes.len();
    let breaking_risks: Vec<DataLossRisk> = field_changes
        .iter()
        .chain(relationship_changes)
        .filter(|c| c.is_breaking())
        .map(|c| c.data_loss_risk)
        .collect();
    let non_breaking = total - breaking_risks.len();

    let compatibility = if total == 0 {
        Compatibility::FullyCompatible
    } else if breaking_risks.is_empty() {
        Compatibility::PartiallyCompatible
    } else {
        Compatibility::Incompatible
    };

    let impact_level = if breaking_risks
        .iter()
        .any(|risk| *risk >= DataLossRisk::Medium)
    {
        ImpactLevel::High
    } else if !breaking_risks.is_empty() || non_breaking > 2 {
        ImpactLevel::Medium
    } else {
        ImpactLevel::Low
    };

    DiffSummary {
        fields,
        relationships,
        compatibility,
        impact_level,
    }
}

fn count_category(changes: &[ClassifiedChange]) -> ChangeCounts {
    let mut counts = ChangeCounts::default();
    for classified in changes {
        match &classified.change {
            ChangeKind::FieldAdded { .. } | ChangeKind::RelationshipAdded { .. } => {
                counts.added += 1;
            }
            ChangeKind::FieldRemoved { .. } | ChangeKind::RelationshipRemoved { .. } => {
                counts.removed += 1;
            }
            ChangeKind::FieldModified { .. } | ChangeKind::RelationshipModified { .. } => {
                counts.modified += 1;
            }
        }
    }
    counts
}
