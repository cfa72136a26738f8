//! Severity and data-loss-risk classification of raw changes.
//!
//! Classification is a pure function of one raw change and the oracle's
//! verdict. It never looks at other changes in the same diff, so results
//! are independent of ordering and safe to compute in any order.

use serde::{Deserialize, Serialize};

use crate::differ::{ChangeKind, FieldAttributeChange, RelationshipAttributeChange};
use crate::oracle::{TypeCompatibility, TypeOracle};

/// Whether a change can invalidate stored data or dependent code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Safe to apply in place.
    NonBreaking,
    /// Previously valid data or code may become invalid.
    Breaking,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonBreaking => write!(f, "non-breaking"),
            Self::Breaking => write!(f, "breaking"),
        }
    }
}

/// Graded estimate of whether applying a change can destroy existing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataLossRisk {
    /// No stored data is at risk.
    None,
    /// Data loss is unlikely but possible.
    Low,
    /// Data loss is plausible (truncation, invalidated rows).
    Medium,
    /// Data loss is certain or highly likely.
    High,
}

impl std::fmt::Display for DataLossRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A raw change annotated with severity, risk, and a description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedChange {
    /// The underlying structural change.
    pub change: ChangeKind,
    /// Breaking or non-breaking.
    pub severity: Severity,
    /// Estimated data-loss risk.
    pub data_loss_risk: DataLossRisk,
    /// Human-readable description; multiple qualifying reasons are
    /// concatenated, never dropped.
    pub description: String,
    /// Set when the oracle could not resolve a type and the verdict was
    /// forced to breaking/high.
    pub unresolved: bool,
}

impl ClassifiedChange {
    /// Check if this change is breaking.
    pub fn is_breaking(&self) -> bool {
        self.severity == Severity::Breaking
    }

    /// Name of the affected field or relationship.
    pub fn name(&self) -> &str {
        self.change.name()
    }
}

/// One applicable classification rule's verdict.
struct Verdict {
    severity: Severity,
    risk: DataLossRisk,
    description: String,
    unresolved: bool,
}

impl Verdict {
    fn new(severity: Severity, risk: DataLossRisk, description: String) -> Self {
        Self {
            severity,
            risk,
            description,
            unresolved: false,
        }
    }

    fn breaking(risk: DataLossRisk, description: String) -> Self {
        Self::new(Severity::Breaking, risk, description)
    }

    fn non_breaking(description: String) -> Self {
        Self::new(Severity::NonBreaking, DataLossRisk::None, description)
    }
}

/// Assigns severity, risk, and a description to every raw change.
pub struct ChangeClassifier<'a> {
    oracle: &'a dyn TypeOracle,
}

impl<'a> ChangeClassifier<'a> {
    /// Create a classifier over a type compatibility oracle.
    pub fn new(oracle: &'a dyn TypeOracle) -> Self {
        Self { oracle }
    }

    /// Classify one raw change.
    pub fn classify(&self, change: ChangeKind) -> ClassifiedChange {
        match &change {
            ChangeKind::FieldRemoved { field } => ClassifiedChange {
                severity: Severity::Breaking,
                data_loss_risk: DataLossRisk::High,
                description: format!(
                    "field `{}` removed; stored column data will be lost",
                    field.name()
                ),
                unresolved: false,
                change,
            },
            ChangeKind::FieldAdded { field } => {
                if !field.nullable && field.default.is_none() {
                    ClassifiedChange {
                        severity: Severity::Breaking,
                        data_loss_risk: DataLossRisk::None,
                        description: format!(
                            "required field `{}` added without a default; existing rows cannot be backfilled",
                            field.name()
                        ),
                        unresolved: false,
                        change,
                    }
                } else {
                    ClassifiedChange {
                        severity: Severity::NonBreaking,
                        data_loss_risk: DataLossRisk::None,
                        description: format!("field `{}` added", field.name()),
                        unresolved: false,
                        change,
                    }
                }
            }
            ChangeKind::RelationshipAdded { relationship } => ClassifiedChange {
                severity: Severity::NonBreaking,
                data_loss_risk: DataLossRisk::None,
                description: format!("relationship `{}` added", relationship.name()),
                unresolved: false,
                change,
            },
            ChangeKind::RelationshipRemoved { relationship } => {
                let (risk, description) = if relationship.kind.owns_foreign_key() {
                    (
                        DataLossRisk::High,
                        format!(
                            "relationship `{}` removed; this side owns the foreign key and its column data will be lost",
                            relationship.name()
                        ),
                    )
                } else {
                    (
                        DataLossRisk::Medium,
                        format!("relationship `{}` removed", relationship.name()),
                    )
                };
                ClassifiedChange {
                    severity: Severity::Breaking,
                    data_loss_risk: risk,
                    description,
                    unresolved: false,
                    change,
                }
            }
            ChangeKind::FieldModified { name, changes } => {
                let verdicts: Vec<Verdict> = changes
                    .iter()
                    .map(|c| self.classify_field_attribute(c))
                    .collect();
                self.fold(change.clone(), &format!("field `{}`", name), verdicts)
            }
            ChangeKind::RelationshipModified { name, changes } => {
                let verdicts: Vec<Verdict> = changes
                    .iter()
                    .map(classify_relationship_attribute)
                    .collect();
                self.fold(change.clone(), &format!("relationship `{}`", name), verdicts)
            }
        }
    }

    /// Classify one attribute-level field change.
    fn classify_field_attribute(&self, change: &FieldAttributeChange) -> Verdict {
        match change {
            FieldAttributeChange::Type { old, new } => match self.oracle.compare(old, new) {
                Ok(TypeCompatibility::Identical) => Verdict::non_breaking(format!(
                    "type renamed from `{}` to `{}` with identical storage",
                    old, new
                )),
                Ok(TypeCompatibility::Widening) => Verdict::new(
                    Severity::NonBreaking,
                    DataLossRisk::Low,
                    format!("type widened from `{}` to `{}`", old, new),
                ),
                Ok(TypeCompatibility::Narrowing) => Verdict::breaking(
                    DataLossRisk::Medium,
                    format!(
                        "type narrowed from `{}` to `{}`; existing values may not fit",
                        old, new
                    ),
                ),
                Ok(TypeCompatibility::Incompatible) => Verdict::breaking(
                    DataLossRisk::High,
                    format!(
                        "type changed from `{}` to `{}` with no safe conversion",
                        old, new
                    ),
                ),
                Err(err) => Verdict {
                    severity: Severity::Breaking,
                    risk: DataLossRisk::High,
                    description: format!(
                        "cannot resolve type `{}`; change treated as breaking",
                        err.type_name
                    ),
                    unresolved: true,
                },
            },
            FieldAttributeChange::Nullable { old: true, new: false } => Verdict::breaking(
                DataLossRisk::Medium,
                "nullable tightened; existing null values become invalid".to_string(),
            ),
            FieldAttributeChange::Nullable { .. } => {
                Verdict::non_breaking("nullable loosened".to_string())
            }
            FieldAttributeChange::Length { old, new } => size_verdict("length", *old, *new),
            FieldAttributeChange::Precision { old, new } => size_verdict("precision", *old, *new),
            FieldAttributeChange::Scale { old, new } => size_verdict("scale", *old, *new),
            FieldAttributeChange::Unique { old: false, new: true } => Verdict::breaking(
                DataLossRisk::Low,
                "unique constraint added; existing duplicate values would violate it (not verified against live data)"
                    .to_string(),
            ),
            FieldAttributeChange::Unique { .. } => {
                Verdict::non_breaking("unique constraint removed".to_string())
            }
            other => Verdict::non_breaking(other.to_string()),
        }
    }

    /// Combine all applicable verdicts: max severity, max risk, every
    /// description kept.
    fn fold(&self, change: ChangeKind, subject: &str, verdicts: Vec<Verdict>) -> ClassifiedChange {
        let mut severity = Severity::NonBreaking;
        let mut risk = DataLossRisk::None;
        let mut unresolved = false;
        let mut descriptions = Vec::with_capacity(verdicts.len());

        for verdict in verdicts {
            severity = severity.max(verdict.severity);
            risk = risk.max(verdict.risk);
            unresolved |= verdict.unresolved;
            descriptions.push(verdict.description);
        }

        let description = if descriptions.is_empty() {
            format!("{}: no attribute changes", subject)
        } else {
            format!("{}: {}", subject, descriptions.join("; "))
        };

        ClassifiedChange {
            change,
            severity,
            data_loss_risk: risk,
            description,
            unresolved,
        }
    }
}

/// Classify one attribute-level relationship change.
fn classify_relationship_attribute(change: &RelationshipAttributeChange) -> Verdict {
    match change {
        RelationshipAttributeChange::Kind { old, new } => Verdict::breaking(
            DataLossRisk::Medium,
            format!(
                "type changed from `{}` to `{}`; generated access patterns change",
                old, new
            ),
        ),
        other => Verdict::breaking(
            DataLossRisk::Low,
            format!("{}; referential meaning changes", other),
        ),
    }
}

/// Size-constraint verdict: tightening risks truncation, loosening is safe.
///
/// A newly added constraint tightens; a dropped constraint loosens.
fn size_verdict(attribute: &str, old: Option<u32>, new: Option<u32>) -> Verdict {
    let tightened = match (old, new) {
        (Some(o), Some(n)) => n < o,
        (None, Some(_)) => true,
        (Some(_), None) | (None, None) => false,
    };

    let fmt = |v: Option<u32>| v.map_or("(none)".to_string(), |n| n.to_string());

    if tightened {
        Verdict::breaking(
            DataLossRisk::Medium,
            format!(
                "{} reduced from {} to {}; values may be truncated",
                attribute,
                fmt(old),
                fmt(new)
            ),
        )
    } else {
        Verdict::non_breaking(format!(
            "{} increased from {} to {}",
            attribute,
            fmt(old),
            fmt(new)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::TableOracle;
    use drift_schema::{Field, FieldType, Relationship, RelationshipKind};
    use smol_str::SmolStr;

    fn classifier_fixture() -> TableOracle {
        TableOracle::with_defaults()
    }

    fn modified(name: &str, changes: Vec<FieldAttributeChange>) -> ChangeKind {
        ChangeKind::FieldModified {
            name: SmolStr::new(name),
            changes,
        }
    }

    #[test]
    fn test_field_removed_is_breaking_high() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(ChangeKind::FieldRemoved {
            field: Field::new("email", "string"),
        });

        assert_eq!(classified.severity, Severity::Breaking);
        assert_eq!(classified.data_loss_risk, DataLossRisk::High);
        assert!(classified.description.contains("email"));
    }

    #[test]
    fn test_field_added_nullable_is_non_breaking() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(ChangeKind::FieldAdded {
            field: Field::new("age", "integer").with_nullable(true),
        });

        assert_eq!(classified.severity, Severity::NonBreaking);
        assert_eq!(classified.data_loss_risk, DataLossRisk::None);
    }

    #[test]
    fn test_field_added_required_without_default_is_breaking() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(ChangeKind::FieldAdded {
            field: Field::new("tenant_id", "integer"),
        });

        assert_eq!(classified.severity, Severity::Breaking);
        assert_eq!(classified.data_loss_risk, DataLossRisk::None);
        assert!(classified.description.contains("backfilled"));
    }

    #[test]
    fn test_field_added_required_with_default_is_non_breaking() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(ChangeKind::FieldAdded {
            field: Field::new("count", "integer").with_default(0i64),
        });

        assert_eq!(classified.severity, Severity::NonBreaking);
    }

    #[test]
    fn test_type_widening_is_non_breaking_low() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(modified(
            "count",
            vec![FieldAttributeChange::Type {
                old: FieldType::new("integer"),
                new: FieldType::new("biginteger"),
            }],
        ));

        assert_eq!(classified.severity, Severity::NonBreaking);
        assert_eq!(classified.data_loss_risk, DataLossRisk::Low);
    }

    #[test]
    fn test_type_narrowing_is_breaking_medium() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(modified(
            "count",
            vec![FieldAttributeChange::Type {
                old: FieldType::new("biginteger"),
                new: FieldType::new("integer"),
            }],
        ));

        assert_eq!(classified.severity, Severity::Breaking);
        assert_eq!(classified.data_loss_risk, DataLossRisk::Medium);
    }

    #[test]
    fn test_type_incompatible_is_breaking_high() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(modified(
            "flag",
            vec![FieldAttributeChange::Type {
                old: FieldType::new("boolean"),
                new: FieldType::new("uuid"),
            }],
        ));

        assert_eq!(classified.severity, Severity::Breaking);
        assert_eq!(classified.data_loss_risk, DataLossRisk::High);
    }

    #[test]
    fn test_unresolved_type_fails_safe() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(modified(
            "location",
            vec![FieldAttributeChange::Type {
                old: FieldType::new("geometry"),
                new: FieldType::new("integer"),
            }],
        ));

        assert!(classified.unresolved);
        assert_eq!(classified.severity, Severity::Breaking);
        assert_eq!(classified.data_loss_risk, DataLossRisk::High);
        assert!(classified.description.contains("geometry"));
    }

    #[test]
    fn test_nullable_tightening_and_loosening() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);

        let tightened = classifier.classify(modified(
            "bio",
            vec![FieldAttributeChange::Nullable {
                old: true,
                new: false,
            }],
        ));
        assert_eq!(tightened.severity, Severity::Breaking);
        assert_eq!(tightened.data_loss_risk, DataLossRisk::Medium);

        let loosened = classifier.classify(modified(
            "bio",
            vec![FieldAttributeChange::Nullable {
                old: false,
                new: true,
            }],
        ));
        assert_eq!(loosened.severity, Severity::NonBreaking);
        assert_eq!(loosened.data_loss_risk, DataLossRisk::None);
    }

    #[test]
    fn test_length_decrease_and_increase() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);

        let decreased = classifier.classify(modified(
            "name",
            vec![FieldAttributeChange::Length {
                old: Some(255),
                new: Some(100),
            }],
        ));
        assert_eq!(decreased.severity, Severity::Breaking);
        assert_eq!(decreased.data_loss_risk, DataLossRisk::Medium);

        let increased = classifier.classify(modified(
            "name",
            vec![FieldAttributeChange::Length {
                old: Some(100),
                new: Some(255),
            }],
        ));
        assert_eq!(increased.severity, Severity::NonBreaking);
    }

    #[test]
    fn test_new_size_constraint_counts_as_tightening() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(modified(
            "name",
            vec![FieldAttributeChange::Length {
                old: None,
                new: Some(64),
            }],
        ));
        assert_eq!(classified.severity, Severity::Breaking);
    }

    #[test]
    fn test_unique_addition_is_static_warning() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(modified(
            "email",
            vec![FieldAttributeChange::Unique {
                old: false,
                new: true,
            }],
        ));

        assert_eq!(classified.severity, Severity::Breaking);
        assert_eq!(classified.data_loss_risk, DataLossRisk::Low);
        assert!(classified.description.contains("duplicate"));
    }

    #[test]
    fn test_cosmetic_changes_are_non_breaking() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(modified(
            "email",
            vec![
                FieldAttributeChange::Index {
                    old: false,
                    new: true,
                },
                FieldAttributeChange::Comment {
                    old: None,
                    new: Some("Contact".to_string()),
                },
                FieldAttributeChange::Unique {
                    old: true,
                    new: false,
                },
            ],
        ));

        assert_eq!(classified.severity, Severity::NonBreaking);
        assert_eq!(classified.data_loss_risk, DataLossRisk::None);
    }

    #[test]
    fn test_multiple_rules_take_max_and_concatenate() {
        // Narrowed type (Breaking/Medium) and tightened nullable
        // (Breaking/Medium) and removed column comment (NonBreaking/None):
        // verdicts combine to Breaking/Medium with all reasons listed.
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(modified(
            "age",
            vec![
                FieldAttributeChange::Type {
                    old: FieldType::new("biginteger"),
                    new: FieldType::new("integer"),
                },
                FieldAttributeChange::Nullable {
                    old: true,
                    new: false,
                },
                FieldAttributeChange::Comment {
                    old: Some("years".to_string()),
                    new: None,
                },
            ],
        ));

        assert_eq!(classified.severity, Severity::Breaking);
        assert_eq!(classified.data_loss_risk, DataLossRisk::Medium);
        assert!(classified.description.contains("narrowed"));
        assert!(classified.description.contains("nullable tightened"));
        assert!(classified.description.contains("comment"));
    }

    #[test]
    fn test_relationship_kind_change_is_breaking_medium() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(ChangeKind::RelationshipModified {
            name: SmolStr::new("author"),
            changes: vec![RelationshipAttributeChange::Kind {
                old: RelationshipKind::BelongsTo,
                new: RelationshipKind::HasOne,
            }],
        });

        assert_eq!(classified.severity, Severity::Breaking);
        assert_eq!(classified.data_loss_risk, DataLossRisk::Medium);
    }

    #[test]
    fn test_relationship_key_rebind_is_breaking_low() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(ChangeKind::RelationshipModified {
            name: SmolStr::new("author"),
            changes: vec![RelationshipAttributeChange::ForeignKey {
                old: Some(SmolStr::new("author_id")),
                new: Some(SmolStr::new("user_id")),
            }],
        });

        assert_eq!(classified.severity, Severity::Breaking);
        assert_eq!(classified.data_loss_risk, DataLossRisk::Low);
    }

    #[test]
    fn test_relationship_removed_risk_depends_on_fk_ownership() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);

        let owning = classifier.classify(ChangeKind::RelationshipRemoved {
            relationship: Relationship::new("author", RelationshipKind::BelongsTo, "User"),
        });
        assert_eq!(owning.data_loss_risk, DataLossRisk::High);

        let inverse = classifier.classify(ChangeKind::RelationshipRemoved {
            relationship: Relationship::new("posts", RelationshipKind::HasMany, "Post"),
        });
        assert_eq!(inverse.data_loss_risk, DataLossRisk::Medium);
        assert_eq!(inverse.severity, Severity::Breaking);
    }

    #[test]
    fn test_relationship_added_is_non_breaking() {
        let oracle = classifier_fixture();
        let classifier = ChangeClassifier::new(&oracle);
        let classified = classifier.classify(ChangeKind::RelationshipAdded {
            relationship: Relationship::new("likes", RelationshipKind::HasMany, "Like"),
        });

        assert_eq!(classified.severity, Severity::NonBreaking);
        assert_eq!(classified.data_loss_risk, DataLossRisk::None);
    }

    #[test]
    fn test_severity_and_risk_ordering() {
        assert!(Severity::Breaking > Severity::NonBreaking);
        assert!(DataLossRisk::High > DataLossRisk::Medium);
        assert!(DataLossRisk::Medium > DataLossRisk::Low);
        assert!(DataLossRisk::Low > DataLossRisk::None);
    }
}
