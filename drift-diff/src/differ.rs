//! Structural diffing of field and relationship collections.
//!
//! The differs match entries by name and record every attribute-level
//! difference. They know nothing about severity; classification happens
//! afterwards, one raw change at a time.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use drift_schema::{Field, FieldType, PivotDescriptor, Relationship, RelationshipKind, Value};

/// An attribute-level difference between two versions of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldAttributeChange {
    /// Type descriptor changed.
    Type { old: FieldType, new: FieldType },
    /// Nullability changed.
    Nullable { old: bool, new: bool },
    /// Unique constraint changed.
    Unique { old: bool, new: bool },
    /// Index flag changed.
    Index { old: bool, new: bool },
    /// Default value changed.
    Default {
        old: Option<Value>,
        new: Option<Value>,
    },
    /// Maximum length changed.
    Length { old: Option<u32>, new: Option<u32> },
    /// Numeric precision changed.
    Precision { old: Option<u32>, new: Option<u32> },
    /// Numeric scale changed.
    Scale { old: Option<u32>, new: Option<u32> },
    /// Validation rule list changed.
    Rules {
        old: Vec<SmolStr>,
        new: Vec<SmolStr>,
    },
    /// Documentation comment changed.
    Comment {
        old: Option<String>,
        new: Option<String>,
    },
    /// A type-specific extra attribute changed.
    Extra {
        key: SmolStr,
        old: Option<Value>,
        new: Option<Value>,
    },
}

impl FieldAttributeChange {
    /// The name of the attribute that changed.
    pub fn attribute(&self) -> &str {
        match self {
            Self::Type { .. } => "type",
            Self::Nullable { .. } => "nullable",
            Self::Unique { .. } => "unique",
            Self::Index { .. } => "index",
            Self::Default { .. } => "default",
            Self::Length { .. } => "length",
            Self::Precision { .. } => "precision",
            Self::Scale { .. } => "scale",
            Self::Rules { .. } => "rules",
            Self::Comment { .. } => "comment",
            Self::Extra { key, .. } => key,
        }
    }

    /// Check if this is a size-constraint change (length/precision/scale).
    pub fn is_size_change(&self) -> bool {
        matches!(
            self,
            Self::Length { .. } | Self::Precision { .. } | Self::Scale { .. }
        )
    }
}

impl std::fmt::Display for FieldAttributeChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn opt<T: std::fmt::Display>(value: &Option<T>) -> String {
            match value {
                Some(v) => v.to_string(),
                None => "(none)".to_string(),
            }
        }

        match self {
            Self::Type { old, new } => write!(f, "type: {} -> {}", old, new),
            Self::Nullable { old, new } => write!(f, "nullable: {} -> {}", old, new),
            Self::Unique { old, new } => write!(f, "unique: {} -> {}", old, new),
            Self::Index { old, new } => write!(f, "index: {} -> {}", old, new),
            Self::Default { old, new } => write!(f, "default: {} -> {}", opt(old), opt(new)),
            Self::Length { old, new } => write!(f, "length: {} -> {}", opt(old), opt(new)),
            Self::Precision { old, new } => write!(f, "precision: {} -> {}", opt(old), opt(new)),
            Self::Scale { old, new } => write!(f, "scale: {} -> {}", opt(old), opt(new)),
            Self::Rules { old, new } => write!(
                f,
                "rules: [{}] -> [{}]",
                old.join(", "),
                new.join(", ")
            ),
            Self::Comment { old, new } => write!(f, "comment: {} -> {}", opt(old), opt(new)),
            Self::Extra { key, old, new } => {
                write!(f, "{}: {} -> {}", key, opt(old), opt(new))
            }
        }
    }
}

/// An attribute-level difference between two versions of one relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RelationshipAttributeChange {
    /// Cardinality/ownership kind changed.
    Kind {
        old: RelationshipKind,
        new: RelationshipKind,
    },
    /// Target schema changed.
    Target {
        old: Option<SmolStr>,
        new: Option<SmolStr>,
    },
    /// Foreign key column changed.
    ForeignKey {
        old: Option<SmolStr>,
        new: Option<SmolStr>,
    },
    /// Local key column changed.
    LocalKey {
        old: Option<SmolStr>,
        new: Option<SmolStr>,
    },
    /// Pivot descriptor changed.
    Pivot {
        old: Option<PivotDescriptor>,
        new: Option<PivotDescriptor>,
    },
}

impl RelationshipAttributeChange {
    /// The name of the attribute that changed.
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Kind { .. } => "type",
            Self::Target { .. } => "target",
            Self::ForeignKey { .. } => "foreignKey",
            Self::LocalKey { .. } => "localKey",
            Self::Pivot { .. } => "pivot",
        }
    }
}

impl std::fmt::Display for RelationshipAttributeChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn opt(value: &Option<SmolStr>) -> &str {
            value.as_deref().unwrap_or("(none)")
        }

        match self {
            Self::Kind { old, new } => write!(f, "type: {} -> {}", old, new),
            Self::Target { old, new } => write!(f, "target: {} -> {}", opt(old), opt(new)),
            Self::ForeignKey { old, new } => {
                write!(f, "foreignKey: {} -> {}", opt(old), opt(new))
            }
            Self::LocalKey { old, new } => write!(f, "localKey: {} -> {}", opt(old), opt(new)),
            Self::Pivot { old, new } => {
                let opt_table = |p: &Option<PivotDescriptor>| match p {
                    Some(p) => p.table.to_string(),
                    None => "(none)".to_string(),
                };
                write!(f, "pivot: {} -> {}", opt_table(old), opt_table(new))
            }
        }
    }
}

/// One raw structural difference between two schemas.
///
/// Produced by the differs and consumed by the classifier; callers only
/// ever see these wrapped in a classified change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// A field present only in the new schema.
    FieldAdded { field: Field },
    /// A field present only in the old schema.
    FieldRemoved { field: Field },
    /// A field present in both with differing attributes.
    FieldModified {
        name: SmolStr,
        changes: Vec<FieldAttributeChange>,
    },
    /// A relationship present only in the new schema.
    RelationshipAdded { relationship: Relationship },
    /// A relationship present only in the old schema.
    RelationshipRemoved { relationship: Relationship },
    /// A relationship present in both with differing attributes.
    RelationshipModified {
        name: SmolStr,
        changes: Vec<RelationshipAttributeChange>,
    },
}

impl ChangeKind {
    /// Name of the affected field or relationship.
    pub fn name(&self) -> &str {
        match self {
            Self::FieldAdded { field } | Self::FieldRemoved { field } => field.name(),
            Self::FieldModified { name, .. } => name,
            Self::RelationshipAdded { relationship }
            | Self::RelationshipRemoved { relationship } => relationship.name(),
            Self::RelationshipModified { name, .. } => name,
        }
    }

    /// Check if this change concerns a field.
    pub fn is_field_change(&self) -> bool {
        matches!(
            self,
            Self::FieldAdded { .. } | Self::FieldRemoved { .. } | Self::FieldModified { .. }
        )
    }
}

/// Compare two field collections by name.
///
/// Output order: modified and added entries in the new schema's declaration
/// order, then removed entries in the old schema's declaration order.
pub(crate) fn diff_fields(
    old: &IndexMap<SmolStr, Field>,
    new: &IndexMap<SmolStr, Field>,
) -> Vec<ChangeKind> {
    let mut changes = Vec::new();

    for (name, new_field) in new {
        match old.get(name) {
            Some(old_field) => {
                let attribute_changes = compare_fields(old_field, new_field);
                if !attribute_changes.is_empty() {
                    changes.push(ChangeKind::FieldModified {
                        name: name.clone(),
                        changes: attribute_changes,
                    });
                }
            }
            None => changes.push(ChangeKind::FieldAdded {
                field: new_field.clone(),
            }),
        }
    }

    for (name, old_field) in old {
        if !new.contains_key(name) {
            changes.push(ChangeKind::FieldRemoved {
                field: old_field.clone(),
            });
        }
    }

    changes
}

/// Compare two versions of one field, attribute by attribute.
fn compare_fields(old: &Field, new: &Field) -> Vec<FieldAttributeChange> {
    let mut changes = Vec::new();

    if old.field_type != new.field_type {
        changes.push(FieldAttributeChange::Type {
            old: old.field_type.clone(),
            new: new.field_type.clone(),
        });
    }
    if old.nullable != new.nullable {
        changes.push(FieldAttributeChange::Nullable {
            old: old.nullable,
            new: new.nullable,
        });
    }
    if old.unique != new.unique {
        changes.push(FieldAttributeChange::Unique {
            old: old.unique,
            new: new.unique,
        });
    }
    if old.index != new.index {
        changes.push(FieldAttributeChange::Index {
            old: old.index,
            new: new.index,
        });
    }
    if old.default != new.default {
        changes.push(FieldAttributeChange::Default {
            old: old.default.clone(),
            new: new.default.clone(),
        });
    }
    if old.length != new.length {
        changes.push(FieldAttributeChange::Length {
            old: old.length,
            new: new.length,
        });
    }
    if old.precision != new.precision {
        changes.push(FieldAttributeChange::Precision {
            old: old.precision,
            new: new.precision,
        });
    }
    if old.scale != new.scale {
        changes.push(FieldAttributeChange::Scale {
            old: old.scale,
            new: new.scale,
        });
    }
    if old.rules != new.rules {
        changes.push(FieldAttributeChange::Rules {
            old: old.rules.clone(),
            new: new.rules.clone(),
        });
    }
    if old.comment != new.comment {
        changes.push(FieldAttributeChange::Comment {
            old: old.comment.clone(),
            new: new.comment.clone(),
        });
    }

    // Extra bag: old keys in declaration order, then keys only the new side has.
    for (key, old_value) in &old.extra {
        let new_value = new.extra.get(key);
        if new_value != Some(old_value) {
            changes.push(FieldAttributeChange::Extra {
                key: key.clone(),
                old: Some(old_value.clone()),
                new: new_value.cloned(),
            });
        }
    }
    for (key, new_value) in &new.extra {
        if !old.extra.contains_key(key) {
            changes.push(FieldAttributeChange::Extra {
                key: key.clone(),
                old: None,
                new: Some(new_value.clone()),
            });
        }
    }

    changes
}

/// Compare two relationship collections by name.
///
/// Same ordering contract as [`diff_fields`].
pub(crate) fn diff_relationships(
    old: &IndexMap<SmolStr, Relationship>,
    new: &IndexMap<SmolStr, Relationship>,
) -> Vec<ChangeKind> {
    let mut changes = Vec::new();

    for (name, new_rel) in new {
        match old.get(name) {
            Some(old_rel) => {
                let attribute_changes = compare_relationships(old_rel, new_rel);
                if !attribute_changes.is_empty() {
                    changes.push(ChangeKind::RelationshipModified {
                        name: name.clone(),
                        changes: attribute_changes,
                    });
                }
            }
            None => changes.push(ChangeKind::RelationshipAdded {
                relationship: new_rel.clone(),
            }),
        }
    }

    for (name, old_rel) in old {
        if !new.contains_key(name) {
            changes.push(ChangeKind::RelationshipRemoved {
                relationship: old_rel.clone(),
            });
        }
    }

    changes
}

/// Compare two versions of one relationship, attribute by attribute.
///
/// A kind change is always recorded even when the target is unchanged,
/// because cardinality changes alter generated access patterns downstream.
fn compare_relationships(old: &Relationship, new: &Relationship) -> Vec<RelationshipAttributeChange> {
    let mut changes = Vec::new();

    if old.kind != new.kind {
        changes.push(RelationshipAttributeChange::Kind {
            old: old.kind,
            new: new.kind,
        });
    }
    if old.target != new.target {
        changes.push(RelationshipAttributeChange::Target {
            old: old.target.clone(),
            new: new.target.clone(),
        });
    }
    if old.foreign_key != new.foreign_key {
        changes.push(RelationshipAttributeChange::ForeignKey {
            old: old.foreign_key.clone(),
            new: new.foreign_key.clone(),
        });
    }
    if old.local_key != new.local_key {
        changes.push(RelationshipAttributeChange::LocalKey {
            old: old.local_key.clone(),
            new: new.local_key.clone(),
        });
    }
    if old.pivot != new.pivot {
        changes.push(RelationshipAttributeChange::Pivot {
            old: old.pivot.clone(),
            new: new.pivot.clone(),
        });
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field_map(fields: Vec<Field>) -> IndexMap<SmolStr, Field> {
        fields.into_iter().map(|f| (f.name.clone(), f)).collect()
    }

    fn rel_map(rels: Vec<Relationship>) -> IndexMap<SmolStr, Relationship> {
        rels.into_iter().map(|r| (r.name.clone(), r)).collect()
    }

    #[test]
    fn test_diff_fields_identical_is_empty() {
        let fields = field_map(vec![
            Field::new("id", "integer"),
            Field::new("name", "string").with_length(255),
        ]);
        assert_eq!(diff_fields(&fields, &fields), vec![]);
    }

    #[test]
    fn test_diff_fields_added_and_removed() {
        let old = field_map(vec![Field::new("id", "integer"), Field::new("legacy", "text")]);
        let new = field_map(vec![Field::new("id", "integer"), Field::new("email", "string")]);

        let changes = diff_fields(&old, &new);
        assert_eq!(changes.len(), 2);
        assert!(matches!(
            &changes[0],
            ChangeKind::FieldAdded { field } if field.name() == "email"
        ));
        assert!(matches!(
            &changes[1],
            ChangeKind::FieldRemoved { field } if field.name() == "legacy"
        ));
    }

    #[test]
    fn test_diff_fields_modified_attributes() {
        let old = field_map(vec![
            Field::new("name", "string").with_length(255).with_nullable(true),
        ]);
        let new = field_map(vec![Field::new("name", "text").with_length(100)]);

        let changes = diff_fields(&old, &new);
        assert_eq!(changes.len(), 1);
        let ChangeKind::FieldModified { name, changes } = &changes[0] else {
            panic!("expected FieldModified");
        };
        assert_eq!(name, "name");
        let attrs: Vec<&str> = changes.iter().map(|c| c.attribute()).collect();
        assert_eq!(attrs, vec!["type", "nullable", "length"]);
    }

    #[test]
    fn test_diff_fields_noop_modification_not_recorded() {
        let old = field_map(vec![Field::new("id", "integer"), Field::new("x", "string")]);
        let new = field_map(vec![
            Field::new("id", "integer"),
            Field::new("x", "string"),
            Field::new("y", "string"),
        ]);

        let changes = diff_fields(&old, &new);
        // Only the addition; unchanged fields produce nothing.
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_diff_fields_ordering_follows_declaration() {
        // New declares b before a; removed entries follow in old order.
        let old = field_map(vec![
            Field::new("gone_first", "integer"),
            Field::new("a", "integer"),
            Field::new("b", "integer"),
            Field::new("gone_second", "integer"),
        ]);
        let new = field_map(vec![
            Field::new("b", "integer").with_nullable(true),
            Field::new("fresh", "string"),
            Field::new("a", "integer").with_nullable(true),
        ]);

        let names: Vec<String> = diff_fields(&old, &new)
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["b", "fresh", "a", "gone_first", "gone_second"]);
    }

    #[test]
    fn test_diff_fields_extra_bag() {
        let old = field_map(vec![
            Field::new("location", "point")
                .with_extra("srid", 4326i64)
                .with_extra("dims", 2i64),
        ]);
        let new = field_map(vec![
            Field::new("location", "point")
                .with_extra("srid", 3857i64)
                .with_extra("index_type", "gist"),
        ]);

        let changes = diff_fields(&old, &new);
        let ChangeKind::FieldModified { changes, .. } = &changes[0] else {
            panic!("expected FieldModified");
        };
        let attrs: Vec<&str> = changes.iter().map(|c| c.attribute()).collect();
        // srid changed, dims removed, index_type added.
        assert_eq!(attrs, vec!["srid", "dims", "index_type"]);
    }

    #[test]
    fn test_diff_fields_rules_change() {
        let old = field_map(vec![Field::new("email", "string").with_rule("email")]);
        let new = field_map(vec![
            Field::new("email", "string").with_rule("email").with_rule("max:255"),
        ]);

        let changes = diff_fields(&old, &new);
        let ChangeKind::FieldModified { changes, .. } = &changes[0] else {
            panic!("expected FieldModified");
        };
        assert!(matches!(changes[0], FieldAttributeChange::Rules { .. }));
    }

    #[test]
    fn test_diff_relationships_kind_change_recorded_without_target_change() {
        let old = rel_map(vec![Relationship::new(
            "author",
            RelationshipKind::BelongsTo,
            "User",
        )]);
        let new = rel_map(vec![Relationship::new(
            "author",
            RelationshipKind::HasOne,
            "User",
        )]);

        let changes = diff_relationships(&old, &new);
        assert_eq!(changes.len(), 1);
        let ChangeKind::RelationshipModified { changes, .. } = &changes[0] else {
            panic!("expected RelationshipModified");
        };
        assert_eq!(changes.len(), 1);
        assert!(matches!(
            changes[0],
            RelationshipAttributeChange::Kind {
                old: RelationshipKind::BelongsTo,
                new: RelationshipKind::HasOne,
            }
        ));
    }

    #[test]
    fn test_diff_relationships_added_removed() {
        let old = rel_map(vec![Relationship::new(
            "comments",
            RelationshipKind::HasMany,
            "Comment",
        )]);
        let new = rel_map(vec![Relationship::new(
            "likes",
            RelationshipKind::HasMany,
            "Like",
        )]);

        let changes = diff_relationships(&old, &new);
        assert!(matches!(&changes[0], ChangeKind::RelationshipAdded { relationship } if relationship.name() == "likes"));
        assert!(matches!(&changes[1], ChangeKind::RelationshipRemoved { relationship } if relationship.name() == "comments"));
    }

    #[test]
    fn test_diff_relationships_pivot_change() {
        let old = rel_map(vec![
            Relationship::new("tags", RelationshipKind::BelongsToMany, "Tag")
                .with_pivot(drift_schema::PivotDescriptor::new("post_tag")),
        ]);
        let new = rel_map(vec![
            Relationship::new("tags", RelationshipKind::BelongsToMany, "Tag")
                .with_pivot(drift_schema::PivotDescriptor::new("taggables")),
        ]);

        let changes = diff_relationships(&old, &new);
        let ChangeKind::RelationshipModified { changes, .. } = &changes[0] else {
            panic!("expected RelationshipModified");
        };
        assert!(matches!(changes[0], RelationshipAttributeChange::Pivot { .. }));
    }

    #[test]
    fn test_attribute_change_display() {
        let change = FieldAttributeChange::Nullable {
            old: true,
            new: false,
        };
        assert_eq!(change.to_string(), "nullable: true -> false");

        let change = FieldAttributeChange::Length {
            old: Some(255),
            new: None,
        };
        assert_eq!(change.to_string(), "length: 255 -> (none)");

        let change = RelationshipAttributeChange::Kind {
            old: RelationshipKind::BelongsTo,
            new: RelationshipKind::HasOne,
        };
        assert_eq!(change.to_string(), "type: belongs-to -> has-one");
    }
}
