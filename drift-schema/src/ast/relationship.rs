//! Relationship definitions for the Drift entity model.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// The cardinality/ownership kind of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipKind {
    /// To-one, owning side (this schema holds the foreign key).
    BelongsTo,
    /// To-one, inverse side (the target holds the foreign key).
    HasOne,
    /// To-many, inverse side.
    HasMany,
    /// Many-to-many through a pivot table.
    BelongsToMany,
    /// Polymorphic to-one with an open target set (no fixed target).
    MorphTo,
    /// Polymorphic to-many from a named target.
    MorphMany,
}

impl RelationshipKind {
    /// Check if this is a "to-one" relationship.
    pub fn is_to_one(&self) -> bool {
        matches!(self, Self::BelongsTo | Self::HasOne | Self::MorphTo)
    }

    /// Check if this is a "to-many" relationship.
    pub fn is_to_many(&self) -> bool {
        matches!(self, Self::HasMany | Self::BelongsToMany | Self::MorphMany)
    }

    /// Check if this kind is polymorphic.
    pub fn is_polymorphic(&self) -> bool {
        matches!(self, Self::MorphTo | Self::MorphMany)
    }

    /// Check if this kind is backed by a pivot table.
    pub fn uses_pivot(&self) -> bool {
        matches!(self, Self::BelongsToMany)
    }

    /// Check if this schema's table holds the foreign key column.
    pub fn owns_foreign_key(&self) -> bool {
        matches!(self, Self::BelongsTo | Self::MorphTo)
    }

    /// Check if a target schema identifier is required for this kind.
    ///
    /// Only the open polymorphic side can leave the target unspecified.
    pub fn requires_target(&self) -> bool {
        !matches!(self, Self::MorphTo)
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BelongsTo => write!(f, "belongs-to"),
            Self::HasOne => write!(f, "has-one"),
            Self::HasMany => write!(f, "has-many"),
            Self::BelongsToMany => write!(f, "belongs-to-many"),
            Self::MorphTo => write!(f, "morph-to"),
            Self::MorphMany => write!(f, "morph-many"),
        }
    }
}

/// Pivot table descriptor for many-to-many relationships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotDescriptor {
    /// Pivot table name.
    pub table: SmolStr,
    /// Foreign key column pointing at this schema.
    pub foreign_pivot_key: Option<SmolStr>,
    /// Foreign key column pointing at the related schema.
    pub related_pivot_key: Option<SmolStr>,
}

impl PivotDescriptor {
    /// Create a new pivot descriptor.
    pub fn new(table: impl Into<SmolStr>) -> Self {
        Self {
            table: table.into(),
            foreign_pivot_key: None,
            related_pivot_key: None,
        }
    }

    /// Set the pivot key columns.
    pub fn with_keys(
        mut self,
        foreign_pivot_key: impl Into<SmolStr>,
        related_pivot_key: impl Into<SmolStr>,
    ) -> Self {
        self.foreign_pivot_key = Some(foreign_pivot_key.into());
        self.related_pivot_key = Some(related_pivot_key.into());
        self
    }
}

/// A typed reference from one schema to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relationship name, unique within a schema.
    pub name: SmolStr,
    /// Cardinality/ownership kind.
    pub kind: RelationshipKind,
    /// Identifier of the related schema. Absent only for `MorphTo`.
    pub target: Option<SmolStr>,
    /// Foreign key column, if explicit.
    pub foreign_key: Option<SmolStr>,
    /// Local key column, if explicit.
    pub local_key: Option<SmolStr>,
    /// Pivot descriptor, present only for `BelongsToMany`.
    pub pivot: Option<PivotDescriptor>,
}

impl Relationship {
    /// Create a new relationship to a named target schema.
    pub fn new(
        name: impl Into<SmolStr>,
        kind: RelationshipKind,
        target: impl Into<SmolStr>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            target: Some(target.into()),
            foreign_key: None,
            local_key: None,
            pivot: None,
        }
    }

    /// Create an open polymorphic relationship with no fixed target.
    pub fn morph_to(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            kind: RelationshipKind::MorphTo,
            target: None,
            foreign_key: None,
            local_key: None,
            pivot: None,
        }
    }

    /// Get the relationship name as a string slice.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the foreign key column.
    pub fn with_foreign_key(mut self, key: impl Into<SmolStr>) -> Self {
        self.foreign_key = Some(key.into());
        self
    }

    /// Set the local key column.
    pub fn with_local_key(mut self, key: impl Into<SmolStr>) -> Self {
        self.local_key = Some(key.into());
        self
    }

    /// Set the pivot descriptor.
    pub fn with_pivot(mut self, pivot: PivotDescriptor) -> Self {
        self.pivot = Some(pivot);
        self
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{}: {}({})", self.name, self.kind, target),
            None => write!(f, "{}: {}", self.name, self.kind),
        }
    }
}
