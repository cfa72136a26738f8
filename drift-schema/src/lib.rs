//! # drift-schema
//!
//! Schema entity model and structural validation for the Drift schema
//! analyzer.
//!
//! This crate provides:
//! - Value types representing one version of a data-model definition
//!   (schemas, typed fields, typed relationships)
//! - Structural validation of the invariants the diff engine assumes
//! - Typed structural errors with diagnostic codes
//!
//! Parsing a textual schema representation into these entities is the job
//! of an upstream loader; this crate only models already-resolved schemas.
//!
//! ## Example
//!
//! ```rust
//! use drift_schema::{Field, Relationship, RelationshipKind, Schema, validate_schema};
//!
//! let schema = Schema::new("User", "users")
//!     .with_field(Field::new("id", "integer"))
//!     .with_field(Field::new("email", "string").with_length(255).with_unique(true))
//!     .with_relationship(Relationship::new("posts", RelationshipKind::HasMany, "Post"));
//!
//! validate_schema(&schema).expect("schema is well-formed");
//! ```

pub mod ast;
pub mod error;
pub mod validator;

pub use ast::*;
pub use error::{SchemaError, SchemaResult};
pub use validator::{Validator, validate_schema};
