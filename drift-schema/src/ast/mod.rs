//! Entity types for Drift schemas.
//!
//! This module contains the value types that represent one version of a
//! data-model definition: fields, relationships, and the schema itself.

mod field;
mod relationship;
mod schema;
mod types;
mod value;

pub use field::*;
pub use relationship::*;
pub use schema::*;
pub use types::*;
pub use value::*;
