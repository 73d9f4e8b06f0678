//! Shared data model for Tangle story documents.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_story};
