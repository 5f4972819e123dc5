//! Data models of a formula input.

mod field;
mod token;

pub use field::{FieldChildren, FieldMap, FieldNode};
pub use token::{Token, TokenSequence};
