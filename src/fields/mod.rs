//! Custom field navigator.
//!
//! [`FieldTree`] is the rendering-independent model of the field picker;
//! [`FieldExpander`] supplies lazily loaded subtrees.

mod expander;
mod tree;

pub use expander::{ExpandRequest, FieldExpander, FnExpander, NoFieldExpander};
pub use tree::{
    ChildState, FieldEntry, FieldTree, NodeId, ToggleOutcome, VisibleRow, LABEL_SEPARATOR,
    PATH_SEPARATOR,
};
