//! Expansion callbacks for lazily loaded field subtrees.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::tree::NodeId;
use crate::error::FormulaResult;
use crate::models::FieldMap;

/// Everything an expansion callback learns about the node being expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandRequest {
    pub node: NodeId,
    /// Key of the node within its parent mapping.
    pub key: String,
    /// Fully qualified dotted path.
    pub path: String,
    /// Display label (`Parent > Child`).
    pub label: String,
    /// Custom data declared on the node.
    pub custom_data: Option<Value>,
}

/// Supplies the children of a node declared with `children: true`.
///
/// Called at most once per node unless a previous call failed.
///
/// # Example
///
/// ```ignore
/// struct Tables;
///
/// #[async_trait]
/// impl FieldExpander for Tables {
///     async fn expand(&self, request: &ExpandRequest) -> FormulaResult<FieldMap> {
///         fetch_columns(request.custom_data.as_ref()).await
///     }
/// }
/// ```
#[async_trait]
pub trait FieldExpander: Send + Sync {
    async fn expand(&self, request: &ExpandRequest) -> FormulaResult<FieldMap>;
}

/// Default expander: every lazy node turns out to be empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFieldExpander;

#[async_trait]
impl FieldExpander for NoFieldExpander {
    async fn expand(&self, _request: &ExpandRequest) -> FormulaResult<FieldMap> {
        Ok(FieldMap::new())
    }
}

/// Adapter for synchronous callbacks.
///
/// ```
/// use formula::fields::{FnExpander, ExpandRequest};
/// use formula::models::{FieldMap, FieldNode};
///
/// let expander = FnExpander::new(|request: &ExpandRequest| {
///     let mut children = FieldMap::new();
///     children.insert("id".to_string(), FieldNode::leaf(format!("{} id", request.label)));
///     children
/// });
/// # let _ = expander;
/// ```
pub struct FnExpander<F> {
    callback: F,
}

impl<F> FnExpander<F>
where
    F: Fn(&ExpandRequest) -> FieldMap + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> fmt::Debug for FnExpander<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnExpander").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> FieldExpander for FnExpander<F>
where
    F: Fn(&ExpandRequest) -> FieldMap + Send + Sync,
{
    async fn expand(&self, request: &ExpandRequest) -> FormulaResult<FieldMap> {
        Ok((self.callback)(request))
    }
}
