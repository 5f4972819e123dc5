//! Field tree model with cached lazy subtrees.
//!
//! The tree is an arena of [`FieldEntry`]s. Lazily declared nodes move
//! from `Unresolved` to `Loading` on their first expansion and to
//! `Resolved` once children arrive. Resolved children are kept, so
//! collapsing and re-expanding never asks the expansion callback again.

use serde_json::Value;
use tracing::debug;

use super::expander::ExpandRequest;
use crate::error::{FormulaError, FormulaResult};
use crate::models::{FieldChildren, FieldMap, Token};

/// Index of an entry in a [`FieldTree`].
pub type NodeId = usize;

/// Separator between path segments.
pub const PATH_SEPARATOR: &str = ".";

/// Separator between label segments.
pub const LABEL_SEPARATOR: &str = " > ";

/// Child state of a field entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildState {
    /// No children.
    Leaf,
    /// Children will be requested on first expansion.
    Unresolved,
    /// A request is in flight.
    Loading,
    /// Children are known.
    Resolved(Vec<NodeId>),
}

/// One node of the tree with its accumulated path and label.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    pub key: String,
    pub name: String,
    pub path: String,
    pub label: String,
    pub custom_data: Option<Value>,
    pub parent: Option<NodeId>,
    pub depth: usize,
    pub open: bool,
    pub children: ChildState,
}

impl FieldEntry {
    /// Whether the entry shows an expand affordance.
    pub fn is_expandable(&self) -> bool {
        self.children != ChildState::Leaf
    }

    pub fn is_loading(&self) -> bool {
        self.children == ChildState::Loading
    }
}

/// A row of the flattened, currently visible tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: NodeId,
    pub depth: usize,
}

/// What toggling a node did.
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Opened,
    Closed,
    /// First expansion of a lazy node: the caller must run the
    /// expansion callback and hand the result to [`FieldTree::resolve`].
    Expand(ExpandRequest),
    /// Leaves cannot be toggled.
    Leaf,
}

/// Collapsible tree of custom fields.
#[derive(Debug, Clone, Default)]
pub struct FieldTree {
    entries: Vec<FieldEntry>,
    roots: Vec<NodeId>,
    /// Highlighted row, as an index into `visible_rows()`.
    cursor: usize,
}

impl FieldTree {
    /// Build the static part of the tree.
    pub fn new(fields: &FieldMap) -> Self {
        let mut tree = Self::default();
        tree.roots = tree.add_children(None, fields);
        tree
    }

    fn add_children(&mut self, parent: Option<NodeId>, fields: &FieldMap) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(fields.len());

        for (key, node) in fields {
            let (path, label, depth) = match parent.map(|id| &self.entries[id]) {
                Some(parent) => (
                    format!("{}{}{}", parent.path, PATH_SEPARATOR, key),
                    format!("{}{}{}", parent.label, LABEL_SEPARATOR, node.name),
                    parent.depth + 1,
                ),
                None => (key.clone(), node.name.clone(), 0),
            };

            let id = self.entries.len();
            self.entries.push(FieldEntry {
                key: key.clone(),
                name: node.name.clone(),
                path,
                label,
                custom_data: node.custom_data.clone(),
                parent,
                depth,
                open: false,
                children: ChildState::Leaf,
            });

            let state = match &node.children {
                Some(FieldChildren::Nested(children)) => {
                    ChildState::Resolved(self.add_children(Some(id), children))
                }
                Some(FieldChildren::Lazy(true)) => ChildState::Unresolved,
                Some(FieldChildren::Lazy(false)) | None => ChildState::Leaf,
            };
            self.entries[id].children = state;
            ids.push(id);
        }

        ids
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get(&self, id: NodeId) -> Option<&FieldEntry> {
        self.entries.get(id)
    }

    fn entry(&self, id: NodeId) -> FormulaResult<&FieldEntry> {
        self.entries.get(id).ok_or(FormulaError::UnknownField(id))
    }

    fn entry_mut(&mut self, id: NodeId) -> FormulaResult<&mut FieldEntry> {
        self.entries.get_mut(id).ok_or(FormulaError::UnknownField(id))
    }

    /// Find an entry by its dotted path.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.entries.iter().position(|entry| entry.path == path)
    }

    /// Resolved children of a node (empty otherwise).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.entries.get(id).map(|entry| &entry.children) {
            Some(ChildState::Resolved(children)) => children,
            _ => &[],
        }
    }

    /// Flip a node open or closed, requesting children on first expansion.
    pub fn toggle(&mut self, id: NodeId) -> FormulaResult<ToggleOutcome> {
        let entry = self.entry_mut(id)?;
        if entry.children == ChildState::Leaf {
            return Ok(ToggleOutcome::Leaf);
        }

        entry.open = !entry.open;
        let outcome = if entry.children == ChildState::Unresolved && entry.open {
            entry.children = ChildState::Loading;
            debug!(path = %entry.path, "Requesting lazy field children");
            ToggleOutcome::Expand(ExpandRequest {
                node: id,
                key: entry.key.clone(),
                path: entry.path.clone(),
                label: entry.label.clone(),
                custom_data: entry.custom_data.clone(),
            })
        } else if entry.open {
            ToggleOutcome::Opened
        } else {
            ToggleOutcome::Closed
        };

        self.clamp_cursor();
        Ok(outcome)
    }

    /// Store the children fetched for a lazy node.
    ///
    /// Only a node with a request in flight accepts children. Resolved
    /// nodes keep their cache and unrequested nodes stay unresolved.
    pub fn resolve(&mut self, id: NodeId, fields: &FieldMap) -> FormulaResult<()> {
        if !self.entry(id)?.is_loading() {
            debug!(node = id, "Ignoring children for a node that is not loading");
            return Ok(());
        }

        let children = self.add_children(Some(id), fields);
        let entry = self.entry_mut(id)?;
        debug!(path = %entry.path, count = children.len(), "Resolved lazy field children");
        entry.children = ChildState::Resolved(children);
        self.clamp_cursor();
        Ok(())
    }

    /// Reset a node whose expansion failed so the next expansion retries.
    pub fn fail(&mut self, id: NodeId) -> FormulaResult<()> {
        let entry = self.entry_mut(id)?;
        if entry.children == ChildState::Loading {
            entry.children = ChildState::Unresolved;
            entry.open = false;
        }
        self.clamp_cursor();
        Ok(())
    }

    /// Close a node without touching its children.
    pub fn collapse(&mut self, id: NodeId) -> FormulaResult<()> {
        self.entry_mut(id)?.open = false;
        self.clamp_cursor();
        Ok(())
    }

    /// Close every open node.
    pub fn collapse_all(&mut self) {
        for entry in &mut self.entries {
            entry.open = false;
        }
        self.cursor = 0;
    }

    /// The token inserted when a node is selected.
    pub fn token_for(&self, id: NodeId) -> FormulaResult<Token> {
        let entry = self.entry(id)?;
        Ok(Token::field(entry.path.clone(), entry.label.clone()))
    }

    /// Rows currently shown: roots plus the children of open nodes.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let entry = &self.entries[id];
            rows.push(VisibleRow {
                id,
                depth: entry.depth,
            });
            if entry.open {
                if let ChildState::Resolved(children) = &entry.children {
                    stack.extend(children.iter().rev().copied());
                }
            }
        }

        rows
    }

    // ------------------------------------------------------------------
    // Keyboard highlight
    // ------------------------------------------------------------------

    /// Highlighted row index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Highlighted node, if any row is visible.
    pub fn highlighted(&self) -> Option<NodeId> {
        self.visible_rows().get(self.cursor).map(|row| row.id)
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        let rows = self.visible_rows().len();
        if self.cursor + 1 < rows {
            self.cursor += 1;
        }
    }

    /// Highlight the row showing `id`, if visible.
    pub fn highlight(&mut self, id: NodeId) {
        if let Some(index) = self.visible_rows().iter().position(|row| row.id == id) {
            self.cursor = index;
        }
    }

    fn clamp_cursor(&mut self) {
        let rows = self.visible_rows().len();
        if self.cursor >= rows {
            self.cursor = rows.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldNode;

    fn sample_fields() -> FieldMap {
        let mut address = FieldMap::new();
        address.insert("city".to_string(), FieldNode::leaf("City"));

        let mut customer = FieldMap::new();
        customer.insert("name".to_string(), FieldNode::leaf("Name"));
        customer.insert("address".to_string(), FieldNode::branch("Address", address));
        customer.insert(
            "orders".to_string(),
            FieldNode::lazy("Orders").with_custom_data("orders"),
        );

        let mut fields = FieldMap::new();
        fields.insert("customer".to_string(), FieldNode::branch("Customer", customer));
        fields.insert("total".to_string(), FieldNode::leaf("Total"));
        fields
    }

    #[test]
    fn test_paths_and_labels_accumulate() {
        let tree = FieldTree::new(&sample_fields());
        let city = tree.find("customer.address.city").expect("city present");
        let entry = tree.get(city).unwrap();
        assert_eq!(entry.label, "Customer > Address > City");
        assert_eq!(entry.depth, 2);
        assert_eq!(
            tree.token_for(city).unwrap(),
            Token::field("customer.address.city", "Customer > Address > City")
        );
    }

    #[test]
    fn test_only_roots_visible_initially() {
        let tree = FieldTree::new(&sample_fields());
        let names: Vec<&str> = tree
            .visible_rows()
            .iter()
            .map(|row| tree.get(row.id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["Customer", "Total"]);
    }

    #[test]
    fn test_toggle_static_branch() {
        let mut tree = FieldTree::new(&sample_fields());
        let customer = tree.find("customer").unwrap();
        assert_eq!(tree.toggle(customer).unwrap(), ToggleOutcome::Opened);
        assert_eq!(tree.visible_rows().len(), 5);
        assert_eq!(tree.toggle(customer).unwrap(), ToggleOutcome::Closed);
        assert_eq!(tree.visible_rows().len(), 2);
    }

    #[test]
    fn test_lazy_node_requests_once() {
        let mut tree = FieldTree::new(&sample_fields());
        let orders = tree.find("customer.orders").unwrap();

        let ToggleOutcome::Expand(request) = tree.toggle(orders).unwrap() else {
            panic!("expected an expansion request");
        };
        assert_eq!(request.path, "customer.orders");
        assert_eq!(request.label, "Customer > Orders");
        assert_eq!(request.custom_data, Some(Value::String("orders".to_string())));
        assert!(tree.get(orders).unwrap().is_loading());

        let mut children = FieldMap::new();
        children.insert("count".to_string(), FieldNode::leaf("Count"));
        tree.resolve(orders, &children).unwrap();

        assert_eq!(tree.toggle(orders).unwrap(), ToggleOutcome::Closed);
        assert_eq!(tree.toggle(orders).unwrap(), ToggleOutcome::Opened);

        let count = tree.find("customer.orders.count").unwrap();
        assert_eq!(tree.get(count).unwrap().label, "Customer > Orders > Count");
    }

    #[test]
    fn test_toggle_while_loading_does_not_rerequest() {
        let mut tree = FieldTree::new(&sample_fields());
        let orders = tree.find("customer.orders").unwrap();
        assert!(matches!(tree.toggle(orders).unwrap(), ToggleOutcome::Expand(_)));
        assert_eq!(tree.toggle(orders).unwrap(), ToggleOutcome::Closed);
        assert_eq!(tree.toggle(orders).unwrap(), ToggleOutcome::Opened);
    }

    #[test]
    fn test_failed_expansion_retries() {
        let mut tree = FieldTree::new(&sample_fields());
        let orders = tree.find("customer.orders").unwrap();
        assert!(matches!(tree.toggle(orders).unwrap(), ToggleOutcome::Expand(_)));
        tree.fail(orders).unwrap();
        assert!(!tree.get(orders).unwrap().open);
        assert!(matches!(tree.toggle(orders).unwrap(), ToggleOutcome::Expand(_)));
    }

    #[test]
    fn test_resolve_ignored_when_cached() {
        let mut tree = FieldTree::new(&sample_fields());
        let customer = tree.find("customer").unwrap();
        let before = tree.len();
        let mut extra = FieldMap::new();
        extra.insert("x".to_string(), FieldNode::leaf("X"));
        tree.resolve(customer, &extra).unwrap();
        assert_eq!(tree.len(), before);
    }

    #[test]
    fn test_resolve_ignored_when_not_requested() {
        let mut tree = FieldTree::new(&sample_fields());
        let orders = tree.find("customer.orders").unwrap();
        let before = tree.len();
        let mut children = FieldMap::new();
        children.insert("count".to_string(), FieldNode::leaf("Count"));

        tree.resolve(orders, &children).unwrap();
        assert_eq!(tree.len(), before);
        assert_eq!(tree.get(orders).unwrap().children, ChildState::Unresolved);
        assert!(matches!(tree.toggle(orders).unwrap(), ToggleOutcome::Expand(_)));
    }

    #[test]
    fn test_leaf_toggle() {
        let mut tree = FieldTree::new(&sample_fields());
        let total = tree.find("total").unwrap();
        assert_eq!(tree.toggle(total).unwrap(), ToggleOutcome::Leaf);
    }

    #[test]
    fn test_unknown_node() {
        let mut tree = FieldTree::new(&sample_fields());
        assert!(matches!(tree.toggle(99), Err(FormulaError::UnknownField(99))));
    }

    #[test]
    fn test_collapse_all_and_cursor() {
        let mut tree = FieldTree::new(&sample_fields());
        let customer = tree.find("customer").unwrap();
        tree.toggle(customer).unwrap();
        tree.cursor_down();
        tree.cursor_down();
        assert_eq!(tree.highlighted(), tree.find("customer.address"));

        tree.collapse_all();
        assert_eq!(tree.cursor(), 0);
        assert_eq!(tree.visible_rows().len(), 2);
        assert_eq!(tree.highlighted(), Some(customer));
    }

    #[test]
    fn test_cursor_clamped_after_collapse() {
        let mut tree = FieldTree::new(&sample_fields());
        let customer = tree.find("customer").unwrap();
        tree.toggle(customer).unwrap();
        for _ in 0..10 {
            tree.cursor_down();
        }
        assert_eq!(tree.cursor(), 4);
        tree.collapse(customer).unwrap();
        assert_eq!(tree.cursor(), 1);
    }
}
