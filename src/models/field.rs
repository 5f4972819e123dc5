//! Field definitions as supplied by the embedding application.
//!
//! A field tree is an ordered mapping of keys to [`FieldNode`]s. A node
//! either lists its children, announces that they are fetched on demand
//! (`children: true`), or is a leaf.
//!
//! ```json
//! {
//!   "customer": {
//!     "name": "Customer",
//!     "children": {
//!       "name": { "name": "Name" },
//!       "orders": { "name": "Orders", "children": true, "customData": "orders" }
//!     }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered mapping of field keys to nodes. Order is display order.
pub type FieldMap = IndexMap<String, FieldNode>;

/// A node of the custom field tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldNode {
    /// Display name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<FieldChildren>,
    /// Opaque payload handed back to the expansion callback.
    #[serde(
        default,
        rename = "customData",
        alias = "custom_data",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_data: Option<Value>,
}

/// Children of a [`FieldNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldChildren {
    /// `true` means "ask the expansion callback"; `false` is a leaf.
    Lazy(bool),
    /// Statically known children.
    Nested(FieldMap),
}

impl FieldNode {
    /// A leaf node.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: None,
            custom_data: None,
        }
    }

    /// A node whose children are fetched on first expansion.
    pub fn lazy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Some(FieldChildren::Lazy(true)),
            custom_data: None,
        }
    }

    /// A node with statically known children.
    pub fn branch(name: impl Into<String>, children: FieldMap) -> Self {
        Self {
            name: name.into(),
            children: Some(FieldChildren::Nested(children)),
            custom_data: None,
        }
    }

    /// Attach custom data passed to the expansion callback.
    pub fn with_custom_data(mut self, data: impl Into<Value>) -> Self {
        self.custom_data = Some(data.into());
        self
    }

    /// Whether the node can be expanded at all.
    pub fn has_children(&self) -> bool {
        matches!(
            self.children,
            Some(FieldChildren::Lazy(true)) | Some(FieldChildren::Nested(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_children() {
        let json = r#"{
            "customer": {
                "name": "Customer",
                "children": {
                    "name": { "name": "Name" },
                    "orders": { "name": "Orders", "children": true, "customData": {"table": "orders"} }
                }
            },
            "total": { "name": "Total", "children": false }
        }"#;
        let map: FieldMap = serde_json::from_str(json).unwrap();

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["customer", "total"]);

        let customer = &map["customer"];
        assert!(customer.has_children());
        let Some(FieldChildren::Nested(children)) = &customer.children else {
            panic!("expected nested children");
        };
        assert_eq!(children["orders"].children, Some(FieldChildren::Lazy(true)));
        assert_eq!(
            children["orders"].custom_data,
            Some(serde_json::json!({"table": "orders"}))
        );
        assert!(!children["name"].has_children());
        assert!(!map["total"].has_children());
    }

    #[test]
    fn test_snake_case_custom_data_alias() {
        let node: FieldNode =
            serde_json::from_str(r#"{"name": "X", "custom_data": 7}"#).unwrap();
        assert_eq!(node.custom_data, Some(serde_json::json!(7)));
    }

    #[test]
    fn test_builders() {
        let node = FieldNode::lazy("Orders").with_custom_data("orders");
        assert!(node.has_children());
        assert_eq!(node.custom_data, Some(Value::String("orders".to_string())));
        assert!(!FieldNode::leaf("Name").has_children());
    }
}
