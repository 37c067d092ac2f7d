//! # Document Model
//!
//! The JSON input representation: a viewport and a nested tree of boxes,
//! each with an optional id, a style and children. Designed to be produced
//! by a UI description layer or written by hand.
//!
//! Defaults for every unset field come from serde, so `{ "root": {} }` is a
//! complete document.

use serde::{Deserialize, Serialize};

use crate::layout::{LayoutBox, Viewport};
use crate::queue::Queue;
use crate::style::BoxStyle;
use crate::tree::{NodeId, Tree};

/// A complete document ready for layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Host surface size. The CLI may override it.
    #[serde(default)]
    pub viewport: Viewport,

    /// The caller's root box. It becomes the sole child of the synthetic
    /// viewport root during layout.
    pub root: Node,
}

/// A box in the document tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// A name for this box, reported in errors and layout snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub style: BoxStyle,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(style: BoxStyle, children: Vec<Node>) -> Self {
        Self {
            id: None,
            style,
            children,
        }
    }

    pub fn with_id(id: impl Into<String>, style: BoxStyle, children: Vec<Node>) -> Self {
        Self {
            id: Some(id.into()),
            style,
            children,
        }
    }

    /// Build the layout tree for this node and its descendants.
    ///
    /// Walks breadth-first with a work queue, so document depth is not
    /// limited by the call stack.
    pub fn into_tree(self) -> Tree<LayoutBox> {
        let Node {
            id,
            style,
            children,
        } = self;
        let mut tree = Tree::new(LayoutBox {
            id,
            style,
            ..Default::default()
        });

        let mut pending: Queue<(NodeId, Vec<Node>)> = Queue::new();
        pending.enqueue((tree.root(), children));
        while let Some((parent, children)) = pending.dequeue() {
            for child in children {
                let Node {
                    id,
                    style,
                    children,
                } = child;
                let node = tree.append(
                    parent,
                    LayoutBox {
                        id,
                        style,
                        ..Default::default()
                    },
                );
                pending.enqueue((node, children));
            }
        }

        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Dimension, FlexDirection};

    #[test]
    fn minimal_document_parses() {
        let doc: Document = serde_json::from_str(r#"{ "root": {} }"#).unwrap();
        assert_eq!(doc.viewport, Viewport::default());
        assert!(doc.root.children.is_empty());
    }

    #[test]
    fn document_with_viewport_and_children() {
        let doc: Document = serde_json::from_str(
            r#"{
                "viewport": { "width": 320, "height": 480 },
                "root": {
                    "id": "app",
                    "style": { "flexDirection": "column" },
                    "children": [
                        { "id": "a", "style": { "width": "50%" } },
                        { "id": "b", "children": [ { "id": "b1" } ] }
                    ]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(doc.viewport, Viewport::new(320.0, 480.0));
        assert_eq!(doc.root.style.flex_direction, FlexDirection::Column);
        assert_eq!(doc.root.children[0].style.width, Some(Dimension::Percent(0.5)));
        assert_eq!(doc.root.children[1].children[0].id.as_deref(), Some("b1"));
    }

    #[test]
    fn into_tree_preserves_order_and_nesting() {
        let doc = Node::with_id(
            "app",
            BoxStyle::default(),
            vec![
                Node::with_id(
                    "a",
                    BoxStyle::default(),
                    vec![Node::with_id("a1", BoxStyle::default(), vec![])],
                ),
                Node::with_id("b", BoxStyle::default(), vec![]),
            ],
        );
        let tree = doc.into_tree();
        let root = tree.root();
        assert_eq!(tree[root].id.as_deref(), Some("app"));

        let kids: Vec<_> = tree
            .children(root)
            .map(|c| tree[c].id.clone().unwrap_or_default())
            .collect();
        assert_eq!(kids, vec!["a", "b"]);

        let a = tree.first_child(root).unwrap();
        let a1 = tree.first_child(a).unwrap();
        assert_eq!(tree[a1].id.as_deref(), Some("a1"));
        assert_eq!(tree.parent(a1), Some(a));
    }
}
