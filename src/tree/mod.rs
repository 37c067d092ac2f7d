//! # Ordered Tree
//!
//! An append-only n-ary tree stored in a flat arena. Nodes are addressed by
//! [`NodeId`] and linked through parent / first-child / next-sibling indices,
//! so the layout passes can read a parent's geometry while writing a child's
//! without holding two references into the same structure.
//!
//! There is no removal and no reparenting. A tree is built once, laid out
//! once, and dropped.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::TreeError;

/// Index of a node inside the [`Tree`] that allocated it.
///
/// Using an id with a tree other than the one that produced it is caller
/// misuse: it either panics on indexing or addresses an unrelated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Links {
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl Links {
    const DETACHED: Links = Links {
        parent: None,
        first_child: None,
        last_child: None,
        next_sibling: None,
    };
}

#[derive(Debug, Clone)]
struct Slot<T> {
    value: T,
    links: Links,
}

/// Arena-backed ordered tree.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    slots: Vec<Slot<T>>,
    root: NodeId,
}

impl<T> Tree<T> {
    /// Create a tree holding a single root node.
    pub fn new(root: T) -> Self {
        Self {
            slots: vec![Slot {
                value: root,
                links: Links::DETACHED,
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes allocated in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false: a tree owns at least its root.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocate a detached node. It takes part in traversal only once it is
    /// attached with [`Tree::add_child`].
    pub fn alloc(&mut self, value: T) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            value,
            links: Links::DETACHED,
        });
        id
    }

    /// Allocate `value` and append it as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, value: T) -> NodeId {
        let child = self.alloc(value);
        self.link_last(parent, child);
        child
    }

    /// Append `child` as the new last child of `parent`.
    ///
    /// A node can be attached once. Attaching a node that already has a
    /// parent, the current root, or an ancestor of `parent` is rejected.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.slots[child.0].links.parent.is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(TreeError::WouldCycle(child));
        }
        if child == self.root {
            return Err(TreeError::WouldCycle(child));
        }
        self.link_last(parent, child);
        Ok(())
    }

    /// Re-root the tree: a new node holding `value` becomes the root and the
    /// previous root its sole child.
    pub fn wrap(mut self, value: T) -> Self {
        let old_root = self.root;
        let new_root = self.alloc(value);
        self.root = new_root;
        self.link_last(new_root, old_root);
        self
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].links.parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].links.first_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].links.next_sibling
    }

    /// Iterate the children of `id` in insertion order.
    pub fn children(&self, id: NodeId) -> Children<'_, T> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Is `ancestor` on the parent chain of `id`?
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    fn link_last(&mut self, parent: NodeId, child: NodeId) {
        let prev_last = self.slots[parent.0].links.last_child;
        match prev_last {
            Some(prev) => self.slots[prev.0].links.next_sibling = Some(child),
            None => self.slots[parent.0].links.first_child = Some(child),
        }
        self.slots[parent.0].links.last_child = Some(child);
        self.slots[child.0].links.parent = Some(parent);
    }
}

impl<T> Index<NodeId> for Tree<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        &self.slots[id.0].value
    }
}

impl<T> IndexMut<NodeId> for Tree<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.slots[id.0].value
    }
}

/// Iterator over a node's children, following next-sibling links.
pub struct Children<'a, T> {
    tree: &'a Tree<T>,
    next: Option<NodeId>,
}

impl<T> Iterator for Children<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_child_appends_in_order() {
        let mut tree = Tree::new("root");
        let root = tree.root();
        let a = tree.append(root, "a");
        let b = tree.append(root, "b");
        let c = tree.alloc("c");
        tree.add_child(root, c).unwrap();

        let kids: Vec<_> = tree.children(root).collect();
        assert_eq!(kids, vec![a, b, c]);
        assert_eq!(tree.first_child(root), Some(a));
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.next_sibling(c), None);
        assert_eq!(tree.parent(c), Some(root));
        assert_eq!(tree[b], "b");
    }

    #[test]
    fn reattaching_is_rejected() {
        let mut tree = Tree::new(0);
        let root = tree.root();
        let a = tree.append(root, 1);
        let b = tree.append(root, 2);
        assert_eq!(tree.add_child(b, a), Err(TreeError::AlreadyAttached(a)));
        // Sibling order is untouched by the failed call.
        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn cycles_are_rejected() {
        let mut tree = Tree::new(0);
        let root = tree.root();
        let a = tree.append(root, 1);
        assert_eq!(tree.add_child(a, root), Err(TreeError::WouldCycle(root)));

        let loose = tree.alloc(2);
        assert_eq!(tree.add_child(loose, loose), Err(TreeError::WouldCycle(loose)));
    }

    #[test]
    fn detached_subtree_can_be_attached_later() {
        let mut tree = Tree::new("root");
        let branch = tree.alloc("branch");
        let leaf = tree.append(branch, "leaf");
        let root = tree.root();
        tree.add_child(root, branch).unwrap();
        assert!(tree.is_ancestor(root, leaf));
        assert!(tree.is_ancestor(branch, leaf));
        assert!(!tree.is_ancestor(leaf, branch));
    }

    #[test]
    fn wrap_makes_old_root_the_only_child() {
        let mut tree = Tree::new("content");
        let old_root = tree.root();
        let _ = tree.append(old_root, "leaf");

        let tree = tree.wrap("viewport");
        let root = tree.root();
        assert_ne!(root, old_root);
        assert_eq!(tree[root], "viewport");
        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![old_root]);
        assert_eq!(tree.parent(old_root), Some(root));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn leaf_has_no_children() {
        let tree = Tree::new(());
        assert_eq!(tree.children(tree.root()).count(), 0);
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
    }
}
