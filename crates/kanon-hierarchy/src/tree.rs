//! Arena-backed generalization hierarchy tree.
//!
//! Nodes are stored in insertion order, so a parent always precedes its
//! children. The descendant-leaf pass relies on this and walks the arena
//! backwards once.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{HierarchyError, HierarchyResult};

/// Handle to a node inside a [`HierarchyTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its tree's arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One categorical value at one level of generalization.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    attribute_name: Arc<str>,
    value: String,
    level: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    descendant_leaf_count: usize,
}

impl HierarchyNode {
    /// Attribute this node generalizes.
    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    /// The categorical value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Depth below the root (root = 0, most general).
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Parent node, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in definition order.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of leaves at or below this node.
    #[inline]
    pub fn descendant_leaf_count(&self) -> usize {
        self.descendant_leaf_count
    }

    /// Returns true if the node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns true if the node has no parent.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A rooted tree of values for a single attribute.
///
/// Values are unique within a tree; [`HierarchyTree::add_child`] rejects
/// duplicates so that value strings can serve as lookup keys.
#[derive(Debug, Clone)]
pub struct HierarchyTree {
    attribute_name: Arc<str>,
    nodes: Vec<HierarchyNode>,
    by_value: HashMap<String, NodeId>,
}

impl HierarchyTree {
    /// Creates a tree holding only its root value.
    pub fn new(attribute_name: &str, root_value: impl Into<String>) -> Self {
        let attribute_name: Arc<str> = Arc::from(attribute_name);
        let value = root_value.into();
        let root = HierarchyNode {
            attribute_name: Arc::clone(&attribute_name),
            value: value.clone(),
            level: 0,
            parent: None,
            children: Vec::new(),
            descendant_leaf_count: 1,
        };

        let mut by_value = HashMap::new();
        by_value.insert(value, NodeId(0));

        Self {
            attribute_name,
            nodes: vec![root],
            by_value,
        }
    }

    /// Appends `value` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// - [`HierarchyError::UnknownParent`] if `parent` is not a node of this tree
    /// - [`HierarchyError::DuplicateValue`] if the value already exists
    pub fn add_child(
        &mut self,
        parent: NodeId,
        value: impl Into<String>,
    ) -> HierarchyResult<NodeId> {
        if parent.0 >= self.nodes.len() {
            return Err(HierarchyError::UnknownParent {
                attribute: self.attribute_name.to_string(),
                index: parent.0,
            });
        }

        let value = value.into();
        if self.by_value.contains_key(&value) {
            return Err(HierarchyError::DuplicateValue {
                attribute: self.attribute_name.to_string(),
                value,
            });
        }

        let id = NodeId(self.nodes.len());
        let level = self.nodes[parent.0].level + 1;
        self.nodes.push(HierarchyNode {
            attribute_name: Arc::clone(&self.attribute_name),
            value: value.clone(),
            level,
            parent: Some(parent),
            children: Vec::new(),
            descendant_leaf_count: 1,
        });
        self.nodes[parent.0].children.push(id);
        self.by_value.insert(value, id);

        Ok(id)
    }

    /// Recomputes every node's descendant-leaf count in one bottom-up pass.
    pub(crate) fn compute_descendant_leaf_counts(&mut self) {
        for node in &mut self.nodes {
            node.descendant_leaf_count = usize::from(node.children.is_empty());
        }
        for idx in (1..self.nodes.len()).rev() {
            let count = self.nodes[idx].descendant_leaf_count;
            if let Some(parent) = self.nodes[idx].parent {
                self.nodes[parent.0].descendant_leaf_count += count;
            }
        }
    }

    /// Attribute name this hierarchy belongs to.
    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    /// Handle of the root node.
    #[inline]
    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    /// The root node.
    #[inline]
    pub fn root(&self) -> &HierarchyNode {
        &self.nodes[0]
    }

    /// Returns the node behind a handle.
    #[inline]
    pub fn node(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.0]
    }

    /// Looks up a node handle by value.
    #[inline]
    pub fn find(&self, value: &str) -> Option<NodeId> {
        self.by_value.get(value).copied()
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Deepest level in the tree.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(HierarchyNode::level).max().unwrap_or(0)
    }

    /// Iterates over all nodes in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &HierarchyNode)> {
        self.nodes.iter().enumerate().map(|(idx, node)| (NodeId(idx), node))
    }

    /// Iterates over leaf values.
    pub fn leaves(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .filter(|node| node.is_leaf())
            .map(HierarchyNode::value)
    }
}
