//! Precomputed per-attribute lookups over a hierarchy tree.

use std::collections::HashSet;

use crate::cache::{CacheStats, LcaCache};
use crate::config::CacheConfig;
use crate::error::{HierarchyError, HierarchyResult};
use crate::parser::parse_hierarchy;
use crate::tree::{HierarchyNode, HierarchyTree, NodeId};

/// Indexed generalization hierarchy for one attribute.
///
/// Provides O(1) lookup for:
/// - level of a value
/// - descendant-leaf count of a value
/// - whether one value is an ancestor-or-self of another
///
/// and memoized lowest-common-ancestor queries over value multisets.
///
/// # Example
///
/// ```rust
/// use kanon_hierarchy::HierarchyIndex;
///
/// let index = HierarchyIndex::from_definition(
///     "country",
///     "Any\n\tEurope\n\t\tFrance\n\t\tSpain\n\tAsia\n\t\tJapan\n",
/// ).unwrap();
///
/// assert_eq!(index.lowest_common_ancestor(["France", "Spain"]).unwrap(), "Europe");
/// assert_eq!(index.lowest_common_ancestor(["France", "Japan"]).unwrap(), "Any");
/// assert!(index.has_ancestor("Europe", "France").unwrap());
/// assert_eq!(index.total_num_leaves(), 3);
/// ```
#[derive(Debug)]
pub struct HierarchyIndex {
    tree: HierarchyTree,
    /// Ancestor-or-self set of every node, indexed by arena position.
    ancestors: Vec<HashSet<NodeId>>,
    lca_cache: Option<LcaCache>,
}

impl HierarchyIndex {
    /// Indexes a tree with the default LCA cache.
    pub fn new(tree: HierarchyTree) -> Self {
        Self::with_cache(tree, Some(CacheConfig::default()))
    }

    /// Indexes a tree, optionally memoizing LCA results.
    pub fn with_cache(mut tree: HierarchyTree, cache: Option<CacheConfig>) -> Self {
        tree.compute_descendant_leaf_counts();

        // Parents precede children in the arena, so each parent's set is
        // complete by the time its children are visited.
        let mut ancestors: Vec<HashSet<NodeId>> = Vec::with_capacity(tree.len());
        for (id, node) in tree.iter() {
            let mut set = match node.parent() {
                Some(parent) => ancestors[parent.index()].clone(),
                None => HashSet::new(),
            };
            set.insert(id);
            ancestors.push(set);
        }

        Self {
            tree,
            ancestors,
            lca_cache: cache.as_ref().map(LcaCache::new),
        }
    }

    /// Parses a tab-indented definition and indexes it.
    pub fn from_definition(attribute: &str, definition: &str) -> HierarchyResult<Self> {
        Ok(Self::new(parse_hierarchy(attribute, definition)?))
    }

    /// Attribute this hierarchy generalizes.
    pub fn attribute_name(&self) -> &str {
        self.tree.attribute_name()
    }

    /// The underlying tree.
    pub fn tree(&self) -> &HierarchyTree {
        &self.tree
    }

    /// The most general value.
    pub fn root_value(&self) -> &str {
        self.tree.root().value()
    }

    /// Number of leaves in the whole hierarchy.
    pub fn total_num_leaves(&self) -> usize {
        self.tree.root().descendant_leaf_count()
    }

    /// Deepest level of the hierarchy.
    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Returns true if `value` exists in the hierarchy.
    pub fn contains(&self, value: &str) -> bool {
        self.tree.find(value).is_some()
    }

    /// Resolves a value to its node handle.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::UnknownValue`] if the value is absent.
    pub fn node_id(&self, value: &str) -> HierarchyResult<NodeId> {
        self.tree
            .find(value)
            .ok_or_else(|| HierarchyError::UnknownValue {
                attribute: self.attribute_name().to_string(),
                value: value.to_string(),
            })
    }

    /// Returns the node holding `value`.
    pub fn node(&self, value: &str) -> HierarchyResult<&HierarchyNode> {
        Ok(self.tree.node(self.node_id(value)?))
    }

    /// Level of `value` (0 = root).
    pub fn level(&self, value: &str) -> HierarchyResult<usize> {
        Ok(self.node(value)?.level())
    }

    /// Number of leaves at or below `value`.
    pub fn descendant_leaf_count(&self, value: &str) -> HierarchyResult<usize> {
        Ok(self.node(value)?.descendant_leaf_count())
    }

    /// Returns true if `value` is a leaf.
    pub fn is_leaf(&self, value: &str) -> HierarchyResult<bool> {
        Ok(self.node(value)?.is_leaf())
    }

    /// Direct children of `value` in definition order.
    pub fn children(&self, value: &str) -> HierarchyResult<Vec<&str>> {
        Ok(self
            .node(value)?
            .children()
            .iter()
            .map(|&child| self.tree.node(child).value())
            .collect())
    }

    /// `|level(v1) - level(v2)|`.
    pub fn level_distance(&self, value1: &str, value2: &str) -> HierarchyResult<usize> {
        Ok(self.level(value1)?.abs_diff(self.level(value2)?))
    }

    /// Normalized information loss of publishing `value` instead of a leaf:
    /// `(descendant_leaf_count - 1) / total_num_leaves`.
    pub fn information_loss(&self, value: &str) -> HierarchyResult<f64> {
        let count = self.descendant_leaf_count(value)?;
        Ok((count - 1) as f64 / self.total_num_leaves() as f64)
    }

    /// Returns true if `ancestor` equals `value` or lies on `value`'s path to the root.
    pub fn has_ancestor(&self, ancestor: &str, value: &str) -> HierarchyResult<bool> {
        let ancestor = self.node_id(ancestor)?;
        let value = self.node_id(value)?;
        Ok(self.is_ancestor_or_self(ancestor, value))
    }

    /// Handle-based ancestor-or-self check.
    #[inline]
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, value: NodeId) -> bool {
        self.ancestors[value.index()].contains(&ancestor)
    }

    /// Most specific value that is an ancestor-or-self of every input value.
    ///
    /// Duplicates are allowed; the result depends only on the distinct values.
    ///
    /// # Errors
    ///
    /// - [`HierarchyError::EmptyValueSet`] if `values` yields nothing
    /// - [`HierarchyError::UnknownValue`] if any value is absent
    pub fn lowest_common_ancestor<I, S>(&self, values: I) -> HierarchyResult<&str>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut key = values
            .into_iter()
            .map(|value| self.node_id(value.as_ref()))
            .collect::<HierarchyResult<Vec<NodeId>>>()?;
        key.sort_unstable();
        key.dedup();

        if key.is_empty() {
            return Err(HierarchyError::EmptyValueSet {
                attribute: self.attribute_name().to_string(),
            });
        }

        let lca = if key.len() == 1 {
            key[0]
        } else if let Some(cache) = self.lca_cache.as_ref() {
            match cache.get(&key) {
                Some(hit) => hit,
                None => {
                    let lca = self.lca_of_nodes(&key);
                    cache.set(key, lca);
                    lca
                }
            }
        } else {
            self.lca_of_nodes(&key)
        };

        Ok(self.tree.node(lca).value())
    }

    /// Raises every node to the shallowest level present, then raises all of
    /// them in lockstep until they meet.
    fn lca_of_nodes(&self, nodes: &[NodeId]) -> NodeId {
        let target_level = nodes
            .iter()
            .map(|&id| self.tree.node(id).level())
            .min()
            .unwrap_or(0);

        let mut current: Vec<NodeId> = nodes
            .iter()
            .map(|&id| {
                let mut id = id;
                while self.tree.node(id).level() > target_level {
                    id = self.parent_or_self(id);
                }
                id
            })
            .collect();

        while current.iter().any(|&id| id != current[0]) {
            for id in current.iter_mut() {
                *id = self.parent_or_self(*id);
            }
        }

        current[0]
    }

    #[inline]
    fn parent_or_self(&self, id: NodeId) -> NodeId {
        self.tree.node(id).parent().unwrap_or(id)
    }

    /// Returns LCA cache statistics, if caching is enabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.lca_cache.as_ref().map(LcaCache::stats)
    }
}
