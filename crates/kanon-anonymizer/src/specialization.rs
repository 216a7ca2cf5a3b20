//! Top-down specialization search.
//!
//! The search starts from a single node that generalizes every attribute to
//! its hierarchy root and therefore matches the whole dataset. Each round
//! visits every frontier node and, for each attribute, proposes replacing the
//! assigned value with each of its hierarchy children. The proposal that
//! lowers information loss the most while keeping every resulting group at
//! `k` or more records replaces the node in the next frontier. Rounds repeat
//! until the frontier stops changing.
//!
//! ```text
//! round 0:  [root, root]                       (all records)
//! round 1:  [A, root]  [B, root]               (split on attribute 0)
//! round 2:  [A, Young] [A, Old]  [B, root]     (split on attribute 1)
//! ```
//!
//! A split is all or nothing: every hierarchy child of the specialized value
//! must match at least `k` records, so a child matching none blocks it.
//! The frontier leaves always partition the dataset: every hierarchy child
//! covers a disjoint set of leaves, and a split that would strand a record
//! (one whose raw value is the assigned value itself) is refused.

use kanon_hierarchy::{HierarchyIndex, NodeId};

use crate::config::AnonymizationStrategy;
use crate::error::AnonymizeResult;
use crate::record::{attribute_value, check_inputs, Hierarchies, Record};
use crate::traits::Anonymizer;

/// Information-loss differences below this are treated as ties.
const LOSS_EPSILON: f64 = 1e-12;

/// Read-only state shared by every node of one search.
#[derive(Debug)]
pub struct SearchContext<'a> {
    attributes: Vec<&'a str>,
    indexes: Vec<&'a HierarchyIndex>,
    raw: &'a [Record],
    /// Hierarchy node of every raw value, `[record][attribute]`.
    raw_nodes: Vec<Vec<NodeId>>,
    k: usize,
    parallel: bool,
}

impl<'a> SearchContext<'a> {
    /// Resolves every raw quasi-identifier value against its hierarchy.
    pub fn new(
        hierarchies: &'a Hierarchies,
        raw: &'a [Record],
        k: usize,
        parallel: bool,
    ) -> AnonymizeResult<Self> {
        let attributes: Vec<&str> = hierarchies.keys().map(String::as_str).collect();
        let indexes: Vec<&HierarchyIndex> = hierarchies.values().collect();

        let raw_nodes = raw
            .iter()
            .enumerate()
            .map(|(position, record)| {
                attributes
                    .iter()
                    .zip(&indexes)
                    .map(|(attribute, index)| -> AnonymizeResult<NodeId> {
                        let value = attribute_value(record, attribute, position)?;
                        Ok(index.node_id(value)?)
                    })
                    .collect::<AnonymizeResult<Vec<NodeId>>>()
            })
            .collect::<AnonymizeResult<Vec<Vec<NodeId>>>>()?;

        Ok(Self {
            attributes,
            indexes,
            raw,
            raw_nodes,
            k,
            parallel,
        })
    }

    /// Quasi-identifier names in search order.
    pub fn attributes(&self) -> &[&'a str] {
        &self.attributes
    }

    /// Minimum group size.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Information loss of one record generalized to `assignment`.
    fn record_loss(&self, assignment: &[NodeId]) -> f64 {
        let weight = 1.0 / self.indexes.len() as f64;
        assignment
            .iter()
            .zip(&self.indexes)
            .map(|(&id, index)| {
                let count = index.tree().node(id).descendant_leaf_count();
                weight * (count - 1) as f64 / index.total_num_leaves() as f64
            })
            .sum()
    }

    /// Whether split evaluation may run on the rayon pool.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    fn value(&self, attribute: usize, id: NodeId) -> &'a str {
        let index: &'a HierarchyIndex = self.indexes[attribute];
        index.tree().node(id).value()
    }
}

/// One candidate generalization assignment and the records it matches.
#[derive(Debug, Clone)]
pub struct SpecializationNode {
    assignment: Vec<NodeId>,
    parent: Option<usize>,
    children: Vec<usize>,
    records: Vec<usize>,
    information_loss_cost: f64,
}

impl SpecializationNode {
    fn new(
        ctx: &SearchContext<'_>,
        assignment: Vec<NodeId>,
        parent: Option<usize>,
        records: Vec<usize>,
    ) -> Self {
        let information_loss_cost = records.len() as f64 * ctx.record_loss(&assignment);
        Self {
            assignment,
            parent,
            children: Vec::new(),
            records,
            information_loss_cost,
        }
    }

    /// Assigned hierarchy node per attribute, in search order.
    pub fn assignment_ids(&self) -> &[NodeId] {
        &self.assignment
    }

    /// Position of the parent node in the tree, `None` for the root.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Positions of the child nodes in the tree.
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Raw dataset positions matched by this node.
    pub fn records(&self) -> &[usize] {
        &self.records
    }

    /// Number of matched records.
    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    /// LM of the matched records generalized to this node's assignment.
    pub fn information_loss_cost(&self) -> f64 {
        self.information_loss_cost
    }

    /// Two nodes are the same when their assignments agree positionally.
    pub fn same_assignment(&self, other: &SpecializationNode) -> bool {
        self.assignment == other.assignment
    }
}

/// A chosen refinement of one frontier node.
#[derive(Debug)]
struct Split {
    attribute: usize,
    children: Vec<SpecializationNode>,
    reduction: f64,
}

/// The growing search tree.
#[derive(Debug)]
pub struct SpecializationTree<'a> {
    ctx: SearchContext<'a>,
    nodes: Vec<SpecializationNode>,
    frontier: Vec<usize>,
    rounds: usize,
}

impl<'a> SpecializationTree<'a> {
    /// Creates the tree holding only the all-roots node.
    pub fn new(ctx: SearchContext<'a>) -> Self {
        let assignment: Vec<NodeId> = ctx
            .indexes
            .iter()
            .map(|index| index.tree().root_id())
            .collect();
        let root = SpecializationNode::new(&ctx, assignment, None, (0..ctx.raw.len()).collect());
        Self {
            ctx,
            nodes: vec![root],
            frontier: vec![0],
            rounds: 0,
        }
    }

    /// Runs refinement rounds until the frontier reaches a fixpoint.
    pub fn run(&mut self) {
        let mut changed = true;
        while changed {
            changed = self.refine_round();
        }
        tracing::info!(
            rounds = self.rounds,
            nodes = self.nodes.len(),
            leaves = self.frontier.len(),
            "top-down specialization converged"
        );
    }

    /// Performs one round over the whole frontier. Returns true if the
    /// frontier changed.
    pub fn refine_round(&mut self) -> bool {
        let decisions = self.evaluate_frontier();

        let mut next = Vec::with_capacity(self.frontier.len());
        for (&node_idx, decision) in self.frontier.iter().zip(decisions) {
            let Some(split) = decision else {
                next.push(node_idx);
                continue;
            };

            tracing::debug!(
                node = node_idx,
                attribute = self.ctx.attributes[split.attribute],
                children = split.children.len(),
                reduction = split.reduction,
                "specializing node"
            );
            for child in split.children {
                let child_idx = self.nodes.len();
                self.nodes.push(child);
                self.nodes[node_idx].children.push(child_idx);
                next.push(child_idx);
            }
        }

        let changed = next.len() != self.frontier.len()
            || next
                .iter()
                .zip(&self.frontier)
                .any(|(&new, &old)| !self.nodes[new].same_assignment(&self.nodes[old]));

        self.rounds += 1;
        tracing::debug!(round = self.rounds, frontier = next.len(), changed, "round complete");
        self.frontier = next;
        changed
    }

    /// Decides every frontier node's split before any is applied.
    #[cfg(feature = "parallel")]
    fn evaluate_frontier(&self) -> Vec<Option<Split>> {
        use rayon::prelude::*;

        if self.ctx.parallel {
            self.frontier
                .par_iter()
                .map(|&node_idx| self.best_split(node_idx))
                .collect()
        } else {
            self.frontier
                .iter()
                .map(|&node_idx| self.best_split(node_idx))
                .collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_frontier(&self) -> Vec<Option<Split>> {
        self.frontier
            .iter()
            .map(|&node_idx| self.best_split(node_idx))
            .collect()
    }

    /// The valid split with the largest information-loss reduction. Ties go
    /// to the earliest attribute.
    ///
    /// A zero reduction still qualifies: specializing a value with a single
    /// child keeps LM unchanged but lowers MD and opens the way to the
    /// grandchildren. Only negative reductions are refused.
    fn best_split(&self, node_idx: usize) -> Option<Split> {
        let node = &self.nodes[node_idx];
        let mut best: Option<Split> = None;

        for attribute in 0..self.ctx.attributes.len() {
            let Some(children) = self.propose_split(node_idx, attribute) else {
                continue;
            };
            let reduction = node.information_loss_cost
                - children.iter().map(|c| c.information_loss_cost).sum::<f64>();
            if reduction < -LOSS_EPSILON {
                continue;
            }
            if best
                .as_ref()
                .map_or(true, |current| reduction > current.reduction + LOSS_EPSILON)
            {
                best = Some(Split {
                    attribute,
                    children,
                    reduction,
                });
            }
        }

        best
    }

    /// Splits a node's records by the children of its assigned value for
    /// `attribute`. Returns `None` if the split is invalid.
    ///
    /// Every hierarchy child becomes a candidate node. The split is invalid if
    /// any of them, empty ones included, holds fewer than `k` records, or if a
    /// record's raw value is the assigned value itself and so matches no child.
    fn propose_split(&self, node_idx: usize, attribute: usize) -> Option<Vec<SpecializationNode>> {
        let node = &self.nodes[node_idx];
        let index = self.ctx.indexes[attribute];
        let current = node.assignment[attribute];
        let hierarchy_children = index.tree().node(current).children();
        if hierarchy_children.is_empty() {
            return None;
        }

        let mut children = Vec::with_capacity(hierarchy_children.len());
        let mut covered = 0;
        for &child in hierarchy_children {
            let matched: Vec<usize> = node
                .records
                .iter()
                .copied()
                .filter(|&r| index.is_ancestor_or_self(child, self.ctx.raw_nodes[r][attribute]))
                .collect();
            if matched.len() < self.ctx.k {
                return None;
            }

            covered += matched.len();
            let mut assignment = node.assignment.clone();
            assignment[attribute] = child;
            children.push(SpecializationNode::new(&self.ctx, assignment, Some(node_idx), matched));
        }

        (covered == node.records.len()).then_some(children)
    }

    /// Shared search context.
    pub fn context(&self) -> &SearchContext<'a> {
        &self.ctx
    }

    /// All nodes ever inserted, root first.
    pub fn nodes(&self) -> &[SpecializationNode] {
        &self.nodes
    }

    /// Node at a tree position.
    pub fn node(&self, node_idx: usize) -> &SpecializationNode {
        &self.nodes[node_idx]
    }

    /// Positions of the current frontier nodes.
    pub fn leaf_indices(&self) -> &[usize] {
        &self.frontier
    }

    /// Current frontier nodes.
    pub fn leaves(&self) -> impl Iterator<Item = &SpecializationNode> {
        self.frontier.iter().map(|&idx| &self.nodes[idx])
    }

    /// Number of completed rounds.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// `(attribute, value)` pairs of a node's assignment.
    pub fn assignment(&self, node_idx: usize) -> Vec<(&'a str, &'a str)> {
        self.nodes[node_idx]
            .assignment
            .iter()
            .enumerate()
            .map(|(attribute, &id)| (self.ctx.attributes[attribute], self.ctx.value(attribute, id)))
            .collect()
    }

    /// A node's matched records rewritten to its assignment, tagged with
    /// their raw dataset positions.
    pub fn generalized_records(&self, node_idx: usize) -> Vec<(usize, Record)> {
        let assignment = self.assignment(node_idx);
        self.nodes[node_idx]
            .records
            .iter()
            .map(|&position| {
                let mut record = self.ctx.raw[position].clone();
                apply_assignment(&mut record, &assignment);
                (position, record)
            })
            .collect()
    }

    /// Sum of the frontier nodes' information loss.
    pub fn total_information_loss(&self) -> f64 {
        self.leaves().map(SpecializationNode::information_loss_cost).sum()
    }

    /// The frontier's generalized records in original dataset order.
    pub fn anonymized_records(&self) -> Vec<Record> {
        let mut anonymized = self.ctx.raw.to_vec();
        for &leaf in &self.frontier {
            let assignment = self.assignment(leaf);
            for &position in &self.nodes[leaf].records {
                apply_assignment(&mut anonymized[position], &assignment);
            }
        }
        anonymized
    }
}

fn apply_assignment(record: &mut Record, assignment: &[(&str, &str)]) {
    for &(attribute, value) in assignment {
        if let Some(slot) = record.get_mut(attribute) {
            value.clone_into(slot);
        }
    }
}

/// Top-down specialization anonymizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopDownAnonymizer {
    parallel: bool,
}

impl TopDownAnonymizer {
    /// Creates a sequential top-down anonymizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates splits of a round in parallel when the `parallel` feature
    /// is enabled; otherwise has no effect.
    pub fn with_parallel(parallel: bool) -> Self {
        Self { parallel }
    }

    /// Runs the search to its fixpoint and returns the tree.
    pub fn search<'a>(
        &self,
        hierarchies: &'a Hierarchies,
        records: &'a [Record],
        k: usize,
    ) -> AnonymizeResult<SpecializationTree<'a>> {
        check_inputs(hierarchies, records, k)?;
        let ctx = SearchContext::new(hierarchies, records, k, self.parallel)?;
        let mut tree = SpecializationTree::new(ctx);
        tree.run();
        Ok(tree)
    }
}

impl Anonymizer for TopDownAnonymizer {
    fn strategy(&self) -> AnonymizationStrategy {
        AnonymizationStrategy::TopDown
    }

    fn anonymize(
        &self,
        hierarchies: &Hierarchies,
        records: &[Record],
        k: usize,
    ) -> AnonymizeResult<Vec<Record>> {
        Ok(self.search(hierarchies, records, k)?.anonymized_records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::records_information_loss;
    use crate::record::test_support::*;

    fn letter_records(values: &[&str]) -> Vec<Record> {
        values.iter().map(|&v| record(&[("letter", v)])).collect()
    }

    #[test]
    fn test_rejected_split_keeps_single_leaf() {
        let hierarchies = hierarchies(&[("letter", LETTERS)]);
        let records = letter_records(&["A1", "A1", "A2", "B"]);

        let tree = TopDownAnonymizer::new().search(&hierarchies, &records, 2).unwrap();

        // Splitting root gives A (3) and B (1); B is below k so the whole split is refused
        assert_eq!(tree.leaf_indices(), &[0]);
        assert_eq!(tree.nodes().len(), 1);
        assert_eq!(tree.rounds(), 1);
        let anonymized = tree.anonymized_records();
        assert!(anonymized.iter().all(|r| r["letter"] == "root"));
    }

    #[test]
    fn test_split_applied_when_all_groups_reach_k() {
        let hierarchies = hierarchies(&[("letter", LETTERS)]);
        let records = letter_records(&["A1", "B", "A2", "B"]);

        let tree = TopDownAnonymizer::new().search(&hierarchies, &records, 2).unwrap();

        let leaf_values: Vec<&str> = tree
            .leaf_indices()
            .iter()
            .map(|&idx| tree.assignment(idx)[0].1)
            .collect();
        assert_eq!(leaf_values, vec!["A", "B"]);

        let anonymized = tree.anonymized_records();
        let values: Vec<&str> = anonymized.iter().map(|r| r["letter"].as_str()).collect();
        assert_eq!(values, vec!["A", "B", "A", "B"]);
    }

    #[test]
    fn test_empty_hierarchy_child_blocks_split() {
        let hierarchies = hierarchies(&[("age", AGE)]);
        // Nobody is in their 30s, so Young cannot be split into 20s and 30s
        let records: Vec<Record> = ["20s", "20s", "50s", "60s"]
            .iter()
            .map(|&v| record(&[("age", v)]))
            .collect();

        let tree = TopDownAnonymizer::new().search(&hierarchies, &records, 2).unwrap();
        let anonymized = tree.anonymized_records();
        let values: Vec<&str> = anonymized.iter().map(|r| r["age"].as_str()).collect();
        assert_eq!(values, vec!["Young", "Young", "Old", "Old"]);
    }

    #[test]
    fn test_single_child_split_is_taken() {
        const CHAIN: &str = "Any\n\tOnly\n\t\tX\n\t\tY\n";
        let hierarchies = hierarchies(&[("v", CHAIN)]);
        let records: Vec<Record> = ["X", "X", "Y", "Y"]
            .iter()
            .map(|&v| record(&[("v", v)]))
            .collect();

        let tree = TopDownAnonymizer::new().search(&hierarchies, &records, 2).unwrap();

        // Any -> Only leaves LM unchanged but is still taken; Only then splits
        let anonymized = tree.anonymized_records();
        let values: Vec<&str> = anonymized.iter().map(|r| r["v"].as_str()).collect();
        assert_eq!(values, vec!["X", "X", "Y", "Y"]);
        assert_eq!(tree.leaf_indices().len(), 2);
    }

    #[test]
    fn test_internal_raw_value_blocks_split() {
        let hierarchies = hierarchies(&[("letter", LETTERS)]);
        // "A" is already generalized and matches neither A1 nor A2
        let records = letter_records(&["A", "A1", "A1", "A2", "A2", "B", "B"]);

        let tree = TopDownAnonymizer::new().search(&hierarchies, &records, 2).unwrap();
        let anonymized = tree.anonymized_records();
        let values: Vec<&str> = anonymized.iter().map(|r| r["letter"].as_str()).collect();
        assert_eq!(values, vec!["A", "A", "A", "A", "A", "B", "B"]);
    }

    #[test]
    fn test_tie_breaks_on_first_attribute() {
        // Two identical hierarchies: both splits reduce loss equally
        let hierarchies = hierarchies(&[("x", LETTERS), ("y", LETTERS)]);
        let records: Vec<Record> = [("A1", "A1"), ("A1", "A1"), ("B", "B"), ("B", "B")]
            .iter()
            .map(|&(x, y)| record(&[("x", x), ("y", y)]))
            .collect();

        let tree = TopDownAnonymizer::new().search(&hierarchies, &records, 2).unwrap();

        let first_split = tree.node(0).children()[0];
        assert_eq!(tree.assignment(first_split), vec![("x", "A"), ("y", "root")]);
    }

    #[test]
    fn test_node_loss_matches_generalized_records() {
        let hierarchies = hierarchies(&[("letter", LETTERS), ("age", AGE)]);
        let records: Vec<Record> = [("A1", "20s"), ("A2", "30s"), ("B", "50s"), ("B", "60s")]
            .iter()
            .map(|&(l, a)| record(&[("letter", l), ("age", a)]))
            .collect();

        let tree = TopDownAnonymizer::new().search(&hierarchies, &records, 2).unwrap();

        for idx in 0..tree.nodes().len() {
            let generalized = tree.generalized_records(idx);
            let expected =
                records_information_loss(&hierarchies, generalized.iter().map(|(p, r)| (*p, r))).unwrap();
            assert!((tree.node(idx).information_loss_cost() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_children_are_subsets_of_parent() {
        let hierarchies = hierarchies(&[("letter", LETTERS), ("age", AGE)]);
        let records: Vec<Record> = [
            ("A1", "20s"),
            ("A2", "30s"),
            ("A1", "50s"),
            ("B", "60s"),
            ("B", "50s"),
            ("A2", "20s"),
        ]
        .iter()
        .map(|&(l, a)| record(&[("letter", l), ("age", a)]))
        .collect();

        let tree = TopDownAnonymizer::new().search(&hierarchies, &records, 2).unwrap();

        for node in tree.nodes() {
            if let Some(parent) = node.parent() {
                let parent_records = tree.node(parent).records();
                assert!(node.records().iter().all(|r| parent_records.contains(r)));
                assert!(node.num_records() >= 2);
            }
        }
    }
}
