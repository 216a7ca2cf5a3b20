//! Greedy nearest-neighbour clustering.

use std::collections::HashSet;

use crate::config::AnonymizationStrategy;
use crate::error::AnonymizeResult;
use crate::generalizer::generalize_partition;
use crate::record::{attribute_value, check_inputs, Hierarchies, Record};
use crate::traits::Anonymizer;

/// Builds clusters around the lowest-position unassigned record.
///
/// While at least `2k` records are unassigned, the first of them is grouped
/// with its `k - 1` nearest unassigned neighbours. Distance is the number of
/// generalization steps needed to merge two records: for each attribute, the
/// level distance of both values to their lowest common ancestor. Ties go to
/// the lower position. Whatever remains becomes the final cluster.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusteringAnonymizer;

impl ClusteringAnonymizer {
    /// Creates a clustering anonymizer.
    pub fn new() -> Self {
        Self
    }

    /// Generalization distance between two records.
    pub fn distance(
        hierarchies: &Hierarchies,
        records: &[Record],
        a: usize,
        b: usize,
    ) -> AnonymizeResult<usize> {
        let mut total = 0;
        for (attribute, index) in hierarchies {
            let value_a = attribute_value(&records[a], attribute, a)?;
            let value_b = attribute_value(&records[b], attribute, b)?;
            if value_a == value_b {
                continue;
            }
            let lca = index.lowest_common_ancestor([value_a, value_b])?;
            total += index.level_distance(value_a, lca)? + index.level_distance(value_b, lca)?;
        }
        Ok(total)
    }

    /// Clusters of record positions.
    pub fn clusters(
        &self,
        hierarchies: &Hierarchies,
        records: &[Record],
        k: usize,
    ) -> AnonymizeResult<Vec<Vec<usize>>> {
        let k = k.max(1);
        let mut unassigned: Vec<usize> = (0..records.len()).collect();
        let mut clusters = Vec::new();

        while unassigned.len() >= 2 * k {
            let seed = unassigned[0];

            let mut neighbours = unassigned[1..]
                .iter()
                .map(|&other| -> AnonymizeResult<(usize, usize)> {
                    Ok((Self::distance(hierarchies, records, seed, other)?, other))
                })
                .collect::<AnonymizeResult<Vec<(usize, usize)>>>()?;
            neighbours.sort_unstable();

            let mut cluster = Vec::with_capacity(k);
            cluster.push(seed);
            cluster.extend(neighbours.iter().take(k - 1).map(|&(_, other)| other));

            let taken: HashSet<usize> = cluster.iter().copied().collect();
            unassigned.retain(|position| !taken.contains(position));
            clusters.push(cluster);
        }

        if !unassigned.is_empty() {
            clusters.push(unassigned);
        }
        Ok(clusters)
    }
}

impl Anonymizer for ClusteringAnonymizer {
    fn strategy(&self) -> AnonymizationStrategy {
        AnonymizationStrategy::Clustering
    }

    fn anonymize(
        &self,
        hierarchies: &Hierarchies,
        records: &[Record],
        k: usize,
    ) -> AnonymizeResult<Vec<Record>> {
        check_inputs(hierarchies, records, k)?;

        let clusters = self.clusters(hierarchies, records, k)?;
        tracing::debug!(clusters = clusters.len(), k, "nearest-neighbour clusters built");

        generalize_partition(hierarchies, records, &clusters)
    }
}
