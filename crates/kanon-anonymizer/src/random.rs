//! Random partitioning into groups of `k`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::AnonymizationStrategy;
use crate::error::AnonymizeResult;
use crate::generalizer::generalize_partition;
use crate::record::{check_inputs, Hierarchies, Record};
use crate::traits::Anonymizer;

/// Shuffles the dataset and cuts it into consecutive groups of `k`.
///
/// The last group absorbs the remainder, so every group holds between `k`
/// and `2k - 1` records. A dataset smaller than `2k` becomes one group.
#[derive(Debug, Clone, Default)]
pub struct RandomAnonymizer {
    seed: Option<u64>,
}

impl RandomAnonymizer {
    /// Creates an anonymizer seeded from system entropy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an anonymizer with a fixed seed for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Shuffled clusters of record positions.
    pub fn clusters(&self, num_records: usize, k: usize) -> Vec<Vec<usize>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut positions: Vec<usize> = (0..num_records).collect();
        positions.shuffle(&mut rng);

        let k = k.max(1);
        let full_clusters = (num_records / k).saturating_sub(1);
        let split_at = full_clusters * k;
        let (full, tail) = positions.split_at(split_at);

        let mut clusters: Vec<Vec<usize>> = full.chunks(k).map(<[usize]>::to_vec).collect();
        if !tail.is_empty() {
            clusters.push(tail.to_vec());
        }
        clusters
    }
}

impl Anonymizer for RandomAnonymizer {
    fn strategy(&self) -> AnonymizationStrategy {
        AnonymizationStrategy::Random
    }

    fn anonymize(
        &self,
        hierarchies: &Hierarchies,
        records: &[Record],
        k: usize,
    ) -> AnonymizeResult<Vec<Record>> {
        check_inputs(hierarchies, records, k)?;

        let clusters = self.clusters(records.len(), k);
        tracing::debug!(clusters = clusters.len(), k, "random partition built");

        generalize_partition(hierarchies, records, &clusters)
    }
}
