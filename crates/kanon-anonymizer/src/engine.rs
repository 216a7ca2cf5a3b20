//! The configured anonymization engine.

use std::time::Instant;

use crate::clustering::ClusteringAnonymizer;
use crate::config::{AnonymizationStrategy, AnonymizerConfig};
use crate::cost::CostReport;
use crate::error::AnonymizeResult;
use crate::random::RandomAnonymizer;
use crate::record::{count_equivalence_classes, Hierarchies, Record};
use crate::result::{AnonymizationResult, AnonymizationStats};
use crate::specialization::TopDownAnonymizer;
use crate::traits::Anonymizer;

/// Runs the configured strategy against a fixed set of hierarchies.
///
/// # Example
///
/// ```ignore
/// use kanon_anonymizer::{AnonymizationStrategy, AnonymizerConfig, KAnonymizer};
///
/// let config = AnonymizerConfig::builder()
///     .with_k(5)
///     .with_strategy(AnonymizationStrategy::TopDown)
///     .build();
///
/// let anonymizer = KAnonymizer::with_config(&hierarchies, config);
/// let result = anonymizer.anonymize(&records)?;
/// println!("{}", anonymizer.evaluate(&records, &result.records)?);
/// ```
pub struct KAnonymizer<'a> {
    hierarchies: &'a Hierarchies,
    config: AnonymizerConfig,
}

impl<'a> KAnonymizer<'a> {
    /// Creates an engine with default configuration.
    pub fn new(hierarchies: &'a Hierarchies) -> Self {
        Self::with_config(hierarchies, AnonymizerConfig::default())
    }

    /// Creates an engine with custom configuration.
    pub fn with_config(hierarchies: &'a Hierarchies, config: AnonymizerConfig) -> Self {
        Self { hierarchies, config }
    }

    /// Returns a reference to the engine configuration.
    pub fn config(&self) -> &AnonymizerConfig {
        &self.config
    }

    /// Returns the hierarchies the engine generalizes against.
    pub fn hierarchies(&self) -> &'a Hierarchies {
        self.hierarchies
    }

    /// Builds the strategy named by the configuration.
    pub fn strategy(&self) -> Box<dyn Anonymizer> {
        match self.config.strategy {
            AnonymizationStrategy::Random => Box::new(match self.config.seed {
                Some(seed) => RandomAnonymizer::with_seed(seed),
                None => RandomAnonymizer::new(),
            }),
            AnonymizationStrategy::Clustering => Box::new(ClusteringAnonymizer::new()),
            AnonymizationStrategy::TopDown => {
                Box::new(TopDownAnonymizer::with_parallel(self.config.parallel))
            }
        }
    }

    /// Anonymizes `records` for the configured `k`.
    ///
    /// # Errors
    ///
    /// Fails on `k == 0`, an empty dataset, a missing quasi-identifier or a
    /// value absent from its hierarchy.
    pub fn anonymize(&self, records: &[Record]) -> AnonymizeResult<AnonymizationResult> {
        let start = Instant::now();
        let k = self.config.k;
        let strategy = self.config.strategy;

        tracing::debug!(%strategy, k, records = records.len(), "anonymizing dataset");
        let anonymized = self.strategy().anonymize(self.hierarchies, records, k)?;
        let equivalence_classes = count_equivalence_classes(self.hierarchies, &anonymized)?;

        let stats = AnonymizationStats::new(strategy, equivalence_classes, start.elapsed());
        tracing::info!(
            %strategy,
            k,
            records = anonymized.len(),
            equivalence_classes,
            duration_ms = stats.duration.as_millis() as u64,
            "anonymization complete"
        );
        Ok(AnonymizationResult::new(anonymized, stats))
    }

    /// Measures an anonymized dataset against its raw counterpart.
    pub fn evaluate(&self, raw: &[Record], anonymized: &[Record]) -> AnonymizeResult<CostReport> {
        CostReport::evaluate(self.hierarchies, raw, anonymized, self.config.k)
    }
}
