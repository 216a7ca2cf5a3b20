//! Configuration types for the anonymizer.

use std::fmt;
use std::str::FromStr;

/// Which anonymization algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AnonymizationStrategy {
    /// Shuffle and cut into groups of `k`.
    Random,
    /// Greedy nearest-neighbour clustering.
    Clustering,
    /// Top-down specialization search.
    #[default]
    TopDown,
}

impl AnonymizationStrategy {
    /// All strategies, in a stable order.
    pub const ALL: [AnonymizationStrategy; 3] = [Self::Random, Self::Clustering, Self::TopDown];

    /// Name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Clustering => "clustering",
            Self::TopDown => "topdown",
        }
    }
}

impl fmt::Display for AnonymizationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnonymizationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown strategy '{s}', expected one of random, clustering, topdown"))
    }
}

/// Configuration for [`KAnonymizer`](crate::KAnonymizer).
///
/// # Example
///
/// ```rust
/// use kanon_anonymizer::{AnonymizerConfig, AnonymizationStrategy};
///
/// let config = AnonymizerConfig::builder()
///     .with_k(5)
///     .with_strategy(AnonymizationStrategy::Random)
///     .with_seed(42)
///     .build();
///
/// assert_eq!(config.k, 5);
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnonymizerConfig {
    /// Minimum equivalence-class size.
    pub k: usize,
    /// Algorithm to run.
    pub strategy: AnonymizationStrategy,
    /// Seed for the random strategy (None = seeded from entropy).
    pub seed: Option<u64>,
    /// Evaluate top-down splits in parallel (requires `parallel` feature).
    pub parallel: bool,
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            k: 2,
            strategy: AnonymizationStrategy::default(),
            seed: None,
            parallel: false,
        }
    }
}

impl AnonymizerConfig {
    /// Creates a new builder for AnonymizerConfig.
    pub fn builder() -> AnonymizerConfigBuilder {
        AnonymizerConfigBuilder::default()
    }
}

/// Builder for AnonymizerConfig.
#[derive(Debug, Clone, Default)]
pub struct AnonymizerConfigBuilder {
    config: AnonymizerConfig,
}

impl AnonymizerConfigBuilder {
    /// Sets the minimum group size.
    pub fn with_k(mut self, k: usize) -> Self {
        self.config.k = k;
        self
    }

    /// Selects the algorithm.
    pub fn with_strategy(mut self, strategy: AnonymizationStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Enables or disables parallel split evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Builds the AnonymizerConfig.
    pub fn build(self) -> AnonymizerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = AnonymizerConfig::default();
        assert_eq!(config.k, 2);
        assert_eq!(config.strategy, AnonymizationStrategy::TopDown);
        assert!(config.seed.is_none());
        assert!(!config.parallel);
    }

    #[test]
    fn test_builder_chaining() {
        let config = AnonymizerConfig::builder()
            .with_k(10)
            .with_strategy(AnonymizationStrategy::Clustering)
            .with_parallel(true)
            .build();

        assert_eq!(config.k, 10);
        assert_eq!(config.strategy, AnonymizationStrategy::Clustering);
        assert!(config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("random".parse::<AnonymizationStrategy>(), Ok(AnonymizationStrategy::Random));
        assert_eq!("Clustering".parse::<AnonymizationStrategy>(), Ok(AnonymizationStrategy::Clustering));
        assert_eq!(" topdown ".parse::<AnonymizationStrategy>(), Ok(AnonymizationStrategy::TopDown));
        assert!("bottomup".parse::<AnonymizationStrategy>().is_err());
    }

    #[test]
    fn test_strategy_display_round_trips() {
        for strategy in AnonymizationStrategy::ALL {
            assert_eq!(strategy.to_string().parse::<AnonymizationStrategy>(), Ok(strategy));
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_strategy_serde_names() {
        let json = serde_json::to_string(&AnonymizationStrategy::TopDown).unwrap();
        assert_eq!(json, r#""topdown""#);
    }
}
