//! Anonymization result types.

use std::time::Duration;

use crate::config::AnonymizationStrategy;
use crate::record::Record;

/// Result of one anonymization run.
///
/// # Example
///
/// ```ignore
/// let result = anonymizer.anonymize(&records)?;
///
/// println!("{} equivalence classes", result.stats.equivalence_classes);
/// for record in result.iter() {
///     println!("{:?}", record);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AnonymizationResult {
    /// Generalized records, in the order of the input.
    pub records: Vec<Record>,
    /// Run statistics.
    pub stats: AnonymizationStats,
}

impl AnonymizationResult {
    /// Creates a result from generalized records and run statistics.
    pub fn new(records: Vec<Record>, stats: AnonymizationStats) -> Self {
        Self { records, stats }
    }

    /// Number of published records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records were published.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the generalized records.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Consumes the result, keeping only the records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl IntoIterator for AnonymizationResult {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a AnonymizationResult {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Statistics from one anonymization run.
#[derive(Debug, Clone, Default)]
pub struct AnonymizationStats {
    /// Strategy that produced the records.
    pub strategy: AnonymizationStrategy,
    /// Distinct quasi-identifier combinations in the output.
    pub equivalence_classes: usize,
    /// Wall-clock time of the run.
    pub duration: Duration,
}

impl AnonymizationStats {
    /// Creates new run statistics.
    pub fn new(strategy: AnonymizationStrategy, equivalence_classes: usize, duration: Duration) -> Self {
        Self {
            strategy,
            equivalence_classes,
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_support::record;

    #[test]
    fn test_result_accessors() {
        let records = vec![record(&[("letter", "A")]), record(&[("letter", "A")])];
        let stats = AnonymizationStats::new(AnonymizationStrategy::Random, 1, Duration::from_millis(5));
        let result = AnonymizationResult::new(records, stats);

        assert_eq!(result.len(), 2);
        assert!(!result.is_empty());
        assert_eq!(result.iter().filter(|r| r["letter"] == "A").count(), 2);
        assert_eq!(result.stats.strategy, AnonymizationStrategy::Random);
        assert_eq!(result.stats.equivalence_classes, 1);
    }

    #[test]
    fn test_result_into_iter() {
        let records = vec![record(&[("letter", "B")])];
        let result = AnonymizationResult::new(records, AnonymizationStats::default());

        let collected: Vec<Record> = result.into_iter().collect();
        assert_eq!(collected[0]["letter"], "B");
    }

    #[test]
    fn test_stats_default() {
        let stats = AnonymizationStats::default();
        assert_eq!(stats.strategy, AnonymizationStrategy::TopDown);
        assert_eq!(stats.equivalence_classes, 0);
        assert_eq!(stats.duration, Duration::ZERO);
    }
}
