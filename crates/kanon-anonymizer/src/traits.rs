//! The [`Anonymizer`] trait implemented by every strategy.
//!
//! A strategy receives the quasi-identifier hierarchies, the raw dataset and
//! the minimum group size `k`, and returns a dataset of the same length in
//! the same order where every record has been generalized.
//!
//! # Example: a custom strategy
//!
//! ```rust
//! use kanon_anonymizer::{
//!     generalize_cluster, AnonymizationStrategy, AnonymizeResult, Anonymizer, Hierarchies, Record,
//! };
//!
//! /// Puts every record in one equivalence class.
//! struct SingleClass;
//!
//! impl Anonymizer for SingleClass {
//!     fn strategy(&self) -> AnonymizationStrategy {
//!         AnonymizationStrategy::Random
//!     }
//!
//!     fn anonymize(
//!         &self,
//!         hierarchies: &Hierarchies,
//!         records: &[Record],
//!         _k: usize,
//!     ) -> AnonymizeResult<Vec<Record>> {
//!         let mut out = records.to_vec();
//!         generalize_cluster(hierarchies, &mut out)?;
//!         Ok(out)
//!     }
//! }
//! ```

use crate::config::AnonymizationStrategy;
use crate::error::AnonymizeResult;
use crate::record::{Hierarchies, Record};

/// A k-anonymization algorithm.
pub trait Anonymizer {
    /// The strategy this implementation provides.
    fn strategy(&self) -> AnonymizationStrategy;

    /// Generalizes `records` so that every equivalence class holds at least
    /// `k` records where the dataset allows it.
    ///
    /// The output has the same length and order as `records`.
    fn anonymize(
        &self,
        hierarchies: &Hierarchies,
        records: &[Record],
        k: usize,
    ) -> AnonymizeResult<Vec<Record>>;
}
