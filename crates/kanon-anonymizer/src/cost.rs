//! Dataset-level distortion metrics.
//!
//! Both metrics compare a raw dataset against its anonymized counterpart
//! record by record, over the attributes that have a hierarchy.

use std::fmt;

use crate::error::{AnonymizeError, AnonymizeResult};
use crate::record::{attribute_value, Hierarchies, Record};

/// Distortion metric (MD): the sum of level distances between raw and
/// anonymized values over all records and quasi-identifiers.
///
/// # Errors
///
/// - [`AnonymizeError::EmptyDataset`] if the raw dataset is empty
/// - [`AnonymizeError::DatasetShapeMismatch`] if the datasets differ in record
///   count or in any record's attribute count
pub fn distortion_cost(
    hierarchies: &Hierarchies,
    raw: &[Record],
    anonymized: &[Record],
) -> AnonymizeResult<usize> {
    check_shape(raw, anonymized)?;

    let mut total = 0;
    for (attribute, index) in hierarchies {
        for (position, (raw_record, anon_record)) in raw.iter().zip(anonymized).enumerate() {
            let raw_value = attribute_value(raw_record, attribute, position)?;
            let anon_value = attribute_value(anon_record, attribute, position)?;
            total += index.level_distance(raw_value, anon_value)?;
        }
    }
    Ok(total)
}

/// Loss metric (LM): for each record and quasi-identifier,
/// `(descendant_leaf_count(anonymized) - 1) / total_num_leaves`, weighted by
/// `1 / number_of_hierarchies` and summed.
///
/// Zero when every published value is a leaf.
///
/// # Errors
///
/// Same as [`distortion_cost`].
pub fn information_loss_cost(
    hierarchies: &Hierarchies,
    raw: &[Record],
    anonymized: &[Record],
) -> AnonymizeResult<f64> {
    check_shape(raw, anonymized)?;
    records_information_loss(hierarchies, anonymized.iter().enumerate())
}

/// LM summed over an arbitrary subset of already-generalized records.
///
/// Items are `(position, record)` so errors can name the offending record.
pub fn records_information_loss<'r, I>(hierarchies: &Hierarchies, records: I) -> AnonymizeResult<f64>
where
    I: IntoIterator<Item = (usize, &'r Record)>,
{
    if hierarchies.is_empty() {
        return Ok(0.0);
    }
    let weight = 1.0 / hierarchies.len() as f64;

    let mut total = 0.0;
    for (position, record) in records {
        for (attribute, index) in hierarchies {
            let value = attribute_value(record, attribute, position)?;
            total += weight * index.information_loss(value)?;
        }
    }
    Ok(total)
}

/// Record count and per-record attribute counts must match.
fn check_shape(raw: &[Record], anonymized: &[Record]) -> AnonymizeResult<()> {
    if raw.is_empty() {
        return Err(AnonymizeError::EmptyDataset);
    }

    let mismatch = |raw_attributes: usize, anonymized_attributes: usize| {
        AnonymizeError::DatasetShapeMismatch {
            raw_records: raw.len(),
            anonymized_records: anonymized.len(),
            raw_attributes,
            anonymized_attributes,
        }
    };

    if raw.len() != anonymized.len() {
        return Err(mismatch(
            raw[0].len(),
            anonymized.first().map_or(0, Record::len),
        ));
    }
    for (raw_record, anon_record) in raw.iter().zip(anonymized) {
        if raw_record.len() != anon_record.len() {
            return Err(mismatch(raw_record.len(), anon_record.len()));
        }
    }
    Ok(())
}

/// Both cost metrics for one anonymization.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostReport {
    /// Group size the dataset was anonymized for.
    pub k: usize,
    /// Distortion metric (MD).
    pub distortion: usize,
    /// Loss metric (LM).
    pub information_loss: f64,
}

impl CostReport {
    /// Evaluates both metrics.
    pub fn evaluate(
        hierarchies: &Hierarchies,
        raw: &[Record],
        anonymized: &[Record],
        k: usize,
    ) -> AnonymizeResult<Self> {
        Ok(Self {
            k,
            distortion: distortion_cost(hierarchies, raw, anonymized)?,
            information_loss: information_loss_cost(hierarchies, raw, anonymized)?,
        })
    }
}

impl fmt::Display for CostReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Results of {}-anonymity:", self.k)?;
        writeln!(f, "\tCost_MD: {}", self.distortion)?;
        writeln!(f, "\tCost_LM: {}", self.information_loss)?;
        Ok(())
    }
}
