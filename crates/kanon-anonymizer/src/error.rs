//! Error types for anonymization and cost evaluation.

use kanon_hierarchy::HierarchyError;
use thiserror::Error;

/// Errors that can occur while anonymizing a dataset or scoring it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnonymizeError {
    /// Hierarchy lookup failed, typically a record value missing from its hierarchy.
    #[error("hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    /// Raw and anonymized datasets cannot be compared record by record.
    #[error(
        "dataset shape mismatch: raw has {raw_records} records with {raw_attributes} attributes, \
         anonymized has {anonymized_records} records with {anonymized_attributes} attributes"
    )]
    DatasetShapeMismatch {
        /// Number of raw records.
        raw_records: usize,
        /// Number of anonymized records.
        anonymized_records: usize,
        /// Attribute count of the first mismatching raw record.
        raw_attributes: usize,
        /// Attribute count of the first mismatching anonymized record.
        anonymized_attributes: usize,
    },

    /// The dataset holds no records.
    #[error("dataset is empty; anonymization requires at least one record")]
    EmptyDataset,

    /// A record lacks a quasi-identifying attribute.
    #[error("record {record} has no value for attribute '{attribute}'")]
    MissingAttribute {
        /// Attribute that was expected.
        attribute: String,
        /// Position of the record in its dataset.
        record: usize,
    },

    /// `k` must be at least 1.
    #[error("invalid group size k = {0}; k must be at least 1")]
    InvalidGroupSize(usize),

    /// No hierarchies were supplied, so there is nothing to generalize.
    #[error("no generalization hierarchies supplied")]
    NoHierarchies,
}

/// Result type for anonymizer operations.
pub type AnonymizeResult<T> = std::result::Result<T, AnonymizeError>;
