//! Error types for hierarchy parsing and lookups.

use thiserror::Error;

/// Errors that can occur while building or querying a generalization hierarchy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// A definition line could not be parsed.
    #[error("parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number in the definition.
        line: usize,
        /// Description of the error.
        message: String,
    },

    /// The definition contained no values.
    #[error("empty hierarchy definition")]
    EmptyDefinition,

    /// A second top-level value was found after the root.
    #[error("second root value on line {line}; a hierarchy has exactly one root")]
    MultipleRoots {
        /// 1-based line number of the extra root.
        line: usize,
    },

    /// A line is indented deeper than its predecessor allows.
    #[error("line {line} at level {level} has no parent at level {}", .level - 1)]
    OrphanNode {
        /// 1-based line number.
        line: usize,
        /// Indentation level of the line.
        level: usize,
    },

    /// The same value appears twice in one attribute's hierarchy.
    #[error("duplicate value '{value}' in hierarchy '{attribute}'")]
    DuplicateValue {
        /// Attribute the hierarchy belongs to.
        attribute: String,
        /// The repeated value.
        value: String,
    },

    /// A value is not present in the attribute's hierarchy.
    #[error("unknown value '{value}' for attribute '{attribute}'")]
    UnknownValue {
        /// Attribute that was queried.
        attribute: String,
        /// The value that was not found.
        value: String,
    },

    /// A node handle does not belong to the tree it was used with.
    #[error("node {index} is not part of hierarchy '{attribute}'")]
    UnknownParent {
        /// Attribute the hierarchy belongs to.
        attribute: String,
        /// Arena position of the foreign handle.
        index: usize,
    },

    /// An LCA query was issued with no values.
    #[error("lowest common ancestor requested for an empty value set on '{attribute}'")]
    EmptyValueSet {
        /// Attribute that was queried.
        attribute: String,
    },
}

/// Result type for hierarchy operations.
pub type HierarchyResult<T> = std::result::Result<T, HierarchyError>;
