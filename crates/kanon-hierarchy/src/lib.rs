//! # kanon-hierarchy
//!
//! Domain generalization hierarchies (DGHs) for k-anonymity.
//!
//! This crate provides:
//! - **Definition parser**: build a [`HierarchyTree`] from a tab-indented text definition
//! - **Hierarchy index**: O(1) level, descendant-leaf count and ancestor-or-self
//!   lookups, plus memoized lowest-common-ancestor (LCA) queries
//!
//! ## Usage
//!
//! ```rust
//! use kanon_hierarchy::HierarchyIndex;
//!
//! let definition = "Any\n\tEurope\n\t\tFrance\n\t\tSpain\n\tAsia\n\t\tJapan\n";
//! let index = HierarchyIndex::from_definition("country", definition).unwrap();
//!
//! assert_eq!(index.level("France").unwrap(), 2);
//! assert_eq!(index.descendant_leaf_count("Europe").unwrap(), 2);
//! assert_eq!(index.lowest_common_ancestor(["France", "Spain", "France"]).unwrap(), "Europe");
//! ```
//!
//! ## Definition Format
//!
//! | Element | Meaning |
//! |---------|---------|
//! | Line | One value |
//! | Leading tabs | Level of the value (0 = root, most general) |
//! | Blank line | Ignored |
//!
//! A line at level `d` is attached to the most recent line at level `d - 1`.
//! Values must be unique within one hierarchy.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cache;
mod config;
mod error;
mod index;
mod parser;
mod tree;

pub use cache::{CacheStats, LcaCache};
pub use config::CacheConfig;
pub use error::{HierarchyError, HierarchyResult};
pub use index::HierarchyIndex;
pub use parser::parse_hierarchy;
pub use tree::{HierarchyNode, HierarchyTree, NodeId};
