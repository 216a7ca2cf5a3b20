//! # kanon-anonymizer
//!
//! k-anonymity by value generalization over per-attribute hierarchies.
//!
//! A dataset is k-anonymous when every combination of quasi-identifying
//! values it publishes is shared by at least `k` records. This crate rewrites
//! quasi-identifiers to coarser ancestors in their [`HierarchyIndex`] until
//! that holds, and measures how much detail was lost doing so.
//!
//! ## Quick Start
//!
//! ```ignore
//! use kanon_anonymizer::{AnonymizerConfig, Hierarchies, KAnonymizer};
//! use kanon_hierarchy::HierarchyIndex;
//!
//! let mut hierarchies = Hierarchies::new();
//! hierarchies.insert("age".into(), HierarchyIndex::from_definition("age", &age_txt)?);
//!
//! let config = AnonymizerConfig::builder().with_k(5).build();
//! let anonymizer = KAnonymizer::with_config(&hierarchies, config);
//!
//! let result = anonymizer.anonymize(&records)?;
//! print!("{}", anonymizer.evaluate(&records, &result.records)?);
//! ```
//!
//! ## Strategies
//!
//! | Strategy | Type | Grouping |
//! |----------|------|----------|
//! | `random` | [`RandomAnonymizer`] | shuffled consecutive groups of `k` |
//! | `clustering` | [`ClusteringAnonymizer`] | greedy nearest neighbours by generalization distance |
//! | `topdown` | [`TopDownAnonymizer`] | specialization from the hierarchy roots down |
//!
//! Random and clustering pick groups first and then [`generalize_cluster`]
//! each one. Top-down starts from the fully generalized dataset and refines
//! while every group keeps `k` records.
//!
//! ## Cost Metrics
//!
//! - **MD** ([`distortion_cost`]): hierarchy levels climbed, summed over all
//!   published quasi-identifiers
//! - **LM** ([`information_loss_cost`]): fraction of leaves each published
//!   value covers beyond one, weighted by `1 / number_of_hierarchies`
//!
//! ## Feature Flags
//!
//! - `parallel` - Evaluates top-down splits of one round using rayon
//! - `serde` - Serialize/Deserialize for configuration and reports

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod clustering;
mod config;
mod cost;
mod engine;
mod error;
mod generalizer;
mod random;
mod record;
mod result;
mod specialization;
mod traits;

// Public re-exports
pub use clustering::ClusteringAnonymizer;
pub use config::{AnonymizationStrategy, AnonymizerConfig, AnonymizerConfigBuilder};
pub use cost::{distortion_cost, information_loss_cost, records_information_loss, CostReport};
pub use engine::KAnonymizer;
pub use error::{AnonymizeError, AnonymizeResult};
pub use generalizer::generalize_cluster;
pub use random::RandomAnonymizer;
pub use record::{count_equivalence_classes, is_k_anonymous, validate_dataset, Hierarchies, Record};
pub use result::{AnonymizationResult, AnonymizationStats};
pub use specialization::{SearchContext, SpecializationNode, SpecializationTree, TopDownAnonymizer};
pub use traits::Anonymizer;

// Re-export the hierarchy types callers need to build `Hierarchies`
pub use kanon_hierarchy::{HierarchyError, HierarchyIndex};
