//! Command-line arguments and the anonymization run.

use std::path::PathBuf;

use clap::Parser;
use kanon_anonymizer::{AnonymizationStrategy, AnonymizerConfig, CostReport, KAnonymizer};

use crate::error::CliResult;
use crate::io::{load_hierarchies, read_dataset, write_dataset};

/// k-anonymize a CSV dataset by generalizing quasi-identifiers.
///
/// Every `*.txt` file in the hierarchy directory defines the generalization
/// hierarchy of the column named by its file stem. Columns without a
/// hierarchy are copied through unchanged.
#[derive(Debug, Parser)]
#[command(name = "kanon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Algorithm: random, clustering or topdown
    pub strategy: AnonymizationStrategy,

    /// Directory of hierarchy files
    pub hierarchy_dir: PathBuf,

    /// Raw dataset (CSV with header)
    pub raw: PathBuf,

    /// Output path for the anonymized dataset
    pub anonymized: PathBuf,

    /// Minimum equivalence-class size
    pub k: usize,

    /// Seed for the random strategy
    #[arg(long)]
    pub seed: Option<u64>,

    /// Evaluate top-down splits on all cores (needs the `parallel` feature)
    #[arg(long)]
    pub parallel: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the anonymizer configuration from the arguments.
    pub fn config(&self) -> AnonymizerConfig {
        let mut builder = AnonymizerConfig::builder()
            .with_k(self.k)
            .with_strategy(self.strategy)
            .with_parallel(self.parallel);
        if let Some(seed) = self.seed {
            builder = builder.with_seed(seed);
        }
        builder.build()
    }

    /// Anonymizes the raw dataset, writes the result and returns its costs.
    pub fn run(&self) -> CliResult<CostReport> {
        let hierarchies = load_hierarchies(&self.hierarchy_dir)?;
        let dataset = read_dataset(&self.raw)?;

        let anonymizer = KAnonymizer::with_config(&hierarchies, self.config());
        let result = anonymizer.anonymize(&dataset.records)?;
        write_dataset(&self.anonymized, &dataset.headers, &result.records)?;

        Ok(anonymizer.evaluate(&dataset.records, &result.records)?)
    }
}
