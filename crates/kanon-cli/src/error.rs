//! CLI error types.

use std::path::PathBuf;
use std::process::ExitCode;

use kanon_anonymizer::AnonymizeError;
use kanon_hierarchy::HierarchyError;
use thiserror::Error;

/// Errors surfaced by the `kanon` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading a file or directory failed.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing CSV failed.
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        /// Dataset file involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },

    /// A hierarchy file is malformed.
    #[error("invalid hierarchy {}: {source}", .path.display())]
    Hierarchy {
        /// Hierarchy file involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: HierarchyError,
    },

    /// The hierarchy directory holds no `*.txt` files.
    #[error("no hierarchy files (*.txt) found in {}", .0.display())]
    NoHierarchies(PathBuf),

    /// The anonymizer rejected the dataset or parameters.
    #[error(transparent)]
    Anonymize(#[from] AnonymizeError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Anonymize(AnonymizeError::InvalidGroupSize(_)) => ExitCode::from(2),
            CliError::Hierarchy { .. } | CliError::NoHierarchies(_) | CliError::Anonymize(_) => {
                ExitCode::from(4)
            }
            CliError::Io { .. } | CliError::Csv { .. } => ExitCode::from(5),
        }
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = std::result::Result<T, CliError>;
