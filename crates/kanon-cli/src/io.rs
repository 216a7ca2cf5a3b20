//! Dataset and hierarchy file I/O.

use std::fs;
use std::path::{Path, PathBuf};

use kanon_anonymizer::{Hierarchies, Record};
use kanon_hierarchy::HierarchyIndex;

use crate::error::{CliError, CliResult};

/// A CSV dataset with its header order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Column names in file order.
    pub headers: Vec<String>,
    /// One record per data row.
    pub records: Vec<Record>,
}

/// Reads a headed CSV file.
pub fn read_dataset(path: &Path) -> CliResult<Dataset> {
    let csv_error = |source| CliError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        let record: Record = headers
            .iter()
            .cloned()
            .zip(row.iter().map(str::to_string))
            .collect();
        records.push(record);
    }

    tracing::debug!(path = %path.display(), rows = records.len(), columns = headers.len(), "dataset read");
    Ok(Dataset { headers, records })
}

/// Writes records as CSV with columns in `headers` order.
pub fn write_dataset(path: &Path, headers: &[String], records: &[Record]) -> CliResult<()> {
    let csv_error = |source| CliError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer.write_record(headers).map_err(csv_error)?;
    for record in records {
        let row = headers
            .iter()
            .map(|header| record.get(header).map_or("", String::as_str));
        writer.write_record(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), rows = records.len(), "dataset written");
    Ok(())
}

/// Loads every `*.txt` file in `dir` as a hierarchy named by its file stem.
pub fn load_hierarchies(dir: &Path) -> CliResult<Hierarchies> {
    let io_error = |source| CliError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()
        .map_err(io_error)?;
    paths.retain(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "txt"));
    paths.sort();

    let mut hierarchies = Hierarchies::new();
    for path in paths {
        let Some(attribute) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let definition = fs::read_to_string(&path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        let index = HierarchyIndex::from_definition(attribute, &definition).map_err(|source| {
            CliError::Hierarchy {
                path: path.clone(),
                source,
            }
        })?;

        tracing::debug!(
            attribute,
            values = index.tree().len(),
            leaves = index.total_num_leaves(),
            "hierarchy loaded"
        );
        hierarchies.insert(attribute.to_string(), index);
    }

    if hierarchies.is_empty() {
        return Err(CliError::NoHierarchies(dir.to_path_buf()));
    }
    Ok(hierarchies)
}
