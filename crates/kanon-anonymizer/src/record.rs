//! Record and hierarchy-set types shared by every strategy.

use std::collections::{BTreeMap, HashMap};

use kanon_hierarchy::HierarchyIndex;

use crate::error::{AnonymizeError, AnonymizeResult};

/// One dataset row: attribute name to current value.
pub type Record = HashMap<String, String>;

/// Hierarchy indexes keyed by attribute name.
///
/// The attributes with a hierarchy are the quasi-identifiers. The map is
/// ordered so every strategy visits attributes in the same lexicographic
/// order, which also fixes the tie-break order of the top-down search.
pub type Hierarchies = BTreeMap<String, HierarchyIndex>;

/// Returns the value of `attribute` in the record at position `position`.
pub(crate) fn attribute_value<'r>(
    record: &'r Record,
    attribute: &str,
    position: usize,
) -> AnonymizeResult<&'r str> {
    record
        .get(attribute)
        .map(String::as_str)
        .ok_or_else(|| AnonymizeError::MissingAttribute {
            attribute: attribute.to_string(),
            record: position,
        })
}

/// Checks that a dataset can be anonymized against `hierarchies`.
///
/// Every quasi-identifying value must be present and known to its hierarchy.
pub fn validate_dataset(hierarchies: &Hierarchies, records: &[Record]) -> AnonymizeResult<()> {
    if hierarchies.is_empty() {
        return Err(AnonymizeError::NoHierarchies);
    }
    if records.is_empty() {
        return Err(AnonymizeError::EmptyDataset);
    }

    for (position, record) in records.iter().enumerate() {
        for (attribute, index) in hierarchies {
            let value = attribute_value(record, attribute, position)?;
            index.node_id(value)?;
        }
    }
    Ok(())
}

/// Common precondition of every strategy.
pub(crate) fn check_inputs(
    hierarchies: &Hierarchies,
    records: &[Record],
    k: usize,
) -> AnonymizeResult<()> {
    if k == 0 {
        return Err(AnonymizeError::InvalidGroupSize(k));
    }
    validate_dataset(hierarchies, records)?;
    if k > records.len() {
        tracing::warn!(
            k,
            records = records.len(),
            "group size exceeds dataset size; publishing a single equivalence class"
        );
    }
    Ok(())
}

/// Counts distinct quasi-identifier combinations in a dataset.
pub fn count_equivalence_classes(
    hierarchies: &Hierarchies,
    records: &[Record],
) -> AnonymizeResult<usize> {
    Ok(equivalence_class_sizes(hierarchies, records)?.len())
}

/// Returns true if every equivalence class holds at least `k` records.
pub fn is_k_anonymous(
    hierarchies: &Hierarchies,
    records: &[Record],
    k: usize,
) -> AnonymizeResult<bool> {
    Ok(equivalence_class_sizes(hierarchies, records)?
        .values()
        .all(|&size| size >= k))
}

fn equivalence_class_sizes<'r>(
    hierarchies: &Hierarchies,
    records: &'r [Record],
) -> AnonymizeResult<HashMap<Vec<&'r str>, usize>> {
    let mut sizes: HashMap<Vec<&str>, usize> = HashMap::new();
    for (position, record) in records.iter().enumerate() {
        let key = hierarchies
            .keys()
            .map(|attribute| attribute_value(record, attribute, position))
            .collect::<AnonymizeResult<Vec<&str>>>()?;
        *sizes.entry(key).or_default() += 1;
    }
    Ok(sizes)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// ```text
    /// root
    ///  |-- A
    ///  |    |-- A1
    ///  |    |-- A2
    ///  |-- B
    /// ```
    pub(crate) const LETTERS: &str = "root\n\tA\n\t\tA1\n\t\tA2\n\tB\n";

    /// ```text
    /// Any
    ///  |-- Young
    ///  |    |-- 20s
    ///  |    |-- 30s
    ///  |-- Old
    ///       |-- 50s
    ///       |-- 60s
    /// ```
    pub(crate) const AGE: &str = "Any\n\tYoung\n\t\t20s\n\t\t30s\n\tOld\n\t\t50s\n\t\t60s\n";

    pub(crate) fn hierarchies(definitions: &[(&str, &str)]) -> Hierarchies {
        definitions
            .iter()
            .map(|(attribute, definition)| {
                (
                    attribute.to_string(),
                    HierarchyIndex::from_definition(attribute, definition).unwrap(),
                )
            })
            .collect()
    }

    pub(crate) fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_validate_dataset_ok() {
        let hierarchies = hierarchies(&[("letter", LETTERS)]);
        let records = vec![
            record(&[("letter", "A1"), ("note", "x")]),
            record(&[("letter", "B"), ("note", "y")]),
        ];
        assert!(validate_dataset(&hierarchies, &records).is_ok());
    }

    #[test]
    fn test_validate_dataset_empty() {
        let hierarchies = hierarchies(&[("letter", LETTERS)]);
        assert_eq!(
            validate_dataset(&hierarchies, &[]),
            Err(AnonymizeError::EmptyDataset)
        );
        assert_eq!(
            validate_dataset(&Hierarchies::new(), &[record(&[("letter", "A1")])]),
            Err(AnonymizeError::NoHierarchies)
        );
    }

    #[test]
    fn test_validate_dataset_missing_attribute() {
        let hierarchies = hierarchies(&[("letter", LETTERS)]);
        let records = vec![record(&[("letter", "A1")]), record(&[("other", "B")])];
        assert_eq!(
            validate_dataset(&hierarchies, &records),
            Err(AnonymizeError::MissingAttribute {
                attribute: "letter".to_string(),
                record: 1,
            })
        );
    }

    #[test]
    fn test_validate_dataset_unknown_value() {
        let hierarchies = hierarchies(&[("letter", LETTERS)]);
        let records = vec![record(&[("letter", "Z")])];
        assert!(matches!(
            validate_dataset(&hierarchies, &records),
            Err(AnonymizeError::Hierarchy(_))
        ));
    }

    #[test]
    fn test_equivalence_class_checks() {
        let hierarchies = hierarchies(&[("letter", LETTERS), ("age", AGE)]);
        let records = vec![
            record(&[("letter", "A"), ("age", "Young")]),
            record(&[("letter", "A"), ("age", "Young")]),
            record(&[("letter", "B"), ("age", "Old")]),
        ];

        assert_eq!(count_equivalence_classes(&hierarchies, &records).unwrap(), 2);
        assert!(is_k_anonymous(&hierarchies, &records, 1).unwrap());
        assert!(!is_k_anonymous(&hierarchies, &records, 2).unwrap());
    }
}
