//! Equivalence-class generalization of record clusters.

use crate::error::AnonymizeResult;
use crate::record::{attribute_value, Hierarchies, Record};

/// Rewrites every quasi-identifier of every record in `cluster` to the
/// lowest common ancestor of the cluster's values for that attribute.
///
/// After the call all records in the cluster agree on every attribute that
/// has a hierarchy; other attributes are untouched. Applying it again to the
/// same cluster changes nothing.
///
/// All lookups happen before any record is modified, so on error the cluster
/// is left unchanged.
///
/// # Example
///
/// ```rust
/// use kanon_anonymizer::{generalize_cluster, Hierarchies, Record};
/// use kanon_hierarchy::HierarchyIndex;
///
/// let mut hierarchies = Hierarchies::new();
/// hierarchies.insert(
///     "letter".to_string(),
///     HierarchyIndex::from_definition("letter", "root\n\tA\n\t\tA1\n\t\tA2\n\tB\n").unwrap(),
/// );
///
/// let mut cluster: Vec<Record> = ["A1", "A2"]
///     .iter()
///     .map(|v| [("letter".to_string(), v.to_string())].into_iter().collect())
///     .collect();
///
/// generalize_cluster(&hierarchies, &mut cluster).unwrap();
/// assert!(cluster.iter().all(|r| r["letter"] == "A"));
/// ```
pub fn generalize_cluster(hierarchies: &Hierarchies, cluster: &mut [Record]) -> AnonymizeResult<()> {
    if cluster.is_empty() {
        return Ok(());
    }

    let mut generalized: Vec<(&str, String)> = Vec::with_capacity(hierarchies.len());
    for (attribute, index) in hierarchies {
        let values = cluster
            .iter()
            .enumerate()
            .map(|(position, record)| attribute_value(record, attribute, position))
            .collect::<AnonymizeResult<Vec<&str>>>()?;
        let lca = index.lowest_common_ancestor(values)?;
        generalized.push((attribute.as_str(), lca.to_string()));
    }

    for record in cluster.iter_mut() {
        for (attribute, value) in &generalized {
            if let Some(slot) = record.get_mut(*attribute) {
                slot.clone_from(value);
            }
        }
    }

    Ok(())
}

/// Generalizes each cluster of record positions and scatters the results
/// back into original order.
///
/// `clusters` must partition `0..records.len()`.
pub(crate) fn generalize_partition(
    hierarchies: &Hierarchies,
    records: &[Record],
    clusters: &[Vec<usize>],
) -> AnonymizeResult<Vec<Record>> {
    let mut anonymized = records.to_vec();
    for positions in clusters {
        let mut cluster: Vec<Record> = positions.iter().map(|&p| records[p].clone()).collect();
        generalize_cluster(hierarchies, &mut cluster)?;
        for (&position, record) in positions.iter().zip(cluster) {
            anonymized[position] = record;
        }
    }
    Ok(anonymized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnonymizeError;
    use crate::record::test_support::*;

    #[test]
    fn test_generalize_to_lca() {
        let hierarchies = hierarchies(&[("letter", LETTERS), ("age", AGE)]);
        let mut cluster = vec![
            record(&[("letter", "A1"), ("age", "20s"), ("disease", "flu")]),
            record(&[("letter", "A2"), ("age", "50s"), ("disease", "cold")]),
        ];

        generalize_cluster(&hierarchies, &mut cluster).unwrap();

        for r in &cluster {
            assert_eq!(r["letter"], "A");
            assert_eq!(r["age"], "Any");
        }
        // Non quasi-identifying attributes are left alone
        assert_eq!(cluster[0]["disease"], "flu");
        assert_eq!(cluster[1]["disease"], "cold");
    }

    #[test]
    fn test_generalize_is_idempotent() {
        let hierarchies = hierarchies(&[("letter", LETTERS), ("age", AGE)]);
        let mut cluster = vec![
            record(&[("letter", "A1"), ("age", "20s")]),
            record(&[("letter", "B"), ("age", "30s")]),
            record(&[("letter", "A2"), ("age", "20s")]),
        ];

        generalize_cluster(&hierarchies, &mut cluster).unwrap();
        let once = cluster.clone();
        generalize_cluster(&hierarchies, &mut cluster).unwrap();

        assert_eq!(cluster, once);
        assert_eq!(cluster[0]["letter"], "root");
        assert_eq!(cluster[0]["age"], "Young");
    }

    #[test]
    fn test_singleton_cluster_unchanged() {
        let hierarchies = hierarchies(&[("letter", LETTERS)]);
        let mut cluster = vec![record(&[("letter", "A2")])];
        generalize_cluster(&hierarchies, &mut cluster).unwrap();
        assert_eq!(cluster[0]["letter"], "A2");
    }

    #[test]
    fn test_unknown_value_leaves_cluster_untouched() {
        let hierarchies = hierarchies(&[("letter", LETTERS), ("age", AGE)]);
        let mut cluster = vec![
            record(&[("letter", "A1"), ("age", "20s")]),
            record(&[("letter", "A2"), ("age", "99s")]),
        ];
        let before = cluster.clone();

        let err = generalize_cluster(&hierarchies, &mut cluster).unwrap_err();
        assert!(matches!(err, AnonymizeError::Hierarchy(_)));
        assert_eq!(cluster, before);
    }
}
