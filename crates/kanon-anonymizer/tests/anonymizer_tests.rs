//! End-to-end tests of the three strategies over a small census-like dataset.

use kanon_anonymizer::{
    information_loss_cost, is_k_anonymous, AnonymizationStrategy, AnonymizeError, Anonymizer,
    AnonymizerConfig, Hierarchies, HierarchyError, HierarchyIndex, KAnonymizer, Record,
    SearchContext, SpecializationTree, TopDownAnonymizer,
};

const WORKCLASS: &str = "\
Any
\tGovernment
\t\tFederal-gov
\t\tLocal-gov
\t\tState-gov
\tPrivate
\tSelf-employed
\t\tSelf-emp-inc
\t\tSelf-emp-not-inc
";

const EDUCATION: &str = "\
Any
\tSecondary
\t\tHS-grad
\t\tSome-college
\tHigher
\t\tBachelors
\t\tMasters
\t\tDoctorate
";

fn hierarchies() -> Hierarchies {
    [("workclass", WORKCLASS), ("education", EDUCATION)]
        .into_iter()
        .map(|(attribute, definition)| {
            (
                attribute.to_string(),
                HierarchyIndex::from_definition(attribute, definition).unwrap(),
            )
        })
        .collect()
}

fn dataset() -> Vec<Record> {
    [
        ("Federal-gov", "Bachelors"),
        ("Local-gov", "Masters"),
        ("Private", "HS-grad"),
        ("Private", "HS-grad"),
        ("Self-emp-inc", "Doctorate"),
        ("State-gov", "Bachelors"),
        ("Private", "Some-college"),
        ("Self-emp-not-inc", "Masters"),
        ("Private", "Bachelors"),
        ("Federal-gov", "Masters"),
        ("Private", "HS-grad"),
        ("Self-emp-inc", "Some-college"),
    ]
    .iter()
    .enumerate()
    .map(|(id, &(workclass, education))| {
        [
            ("id".to_string(), id.to_string()),
            ("workclass".to_string(), workclass.to_string()),
            ("education".to_string(), education.to_string()),
        ]
        .into_iter()
        .collect()
    })
    .collect()
}

fn run(strategy: AnonymizationStrategy, k: usize) -> Vec<Record> {
    let hierarchies = hierarchies();
    let config = AnonymizerConfig::builder()
        .with_k(k)
        .with_strategy(strategy)
        .with_seed(2024)
        .build();
    KAnonymizer::with_config(&hierarchies, config)
        .anonymize(&dataset())
        .unwrap()
        .into_records()
}

#[test]
fn test_all_strategies_reach_k() {
    let hierarchies = hierarchies();
    for strategy in AnonymizationStrategy::ALL {
        for k in [2, 3, 4] {
            let anonymized = run(strategy, k);
            assert!(
                is_k_anonymous(&hierarchies, &anonymized, k).unwrap(),
                "{strategy} failed for k={k}"
            );
        }
    }
}

#[test]
fn test_output_preserves_order_and_passthrough_columns() {
    let raw = dataset();
    for strategy in AnonymizationStrategy::ALL {
        let anonymized = run(strategy, 3);
        assert_eq!(anonymized.len(), raw.len());
        for (raw_record, anon_record) in raw.iter().zip(&anonymized) {
            assert_eq!(raw_record["id"], anon_record["id"]);
        }
    }
}

#[test]
fn test_published_values_generalize_raw_values() {
    let hierarchies = hierarchies();
    let raw = dataset();
    for strategy in AnonymizationStrategy::ALL {
        let anonymized = run(strategy, 3);
        for (raw_record, anon_record) in raw.iter().zip(&anonymized) {
            for (attribute, index) in &hierarchies {
                assert!(index
                    .has_ancestor(&anon_record[attribute], &raw_record[attribute])
                    .unwrap());
            }
        }
    }
}

#[test]
fn test_top_down_leaves_partition_dataset() {
    let hierarchies = hierarchies();
    let raw = dataset();
    let tree = TopDownAnonymizer::new().search(&hierarchies, &raw, 2).unwrap();

    let mut positions: Vec<usize> = tree.leaves().flat_map(|leaf| leaf.records().to_vec()).collect();
    positions.sort_unstable();
    assert_eq!(positions, (0..raw.len()).collect::<Vec<_>>());
    assert!(tree.leaves().all(|leaf| leaf.num_records() >= 2));
}

#[test]
fn test_top_down_loss_never_increases() {
    let hierarchies = hierarchies();
    let raw = dataset();
    let ctx = SearchContext::new(&hierarchies, &raw, 2, false).unwrap();
    let mut tree = SpecializationTree::new(ctx);

    let mut previous = tree.total_information_loss();
    while tree.refine_round() {
        let current = tree.total_information_loss();
        assert!(current <= previous + 1e-9);
        previous = current;
    }

    let anonymized = tree.anonymized_records();
    let lm = information_loss_cost(&hierarchies, &raw, &anonymized).unwrap();
    assert!((lm - tree.total_information_loss()).abs() < 1e-9);
}

#[test]
#[cfg(feature = "parallel")]
fn test_parallel_flag_matches_sequential() {
    let hierarchies = hierarchies();
    let raw = dataset();

    let sequential = TopDownAnonymizer::new().anonymize(&hierarchies, &raw, 3).unwrap();
    let parallel = TopDownAnonymizer::with_parallel(true)
        .anonymize(&hierarchies, &raw, 3)
        .unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_invalid_inputs() {
    let hierarchies = hierarchies();
    let anonymizer = KAnonymizer::with_config(
        &hierarchies,
        AnonymizerConfig::builder().with_k(0).build(),
    );
    assert_eq!(
        anonymizer.anonymize(&dataset()).unwrap_err(),
        AnonymizeError::InvalidGroupSize(0)
    );

    let mut raw = dataset();
    raw[4].insert("education".to_string(), "Kindergarten".to_string());
    let err = KAnonymizer::new(&hierarchies).anonymize(&raw).unwrap_err();
    assert_eq!(
        err,
        AnonymizeError::Hierarchy(HierarchyError::UnknownValue {
            attribute: "education".to_string(),
            value: "Kindergarten".to_string(),
        })
    );
}
