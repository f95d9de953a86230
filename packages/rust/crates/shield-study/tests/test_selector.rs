//! Tests for selector module - weighted bucket selection.

use shield_study::{StudyError, VariationSpec, WeightedVariationTable, choose_from, fraction};

fn abc() -> WeightedVariationTable {
    WeightedVariationTable::new(vec![
        VariationSpec::new("A", 1.0),
        VariationSpec::new("B", 1.0),
        VariationSpec::new("C", 2.0),
    ])
    .unwrap()
}

fn below(x: f64) -> f64 {
    x - f64::EPSILON
}

fn pick(table: &[VariationSpec], f: f64) -> String {
    choose_from(table, f).unwrap().name.clone()
}

#[test]
fn test_partition_correctness() {
    let table = abc();
    assert_eq!(pick(&table, 0.0), "A");
    assert_eq!(pick(&table, below(0.25)), "A");
    assert_eq!(pick(&table, 0.25), "B");
    assert_eq!(pick(&table, below(0.5)), "B");
    assert_eq!(pick(&table, 0.5), "C");
    assert_eq!(pick(&table, below(1.0)), "C");
}

#[test]
fn test_normalized_weights_share_boundaries() {
    let raw = abc();
    let normalized = WeightedVariationTable::new(vec![
        VariationSpec::new("A", 0.25),
        VariationSpec::new("B", 0.25),
        VariationSpec::new("C", 0.5),
    ])
    .unwrap();
    for step in 0..4096 {
        let f = f64::from(step) / 4096.0;
        assert_eq!(pick(&raw, f), pick(&normalized, f), "fraction {f}");
    }
}

#[test]
fn test_sampled_shares_follow_weights() {
    let table = abc();
    let mut counts = [0usize; 3];
    for i in 0..8_000 {
        let f = fraction(&format!("share-client-{i}"), 12).unwrap();
        match choose_from(&table, f).unwrap().name.as_str() {
            "A" => counts[0] += 1,
            "B" => counts[1] += 1,
            _ => counts[2] += 1,
        }
    }
    // Expected 2000 / 2000 / 4000.
    assert!((1_700..2_300).contains(&counts[0]), "{counts:?}");
    assert!((1_700..2_300).contains(&counts[1]), "{counts:?}");
    assert!((3_600..4_400).contains(&counts[2]), "{counts:?}");
}

#[test]
fn test_invalid_table() {
    assert!(matches!(
        choose_from(&[], 0.3),
        Err(StudyError::InvalidArgument(_))
    ));
    let zeros = vec![VariationSpec::new("A", 0.0), VariationSpec::new("B", 0.0)];
    assert!(matches!(
        choose_from(&zeros, 0.3),
        Err(StudyError::InvalidArgument(_))
    ));
}
