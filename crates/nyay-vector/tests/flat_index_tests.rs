use nyay_core::traits::VectorIndex;
use nyay_core::types::{Metric, NO_MATCH};
use nyay_vector::FlatIpIndex;

fn unit(v: &[f32]) -> Vec<f32> {
    let n = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    v.iter().map(|x| x / n).collect()
}

fn sample() -> FlatIpIndex {
    FlatIpIndex::from_rows(2, vec![unit(&[1.0, 0.0]), unit(&[0.0, 1.0]), unit(&[1.0, 1.0])]).unwrap()
}

#[test]
fn results_are_ranked_by_descending_inner_product() {
    let index = sample();
    assert_eq!(index.len(), 3);
    assert_eq!(index.metric(), Metric::InnerProduct);
    let n = index.search(&unit(&[1.0, 0.2]), 3).unwrap();
    assert_eq!(n.positions, vec![0, 2, 1]);
    for w in n.scores.windows(2) { assert!(w[0] >= w[1]); }
    assert!((n.scores[0] - unit(&[1.0, 0.2])[0]).abs() < 1e-6);
}

#[test]
fn missing_slots_use_sentinel_position() {
    let index = sample();
    let n = index.search(&unit(&[0.0, 1.0]), 5).unwrap();
    assert_eq!(n.positions.len(), 5);
    assert_eq!(&n.positions[3..], &[NO_MATCH, NO_MATCH]);
    assert!(n.scores[4].is_infinite() && n.scores[4] < 0.0);
}

#[test]
fn empty_index_returns_only_sentinels() {
    let index = FlatIpIndex::new(4);
    assert!(index.is_empty());
    let n = index.search(&[0.5, 0.5, 0.5, 0.5], 3).unwrap();
    assert!(n.positions.iter().all(|&p| p == NO_MATCH));
}

#[test]
fn ties_keep_insertion_order() {
    let index = FlatIpIndex::from_rows(2, vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
    let n = index.search(&[1.0, 0.0], 2).unwrap();
    assert_eq!(n.positions, vec![0, 1]);
}

#[test]
fn dimension_mismatch_is_an_error() {
    let index = sample();
    assert!(index.search(&[1.0, 0.0, 0.0], 1).is_err());
    let mut index = FlatIpIndex::new(2);
    assert!(index.add(&[1.0]).is_err());
}
