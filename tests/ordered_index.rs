use std::collections::BTreeMap;

use bplus_index::{IndexError, Order, OrderedIndex};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Generates keys in a range small enough to cause plenty of duplicates.
fn key_strategy() -> impl Strategy<Value = i64> {
    -500i64..500i64
}

fn order_strategy() -> impl Strategy<Value = usize> {
    Order::MIN..=16
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum IndexOp {
    Insert(i64, u32),
    Search(i64),
    ContainsKey(i64),
}

fn index_op_strategy() -> impl Strategy<Value = IndexOp> {
    prop_oneof![
        6 => (key_strategy(), any::<u32>()).prop_map(|(k, r)| IndexOp::Insert(k, r)),
        3 => key_strategy().prop_map(IndexOp::Search),
        1 => key_strategy().prop_map(IndexOp::ContainsKey),
    ]
}

/// Builds an index and the equivalent `BTreeMap<K, Vec<R>>` model from `pairs`.
fn build(order: usize, pairs: &[(i64, u32)]) -> (OrderedIndex<i64, u32>, BTreeMap<i64, Vec<u32>>) {
    let mut index = OrderedIndex::new(order).unwrap();
    let mut model: BTreeMap<i64, Vec<u32>> = BTreeMap::new();
    for &(k, r) in pairs {
        index.insert(k, r);
        model.entry(k).or_default().push(r);
    }
    (index, model)
}

// ─── Model-based properties ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays random inserts and lookups on both the index and a `BTreeMap`
    /// of record lists and asserts identical results at every step.
    #[test]
    fn index_ops_match_btreemap(
        order in order_strategy(),
        ops in proptest::collection::vec(index_op_strategy(), TEST_SIZE),
    ) {
        let mut index: OrderedIndex<i64, u32> = OrderedIndex::new(order).unwrap();
        let mut model: BTreeMap<i64, Vec<u32>> = BTreeMap::new();

        for op in &ops {
            match op {
                IndexOp::Insert(k, r) => {
                    index.insert(*k, *r);
                    model.entry(*k).or_default().push(*r);
                }
                IndexOp::Search(k) => {
                    prop_assert_eq!(index.search(k), model.get(k).map(Vec::as_slice), "search({})", k);
                }
                IndexOp::ContainsKey(k) => {
                    prop_assert_eq!(index.contains_key(k), model.contains_key(k), "contains_key({})", k);
                }
            }
        }

        prop_assert_eq!(index.len(), model.len());
        prop_assert_eq!(index.record_count(), model.values().map(Vec::len).sum::<usize>());
    }

    /// Every inserted record is found under its key.
    #[test]
    fn inserted_records_are_found(
        order in order_strategy(),
        pairs in proptest::collection::vec((key_strategy(), any::<u32>()), 0..TEST_SIZE),
    ) {
        let (index, _) = build(order, &pairs);
        for (k, r) in &pairs {
            let records = index.search(k);
            prop_assert!(records.is_some_and(|rs| rs.contains(r)), "record {} missing under {}", r, k);
        }
    }

    /// Records under one key come back in insertion order.
    #[test]
    fn records_accumulate_in_insertion_order(
        order in order_strategy(),
        pairs in proptest::collection::vec((0i64..20, any::<u32>()), 1..500),
    ) {
        let (index, model) = build(order, &pairs);
        for (k, records) in &model {
            prop_assert_eq!(index.search(k), Some(records.as_slice()));
        }
    }

    /// Walking the leaf chain yields every key once, in ascending order.
    #[test]
    fn iteration_is_sorted_and_complete(
        order in order_strategy(),
        pairs in proptest::collection::vec((key_strategy(), any::<u32>()), 0..TEST_SIZE),
    ) {
        let (index, model) = build(order, &pairs);

        let keys: Vec<i64> = index.keys().copied().collect();
        let expected: Vec<i64> = model.keys().copied().collect();
        prop_assert_eq!(keys, expected);

        let entries: Vec<(i64, Vec<u32>)> = index.iter().map(|(k, rs)| (*k, rs.to_vec())).collect();
        let expected: Vec<(i64, Vec<u32>)> = model.into_iter().collect();
        prop_assert_eq!(entries, expected);
    }

    /// Keys never inserted are reported absent.
    #[test]
    fn absent_keys_return_none(
        order in order_strategy(),
        pairs in proptest::collection::vec((key_strategy(), any::<u32>()), 0..500),
        probe in 1_000i64..2_000,
    ) {
        let (index, _) = build(order, &pairs);
        prop_assert_eq!(index.search(&probe), None);
        prop_assert_eq!(index.search(&-probe), None);
        prop_assert!(!index.contains_key(&probe));
    }

    /// Height stays logarithmic: each level at least doubles the leaf count.
    #[test]
    fn height_is_bounded(
        order in order_strategy(),
        keys in proptest::collection::btree_set(key_strategy(), 1..1_000),
    ) {
        let mut index = OrderedIndex::new(order).unwrap();
        for k in &keys {
            index.insert(*k, ());
        }
        // Every node holds at least one key and every internal node at least two children.
        let bound = usize::BITS - keys.len().leading_zeros();
        prop_assert!(index.height() <= bound as usize + 1, "height {} for {} keys", index.height(), keys.len());
    }
}

// ─── Construction ────────────────────────────────────────────────────────────

#[test]
fn order_below_two_is_rejected() {
    for order in [0, 1] {
        let result = OrderedIndex::<i64, ()>::new(order);
        assert!(matches!(result, Err(IndexError::InvalidOrder { order: o }) if o == order));
    }
    assert!(OrderedIndex::<i64, ()>::new(2).is_ok());
}

#[test]
fn invalid_order_displays_reason() {
    let err = Order::new(0).unwrap_err();
    assert_eq!(err.to_string(), "invalid order 0: an index needs at least 2 keys per node");
}

#[test]
fn with_capacity_starts_empty() {
    let index: OrderedIndex<i64, i64> = OrderedIndex::with_capacity(Order::new(8).unwrap(), 1_000);
    assert!(index.is_empty());
    assert_eq!(index.order().get(), 8);
    assert_eq!(index.node_count(), 1);
    assert!(index.capacity() >= 125);
}

// ─── Reference scenarios ─────────────────────────────────────────────────────

#[test]
fn mixed_inserts_grow_past_one_leaf() {
    let mut index = OrderedIndex::new(4).unwrap();
    let keys = [10, 20, 5, 6, 12, 30, 7, 17];
    for (i, k) in keys.into_iter().enumerate() {
        index.insert(k, i);
    }

    assert!(index.height() >= 2);
    assert_eq!(index.search(&6), Some(&[3][..]));
    assert_eq!(index.keys().copied().collect::<Vec<_>>(), [5, 6, 7, 10, 12, 17, 20, 30]);
}

#[test]
fn duplicate_key_keeps_single_entry() {
    let mut index = OrderedIndex::new(4).unwrap();
    index.insert(10, "a");
    index.insert(10, "b");

    assert_eq!(index.search(&10), Some(&["a", "b"][..]));
    assert_eq!(index.len(), 1);
    assert_eq!(index.record_count(), 2);
    assert_eq!(index.iter().count(), 1);
}

#[test]
fn sequential_inserts_at_minimum_order_cascade() {
    let mut index = OrderedIndex::new(2).unwrap();
    let mut heights = Vec::new();
    for k in 1..=5 {
        index.insert(k, k * 100);
        heights.push(index.height());
        for j in 1..=k {
            assert_eq!(index.search(&j), Some(&[j * 100][..]));
        }
    }

    assert_eq!(heights, [1, 1, 2, 2, 3]);
    assert_eq!(
        index.dump().to_string(),
        "\
Node: [3]
  Node: [2]
    Leaf: [1] [[100]]
    Leaf: [2] [[200]]
  Node: [4]
    Leaf: [3] [[300]]
    Leaf: [4, 5] [[400], [500]]
"
    );
}

#[test]
fn empty_index_search_is_none() {
    let index: OrderedIndex<i64, &str> = OrderedIndex::new(4).unwrap();
    assert_eq!(index.search(&42), None);
    assert!(index.is_empty());
    assert_eq!(index.iter().next(), None);
}

// ─── Keys and records of other types ─────────────────────────────────────────

#[test]
fn string_keys_search_by_str() {
    let names = ["Amelia", "Blake", "Caroline", "Dominic", "Emma", "Fiona", "George", "Henry", "Ian", "Julia"];
    let mut index: OrderedIndex<String, (String, String)> = OrderedIndex::default();
    for (i, name) in names.iter().enumerate() {
        index.insert((*name).to_owned(), ((*name).to_owned(), format!("+38000000{}", i + 1)));
    }

    let records = index.search("Fiona").unwrap();
    assert_eq!(records, [("Fiona".to_owned(), "+380000006".to_owned())]);
    assert!(index.search("Zoe").is_none());
    assert!(index.height() >= 2);
}

#[test]
fn descending_inserts_keep_order() {
    let mut index = OrderedIndex::new(3).unwrap();
    index.extend((0..1_000u32).rev().map(|k| (k, k)));

    assert_eq!(index.len(), 1_000);
    assert!(index.keys().copied().eq(0..1_000));
    assert!((0..1_000).all(|k| index.search(&k) == Some(&[k][..])));
}

#[test]
fn clone_is_a_snapshot() {
    let mut index = OrderedIndex::new(2).unwrap();
    index.extend((0..20).map(|k| (k, k)));
    let snapshot = index.clone();

    index.insert(5, 55);
    index.insert(99, 99);

    assert_eq!(snapshot.search(&5), Some(&[5][..]));
    assert_eq!(snapshot.search(&99), None);
    assert_eq!(index.search(&5), Some(&[5, 55][..]));
}
