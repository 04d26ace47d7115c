use proptest::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use strata_columnar::{Column, DataTable, RowIndex, RowIndexError, Value};

fn int_table(nrows: usize) -> DataTable {
    let values: Vec<Option<i32>> = (0..nrows).map(|i| Some(i as i32)).collect();
    DataTable::new(vec![Column::from_i32s(&values)], nrows).unwrap()
}

#[test]
fn slice_maps_positions_arithmetically() {
    let ri = RowIndex::from_slice(3, 4, 2).unwrap();
    assert_eq!(ri.count(), 4);
    assert_eq!(ri.iter().collect::<Vec<_>>(), vec![3, 5, 7, 9]);
}

#[test]
fn slice_supports_negative_and_zero_step() {
    let reversed = RowIndex::from_slice(4, 5, -1).unwrap();
    assert_eq!(reversed.iter().collect::<Vec<_>>(), vec![4, 3, 2, 1, 0]);

    let repeated = RowIndex::from_slice(7, 3, 0).unwrap();
    assert_eq!(repeated.iter().collect::<Vec<_>>(), vec![7, 7, 7]);
}

#[test]
fn slice_rejects_negative_start_and_count() {
    assert!(matches!(
        RowIndex::from_slice(-1, 5, 1),
        Err(RowIndexError::NegativeSlice { start: -1, count: 5 })
    ));
    assert!(matches!(
        RowIndex::from_slice(0, -1, 1),
        Err(RowIndexError::NegativeSlice { start: 0, count: -1 })
    ));
}

#[test]
fn empty_slice_has_no_rows() {
    let ri = RowIndex::from_slice(10, 0, 3).unwrap();
    assert_eq!(ri.count(), 0);
    assert_eq!(ri.iter().count(), 0);
}

#[test]
fn array_preserves_order_and_duplicates() {
    let ri = RowIndex::from_array(vec![5, 2, 2, 9]);
    assert_eq!(ri.count(), 4);
    assert_eq!(ri.nth(0), 5);
    assert_eq!(ri.nth(1), 2);
    assert_eq!(ri.nth(2), 2);
    assert_eq!(ri.nth(3), 9);
}

#[test]
fn array_accepts_out_of_range_entries_at_construction() {
    // Validity against a table is checked at use time, not here.
    let ri = RowIndex::from_array(vec![1_000_000, -3]);
    assert_eq!(ri.count(), 2);
    assert_eq!(ri.nth(1), -3);
}

#[test]
fn filter_collects_matching_rows_in_order() {
    let table = int_table(10);
    let ri = RowIndex::from_filter(&table, |_, row| row % 2 == 0);
    assert_eq!(ri, RowIndex::from_array(vec![0, 2, 4, 6, 8]));
}

#[test]
fn filter_on_empty_table_is_empty() {
    let table = int_table(0);
    let ri = RowIndex::from_filter(&table, |_, _| true);
    assert_eq!(ri.count(), 0);
}

#[test]
fn filter_result_is_stable_across_chunk_boundaries() {
    // Well past one 4096-row chunk, so several workers contribute.
    let nrows = 10_000;
    let table = int_table(nrows);
    let ri = RowIndex::from_filter(&table, |t, row| match t.cell(row, 0) {
        Value::Int(v) => v % 3 == 0,
        _ => false,
    });
    let expected: Vec<i64> = (0..nrows as i64).filter(|i| i % 3 == 0).collect();
    assert_eq!(ri, RowIndex::from_array(expected));
}

#[test]
fn filter_predicate_sees_decoded_values() {
    let values = vec![Some(10), None, Some(-4), Some(7), None];
    let table = DataTable::new(vec![Column::from_i32s(&values)], 5).unwrap();
    let ri = RowIndex::from_filter(&table, |t, row| !t.cell(row, 0).is_na());
    assert_eq!(ri, RowIndex::from_array(vec![0, 2, 3]));
}

#[test]
fn cancelled_filter_returns_no_rowindex() {
    let table = int_table(100);
    let cancel = AtomicBool::new(true);
    let result = RowIndex::from_filter_cancellable(&table, |_, _| true, &cancel);
    assert!(matches!(result, Err(RowIndexError::Cancelled)));
}

#[test]
fn uncancelled_token_behaves_like_plain_filter() {
    let table = int_table(20);
    let cancel = AtomicBool::new(false);
    let ri = RowIndex::from_filter_cancellable(&table, |_, row| row < 3, &cancel).unwrap();
    assert_eq!(ri, RowIndex::from_array(vec![0, 1, 2]));
    assert!(!cancel.load(Ordering::Relaxed));
}

#[test]
fn slice_over_slice_collapses_to_a_slice() {
    let inner = RowIndex::from_slice(2, 5, 2).unwrap();
    let outer = RowIndex::from_slice(1, 3, 1).unwrap();
    let composed = inner.compose(&outer);
    assert_eq!(
        composed,
        RowIndex::Slice {
            start: 4,
            count: 3,
            step: 2
        }
    );
    assert_eq!(composed.iter().collect::<Vec<_>>(), vec![4, 6, 8]);
}

#[test]
fn reversed_slice_composition_stays_arithmetic() {
    let inner = RowIndex::from_slice(0, 10, 1).unwrap();
    let outer = RowIndex::from_slice(9, 10, -1).unwrap();
    let composed = inner.compose(&outer);
    assert!(matches!(composed, RowIndex::Slice { .. }));
    assert_eq!(composed.nth(0), 9);
    assert_eq!(composed.nth(9), 0);
}

#[test]
fn array_composition_gathers() {
    let inner = RowIndex::from_array(vec![10, 20, 30, 40]);
    let outer = RowIndex::from_slice(1, 2, 1).unwrap();
    assert_eq!(inner.compose(&outer), RowIndex::from_array(vec![20, 30]));

    let inner = RowIndex::from_slice(100, 5, 10).unwrap();
    let outer = RowIndex::from_array(vec![4, 0, 4]);
    assert_eq!(
        inner.compose(&outer),
        RowIndex::from_array(vec![140, 100, 140])
    );
}

proptest! {
    #[test]
    fn slice_round_trip(start in 0i64..1_000, count in 0i64..200, step in -50i64..50) {
        let ri = RowIndex::from_slice(start, count, step).unwrap();
        prop_assert_eq!(ri.count(), count);
        for i in 0..count {
            prop_assert_eq!(ri.nth(i), start + i * step);
        }
    }

    #[test]
    fn negative_slice_inputs_always_rejected(start in -1_000i64..0, count in 0i64..100) {
        prop_assert!(RowIndex::from_slice(start, count, 1).is_err());
        prop_assert!(RowIndex::from_slice(count, start, 1).is_err());
    }

    #[test]
    fn compose_agrees_with_pointwise_translation(
        start in 0i64..100,
        count in 1i64..50,
        step in 1i64..5,
        outer_start in 0i64..10,
        outer_step in 1i64..3,
    ) {
        let inner = RowIndex::from_slice(start, count, step).unwrap();
        let outer_count = (count - outer_start).max(0) / outer_step;
        let outer = RowIndex::from_slice(outer_start, outer_count, outer_step).unwrap();
        let composed = inner.compose(&outer);
        for i in 0..outer_count {
            prop_assert_eq!(composed.nth(i), inner.nth(outer.nth(i)));
        }
    }
}
