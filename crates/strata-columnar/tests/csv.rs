use strata_columnar::{csv, Column, DataTable, RowIndex};

fn cell_text(column: &Column, row: usize) -> String {
    let mut out = Vec::new();
    csv::write_cell(&mut out, column, row);
    String::from_utf8(out).unwrap()
}

#[test]
fn na_renders_as_an_empty_field() {
    assert_eq!(cell_text(&Column::from_i32s(&[None]), 0), "");
    assert_eq!(cell_text(&Column::from_f64s(&[None]), 0), "");
    assert_eq!(cell_text(&Column::from_bools(&[None]), 0), "");
    assert_eq!(cell_text(&Column::from_strs(&[Some("x"), None]), 1), "");
}

#[test]
fn scalar_kernels_format_each_storage_type() {
    assert_eq!(cell_text(&Column::from_bools(&[Some(true)]), 0), "1");
    assert_eq!(cell_text(&Column::from_bools(&[Some(false)]), 0), "0");
    assert_eq!(cell_text(&Column::from_i32s(&[Some(-42)]), 0), "-42");
    assert_eq!(
        cell_text(&Column::from_i64s(&[Some(i64::MAX)]), 0),
        "9223372036854775807"
    );
    assert_eq!(cell_text(&Column::from_f64s(&[Some(2.5)]), 0), "2.5");
    assert_eq!(cell_text(&Column::from_f64s(&[Some(-0.125)]), 0), "-0.125");
    assert_eq!(cell_text(&Column::from_strs(&[Some("plain")]), 0), "plain");
}

#[test]
fn strings_are_quoted_only_when_needed() {
    let column = Column::from_strs(&[
        Some("a,b"),
        Some("say \"hi\""),
        Some("line\nbreak"),
        Some("untouched"),
    ]);
    assert_eq!(cell_text(&column, 0), "\"a,b\"");
    assert_eq!(cell_text(&column, 1), "\"say \"\"hi\"\"\"");
    assert_eq!(cell_text(&column, 2), "\"line\nbreak\"");
    assert_eq!(cell_text(&column, 3), "untouched");
}

#[test]
fn whole_table_export_separates_fields_and_rows() {
    let table = DataTable::new(
        vec![
            Column::from_i32s(&[Some(1), None, Some(3)]),
            Column::from_strs(&[Some("a"), Some("b"), None]),
        ],
        3,
    )
    .unwrap();

    let mut out = Vec::new();
    csv::write_csv(&mut out, &table).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "1,a\n,b\n3,\n");
}

#[test]
fn export_respects_the_row_overlay() {
    let mut table = DataTable::new(
        vec![Column::from_i32s(&[Some(10), Some(20), Some(30)])],
        3,
    )
    .unwrap();
    table.apply_rowindex(RowIndex::from_array(vec![2, 0]));

    let mut out = Vec::new();
    csv::write_csv(&mut out, &table).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "30\n10\n");
}
