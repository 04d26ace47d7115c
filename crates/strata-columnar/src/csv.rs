#![forbid(unsafe_code)]

//! Row-to-text serialization kernels for CSV export.
//!
//! These exercise the column decode path across every storage type; the
//! `writecsv` bench measures their per-type throughput.

use crate::column::{Column, Value};
use crate::table::DataTable;
use std::io::{self, Write};

/// Append the CSV text form of one decoded value to `out`.
///
/// NA renders as an empty field, booleans as `1`/`0`, integers in decimal,
/// floats via shortest round-trip formatting. String bytes are copied
/// verbatim unless they contain a comma, quote, or line break, in which case
/// the field is quoted with embedded quotes doubled.
pub fn write_value(out: &mut Vec<u8>, value: Value<'_>) {
    match value {
        Value::Na => {}
        Value::Bool(b) => out.push(if b { b'1' } else { b'0' }),
        Value::Int(v) => {
            write!(out, "{v}").expect("write to Vec");
        }
        Value::Float(v) => {
            write!(out, "{v}").expect("write to Vec");
        }
        Value::Str(s) => {
            if s.iter().any(|&b| matches!(b, b',' | b'"' | b'\n' | b'\r')) {
                out.push(b'"');
                for &b in s {
                    if b == b'"' {
                        out.push(b'"');
                    }
                    out.push(b);
                }
                out.push(b'"');
            } else {
                out.extend_from_slice(s);
            }
        }
    }
}

/// Append the CSV text form of one column element to `out`.
pub fn write_cell(out: &mut Vec<u8>, column: &Column, row: usize) {
    write_value(out, column.get(row));
}

/// Append one visible row of `table` to `out`, fields comma-separated, no
/// trailing newline. Cells go through the table's overlay.
pub fn write_row(out: &mut Vec<u8>, table: &DataTable, row: usize) {
    for col in 0..table.ncols() {
        if col > 0 {
            out.push(b',');
        }
        write_value(out, table.cell(row, col));
    }
}

/// Serialize every visible row of `table` to `out` as CSV.
///
/// A filtered or reordered view exports exactly what it shows.
pub fn write_csv<W: Write>(out: &mut W, table: &DataTable) -> io::Result<()> {
    let mut line = Vec::new();
    for row in 0..table.nrows() {
        line.clear();
        write_row(&mut line, table, row);
        line.push(b'\n');
        out.write_all(&line)?;
    }
    Ok(())
}
