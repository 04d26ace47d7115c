#![forbid(unsafe_code)]

use crate::column::{Column, Value};
use crate::rowindex::RowIndex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("column {col} has {actual} rows, expected {expected}")]
    RowCountMismatch {
        col: usize,
        expected: usize,
        actual: usize,
    },
}

/// An ordered sequence of columns sharing one row count, with an optional
/// row-index overlay.
///
/// The overlay reinterprets the visible row ordering without copying or
/// relaying out any column: every row-wise access redirects through it
/// first. The table is immutable once built except for gaining an overlay.
#[derive(Debug)]
pub struct DataTable {
    columns: Vec<Column>,
    nrows: usize,
    rowindex: Option<RowIndex>,
}

impl DataTable {
    /// Assemble a table from fully built columns.
    ///
    /// Every column must hold exactly `nrows` elements.
    pub fn new(columns: Vec<Column>, nrows: usize) -> Result<DataTable, TableError> {
        for (col, column) in columns.iter().enumerate() {
            if column.nrows() != nrows {
                return Err(TableError::RowCountMismatch {
                    col,
                    expected: nrows,
                    actual: column.nrows(),
                });
            }
        }
        Ok(DataTable {
            columns,
            nrows,
            rowindex: None,
        })
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Number of visible rows: the overlay's count when one is attached,
    /// the source row count otherwise.
    pub fn nrows(&self) -> usize {
        match &self.rowindex {
            Some(rowindex) => rowindex.count() as usize,
            None => self.nrows,
        }
    }

    /// Row count of the underlying storage, ignoring any overlay.
    pub fn source_nrows(&self) -> usize {
        self.nrows
    }

    pub fn column(&self, col: usize) -> &Column {
        &self.columns[col]
    }

    pub fn rowindex(&self) -> Option<&RowIndex> {
        self.rowindex.as_ref()
    }

    /// Decode the cell at visible position (`row`, `col`).
    ///
    /// `row` is translated through the overlay before indexing the column;
    /// an overlay entry outside the source row range is a caller bug and
    /// panics in the column's bounds check.
    pub fn cell(&self, row: usize, col: usize) -> Value<'_> {
        let src = match &self.rowindex {
            Some(rowindex) => {
                let src = rowindex.nth(row as i64);
                assert!(src >= 0, "row index entry {src} is negative");
                src as usize
            }
            None => row,
        };
        self.columns[col].get(src)
    }

    /// Attach `rowindex` as the table's overlay.
    ///
    /// When an overlay is already present the two are composed, so the new
    /// index selects over the currently visible rows and Slice-over-Slice
    /// stays O(1).
    pub fn apply_rowindex(&mut self, rowindex: RowIndex) {
        self.rowindex = Some(match self.rowindex.take() {
            Some(existing) => existing.compose(&rowindex),
            None => rowindex,
        });
    }
}
