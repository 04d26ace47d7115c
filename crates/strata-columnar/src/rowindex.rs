#![forbid(unsafe_code)]

use crate::table::DataTable;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Rows per filter chunk: the unit of parallelism and of cancellation
/// checks. Matches are never interleaved across chunks.
const FILTER_CHUNK_ROWS: usize = 4096;

#[derive(Debug, Error)]
pub enum RowIndexError {
    #[error("`start` and `count` must be nonnegative, got start={start}, count={count}")]
    NegativeSlice { start: i64, count: i64 },
    #[error("filter evaluation was cancelled")]
    Cancelled,
}

/// A virtual ordering of source rows.
///
/// Either an arithmetic progression kept in O(1) space, or an explicit list
/// of row numbers in O(n). Filter-derived indexes materialize to
/// [`RowIndex::Array`]; the predicate is not retained. A constructed index
/// is immutable and safe to read concurrently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowIndex {
    /// Virtual position `i` maps to `start + i * step`.
    Slice { start: i64, count: i64, step: i64 },
    /// Virtual position `i` maps to the `i`-th entry; arbitrary order,
    /// duplicates permitted.
    Array(Vec<i64>),
}

impl RowIndex {
    /// An arithmetic progression of `count` source rows.
    ///
    /// `start` and `count` must be nonnegative; `step` is unconstrained, so
    /// reversed and strided orderings (and zero-step repeats) are all
    /// expressible.
    pub fn from_slice(start: i64, count: i64, step: i64) -> Result<RowIndex, RowIndexError> {
        if start < 0 || count < 0 {
            return Err(RowIndexError::NegativeSlice { start, count });
        }
        Ok(RowIndex::Slice { start, count, step })
    }

    /// An explicit list of source row numbers, order and duplicates
    /// preserved.
    ///
    /// Entries are not validated against any table here; validity is checked
    /// where the index is used.
    pub fn from_array(values: Vec<i64>) -> RowIndex {
        RowIndex::Array(values)
    }

    /// Collect the visible rows of `table` on which `predicate` holds,
    /// ascending.
    pub fn from_filter<P>(table: &DataTable, predicate: P) -> RowIndex
    where
        P: Fn(&DataTable, usize) -> bool + Sync,
    {
        let never = AtomicBool::new(false);
        Self::from_filter_cancellable(table, predicate, &never)
            .expect("filter without a cancellation source cannot be cancelled")
    }

    /// Like [`RowIndex::from_filter`], checking `cancel` between chunks
    /// (never mid-chunk) so a caller can abandon an expensive scan.
    ///
    /// Rows are processed in fixed-size contiguous chunks, each into its own
    /// buffer; with the `parallel` feature the chunks run on a crate-local
    /// thread pool. Buffers are concatenated in chunk order, so the result
    /// is identical however many workers ran.
    pub fn from_filter_cancellable<P>(
        table: &DataTable,
        predicate: P,
        cancel: &AtomicBool,
    ) -> Result<RowIndex, RowIndexError>
    where
        P: Fn(&DataTable, usize) -> bool + Sync,
    {
        let nrows = table.nrows();
        let mut chunks = Vec::with_capacity(nrows / FILTER_CHUNK_ROWS + 1);
        let mut next = 0;
        while next < nrows {
            let end = (next + FILTER_CHUNK_ROWS).min(nrows);
            chunks.push((next, end));
            next = end;
        }

        let run_chunk = |&(lo, hi): &(usize, usize)| -> Option<Vec<i64>> {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let mut hits = Vec::new();
            for row in lo..hi {
                if predicate(table, row) {
                    hits.push(row as i64);
                }
            }
            Some(hits)
        };

        #[cfg(feature = "parallel")]
        let per_chunk: Option<Vec<Vec<i64>>> = match crate::parallel::pool() {
            Some(pool) => pool.install(|| chunks.par_iter().map(run_chunk).collect()),
            None => chunks.iter().map(run_chunk).collect(),
        };
        #[cfg(not(feature = "parallel"))]
        let per_chunk: Option<Vec<Vec<i64>>> = chunks.iter().map(run_chunk).collect();

        let Some(per_chunk) = per_chunk else {
            return Err(RowIndexError::Cancelled);
        };

        let mut rows = Vec::with_capacity(per_chunk.iter().map(Vec::len).sum());
        for mut hits in per_chunk {
            rows.append(&mut hits);
        }
        Ok(RowIndex::Array(rows))
    }

    /// Number of virtual rows.
    pub fn count(&self) -> i64 {
        match self {
            RowIndex::Slice { count, .. } => *count,
            RowIndex::Array(rows) => rows.len() as i64,
        }
    }

    /// Translate virtual position `i` to its source row number.
    ///
    /// `i` must be in `[0, count())`; anything else is a caller bug and
    /// panics.
    pub fn nth(&self, i: i64) -> i64 {
        match self {
            RowIndex::Slice { start, count, step } => {
                assert!(
                    0 <= i && i < *count,
                    "virtual position {i} out of bounds for {count} rows"
                );
                start + i * step
            }
            RowIndex::Array(rows) => rows[usize::try_from(i).expect("nonnegative virtual position")],
        }
    }

    /// Source row numbers in virtual order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.count()).map(move |i| self.nth(i))
    }

    /// Index-of-an-index: `outer` selects over `self`'s virtual positions.
    ///
    /// Slice over Slice collapses arithmetically into a single Slice and
    /// stays O(1); any combination involving an Array gathers into an
    /// Array. `outer`'s entries must lie within `self`'s virtual range.
    pub fn compose(&self, outer: &RowIndex) -> RowIndex {
        match (self, outer) {
            (
                RowIndex::Slice { start, step, .. },
                RowIndex::Slice {
                    start: ostart,
                    count: ocount,
                    step: ostep,
                },
            ) => RowIndex::Slice {
                start: start + ostart * step,
                count: *ocount,
                step: step * ostep,
            },
            _ => RowIndex::Array(outer.iter().map(|i| self.nth(i)).collect()),
        }
    }
}
