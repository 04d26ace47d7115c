//! Out-of-core columnar table engine.
//!
//! This crate is the pure core of the engine:
//! - Storage-type registry ([`SType`]) and the NA sentinel encodings.
//! - Column decode over any [`Region`] (owned buffers here; memory-mapped
//!   files in `strata-nff`), including sign-encoded string NAs.
//! - The row-index engine: slice / array / filter-derived virtual orderings
//!   of a table's rows, composed instead of materialized.
//! - Table assembly and row-index overlay redirection.
//! - Row-to-text serialization kernels for CSV export.

#![forbid(unsafe_code)]

mod column;
pub mod csv;
#[cfg(feature = "parallel")]
mod parallel;
mod rowindex;
mod stype;
mod table;

pub use crate::column::{Column, ColumnError, Region, Value};
pub use crate::rowindex::{RowIndex, RowIndexError};
pub use crate::stype::{SType, NA_INT16, NA_INT32, NA_INT64, NA_INT8};
pub use crate::table::{DataTable, TableError};
