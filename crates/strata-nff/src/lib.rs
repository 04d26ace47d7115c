//! On-disk side of the strata engine: the NFF flat-file format.
//!
//! One file per column — a raw fixed-width array in native byte order, or
//! signed offsets followed by a character buffer with sign-encoded NAs —
//! plus a colspec descriptor table naming each stored column's file and
//! storage type. Column files are memory-mapped read-only and exposed
//! through `strata-columnar` without copying; the mapping lives exactly as
//! long as the column that owns it.

mod load;
mod mapped;

pub use crate::load::{load, open_column, LoadError};
pub use crate::mapped::MappedFile;
