use std::io;
use std::path::{Path, PathBuf};
use std::str;

use strata_columnar::{Column, ColumnError, DataTable, SType, TableError, Value};
use thiserror::Error;

use crate::mapped::MappedFile;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("colspec table should have had 3 or 5 columns, but {0} were passed")]
    ColspecShape(usize),
    #[error("string columns are expected in colspec table, instead got {filenames} and {stypes}")]
    ColspecTypes { filenames: SType, stypes: SType },
    #[error("nrows must be nonnegative, got {0}")]
    NegativeRowCount(i64),
    #[error("column {col}: filename is missing")]
    MissingFilename { col: usize },
    #[error("column {col}: filename is not valid UTF-8")]
    FilenameNotUtf8 { col: usize },
    #[error("column {col}: stype is missing")]
    MissingStype { col: usize },
    #[error("column {col}: incorrect stype's length: {len}")]
    StypeLength { col: usize, len: usize },
    #[error("column {col}: unrecognized stype: {name}")]
    UnknownStype { col: usize, name: String },
    #[error("cannot open column file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("column file {path}: {source}")]
    BadColumnFile { path: PathBuf, source: ColumnError },
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Open one NFF column file: map it read-only and interpret it as `nrows`
/// elements of `stype`.
///
/// Fixed-width files must be exactly `nrows * width` bytes; string files
/// must hold at least the `(nrows + 1)`-slot offset index, with everything
/// past it treated as the character buffer. Offset magnitudes are not
/// validated here; the decode path bounds-checks them per access.
pub fn open_column(stype: SType, nrows: i64, path: impl AsRef<Path>) -> Result<Column, LoadError> {
    let path = path.as_ref();
    let nrows = usize::try_from(nrows).map_err(|_| LoadError::NegativeRowCount(nrows))?;

    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let len = std::fs::metadata(path).map_err(io_err)?.len();
    let column = if len == 0 {
        // Zero-length files cannot be mapped portably.
        Column::new(stype, nrows, Vec::new())
    } else {
        let mapped = MappedFile::open(path).map_err(io_err)?;
        Column::new(stype, nrows, mapped)
    };
    column.map_err(|source| LoadError::BadColumnFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Reconstruct a table stored in NFF format.
///
/// `colspec` describes one stored column per row: column 0 holds the
/// relative filename, column 1 the stype code, and the remaining one or
/// three columns carry metadata this loader does not consume. `root`
/// locates the column files; an empty root means the current directory.
///
/// Any failure drops every column opened so far before the error
/// propagates; no partial table is ever returned.
pub fn load(colspec: &DataTable, nrows: i64, root: impl AsRef<Path>) -> Result<DataTable, LoadError> {
    let root = root.as_ref();
    if colspec.ncols() != 3 && colspec.ncols() != 5 {
        return Err(LoadError::ColspecShape(colspec.ncols()));
    }
    let filenames = colspec.column(0);
    let stypes = colspec.column(1);
    if !filenames.stype().is_string() || !stypes.stype().is_string() {
        return Err(LoadError::ColspecTypes {
            filenames: filenames.stype(),
            stypes: stypes.stype(),
        });
    }
    if nrows < 0 {
        return Err(LoadError::NegativeRowCount(nrows));
    }

    let ncols = colspec.nrows();
    log::debug!("loading {ncols} columns of {nrows} rows from {:?}", root);

    let mut columns = Vec::with_capacity(ncols);
    for col in 0..ncols {
        let filename = match colspec.cell(col, 0) {
            Value::Str(bytes) => {
                str::from_utf8(bytes).map_err(|_| LoadError::FilenameNotUtf8 { col })?
            }
            _ => return Err(LoadError::MissingFilename { col }),
        };
        let name = match colspec.cell(col, 1) {
            Value::Str(bytes) => {
                if bytes.len() != 2 && bytes.len() != 3 {
                    return Err(LoadError::StypeLength {
                        col,
                        len: bytes.len(),
                    });
                }
                String::from_utf8_lossy(bytes).into_owned()
            }
            _ => return Err(LoadError::MissingStype { col }),
        };
        let stype = SType::from_name(&name);
        if stype == SType::Void {
            return Err(LoadError::UnknownStype { col, name });
        }
        columns.push(open_column(stype, nrows, root.join(filename))?);
    }

    Ok(DataTable::new(columns, nrows as usize)?)
}
