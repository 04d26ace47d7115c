#![forbid(unsafe_code)]

use crate::stype::{SType, NA_INT16, NA_INT32, NA_INT64, NA_INT8};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A contiguous read-only byte region backing a column.
///
/// Implemented by plain owned buffers here and by memory-mapped files in the
/// `strata-nff` crate; the decode path never cares which. Regions are never
/// mutated after the column is built, so concurrent readers need no locking.
pub trait Region: Send + Sync + 'static {
    fn bytes(&self) -> &[u8];
}

impl Region for Vec<u8> {
    fn bytes(&self) -> &[u8] {
        self
    }
}

#[derive(Debug, Error)]
pub enum ColumnError {
    #[error("{stype} column of {nrows} rows needs {expected} bytes, but the buffer holds {actual}")]
    SizeMismatch {
        stype: SType,
        nrows: usize,
        expected: usize,
        actual: usize,
    },
    #[error(
        "{stype} column of {nrows} rows needs a {expected}-byte offset index, \
         but the buffer holds only {actual} bytes"
    )]
    IndexTruncated {
        stype: SType,
        nrows: usize,
        expected: usize,
        actual: usize,
    },
}

/// One decoded element.
///
/// String spans borrow from the column's region and are raw bytes; the disk
/// format does not promise UTF-8.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value<'a> {
    Na,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a [u8]),
}

impl Value<'_> {
    pub fn is_na(&self) -> bool {
        matches!(self, Value::Na)
    }
}

/// One typed column over a shared byte region.
///
/// Fixed-width layout: `nrows * width` bytes, native byte order, with the
/// per-type NA sentinel. String layout: `nrows + 1` signed offsets followed
/// by a character buffer; element `i` spans `|off[i]| .. |off[i+1]|` and a
/// negative `off[i+1]` marks it NA, the magnitude still carrying the true
/// cumulative byte position.
///
/// The column exclusively owns its region; dropping the last clone releases
/// a mapped region's file mapping.
#[derive(Clone)]
pub struct Column {
    stype: SType,
    nrows: usize,
    data: Arc<dyn Region>,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("stype", &self.stype)
            .field("nrows", &self.nrows)
            .field("bytes", &self.data.bytes().len())
            .finish()
    }
}

impl Column {
    /// Wrap a byte region as a column of `nrows` elements of type `stype`.
    ///
    /// Fixed-width regions must be exactly `nrows * width` bytes. String
    /// regions must hold at least the `(nrows + 1)`-slot offset index; every
    /// byte past the index is the character buffer.
    pub fn new(stype: SType, nrows: usize, region: impl Region) -> Result<Column, ColumnError> {
        let actual = region.bytes().len();
        if stype.is_string() {
            let expected = (nrows + 1) * stype.width();
            if actual < expected {
                return Err(ColumnError::IndexTruncated {
                    stype,
                    nrows,
                    expected,
                    actual,
                });
            }
        } else {
            let expected = nrows * stype.width();
            if actual != expected {
                return Err(ColumnError::SizeMismatch {
                    stype,
                    nrows,
                    expected,
                    actual,
                });
            }
        }
        Ok(Column {
            stype,
            nrows,
            data: Arc::new(region),
        })
    }

    pub fn stype(&self) -> SType {
        self.stype
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Decode element `row`.
    ///
    /// Indexing past `nrows` is a caller bug and panics.
    pub fn get(&self, row: usize) -> Value<'_> {
        assert!(
            row < self.nrows,
            "row {row} out of bounds for a column of {} rows",
            self.nrows
        );
        match self.stype {
            SType::Void => Value::Na,
            SType::Bool8 => match i8::from_ne_bytes(self.fixed::<1>(row)) {
                NA_INT8 => Value::Na,
                0 => Value::Bool(false),
                _ => Value::Bool(true),
            },
            SType::Int8 => match i8::from_ne_bytes(self.fixed::<1>(row)) {
                NA_INT8 => Value::Na,
                v => Value::Int(i64::from(v)),
            },
            SType::Int16 => match i16::from_ne_bytes(self.fixed::<2>(row)) {
                NA_INT16 => Value::Na,
                v => Value::Int(i64::from(v)),
            },
            SType::Int32 => match i32::from_ne_bytes(self.fixed::<4>(row)) {
                NA_INT32 => Value::Na,
                v => Value::Int(i64::from(v)),
            },
            SType::Int64 => match i64::from_ne_bytes(self.fixed::<8>(row)) {
                NA_INT64 => Value::Na,
                v => Value::Int(v),
            },
            SType::Float32 => {
                let v = f32::from_ne_bytes(self.fixed::<4>(row));
                if v.is_nan() {
                    Value::Na
                } else {
                    Value::Float(f64::from(v))
                }
            }
            SType::Float64 => {
                let v = f64::from_ne_bytes(self.fixed::<8>(row));
                if v.is_nan() {
                    Value::Na
                } else {
                    Value::Float(v)
                }
            }
            SType::Str32 | SType::Str64 => self.str_at(row),
        }
    }

    fn fixed<const W: usize>(&self, row: usize) -> [u8; W] {
        let at = row * W;
        self.data.bytes()[at..at + W]
            .try_into()
            .expect("fixed-width element slice")
    }

    /// The single decode point for sign-encoded string elements.
    ///
    /// Offset magnitudes are bounds-checked here, lazily per access; a
    /// corrupt offset panics instead of reading past the character buffer.
    fn str_at(&self, row: usize) -> Value<'_> {
        let index_len = (self.nrows + 1) * self.stype.width();
        let chars = &self.data.bytes()[index_len..];
        let lo = self.offset(row).unsigned_abs() as usize;
        let hi = self.offset(row + 1);
        if hi < 0 {
            return Value::Na;
        }
        let hi = hi as usize;
        assert!(
            lo <= hi && hi <= chars.len(),
            "string offsets {lo}..{hi} out of bounds for a {}-byte character buffer",
            chars.len()
        );
        Value::Str(&chars[lo..hi])
    }

    fn offset(&self, slot: usize) -> i64 {
        let w = self.stype.width();
        let at = slot * w;
        let bytes = &self.data.bytes()[at..at + w];
        match self.stype {
            SType::Str32 => i64::from(i32::from_ne_bytes(bytes.try_into().expect("offset slot"))),
            SType::Str64 => i64::from_ne_bytes(bytes.try_into().expect("offset slot")),
            _ => unreachable!("offset decode on a fixed-width column"),
        }
    }
}

/// In-memory constructors.
///
/// These encode exactly the on-disk layout, so colspecs and test fixtures can
/// be assembled without touching a file.
impl Column {
    pub fn from_bools(values: &[Option<bool>]) -> Column {
        let bytes: Vec<u8> = values
            .iter()
            .map(|v| match v {
                Some(true) => 1u8,
                Some(false) => 0u8,
                None => NA_INT8 as u8,
            })
            .collect();
        Column::new(SType::Bool8, values.len(), bytes).expect("in-memory bool layout")
    }

    pub fn from_i32s(values: &[Option<i32>]) -> Column {
        let mut bytes = Vec::with_capacity(values.len() * 4);
        for v in values {
            bytes.extend_from_slice(&v.unwrap_or(NA_INT32).to_ne_bytes());
        }
        Column::new(SType::Int32, values.len(), bytes).expect("in-memory i4 layout")
    }

    pub fn from_i64s(values: &[Option<i64>]) -> Column {
        let mut bytes = Vec::with_capacity(values.len() * 8);
        for v in values {
            bytes.extend_from_slice(&v.unwrap_or(NA_INT64).to_ne_bytes());
        }
        Column::new(SType::Int64, values.len(), bytes).expect("in-memory i8 layout")
    }

    pub fn from_f64s(values: &[Option<f64>]) -> Column {
        let mut bytes = Vec::with_capacity(values.len() * 8);
        for v in values {
            bytes.extend_from_slice(&v.unwrap_or(f64::NAN).to_ne_bytes());
        }
        Column::new(SType::Float64, values.len(), bytes).expect("in-memory f8 layout")
    }

    /// Build an in-memory `s4` column.
    ///
    /// `None` is encoded the way the disk format encodes it: the cumulative
    /// offset keeps advancing and its sign goes negative. A `None` before any
    /// character bytes exist has magnitude zero, which cannot carry a sign;
    /// it decodes back as an empty string. The disk format shares this limit.
    pub fn from_strs(values: &[Option<&str>]) -> Column {
        let mut chars: Vec<u8> = Vec::new();
        let mut offsets: Vec<i32> = Vec::with_capacity(values.len() + 1);
        offsets.push(0);
        for v in values {
            match v {
                Some(s) => {
                    chars.extend_from_slice(s.as_bytes());
                    offsets.push(chars.len() as i32);
                }
                None => offsets.push(-(chars.len() as i32)),
            }
        }
        let mut bytes = Vec::with_capacity(offsets.len() * 4 + chars.len());
        for off in offsets {
            bytes.extend_from_slice(&off.to_ne_bytes());
        }
        bytes.extend_from_slice(&chars);
        Column::new(SType::Str32, values.len(), bytes).expect("in-memory string layout")
    }
}
