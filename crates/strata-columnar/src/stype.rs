#![forbid(unsafe_code)]

use std::fmt;

/// Storage type of a column.
///
/// The tag fixes the element width, the interpretation of the bytes, and the
/// missing-value sentinel. [`SType::Void`] is only produced by failed name
/// lookups; it never describes a real column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SType {
    Void,
    Bool8,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Variable-length strings indexed by 32-bit offsets.
    Str32,
    /// Variable-length strings indexed by 64-bit offsets.
    Str64,
}

/// NA sentinel for `i1`/`b1` storage: the minimum representable value.
pub const NA_INT8: i8 = i8::MIN;
/// NA sentinel for `i2` storage.
pub const NA_INT16: i16 = i16::MIN;
/// NA sentinel for `i4` storage.
pub const NA_INT32: i32 = i32::MIN;
/// NA sentinel for `i8` storage.
pub const NA_INT64: i64 = i64::MIN;

/// Canonical two-character codes plus the three-character codes found in
/// older on-disk descriptors. Process-wide constant; lookups are exact-match.
const STYPE_NAMES: &[(&str, SType)] = &[
    ("b1", SType::Bool8),
    ("i1", SType::Int8),
    ("i2", SType::Int16),
    ("i4", SType::Int32),
    ("i8", SType::Int64),
    ("f4", SType::Float32),
    ("f8", SType::Float64),
    ("s4", SType::Str32),
    ("s8", SType::Str64),
    ("i1b", SType::Bool8),
    ("i1i", SType::Int8),
    ("i2i", SType::Int16),
    ("i4i", SType::Int32),
    ("i8i", SType::Int64),
    ("f4r", SType::Float32),
    ("f8r", SType::Float64),
    ("i4s", SType::Str32),
    ("i8s", SType::Str64),
];

impl SType {
    /// Resolve a storage type from its short code.
    ///
    /// Unrecognized input yields [`SType::Void`] rather than an error;
    /// callers decide whether that is fatal.
    pub fn from_name(name: &str) -> SType {
        STYPE_NAMES
            .iter()
            .find(|(code, _)| *code == name)
            .map(|&(_, stype)| stype)
            .unwrap_or(SType::Void)
    }

    /// Canonical short code.
    pub fn name(self) -> &'static str {
        match self {
            SType::Void => "void",
            SType::Bool8 => "b1",
            SType::Int8 => "i1",
            SType::Int16 => "i2",
            SType::Int32 => "i4",
            SType::Int64 => "i8",
            SType::Float32 => "f4",
            SType::Float64 => "f8",
            SType::Str32 => "s4",
            SType::Str64 => "s8",
        }
    }

    /// Bytes per element; for string types, bytes per offset slot.
    pub fn width(self) -> usize {
        match self {
            SType::Void => 0,
            SType::Bool8 | SType::Int8 => 1,
            SType::Int16 => 2,
            SType::Int32 | SType::Float32 | SType::Str32 => 4,
            SType::Int64 | SType::Float64 | SType::Str64 => 8,
        }
    }

    pub fn is_string(self) -> bool {
        matches!(self, SType::Str32 | SType::Str64)
    }
}

impl fmt::Display for SType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
