use crate::value::Label;
use std::fmt;

pub type TableResult<T> = Result<T, TableError>;

/// Which axis of a table a position refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("all columns must be of the same length: {column} has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("{axis} index {index} out of range ({len} available)")]
    OutOfRange { axis: Axis, index: i64, len: usize },

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("no row labelled {0}")]
    UnknownLabel(Label),

    #[error("table has no labels")]
    MissingLabels,

    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("unsupported key: {0}")]
    UnsupportedKey(String),

    #[error("cannot index by location with a non-integer key")]
    NonIntegerLocation,

    #[error("too many indexers: expected at most 2, got {0}")]
    TooManyIndexers(usize),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("view is detached from its table")]
    Detached,
}

impl TableError {
    pub(crate) fn row_out_of_range(index: i64, len: usize) -> Self {
        TableError::OutOfRange {
            axis: Axis::Row,
            index,
            len,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        TableError::InvalidOperation(msg.into())
    }
}
