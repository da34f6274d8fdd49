//! Purely positional two-axis indexing.

use crate::error::{Axis, TableError, TableResult};
use crate::indexing::{resolve_position, Assignment, Selection, Slice};
use crate::table::{resolve_positions, RowEdit, Table};
use crate::value::Value;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

/// One axis of a positional key.
#[derive(Clone, Debug, PartialEq)]
pub enum Indexer {
    Scalar(Value),
    List(Vec<Value>),
    Slice(Slice),
}

/// A positional key: one row selector, or a `(rows, columns)` tuple.
#[derive(Clone, Debug, PartialEq)]
pub enum IlocKey {
    Single(Indexer),
    Tuple(Vec<Indexer>),
}

macro_rules! indexer_from {
    ($($int:ty),*) => {$(
        impl From<$int> for Indexer {
            fn from(v: $int) -> Self {
                Indexer::Scalar(Value::from(v))
            }
        }

        impl From<Vec<$int>> for Indexer {
            fn from(v: Vec<$int>) -> Self {
                Indexer::List(v.into_iter().map(Value::from).collect())
            }
        }

        impl From<Range<$int>> for Indexer {
            fn from(r: Range<$int>) -> Self {
                Indexer::Slice(r.into())
            }
        }

        impl From<RangeFrom<$int>> for Indexer {
            fn from(r: RangeFrom<$int>) -> Self {
                Indexer::Slice(r.into())
            }
        }

        impl From<RangeTo<$int>> for Indexer {
            fn from(r: RangeTo<$int>) -> Self {
                Indexer::Slice(r.into())
            }
        }

        impl From<$int> for IlocKey {
            fn from(v: $int) -> Self {
                IlocKey::Single(v.into())
            }
        }

        impl From<Vec<$int>> for IlocKey {
            fn from(v: Vec<$int>) -> Self {
                IlocKey::Single(v.into())
            }
        }

        impl From<Range<$int>> for IlocKey {
            fn from(r: Range<$int>) -> Self {
                IlocKey::Single(r.into())
            }
        }
    )*};
}

indexer_from!(i32, i64);

impl From<Value> for Indexer {
    fn from(v: Value) -> Self {
        Indexer::Scalar(v)
    }
}

impl From<Vec<Value>> for Indexer {
    fn from(v: Vec<Value>) -> Self {
        Indexer::List(v)
    }
}

impl From<Slice> for Indexer {
    fn from(v: Slice) -> Self {
        Indexer::Slice(v)
    }
}

impl From<RangeFull> for Indexer {
    fn from(_: RangeFull) -> Self {
        Indexer::Slice(Slice::full())
    }
}

impl From<Indexer> for IlocKey {
    fn from(v: Indexer) -> Self {
        IlocKey::Single(v)
    }
}

impl From<Value> for IlocKey {
    fn from(v: Value) -> Self {
        IlocKey::Single(v.into())
    }
}

impl From<Vec<Value>> for IlocKey {
    fn from(v: Vec<Value>) -> Self {
        IlocKey::Single(v.into())
    }
}

impl From<Slice> for IlocKey {
    fn from(v: Slice) -> Self {
        IlocKey::Single(v.into())
    }
}

impl<A: Into<Indexer>, B: Into<Indexer>> From<(A, B)> for IlocKey {
    fn from((rows, columns): (A, B)) -> Self {
        IlocKey::Tuple(vec![rows.into(), columns.into()])
    }
}

impl<A: Into<Indexer>, B: Into<Indexer>, C: Into<Indexer>> From<(A, B, C)> for IlocKey {
    fn from((a, b, c): (A, B, C)) -> Self {
        IlocKey::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

fn location(value: &Value) -> TableResult<i64> {
    match value {
        Value::Int(i) => Ok(*i),
        _ => Err(TableError::NonIntegerLocation),
    }
}

/// Positions picked by one indexer, and whether it was a single scalar.
fn resolve_axis(indexer: &Indexer, len: usize, axis: Axis) -> TableResult<(Vec<usize>, bool)> {
    match indexer {
        Indexer::Scalar(v) => Ok((vec![resolve_position(location(v)?, len, axis)?], true)),
        Indexer::List(items) => {
            let positions = items.iter().map(location).collect::<TableResult<Vec<_>>>()?;
            Ok((resolve_positions(&positions, len, axis)?, false))
        }
        Indexer::Slice(slice) => Ok((slice.positions(len)?, false)),
    }
}

fn split(key: IlocKey) -> TableResult<(Indexer, Option<Indexer>)> {
    match key {
        IlocKey::Single(rows) => Ok((rows, None)),
        IlocKey::Tuple(parts) if parts.len() > 2 => Err(TableError::TooManyIndexers(parts.len())),
        IlocKey::Tuple(parts) => {
            let mut parts = parts.into_iter();
            let rows = parts
                .next()
                .ok_or_else(|| TableError::UnsupportedKey("empty location tuple".to_string()))?;
            Ok((rows, parts.next()))
        }
    }
}

/// Read access by position. Obtained from [`Table::iloc`].
pub struct Iloc<'a> {
    table: &'a Table,
}

impl Iloc<'_> {
    /// A single integer gives a row view, scalar pairs give a value, anything else a new table.
    pub fn get(&self, key: impl Into<IlocKey>) -> TableResult<Selection> {
        let table = self.table;
        let (rows, columns) = split(key.into())?;
        let (row_positions, row_scalar) = resolve_axis(&rows, table.row_count(), Axis::Row)?;
        let Some(columns) = columns else {
            if row_scalar {
                return Ok(Selection::Row(table.row_at(row_positions[0])));
            }
            return Ok(Selection::Table(table.select_rows(&row_positions)));
        };

        let store = table.store();
        let (col_positions, col_scalar) =
            resolve_axis(&columns, store.column_count(), Axis::Column)?;
        if row_scalar && col_scalar {
            let value = store.column_at(col_positions[0])[row_positions[0]].clone();
            return Ok(Selection::Value(value));
        }
        let block = store.select_block(&row_positions, &col_positions)?;
        Ok(Selection::Table(Table::from_store(block)))
    }
}

/// Write access by position. Obtained from [`Table::iloc_mut`].
pub struct IlocMut<'a> {
    table: &'a mut Table,
}

impl IlocMut<'_> {
    pub fn get(&self, key: impl Into<IlocKey>) -> TableResult<Selection> {
        self.table.iloc().get(key)
    }

    /// A row position takes a row edit; a `(row, column)` pair takes a single value.
    pub fn set(&mut self, key: impl Into<IlocKey>, value: impl Into<Assignment>) -> TableResult<()> {
        let (rows, columns) = split(key.into())?;
        let row = match &rows {
            Indexer::Scalar(v) => location(v)?,
            _ => {
                return Err(TableError::UnsupportedKey(
                    "assignment needs a single row position".to_string(),
                ))
            }
        };
        match (columns, value.into()) {
            (None, Assignment::Row(edit)) => self.table.edit_row(row, edit),
            (None, Assignment::Column(values)) => self.table.edit_row(row, RowEdit::Values(values)),
            (Some(Indexer::Scalar(column)), Assignment::Value(value)) => {
                let name = {
                    let store = self.table.store();
                    let idx =
                        resolve_position(location(&column)?, store.column_count(), Axis::Column)?;
                    store.names()[idx].clone()
                };
                self.table.edit_value(&name, row, value)
            }
            _ => Err(TableError::UnsupportedKey(
                "positional assignment takes a row edit for a row or a value for a cell"
                    .to_string(),
            )),
        }
    }
}

impl Table {
    pub fn iloc(&self) -> Iloc<'_> {
        Iloc { table: self }
    }

    pub fn iloc_mut(&mut self) -> IlocMut<'_> {
        IlocMut { table: self }
    }
}
