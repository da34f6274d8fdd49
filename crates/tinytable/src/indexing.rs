//! Subscript keys and the position/range arithmetic shared by every indexing path.

use crate::column::Column;
use crate::error::{Axis, TableError, TableResult};
use crate::filter::Filter;
use crate::row::Row;
use crate::table::{RowEdit, Table};
use crate::value::{Label, Value};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

/// Resolves a possibly negative position against `len`.
pub fn resolve_position(index: i64, len: usize, axis: Axis) -> TableResult<usize> {
    let out_of_range = || TableError::OutOfRange { axis, index, len };
    let effective = if index < 0 {
        i128::from(index) + len as i128
    } else {
        i128::from(index)
    };
    if effective < 0 || effective >= len as i128 {
        return Err(out_of_range());
    }
    usize::try_from(effective).map_err(|_| out_of_range())
}

/// Expands `start:stop:step` over a sequence of `len` items into the selected positions.
///
/// Bounds are half-open and may be negative (counted from the end). Out-of-range bounds clamp
/// instead of failing. A negative step walks backward; its default start is the last item
/// and its default stop is one before the first. A zero step is rejected.
pub fn resolve_range(
    len: usize,
    start: Option<i64>,
    stop: Option<i64>,
    step: Option<i64>,
) -> TableResult<Vec<usize>> {
    let step = i128::from(step.unwrap_or(1));
    if step == 0 {
        return Err(TableError::invalid("slice step cannot be zero"));
    }
    let len = len as i128;
    let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };
    let clamp = |bound: Option<i64>, default: i128| match bound {
        None => default,
        Some(b) => {
            let mut b = i128::from(b);
            if b < 0 {
                b += len;
            }
            b.clamp(lower, upper)
        }
    };
    let (default_start, default_stop) = if step < 0 { (upper, lower) } else { (lower, upper) };
    let start = clamp(start, default_start);
    let stop = clamp(stop, default_stop);

    let mut positions = Vec::new();
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        // `i` stays within [0, len) inside the loop.
        positions.push(i as usize);
        i += step;
    }
    Ok(positions)
}

/// `start:stop:step` with optional parts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slice {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

impl Slice {
    pub fn new(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Self {
        Self { start, stop, step }
    }

    /// `..`: every position.
    pub fn full() -> Self {
        Self::default()
    }

    pub fn with_step(mut self, step: i64) -> Self {
        self.step = Some(step);
        self
    }

    /// Builds a slice from dynamically typed bounds. Each bound must be an integer or null.
    pub fn from_values(start: &Value, stop: &Value, step: &Value) -> TableResult<Self> {
        fn bound(v: &Value) -> TableResult<Option<i64>> {
            match v {
                Value::Null => Ok(None),
                Value::Int(i) => Ok(Some(*i)),
                other => Err(TableError::UnsupportedKey(format!(
                    "slice indices must be integers or null, got {}",
                    other.kind()
                ))),
            }
        }
        Ok(Self::new(bound(start)?, bound(stop)?, bound(step)?))
    }

    pub fn positions(&self, len: usize) -> TableResult<Vec<usize>> {
        resolve_range(len, self.start, self.stop, self.step)
    }
}

macro_rules! slice_from_ranges {
    ($($int:ty),*) => {$(
        impl From<Range<$int>> for Slice {
            fn from(r: Range<$int>) -> Self {
                Slice::new(Some(i64::from(r.start)), Some(i64::from(r.end)), None)
            }
        }

        impl From<RangeFrom<$int>> for Slice {
            fn from(r: RangeFrom<$int>) -> Self {
                Slice::new(Some(i64::from(r.start)), None, None)
            }
        }

        impl From<RangeTo<$int>> for Slice {
            fn from(r: RangeTo<$int>) -> Self {
                Slice::new(None, Some(i64::from(r.end)), None)
            }
        }

        impl From<Range<$int>> for Key {
            fn from(r: Range<$int>) -> Self {
                Key::Slice(r.into())
            }
        }

        impl From<RangeFrom<$int>> for Key {
            fn from(r: RangeFrom<$int>) -> Self {
                Key::Slice(r.into())
            }
        }

        impl From<RangeTo<$int>> for Key {
            fn from(r: RangeTo<$int>) -> Self {
                Key::Slice(r.into())
            }
        }
    )*};
}

slice_from_ranges!(i32, i64);

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self {
        Slice::full()
    }
}

/// A `[]` subscript.
#[derive(Clone, Debug)]
pub enum Key {
    /// Text selects a column, an integer selects a row.
    Scalar(Value),
    Slice(Slice),
    /// All booleans: a row mask. All text: a column list.
    List(Vec<Value>),
    Filter(Filter),
    Label(Label),
}

impl From<Value> for Key {
    fn from(v: Value) -> Self {
        Key::Scalar(v)
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::Scalar(v.into())
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Key::Scalar(v.into())
    }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Key::Scalar(v.into())
    }
}

impl From<i32> for Key {
    fn from(v: i32) -> Self {
        Key::Scalar(v.into())
    }
}

impl From<Slice> for Key {
    fn from(v: Slice) -> Self {
        Key::Slice(v)
    }
}

impl From<RangeFull> for Key {
    fn from(_: RangeFull) -> Self {
        Key::Slice(Slice::full())
    }
}

impl From<Vec<Value>> for Key {
    fn from(v: Vec<Value>) -> Self {
        Key::List(v)
    }
}

impl From<Vec<bool>> for Key {
    fn from(v: Vec<bool>) -> Self {
        Key::List(v.into_iter().map(Value::Bool).collect())
    }
}

impl From<Vec<&str>> for Key {
    fn from(v: Vec<&str>) -> Self {
        Key::List(v.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<String>> for Key {
    fn from(v: Vec<String>) -> Self {
        Key::List(v.into_iter().map(Value::Text).collect())
    }
}

impl From<Filter> for Key {
    fn from(v: Filter) -> Self {
        Key::Filter(v)
    }
}

impl From<&Filter> for Key {
    fn from(v: &Filter) -> Self {
        Key::Filter(v.clone())
    }
}

impl From<Label> for Key {
    fn from(v: Label) -> Self {
        Key::Label(v)
    }
}

/// What a subscript resolved to.
#[derive(Debug)]
pub enum Selection {
    Value(Value),
    Column(Column),
    Row(Row),
    Table(Table),
}

impl Selection {
    pub fn into_value(self) -> Option<Value> {
        match self {
            Selection::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_column(self) -> Option<Column> {
        match self {
            Selection::Column(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_row(self) -> Option<Row> {
        match self {
            Selection::Row(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_table(self) -> Option<Table> {
        match self {
            Selection::Table(t) => Some(t),
            _ => None,
        }
    }
}

/// The right-hand side of a subscript assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum Assignment {
    Value(Value),
    Column(Vec<Value>),
    Row(RowEdit),
}

impl From<RowEdit> for Assignment {
    fn from(edit: RowEdit) -> Self {
        Assignment::Row(edit)
    }
}

impl From<crate::value::ValueMap> for Assignment {
    fn from(items: crate::value::ValueMap) -> Self {
        Assignment::Row(RowEdit::Items(items))
    }
}

impl From<Vec<Value>> for Assignment {
    fn from(values: Vec<Value>) -> Self {
        Assignment::Column(values)
    }
}

impl From<Value> for Assignment {
    fn from(value: Value) -> Self {
        Assignment::Value(value)
    }
}

impl Table {
    /// Resolves a `[]` subscript.
    ///
    /// Text → column view, integer → row view, slice/mask/filter/column list → new table,
    /// label → row view of the labelled row.
    pub fn get(&self, key: impl Into<Key>) -> TableResult<Selection> {
        match key.into() {
            Key::Scalar(Value::Text(name)) => self.column(&name).map(Selection::Column),
            Key::Scalar(Value::Int(position)) => self.row(position).map(Selection::Row),
            Key::Scalar(other) => Err(TableError::UnsupportedKey(format!(
                "key must be text for column selection, an integer for row selection or a \
                 slice, list, filter or label; got {}",
                other.kind()
            ))),
            Key::Slice(slice) => self.slice(slice).map(Selection::Table),
            Key::List(items) => self.select_list(&items).map(Selection::Table),
            Key::Filter(filter) => self.filter(&filter).map(Selection::Table),
            Key::Label(label) => self.label_row(&label).map(Selection::Row),
        }
    }

    /// New table of the rows selected by `slice`.
    pub fn slice(&self, slice: impl Into<Slice>) -> TableResult<Table> {
        let rows = slice.into().positions(self.row_count())?;
        Ok(self.select_rows(&rows))
    }

    fn select_list(&self, items: &[Value]) -> TableResult<Table> {
        if items.iter().all(|v| matches!(v, Value::Bool(_))) {
            let mask: Vec<bool> = items.iter().filter_map(Value::as_bool).collect();
            return self.mask(&mask);
        }
        if items.iter().all(|v| matches!(v, Value::Text(_))) {
            let names: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            return self.only_columns(&names);
        }
        Err(TableError::UnsupportedKey(
            "list keys must be all booleans (row mask) or all text (column names)".to_string(),
        ))
    }

    /// Resolves a `[]` assignment: a column for a text key, a row edit for an integer key.
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Assignment>) -> TableResult<()> {
        match (key.into(), value.into()) {
            (Key::Scalar(Value::Text(name)), Assignment::Column(values)) => {
                self.edit_column(&name, values)
            }
            (Key::Scalar(Value::Int(position)), Assignment::Row(edit)) => {
                self.edit_row(position, edit)
            }
            (Key::Scalar(Value::Int(position)), Assignment::Column(values)) => {
                self.edit_row(position, RowEdit::Values(values))
            }
            (key, _) => Err(TableError::UnsupportedKey(format!(
                "cannot assign through key {key:?}"
            ))),
        }
    }
}
