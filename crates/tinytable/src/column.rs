use crate::aggregate::{reduce, Aggregation};
use crate::error::{Axis, TableError, TableResult};
use crate::filter::Filter;
use crate::indexing::resolve_position;
use crate::store::ViewHandle;
use crate::value::{arithmetic, ArithOp, Label, Value, ValueKind};
use std::collections::{HashMap, HashSet};
use std::ops::{Add, Div, Mul, Rem, Sub};
use std::rc::Rc;

/// A view of one column.
///
/// Holds its own copy of the values. While attached, [`Column::set`], [`Column::cast_as`] and
/// [`Column::drop`] also write to the table the view was taken from. Removing rows from that
/// table, or removing or renaming this column, detaches the view: later writes fail with
/// [`TableError::Detached`]. Edits to other columns leave it attached.
#[derive(Clone, Debug)]
pub struct Column {
    name: Option<String>,
    values: Vec<Value>,
    labels: Option<Vec<Label>>,
    parent: Option<ViewHandle>,
}

impl Column {
    /// A standalone column with no parent table.
    pub fn new<V: Into<Value>>(name: impl Into<String>, values: Vec<V>) -> Self {
        Self {
            name: Some(name.into()),
            values: values.into_iter().map(Into::into).collect(),
            labels: None,
            parent: None,
        }
    }

    pub(crate) fn unnamed(values: Vec<Value>) -> Self {
        Self {
            name: None,
            values,
            labels: None,
            parent: None,
        }
    }

    pub(crate) fn attached(
        name: &str,
        values: Vec<Value>,
        labels: Option<Vec<Label>>,
        parent: ViewHandle,
    ) -> Self {
        Self {
            name: Some(name.to_string()),
            values,
            labels,
            parent: Some(parent),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.values.clone()
    }

    pub fn labels(&self) -> Option<&[Label]> {
        self.labels.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// True while writes still reach the parent table.
    pub fn is_attached(&self) -> bool {
        self.parent.as_ref().is_some_and(ViewHandle::is_current)
    }

    pub fn get(&self, index: i64) -> TableResult<&Value> {
        let index = resolve_position(index, self.values.len(), Axis::Row)?;
        Ok(&self.values[index])
    }

    /// Overwrites one element here and, if attached, in the parent table.
    pub fn set(&mut self, index: i64, value: impl Into<Value>) -> TableResult<()> {
        let index = resolve_position(index, self.values.len(), Axis::Row)?;
        let value = value.into();
        if let (Some(parent), Some(name)) = (&self.parent, &self.name) {
            parent.with_store(|store| store.set_value(name, index, value.clone()))?;
        }
        self.values[index] = value;
        Ok(())
    }

    /// Removes this column from its parent table and clears the link. No-op when standalone.
    pub fn drop(&mut self) -> TableResult<()> {
        if let (Some(parent), Some(name)) = (&self.parent, &self.name) {
            parent.with_store(|store| store.drop_column(name))?;
            log::debug!("column view {name} dropped from its table");
        }
        self.parent = None;
        Ok(())
    }

    /// Converts every element to `kind`, here and in the parent table.
    pub fn cast_as(&mut self, kind: ValueKind) -> TableResult<()> {
        let cast = self
            .values
            .iter()
            .map(|v| v.cast(kind))
            .collect::<TableResult<Vec<_>>>()?;
        if let (Some(parent), Some(name)) = (&self.parent, &self.name) {
            parent.with_store(|store| store.set_column(name, cast.clone()))?;
        }
        self.values = cast;
        Ok(())
    }

    fn filter(&self, predicate: impl Fn(&Value) -> bool + 'static) -> Filter {
        Filter::lazy(self.clone(), Rc::new(predicate))
    }

    pub fn equals(&self, value: impl Into<Value>) -> Filter {
        let value = value.into();
        self.filter(move |v| *v == value)
    }

    pub fn not_equals(&self, value: impl Into<Value>) -> Filter {
        let value = value.into();
        self.filter(move |v| *v != value)
    }

    pub fn gt(&self, value: impl Into<Value>) -> Filter {
        let value = value.into();
        self.filter(move |v| v.compare(&value).is_some_and(|o| o.is_gt()))
    }

    pub fn ge(&self, value: impl Into<Value>) -> Filter {
        let value = value.into();
        self.filter(move |v| v.compare(&value).is_some_and(|o| o.is_ge()))
    }

    pub fn lt(&self, value: impl Into<Value>) -> Filter {
        let value = value.into();
        self.filter(move |v| v.compare(&value).is_some_and(|o| o.is_lt()))
    }

    pub fn le(&self, value: impl Into<Value>) -> Filter {
        let value = value.into();
        self.filter(move |v| v.compare(&value).is_some_and(|o| o.is_le()))
    }

    pub fn isin<I, V>(&self, values: I) -> Filter
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let set: HashSet<Value> = values.into_iter().map(Into::into).collect();
        self.filter(move |v| set.contains(v))
    }

    pub fn notin<I, V>(&self, values: I) -> Filter
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let set: HashSet<Value> = values.into_iter().map(Into::into).collect();
        self.filter(move |v| !set.contains(v))
    }

    /// A filter driven by an arbitrary predicate.
    pub fn matches(&self, predicate: impl Fn(&Value) -> bool + 'static) -> Filter {
        self.filter(predicate)
    }

    /// `self op rhs` elementwise, as a new detached column.
    pub fn apply(&self, op: ArithOp, rhs: impl Into<Value>) -> TableResult<Column> {
        let rhs = rhs.into();
        let values = self
            .values
            .iter()
            .map(|v| arithmetic(op, v, &rhs))
            .collect::<TableResult<Vec<_>>>()?;
        Ok(self.derived(values))
    }

    /// `self op other` pairwise; both columns must have the same length.
    pub fn apply_column(&self, op: ArithOp, other: &Column) -> TableResult<Column> {
        if other.len() != self.len() {
            return Err(TableError::LengthMismatch {
                column: other.name.clone().unwrap_or_default(),
                expected: self.len(),
                actual: other.len(),
            });
        }
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| arithmetic(op, a, b))
            .collect::<TableResult<Vec<_>>>()?;
        Ok(self.derived(values))
    }

    pub fn floor_div(&self, rhs: impl Into<Value>) -> TableResult<Column> {
        self.apply(ArithOp::FloorDiv, rhs)
    }

    pub fn pow(&self, rhs: impl Into<Value>) -> TableResult<Column> {
        self.apply(ArithOp::Pow, rhs)
    }

    fn derived(&self, values: Vec<Value>) -> Column {
        Column {
            name: self.name.clone(),
            values,
            labels: self.labels.clone(),
            parent: None,
        }
    }

    /// Occurrences of each distinct value, in first-occurrence order.
    pub fn value_counts(&self) -> Vec<(Value, usize)> {
        let mut slots: HashMap<&Value, usize> = HashMap::new();
        let mut counts: Vec<(Value, usize)> = Vec::new();
        for v in &self.values {
            match slots.get(v) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    slots.insert(v, counts.len());
                    counts.push((v.clone(), 1));
                }
            }
        }
        counts
    }

    /// Distinct values in first-occurrence order.
    pub fn unique(&self) -> Vec<Value> {
        self.value_counts().into_iter().map(|(v, _)| v).collect()
    }

    /// Sum of the non-null elements. Fails on text, booleans and all-null columns.
    pub fn sum(&self) -> TableResult<Value> {
        reduce(Aggregation::Sum, &self.values)
    }

    pub fn aggregate(&self, kind: Aggregation) -> TableResult<Value> {
        reduce(kind, &self.values)
    }
}

impl std::ops::Index<usize> for Column {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.values[index]
    }
}

impl<'a> IntoIterator for &'a Column {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

macro_rules! column_ops {
    ($($trait:ident, $method:ident, $op:expr;)*) => {$(
        impl<'b> $trait<&'b Column> for &Column {
            type Output = TableResult<Column>;

            fn $method(self, rhs: &'b Column) -> Self::Output {
                self.apply_column($op, rhs)
            }
        }

        impl $trait<Value> for &Column {
            type Output = TableResult<Column>;

            fn $method(self, rhs: Value) -> Self::Output {
                self.apply($op, rhs)
            }
        }

        impl $trait<i64> for &Column {
            type Output = TableResult<Column>;

            fn $method(self, rhs: i64) -> Self::Output {
                self.apply($op, rhs)
            }
        }

        impl $trait<f64> for &Column {
            type Output = TableResult<Column>;

            fn $method(self, rhs: f64) -> Self::Output {
                self.apply($op, rhs)
            }
        }
    )*};
}

column_ops! {
    Add, add, ArithOp::Add;
    Sub, sub, ArithOp::Sub;
    Mul, mul, ArithOp::Mul;
    Div, div, ArithOp::Div;
    Rem, rem, ArithOp::Rem;
}
