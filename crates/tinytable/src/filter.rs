use crate::column::Column;
use crate::error::{Axis, TableError, TableResult};
use crate::indexing::resolve_position;
use crate::value::Value;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::rc::Rc;

/// A boolean row selector.
///
/// Comparison methods on [`Column`] produce a lazy filter that evaluates its predicate on
/// demand. Combining filters with `&`, `|` or `!` materializes the result into a chained
/// filter holding plain booleans. `&` and `|` need operands of the same length.
#[derive(Clone)]
pub enum Filter {
    Lazy {
        column: Column,
        predicate: Rc<dyn Fn(&Value) -> bool>,
    },
    Chained(Vec<bool>),
}

impl Filter {
    pub(crate) fn lazy(column: Column, predicate: Rc<dyn Fn(&Value) -> bool>) -> Self {
        Filter::Lazy { column, predicate }
    }

    pub fn from_mask(mask: Vec<bool>) -> Self {
        Filter::Chained(mask)
    }

    pub fn len(&self) -> usize {
        match self {
            Filter::Lazy { column, .. } => column.len(),
            Filter::Chained(mask) => mask.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Filter::Lazy { .. })
    }

    /// Evaluates one position. Negative positions count from the end.
    pub fn get(&self, index: i64) -> TableResult<bool> {
        let index = resolve_position(index, self.len(), Axis::Row)?;
        Ok(match self {
            Filter::Lazy { column, predicate } => predicate(&column[index]),
            Filter::Chained(mask) => mask[index],
        })
    }

    pub fn iter(&self) -> FilterIter<'_> {
        FilterIter {
            filter: self,
            next: 0,
        }
    }

    pub fn to_vec(&self) -> Vec<bool> {
        self.iter().collect()
    }

    pub fn contains(&self, value: bool) -> bool {
        self.iter().any(|b| b == value)
    }

    pub fn count(&self, value: bool) -> usize {
        self.iter().filter(|&b| b == value).count()
    }

    /// First position in `start..stop` holding `value`.
    pub fn index(&self, value: bool, start: usize, stop: Option<usize>) -> Option<usize> {
        let stop = stop.unwrap_or(self.len()).min(self.len());
        (start..stop).find(|&i| self.at(i) == value)
    }

    fn at(&self, index: usize) -> bool {
        match self {
            Filter::Lazy { column, predicate } => predicate(&column[index]),
            Filter::Chained(mask) => mask[index],
        }
    }

    pub fn and(&self, other: &Filter) -> TableResult<Filter> {
        self.combine(other, |a, b| a && b)
    }

    pub fn or(&self, other: &Filter) -> TableResult<Filter> {
        self.combine(other, |a, b| a || b)
    }

    fn combine(&self, other: &Filter, op: impl Fn(bool, bool) -> bool) -> TableResult<Filter> {
        if self.len() != other.len() {
            return Err(TableError::LengthMismatch {
                column: "<filter>".to_string(),
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(Filter::Chained(
            self.iter().zip(other.iter()).map(|(a, b)| op(a, b)).collect(),
        ))
    }
}

/// Restartable iterator over a filter's booleans.
pub struct FilterIter<'a> {
    filter: &'a Filter,
    next: usize,
}

impl Iterator for FilterIter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.next >= self.filter.len() {
            return None;
        }
        let out = self.filter.at(self.next);
        self.next += 1;
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.filter.len().saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for FilterIter<'_> {}

impl<'a> IntoIterator for &'a Filter {
    type Item = bool;
    type IntoIter = FilterIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl BitAnd for &Filter {
    type Output = TableResult<Filter>;

    fn bitand(self, rhs: Self) -> TableResult<Filter> {
        self.and(rhs)
    }
}

impl BitOr for &Filter {
    type Output = TableResult<Filter>;

    fn bitor(self, rhs: Self) -> TableResult<Filter> {
        self.or(rhs)
    }
}

impl BitAnd for Filter {
    type Output = TableResult<Filter>;

    fn bitand(self, rhs: Filter) -> TableResult<Filter> {
        self.and(&rhs)
    }
}

impl BitOr for Filter {
    type Output = TableResult<Filter>;

    fn bitor(self, rhs: Filter) -> TableResult<Filter> {
        self.or(&rhs)
    }
}

impl Not for &Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        Filter::Chained(self.iter().map(|b| !b).collect())
    }
}

impl Not for Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        !&self
    }
}

impl PartialEq<Vec<bool>> for Filter {
    fn eq(&self, other: &Vec<bool>) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, &b)| a == b)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_lazy() { "Lazy" } else { "Chained" };
        f.debug_tuple(kind).field(&self.to_vec()).finish()
    }
}
