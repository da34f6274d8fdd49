mod aggregate;
mod column;
mod display;
mod error;
mod filter;
mod group;
mod iloc;
mod indexing;
mod join;
mod na;
mod record;
mod row;
mod store;
mod table;
mod value;

pub use crate::table::{RowEdit, Table};
pub use crate::value::{ArithOp, Label, Value, ValueKind, ValueMap};

pub use crate::column::Column;
pub use crate::filter::{Filter, FilterIter};
pub use crate::row::Row;

pub use crate::iloc::{Iloc, IlocKey, IlocMut, Indexer};
pub use crate::indexing::{resolve_position, resolve_range, Assignment, Key, Selection, Slice};

pub use crate::aggregate::Aggregation;
pub use crate::group::{Group, GroupKey};
pub use crate::join::JoinHow;
pub use crate::na::{DropHow, DropNaOptions, FillMethod, FillNaOptions, FillValue};

pub use crate::display::{render, DisplayOptions};
pub use crate::record::ColumnarRecord;

pub use crate::error::{Axis, TableError, TableResult};

/// Builds a `Vec<Value>` from heterogeneous literals.
///
/// ```
/// use tinytable::{values, Value};
/// assert_eq!(values![1, "a", Value::Null], vec![Value::Int(1), Value::from("a"), Value::Null]);
/// ```
#[macro_export]
macro_rules! values {
    ($($v:expr),* $(,)?) => {
        vec![$($crate::Value::from($v)),*]
    };
}
