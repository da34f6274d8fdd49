use crate::error::{TableError, TableResult};
use crate::table::Table;
use crate::value::{Value, ValueMap};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// A column reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Aggregation {
    Sum,
    /// Number of values, nulls included.
    Count,
    Mean,
    Min,
    Max,
    /// Sample standard deviation.
    Std,
    /// Population standard deviation.
    Pstd,
    /// Most frequent value; ties go to the value seen first.
    Mode,
    /// Number of distinct values, null counted as a value.
    Nunique,
}

impl Aggregation {
    pub const ALL: [Aggregation; 9] = [
        Aggregation::Sum,
        Aggregation::Count,
        Aggregation::Mean,
        Aggregation::Min,
        Aggregation::Max,
        Aggregation::Std,
        Aggregation::Pstd,
        Aggregation::Mode,
        Aggregation::Nunique,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Count => "count",
            Aggregation::Mean => "mean",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Std => "std",
            Aggregation::Pstd => "pstd",
            Aggregation::Mode => "mode",
            Aggregation::Nunique => "nunique",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Aggregation {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Aggregation::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| TableError::invalid(format!("unknown aggregation: {s}")))
    }
}

fn numbers(kind: Aggregation, values: &[&Value]) -> TableResult<Vec<f64>> {
    values
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                TableError::invalid(format!("cannot take {kind} of {} values", v.kind()))
            })
        })
        .collect()
}

fn sum(values: &[&Value]) -> TableResult<Value> {
    if values.iter().all(|v| matches!(v, Value::Int(_))) {
        let mut total: i64 = 0;
        for v in values.iter().filter_map(|v| v.as_i64()) {
            total = total
                .checked_add(v)
                .ok_or_else(|| TableError::invalid("integer overflow in sum"))?;
        }
        return Ok(Value::Int(total));
    }
    Ok(Value::Float(numbers(Aggregation::Sum, values)?.iter().sum()))
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn deviation(xs: &[f64], ddof: usize) -> TableResult<Value> {
    if xs.len() <= ddof {
        return Err(TableError::invalid(format!(
            "standard deviation needs more than {ddof} values"
        )));
    }
    let m = mean(xs);
    let squares: f64 = xs.iter().map(|x| (x - m) * (x - m)).sum();
    Ok(Value::Float((squares / (xs.len() - ddof) as f64).sqrt()))
}

/// Smallest (`want == Less`) or largest (`want == Greater`) value. All values must be
/// mutually orderable.
fn extreme(kind: Aggregation, values: &[&Value], want: Ordering) -> TableResult<Value> {
    let mut best = values[0];
    for &v in &values[1..] {
        let ord = v.compare(best).ok_or_else(|| {
            TableError::invalid(format!(
                "cannot take {kind} of mixed {} and {} values",
                v.kind(),
                best.kind()
            ))
        })?;
        if ord == want {
            best = v;
        }
    }
    if best.compare(best).is_none() {
        return Err(TableError::invalid(format!("cannot take {kind} of NaN")));
    }
    Ok(best.clone())
}

fn mode(values: &[&Value]) -> Value {
    let mut slots: HashMap<&Value, usize> = HashMap::new();
    let mut counts: Vec<(&Value, usize)> = Vec::new();
    for &v in values {
        match slots.get(v) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(v, counts.len());
                counts.push((v, 1));
            }
        }
    }
    let mut best = counts[0];
    for &entry in &counts[1..] {
        if entry.1 > best.1 {
            best = entry;
        }
    }
    best.0.clone()
}

/// Reduces one column. Nulls are skipped except by `Count` and `Nunique`; a column with no
/// non-null values fails for every other reduction.
pub(crate) fn reduce(kind: Aggregation, values: &[Value]) -> TableResult<Value> {
    match kind {
        Aggregation::Count => Ok(Value::from(values.len())),
        Aggregation::Nunique => {
            let distinct: HashSet<&Value> = values.iter().collect();
            Ok(Value::from(distinct.len()))
        }
        _ => reduce_present(kind, values.iter().filter(|v| !v.is_null()).collect()),
    }
}

fn reduce_present(kind: Aggregation, present: Vec<&Value>) -> TableResult<Value> {
    if present.is_empty() {
        return Err(TableError::invalid(format!("no values to take {kind} of")));
    }
    match kind {
        Aggregation::Sum => sum(&present),
        Aggregation::Mean => Ok(Value::Float(mean(&numbers(kind, &present)?))),
        Aggregation::Min => extreme(kind, &present, Ordering::Less),
        Aggregation::Max => extreme(kind, &present, Ordering::Greater),
        Aggregation::Std => deviation(&numbers(kind, &present)?, 1),
        Aggregation::Pstd => deviation(&numbers(kind, &present)?, 0),
        Aggregation::Mode => Ok(mode(&present)),
        Aggregation::Count => Ok(Value::from(present.len())),
        Aggregation::Nunique => {
            let distinct: HashSet<&Value> = present.into_iter().collect();
            Ok(Value::from(distinct.len()))
        }
    }
}

/// Applies `kind` to every column of `table`, omitting columns it is undefined for.
pub(crate) fn aggregate_columns(table: &Table, kind: Aggregation) -> ValueMap {
    let store = table.store();
    let mut out = ValueMap::new();
    for (name, values) in store.columns() {
        match reduce(kind, values) {
            Ok(value) => {
                out.insert(name.clone(), value);
            }
            Err(err) => log::debug!("omitting column {name} from {kind}: {err}"),
        }
    }
    out
}

impl Table {
    /// Per-column reduction. Columns the reduction is undefined for are left out.
    pub fn aggregate(&self, kind: Aggregation) -> ValueMap {
        aggregate_columns(self, kind)
    }

    pub fn sum(&self) -> ValueMap {
        self.aggregate(Aggregation::Sum)
    }

    pub fn count(&self) -> ValueMap {
        self.aggregate(Aggregation::Count)
    }

    pub fn mean(&self) -> ValueMap {
        self.aggregate(Aggregation::Mean)
    }

    pub fn min(&self) -> ValueMap {
        self.aggregate(Aggregation::Min)
    }

    pub fn max(&self) -> ValueMap {
        self.aggregate(Aggregation::Max)
    }

    pub fn std(&self) -> ValueMap {
        self.aggregate(Aggregation::Std)
    }

    pub fn pstd(&self) -> ValueMap {
        self.aggregate(Aggregation::Pstd)
    }

    pub fn mode(&self) -> ValueMap {
        self.aggregate(Aggregation::Mode)
    }

    pub fn nunique(&self) -> ValueMap {
        self.aggregate(Aggregation::Nunique)
    }
}
