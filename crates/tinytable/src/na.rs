//! Missing-value detection, filling and dropping.

use crate::error::{TableError, TableResult};
use crate::store::Store;
use crate::table::Table;
use crate::value::{Value, ValueMap};
use std::str::FromStr;

/// What to fill nulls with.
#[derive(Clone, Debug, PartialEq)]
pub enum FillValue {
    /// The same value in every column.
    Scalar(Value),
    /// A value per column; columns not named are left alone.
    PerColumn(ValueMap),
}

macro_rules! fill_scalar_from {
    ($($ty:ty),*) => {$(
        impl From<$ty> for FillValue {
            fn from(v: $ty) -> Self {
                FillValue::Scalar(v.into())
            }
        }
    )*};
}

fill_scalar_from!(Value, i64, i32, f64, bool, &str, String);

impl From<ValueMap> for FillValue {
    fn from(fills: ValueMap) -> Self {
        FillValue::PerColumn(fills)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillMethod {
    /// Carry the last non-null value forward.
    Forward,
    /// Carry the next non-null value backward.
    Backward,
}

impl FromStr for FillMethod {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ffill" | "pad" => Ok(FillMethod::Forward),
            "bfill" | "backfill" => Ok(FillMethod::Backward),
            other => Err(TableError::invalid(format!(
                "unknown fill method {other:?}; expected ffill, pad, bfill or backfill"
            ))),
        }
    }
}

/// Options for [`Table::fillna`]. Exactly one of `value` and `method` may be set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FillNaOptions {
    pub value: Option<FillValue>,
    pub method: Option<FillMethod>,
    /// Most consecutive nulls filled in one run.
    pub limit: Option<usize>,
}

impl FillNaOptions {
    pub fn value(value: impl Into<FillValue>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn method(method: FillMethod) -> Self {
        Self {
            method: Some(method),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DropHow {
    /// Drop a row with any null.
    #[default]
    Any,
    /// Drop a row only if every considered value is null.
    All,
}

impl FromStr for DropHow {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(DropHow::Any),
            "all" => Ok(DropHow::All),
            other => Err(TableError::invalid(format!(
                "unknown dropna mode {other:?}; expected any or all"
            ))),
        }
    }
}

/// Options for [`Table::dropna`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DropNaOptions {
    pub how: DropHow,
    /// Keep rows with at least this many non-null values. Overrides `how`.
    pub thresh: Option<usize>,
    /// Only consider these columns.
    pub subset: Option<Vec<String>>,
}

/// Fills the null runs of one column, at most `limit` cells per run.
fn fill_directional(values: &mut [Value], method: FillMethod, limit: Option<usize>) {
    let order: Box<dyn Iterator<Item = usize>> = match method {
        FillMethod::Forward => Box::new(0..values.len()),
        FillMethod::Backward => Box::new((0..values.len()).rev()),
    };
    let mut last: Option<Value> = None;
    let mut run = 0;
    for i in order {
        if values[i].is_null() {
            if let Some(fill) = &last {
                if limit.map_or(true, |limit| run < limit) {
                    values[i] = fill.clone();
                }
            }
            run += 1;
        } else {
            last = Some(values[i].clone());
            run = 0;
        }
    }
}

fn fill_value(values: &mut [Value], fill: &Value, limit: Option<usize>) {
    let mut run = 0;
    for v in values.iter_mut() {
        if v.is_null() {
            if limit.map_or(true, |limit| run < limit) {
                *v = fill.clone();
            }
            run += 1;
        } else {
            run = 0;
        }
    }
}

impl Table {
    fn map_cells(&self, f: impl Fn(&Value) -> bool) -> Table {
        let store = self.store();
        let columns = store
            .columns()
            .map(|(name, values)| {
                let flags = values.iter().map(|v| Value::Bool(f(v))).collect();
                (name.clone(), flags)
            })
            .collect();
        Table::from_store(Store::assemble(columns, store.labels().map(<[_]>::to_vec)))
    }

    /// Same-shape table of booleans, true where the cell is null.
    pub fn isna(&self) -> Table {
        self.map_cells(Value::is_null)
    }

    pub fn notna(&self) -> Table {
        self.map_cells(|v| !v.is_null())
    }

    pub fn isnull(&self) -> Table {
        self.isna()
    }

    pub fn notnull(&self) -> Table {
        self.notna()
    }

    /// A copy with nulls filled.
    pub fn fillna(&self, options: &FillNaOptions) -> TableResult<Table> {
        let mut copy = self.copy();
        copy.fillna_inplace(options)?;
        Ok(copy)
    }

    pub fn fillna_inplace(&mut self, options: &FillNaOptions) -> TableResult<()> {
        let mut record = self.to_record();
        match (&options.value, options.method) {
            (Some(_), Some(_)) => {
                return Err(TableError::invalid(
                    "cannot fill with both a value and a method",
                ))
            }
            (None, None) => return Ok(()),
            (Some(FillValue::Scalar(fill)), None) => {
                for (_, values) in &mut record.columns {
                    fill_value(values, fill, options.limit);
                }
            }
            (Some(FillValue::PerColumn(fills)), None) => {
                for (name, values) in &mut record.columns {
                    if let Some(fill) = fills.get(name) {
                        fill_value(values, fill, options.limit);
                    }
                }
            }
            (None, Some(method)) => {
                for (_, values) in &mut record.columns {
                    fill_directional(values, method, options.limit);
                }
            }
        }
        let mut store = self.store_mut();
        for (name, values) in record.columns {
            store.set_column(&name, values)?;
        }
        Ok(())
    }

    fn rows_to_keep(&self, options: &DropNaOptions) -> TableResult<Vec<usize>> {
        let store = self.store();
        let considered = match &options.subset {
            Some(subset) => subset
                .iter()
                .map(|name| store.column(name))
                .collect::<TableResult<Vec<_>>>()?,
            None => store.columns().map(|(_, values)| values.as_slice()).collect(),
        };
        if considered.is_empty() {
            return Ok((0..store.row_count()).collect());
        }
        let keep = |row: usize| {
            let present = considered.iter().filter(|c| !c[row].is_null()).count();
            match (options.thresh, options.how) {
                (Some(thresh), _) => present >= thresh,
                (None, DropHow::Any) => present == considered.len(),
                (None, DropHow::All) => present > 0,
            }
        };
        Ok((0..store.row_count()).filter(|&row| keep(row)).collect())
    }

    /// A copy without the rows `options` selects for dropping.
    pub fn dropna(&self, options: &DropNaOptions) -> TableResult<Table> {
        let rows = self.rows_to_keep(options)?;
        Ok(self.select_rows(&rows))
    }

    pub fn dropna_inplace(&mut self, options: &DropNaOptions) -> TableResult<()> {
        let rows = self.rows_to_keep(options)?;
        if rows.len() != self.row_count() {
            self.store_mut().retain_rows(&rows);
        }
        Ok(())
    }
}
