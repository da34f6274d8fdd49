use crate::error::{TableError, TableResult};
use crate::value::{Label, Value};

/// The plain columnar shape exchanged with readers and writers: ordered `(name, values)` pairs
/// plus optional per-row labels.
///
/// A record is not validated on its own; [`crate::Table::from_record`] enforces the equal-length
/// and unique-name rules.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnarRecord {
    pub columns: Vec<(String, Vec<Value>)>,
    pub labels: Option<Vec<Label>>,
}

impl ColumnarRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from row-major data. Every row must have one value per name.
    pub fn from_rows<I, R>(names: Vec<String>, rows: I) -> TableResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = Value>,
    {
        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
        for (row_idx, row) in rows.into_iter().enumerate() {
            let row: Vec<Value> = row.into_iter().collect();
            if row.len() != names.len() {
                return Err(TableError::LengthMismatch {
                    column: format!("<row {row_idx}>"),
                    expected: names.len(),
                    actual: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        Ok(Self {
            columns: names.into_iter().zip(columns).collect(),
            labels: None,
        })
    }

    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Value>) {
        self.columns.push((name.into(), values));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Length of the first column (zero when there are no columns).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }

    /// Row-major copy of the values.
    pub fn rows(&self) -> Vec<Vec<Value>> {
        (0..self.row_count())
            .map(|r| {
                self.columns
                    .iter()
                    .map(|(_, values)| values.get(r).cloned().unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}
