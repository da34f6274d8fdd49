use crate::aggregate::Aggregation;
use crate::error::{TableError, TableResult};
use crate::record::ColumnarRecord;
use crate::table::Table;
use crate::value::{Value, ValueMap};
use std::collections::HashMap;
use std::fmt;

/// The key of one group: a single value when grouping by one column, a tuple otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Scalar(Value),
    Tuple(Vec<Value>),
}

impl GroupKey {
    pub fn values(&self) -> &[Value] {
        match self {
            GroupKey::Scalar(v) => std::slice::from_ref(v),
            GroupKey::Tuple(vs) => vs,
        }
    }
}

impl From<Value> for GroupKey {
    fn from(v: Value) -> Self {
        GroupKey::Scalar(v)
    }
}

impl From<&str> for GroupKey {
    fn from(v: &str) -> Self {
        GroupKey::Scalar(v.into())
    }
}

impl From<i64> for GroupKey {
    fn from(v: i64) -> Self {
        GroupKey::Scalar(v.into())
    }
}

impl From<i32> for GroupKey {
    fn from(v: i32) -> Self {
        GroupKey::Scalar(v.into())
    }
}

impl From<Vec<Value>> for GroupKey {
    fn from(vs: Vec<Value>) -> Self {
        GroupKey::Tuple(vs)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Scalar(v) => write!(f, "{v}"),
            GroupKey::Tuple(vs) => {
                f.write_str("(")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Rows of a table partitioned by the values of one or more columns.
///
/// Groups appear in the order their key was first seen. Each group is an independent copy.
#[derive(Clone, Debug)]
pub struct Group {
    by: Vec<String>,
    groups: Vec<(GroupKey, Table)>,
}

impl Group {
    /// The grouping column names.
    pub fn by(&self) -> &[String] {
        &self.by
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &Table)> + '_ {
        self.groups.iter().map(|(k, t)| (k, t))
    }

    pub fn get(&self, index: usize) -> Option<(&GroupKey, &Table)> {
        self.groups.get(index).map(|(k, t)| (k, t))
    }

    pub fn get_key(&self, key: &GroupKey) -> Option<&Table> {
        self.groups.iter().find(|(k, _)| k == key).map(|(_, t)| t)
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> + '_ {
        self.groups.iter().map(|(k, _)| k)
    }

    /// Applies `kind` to each group. Groups with no aggregable column are skipped.
    pub fn aggregate(&self, kind: Aggregation) -> Vec<(GroupKey, ValueMap)> {
        self.groups
            .iter()
            .map(|(key, table)| (key.clone(), table.aggregate(kind)))
            .filter(|(_, result)| !result.is_empty())
            .collect()
    }

    pub fn sum(&self) -> Vec<(GroupKey, ValueMap)> {
        self.aggregate(Aggregation::Sum)
    }

    pub fn count(&self) -> Vec<(GroupKey, ValueMap)> {
        self.aggregate(Aggregation::Count)
    }

    pub fn mean(&self) -> Vec<(GroupKey, ValueMap)> {
        self.aggregate(Aggregation::Mean)
    }

    pub fn min(&self) -> Vec<(GroupKey, ValueMap)> {
        self.aggregate(Aggregation::Min)
    }

    pub fn max(&self) -> Vec<(GroupKey, ValueMap)> {
        self.aggregate(Aggregation::Max)
    }

    pub fn std(&self) -> Vec<(GroupKey, ValueMap)> {
        self.aggregate(Aggregation::Std)
    }

    pub fn pstd(&self) -> Vec<(GroupKey, ValueMap)> {
        self.aggregate(Aggregation::Pstd)
    }

    pub fn mode(&self) -> Vec<(GroupKey, ValueMap)> {
        self.aggregate(Aggregation::Mode)
    }

    pub fn nunique(&self) -> Vec<(GroupKey, ValueMap)> {
        self.aggregate(Aggregation::Nunique)
    }

    /// One row per group: the key columns, then each non-key column's result (null where the
    /// aggregation was undefined for that group).
    pub fn aggregate_table(&self, kind: Aggregation) -> TableResult<Table> {
        let mut value_columns: Vec<String> = Vec::new();
        let results: Vec<(&GroupKey, ValueMap)> = self
            .groups
            .iter()
            .map(|(key, table)| {
                let result = table.aggregate(kind);
                for name in result.keys() {
                    if !self.by.iter().any(|b| b == name)
                        && !value_columns.iter().any(|c| c == name)
                    {
                        value_columns.push(name.to_string());
                    }
                }
                (key, result)
            })
            .collect();

        let mut record = ColumnarRecord::new();
        for (i, name) in self.by.iter().enumerate() {
            let keys = results
                .iter()
                .map(|(key, _)| key.values().get(i).cloned().unwrap_or_default())
                .collect();
            record.push_column(name.clone(), keys);
        }
        for name in &value_columns {
            let values = results
                .iter()
                .map(|(_, result)| result.get(name).cloned().unwrap_or_default())
                .collect();
            record.push_column(name.clone(), values);
        }
        Table::from_record(record)
    }
}

impl IntoIterator for Group {
    type Item = (GroupKey, Table);
    type IntoIter = std::vec::IntoIter<(GroupKey, Table)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl Table {
    /// Partitions rows by the values of `by`, preserving row order and labels in each group.
    pub fn groupby<S: AsRef<str>>(&self, by: &[S]) -> TableResult<Group> {
        if by.is_empty() {
            return Err(TableError::invalid("groupby needs at least one column"));
        }
        let by: Vec<String> = by.iter().map(|s| s.as_ref().to_string()).collect();
        let mut partitions: Vec<(GroupKey, Vec<usize>)> = Vec::new();
        {
            let store = self.store();
            let key_columns = by
                .iter()
                .map(|name| store.column(name))
                .collect::<TableResult<Vec<_>>>()?;
            let mut slots: HashMap<GroupKey, usize> = HashMap::new();
            for row in 0..store.row_count() {
                let key = match key_columns.as_slice() {
                    [single] => GroupKey::Scalar(single[row].clone()),
                    many => GroupKey::Tuple(many.iter().map(|c| c[row].clone()).collect()),
                };
                match slots.get(&key) {
                    Some(&slot) => partitions[slot].1.push(row),
                    None => {
                        slots.insert(key.clone(), partitions.len());
                        partitions.push((key, vec![row]));
                    }
                }
            }
        }
        log::debug!("grouped by {by:?} into {} groups", partitions.len());
        let groups = partitions
            .into_iter()
            .map(|(key, rows)| (key, self.select_rows(&rows)))
            .collect();
        Ok(Group { by, groups })
    }
}
