use crate::error::{TableError, TableResult};
use crate::record::ColumnarRecord;
use crate::table::Table;
use crate::value::Value;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JoinHow {
    /// Only rows whose key appears on both sides.
    #[default]
    Inner,
    /// Every left row; unmatched ones get nulls on the right.
    Left,
    /// Every right row; unmatched ones get nulls on the left.
    Right,
    /// Every row from both sides.
    Full,
}

impl JoinHow {
    fn keeps_unmatched_left(self) -> bool {
        matches!(self, JoinHow::Left | JoinHow::Full)
    }

    fn keeps_unmatched_right(self) -> bool {
        matches!(self, JoinHow::Right | JoinHow::Full)
    }
}

impl FromStr for JoinHow {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inner" => Ok(JoinHow::Inner),
            "left" => Ok(JoinHow::Left),
            "right" => Ok(JoinHow::Right),
            "full" => Ok(JoinHow::Full),
            other => Err(TableError::invalid(format!(
                "unknown join type {other:?}; expected \"inner\", \"left\", \"right\" or \"full\""
            ))),
        }
    }
}

const RIGHT_SUFFIX: &str = "_right";

impl Table {
    /// Joins `other` on `self[left_on] == other[right_on]`.
    ///
    /// Matched pairs come in left-row order, followed by unmatched right rows for
    /// [`JoinHow::Right`] and [`JoinHow::Full`]. Null keys never match. When both key columns
    /// share a name only the left one is kept; other right columns whose names clash with a
    /// left column are suffixed with `_right`. The result carries no labels.
    pub fn join(
        &self,
        other: &Table,
        left_on: &str,
        right_on: &str,
        how: JoinHow,
    ) -> TableResult<Table> {
        let left = self.store();
        let right = other.store();
        let left_keys = left.column(left_on)?;
        let right_keys = right.column(right_on)?;

        let mut lookup: HashMap<&Value, Vec<usize>> = HashMap::new();
        for (row, key) in right_keys.iter().enumerate() {
            if !key.is_null() {
                lookup.entry(key).or_default().push(row);
            }
        }

        let mut pairs: Vec<(Option<usize>, Option<usize>)> = Vec::new();
        let mut matched_right: HashSet<usize> = HashSet::new();
        for (l, key) in left_keys.iter().enumerate() {
            match lookup.get(key).filter(|_| !key.is_null()) {
                Some(rows) => {
                    for &r in rows {
                        pairs.push((Some(l), Some(r)));
                        matched_right.insert(r);
                    }
                }
                None if how.keeps_unmatched_left() => pairs.push((Some(l), None)),
                None => {}
            }
        }
        if how.keeps_unmatched_right() {
            pairs.extend(
                (0..right.row_count())
                    .filter(|r| !matched_right.contains(r))
                    .map(|r| (None, Some(r))),
            );
        }

        let shared_key = left_on == right_on;
        let mut record = ColumnarRecord::new();
        for (name, values) in left.columns() {
            let column = pairs
                .iter()
                .map(|&(l, r)| match (l, r) {
                    (Some(l), _) => values[l].clone(),
                    (None, Some(r)) if shared_key && name == left_on => right_keys[r].clone(),
                    _ => Value::Null,
                })
                .collect();
            record.push_column(name.clone(), column);
        }
        for (name, values) in right.columns() {
            if shared_key && name == right_on {
                continue;
            }
            let out_name = if left.column_idx(name).is_ok() {
                format!("{name}{RIGHT_SUFFIX}")
            } else {
                name.clone()
            };
            let column = pairs
                .iter()
                .map(|&(_, r)| r.map_or(Value::Null, |r| values[r].clone()))
                .collect();
            record.push_column(out_name, column);
        }
        log::debug!(
            "{how:?} join on {left_on}={right_on} produced {} rows",
            pairs.len()
        );
        Table::from_record(record)
    }
}
