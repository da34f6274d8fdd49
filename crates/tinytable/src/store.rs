use crate::error::{TableError, TableResult};
use crate::value::{Label, Value, ValueMap};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

/// Canonical column storage shared by a [`crate::Table`] and the views it hands out.
///
/// `row_epoch` advances on every edit that moves rows and `name_epoch` on every rename. Each
/// column also carries an id that lives as long as the column does. Views remember what they
/// saw when created and refuse to write once it no longer holds.
#[derive(Clone, Debug, Default)]
pub(crate) struct Store {
    names: Vec<String>,
    column_index: HashMap<String, usize>,
    columns: Vec<Vec<Value>>,
    ids: Vec<u64>,
    next_id: u64,
    labels: Option<Vec<Label>>,
    row_epoch: u64,
    name_epoch: u64,
}

impl PartialEq for Store {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names && self.columns == other.columns && self.labels == other.labels
    }
}

impl Store {
    pub(crate) fn from_columns(
        columns: Vec<(String, Vec<Value>)>,
        labels: Option<Vec<Label>>,
    ) -> TableResult<Self> {
        let mut store = Store::default();
        for (name, values) in columns {
            if store.column_index.contains_key(&name) {
                return Err(TableError::DuplicateColumn(name));
            }
            store.push_column(name, values);
        }
        store.labels = labels;
        store.validate()?;
        Ok(store)
    }

    /// Checks that every column (and the label sequence, if any) has the same length.
    pub(crate) fn validate(&self) -> TableResult<()> {
        let expected = self.row_count();
        for (name, values) in self.names.iter().zip(&self.columns) {
            if values.len() != expected {
                return Err(TableError::LengthMismatch {
                    column: name.clone(),
                    expected,
                    actual: values.len(),
                });
            }
        }
        if let Some(labels) = &self.labels {
            if labels.len() != expected {
                return Err(TableError::LengthMismatch {
                    column: "<labels>".to_string(),
                    expected,
                    actual: labels.len(),
                });
            }
        }
        Ok(())
    }

    fn push_column(&mut self, name: String, values: Vec<Value>) {
        self.column_index.insert(name.clone(), self.names.len());
        self.names.push(name);
        self.columns.push(values);
        self.ids.push(self.next_id);
        self.next_id += 1;
    }

    pub(crate) fn column_id(&self, name: &str) -> TableResult<u64> {
        Ok(self.ids[self.column_idx(name)?])
    }

    fn bump_rows(&mut self) {
        self.row_epoch = self.row_epoch.wrapping_add(1);
    }

    pub(crate) fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub(crate) fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn labels(&self) -> Option<&[Label]> {
        self.labels.as_deref()
    }

    pub(crate) fn set_labels(&mut self, labels: Option<Vec<Label>>) -> TableResult<()> {
        if let Some(labels) = &labels {
            if labels.len() != self.row_count() {
                return Err(TableError::LengthMismatch {
                    column: "<labels>".to_string(),
                    expected: self.row_count(),
                    actual: labels.len(),
                });
            }
        }
        self.labels = labels;
        Ok(())
    }

    pub(crate) fn column_idx(&self, name: &str) -> TableResult<usize> {
        self.column_index
            .get(name)
            .copied()
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    pub(crate) fn column(&self, name: &str) -> TableResult<&[Value]> {
        let idx = self.column_idx(name)?;
        Ok(&self.columns[idx])
    }

    pub(crate) fn columns(&self) -> impl Iterator<Item = (&String, &Vec<Value>)> + '_ {
        self.names.iter().zip(&self.columns)
    }

    pub(crate) fn column_at(&self, idx: usize) -> &[Value] {
        &self.columns[idx]
    }

    pub(crate) fn row_map(&self, row: usize) -> ValueMap {
        self.columns()
            .map(|(name, values)| (name.clone(), values[row].clone()))
            .collect()
    }

    pub(crate) fn row_values(&self, row: usize) -> Vec<Value> {
        self.columns.iter().map(|values| values[row].clone()).collect()
    }

    pub(crate) fn label_at(&self, row: usize) -> Option<Label> {
        self.labels.as_ref().and_then(|l| l.get(row).cloned())
    }

    fn check_row(&self, row: usize) -> TableResult<()> {
        if row >= self.row_count() {
            return Err(TableError::row_out_of_range(
                i64::try_from(row).unwrap_or(i64::MAX),
                self.row_count(),
            ));
        }
        Ok(())
    }

    pub(crate) fn set_value(&mut self, name: &str, row: usize, value: Value) -> TableResult<()> {
        let idx = self.column_idx(name)?;
        self.check_row(row)?;
        self.columns[idx][row] = value;
        Ok(())
    }

    /// Replaces an existing column or appends a new one at the end.
    pub(crate) fn set_column(&mut self, name: &str, values: Vec<Value>) -> TableResult<()> {
        let expected = if self.columns.is_empty() {
            self.labels.as_ref().map(Vec::len)
        } else {
            Some(self.row_count())
        };
        if let Some(expected) = expected {
            if values.len() != expected {
                return Err(TableError::LengthMismatch {
                    column: name.to_string(),
                    expected,
                    actual: values.len(),
                });
            }
        }

        match self.column_index.get(name) {
            Some(&idx) => self.columns[idx] = values,
            None => self.push_column(name.to_string(), values),
        }
        Ok(())
    }

    pub(crate) fn drop_column(&mut self, name: &str) -> TableResult<()> {
        let idx = self.column_idx(name)?;
        self.names.remove(idx);
        self.columns.remove(idx);
        self.ids.remove(idx);
        if self.columns.is_empty() {
            self.labels = None;
        }
        self.reindex();
        Ok(())
    }

    pub(crate) fn drop_row(&mut self, row: usize) -> TableResult<()> {
        self.check_row(row)?;
        for values in &mut self.columns {
            values.remove(row);
        }
        if let Some(labels) = &mut self.labels {
            labels.remove(row);
        }
        self.bump_rows();
        Ok(())
    }

    /// Overwrites the named cells of one row. All names are checked before anything is written.
    pub(crate) fn set_row_items(&mut self, row: usize, items: &ValueMap) -> TableResult<()> {
        let mut targets = Vec::with_capacity(items.len());
        for (name, value) in items.iter() {
            targets.push((self.column_idx(name)?, value.clone()));
        }
        self.check_row(row)?;
        for (idx, value) in targets {
            self.columns[idx][row] = value;
        }
        Ok(())
    }

    pub(crate) fn set_row_values(&mut self, row: usize, values: Vec<Value>) -> TableResult<()> {
        if values.len() != self.column_count() {
            return Err(TableError::LengthMismatch {
                column: "<row>".to_string(),
                expected: self.column_count(),
                actual: values.len(),
            });
        }
        self.check_row(row)?;
        for (column, value) in self.columns.iter_mut().zip(values) {
            column[row] = value;
        }
        Ok(())
    }

    /// Copies the given rows (in the given order, repeats allowed) into a fresh store.
    pub(crate) fn select_rows(&self, rows: &[usize]) -> Store {
        let columns = self
            .columns()
            .map(|(name, values)| {
                (
                    name.clone(),
                    rows.iter().map(|&r| values[r].clone()).collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>();
        let labels = self
            .labels
            .as_ref()
            .map(|labels| rows.iter().map(|&r| labels[r].clone()).collect());
        Store::assemble(columns, labels)
    }

    /// Copies the given columns (in the given order) into a fresh store.
    pub(crate) fn select_columns<S: AsRef<str>>(&self, names: &[S]) -> TableResult<Store> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            columns.push((name.to_string(), self.column(name)?.to_vec()));
        }
        let labels = if columns.is_empty() {
            None
        } else {
            self.labels.clone()
        };
        Store::from_columns(columns, labels)
    }

    /// Copies `rows` of the columns at `cols`. A column position listed twice is taken once, where it first
    /// appears.
    pub(crate) fn select_block(&self, rows: &[usize], cols: &[usize]) -> TableResult<Store> {
        let mut seen = HashSet::with_capacity(cols.len());
        let columns = cols
            .iter()
            .filter(|&&c| seen.insert(c))
            .map(|&c| {
                (
                    self.names[c].clone(),
                    rows.iter().map(|&r| self.columns[c][r].clone()).collect(),
                )
            })
            .collect();
        let labels = if cols.is_empty() {
            None
        } else {
            self.labels
                .as_ref()
                .map(|labels| rows.iter().map(|&r| labels[r].clone()).collect())
        };
        Store::from_columns(columns, labels)
    }

    /// Keeps only `rows` (in the given order) in place.
    pub(crate) fn retain_rows(&mut self, rows: &[usize]) {
        let selected = self.select_rows(rows);
        self.columns = selected.columns;
        self.labels = selected.labels;
        self.bump_rows();
    }

    pub(crate) fn retain_columns<S: AsRef<str>>(&mut self, names: &[S]) -> TableResult<()> {
        let selected = self.select_columns(names)?;
        let ids = names
            .iter()
            .map(|name| self.column_id(name.as_ref()))
            .collect::<TableResult<Vec<_>>>()?;
        self.names = selected.names;
        self.column_index = selected.column_index;
        self.columns = selected.columns;
        self.ids = ids;
        self.labels = selected.labels;
        Ok(())
    }

    /// Renames every column at once. The new name list is fully validated before the swap.
    pub(crate) fn rename_all(&mut self, new_names: Vec<String>) -> TableResult<()> {
        if new_names.len() != self.names.len() {
            return Err(TableError::LengthMismatch {
                column: "<column names>".to_string(),
                expected: self.names.len(),
                actual: new_names.len(),
            });
        }
        let mut column_index = HashMap::with_capacity(new_names.len());
        for (idx, name) in new_names.iter().enumerate() {
            if column_index.insert(name.clone(), idx).is_some() {
                return Err(TableError::DuplicateColumn(name.clone()));
            }
        }
        self.names = new_names;
        self.column_index = column_index;
        self.name_epoch = self.name_epoch.wrapping_add(1);
        Ok(())
    }

    pub(crate) fn map_column(
        &mut self,
        name: &str,
        f: impl Fn(&Value) -> TableResult<Value>,
    ) -> TableResult<()> {
        let idx = self.column_idx(name)?;
        let mapped = self.columns[idx]
            .iter()
            .map(f)
            .collect::<TableResult<Vec<_>>>()?;
        self.columns[idx] = mapped;
        Ok(())
    }

    /// Builds a store from parts already known to be consistent.
    pub(crate) fn assemble(columns: Vec<(String, Vec<Value>)>, labels: Option<Vec<Label>>) -> Store {
        let mut store = Store {
            labels,
            ..Store::default()
        };
        for (name, values) in columns {
            store.push_column(name, values);
        }
        store
    }

    fn reindex(&mut self) {
        self.column_index = self
            .names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
    }
}

#[derive(Clone, Debug)]
enum ViewTarget {
    /// Rows are written by column name, so a rename moves them to other cells.
    Row { name_epoch: u64 },
    /// A column stays writable while its name still refers to the same column.
    Column { name: String, id: u64 },
}

/// A view's link back to the store it was created from.
#[derive(Clone, Debug)]
pub(crate) struct ViewHandle {
    store: Weak<RefCell<Store>>,
    row_epoch: u64,
    target: ViewTarget,
}

impl ViewHandle {
    pub(crate) fn row(store: &Rc<RefCell<Store>>) -> Self {
        let current = store.borrow();
        Self {
            store: Rc::downgrade(store),
            row_epoch: current.row_epoch,
            target: ViewTarget::Row {
                name_epoch: current.name_epoch,
            },
        }
    }

    pub(crate) fn column(store: &Rc<RefCell<Store>>, name: &str) -> TableResult<Self> {
        let current = store.borrow();
        Ok(Self {
            store: Rc::downgrade(store),
            row_epoch: current.row_epoch,
            target: ViewTarget::Column {
                name: name.to_string(),
                id: current.column_id(name)?,
            },
        })
    }

    fn matches(&self, store: &Store) -> bool {
        if store.row_epoch != self.row_epoch {
            return false;
        }
        match &self.target {
            ViewTarget::Row { name_epoch } => store.name_epoch == *name_epoch,
            ViewTarget::Column { name, id } => store.column_id(name).ok() == Some(*id),
        }
    }

    /// Runs `f` against the store if it is still alive and what the view points at is unchanged.
    pub(crate) fn with_store<T>(
        &self,
        f: impl FnOnce(&mut Store) -> TableResult<T>,
    ) -> TableResult<T> {
        let store = self.store.upgrade().ok_or(TableError::Detached)?;
        let mut store = store.borrow_mut();
        if !self.matches(&store) {
            return Err(TableError::Detached);
        }
        f(&mut store)
    }

    pub(crate) fn is_current(&self) -> bool {
        self.store
            .upgrade()
            .is_some_and(|store| self.matches(&store.borrow()))
    }
}
