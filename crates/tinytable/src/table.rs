use crate::column::Column;
use crate::error::{Axis, TableError, TableResult};
use crate::filter::Filter;
use crate::indexing::resolve_position;
use crate::record::ColumnarRecord;
use crate::row::Row;
use crate::store::{Store, ViewHandle};
use crate::value::{Label, Value, ValueKind, ValueMap};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// New contents for one row: either a partial name→value mapping or a full positional row.
#[derive(Clone, Debug, PartialEq)]
pub enum RowEdit {
    Items(ValueMap),
    Values(Vec<Value>),
}

impl From<ValueMap> for RowEdit {
    fn from(items: ValueMap) -> Self {
        RowEdit::Items(items)
    }
}

impl From<Vec<Value>> for RowEdit {
    fn from(values: Vec<Value>) -> Self {
        RowEdit::Values(values)
    }
}

/// A column-oriented table.
///
/// Column and row views returned by [`Table::column`] / [`Table::row`] write through to this
/// table. Every other derived table (slices, masks, filters, groups, copies) owns its data.
pub struct Table {
    store: Rc<RefCell<Store>>,
}

impl Table {
    /// An empty table with no columns and no rows.
    pub fn new() -> Self {
        Self::from_store(Store::default())
    }

    pub(crate) fn from_store(store: Store) -> Self {
        Self {
            store: Rc::new(RefCell::new(store)),
        }
    }

    pub fn from_columns<I, K, V>(columns: I) -> TableResult<Self>
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let columns = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values.into_iter().map(Into::into).collect()))
            .collect();
        Self::from_record(ColumnarRecord {
            columns,
            labels: None,
        })
    }

    pub fn from_record(record: ColumnarRecord) -> TableResult<Self> {
        let store = Store::from_columns(record.columns, record.labels)?;
        log::debug!(
            "built table with {} columns and {} rows",
            store.column_count(),
            store.row_count()
        );
        Ok(Self::from_store(store))
    }

    /// Builds a table from row-major data and an explicit column name list.
    pub fn from_rows<I, R, V, N, S>(rows: I, columns: N) -> TableResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<Value>,
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = columns.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect::<Vec<Value>>());
        Self::from_record(ColumnarRecord::from_rows(names, rows)?)
    }

    /// Alias of [`Table::from_rows`].
    pub fn from_records<I, R, V, N, S>(rows: I, columns: N) -> TableResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<Value>,
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_rows(rows, columns)
    }

    pub fn with_labels<I, L>(self, labels: I) -> TableResult<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let labels = labels.into_iter().map(Into::into).collect();
        self.store_mut().set_labels(Some(labels))?;
        Ok(self)
    }

    pub fn set_labels(&mut self, labels: Option<Vec<Label>>) -> TableResult<()> {
        self.store_mut().set_labels(labels)
    }

    pub fn labels(&self) -> Option<Vec<Label>> {
        self.store().labels().map(<[Label]>::to_vec)
    }

    pub fn to_record(&self) -> ColumnarRecord {
        let store = self.store();
        ColumnarRecord {
            columns: store
                .columns()
                .map(|(name, values)| (name.clone(), values.clone()))
                .collect(),
            labels: store.labels().map(<[Label]>::to_vec),
        }
    }

    pub(crate) fn store(&self) -> Ref<'_, Store> {
        self.store.borrow()
    }

    pub(crate) fn store_mut(&self) -> RefMut<'_, Store> {
        self.store.borrow_mut()
    }

    pub fn row_count(&self) -> usize {
        self.store().row_count()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.row_count()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn column_count(&self) -> usize {
        self.store().column_count()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        let store = self.store();
        (store.row_count(), store.column_count())
    }

    /// Number of cells.
    pub fn size(&self) -> usize {
        let (rows, columns) = self.shape();
        rows * columns
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> Vec<String> {
        self.store().names().to_vec()
    }

    pub fn keys(&self) -> Vec<String> {
        self.columns()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.store().column_idx(name).is_ok()
    }

    /// Positions `0..len` as an unnamed, detached column.
    pub fn index(&self) -> Column {
        let positions = (0..self.row_count()).map(Value::from).collect();
        Column::unnamed(positions)
    }

    /// Row-major copy of every value.
    pub fn values(&self) -> Vec<Vec<Value>> {
        let store = self.store();
        (0..store.row_count()).map(|r| store.row_values(r)).collect()
    }

    pub fn itertuples(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        (0..self.row_count()).map(move |r| self.store().row_values(r))
    }

    /// Copy of one column's values.
    pub fn column_values(&self, name: &str) -> TableResult<Vec<Value>> {
        Ok(self.store().column(name)?.to_vec())
    }

    pub fn value(&self, name: &str, row: i64) -> TableResult<Value> {
        let store = self.store();
        let values = store.column(name)?;
        let row = resolve_position(row, values.len(), Axis::Row)?;
        Ok(values[row].clone())
    }

    /// A live view of one column.
    pub fn column(&self, name: &str) -> TableResult<Column> {
        let (values, labels) = {
            let store = self.store();
            (
                store.column(name)?.to_vec(),
                store.labels().map(<[Label]>::to_vec),
            )
        };
        let parent = ViewHandle::column(&self.store, name)?;
        Ok(Column::attached(name, values, labels, parent))
    }

    /// A live view of one row. Negative positions count from the end.
    pub fn row(&self, position: i64) -> TableResult<Row> {
        let row = resolve_position(position, self.row_count(), Axis::Row)?;
        Ok(self.row_at(row))
    }

    pub(crate) fn row_at(&self, row: usize) -> Row {
        let (values, label) = {
            let store = self.store();
            (store.row_map(row), store.label_at(row))
        };
        Row::attached(values, row, label, ViewHandle::row(&self.store))
    }

    /// The row whose label equals `label`.
    pub fn label_row(&self, label: &Label) -> TableResult<Row> {
        let row = {
            let store = self.store();
            let labels = store.labels().ok_or(TableError::MissingLabels)?;
            labels
                .iter()
                .position(|l| l == label)
                .ok_or_else(|| TableError::UnknownLabel(label.clone()))?
        };
        Ok(self.row_at(row))
    }

    pub fn iterrows(&self) -> impl Iterator<Item = Row> + '_ {
        (0..self.row_count()).map(move |r| self.row_at(r))
    }

    pub fn itercolumns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns()
            .into_iter()
            .filter_map(move |name| self.column(&name).ok())
    }

    /// Deep copy. The copy shares nothing with `self`.
    pub fn copy(&self) -> Table {
        Table::from_store(self.store().clone())
    }

    fn edited_copy(&self, edit: impl FnOnce(&mut Table) -> TableResult<()>) -> TableResult<Table> {
        let mut copy = self.copy();
        edit(&mut copy)?;
        Ok(copy)
    }

    /// Replaces (or appends) a column in place.
    pub fn edit_column<V: Into<Value>>(&mut self, name: &str, values: Vec<V>) -> TableResult<()> {
        let values = values.into_iter().map(Into::into).collect();
        self.store_mut().set_column(name, values)?;
        log::debug!("edited column {name}");
        Ok(())
    }

    pub fn with_column<V: Into<Value>>(&self, name: &str, values: Vec<V>) -> TableResult<Table> {
        self.edited_copy(|t| t.edit_column(name, values))
    }

    pub fn drop_column(&mut self, name: &str) -> TableResult<()> {
        self.store_mut().drop_column(name)?;
        log::debug!("dropped column {name}");
        Ok(())
    }

    pub fn without_column(&self, name: &str) -> TableResult<Table> {
        self.edited_copy(|t| t.drop_column(name))
    }

    pub fn edit_value(&mut self, name: &str, row: i64, value: impl Into<Value>) -> TableResult<()> {
        let mut store = self.store_mut();
        let row = resolve_position(row, store.row_count(), Axis::Row)?;
        store.set_value(name, row, value.into())
    }

    pub fn with_value(&self, name: &str, row: i64, value: impl Into<Value>) -> TableResult<Table> {
        self.edited_copy(|t| t.edit_value(name, row, value))
    }

    /// Removes a row; later rows shift down by one and their labels move with them.
    pub fn drop_row(&mut self, row: i64) -> TableResult<()> {
        let mut store = self.store_mut();
        let row = resolve_position(row, store.row_count(), Axis::Row)?;
        store.drop_row(row)?;
        log::debug!("dropped row {row}");
        Ok(())
    }

    pub fn without_row(&self, row: i64) -> TableResult<Table> {
        self.edited_copy(|t| t.drop_row(row))
    }

    /// Overwrites a row. A mapping may name any subset of existing columns; a positional row
    /// must supply one value per column. A table without columns has no row to write into.
    pub fn edit_row(&mut self, row: i64, edit: impl Into<RowEdit>) -> TableResult<()> {
        let mut store = self.store_mut();
        let edit = edit.into();
        if store.column_count() == 0 {
            let name = match &edit {
                RowEdit::Items(items) => items.keys().next().map(|name| name.to_string()),
                RowEdit::Values(_) => None,
            };
            return Err(TableError::UnknownColumn(name.unwrap_or_else(|| "0".to_string())));
        }
        match edit {
            RowEdit::Items(items) => {
                if let Some(name) = items.keys().find(|name| store.column_idx(name).is_err()) {
                    return Err(TableError::UnknownColumn(name.to_string()));
                }
                let row = resolve_position(row, store.row_count(), Axis::Row)?;
                store.set_row_items(row, &items)
            }
            RowEdit::Values(values) => {
                let row = resolve_position(row, store.row_count(), Axis::Row)?;
                store.set_row_values(row, values)
            }
        }
    }

    pub fn with_row(&self, row: i64, edit: impl Into<RowEdit>) -> TableResult<Table> {
        self.edited_copy(|t| t.edit_row(row, edit))
    }

    pub fn cast_column_as(&mut self, name: &str, kind: ValueKind) -> TableResult<()> {
        self.store_mut().map_column(name, |v| v.cast(kind))
    }

    /// Renames every column at once; `names` must have one entry per column.
    pub fn replace_column_names<S: Into<String>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
    ) -> TableResult<()> {
        let names = names.into_iter().map(Into::into).collect();
        self.store_mut().rename_all(names)
    }

    /// Alias of [`Table::replace_column_names`].
    pub fn set_columns<S: Into<String>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
    ) -> TableResult<()> {
        self.replace_column_names(names)
    }

    /// New table of the given row positions, in order. Negative positions count from the end.
    pub fn filter_by_indexes(&self, positions: &[i64]) -> TableResult<Table> {
        let store = self.store();
        let rows = resolve_positions(positions, store.row_count(), Axis::Row)?;
        Ok(Table::from_store(store.select_rows(&rows)))
    }

    pub fn filter_by_indexes_inplace(&mut self, positions: &[i64]) -> TableResult<()> {
        let mut store = self.store_mut();
        let rows = resolve_positions(positions, store.row_count(), Axis::Row)?;
        store.retain_rows(&rows);
        Ok(())
    }

    pub(crate) fn select_rows(&self, rows: &[usize]) -> Table {
        Table::from_store(self.store().select_rows(rows))
    }

    /// New table holding only `names`, in the given order.
    pub fn only_columns<S: AsRef<str>>(&self, names: &[S]) -> TableResult<Table> {
        Ok(Table::from_store(self.store().select_columns(names)?))
    }

    /// Alias of [`Table::only_columns`].
    pub fn filter_by_columns<S: AsRef<str>>(&self, names: &[S]) -> TableResult<Table> {
        self.only_columns(names)
    }

    pub fn filter_by_columns_inplace<S: AsRef<str>>(&mut self, names: &[S]) -> TableResult<()> {
        self.store_mut().retain_columns(names)
    }

    /// New table of the rows where `mask` is true. An empty mask selects no rows.
    pub fn mask(&self, mask: &[bool]) -> TableResult<Table> {
        let store = self.store();
        if !mask.is_empty() && mask.len() != store.row_count() {
            return Err(TableError::LengthMismatch {
                column: "<mask>".to_string(),
                expected: store.row_count(),
                actual: mask.len(),
            });
        }
        let rows: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, keep)| keep.then_some(i))
            .collect();
        Ok(Table::from_store(store.select_rows(&rows)))
    }

    /// New table of the rows where `filter` evaluates true.
    pub fn filter(&self, filter: &Filter) -> TableResult<Table> {
        let mask = filter.to_vec();
        self.mask(&mask)
    }

    pub fn head(&self, n: usize) -> Table {
        let rows: Vec<usize> = (0..n.min(self.row_count())).collect();
        self.select_rows(&rows)
    }

    pub fn tail(&self, n: usize) -> Table {
        let len = self.row_count();
        let rows: Vec<usize> = (len - n.min(len)..len).collect();
        self.select_rows(&rows)
    }

    pub fn label_head(&self, n: usize) -> TableResult<Vec<Label>> {
        let store = self.store();
        let labels = store.labels().ok_or(TableError::MissingLabels)?;
        Ok(labels[..n.min(labels.len())].to_vec())
    }

    pub fn label_tail(&self, n: usize) -> TableResult<Vec<Label>> {
        let store = self.store();
        let labels = store.labels().ok_or(TableError::MissingLabels)?;
        Ok(labels[labels.len() - n.min(labels.len())..].to_vec())
    }

    /// `n` distinct rows chosen uniformly at random. A seed makes the choice reproducible.
    pub fn sample(&self, n: usize, seed: Option<u64>) -> TableResult<Table> {
        let len = self.row_count();
        if n > len {
            return Err(TableError::invalid(format!(
                "sample larger than population ({n} > {len})"
            )));
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let rows = rand::seq::index::sample(&mut rng, len, n).into_vec();
        Ok(self.select_rows(&rows))
    }
}

pub(crate) fn resolve_positions(
    positions: &[i64],
    len: usize,
    axis: Axis,
) -> TableResult<Vec<usize>> {
    positions
        .iter()
        .map(|&p| resolve_position(p, len, axis))
        .collect()
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Table {
    /// Same as [`Table::copy`]: views of `self` stay bound to `self`.
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        *self.store() == *other.store()
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store();
        let mut map = f.debug_map();
        for (name, values) in store.columns() {
            map.entry(name, values);
        }
        map.finish()?;
        if let Some(labels) = store.labels() {
            write!(f, " labels={labels:?}")?;
        }
        Ok(())
    }
}
