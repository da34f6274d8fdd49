use crate::error::{TableError, TableResult};
use crate::store::ViewHandle;
use crate::value::{Label, Value, ValueMap};

/// A view of one row: a name→value snapshot plus the row's position and label.
///
/// Writes go to the snapshot and, while attached, to the same position of the parent table.
/// Removing rows from the parent or renaming its columns detaches the view. After that, and
/// after [`Row::drop`], the snapshot stays readable.
#[derive(Clone, Debug)]
pub struct Row {
    values: ValueMap,
    position: usize,
    label: Option<Label>,
    parent: Option<ViewHandle>,
}

impl Row {
    pub(crate) fn attached(
        values: ValueMap,
        position: usize,
        label: Option<Label>,
        parent: ViewHandle,
    ) -> Self {
        Self {
            values,
            position,
            label,
            parent: Some(parent),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.parent.as_ref().is_some_and(ViewHandle::is_current)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> TableResult<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    /// Overwrites an existing column's value. New column names are rejected.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> TableResult<()> {
        let value = value.into();
        if !self.values.contains_key(name) {
            return Err(TableError::UnknownColumn(name.to_string()));
        }
        if let Some(parent) = &self.parent {
            let position = self.position;
            parent.with_store(|store| store.set_value(name, position, value.clone()))?;
        }
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
        }
        Ok(())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.values.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values.iter()
    }

    pub fn to_map(&self) -> ValueMap {
        self.values.clone()
    }

    /// Removes this row from its parent table and clears the link. No-op when detached.
    pub fn drop(&mut self) -> TableResult<()> {
        if let Some(parent) = self.parent.take() {
            let position = self.position;
            if let Err(err) = parent.with_store(|store| store.drop_row(position)) {
                self.parent = Some(parent);
                return Err(err);
            }
            log::debug!("row view {position} dropped from its table");
        }
        Ok(())
    }
}

impl std::ops::Index<&str> for Row {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        &self.values[name]
    }
}

impl PartialEq<ValueMap> for Row {
    fn eq(&self, other: &ValueMap) -> bool {
        self.values == *other
    }
}
