use std::path::Path;

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params, params_from_iter, Connection};
use tinytable::{ColumnarRecord, Table, Value};

use crate::error::{IoError, IoResult};

/// What [`write_sqlite`] does when the target table is already there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IfExists {
    #[default]
    Fail,
    /// Drop the existing table and create it again.
    Replace,
    /// Insert after the existing rows. Column names must match.
    Append,
}

#[derive(Clone, Debug, Default)]
pub struct SqliteWriteOptions {
    pub if_exists: IfExists,
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn table_exists(conn: &Connection, table: &str) -> IoResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
        params![table],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}

/// Names of the user tables in the database, sorted.
pub fn table_names(path: impl AsRef<Path>) -> IoResult<Vec<String>> {
    let conn = Connection::open(path)?;
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |r| r.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

fn from_sql(value: ValueRef<'_>, column: &str) -> IoResult<Value> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(i) => Ok(Value::Int(i)),
        ValueRef::Real(f) => Ok(Value::Float(f)),
        ValueRef::Text(bytes) => Ok(Value::Text(String::from_utf8_lossy(bytes).into_owned())),
        ValueRef::Blob(_) => Err(IoError::Unsupported(format!(
            "column {column} holds binary data"
        ))),
    }
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Int(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
    }
}

/// Declared type for a column: TEXT wins over REAL, REAL over INTEGER. All-null columns get none.
fn declared_type(values: &[Value]) -> &'static str {
    let mut declared = "";
    for value in values {
        declared = match (declared, value) {
            (_, Value::Text(_)) => return "TEXT",
            (_, Value::Float(_)) => "REAL",
            ("", Value::Int(_) | Value::Bool(_)) => "INTEGER",
            (current, _) => current,
        };
    }
    declared
}

/// Reads every row of `table`.
pub fn read_sqlite(path: impl AsRef<Path>, table: &str) -> IoResult<ColumnarRecord> {
    let path = path.as_ref();
    let conn = Connection::open(path)?;
    if !table_exists(&conn, table)? {
        return Err(IoError::UnknownTable(table.to_string()));
    }

    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote(table)))?;
    let names: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        for (idx, (name, column)) in names.iter().zip(columns.iter_mut()).enumerate() {
            column.push(from_sql(row.get_ref(idx)?, name)?);
        }
    }

    let record = ColumnarRecord {
        columns: names.into_iter().zip(columns).collect(),
        labels: None,
    };
    log::debug!(
        "read {} rows from table {table} in {}",
        record.row_count(),
        path.display()
    );
    Ok(record)
}

pub fn read_sqlite_table(path: impl AsRef<Path>, table: &str) -> IoResult<Table> {
    Ok(Table::from_record(read_sqlite(path, table)?)?)
}

/// Writes `record` into `table`, creating it as needed. Booleans are stored as 0/1 integers.
pub fn write_sqlite(
    path: impl AsRef<Path>,
    table: &str,
    record: &ColumnarRecord,
    options: &SqliteWriteOptions,
) -> IoResult<()> {
    if record.columns.is_empty() {
        return Err(IoError::Unsupported(format!(
            "cannot store table {table} without columns"
        )));
    }
    let path = path.as_ref();
    let mut conn = Connection::open(path)?;
    let tx = conn.transaction()?;

    let exists = table_exists(&tx, table)?;
    let create = match (exists, options.if_exists) {
        (false, _) => true,
        (true, IfExists::Fail) => return Err(IoError::TableExists(table.to_string())),
        (true, IfExists::Replace) => {
            tx.execute(&format!("DROP TABLE {}", quote(table)), [])?;
            true
        }
        (true, IfExists::Append) => false,
    };

    if create {
        let definitions: Vec<String> = record
            .columns
            .iter()
            .map(|(name, values)| format!("{} {}", quote(name), declared_type(values)))
            .collect();
        tx.execute(
            &format!("CREATE TABLE {} ({})", quote(table), definitions.join(", ")),
            [],
        )?;
    }

    for (name, values) in &record.columns {
        if values.iter().any(|v| matches!(v, Value::Bool(_))) {
            log::warn!("storing booleans in column {name} of {table} as integers");
        }
    }

    {
        let names: Vec<String> = record.names().map(quote).collect();
        let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{i}")).collect();
        let mut insert = tx.prepare(&format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote(table),
            names.join(", "),
            placeholders.join(", ")
        ))?;
        for row in record.rows() {
            insert.execute(params_from_iter(row.iter().map(to_sql)))?;
        }
    }
    tx.commit()?;

    log::debug!(
        "wrote {} rows to table {table} in {}",
        record.row_count(),
        path.display()
    );
    Ok(())
}

pub fn write_sqlite_table(
    path: impl AsRef<Path>,
    table_name: &str,
    table: &Table,
    options: &SqliteWriteOptions,
) -> IoResult<()> {
    write_sqlite(path, table_name, &table.to_record(), options)
}
