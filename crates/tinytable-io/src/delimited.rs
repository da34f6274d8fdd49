use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tinytable::{ColumnarRecord, Table, Value};

use crate::error::{IoError, IoResult};

#[derive(Clone, Debug)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// The first record holds column names. Without one, columns are named by position.
    pub has_header: bool,
    /// Parse numbers and booleans out of fields. When off every field is text.
    pub infer_types: bool,
    /// Read empty fields as null rather than empty text.
    pub empty_as_null: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            infer_types: true,
            empty_as_null: true,
        }
    }
}

fn looks_like_float(field: &str) -> bool {
    field.contains(['.', 'e', 'E'])
        && field
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
}

fn parse_field(field: &str, options: &CsvOptions) -> Value {
    if field.is_empty() && options.empty_as_null {
        return Value::Null;
    }
    if !options.infer_types {
        return Value::Text(field.to_string());
    }
    if let Ok(i) = field.parse::<i64>() {
        return Value::Int(i);
    }
    if looks_like_float(field) {
        if let Ok(f) = field.parse::<f64>() {
            return Value::Float(f);
        }
    }
    if field.eq_ignore_ascii_case("true") {
        Value::Bool(true)
    } else if field.eq_ignore_ascii_case("false") {
        Value::Bool(false)
    } else {
        Value::Text(field.to_string())
    }
}

fn format_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int(i) => i.to_string(),
        // Debug keeps the fractional part (`2.0`), so the field reads back as a float.
        Value::Float(f) => format!("{f:?}"),
        Value::Text(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
    }
}

fn open_reader<R: Read>(reader: R, options: &CsvOptions) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_header)
        .from_reader(reader)
}

fn header_names<R: Read>(
    reader: &mut csv::Reader<R>,
    options: &CsvOptions,
) -> IoResult<Vec<String>> {
    if !options.has_header {
        return Ok(Vec::new());
    }
    let mut names: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if let Some(first) = names.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }
    Ok(names)
}

fn positional_names(width: usize) -> Vec<String> {
    (0..width).map(|i| i.to_string()).collect()
}

/// Reads delimited text into a record.
pub fn read_csv_from<R: Read>(reader: R, options: &CsvOptions) -> IoResult<ColumnarRecord> {
    let mut reader = open_reader(reader, options);
    let mut names = header_names(&mut reader, options)?;

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    for record in reader.records() {
        let record = record?;
        if !options.has_header && names.is_empty() {
            names = positional_names(record.len());
            columns = vec![Vec::new(); names.len()];
        }
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            column.push(parse_field(field, options));
        }
    }

    Ok(ColumnarRecord {
        columns: names.into_iter().zip(columns).collect(),
        labels: None,
    })
}

/// Reads delimited text `chunk_size` rows at a time. Every chunk carries the column names; the
/// last one may be shorter. Input with no data rows yields no chunks.
pub fn read_csv_chunks<R: Read>(
    reader: R,
    options: &CsvOptions,
    chunk_size: usize,
) -> IoResult<CsvChunks<R>> {
    if chunk_size == 0 {
        return Err(IoError::Unsupported("chunk size must be positive".to_string()));
    }
    let mut reader = open_reader(reader, options);
    let names = header_names(&mut reader, options)?;
    Ok(CsvChunks {
        records: reader.into_records(),
        names,
        options: options.clone(),
        chunk_size,
        done: false,
    })
}

/// Iterator returned by [`read_csv_chunks`].
pub struct CsvChunks<R> {
    records: csv::StringRecordsIntoIter<R>,
    names: Vec<String>,
    options: CsvOptions,
    chunk_size: usize,
    done: bool,
}

impl<R: Read> Iterator for CsvChunks<R> {
    type Item = IoResult<ColumnarRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); self.names.len()];
        let mut rows = 0;
        while rows < self.chunk_size {
            let record = match self.records.next() {
                Some(Ok(record)) => record,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    break;
                }
            };
            if !self.options.has_header && self.names.is_empty() {
                self.names = positional_names(record.len());
                columns = vec![Vec::new(); self.names.len()];
            }
            for (column, field) in columns.iter_mut().zip(record.iter()) {
                column.push(parse_field(field, &self.options));
            }
            rows += 1;
        }
        if rows == 0 {
            return None;
        }
        log::trace!("read a chunk of {rows} rows");
        Some(Ok(ColumnarRecord {
            columns: self.names.iter().cloned().zip(columns).collect(),
            labels: None,
        }))
    }
}

pub fn read_csv(path: impl AsRef<Path>, options: &CsvOptions) -> IoResult<ColumnarRecord> {
    let path = path.as_ref();
    let record = read_csv_from(File::open(path)?, options)?;
    log::debug!(
        "read {} rows x {} columns from {}",
        record.row_count(),
        record.columns.len(),
        path.display()
    );
    Ok(record)
}

pub fn read_csv_table(path: impl AsRef<Path>, options: &CsvOptions) -> IoResult<Table> {
    Ok(Table::from_record(read_csv(path, options)?)?)
}

/// Writes a record as delimited text. Nulls become empty fields; labels are not written.
pub fn write_csv_to<W: Write>(
    writer: W,
    record: &ColumnarRecord,
    options: &CsvOptions,
) -> IoResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    if options.has_header {
        writer.write_record(record.names())?;
    }
    for row in record.rows() {
        writer.write_record(row.iter().map(format_field))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv(
    path: impl AsRef<Path>,
    record: &ColumnarRecord,
    options: &CsvOptions,
) -> IoResult<()> {
    let path = path.as_ref();
    write_csv_to(File::create(path)?, record, options)?;
    log::debug!(
        "wrote {} rows x {} columns to {}",
        record.row_count(),
        record.columns.len(),
        path.display()
    );
    Ok(())
}

pub fn write_csv_table(
    path: impl AsRef<Path>,
    table: &Table,
    options: &CsvOptions,
) -> IoResult<()> {
    write_csv(path, &table.to_record(), options)
}
