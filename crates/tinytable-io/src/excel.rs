use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use rust_xlsxwriter::{Workbook, Worksheet};
use tinytable::{ColumnarRecord, Table, Value};

use crate::error::{IoError, IoResult};

const DEFAULT_SHEET: &str = "Sheet1";

/// Largest float that still converts to an integer exactly.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

fn convert_cell(cell: &Data, sheet: &str) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Bool(v) => Value::Bool(*v),
        Data::Int(v) => Value::Int(*v),
        // Spreadsheets store every number as a float.
        Data::Float(v) if v.fract() == 0.0 && v.abs() < MAX_EXACT_FLOAT => Value::Int(*v as i64),
        Data::Float(v) => Value::Float(*v),
        Data::String(v) => Value::Text(v.clone()),
        Data::DateTime(v) => Value::Float(v.as_f64()),
        Data::DateTimeIso(v) | Data::DurationIso(v) => Value::Text(v.clone()),
        Data::Error(e) => {
            log::warn!("reading error cell {e:?} in sheet {sheet} as null");
            Value::Null
        }
    }
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.clone(),
        Data::Empty => String::new(),
        other => convert_cell(other, "").to_string(),
    }
}

pub fn sheet_names(path: impl AsRef<Path>) -> IoResult<Vec<String>> {
    let workbook = open_workbook_auto(path)?;
    Ok(workbook.sheet_names())
}

/// Reads one sheet; the first sheet when `sheet` is `None`. The first row holds column names.
pub fn read_excel(path: impl AsRef<Path>, sheet: Option<&str>) -> IoResult<ColumnarRecord> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(name) if names.iter().any(|n| n == name) => name.to_string(),
        Some(name) => return Err(IoError::UnknownSheet(name.to_string())),
        None => names
            .first()
            .cloned()
            .ok_or_else(|| IoError::UnknownSheet(DEFAULT_SHEET.to_string()))?,
    };

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(ColumnarRecord::new());
    };
    let mut columns: Vec<(String, Vec<Value>)> = header
        .iter()
        .map(|cell| (header_name(cell), Vec::new()))
        .collect();
    for row in rows {
        for ((_, column), cell) in columns.iter_mut().zip(row) {
            column.push(convert_cell(cell, &sheet_name));
        }
    }

    let record = ColumnarRecord {
        columns,
        labels: None,
    };
    log::debug!(
        "read {} rows from sheet {sheet_name} of {}",
        record.row_count(),
        path.display()
    );
    Ok(record)
}

pub fn read_excel_table(path: impl AsRef<Path>, sheet: Option<&str>) -> IoResult<Table> {
    Ok(Table::from_record(read_excel(path, sheet)?)?)
}

fn cell_position(row: usize, col: usize) -> IoResult<(u32, u16)> {
    let row = u32::try_from(row)
        .map_err(|_| IoError::Unsupported(format!("too many rows for a sheet: {row}")))?;
    let col = u16::try_from(col)
        .map_err(|_| IoError::Unsupported(format!("too many columns for a sheet: {col}")))?;
    Ok((row, col))
}

fn write_value(worksheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> IoResult<()> {
    match value {
        Value::Null => {}
        Value::Int(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        Value::Float(f) => {
            worksheet.write_number(row, col, *f)?;
        }
        Value::Text(s) => {
            worksheet.write_string(row, col, s.as_str())?;
        }
        Value::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

fn write_record(worksheet: &mut Worksheet, sheet: &str, record: &ColumnarRecord) -> IoResult<()> {
    worksheet.set_name(sheet)?;
    for (col, (name, values)) in record.columns.iter().enumerate() {
        let (_, col) = cell_position(0, col)?;
        worksheet.write_string(0, col, name.as_str())?;
        for (row, value) in values.iter().enumerate() {
            let (row, _) = cell_position(row + 1, 0)?;
            write_value(worksheet, row, col, value)?;
        }
    }
    Ok(())
}

/// Copies the cells of a sheet read from an existing file. Formatting is not carried over.
fn copy_sheet(worksheet: &mut Worksheet, sheet: &str, range: &Range<Data>) -> IoResult<()> {
    worksheet.set_name(sheet)?;
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    for (r, c, cell) in range.used_cells() {
        let (row, col) = cell_position(first_row as usize + r, first_col as usize + c)?;
        match cell {
            Data::Empty => {}
            Data::Bool(b) => {
                worksheet.write_boolean(row, col, *b)?;
            }
            Data::Int(i) => {
                worksheet.write_number(row, col, *i as f64)?;
            }
            Data::Float(f) => {
                worksheet.write_number(row, col, *f)?;
            }
            Data::DateTime(d) => {
                worksheet.write_number(row, col, d.as_f64())?;
            }
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                worksheet.write_string(row, col, s.as_str())?;
            }
            Data::Error(e) => {
                log::warn!("dropping error cell {e:?} while copying sheet {sheet}");
            }
        }
    }
    Ok(())
}

fn read_sheets(path: &Path) -> IoResult<Vec<(String, Range<Data>)>> {
    let mut workbook = open_workbook_auto(path)?;
    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        sheets.push((name, range));
    }
    Ok(sheets)
}

/// Writes `record` as one sheet: a header row of column names, then the values. Null cells are
/// left blank.
///
/// When `path` already holds a workbook its other sheets are kept, and a sheet with the same
/// name is replaced in place. Without a `sheet` name the first existing sheet is replaced, or
/// `Sheet1` is created for a new file.
pub fn write_excel(
    path: impl AsRef<Path>,
    sheet: Option<&str>,
    record: &ColumnarRecord,
) -> IoResult<()> {
    let path = path.as_ref();
    let existing = if path.exists() {
        read_sheets(path)?
    } else {
        Vec::new()
    };
    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => existing
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| DEFAULT_SHEET.to_string()),
    };

    let mut workbook = Workbook::new();
    let mut written = false;
    for (name, range) in &existing {
        if *name == sheet_name {
            write_record(workbook.add_worksheet(), &sheet_name, record)?;
            written = true;
        } else {
            copy_sheet(workbook.add_worksheet(), name, range)?;
        }
    }
    if !written {
        write_record(workbook.add_worksheet(), &sheet_name, record)?;
    }
    workbook.save(path)?;

    log::debug!(
        "wrote {} rows to sheet {sheet_name} of {} ({} sheets kept)",
        record.row_count(),
        path.display(),
        existing.len() - usize::from(written)
    );
    Ok(())
}

pub fn write_excel_table(
    path: impl AsRef<Path>,
    sheet: Option<&str>,
    table: &Table,
) -> IoResult<()> {
    write_excel(path, sheet, &table.to_record())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_become_ints() {
        assert_eq!(convert_cell(&Data::Float(3.0), "s").kind(), tinytable::ValueKind::Int);
        assert_eq!(convert_cell(&Data::Float(2.5), "s"), Value::Float(2.5));
        assert_eq!(convert_cell(&Data::Empty, "s"), Value::Null);
        assert_eq!(
            convert_cell(&Data::String("x".to_string()), "s"),
            Value::Text("x".to_string())
        );
    }
}
