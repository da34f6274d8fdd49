//! Plain-text grid rendering.

use crate::column::Column;
use crate::row::Row;
use crate::table::Table;
use crate::value::Value;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Rows shown before the middle of the table is elided.
    pub max_rows: usize,
    /// Cells wider than this are cut and end in `...`.
    pub max_width: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            max_rows: 20,
            max_width: 24,
        }
    }
}

const ELLIPSIS: &str = "...";

fn clip(text: String, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text;
    }
    let keep = max_width.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Rows to show; `None` marks where the elided middle goes.
fn visible_rows(len: usize, max_rows: usize) -> Vec<Option<usize>> {
    if len <= max_rows {
        return (0..len).map(Some).collect();
    }
    let head = max_rows.div_ceil(2);
    let tail = max_rows / 2;
    (0..head)
        .map(Some)
        .chain(std::iter::once(None))
        .chain((len - tail..len).map(Some))
        .collect()
}

fn write_grid(f: &mut fmt::Formatter<'_>, header: &[String], body: &[Vec<String>]) -> fmt::Result {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in body {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let write_line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
        for (i, (cell, width)) in cells.iter().zip(&widths).enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{cell:<width$}")?;
        }
        writeln!(f)
    };
    write_line(f, header)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(f, &rule)?;
    for line in body {
        write_line(f, line)?;
    }
    Ok(())
}

/// Renders `table` as a grid with a leading label (or position) column.
pub fn render(table: &Table, options: &DisplayOptions) -> String {
    struct Grid<'a>(&'a Table, &'a DisplayOptions);

    impl fmt::Display for Grid<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let Grid(table, options) = *self;
            let store = table.store();
            let cell = |v: &Value| clip(v.to_string(), options.max_width);

            let mut header = vec![String::new()];
            header.extend(store.names().iter().map(|n| clip(n.clone(), options.max_width)));

            let body: Vec<Vec<String>> = visible_rows(store.row_count(), options.max_rows)
                .into_iter()
                .map(|row| match row {
                    Some(row) => {
                        let index = match store.label_at(row) {
                            Some(label) => clip(label.to_string(), options.max_width),
                            None => row.to_string(),
                        };
                        std::iter::once(index)
                            .chain(store.columns().map(|(_, values)| cell(&values[row])))
                            .collect()
                    }
                    None => vec![ELLIPSIS.to_string(); header.len()],
                })
                .collect();

            write_grid(f, &header, &body)?;
            write!(
                f,
                "[{} rows x {} columns]",
                store.row_count(),
                store.column_count()
            )
        }
    }

    Grid(table, options).to_string()
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, &DisplayOptions::default()))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = DisplayOptions::default();
        let header = vec![String::new(), self.name().unwrap_or_default().to_string()];
        let body: Vec<Vec<String>> = visible_rows(self.len(), options.max_rows)
            .into_iter()
            .map(|row| match row {
                Some(row) => {
                    let index = match self.labels().and_then(|l| l.get(row)) {
                        Some(label) => label.to_string(),
                        None => row.to_string(),
                    };
                    vec![index, clip(self[row].to_string(), options.max_width)]
                }
                None => vec![ELLIPSIS.to_string(); 2],
            })
            .collect();
        write_grid(f, &header, &body)?;
        write!(f, "[{} values]", self.len())
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = DisplayOptions::default();
        let body: Vec<Vec<String>> = self
            .iter()
            .map(|(name, value)| vec![name.to_string(), clip(value.to_string(), options.max_width)])
            .collect();
        let header = match self.label() {
            Some(label) => vec![String::new(), label.to_string()],
            None => vec![String::new(), self.position().to_string()],
        };
        write_grid(f, &header, &body)
    }
}
