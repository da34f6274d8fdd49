use thiserror::Error;
use tinytable::TableError;

pub type IoResult<T> = Result<T, IoError>;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to read spreadsheet: {0}")]
    Excel(#[from] calamine::Error),
    #[error("failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("no table named {0} in database")]
    UnknownTable(String),
    #[error("table {0} already exists")]
    TableExists(String),
    #[error("no sheet named {0} in workbook")]
    UnknownSheet(String),
    #[error("unsupported data: {0}")]
    Unsupported(String),
}
