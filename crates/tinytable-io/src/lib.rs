mod delimited;
mod error;
mod excel;
mod sqlite;

pub use delimited::{
    read_csv, read_csv_chunks, read_csv_from, read_csv_table, write_csv, write_csv_table,
    write_csv_to, CsvChunks, CsvOptions,
};
pub use error::{IoError, IoResult};
pub use excel::{read_excel, read_excel_table, sheet_names, write_excel, write_excel_table};
pub use sqlite::{
    read_sqlite, read_sqlite_table, table_names, write_sqlite, write_sqlite_table, IfExists,
    SqliteWriteOptions,
};
