use pretty_assertions::assert_eq;
use tinytable::{values, Table, Value};
use tinytable_io::{read_excel_table, sheet_names, write_excel_table, IoError};

fn people() -> Table {
    Table::from_columns([
        ("id", values![1, 2, 3]),
        ("name", values!["Olivia", "Noah", "Emma"]),
        ("score", values![1.5, Value::Null, 0.25]),
        ("member", values![true, false, true]),
    ])
    .unwrap()
}

#[test]
fn round_trips_a_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.xlsx");
    write_excel_table(&path, Some("People"), &people()).unwrap();

    assert_eq!(sheet_names(&path).unwrap(), vec!["People".to_string()]);
    assert_eq!(read_excel_table(&path, Some("People")).unwrap(), people());
    assert_eq!(read_excel_table(&path, None).unwrap(), people());
}

#[test]
fn default_sheet_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.xlsx");
    write_excel_table(&path, None, &people()).unwrap();
    assert_eq!(sheet_names(&path).unwrap(), vec!["Sheet1".to_string()]);
}

#[test]
fn unknown_sheet_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.xlsx");
    write_excel_table(&path, None, &people()).unwrap();
    assert!(matches!(
        read_excel_table(&path, Some("Missing")).unwrap_err(),
        IoError::UnknownSheet(name) if name == "Missing"
    ));
}

#[test]
fn writing_another_sheet_keeps_the_existing_ones() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.xlsx");
    let small = Table::from_columns([("n", values![1, 2])]).unwrap();
    write_excel_table(&path, Some("First"), &people()).unwrap();
    write_excel_table(&path, Some("Second"), &small).unwrap();

    assert_eq!(
        sheet_names(&path).unwrap(),
        vec!["First".to_string(), "Second".to_string()]
    );
    assert_eq!(read_excel_table(&path, Some("First")).unwrap(), people());
    assert_eq!(read_excel_table(&path, Some("Second")).unwrap(), small);
}

#[test]
fn writing_a_sheet_again_replaces_it_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.xlsx");
    let small = Table::from_columns([("n", values![7])]).unwrap();
    write_excel_table(&path, Some("First"), &people()).unwrap();
    write_excel_table(&path, Some("Second"), &people()).unwrap();
    write_excel_table(&path, Some("First"), &small).unwrap();

    assert_eq!(
        sheet_names(&path).unwrap(),
        vec!["First".to_string(), "Second".to_string()]
    );
    assert_eq!(read_excel_table(&path, Some("First")).unwrap(), small);
    assert_eq!(read_excel_table(&path, Some("Second")).unwrap(), people());

    // Without a name the first sheet is the one replaced.
    write_excel_table(&path, None, &people()).unwrap();
    assert_eq!(read_excel_table(&path, None).unwrap(), people());
    assert_eq!(sheet_names(&path).unwrap().len(), 2);
}
