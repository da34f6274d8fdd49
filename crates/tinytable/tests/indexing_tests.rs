use pretty_assertions::assert_eq;
use tinytable::{
    values, Assignment, Axis, Key, Label, Selection, Slice, Table, TableError, Value, ValueMap,
};

fn ages() -> Table {
    Table::from_columns([
        ("name", values!["Ann", "Bo", "Cy", "Di"]),
        ("age", values![34, 17, 52, 18]),
    ])
    .unwrap()
}

fn table(selection: Selection) -> Table {
    selection.into_table().expect("expected a table")
}

#[test]
fn slice_selects_row_range() {
    let t = Table::from_columns([("a", values![1, 2, 3, 4])]).unwrap();
    let sliced = table(t.get(1..3).unwrap());
    assert_eq!(sliced.column_values("a").unwrap(), values![2, 3]);
    assert_eq!(sliced.len(), 2);
}

#[test]
fn negative_and_stepped_slices() {
    let t = Table::from_columns([("a", values![1, 2, 3, 4])]).unwrap();
    let tail = table(t.get(Slice::new(Some(-2), None, None)).unwrap());
    assert_eq!(tail.column_values("a").unwrap(), values![3, 4]);

    let reversed = table(t.get(Slice::full().with_step(-1)).unwrap());
    assert_eq!(reversed.column_values("a").unwrap(), values![4, 3, 2, 1]);

    let every_other = table(t.get(Slice::new(None, None, Some(2))).unwrap());
    assert_eq!(every_other.column_values("a").unwrap(), values![1, 3]);

    let clamped = table(t.get(Slice::new(Some(-100), Some(100), None)).unwrap());
    assert_eq!(clamped.len(), 4);

    let backward = table(t.get(Slice::new(Some(-1), Some(-3), Some(-1))).unwrap());
    assert_eq!(backward.column_values("a").unwrap(), values![4, 3]);

    assert!(matches!(
        t.get(Slice::new(None, None, Some(0))).unwrap_err(),
        TableError::InvalidOperation(_)
    ));
}

#[test]
fn text_key_gives_column_view() {
    let t = ages();
    let column = t.get("age").unwrap().into_column().unwrap();
    assert_eq!(column.name(), Some("age"));
    assert_eq!(column.values(), values![34, 17, 52, 18].as_slice());
    assert_eq!(
        t.get("height").unwrap_err(),
        TableError::UnknownColumn("height".to_string())
    );
}

#[test]
fn integer_key_gives_row_view() {
    let t = Table::from_columns([("a", values![1, 2, 3])]).unwrap();
    let row = t.get(0).unwrap().into_row().unwrap();
    let expected: ValueMap = [("a", 1)].into_iter().collect();
    assert!(row == expected);
    assert_eq!(row.position(), 0);
}

#[test]
fn negative_row_index_matches_last_position() {
    let t = ages();
    let last = t.get(-1).unwrap().into_row().unwrap();
    let explicit = t.get(t.len() as i64 - 1).unwrap().into_row().unwrap();
    assert_eq!(last.to_map(), explicit.to_map());
    assert_eq!(last.position(), 3);
}

#[test]
fn out_of_range_rows_fail() {
    let t = ages();
    assert_eq!(
        t.get(4).unwrap_err(),
        TableError::OutOfRange {
            axis: Axis::Row,
            index: 4,
            len: 4
        }
    );
    assert!(matches!(t.get(-5).unwrap_err(), TableError::OutOfRange { .. }));
    assert!(matches!(
        Table::new().get(0).unwrap_err(),
        TableError::OutOfRange { len: 0, .. }
    ));
}

#[test]
fn boolean_list_is_a_row_mask() {
    let t = ages();
    let picked = table(t.get(vec![true, false, false, true]).unwrap());
    assert_eq!(picked.column_values("name").unwrap(), values!["Ann", "Di"]);

    assert!(matches!(
        t.get(vec![true]).unwrap_err(),
        TableError::LengthMismatch { .. }
    ));
}

#[test]
fn text_list_selects_columns_in_order() {
    let t = ages();
    let picked = table(t.get(vec!["age", "name"]).unwrap());
    assert_eq!(picked.columns(), vec!["age", "name"]);
}

#[test]
fn mixed_list_is_rejected() {
    let t = ages();
    let err = t.get(values![true, "age"]).unwrap_err();
    assert!(matches!(err, TableError::UnsupportedKey(_)));
    let err = t.get(values![0, 1]).unwrap_err();
    assert!(matches!(err, TableError::UnsupportedKey(_)));
}

#[test]
fn empty_list_selects_no_rows() {
    let t = ages();
    let picked = table(t.get(Vec::<bool>::new()).unwrap());
    assert_eq!(picked.len(), 0);
    assert_eq!(picked.column_count(), 2);
}

#[test]
fn filter_key_keeps_matching_rows_in_order() {
    let t = ages();
    let age = t.column("age").unwrap();
    let adults = table(t.get(age.gt(18i64)).unwrap());
    assert_eq!(adults.column_values("name").unwrap(), values!["Ann", "Cy"]);
    assert_eq!(adults.column_values("age").unwrap(), values![34, 52]);
}

#[test]
fn label_key_finds_row() {
    let t = ages()
        .with_labels([("a", 1), ("b", 2), ("c", 3), ("d", 4)])
        .unwrap();
    let row = t.get(Label::from(("c", 3))).unwrap().into_row().unwrap();
    assert_eq!(row["name"], Value::from("Cy"));
    assert_eq!(row.label(), Some(&Label::from(("c", 3))));

    assert_eq!(
        t.get(Label::from(("z", 9))).unwrap_err(),
        TableError::UnknownLabel(Label::from(("z", 9)))
    );
    assert_eq!(
        ages().get(Label::from("a")).unwrap_err(),
        TableError::MissingLabels
    );
}

#[test]
fn other_scalars_are_unsupported() {
    let t = ages();
    for key in [Value::Float(1.0), Value::Bool(true), Value::Null] {
        assert!(matches!(
            t.get(Key::Scalar(key)).unwrap_err(),
            TableError::UnsupportedKey(_)
        ));
    }
}

#[test]
fn slice_bounds_must_be_integers() {
    let err = Slice::from_values(&Value::Float(1.5), &Value::Null, &Value::Null).unwrap_err();
    assert!(matches!(err, TableError::UnsupportedKey(_)));
}

#[test]
fn subscript_assignment() {
    let mut t = ages();
    t.set("age", values![1, 2, 3, 4]).unwrap();
    assert_eq!(t.column_values("age").unwrap(), values![1, 2, 3, 4]);

    t.set("score", values![9, 9, 9, 9]).unwrap();
    assert_eq!(t.column_count(), 3);

    let edit: ValueMap = [("name", "Ed")].into_iter().collect();
    t.set(0, edit).unwrap();
    assert_eq!(t.value("name", 0).unwrap(), Value::from("Ed"));

    assert!(matches!(
        t.set(1..2, Assignment::Value(Value::Int(1))).unwrap_err(),
        TableError::UnsupportedKey(_)
    ));
}

#[test]
fn assigning_a_row_to_a_table_without_columns_fails() {
    let mut t = Table::new();
    assert!(matches!(
        t.set(0, values![1]).unwrap_err(),
        TableError::UnknownColumn(_)
    ));
    assert!(matches!(
        t.set(0, ValueMap::new()).unwrap_err(),
        TableError::UnknownColumn(_)
    ));
    let edit: ValueMap = [("name", "Ed")].into_iter().collect();
    assert_eq!(
        t.set(0, edit).unwrap_err(),
        TableError::UnknownColumn("name".to_string())
    );
}

#[test]
fn filtered_results_are_copies() {
    let mut t = ages();
    let age = t.column("age").unwrap();
    let adults = t.filter(&age.ge(18i64)).unwrap();
    t.edit_value("name", 0, "Zoe").unwrap();
    assert_eq!(adults.value("name", 0).unwrap(), Value::from("Ann"));
}
