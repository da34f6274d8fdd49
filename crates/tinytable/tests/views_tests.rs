use pretty_assertions::assert_eq;
use tinytable::{values, ArithOp, Column, Table, TableError, Value, ValueKind, ValueMap};

#[test]
fn column_writes_reach_the_table() {
    let t = Table::from_columns([("a", values![1, 2, 3])]).unwrap();
    let mut column = t.column("a").unwrap();
    column.set(1, 20).unwrap();
    assert_eq!(column[1], Value::from(20));
    assert_eq!(t.column("a").unwrap()[1], Value::from(20));
    assert_eq!(t.value("a", 1).unwrap(), Value::from(20));

    column.set(-1, 30).unwrap();
    assert_eq!(t.column_values("a").unwrap(), values![1, 20, 30]);
    assert!(matches!(
        column.set(3, 0).unwrap_err(),
        TableError::OutOfRange { .. }
    ));
}

#[test]
fn column_get_and_iteration() {
    let t = Table::from_columns([("a", values![1, 2, 3])]).unwrap();
    let column = t.column("a").unwrap();
    assert_eq!(column.get(-1).unwrap(), &Value::from(3));
    assert!(column.get(3).is_err());
    assert_eq!(column.len(), 3);
    let first: Vec<&Value> = column.iter().collect();
    let second: Vec<&Value> = column.iter().collect();
    assert_eq!(first, second);
}

#[test]
fn column_drop_removes_it_from_the_table() {
    let mut other = Table::from_columns([("a", values![1]), ("b", values![2])]).unwrap();
    let mut column = other.column("a").unwrap();
    column.drop().unwrap();
    assert_eq!(other.columns(), vec!["b"]);
    assert!(!column.is_attached());
    assert_eq!(column.values(), values![1].as_slice());

    column.drop().unwrap();
    column.set(0, 5).unwrap();
    assert_eq!(other.column_values("b").unwrap(), values![2]);

    other.edit_column("c", values![3]).unwrap();
    assert_eq!(other.columns(), vec!["b", "c"]);
}

#[test]
fn standalone_columns_have_no_parent() {
    let mut column = Column::new("n", vec![1, 2]);
    assert!(!column.is_attached());
    column.set(0, 9).unwrap();
    column.drop().unwrap();
    assert_eq!(column.values(), values![9, 2].as_slice());
}

#[test]
fn structural_edits_detach_views() {
    let mut t = Table::from_columns([("a", values![1, 2, 3]), ("b", values![4, 5, 6])]).unwrap();
    let mut column = t.column("a").unwrap();
    let mut row = t.row(2).unwrap();
    t.drop_row(0).unwrap();

    assert!(!column.is_attached());
    assert_eq!(column.set(0, 100).unwrap_err(), TableError::Detached);
    assert_eq!(row.set("a", 100).unwrap_err(), TableError::Detached);
    assert_eq!(t.column_values("a").unwrap(), values![2, 3]);
    assert_eq!(row["a"], Value::from(3));
}

#[test]
fn column_views_survive_edits_to_other_columns() {
    let mut t = Table::from_columns([
        ("a", values![1, 2]),
        ("b", values![3, 4]),
        ("c", values![5, 6]),
    ])
    .unwrap();
    let mut a = t.column("a").unwrap();
    let mut b = t.column("b").unwrap();
    let mut row = t.row(0).unwrap();

    t.drop_column("c").unwrap();
    assert!(a.is_attached());
    assert!(row.is_attached());
    t.filter_by_columns_inplace(&["a"]).unwrap();
    assert!(a.is_attached());
    assert!(!b.is_attached());
    assert_eq!(b.set(0, 30).unwrap_err(), TableError::Detached);

    t.edit_column("d", values![7, 8]).unwrap();
    a.set(1, 20).unwrap();
    assert_eq!(t.column_values("a").unwrap(), values![1, 20]);
    row.set("a", 10).unwrap();
    assert_eq!(t.column_values("a").unwrap(), values![10, 20]);

    a.drop().unwrap();
    assert_eq!(t.columns(), vec!["d"]);
}

#[test]
fn renames_detach_views_of_the_renamed_names() {
    let mut t = Table::from_columns([("a", values![1]), ("b", values![2])]).unwrap();
    let mut a = t.column("a").unwrap();
    let mut row = t.row(0).unwrap();
    t.replace_column_names(["b", "a"]).unwrap();

    assert_eq!(a.set(0, 9).unwrap_err(), TableError::Detached);
    assert_eq!(row.set("a", 9).unwrap_err(), TableError::Detached);
    assert_eq!(t.values(), vec![values![1, 2]]);

    let mut old_b = t.column("a").unwrap();
    t.drop_column("a").unwrap();
    t.edit_column("a", values![5]).unwrap();
    assert_eq!(old_b.set(0, 9).unwrap_err(), TableError::Detached);
    assert_eq!(t.column_values("a").unwrap(), values![5]);
}

#[test]
fn views_of_a_dropped_table_are_detached() {
    let t = Table::from_columns([("a", values![1])]).unwrap();
    let mut column = t.column("a").unwrap();
    drop(t);
    assert_eq!(column.set(0, 2).unwrap_err(), TableError::Detached);
    assert_eq!(column[0], Value::from(1));
}

#[test]
fn value_edits_do_not_detach_views() {
    let mut t = Table::from_columns([("a", values![1, 2])]).unwrap();
    let mut column = t.column("a").unwrap();
    t.edit_value("a", 0, 7).unwrap();
    assert!(column.is_attached());
    column.set(1, 8).unwrap();
    assert_eq!(t.column_values("a").unwrap(), values![7, 8]);
}

#[test]
fn row_writes_reach_the_table() {
    let t = Table::from_columns([("a", values![1, 2]), ("b", values!["x", "y"])]).unwrap();
    let mut row = t.row(1).unwrap();
    row.set("b", "z").unwrap();
    assert_eq!(row["b"], Value::from("z"));
    assert_eq!(t.value("b", 1).unwrap(), Value::from("z"));
    assert_eq!(
        row.set("c", 1).unwrap_err(),
        TableError::UnknownColumn("c".to_string())
    );
    assert_eq!(
        row.get("c").unwrap_err(),
        TableError::UnknownColumn("c".to_string())
    );
    assert_eq!(row.len(), 2);
    assert_eq!(row.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(
        row.values().cloned().collect::<Vec<_>>(),
        values![2, "z"]
    );
}

#[test]
fn dropped_row_keeps_its_snapshot() {
    let t = Table::from_columns([("a", values![1, 2, 3])]).unwrap();
    let mut row = t.get(0).unwrap().into_row().unwrap();
    row.drop().unwrap();
    assert_eq!(t, Table::from_columns([("a", values![2, 3])]).unwrap());
    let snapshot: ValueMap = [("a", 1)].into_iter().collect();
    assert!(row == snapshot);
    assert!(!row.is_attached());

    row.drop().unwrap();
    row.set("a", 5).unwrap();
    assert_eq!(t.column_values("a").unwrap(), values![2, 3]);
}

#[test]
fn iterrows_and_itercolumns_yield_live_views() {
    let t = Table::from_columns([("a", values![1, 2]), ("b", values![3, 4])]).unwrap();
    let positions: Vec<usize> = t.iterrows().map(|r| r.position()).collect();
    assert_eq!(positions, vec![0, 1]);

    for mut column in t.itercolumns() {
        column.set(0, 0).unwrap();
    }
    assert_eq!(t.values()[0], values![0, 0]);
}

#[test]
fn arithmetic_returns_detached_columns() {
    let t = Table::from_columns([("n", values![1, 2, 4])]).unwrap();
    let n = t.column("n").unwrap();

    let plus = (&n + 1i64).unwrap();
    assert_eq!(plus.values(), values![2, 3, 5].as_slice());
    assert!(!plus.is_attached());

    let half = (&n / 2i64).unwrap();
    assert_eq!(half.values(), values![0.5, 1.0, 2.0].as_slice());

    let floored = n.floor_div(-3i64).unwrap();
    assert_eq!(floored.values(), values![-1, -1, -2].as_slice());

    let rem = (&n % 3i64).unwrap();
    assert_eq!(rem.values(), values![1, 2, 1].as_slice());

    let squared = n.pow(2i64).unwrap();
    assert_eq!(squared.values(), values![1, 4, 16].as_slice());

    let doubled = (&n + &n).unwrap();
    assert_eq!(doubled.values(), values![2, 4, 8].as_slice());

    assert_eq!(t.column_values("n").unwrap(), values![1, 2, 4]);
}

#[test]
fn arithmetic_on_text_fails() {
    let words = Column::new("w", vec!["a", "b"]);
    assert!(matches!(
        words.apply(ArithOp::Mul, 2i64).unwrap_err(),
        TableError::InvalidOperation(_)
    ));
    assert!(matches!(
        words.sum().unwrap_err(),
        TableError::InvalidOperation(_)
    ));
    let n = Column::new("n", vec![1i64, 2]);
    assert!(matches!(
        n.apply(ArithOp::Div, 0i64).unwrap_err(),
        TableError::InvalidOperation(_)
    ));
}

#[test]
fn nulls_propagate_through_arithmetic() {
    let n = Column::new("n", values![1, Value::Null]);
    let out = (&n * 10i64).unwrap();
    assert_eq!(out.values(), values![10, Value::Null].as_slice());
}

#[test]
fn value_counts_and_unique_keep_first_seen_order() {
    let c = Column::new("c", vec!["b", "a", "b", "c", "a", "b"]);
    assert_eq!(
        c.value_counts(),
        vec![
            (Value::from("b"), 3),
            (Value::from("a"), 2),
            (Value::from("c"), 1)
        ]
    );
    assert_eq!(c.unique(), values!["b", "a", "c"]);
}

#[test]
fn column_sum() {
    let n = Column::new("n", values![1, 2, Value::Null]);
    assert_eq!(n.sum().unwrap(), Value::from(3));
    let f = Column::new("f", values![1, 0.5]);
    assert_eq!(f.sum().unwrap(), Value::Float(1.5));
}

#[test]
fn cast_as_writes_through() {
    let t = Table::from_columns([("n", values!["1", "2"])]).unwrap();
    let mut column = t.column("n").unwrap();
    column.cast_as(ValueKind::Int).unwrap();
    assert_eq!(column.values(), values![1, 2].as_slice());
    assert_eq!(t.column_values("n").unwrap(), values![1, 2]);
    assert!(column.is_attached());
}

#[test]
fn column_display_names_the_column() {
    let c = Column::new("score", vec![1i64, 2]);
    let text = c.to_string();
    assert!(text.lines().next().unwrap().contains("score"));
    assert!(text.ends_with("[2 values]"));
}
