use pretty_assertions::assert_eq;
use tinytable::{values, JoinHow, Table, TableError, Value};

fn people() -> Table {
    Table::from_columns([
        ("id", values![1, 2, 3, Value::Null]),
        ("name", values!["a", "b", "c", "d"]),
    ])
    .unwrap()
}

fn scores() -> Table {
    Table::from_columns([
        ("id", values![2, 3, 3, 4, Value::Null]),
        ("score", values![20, 30, 31, 40, 50]),
    ])
    .unwrap()
}

#[test]
fn inner_join_keeps_matches_in_left_order() {
    let joined = people()
        .join(&scores(), "id", "id", JoinHow::Inner)
        .unwrap();
    assert_eq!(joined.columns(), vec!["id", "name", "score"]);
    assert_eq!(joined.column_values("id").unwrap(), values![2, 3, 3]);
    assert_eq!(joined.column_values("name").unwrap(), values!["b", "c", "c"]);
    assert_eq!(joined.column_values("score").unwrap(), values![20, 30, 31]);
    assert_eq!(joined.labels(), None);
}

#[test]
fn left_join_pads_unmatched_rows() {
    let joined = people().join(&scores(), "id", "id", JoinHow::Left).unwrap();
    assert_eq!(
        joined.column_values("id").unwrap(),
        values![1, 2, 3, 3, Value::Null]
    );
    assert_eq!(
        joined.column_values("score").unwrap(),
        values![Value::Null, 20, 30, 31, Value::Null]
    );
}

#[test]
fn right_join_appends_unmatched_right_rows() {
    let joined = people().join(&scores(), "id", "id", JoinHow::Right).unwrap();
    assert_eq!(
        joined.column_values("id").unwrap(),
        values![2, 3, 3, 4, Value::Null]
    );
    assert_eq!(
        joined.column_values("name").unwrap(),
        values!["b", "c", "c", Value::Null, Value::Null]
    );
    assert_eq!(
        joined.column_values("score").unwrap(),
        values![20, 30, 31, 40, 50]
    );
}

#[test]
fn full_join_keeps_everything() {
    let joined = people().join(&scores(), "id", "id", JoinHow::Full).unwrap();
    assert_eq!(joined.len(), 7);
    assert_eq!(
        joined.column_values("id").unwrap(),
        values![1, 2, 3, 3, Value::Null, 4, Value::Null]
    );
    assert_eq!(
        joined.column_values("name").unwrap(),
        values!["a", "b", "c", "c", "d", Value::Null, Value::Null]
    );
}

#[test]
fn null_keys_never_match() {
    let left = Table::from_columns([("k", values![Value::Null]), ("l", values![1])]).unwrap();
    let right = Table::from_columns([("k", values![Value::Null]), ("r", values![2])]).unwrap();
    let joined = left.join(&right, "k", "k", JoinHow::Inner).unwrap();
    assert!(joined.is_empty());
    assert_eq!(joined.columns(), vec!["k", "l", "r"]);
}

#[test]
fn clashing_names_get_a_suffix() {
    let left = Table::from_columns([("lk", values![1, 2]), ("v", values!["x", "y"])]).unwrap();
    let right = Table::from_columns([("rk", values![2, 1]), ("v", values!["p", "q"])]).unwrap();
    let joined = left.join(&right, "lk", "rk", JoinHow::Inner).unwrap();
    assert_eq!(joined.columns(), vec!["lk", "v", "rk", "v_right"]);
    assert_eq!(joined.values(), vec![values![1, "x", 1, "q"], values![2, "y", 2, "p"]]);
}

#[test]
fn unknown_key_columns_fail() {
    assert_eq!(
        people()
            .join(&scores(), "nope", "id", JoinHow::Inner)
            .unwrap_err(),
        TableError::UnknownColumn("nope".to_string())
    );
    assert_eq!(
        people()
            .join(&scores(), "id", "nope", JoinHow::Inner)
            .unwrap_err(),
        TableError::UnknownColumn("nope".to_string())
    );
}

#[test]
fn join_kinds_parse_by_name() {
    assert_eq!("inner".parse::<JoinHow>().unwrap(), JoinHow::Inner);
    assert_eq!("full".parse::<JoinHow>().unwrap(), JoinHow::Full);
    let err = "outer".parse::<JoinHow>().unwrap_err();
    assert!(matches!(err, TableError::InvalidOperation(_)));
    assert!(err.to_string().contains("\"full\""));
    assert_eq!(JoinHow::default(), JoinHow::Inner);
}
