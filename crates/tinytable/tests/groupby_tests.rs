use pretty_assertions::assert_eq;
use tinytable::{values, Aggregation, GroupKey, Label, Table, TableError, Value, ValueMap};

fn map(entries: &[(&str, Value)]) -> ValueMap {
    entries.iter().cloned().collect()
}

fn sales() -> Table {
    Table::from_columns([
        ("region", values!["N", "S", "N", "E", "S", "N"]),
        ("rep", values!["a", "b", "a", "c", "d", "e"]),
        ("units", values![1, 2, 3, 4, 5, 6]),
        ("price", values![1.0, 2.0, Value::Null, 4.0, 5.0, 6.0]),
    ])
    .unwrap()
}

#[test]
fn groups_follow_first_occurrence_order() {
    let t = Table::from_columns([("x", values!["A", "A", "B"]), ("v", values![1, 2, 3])]).unwrap();
    let groups = t.groupby(&["x"]).unwrap();
    assert_eq!(groups.len(), 2);

    let (key, a) = groups.get(0).unwrap();
    assert_eq!(key, &GroupKey::from("A"));
    assert_eq!(a.column_values("v").unwrap(), values![1, 2]);
    let (key, b) = groups.get(1).unwrap();
    assert_eq!(key, &GroupKey::from("B"));
    assert_eq!(b.column_values("v").unwrap(), values![3]);

    let sums = groups.sum();
    assert_eq!(sums[0], (GroupKey::from("A"), map(&[("v", Value::from(3))])));
}

#[test]
fn multi_column_keys_are_tuples() {
    let t = sales();
    let groups = t.groupby(&["region", "rep"]).unwrap();
    let keys: Vec<GroupKey> = groups.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            GroupKey::Tuple(values!["N", "a"]),
            GroupKey::Tuple(values!["S", "b"]),
            GroupKey::Tuple(values!["E", "c"]),
            GroupKey::Tuple(values!["S", "d"]),
            GroupKey::Tuple(values!["N", "e"]),
        ]
    );
    let na = groups
        .get_key(&GroupKey::Tuple(values!["N", "a"]))
        .unwrap();
    assert_eq!(na.column_values("units").unwrap(), values![1, 3]);
}

#[test]
fn partition_is_complete() {
    let t = sales();
    let groups = t.groupby(&["region"]).unwrap();
    let total: usize = groups.iter().map(|(_, g)| g.len()).sum();
    assert_eq!(total, t.len());

    let mut units: Vec<i64> = groups
        .iter()
        .flat_map(|(_, g)| g.column_values("units").unwrap())
        .filter_map(|v| v.as_i64())
        .collect();
    units.sort_unstable();
    assert_eq!(units, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn groups_are_independent_copies() {
    let mut t = sales();
    let groups = t.groupby(&["region"]).unwrap();
    let (_, first) = groups.get(0).unwrap();
    let mut first = first.copy();
    first.edit_value("units", 0, 100).unwrap();
    assert_eq!(t.value("units", 0).unwrap(), Value::from(1));

    t.edit_value("units", 0, 50).unwrap();
    let (_, again) = groups.get(0).unwrap();
    assert_eq!(again.value("units", 0).unwrap(), Value::from(1));
}

#[test]
fn groups_keep_labels() {
    let t = Table::from_columns([("k", values![1, 2, 1])])
        .unwrap()
        .with_labels(["r0", "r1", "r2"])
        .unwrap();
    let groups = t.groupby(&["k"]).unwrap();
    let ones = groups.get_key(&GroupKey::from(1)).unwrap();
    assert_eq!(ones.labels(), Some(vec![Label::from("r0"), Label::from("r2")]));
}

#[test]
fn unknown_group_column_fails() {
    assert_eq!(
        sales().groupby(&["nope"]).unwrap_err(),
        TableError::UnknownColumn("nope".to_string())
    );
    assert_eq!(
        Table::new().groupby(&["x"]).unwrap_err(),
        TableError::UnknownColumn("x".to_string())
    );
    assert!(matches!(
        sales().groupby::<&str>(&[]).unwrap_err(),
        TableError::InvalidOperation(_)
    ));
}

#[test]
fn whole_table_aggregations_skip_unaggregable_columns() {
    let t = sales();
    assert_eq!(
        t.sum(),
        map(&[("units", Value::from(21)), ("price", Value::Float(18.0))])
    );
    assert_eq!(
        t.count(),
        map(&[
            ("region", Value::from(6)),
            ("rep", Value::from(6)),
            ("units", Value::from(6)),
            ("price", Value::from(6)),
        ])
    );
    assert_eq!(
        t.mean(),
        map(&[("units", Value::Float(3.5)), ("price", Value::Float(3.6))])
    );
    assert_eq!(
        t.min(),
        map(&[
            ("region", Value::from("E")),
            ("rep", Value::from("a")),
            ("units", Value::from(1)),
            ("price", Value::Float(1.0)),
        ])
    );
    assert_eq!(t.max()["region"], Value::from("S"));
    assert_eq!(t.mode()["region"], Value::from("N"));
    assert_eq!(t.nunique()["region"], Value::from(3));
    assert_eq!(t.nunique()["price"], Value::from(6));
}

#[test]
fn standard_deviations() {
    let t = Table::from_columns([("x", values![2, 4, 4, 4, 5, 5, 7, 9])]).unwrap();
    assert_eq!(t.pstd()["x"], Value::Float(2.0));
    let std = t.std()["x"].as_f64().unwrap();
    assert!((std - 2.138089935299395).abs() < 1e-12);
}

#[test]
fn all_null_columns_are_omitted() {
    let t = Table::from_columns([
        ("empty", values![Value::Null, Value::Null]),
        ("n", values![1, 2]),
    ])
    .unwrap();
    assert_eq!(t.sum(), map(&[("n", Value::from(3))]));
    assert_eq!(t.count()["empty"], Value::from(2));
}

#[test]
fn per_group_aggregation_and_table() {
    let t = sales();
    let groups = t.groupby(&["region"]).unwrap();
    let means = groups.mean();
    assert_eq!(means.len(), 3);
    assert_eq!(
        means[0],
        (
            GroupKey::from("N"),
            map(&[("units", Value::Float(10.0 / 3.0)), ("price", Value::Float(3.5))])
        )
    );

    let summary = groups.aggregate_table(Aggregation::Sum).unwrap();
    assert_eq!(summary.columns(), vec!["region", "units", "price"]);
    assert_eq!(summary.column_values("region").unwrap(), values!["N", "S", "E"]);
    assert_eq!(summary.column_values("units").unwrap(), values![10, 7, 4]);
    assert_eq!(summary.column_values("price").unwrap(), values![7.0, 7.0, 4.0]);
}

#[test]
fn aggregate_table_fills_missing_results_with_null() {
    let t = Table::from_columns([
        ("k", values!["a", "b"]),
        ("v", values![Value::Null, 2]),
    ])
    .unwrap();
    let summary = t
        .groupby(&["k"])
        .unwrap()
        .aggregate_table(Aggregation::Max)
        .unwrap();
    assert_eq!(summary.column_values("v").unwrap(), values![Value::Null, 2]);
}

#[test]
fn aggregation_names_parse() {
    let names = [
        "sum", "count", "mean", "min", "max", "std", "pstd", "mode", "nunique",
    ];
    let kinds: Vec<Aggregation> = names
        .iter()
        .map(|name| name.parse().unwrap())
        .collect();
    assert_eq!(kinds, Aggregation::ALL.to_vec());
}
