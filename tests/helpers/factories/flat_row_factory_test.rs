use crate::test_helpers::factories::FlatRowFactory;
use crate::test_helpers::factory::Factory;
use serde_json::json;

#[test]
fn test_flat_row_factory_keeps_insertion_order() {
    let row = Factory::flat_row()
        .with("b", 1)
        .with("a", "x")
        .with("c", true)
        .without("c")
        .create();

    let columns: Vec<_> = row.keys().cloned().collect();
    assert_eq!(columns, vec!["b", "a"]);
    assert_eq!(row["a"], json!("x"));
}

#[test]
fn test_flat_row_factory_from_json() {
    let rows = FlatRowFactory::from_json(json!([{ "z": 1, "y": 2 }, { "x": null }]));

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["z", "y"]);
    assert!(rows[1]["x"].is_null());
}
