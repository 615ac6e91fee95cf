use crate::engine::aggregate::{
    AggregateError, FieldSpecMap, GroupShape, Identity, Passthrough, Reducer, aggregate,
};
use crate::engine::types::AggregatedRecord;
use crate::logging::init_for_tests;
use crate::test_helpers::factories::FlatRowFactory;
use crate::test_helpers::factory::Factory;
use serde_json::{Value, json};

fn movies_spec(identity: Identity) -> FieldSpecMap {
    FieldSpecMap::builder()
        .group("movies", GroupShape::Array, identity)
        .nest_columns("movies", &["movie_id", "title"])
        .build()
        .unwrap()
}

fn as_json(records: Vec<AggregatedRecord>) -> Value {
    Value::Array(records.into_iter().map(Value::Object).collect())
}

#[test]
fn test_aggregate_empty_input_yields_empty_output() {
    init_for_tests();

    let out = aggregate(&[], "theater_id", &movies_spec(Identity::Structural)).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_aggregate_groups_theaters_with_movies() {
    init_for_tests();

    let rows = FlatRowFactory::from_json(json!([
        { "theater_id": 1, "theater_name": "A", "movie_id": 10, "title": "X" },
        { "theater_id": 1, "theater_name": "A", "movie_id": 11, "title": "Y" },
        { "theater_id": 2, "theater_name": "B", "movie_id": 10, "title": "X" },
    ]));

    let out = aggregate(&rows, "theater_id", &movies_spec(Identity::Structural)).unwrap();

    assert_eq!(
        as_json(out),
        json!([
            {
                "theater_id": 1,
                "theater_name": "A",
                "movies": [
                    { "movie_id": 10, "title": "X" },
                    { "movie_id": 11, "title": "Y" }
                ]
            },
            {
                "theater_id": 2,
                "theater_name": "B",
                "movies": [{ "movie_id": 10, "title": "X" }]
            }
        ])
    );
}

#[test]
fn test_aggregate_first_row_wins_for_top_level_fields() {
    init_for_tests();

    let rows = FlatRowFactory::from_json(json!([
        { "theater_id": 1, "theater_name": "First", "movie_id": 10, "title": "X" },
        { "theater_id": 1, "theater_name": "Second", "movie_id": 11, "title": "Y" },
    ]));
    let spec = movies_spec(Identity::Structural);

    let out = aggregate(&rows, "theater_id", &spec).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["theater_name"], json!("First"));

    // Reversing the input flips which value survives.
    let reversed: Vec<_> = rows.into_iter().rev().collect();
    let out = aggregate(&reversed, "theater_id", &spec).unwrap();
    assert_eq!(out[0]["theater_name"], json!("Second"));
    assert_eq!(
        out[0]["movies"],
        json!([{ "movie_id": 11, "title": "Y" }, { "movie_id": 10, "title": "X" }])
    );
}

#[test]
fn test_aggregate_drops_duplicate_sub_objects_from_fan_out() {
    init_for_tests();

    let row = Factory::flat_row()
        .with("theater_id", 1)
        .with("movie_id", 10)
        .with("title", "X")
        .create();
    let rows = vec![row.clone(), row.clone(), row];

    let out = aggregate(&rows, "theater_id", &movies_spec(Identity::Structural)).unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["movies"], json!([{ "movie_id": 10, "title": "X" }]));
}

#[test]
fn test_aggregate_identity_field_dedupes_on_id_only() {
    init_for_tests();

    let rows = FlatRowFactory::from_json(json!([
        { "theater_id": 1, "movie_id": 10, "title": "X" },
        { "theater_id": 1, "movie_id": 10, "title": "X (director's cut)" },
        { "theater_id": 1, "movie_id": 12, "title": "Z" },
    ]));

    let by_id = aggregate(
        &rows,
        "theater_id",
        &movies_spec(Identity::Field("movie_id".into())),
    )
    .unwrap();
    assert_eq!(
        by_id[0]["movies"],
        json!([{ "movie_id": 10, "title": "X" }, { "movie_id": 12, "title": "Z" }])
    );

    let structural = aggregate(&rows, "theater_id", &movies_spec(Identity::Structural)).unwrap();
    assert_eq!(structural[0]["movies"].as_array().unwrap().len(), 3);
}

#[test]
fn test_aggregate_identity_field_skips_null_children() {
    init_for_tests();

    let rows = FlatRowFactory::from_json(json!([
        { "theater_id": 1, "movie_id": null, "title": null },
        { "theater_id": 2, "movie_id": 10, "title": "X" },
    ]));

    let out = aggregate(
        &rows,
        "theater_id",
        &movies_spec(Identity::Field("movie_id".into())),
    )
    .unwrap();

    assert_eq!(out[0]["movies"], json!([]));
    assert_eq!(out[1]["movies"], json!([{ "movie_id": 10, "title": "X" }]));
}

#[test]
fn test_aggregate_preserves_first_appearance_order_of_keys() {
    init_for_tests();

    let rows = FlatRowFactory::from_json(json!([
        { "theater_id": 3, "movie_id": 1, "title": "A" },
        { "theater_id": 1, "movie_id": 2, "title": "B" },
        { "theater_id": 3, "movie_id": 3, "title": "C" },
        { "theater_id": 2, "movie_id": 4, "title": "D" },
        { "theater_id": 1, "movie_id": 5, "title": "E" },
    ]));

    let out = aggregate(&rows, "theater_id", &movies_spec(Identity::Structural)).unwrap();

    let keys: Vec<_> = out.iter().map(|r| r["theater_id"].clone()).collect();
    assert_eq!(keys, vec![json!(3), json!(1), json!(2)]);

    let titles: Vec<_> = out[0]["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].clone())
        .collect();
    assert_eq!(titles, vec![json!("A"), json!("C")]);
}

#[test]
fn test_aggregate_missing_group_key_is_malformed() {
    init_for_tests();

    let rows = FlatRowFactory::from_json(json!([
        { "theater_id": 1, "movie_id": 10, "title": "X" },
        { "movie_id": 11, "title": "Y" },
    ]));

    let err = aggregate(&rows, "theater_id", &movies_spec(Identity::Structural)).unwrap_err();
    assert_eq!(
        err,
        AggregateError::MalformedRow {
            row: 1,
            column: "theater_id".into()
        }
    );
}

#[test]
fn test_aggregate_missing_referenced_column_is_malformed() {
    init_for_tests();

    let rows = vec![
        Factory::flat_row()
            .with("theater_id", 1)
            .with("movie_id", 10)
            .create(),
    ];

    let err = aggregate(&rows, "theater_id", &movies_spec(Identity::Structural)).unwrap_err();
    assert!(matches!(
        err,
        AggregateError::MalformedRow { row: 0, ref column } if column == "title"
    ));
}

#[test]
fn test_aggregate_renames_nested_fields_from_source_columns() {
    init_for_tests();

    let spec = FieldSpecMap::builder()
        .group("critic", GroupShape::Object, Identity::Field("critic_id".into()))
        .nested("critic_id", "critic", "c_critic_id")
        .nested("preferred_name", "critic", "c_preferred_name")
        .build()
        .unwrap();
    let rows = FlatRowFactory::from_json(json!([
        { "review_id": 7, "score": 4, "c_critic_id": 2, "c_preferred_name": "Ana" },
        { "review_id": 7, "score": 4, "c_critic_id": 3, "c_preferred_name": "Bo" },
    ]));

    let out = aggregate(&rows, "review_id", &spec).unwrap();

    assert_eq!(
        Value::Object(out[0].clone()),
        json!({
            "review_id": 7,
            "score": 4,
            "critic": { "critic_id": 2, "preferred_name": "Ana" }
        })
    );
}

#[test]
fn test_aggregate_object_group_without_match_is_null() {
    init_for_tests();

    let spec = FieldSpecMap::builder()
        .group("critic", GroupShape::Object, Identity::Field("critic_id".into()))
        .nest_columns("critic", &["critic_id"])
        .build()
        .unwrap();
    let rows = FlatRowFactory::from_json(json!([{ "review_id": 1, "critic_id": null }]));

    let out = aggregate(&rows, "review_id", &spec).unwrap();
    assert_eq!(out[0]["critic"], Value::Null);
}

#[test]
fn test_aggregate_passthrough_none_keeps_only_key_and_direct_fields() {
    init_for_tests();

    let spec = FieldSpecMap::builder()
        .direct("theater_name")
        .group("movies", GroupShape::Array, Identity::Structural)
        .nest_columns("movies", &["movie_id"])
        .passthrough(Passthrough::None)
        .build()
        .unwrap();
    let rows = FlatRowFactory::from_json(json!([
        { "theater_id": 1, "theater_name": "A", "is_showing": true, "movie_id": 10 },
    ]));

    let out = aggregate(&rows, "theater_id", &spec).unwrap();

    assert_eq!(
        Value::Object(out[0].clone()),
        json!({ "theater_id": 1, "theater_name": "A", "movies": [{ "movie_id": 10 }] })
    );
}

#[test]
fn test_aggregate_direct_field_missing_is_malformed() {
    init_for_tests();

    let spec = FieldSpecMap::builder()
        .direct("theater_name")
        .group("movies", GroupShape::Array, Identity::Structural)
        .nest_columns("movies", &["movie_id"])
        .build()
        .unwrap();
    let rows = FlatRowFactory::from_json(json!([{ "theater_id": 1, "movie_id": 10 }]));

    let err = aggregate(&rows, "theater_id", &spec).unwrap_err();
    assert_eq!(err, AggregateError::malformed(0, "theater_name"));
}

#[test]
fn test_aggregate_distinguishes_numeric_and_string_keys() {
    init_for_tests();

    let rows = FlatRowFactory::from_json(json!([
        { "theater_id": 1, "movie_id": 10, "title": "X" },
        { "theater_id": "1", "movie_id": 11, "title": "Y" },
    ]));

    let out = aggregate(&rows, "theater_id", &movies_spec(Identity::Structural)).unwrap();
    assert_eq!(out.len(), 2);
}

#[test]
fn test_aggregate_rejects_empty_group_key() {
    init_for_tests();

    let err = aggregate(&[], " ", &movies_spec(Identity::Structural)).unwrap_err();
    assert!(matches!(err, AggregateError::InvalidSpec(_)));
}

#[test]
fn test_aggregate_rejects_group_key_named_like_group() {
    init_for_tests();

    let err = Reducer::new("movies", movies_spec(Identity::Structural)).unwrap_err();
    assert!(matches!(err, AggregateError::InvalidSpec(_)));
}

#[test]
fn test_reducer_is_reusable_across_calls() {
    init_for_tests();

    let reducer = Reducer::new("theater_id", movies_spec(Identity::Structural)).unwrap();
    assert_eq!(reducer.group_key(), "theater_id");

    let first = reducer
        .reduce(&FlatRowFactory::from_json(json!([
            { "theater_id": 1, "movie_id": 10, "title": "X" }
        ])))
        .unwrap();
    let second = reducer
        .reduce(&FlatRowFactory::from_json(json!([
            { "theater_id": 2, "movie_id": 11, "title": "Y" }
        ])))
        .unwrap();

    assert_eq!(first[0]["movies"], json!([{ "movie_id": 10, "title": "X" }]));
    assert_eq!(second[0]["movies"], json!([{ "movie_id": 11, "title": "Y" }]));
}

#[test]
fn test_aggregate_group_key_can_also_be_nested() {
    init_for_tests();

    let spec = FieldSpecMap::builder()
        .group("movies", GroupShape::Array, Identity::Structural)
        .nest_columns("movies", &["movie_id", "theater_id"])
        .build()
        .unwrap();
    let rows = FlatRowFactory::from_json(json!([
        { "theater_id": 1, "movie_id": 10 },
        { "theater_id": 1, "movie_id": 11 }
    ]));

    let out = aggregate(&rows, "theater_id", &spec).unwrap();

    assert_eq!(
        as_json(out),
        json!([{
            "theater_id": 1,
            "movies": [
                { "movie_id": 10, "theater_id": 1 },
                { "movie_id": 11, "theater_id": 1 }
            ]
        }])
    );
}
