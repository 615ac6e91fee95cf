use indexmap::IndexMap;
use serde_json::{Map, Value};

/// One joined result row: column name to scalar, in select order.
pub type FlatRow = IndexMap<String, Value>;

/// One grouped output object, serialized as-is into API responses.
pub type AggregatedRecord = Map<String, Value>;

/// Merges `rows` left to right the way `SELECT *` over a join does:
/// later tables overwrite same-named columns of earlier ones.
pub fn join_columns<'a>(parts: impl IntoIterator<Item = &'a FlatRow>) -> FlatRow {
    let mut out = FlatRow::new();
    for part in parts {
        for (column, value) in part {
            out.insert(column.clone(), value.clone());
        }
    }
    out
}

/// Converts a flat row into a JSON object, keeping column order.
pub fn row_to_json(row: FlatRow) -> Value {
    Value::Object(row.into_iter().collect())
}
