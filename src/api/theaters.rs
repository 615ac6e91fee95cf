use crate::api::errors::ApiError;
use crate::engine::aggregate::{AggregateError, FieldSpecMap, GroupShape, Identity, Reducer};
use crate::engine::store::Database;
use crate::shared::response::Response;
use serde_json::Value;
use tracing::debug;

/// Movie columns folded into each theater's `movies` array.
const MOVIE_COLUMNS: &[&str] = &[
    "movie_id",
    "title",
    "runtime_in_minutes",
    "rating",
    "description",
    "image_url",
    "is_showing",
];

/// One record per theater; its showings nested under `movies`.
pub fn movies_reducer() -> Result<Reducer, AggregateError> {
    let spec = FieldSpecMap::builder()
        .group(
            "movies",
            GroupShape::Array,
            Identity::Field("movie_id".to_string()),
        )
        .nest_columns("movies", MOVIE_COLUMNS)
        .build()?;
    Reducer::new("theater_id", spec)
}

/// `GET /theaters`
pub async fn list(db: &Database) -> Result<Response, ApiError> {
    let rows = db.theaters_with_movies().await?;
    let theaters = movies_reducer()?.reduce(&rows)?;
    debug!(
        target: "marquee::theaters",
        rows = rows.len(),
        theaters = theaters.len(),
        "Listed theaters"
    );
    Ok(Response::ok_json(Value::Array(
        theaters.into_iter().map(Value::Object).collect(),
    )))
}
