use crate::api::errors::ApiError;
use crate::api::reviews::critic_reducer;
use crate::api::validation::{parse_flag, parse_id};
use crate::engine::store::{Database, Movie, ReviewFilter};
use crate::engine::types::row_to_json;
use crate::shared::response::Response;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Resolves `raw` to an existing movie or a 404.
pub async fn movie_exists(db: &Database, raw: &str) -> Result<Movie, ApiError> {
    let found = match parse_id(raw) {
        Some(movie_id) => db.read_movie(movie_id).await,
        None => None,
    };
    found.ok_or_else(|| ApiError::not_found(format!("Movie cannot be found: {}", raw)))
}

/// `GET /movies[?is_showing=true]`
pub async fn list(db: &Database, params: &HashMap<String, String>) -> Result<Response, ApiError> {
    let showing_only = parse_flag(params, "is_showing")?;
    let movies = db.list_movies(showing_only).await;
    debug!(
        target: "marquee::movies",
        showing_only,
        count = movies.len(),
        "Listed movies"
    );
    Ok(Response::ok_json(serde_json::to_value(movies).map_err(
        |e| ApiError::Internal(e.to_string()),
    )?))
}

/// `GET /movies/:movieId`
pub async fn read(db: &Database, raw_id: &str) -> Result<Response, ApiError> {
    let movie = movie_exists(db, raw_id).await?;
    Ok(Response::ok_json(
        serde_json::to_value(movie).map_err(|e| ApiError::Internal(e.to_string()))?,
    ))
}

/// `GET /movies/:movieId/theaters`: flat join rows, one per theater.
pub async fn theaters(db: &Database, raw_id: &str) -> Result<Response, ApiError> {
    let movie = movie_exists(db, raw_id).await?;
    let rows = db.movie_theaters(movie.movie_id).await?;
    Ok(Response::ok_json(Value::Array(
        rows.into_iter().map(row_to_json).collect(),
    )))
}

/// `GET /movies/:movieId/reviews`: each review with its `critic` nested.
pub async fn reviews(db: &Database, raw_id: &str) -> Result<Response, ApiError> {
    let movie = movie_exists(db, raw_id).await?;
    let rows = db
        .reviews_with_critics(ReviewFilter::ByMovie(movie.movie_id))
        .await?;
    let records = critic_reducer()?.reduce(&rows)?;
    Ok(Response::ok_json(Value::Array(
        records.into_iter().map(Value::Object).collect(),
    )))
}
