use crate::api::errors::ApiError;
use crate::api::validation::{parse_id, review_patch};
use crate::engine::aggregate::{
    AggregateError, FieldSpecMap, GroupShape, Identity, Passthrough, Reducer,
};
use crate::engine::store::types::ReviewId;
use crate::engine::store::{CRITIC_PREFIX, Database, Review, ReviewFilter};
use crate::shared::response::Response;
use serde_json::Value;
use tracing::info;

/// Critic columns as they appear (prefixed) in review joins.
const CRITIC_COLUMNS: &[&str] = &[
    "preferred_name",
    "surname",
    "organization_name",
    "created_at",
    "updated_at",
];

/// One record per review with its critic nested as a single `critic`
/// object. `critic_id` stays on the review as well.
pub fn critic_reducer() -> Result<Reducer, AggregateError> {
    let mut builder = FieldSpecMap::builder()
        .direct("critic_id")
        .group(
            "critic",
            GroupShape::Object,
            Identity::Field("critic_id".to_string()),
        )
        .nested("critic_id", "critic", "critic_id")
        .passthrough(Passthrough::Unmapped);
    for column in CRITIC_COLUMNS {
        builder = builder.nested(column, "critic", &format!("{}{}", CRITIC_PREFIX, column));
    }
    Reducer::new("review_id", builder.build()?)
}

fn review_not_found(raw: &str) -> ApiError {
    ApiError::not_found(format!("Review cannot be found: {}", raw))
}

/// Resolves `raw` to an existing review or a 404.
pub async fn review_exists(db: &Database, raw: &str) -> Result<Review, ApiError> {
    let found = match parse_id(raw) {
        Some(review_id) => db.read_review(review_id).await,
        None => None,
    };
    found.ok_or_else(|| review_not_found(raw))
}

/// Reads one review with its `critic` nested; 404 if it is gone.
pub async fn read_with_critic(
    db: &Database,
    review_id: ReviewId,
    raw_id: &str,
) -> Result<Value, ApiError> {
    let rows = db.reviews_with_critics(ReviewFilter::ById(review_id)).await?;
    critic_reducer()?
        .reduce(&rows)?
        .into_iter()
        .next()
        .map(Value::Object)
        .ok_or_else(|| review_not_found(raw_id))
}

/// `PUT /reviews/:reviewId`
pub async fn update(db: &Database, raw_id: &str, body: &[u8]) -> Result<Response, ApiError> {
    let review = review_exists(db, raw_id).await?;
    let patch = review_patch(body)?;

    // Either may miss if the review is deleted concurrently.
    if db.update_review(review.review_id, &patch).await.is_none() {
        return Err(review_not_found(raw_id));
    }
    info!(target: "marquee::reviews", review_id = review.review_id, "Review updated");

    let updated = read_with_critic(db, review.review_id, raw_id).await?;
    Ok(Response::ok_json(updated))
}

/// `DELETE /reviews/:reviewId`
pub async fn destroy(db: &Database, raw_id: &str) -> Result<Response, ApiError> {
    let review = review_exists(db, raw_id).await?;
    db.delete_review(review.review_id).await;
    info!(target: "marquee::reviews", review_id = review.review_id, "Review deleted");
    Ok(Response::no_content())
}
