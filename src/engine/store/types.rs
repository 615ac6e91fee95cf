use crate::engine::errors::StoreError;
use crate::engine::types::FlatRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type MovieId = i64;
pub type TheaterId = i64;
pub type CriticId = i64;
pub type ReviewId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub movie_id: MovieId,
    pub title: String,
    #[serde(default)]
    pub runtime_in_minutes: Option<i64>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theater {
    pub theater_id: TheaterId,
    pub name: String,
    #[serde(default)]
    pub address_line_1: Option<String>,
    #[serde(default)]
    pub address_line_2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Join table: which theater shows (or showed) which movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieTheater {
    pub movie_id: MovieId,
    pub theater_id: TheaterId,
    #[serde(default)]
    pub is_showing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Critic {
    pub critic_id: CriticId,
    pub preferred_name: String,
    pub surname: String,
    pub organization_name: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: ReviewId,
    pub content: String,
    #[serde(default)]
    pub score: Option<i64>,
    pub critic_id: CriticId,
    pub movie_id: MovieId,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Columns a client may change on a review. `score: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPatch {
    pub content: Option<String>,
    pub score: Option<Option<i64>>,
}

impl ReviewPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.score.is_none()
    }

    pub fn apply(&self, review: &mut Review, now: DateTime<Utc>) {
        if let Some(content) = &self.content {
            review.content = content.clone();
        }
        if let Some(score) = self.score {
            review.score = score;
        }
        review.updated_at = now;
    }
}

/// Serializes a table record into a flat row in field declaration order.
pub fn to_row<T: Serialize>(record: &T) -> Result<FlatRow, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(StoreError::NotARow(other.to_string())),
    }
}

/// Renames every column to `<prefix><column>`, as a `SELECT t.col AS ...`
/// projection would.
pub fn prefix_columns(row: FlatRow, prefix: &str) -> FlatRow {
    row.into_iter()
        .map(|(column, value)| (format!("{}{}", prefix, column), value))
        .collect()
}
