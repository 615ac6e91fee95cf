use crate::engine::errors::StoreError;
use crate::engine::store::seed::SeedData;
use crate::engine::store::types::{
    Critic, CriticId, Movie, MovieId, Review, ReviewId, ReviewPatch, prefix_columns, to_row,
};
use crate::engine::types::{FlatRow, join_columns};
use chrono::Utc;
use std::collections::HashSet;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Column prefix for critic columns in review joins.
pub const CRITIC_PREFIX: &str = "critic_";

/// Movie columns carried into theater listings.
const THEATER_MOVIE_COLUMNS: &[&str] = &[
    "movie_id",
    "title",
    "runtime_in_minutes",
    "rating",
    "description",
    "image_url",
];

/// Which reviews a review/critic join should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewFilter {
    ByMovie(MovieId),
    ById(ReviewId),
}

/// In-memory relational data set. Each query holds the lock for its
/// own duration only.
#[derive(Debug, Default)]
pub struct Database {
    tables: RwLock<SeedData>,
}

impl Database {
    pub fn new(seed: SeedData) -> Result<Self, StoreError> {
        seed.validate()?;
        Ok(Self {
            tables: RwLock::new(seed),
        })
    }

    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let seed = SeedData::load(path)?;
        info!(target: "marquee::store", path = %path.display(), "Database opened");
        Self::new(seed)
    }

    /// Returns a copy of every table.
    pub async fn snapshot(&self) -> SeedData {
        self.tables.read().await.clone()
    }

    /// Every movie, or with `showing_only` only those playing somewhere,
    /// each at most once.
    pub async fn list_movies(&self, showing_only: bool) -> Vec<Movie> {
        let tables = self.tables.read().await;
        if !showing_only {
            return tables.movies.clone();
        }

        let showing: HashSet<MovieId> = tables
            .movies_theaters
            .iter()
            .filter(|mt| mt.is_showing)
            .map(|mt| mt.movie_id)
            .collect();
        debug!(
            target: "marquee::store",
            showing = showing.len(),
            "Filtering movies to those showing"
        );
        tables
            .movies
            .iter()
            .filter(|m| showing.contains(&m.movie_id))
            .cloned()
            .collect()
    }

    pub async fn read_movie(&self, movie_id: MovieId) -> Option<Movie> {
        let tables = self.tables.read().await;
        tables.movies.iter().find(|m| m.movie_id == movie_id).cloned()
    }

    /// `movies_theaters ⋈ movies ⋈ theaters` restricted to one movie.
    pub async fn movie_theaters(&self, movie_id: MovieId) -> Result<Vec<FlatRow>, StoreError> {
        let tables = self.tables.read().await;
        let Some(movie) = tables.movies.iter().find(|m| m.movie_id == movie_id) else {
            return Ok(Vec::new());
        };
        let movie_row = to_row(movie)?;

        let mut rows = Vec::new();
        for mt in tables.movies_theaters.iter().filter(|mt| mt.movie_id == movie_id) {
            let Some(theater) = tables
                .theaters
                .iter()
                .find(|t| t.theater_id == mt.theater_id)
            else {
                continue;
            };
            rows.push(join_columns([&to_row(mt)?, &movie_row, &to_row(theater)?]));
        }
        Ok(rows)
    }

    /// `theaters ⋈ movies_theaters ⋈ movies`, one row per showing, with the
    /// movie projected to its listing columns plus `is_showing`.
    pub async fn theaters_with_movies(&self) -> Result<Vec<FlatRow>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows = Vec::new();
        for theater in &tables.theaters {
            let theater_row = to_row(theater)?;
            for mt in tables
                .movies_theaters
                .iter()
                .filter(|mt| mt.theater_id == theater.theater_id)
            {
                let Some(movie) = tables.movies.iter().find(|m| m.movie_id == mt.movie_id) else {
                    continue;
                };
                let mut movie_row = to_row(movie)?;
                movie_row.retain(|column, _| THEATER_MOVIE_COLUMNS.contains(&column.as_str()));
                movie_row.insert("is_showing".into(), mt.is_showing.into());
                rows.push(join_columns([&theater_row, &movie_row]));
            }
        }
        Ok(rows)
    }

    /// `reviews ⋈ critics`, critic columns renamed with [`CRITIC_PREFIX`]
    /// (the join column `critic_id` stays as is).
    pub async fn reviews_with_critics(
        &self,
        filter: ReviewFilter,
    ) -> Result<Vec<FlatRow>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows = Vec::new();
        for review in tables.reviews.iter().filter(|r| match filter {
            ReviewFilter::ByMovie(id) => r.movie_id == id,
            ReviewFilter::ById(id) => r.review_id == id,
        }) {
            let Some(critic) = tables
                .critics
                .iter()
                .find(|c| c.critic_id == review.critic_id)
            else {
                continue;
            };
            let mut critic_row = to_row(critic)?;
            critic_row.shift_remove("critic_id");
            rows.push(join_columns([
                &to_row(review)?,
                &prefix_columns(critic_row, CRITIC_PREFIX),
            ]));
        }
        Ok(rows)
    }

    pub async fn read_review(&self, review_id: ReviewId) -> Option<Review> {
        let tables = self.tables.read().await;
        tables
            .reviews
            .iter()
            .find(|r| r.review_id == review_id)
            .cloned()
    }

    pub async fn read_critic(&self, critic_id: CriticId) -> Option<Critic> {
        let tables = self.tables.read().await;
        tables
            .critics
            .iter()
            .find(|c| c.critic_id == critic_id)
            .cloned()
    }

    /// Applies `patch` and stamps `updated_at`. `None` if the review is gone.
    pub async fn update_review(&self, review_id: ReviewId, patch: &ReviewPatch) -> Option<Review> {
        let mut tables = self.tables.write().await;
        let review = tables.reviews.iter_mut().find(|r| r.review_id == review_id)?;
        patch.apply(review, Utc::now());
        debug!(target: "marquee::store", review_id, "Review updated");
        Some(review.clone())
    }

    /// Returns whether a row was removed.
    pub async fn delete_review(&self, review_id: ReviewId) -> bool {
        let mut tables = self.tables.write().await;
        let before = tables.reviews.len();
        tables.reviews.retain(|r| r.review_id != review_id);
        let removed = tables.reviews.len() != before;
        debug!(target: "marquee::store", review_id, removed, "Review delete");
        removed
    }
}
