use crate::engine::errors::StoreError;
use crate::engine::store::types::{Critic, Movie, MovieTheater, Review, Theater};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;
use tracing::{debug, info};

/// All five tables, as read from a seed file or held in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub theaters: Vec<Theater>,
    #[serde(default)]
    pub movies_theaters: Vec<MovieTheater>,
    #[serde(default)]
    pub critics: Vec<Critic>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl SeedData {
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        debug!(target: "marquee::seed", path = %path.display(), "Reading seed file");
        let raw = std::fs::read_to_string(path)?;
        let seed = Self::from_json_str(&raw)?;
        info!(
            target: "marquee::seed",
            movies = seed.movies.len(),
            theaters = seed.theaters.len(),
            movies_theaters = seed.movies_theaters.len(),
            critics = seed.critics.len(),
            reviews = seed.reviews.len(),
            "Seed data loaded"
        );
        Ok(seed)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, StoreError> {
        let seed: SeedData = serde_json::from_str(raw)?;
        seed.validate()?;
        Ok(seed)
    }

    /// Enforces primary-key uniqueness and foreign-key presence.
    pub fn validate(&self) -> Result<(), StoreError> {
        let movie_ids = unique_keys("movies", self.movies.iter().map(|m| m.movie_id))?;
        let theater_ids = unique_keys("theaters", self.theaters.iter().map(|t| t.theater_id))?;
        let critic_ids = unique_keys("critics", self.critics.iter().map(|c| c.critic_id))?;
        unique_keys("reviews", self.reviews.iter().map(|r| r.review_id))?;
        unique_keys(
            "movies_theaters",
            self.movies_theaters
                .iter()
                .map(|mt| (mt.movie_id, mt.theater_id)),
        )?;

        for mt in &self.movies_theaters {
            if !movie_ids.contains(&mt.movie_id) {
                return Err(StoreError::dangling("movies_theaters", "movie_id", mt.movie_id));
            }
            if !theater_ids.contains(&mt.theater_id) {
                return Err(StoreError::dangling(
                    "movies_theaters",
                    "theater_id",
                    mt.theater_id,
                ));
            }
        }

        for review in &self.reviews {
            if !movie_ids.contains(&review.movie_id) {
                return Err(StoreError::dangling("reviews", "movie_id", review.movie_id));
            }
            if !critic_ids.contains(&review.critic_id) {
                return Err(StoreError::dangling("reviews", "critic_id", review.critic_id));
            }
        }

        Ok(())
    }
}

fn unique_keys<K: Eq + Hash + std::fmt::Debug>(
    table: &str,
    keys: impl Iterator<Item = K>,
) -> Result<HashSet<K>, StoreError> {
    let mut seen = HashSet::new();
    for key in keys {
        if let Some(dup) = seen.replace(key) {
            return Err(StoreError::Integrity(format!(
                "duplicate primary key {:?} in table '{}'",
                dup, table
            )));
        }
    }
    Ok(seen)
}
