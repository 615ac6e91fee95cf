pub mod database;
pub mod seed;
pub mod types;

pub use database::{CRITIC_PREFIX, Database, ReviewFilter};
pub use seed::SeedData;
pub use types::{Critic, Movie, MovieTheater, Review, ReviewPatch, Theater};
