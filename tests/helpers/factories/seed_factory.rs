use crate::engine::store::database::Database;
use crate::engine::store::seed::SeedData;
use crate::engine::store::types::{Critic, Movie, MovieTheater, Review, Theater};
use chrono::{DateTime, TimeZone, Utc};

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap()
}

pub fn movie(movie_id: i64, title: &str) -> Movie {
    Movie {
        movie_id,
        title: title.to_string(),
        runtime_in_minutes: Some(120),
        rating: Some("PG".to_string()),
        description: Some(format!("About {}", title)),
        image_url: Some(format!("https://img.example.com/{}.jpg", movie_id)),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub fn theater(theater_id: i64, name: &str) -> Theater {
    Theater {
        theater_id,
        name: name.to_string(),
        address_line_1: Some(format!("{} Main St", theater_id * 100)),
        address_line_2: None,
        city: Some("Portland".to_string()),
        state: Some("OR".to_string()),
        zip: Some("97201".to_string()),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub fn critic(critic_id: i64, preferred_name: &str, surname: &str, org: &str) -> Critic {
    Critic {
        critic_id,
        preferred_name: preferred_name.to_string(),
        surname: surname.to_string(),
        organization_name: org.to_string(),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub fn review(review_id: i64, movie_id: i64, critic_id: i64, score: i64) -> Review {
    Review {
        review_id,
        content: format!("Review {} of movie {}", review_id, movie_id),
        score: Some(score),
        critic_id,
        movie_id,
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

/// Builds a small, fully consistent data set.
///
/// Movies 1 and 2 play at theater 1, movie 1 also at theater 2, movie 3
/// is listed at theater 2 but not showing, movie 4 has no theaters.
/// Movie 1 has two reviews, movie 2 has one.
pub struct SeedFactory {
    seed: SeedData,
}

impl SeedFactory {
    pub fn new() -> Self {
        let seed = SeedData {
            movies: vec![
                movie(1, "Mad Max: Fury Road"),
                movie(2, "Spirited Away"),
                movie(3, "Tenet"),
                movie(4, "Rear Window"),
            ],
            theaters: vec![theater(1, "Regal City Center"), theater(2, "Hollywood Theatre")],
            movies_theaters: vec![
                MovieTheater {
                    movie_id: 1,
                    theater_id: 1,
                    is_showing: true,
                },
                MovieTheater {
                    movie_id: 2,
                    theater_id: 1,
                    is_showing: true,
                },
                MovieTheater {
                    movie_id: 1,
                    theater_id: 2,
                    is_showing: true,
                },
                MovieTheater {
                    movie_id: 3,
                    theater_id: 2,
                    is_showing: false,
                },
            ],
            critics: vec![
                critic(1, "Chana", "Gibson", "Film Threat"),
                critic(2, "Mollie", "Nakamura", "Wall Street Journal"),
            ],
            reviews: vec![review(1, 1, 1, 3), review(2, 1, 2, 5), review(3, 2, 1, 4)],
        };
        Self { seed }
    }

    pub fn empty() -> Self {
        Self {
            seed: SeedData::default(),
        }
    }

    pub fn with_movie(mut self, movie: Movie) -> Self {
        self.seed.movies.push(movie);
        self
    }

    pub fn with_theater(mut self, theater: Theater) -> Self {
        self.seed.theaters.push(theater);
        self
    }

    pub fn with_showing(mut self, movie_id: i64, theater_id: i64, is_showing: bool) -> Self {
        self.seed.movies_theaters.push(MovieTheater {
            movie_id,
            theater_id,
            is_showing,
        });
        self
    }

    pub fn with_critic(mut self, critic: Critic) -> Self {
        self.seed.critics.push(critic);
        self
    }

    pub fn with_review(mut self, review: Review) -> Self {
        self.seed.reviews.push(review);
        self
    }

    pub fn create(self) -> SeedData {
        self.seed
    }

    pub fn database(self) -> Database {
        Database::new(self.seed).expect("factory seed should be consistent")
    }
}
