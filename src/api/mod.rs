//! Resource services for movies, theaters and reviews.
//!
//! Each operation takes the database and the raw request pieces it needs
//! and returns a [`Response`](crate::shared::response::Response) or an
//! [`ApiError`] carrying the HTTP status to answer with.

pub mod errors;
pub mod movies;
pub mod reviews;
pub mod theaters;
pub mod validation;

pub use errors::ApiError;
