mod movie;
mod rating;

pub use movie::{Genre, MovieMetadata, MovieRecord};
pub use rating::RatingObservation;

use serde::{Deserialize, Serialize};

/// Movie identifier assigned by the metadata collaborator (TMDB-style)
pub type MovieId = u64;

/// User identifier assigned by the ratings collaborator
pub type UserId = u64;

/// A single ranked recommendation returned to the caller
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    /// The recommended movie
    pub movie_id: MovieId,
    /// Fused score, rounded to 4 decimal places
    pub score: f64,
}
