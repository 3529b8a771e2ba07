use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{MovieId, UserId};

/// One user's rating of one movie
///
/// Scores run from 0.5 to 5.0 in half-star steps. The ratings store holds at
/// most one observation per (user, movie) pair; the engine's snapshot applies
/// last-write-wins when a source replays duplicates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RatingObservation {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub score: f64,
}

impl RatingObservation {
    /// Creates a validated observation
    pub fn new(user_id: UserId, movie_id: MovieId, score: f64) -> EngineResult<Self> {
        if !Self::is_valid_score(score) {
            return Err(EngineError::InvalidScore { score });
        }
        Ok(Self {
            user_id,
            movie_id,
            score,
        })
    }

    /// True when the score is a half-star value in [0.5, 5.0]
    pub fn is_valid_score(score: f64) -> bool {
        if !(0.5..=5.0).contains(&score) {
            return false;
        }
        let doubled = score * 2.0;
        (doubled - doubled.round()).abs() < 1e-9
    }
}
