/// Engine-level errors
///
/// Missing data (unknown movie, unrated user, empty corpus) is not an error:
/// queries return empty results so a cold-start system degrades gracefully.
/// Errors exist only at the collaborator boundary and for input validation.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("Ratings source error: {0}")]
    RatingsSource(#[source] anyhow::Error),

    #[error("Invalid rating score {score}: must be in [0.5, 5.0] in 0.5 steps")]
    InvalidScore { score: f64 },
}

pub type EngineResult<T> = Result<T, EngineError>;
