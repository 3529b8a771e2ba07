use crate::models::RatingObservation;

/// Ratings collaborator abstraction
///
/// The engine never assumes incremental delta feeds: a source returns the
/// complete current set of observations and the engine replaces its snapshot
/// wholesale. On failure the engine keeps its prior snapshot intact, so a
/// flaky store degrades to stale recommendations rather than empty ones.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingsSource: Send + Sync {
    /// Fetch every (user, movie, score) observation currently stored
    async fn fetch_all(&self) -> anyhow::Result<Vec<RatingObservation>>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str {
        "ratings"
    }
}
