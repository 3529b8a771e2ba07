//! Hybrid recommendation engine
//!
//! Blends content-based similarity (TF-IDF over movie metadata) with
//! user-based collaborative filtering (Pearson correlation), fused with
//! popularity, recency, and quality-weighted rating signals. All state is a
//! process-lifetime cache rebuilt from the collaborator stores; a restart
//! loses nothing that cannot be reloaded.

pub mod collaborative;
pub mod content;
pub mod document;
pub mod hybrid;
pub mod ratings;
pub mod tfidf;
pub mod trending;

use tokio::sync::{RwLock, RwLockReadGuard};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{MovieId, MovieRecord, RatingObservation, Recommendation, UserId};
use crate::sources::RatingsSource;
use ratings::RatingsSnapshot;
use tfidf::ContentIndex;

/// The recommendation engine
///
/// Owned by the application's composition root and shared by reference
/// (wrap in `Arc` to hand to concurrent query layers). Reads run
/// concurrently; mutations and the lazy TF-IDF rebuild take exclusive
/// access, and snapshots are built fully before being swapped in, so a
/// reader never observes a half-updated structure.
///
/// Lock order where both are needed: ratings before content.
pub struct RecommendationEngine {
    config: EngineConfig,
    ratings: RwLock<RatingsSnapshot>,
    content: RwLock<ContentIndex>,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl RecommendationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ratings: RwLock::new(RatingsSnapshot::default()),
            content: RwLock::new(ContentIndex::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ingests (or refreshes) metadata for one movie
    ///
    /// Stores the normalized record and marks the content index stale; the
    /// expensive TF-IDF rebuild is deferred to the next query. Movie id 0 is
    /// the collaborator's "unknown" sentinel and is ignored.
    pub async fn ingest_movie(&self, movie_id: MovieId, record: MovieRecord) {
        if movie_id == 0 {
            tracing::warn!("Ignoring metadata ingestion with movie id 0");
            return;
        }
        let mut index = self.content.write().await;
        index.insert(movie_id, record.into());
        tracing::debug!(movie_id, corpus_size = index.movie_count(), "Ingested movie metadata");
    }

    /// Replaces the ratings snapshot from the collaborator
    ///
    /// Always a wholesale replacement; the engine never assumes delta feeds.
    /// On source failure the prior snapshot is left intact (stale beats
    /// empty) and the error is returned for the caller to log or retry.
    pub async fn load_ratings(&self, source: &dyn RatingsSource) -> EngineResult<usize> {
        let observations = match source.fetch_all().await {
            Ok(observations) => observations,
            Err(e) => {
                tracing::warn!(source = source.name(), error = %e, "Ratings load failed; keeping prior snapshot");
                return Err(EngineError::RatingsSource(e));
            }
        };
        Ok(self.replace_ratings(observations).await)
    }

    /// Replaces the ratings snapshot from rows the caller already holds
    pub async fn replace_ratings(&self, observations: Vec<RatingObservation>) -> usize {
        // Build outside the lock; swap is the only exclusive section
        let snapshot = RatingsSnapshot::from_observations(observations);
        let count = snapshot.rating_count();
        *self.ratings.write().await = snapshot;
        tracing::info!(rating_count = count, "Ratings snapshot replaced");
        count
    }

    /// Movies most similar to the given movie, as `(movie_id, score)` ranked
    /// descending
    ///
    /// Unknown movie ids and an empty corpus yield an empty list.
    pub async fn similar_movies(&self, movie_id: MovieId, n: usize) -> Vec<(MovieId, f64)> {
        let index = self.clean_index().await;
        content::similar_movies(&index, self.config.reference_year, movie_id, n)
    }

    /// Pure collaborative-filtering predictions for a user, ranked descending
    ///
    /// A user with no ratings gets an empty list (cold start).
    pub async fn collaborative_filtering(&self, user_id: UserId, n: usize) -> Vec<(MovieId, f64)> {
        let snapshot = self.ratings.read().await;
        collaborative::predict(&snapshot, user_id, self.config.max_neighbors, n)
    }

    /// Personalized recommendations blending collaborative and content signals
    pub async fn hybrid_recommendations(&self, user_id: UserId, n: usize) -> Vec<Recommendation> {
        let snapshot = self.ratings.read().await;
        let index = self.clean_index().await;
        let recommendations = hybrid::recommend(&snapshot, &index, &self.config, user_id, n);
        tracing::debug!(
            user_id,
            returned = recommendations.len(),
            "Hybrid recommendations computed"
        );
        recommendations
    }

    /// Trending movies by rating volume and average, optionally filtered to a
    /// genre category (`"all"` for no filter)
    pub async fn trending(&self, category: &str, limit: usize) -> Vec<MovieId> {
        let snapshot = self.ratings.read().await;
        let index = self.content.read().await;
        trending::trending(&snapshot, &index, category, limit)
    }

    /// Number of movies with ingested metadata
    pub async fn movie_count(&self) -> usize {
        self.content.read().await.movie_count()
    }

    /// Number of rating observations in the current snapshot
    pub async fn rating_count(&self) -> usize {
        self.ratings.read().await.rating_count()
    }

    /// Returns a read guard over a Clean content index, rebuilding first if
    /// any metadata changed since the last build
    ///
    /// The rebuild runs under the write lock, so it is exclusive with
    /// ingestion and with other readers; the loop re-checks because an
    /// ingestion may slip in between dropping the write lock and re-acquiring
    /// the read lock.
    async fn clean_index(&self) -> RwLockReadGuard<'_, ContentIndex> {
        loop {
            {
                let index = self.content.read().await;
                if index.is_clean() {
                    return index;
                }
            }
            let mut index = self.content.write().await;
            index.rebuild_if_dirty();
        }
    }
}
