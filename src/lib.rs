//! cinemate-engine: hybrid movie recommendation engine
//!
//! Given sparse user-movie ratings and per-movie metadata, produces ranked
//! movie suggestions by blending TF-IDF content similarity, Pearson
//! collaborative filtering, and popularity/recency/quality signals. The
//! surrounding application supplies ratings and metadata and consumes the
//! ranked lists; this crate holds no persistence and fetches nothing itself.

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod sources;

pub use config::EngineConfig;
pub use engine::RecommendationEngine;
pub use error::{EngineError, EngineResult};
pub use models::{
    Genre, MovieId, MovieMetadata, MovieRecord, RatingObservation, Recommendation, UserId,
};
pub use sources::RatingsSource;
