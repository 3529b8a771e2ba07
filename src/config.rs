use chrono::Datelike;
use serde::Deserialize;

/// Engine configuration loaded from environment variables (prefix `ENGINE_`)
///
/// Scoring weights are fixed constants in the scoring modules; only the
/// knobs that genuinely vary per deployment live here.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Anchor year for recency scoring (defaults to the current UTC year)
    #[serde(default = "default_reference_year")]
    pub reference_year: i32,

    /// Maximum number of collaborative-filtering neighbors per user
    #[serde(default = "default_max_neighbors")]
    pub max_neighbors: usize,

    /// How many of the user's top-rated movies seed content expansion
    #[serde(default = "default_seed_movies")]
    pub seed_movies: usize,

    /// How many similar movies to pull per seed during content expansion
    #[serde(default = "default_seed_similar")]
    pub seed_similar: usize,
}

fn default_reference_year() -> i32 {
    chrono::Utc::now().year()
}

fn default_max_neighbors() -> usize {
    30
}

fn default_seed_movies() -> usize {
    10
}

fn default_seed_similar() -> usize {
    15
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_year: default_reference_year(),
            max_neighbors: default_max_neighbors(),
            seed_movies: default_seed_movies(),
            seed_similar: default_seed_similar(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed("ENGINE_")
            .from_env::<EngineConfig>()
            .map_err(|e| anyhow::anyhow!("Failed to load engine config: {}", e))
    }

    /// Configuration pinned to a specific recency anchor year
    pub fn with_reference_year(reference_year: i32) -> Self {
        Self {
            reference_year,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_neighbors, 30);
        assert_eq!(config.seed_movies, 10);
        assert_eq!(config.seed_similar, 15);
        assert!(config.reference_year >= 2024);
    }

    #[test]
    fn test_with_reference_year() {
        let config = EngineConfig::with_reference_year(2024);
        assert_eq!(config.reference_year, 2024);
        assert_eq!(config.max_neighbors, 30);
    }
}
