use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::engine::collaborative;
use crate::engine::content;
use crate::engine::ratings::RatingsSnapshot;
use crate::engine::tfidf::ContentIndex;
use crate::models::{MovieId, Recommendation, UserId};

const MAX_RATING: f64 = 5.0;

/// Ratings at which collaborative influence stops growing
const COLLAB_RAMP_RATINGS: f64 = 10.0;
/// Upper bound on collaborative influence even for heavy raters
const COLLAB_WEIGHT_CAP: f64 = 0.6;

const POPULARITY_DIVISOR: f64 = 200.0;
const POPULARITY_BOOST_CAP: f64 = 0.15;

/// Blends collaborative predictions with content-based expansion from the
/// user's own top-rated movies, plus a popularity boost
///
/// New users lean entirely on content signal; collaborative influence ramps
/// linearly with rating count and caps at 60%. Movies the user already rated
/// are excluded from every candidate set. Expects a Clean content index.
pub fn recommend(
    snapshot: &RatingsSnapshot,
    index: &ContentIndex,
    config: &EngineConfig,
    user_id: UserId,
    n: usize,
) -> Vec<Recommendation> {
    let empty = HashMap::new();
    let user_rated = snapshot.user_ratings(user_id).unwrap_or(&empty);

    // Oversample so fusion has candidates to discard
    let collab = collaborative::predict(snapshot, user_id, config.max_neighbors, n * 2);

    // Content expansion: neighbors of the user's favorite movies, each
    // contribution scaled by how much the user liked the seed.
    let mut content_scores: HashMap<MovieId, f64> = HashMap::new();
    let mut seeds: Vec<(MovieId, f64)> = user_rated.iter().map(|(&m, &s)| (m, s)).collect();
    // Stable order for equal scores so tie behavior is deterministic
    seeds.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    seeds.truncate(config.seed_movies);

    for (seed_id, seed_score) in seeds {
        let seed_weight = seed_score / MAX_RATING;
        for (candidate_id, similarity) in
            content::similar_movies(index, config.reference_year, seed_id, config.seed_similar)
        {
            if user_rated.contains_key(&candidate_id) {
                continue;
            }
            *content_scores.entry(candidate_id).or_insert(0.0) += similarity * seed_weight;
        }
    }

    let collab_weight = (user_rated.len() as f64 / COLLAB_RAMP_RATINGS).min(COLLAB_WEIGHT_CAP);
    let content_weight = 1.0 - collab_weight;

    let mut combined: HashMap<MovieId, f64> = HashMap::new();
    for (movie_id, score) in collab {
        *combined.entry(movie_id).or_insert(0.0) += score * collab_weight;
    }
    for (movie_id, score) in content_scores {
        *combined.entry(movie_id).or_insert(0.0) += score * content_weight;
    }

    // Popularity boost only where metadata exists; absence is not a penalty
    for (movie_id, score) in combined.iter_mut() {
        if let Some(meta) = index.metadata(*movie_id) {
            *score += (meta.popularity / POPULARITY_DIVISOR).min(POPULARITY_BOOST_CAP);
        }
    }

    let mut recommendations: Vec<Recommendation> = combined
        .into_iter()
        .map(|(movie_id, score)| Recommendation {
            movie_id,
            score: round4(score),
        })
        .collect();

    recommendations.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    recommendations.truncate(n);
    recommendations
}

/// Rounds to 4 decimal places for presentation stability
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Genre, MovieRecord, RatingObservation};

    fn snapshot(rows: &[(UserId, MovieId, f64)]) -> RatingsSnapshot {
        RatingsSnapshot::from_observations(
            rows.iter()
                .map(|&(user_id, movie_id, score)| RatingObservation {
                    user_id,
                    movie_id,
                    score,
                })
                .collect(),
        )
    }

    fn movie(genre: (u32, &str), keywords: &[&str], popularity: f64) -> MovieRecord {
        MovieRecord {
            genres: vec![Genre::new(genre.0, genre.1)],
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            release_date: "2024-01-01".to_string(),
            vote_average: 7.0,
            vote_count: 500,
            popularity,
            ..Default::default()
        }
    }

    fn config() -> EngineConfig {
        EngineConfig::with_reference_year(2025)
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(1.0), 1.0);
    }

    #[test]
    fn test_cold_start_user_gets_empty_list() {
        let snap = snapshot(&[(2, 10, 4.0)]);
        let mut index = ContentIndex::new();
        index.insert(10, movie((35, "Comedy"), &["wedding"], 10.0).into());
        index.rebuild_if_dirty();

        assert!(recommend(&snap, &index, &config(), 1, 10).is_empty());
    }

    #[test]
    fn test_already_rated_movies_never_recommended() {
        let snap = snapshot(&[
            (1, 10, 5.0),
            (1, 11, 4.0),
            (2, 10, 5.0),
            (2, 11, 4.0),
            (2, 12, 4.5),
        ]);
        let mut index = ContentIndex::new();
        for id in [10u64, 11, 12, 13] {
            index.insert(id, movie((35, "Comedy"), &["wedding", "laughs"], 20.0).into());
        }
        index.rebuild_if_dirty();

        let recs = recommend(&snap, &index, &config(), 1, 10);
        assert!(!recs.is_empty());
        assert!(recs.iter().all(|r| r.movie_id != 10 && r.movie_id != 11));
    }

    #[test]
    fn test_popularity_boost_is_monotonic() {
        let build = |popularity: f64| {
            let snap = snapshot(&[(1, 10, 5.0)]);
            let mut index = ContentIndex::new();
            index.insert(10, movie((35, "Comedy"), &["wedding"], 5.0).into());
            index.insert(11, movie((35, "Comedy"), &["wedding"], popularity).into());
            index.rebuild_if_dirty();
            let recs = recommend(&snap, &index, &config(), 1, 10);
            recs.iter()
                .find(|r| r.movie_id == 11)
                .map(|r| r.score)
                .unwrap()
        };

        let low = build(10.0);
        let high = build(100.0);
        let saturated = build(10_000.0);
        assert!(high >= low);
        assert!(saturated >= high);
        // Boost saturates at the cap
        assert!((saturated - build(200.0 * POPULARITY_BOOST_CAP)).abs() < 1e-9);
    }

    #[test]
    fn test_collab_weight_ramp() {
        // One rating: content dominates (collab weight 0.1). With no other
        // users there is no collaborative signal at all, yet content-based
        // expansion still produces recommendations.
        let snap = snapshot(&[(1, 10, 5.0)]);
        let mut index = ContentIndex::new();
        index.insert(10, movie((35, "Comedy"), &["wedding"], 0.0).into());
        index.insert(11, movie((35, "Comedy"), &["wedding"], 0.0).into());
        index.rebuild_if_dirty();

        let recs = recommend(&snap, &index, &config(), 1, 10);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].movie_id, 11);
        assert!(recs[0].score > 0.0);
    }
}
