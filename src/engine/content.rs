use std::collections::HashSet;

use crate::engine::tfidf::{cosine_similarity, ContentIndex};
use crate::models::{MovieId, MovieMetadata};

// Fixed fusion weights; bonuses are additive extras on top.
const WEIGHT_SIMILARITY: f64 = 0.35;
const WEIGHT_GENRE: f64 = 0.20;
const WEIGHT_RECENCY: f64 = 0.15;
const WEIGHT_RATING: f64 = 0.10;

const DIRECTOR_BONUS: f64 = 0.15;
const SHARED_CAST_BONUS: f64 = 0.05;
const SHARED_CAST_BONUS_CAP: f64 = 0.15;
const LANGUAGE_BONUS: f64 = 0.05;

/// Candidates must share at least this much genre overlap with the query
/// movie. A hard gate, not a penalty: it keeps genre-irrelevant movies with
/// high text similarity out of the results entirely.
const GENRE_GATE: f64 = 0.25;

// Bayesian rating shrinkage: prior mean 6.0/10, prior strength 50 votes.
const RATING_PRIOR_MEAN: f64 = 6.0;
const RATING_PRIOR_VOTES: f64 = 50.0;
const UNRATED_DEFAULT: f64 = 0.3;

const UNKNOWN_YEAR_SCORE: f64 = 0.3;

/// Jaccard index of two genre-id sets (0 when either is empty)
pub fn genre_match(a: &HashSet<u32>, b: &HashSet<u32>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Step-function recency decay relative to the configured anchor year
///
/// An unknown year scores a flat 0.3: a mild penalty for missing data, not
/// an exclusion.
pub fn recency_score(year: i32, reference_year: i32) -> f64 {
    if year <= 0 {
        return UNKNOWN_YEAR_SCORE;
    }
    let age = reference_year - year;
    match age {
        i32::MIN..=1 => 1.0,
        2..=3 => 0.85,
        4..=5 => 0.70,
        6..=10 => 0.50,
        _ => (1.0 - 0.03 * age as f64).max(0.2),
    }
}

/// IMDB-style weighted rating: shrinks the vote average toward the corpus
/// prior when the vote count is small
///
/// Zero votes yields a flat low default instead of the formula, which would
/// otherwise collapse to the bare prior and overstate confidence.
pub fn rating_weight(vote_average: f64, vote_count: u32) -> f64 {
    if vote_count == 0 {
        return UNRATED_DEFAULT;
    }
    let votes = vote_count as f64;
    let confidence = votes / (votes + RATING_PRIOR_VOTES);
    confidence * vote_average / 10.0 + (1.0 - confidence) * RATING_PRIOR_MEAN / 10.0
}

/// Director/cast/language bonuses between a reference and a candidate movie
fn pairwise_bonus(reference: &MovieMetadata, candidate: &MovieMetadata) -> f64 {
    let mut bonus = 0.0;

    if !reference.director.is_empty() && reference.director == candidate.director {
        bonus += DIRECTOR_BONUS;
    }

    let shared_cast = reference
        .cast
        .iter()
        .filter(|name| candidate.cast.contains(name))
        .count();
    bonus += (shared_cast as f64 * SHARED_CAST_BONUS).min(SHARED_CAST_BONUS_CAP);

    if !reference.language.is_empty() && reference.language == candidate.language {
        bonus += LANGUAGE_BONUS;
    }

    bonus
}

/// Ranks movies by content similarity to the given movie
///
/// Combines cosine similarity over TF-IDF vectors with genre overlap, recency,
/// quality-weighted rating, and pairwise bonuses. The query movie itself never
/// appears in the output; unknown movie ids yield an empty list. Expects a
/// Clean index.
pub fn similar_movies(
    index: &ContentIndex,
    reference_year: i32,
    movie_id: MovieId,
    n: usize,
) -> Vec<(MovieId, f64)> {
    let (reference_vector, reference_meta) = match (index.vector(movie_id), index.metadata(movie_id))
    {
        (Some(vector), Some(meta)) => (vector, meta),
        _ => return Vec::new(),
    };

    let mut results: Vec<(MovieId, f64)> = Vec::new();
    for (candidate_id, candidate_vector) in index.vectors() {
        if candidate_id == movie_id {
            continue;
        }
        let candidate_meta = match index.metadata(candidate_id) {
            Some(meta) => meta,
            None => continue,
        };

        let genre = genre_match(&reference_meta.genre_ids, &candidate_meta.genre_ids);
        if genre < GENRE_GATE {
            continue;
        }

        let similarity = cosine_similarity(reference_vector, candidate_vector);
        let recency = recency_score(candidate_meta.year, reference_year);
        let rating = rating_weight(candidate_meta.vote_average, candidate_meta.vote_count);
        let bonus = pairwise_bonus(reference_meta, candidate_meta);

        let score = WEIGHT_SIMILARITY * similarity
            + WEIGHT_GENRE * genre
            + WEIGHT_RECENCY * recency
            + WEIGHT_RATING * rating
            + bonus;

        results.push((candidate_id, score));
    }

    results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(n);
    results
}
