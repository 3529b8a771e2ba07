use std::collections::HashMap;

use crate::engine::ratings::RatingsSnapshot;
use crate::models::{MovieId, UserId};

/// Fewer common ratings than this makes correlation meaningless
const MIN_COMMON_RATINGS: usize = 2;

/// Pearson correlation between two users' rating maps, computed over the
/// movies both have rated
///
/// Returns 0 (no signal, not an error) when fewer than 2 movies are shared or
/// when either user's common ratings have zero variance.
pub fn pearson(a: &HashMap<MovieId, f64>, b: &HashMap<MovieId, f64>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let common: Vec<(f64, f64)> = small
        .iter()
        .filter_map(|(movie_id, &score)| large.get(movie_id).map(|&other| (score, other)))
        .collect();

    if common.len() < MIN_COMMON_RATINGS {
        return 0.0;
    }

    let n = common.len() as f64;
    let mean_a: f64 = common.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_b: f64 = common.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_a = 0.0;
    let mut variance_b = 0.0;
    for (x, y) in &common {
        let dx = x - mean_a;
        let dy = y - mean_b;
        covariance += dx * dy;
        variance_a += dx * dx;
        variance_b += dy * dy;
    }

    let denominator = (variance_a * variance_b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    covariance / denominator
}

/// Finds the k most similar users with positive Pearson correlation
pub fn neighbors(
    snapshot: &RatingsSnapshot,
    user_id: UserId,
    k: usize,
) -> Vec<(UserId, f64)> {
    let target = match snapshot.user_ratings(user_id) {
        Some(ratings) if !ratings.is_empty() => ratings,
        _ => return Vec::new(),
    };

    let mut similarities: Vec<(UserId, f64)> = snapshot
        .users()
        .filter(|(other_id, ratings)| *other_id != user_id && !ratings.is_empty())
        .filter_map(|(other_id, ratings)| {
            let similarity = pearson(target, ratings);
            (similarity > 0.0).then_some((other_id, similarity))
        })
        .collect();

    similarities.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    similarities.truncate(k);
    similarities
}

/// Predicts ratings for movies the user has not rated, from the k nearest
/// neighbors' ratings weighted by similarity
///
/// A user with no ratings gets an empty list: with no history there is no
/// collaborative signal (cold start). Candidates whose total neighbor weight
/// is zero are excluded.
pub fn predict(
    snapshot: &RatingsSnapshot,
    user_id: UserId,
    k: usize,
    n: usize,
) -> Vec<(MovieId, f64)> {
    let target = match snapshot.user_ratings(user_id) {
        Some(ratings) if !ratings.is_empty() => ratings,
        _ => return Vec::new(),
    };

    let mut weighted_sums: HashMap<MovieId, f64> = HashMap::new();
    let mut weights: HashMap<MovieId, f64> = HashMap::new();

    for (neighbor_id, similarity) in neighbors(snapshot, user_id, k) {
        let neighbor_ratings = match snapshot.user_ratings(neighbor_id) {
            Some(ratings) => ratings,
            None => continue,
        };
        for (&movie_id, &score) in neighbor_ratings {
            if target.contains_key(&movie_id) {
                continue;
            }
            *weighted_sums.entry(movie_id).or_insert(0.0) += similarity * score;
            *weights.entry(movie_id).or_insert(0.0) += similarity.abs();
        }
    }

    let mut predictions: Vec<(MovieId, f64)> = weighted_sums
        .into_iter()
        .filter_map(|(movie_id, sum)| {
            let weight = weights.get(&movie_id).copied().unwrap_or(0.0);
            (weight > 0.0).then(|| (movie_id, sum / weight))
        })
        .collect();

    predictions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    predictions.truncate(n);
    predictions
}
