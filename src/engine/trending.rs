use crate::engine::ratings::RatingsSnapshot;
use crate::engine::tfidf::ContentIndex;
use crate::models::MovieId;

/// Matches every movie regardless of genre
pub const ALL_CATEGORIES: &str = "all";

/// Ranks movies by `average_rating x ln(rating_count + 1)`
///
/// The log term balances quality against volume: one 5-star rating does not
/// outrank a 4.2 average built from hundreds of ratings. A category other
/// than `"all"` filters by genre name (case-insensitive); movies without
/// ingested metadata are only eligible under `"all"`.
pub fn trending(
    snapshot: &RatingsSnapshot,
    index: &ContentIndex,
    category: &str,
    limit: usize,
) -> Vec<MovieId> {
    let match_all = category.eq_ignore_ascii_case(ALL_CATEGORIES);

    let mut scores: Vec<(MovieId, f64)> = snapshot
        .movies()
        .filter(|(movie_id, _)| match_all || in_category(index, *movie_id, category))
        .map(|(movie_id, user_ratings)| {
            let count = user_ratings.len() as f64;
            let average = user_ratings.values().sum::<f64>() / count;
            (movie_id, average * (count + 1.0).ln())
        })
        .collect();

    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scores.truncate(limit);
    scores.into_iter().map(|(movie_id, _)| movie_id).collect()
}

fn in_category(index: &ContentIndex, movie_id: MovieId, category: &str) -> bool {
    index
        .metadata(movie_id)
        .map(|meta| {
            meta.genres
                .iter()
                .any(|genre| genre.eq_ignore_ascii_case(category))
        })
        .unwrap_or(false)
}
