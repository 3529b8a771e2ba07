use std::collections::HashMap;

use crate::models::{MovieId, RatingObservation, UserId};

/// In-memory view of the ratings store: forward (user -> movie -> score) and
/// reverse (movie -> user -> score) maps
///
/// Both maps are built together from one pass over the source rows and are
/// never mutated independently, so they always agree on every (user, movie,
/// score) triple. The snapshot is replaced wholesale; it carries no identity
/// of its own and is fully rebuildable from the collaborator.
#[derive(Debug, Default)]
pub struct RatingsSnapshot {
    by_user: HashMap<UserId, HashMap<MovieId, f64>>,
    by_movie: HashMap<MovieId, HashMap<UserId, f64>>,
}

impl RatingsSnapshot {
    /// Builds a snapshot from source rows
    ///
    /// Duplicate (user, movie) pairs resolve last-write-wins. Rows with an
    /// out-of-range score are skipped with a warning rather than failing the
    /// whole load.
    pub fn from_observations(observations: Vec<RatingObservation>) -> Self {
        let mut snapshot = Self::default();
        for obs in observations {
            if !RatingObservation::is_valid_score(obs.score) {
                tracing::warn!(
                    user_id = obs.user_id,
                    movie_id = obs.movie_id,
                    score = obs.score,
                    "Skipping rating with out-of-range score"
                );
                continue;
            }
            snapshot
                .by_user
                .entry(obs.user_id)
                .or_default()
                .insert(obs.movie_id, obs.score);
            snapshot
                .by_movie
                .entry(obs.movie_id)
                .or_default()
                .insert(obs.user_id, obs.score);
        }
        snapshot
    }

    pub fn user_ratings(&self, user_id: UserId) -> Option<&HashMap<MovieId, f64>> {
        self.by_user.get(&user_id)
    }

    pub fn users(&self) -> impl Iterator<Item = (UserId, &HashMap<MovieId, f64>)> {
        self.by_user.iter().map(|(id, ratings)| (*id, ratings))
    }

    pub fn movies(&self) -> impl Iterator<Item = (MovieId, &HashMap<UserId, f64>)> {
        self.by_movie.iter().map(|(id, ratings)| (*id, ratings))
    }

    /// Total number of observations held
    pub fn rating_count(&self) -> usize {
        self.by_user.values().map(HashMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(user_id: UserId, movie_id: MovieId, score: f64) -> RatingObservation {
        RatingObservation {
            user_id,
            movie_id,
            score,
        }
    }

    #[test]
    fn test_forward_and_reverse_maps_agree() {
        let snapshot = RatingsSnapshot::from_observations(vec![
            obs(1, 10, 4.0),
            obs(1, 11, 2.5),
            obs(2, 10, 5.0),
        ]);

        for (user_id, ratings) in snapshot.users() {
            for (movie_id, score) in ratings {
                let reverse = snapshot
                    .movies()
                    .find(|(id, _)| id == movie_id)
                    .and_then(|(_, users)| users.get(&user_id).copied());
                assert_eq!(reverse, Some(*score));
            }
        }
        assert_eq!(snapshot.rating_count(), 3);
    }

    #[test]
    fn test_rerating_supersedes() {
        let snapshot =
            RatingsSnapshot::from_observations(vec![obs(1, 10, 2.0), obs(1, 10, 4.5)]);
        assert_eq!(snapshot.user_ratings(1).unwrap().get(&10), Some(&4.5));
        assert_eq!(snapshot.rating_count(), 1);
    }

    #[test]
    fn test_invalid_scores_are_skipped() {
        let snapshot =
            RatingsSnapshot::from_observations(vec![obs(1, 10, 7.0), obs(1, 11, 3.0)]);
        assert!(snapshot.user_ratings(1).unwrap().get(&10).is_none());
        assert_eq!(snapshot.rating_count(), 1);
    }
}
