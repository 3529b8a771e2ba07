use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// How many billed cast members are kept per movie
const CAST_LIMIT: usize = 8;

/// A genre as supplied by the metadata collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

impl Genre {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Raw metadata payload for one movie, as supplied by the collaborator
///
/// Every field carries a serde default so sparse payloads deserialize cleanly;
/// downstream scoring never performs presence checks. Missing data becomes a
/// defined "unknown" sentinel (empty string/list, zero).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Cast names ordered by billing; only the top few are retained
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub original_language: String,
    /// `YYYY-MM-DD`; the year is extracted from the first 4 characters
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
}

/// Normalized per-movie metadata held by the engine
///
/// Derived from a [`MovieRecord`] at ingestion time. A second ingestion for
/// the same movie id replaces this wholesale (last write wins).
#[derive(Debug, Clone, PartialEq)]
pub struct MovieMetadata {
    pub title: String,
    pub genres: Vec<String>,
    pub genre_ids: HashSet<u32>,
    pub keywords: Vec<String>,
    pub cast: Vec<String>,
    pub director: String,
    pub overview: String,
    pub language: String,
    /// Release year; 0 when unknown or unparseable
    pub year: i32,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: u32,
}

impl From<MovieRecord> for MovieMetadata {
    fn from(record: MovieRecord) -> Self {
        let genre_ids = record.genres.iter().map(|g| g.id).collect();
        let genres = record.genres.into_iter().map(|g| g.name).collect();

        let mut cast = record.cast;
        cast.truncate(CAST_LIMIT);

        Self {
            title: record.title,
            genres,
            genre_ids,
            keywords: record.keywords,
            cast,
            director: record.director,
            overview: record.overview,
            language: record.original_language,
            year: parse_year(&record.release_date),
            popularity: record.popularity,
            vote_average: record.vote_average,
            vote_count: record.vote_count,
        }
    }
}

/// Extracts the year from a `YYYY-MM-DD` release date, 0 on any failure
fn parse_year(release_date: &str) -> i32 {
    release_date
        .get(..4)
        .and_then(|y| y.parse::<i32>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> MovieRecord {
        MovieRecord {
            title: "Inception".to_string(),
            genres: vec![Genre::new(28, "Action"), Genre::new(878, "Science Fiction")],
            keywords: vec!["dream".to_string(), "heist".to_string()],
            cast: (0..12).map(|i| format!("Actor {}", i)).collect(),
            director: "Christopher Nolan".to_string(),
            overview: "A thief who steals corporate secrets.".to_string(),
            original_language: "en".to_string(),
            release_date: "2010-07-16".to_string(),
            popularity: 151.2,
            vote_average: 8.4,
            vote_count: 33000,
        }
    }

    #[test]
    fn test_normalization() {
        let meta: MovieMetadata = sample_record().into();
        assert_eq!(meta.year, 2010);
        assert_eq!(meta.cast.len(), CAST_LIMIT);
        assert_eq!(meta.genres, vec!["Action", "Science Fiction"]);
        assert!(meta.genre_ids.contains(&878));
    }

    #[test]
    fn test_unparseable_release_date_defaults_to_zero() {
        let mut record = sample_record();
        record.release_date = "soon".to_string();
        let meta: MovieMetadata = record.into();
        assert_eq!(meta.year, 0);

        let empty: MovieMetadata = MovieRecord::default().into();
        assert_eq!(empty.year, 0);
        assert!(empty.genres.is_empty());
    }

    #[test]
    fn test_sparse_payload_deserializes() {
        let record: MovieRecord = serde_json::from_str(r#"{"title": "Unknown"}"#).unwrap();
        assert_eq!(record.title, "Unknown");
        assert!(record.cast.is_empty());
        assert_eq!(record.vote_count, 0);
    }
}
