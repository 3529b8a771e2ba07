use std::collections::HashMap;

use crate::engine::document::build_document;
use crate::models::{MovieId, MovieMetadata};

/// Sparse TF-IDF vector: token -> non-negative weight, L2-normalized
pub type TfIdfVector = HashMap<String, f64>;

/// Lifecycle of the derived index relative to the ingested metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// Vectors reflect the current metadata corpus
    Clean,
    /// Metadata changed since the last rebuild; vectors are stale
    Dirty,
}

impl Default for IndexState {
    fn default() -> Self {
        IndexState::Clean
    }
}

/// Content-side store: ingested metadata plus the derived TF-IDF model
///
/// Ingestion only stores metadata and flips the state to Dirty; the expensive
/// recomputation happens lazily in [`rebuild_if_dirty`](Self::rebuild_if_dirty),
/// amortized across many queries. The caller (the engine facade) guards all
/// state transitions with its write lock.
#[derive(Debug, Default)]
pub struct ContentIndex {
    metadata: HashMap<MovieId, MovieMetadata>,
    vectors: HashMap<MovieId, TfIdfVector>,
    idf: HashMap<String, f64>,
    state: IndexState,
}

impl ContentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or overwrites metadata for a movie and marks the index Dirty
    pub fn insert(&mut self, movie_id: MovieId, metadata: MovieMetadata) {
        self.metadata.insert(movie_id, metadata);
        self.state = IndexState::Dirty;
    }

    pub fn is_clean(&self) -> bool {
        self.state == IndexState::Clean
    }

    pub fn metadata(&self, movie_id: MovieId) -> Option<&MovieMetadata> {
        self.metadata.get(&movie_id)
    }

    pub fn vector(&self, movie_id: MovieId) -> Option<&TfIdfVector> {
        self.vectors.get(&movie_id)
    }

    pub fn vectors(&self) -> impl Iterator<Item = (MovieId, &TfIdfVector)> {
        self.vectors.iter().map(|(id, vec)| (*id, vec))
    }

    pub fn movie_count(&self) -> usize {
        self.metadata.len()
    }

    /// Recomputes the TF-IDF model if any metadata changed since the last build
    ///
    /// Term frequency comes from the weighted document builder; IDF is
    /// `ln(N / (1 + df))` floored at zero so weights stay non-negative; each
    /// vector is L2-normalized, with an all-zero document left as the zero
    /// vector rather than divided by a zero norm. Transitions back to Clean
    /// only after every vector is rebuilt.
    pub fn rebuild_if_dirty(&mut self) {
        if self.state == IndexState::Clean {
            return;
        }

        let mut documents: HashMap<MovieId, HashMap<String, usize>> =
            HashMap::with_capacity(self.metadata.len());
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for (movie_id, meta) in &self.metadata {
            let mut term_frequency: HashMap<String, usize> = HashMap::new();
            for token in build_document(meta) {
                *term_frequency.entry(token).or_insert(0) += 1;
            }
            for term in term_frequency.keys() {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
            documents.insert(*movie_id, term_frequency);
        }

        let corpus_size = documents.len().max(1) as f64;
        self.idf = document_frequency
            .into_iter()
            .map(|(term, df)| {
                let idf = (corpus_size / (1.0 + df as f64)).ln().max(0.0);
                (term, idf)
            })
            .collect();

        let mut vectors = HashMap::with_capacity(documents.len());
        for (movie_id, term_frequency) in documents {
            vectors.insert(movie_id, self.build_vector(term_frequency));
        }
        self.vectors = vectors;

        self.state = IndexState::Clean;

        tracing::debug!(
            corpus_size = self.vectors.len(),
            vocabulary = self.idf.len(),
            "Rebuilt TF-IDF index"
        );
    }

    fn build_vector(&self, term_frequency: HashMap<String, usize>) -> TfIdfVector {
        let mut vector = TfIdfVector::with_capacity(term_frequency.len());
        let mut magnitude_squared = 0.0;

        for (term, count) in term_frequency {
            let idf = self.idf.get(&term).copied().unwrap_or(0.0);
            let weight = count as f64 * idf;
            // Zero-weight terms are dropped to keep the vector sparse
            if weight > 0.0 {
                magnitude_squared += weight * weight;
                vector.insert(term, weight);
            }
        }

        if magnitude_squared > 0.0 {
            let magnitude = magnitude_squared.sqrt();
            for weight in vector.values_mut() {
                *weight /= magnitude;
            }
        }

        vector
    }
}

/// Dot product over the intersection of non-zero dimensions
///
/// Both vectors are unit-normalized at build time, so this equals their
/// cosine similarity. Iterates the smaller map and probes the larger one;
/// the full vocabulary is never scanned.
pub fn cosine_similarity(a: &TfIdfVector, b: &TfIdfVector) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, weight)| large.get(term).map(|other| weight * other))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Genre, MovieRecord};

    fn ingest(index: &mut ContentIndex, id: MovieId, record: MovieRecord) {
        index.insert(id, record.into());
    }

    fn record(genres: &[(u32, &str)], keywords: &[&str], overview: &str) -> MovieRecord {
        MovieRecord {
            genres: genres.iter().map(|(id, name)| Genre::new(*id, *name)).collect(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            overview: overview.to_string(),
            ..Default::default()
        }
    }

    fn norm(vector: &TfIdfVector) -> f64 {
        vector.values().map(|w| w * w).sum::<f64>().sqrt()
    }

    #[test]
    fn test_ingest_marks_dirty_and_rebuild_clears() {
        let mut index = ContentIndex::new();
        assert!(index.is_clean());

        ingest(&mut index, 1, record(&[(28, "Action")], &[], "explosions"));
        assert!(!index.is_clean());

        index.rebuild_if_dirty();
        assert!(index.is_clean());
        assert!(index.vector(1).is_some());
    }

    #[test]
    fn test_vectors_are_unit_normalized() {
        let mut index = ContentIndex::new();
        ingest(&mut index, 1, record(&[(28, "Action")], &["war"], "a war story"));
        ingest(&mut index, 2, record(&[(35, "Comedy")], &["romance"], "a love story"));
        ingest(&mut index, 3, record(&[(18, "Drama")], &[], "family drama"));
        index.rebuild_if_dirty();

        for (id, vector) in index.vectors() {
            if !vector.is_empty() {
                assert!(
                    (norm(vector) - 1.0).abs() < 1e-9,
                    "movie {} vector not unit-normalized",
                    id
                );
            }
        }
    }

    #[test]
    fn test_empty_document_yields_zero_vector() {
        let mut index = ContentIndex::new();
        ingest(&mut index, 1, record(&[], &[], ""));
        ingest(&mut index, 2, record(&[(28, "Action")], &[], "explosions"));
        index.rebuild_if_dirty();

        assert!(index.vector(1).unwrap().is_empty());
    }

    #[test]
    fn test_ubiquitous_terms_carry_no_weight() {
        // A token present in every document has idf ln(N/(1+N)) < 0,
        // floored to 0 and dropped from the vectors.
        let mut index = ContentIndex::new();
        ingest(&mut index, 1, record(&[], &[], "shared alpha"));
        ingest(&mut index, 2, record(&[], &[], "shared beta"));
        ingest(&mut index, 3, record(&[], &[], "shared gamma"));
        index.rebuild_if_dirty();

        assert!(!index.vector(1).unwrap().contains_key("shared"));
        assert!(index.vector(1).unwrap().contains_key("alpha"));
    }

    #[test]
    fn test_cosine_similarity_bounds() {
        let mut index = ContentIndex::new();
        ingest(&mut index, 1, record(&[(28, "Action")], &["war", "tank"], "battle"));
        ingest(&mut index, 2, record(&[(28, "Action")], &["war"], "battle lines"));
        ingest(&mut index, 3, record(&[(35, "Comedy")], &["wedding"], "laughs"));
        index.rebuild_if_dirty();

        let pairs = [(1, 2), (1, 3), (2, 3)];
        for (a, b) in pairs {
            let sim = cosine_similarity(index.vector(a).unwrap(), index.vector(b).unwrap());
            assert!((0.0..=1.0 + 1e-9).contains(&sim), "sim({},{}) = {}", a, b, sim);
            let reversed = cosine_similarity(index.vector(b).unwrap(), index.vector(a).unwrap());
            assert!((sim - reversed).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cosine_similarity_no_overlap_is_zero() {
        let a: TfIdfVector = [("war".to_string(), 1.0)].into_iter().collect();
        let b: TfIdfVector = [("wedding".to_string(), 1.0)].into_iter().collect();
        assert_eq!(cosine_similarity(&a, &b), 0.0);
        assert_eq!(cosine_similarity(&a, &TfIdfVector::new()), 0.0);
    }

    #[test]
    fn test_reingestion_replaces_metadata() {
        let mut index = ContentIndex::new();
        ingest(&mut index, 1, record(&[(28, "Action")], &[], "first"));
        index.rebuild_if_dirty();

        ingest(&mut index, 1, record(&[(35, "Comedy")], &[], "second"));
        assert!(!index.is_clean());
        index.rebuild_if_dirty();

        let meta = index.metadata(1).unwrap();
        assert_eq!(meta.genres, vec!["Comedy"]);
        assert_eq!(index.movie_count(), 1);
    }
}
