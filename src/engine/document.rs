use crate::models::MovieMetadata;

/// Repetition weights applied when assembling a movie's document.
/// Genre names dominate, keywords and director count double, cast and
/// overview contribute once.
const GENRE_REPEAT: usize = 3;
const KEYWORD_REPEAT: usize = 2;
const DIRECTOR_REPEAT: usize = 2;

/// Splits text into lowercase maximal runs of ASCII letters/digits
///
/// Non-alphanumeric characters act as separators and are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds the token sequence representing one movie's textual content
///
/// The sequence is deliberately not deduplicated: field weighting works by
/// repetition, so a genre token appears three times per mention. Empty fields
/// contribute nothing. Pure function of the metadata.
pub fn build_document(meta: &MovieMetadata) -> Vec<String> {
    let mut tokens = Vec::new();

    for genre in &meta.genres {
        repeat_into(&mut tokens, tokenize(genre), GENRE_REPEAT);
    }
    for keyword in &meta.keywords {
        repeat_into(&mut tokens, tokenize(keyword), KEYWORD_REPEAT);
    }
    if !meta.director.is_empty() {
        repeat_into(&mut tokens, tokenize(&meta.director), DIRECTOR_REPEAT);
    }
    for name in &meta.cast {
        tokens.extend(tokenize(name));
    }
    tokens.extend(tokenize(&meta.overview));

    tokens
}

fn repeat_into(tokens: &mut Vec<String>, field_tokens: Vec<String>, times: usize) {
    for _ in 0..times {
        tokens.extend(field_tokens.iter().cloned());
    }
}
