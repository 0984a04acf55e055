//! Text normalization and token-set scoring

use std::collections::BTreeSet;

/// Words ignored when comparing meal and routine descriptions
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "at", "for", "from", "in", "into", "my", "of", "on", "or", "plus",
    "some", "the", "to", "w", "with",
];

fn is_stopword(word: &str) -> bool {
    STOPWORDS.binary_search(&word).is_ok()
}

/// Lowercase, drop apostrophes, turn other punctuation into spaces, split on whitespace
fn clean_words(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| *c != '\'' && *c != '\u{2019}')
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();

    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Normalize free text for comparison.
///
/// Lowercases, strips punctuation, collapses whitespace and removes stopwords.
/// A text made only of stopwords keeps them, so "the" still equals "the".
pub fn normalize_text(text: &str) -> String {
    let words = clean_words(text);
    let kept: Vec<&str> = words
        .iter()
        .map(String::as_str)
        .filter(|w| !is_stopword(w))
        .collect();

    if kept.is_empty() {
        words.join(" ")
    } else {
        kept.join(" ")
    }
}

/// Normalized token set of a text
pub fn tokenize(text: &str) -> BTreeSet<String> {
    normalize_text(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Jaccard overlap of two token sets, in [0, 1]
pub fn token_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Similarity score between two free texts
pub fn similarity(a: &str, b: &str) -> f64 {
    token_overlap(&tokenize(a), &tokenize(b))
}

/// Order-independent signature of a list of item descriptions.
///
/// Each part is normalized, then the parts are sorted and joined with `|`.
pub fn signature<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = parts
        .into_iter()
        .map(|p| normalize_text(p.as_ref()))
        .filter(|p| !p.is_empty())
        .collect();
    normalized.sort();
    normalized.join("|")
}
