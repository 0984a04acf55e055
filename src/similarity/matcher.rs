//! Best-match search over previously saved meals and routines

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::normalize::{token_overlap, tokenize};

/// Default minimum score for a suggestion
pub const DEFAULT_THRESHOLD: f64 = 0.65;

/// Scores closer than this are treated as equal
const SCORE_EPSILON: f64 = 1e-9;

/// Something previously saved that a new entry can be compared against
pub trait SavedText {
    fn text(&self) -> &str;

    /// Normalized item signature, if the entry has items
    fn signature(&self) -> Option<&str> {
        None
    }

    fn last_used_at(&self) -> Option<NaiveDateTime> {
        None
    }
}

/// A matched prior entry and its score
#[derive(Debug, Clone, Serialize)]
pub struct Match<'a, T> {
    pub entry: &'a T,
    pub score: f64,
    /// True when the item signatures are identical
    pub exact_duplicate: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SimilarityMatcher {
    threshold: f64,
}

impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl SimilarityMatcher {
    /// Create a matcher. The threshold is clamped to [0, 1]; NaN falls back to the default.
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            DEFAULT_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Best prior entry for a free-text candidate, or `None` if nothing reaches the threshold
    pub fn best_match<'a, T: SavedText>(&self, candidate: &str, prior: &'a [T]) -> Option<Match<'a, T>> {
        self.best_match_with_signature(candidate, None, prior)
    }

    /// Like [`best_match`](Self::best_match), but an identical non-empty signature
    /// counts as an exact duplicate with score 1.0 whatever the text says
    pub fn best_match_with_signature<'a, T: SavedText>(
        &self,
        candidate: &str,
        signature: Option<&str>,
        prior: &'a [T],
    ) -> Option<Match<'a, T>> {
        let candidate_tokens = tokenize(candidate);
        let signature = signature.filter(|s| !s.is_empty());

        if candidate_tokens.is_empty() && signature.is_none() {
            return None;
        }

        let mut best: Option<Match<'a, T>> = None;

        for entry in prior {
            let exact_duplicate = match (signature, entry.signature()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            };
            let score = if exact_duplicate {
                1.0
            } else {
                token_overlap(&candidate_tokens, &tokenize(entry.text()))
            };

            if score + SCORE_EPSILON < self.threshold || score <= 0.0 {
                continue;
            }

            let replace = match &best {
                None => true,
                Some(current) => is_better(score, entry, current),
            };
            if replace {
                best = Some(Match {
                    entry,
                    score,
                    exact_duplicate,
                });
            }
        }

        best
    }
}

/// Higher score wins; ties go to the most recently used entry
fn is_better<T: SavedText>(score: f64, entry: &T, current: &Match<'_, T>) -> bool {
    if (score - current.score).abs() > SCORE_EPSILON {
        return score > current.score;
    }
    // None sorts before Some, so never-used entries rank oldest
    entry.last_used_at().cmp(&current.entry.last_used_at()) == Ordering::Greater
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[derive(Debug)]
    struct Saved {
        text: &'static str,
        signature: Option<&'static str>,
        used_day: Option<u32>,
    }

    impl SavedText for Saved {
        fn text(&self) -> &str {
            self.text
        }

        fn signature(&self) -> Option<&str> {
            self.signature
        }

        fn last_used_at(&self) -> Option<NaiveDateTime> {
            self.used_day.map(|d| {
                NaiveDate::from_ymd_opt(2026, 1, d)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap()
            })
        }
    }

    fn saved(text: &'static str) -> Saved {
        Saved { text, signature: None, used_day: None }
    }

    #[test]
    fn test_self_match_scores_one() {
        let matcher = SimilarityMatcher::default();
        for text in ["overnight oats with blueberries", "Leg Day!", "the"] {
            let prior = [saved(text)];
            let m = matcher.best_match(text, &prior).unwrap();
            assert_eq!(m.score, 1.0);
        }
    }

    #[test]
    fn test_score_is_symmetric() {
        let matcher = SimilarityMatcher::new(0.0);
        let a = "turkey sandwich with cheese";
        let b = "cheese and turkey wrap";
        let ab = matcher.best_match(a, &[saved(b)]).unwrap().score;
        let ba = matcher.best_match(b, &[saved(a)]).unwrap().score;
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_empty_input_no_match() {
        let matcher = SimilarityMatcher::new(0.0);
        assert!(matcher.best_match("", &[saved("oatmeal")]).is_none());
        assert!(matcher.best_match("  ...  ", &[saved("oatmeal")]).is_none());
        assert!(matcher.best_match::<Saved>("oatmeal", &[]).is_none());
    }

    #[test]
    fn test_below_threshold_no_match() {
        let matcher = SimilarityMatcher::new(0.7);
        // {chicken, salad} vs {chicken, caesar, salad, croutons}: 0.5
        let prior = [saved("caesar salad with chicken and croutons")];
        assert!(matcher.best_match("chicken salad", &prior).is_none());

        let matcher = SimilarityMatcher::new(0.5);
        let m = matcher.best_match("chicken salad", &prior).unwrap();
        assert!((m.score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_highest_score_wins() {
        let matcher = SimilarityMatcher::new(0.3);
        let prior = [
            saved("eggs toast coffee orange juice"),
            saved("eggs toast coffee"),
            saved("pancakes"),
        ];
        let m = matcher.best_match("eggs and toast with coffee", &prior).unwrap();
        assert_eq!(m.entry.text, "eggs toast coffee");
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn test_tie_prefers_most_recently_used() {
        let matcher = SimilarityMatcher::default();
        let prior = [
            Saved { text: "protein shake", signature: None, used_day: Some(3) },
            Saved { text: "Protein Shake!", signature: None, used_day: Some(9) },
            Saved { text: "protein shake", signature: None, used_day: None },
        ];
        let m = matcher.best_match("protein shake", &prior).unwrap();
        assert_eq!(m.entry.used_day, Some(9));
    }

    #[test]
    fn test_signature_duplicate() {
        let matcher = SimilarityMatcher::default();
        let prior = [
            Saved { text: "usual breakfast", signature: Some("eggs 140|toast 90"), used_day: None },
            Saved { text: "pancake breakfast", signature: Some("pancakes 350"), used_day: None },
        ];
        let m = matcher
            .best_match_with_signature("morning plate", Some("eggs 140|toast 90"), &prior)
            .unwrap();
        assert!(m.exact_duplicate);
        assert_eq!(m.score, 1.0);
        assert_eq!(m.entry.text, "usual breakfast");

        // Empty signatures never count as duplicates
        assert!(matcher
            .best_match_with_signature("morning plate", Some(""), &prior)
            .is_none());
    }

    #[test]
    fn test_threshold_clamped() {
        assert_eq!(SimilarityMatcher::new(1.7).threshold(), 1.0);
        assert_eq!(SimilarityMatcher::new(-0.2).threshold(), 0.0);
        assert_eq!(SimilarityMatcher::new(f64::NAN).threshold(), DEFAULT_THRESHOLD);
    }
}
