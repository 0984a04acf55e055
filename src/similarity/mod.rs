//! Near-duplicate detection for saved meals and routines
//!
//! Compares free-text descriptions by normalized token-set overlap and
//! compares item lists by signature.

pub mod matcher;
pub mod normalize;

pub use matcher::{Match, SavedText, SimilarityMatcher, DEFAULT_THRESHOLD};
pub use normalize::{normalize_text, signature, similarity, token_overlap, tokenize};
