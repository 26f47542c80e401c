//! Sentiment scoring.
//!
//! [`SentimentScorer`] is the seam for swapping in a higher-fidelity backend;
//! [`LexiconScorer`] is the built-in fixed word-list heuristic.

use pagesense_core::SentimentLabel;

use crate::types::SentimentResult;

/// Produces a [`SentimentResult`] for a piece of text.
///
/// Implementations must be total: any input, including the empty string,
/// yields a result.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> SentimentResult;
}

pub(crate) const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "awesome",
    "perfect",
    "best",
    "love",
];

pub(crate) const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "horrible",
    "worst",
    "hate",
    "disgusting",
    "disappointing",
    "poor",
    "fail",
];

const LEXICON_SUBJECTIVITY: f64 = 0.5;

/// Counts positive and negative lexicon hits in the lower-cased text.
///
/// Matching is by substring, not by token: `"lovely"` counts as `"love"` and
/// `"failure"` as `"fail"`. Every non-overlapping occurrence counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub const METHOD: &'static str = "simple";
}

fn count_occurrences(haystack: &str, words: &[&str]) -> usize {
    words.iter().map(|w| haystack.matches(w).count()).sum()
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> SentimentResult {
        let lowered = text.to_lowercase();
        let positive = count_occurrences(&lowered, POSITIVE_WORDS);
        let negative = count_occurrences(&lowered, NEGATIVE_WORDS);
        let total = positive + negative;

        #[allow(clippy::cast_precision_loss)]
        let score = if total == 0 {
            0.0
        } else {
            (positive as f64 - negative as f64) / total as f64
        };

        SentimentResult {
            score,
            label: SentimentLabel::from_score(score),
            subjectivity: LEXICON_SUBJECTIVITY,
            method: Self::METHOD.to_string(),
            positive_count: Some(positive),
            negative_count: Some(negative),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> SentimentResult {
        LexiconScorer.score(text)
    }

    #[test]
    fn empty_string_is_neutral_zero() {
        let r = score("");
        assert_eq!(r.score, 0.0);
        assert_eq!(r.label, SentimentLabel::Neutral);
        assert_eq!(r.positive_count, Some(0));
        assert_eq!(r.negative_count, Some(0));
    }

    #[test]
    fn unknown_text_is_neutral_zero() {
        let r = score("the quick brown fox");
        assert_eq!(r.score, 0.0);
        assert_eq!(r.label, SentimentLabel::Neutral);
    }

    #[test]
    fn good_good_bad_is_positive_third() {
        let r = score("good good bad");
        assert_eq!(r.positive_count, Some(2));
        assert_eq!(r.negative_count, Some(1));
        assert!((r.score - 1.0 / 3.0).abs() < 1e-12, "got {}", r.score);
        assert_eq!(r.label, SentimentLabel::Positive);
    }

    #[test]
    fn all_negative_scores_minus_one() {
        let r = score("Terrible, awful and the WORST.");
        assert_eq!(r.positive_count, Some(0));
        assert_eq!(r.negative_count, Some(3));
        assert_eq!(r.score, -1.0);
        assert_eq!(r.label, SentimentLabel::Negative);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        // "Lovely" contains "love", "failures" contains "fail".
        let r = score("Lovely weather despite the failures");
        assert_eq!(r.positive_count, Some(1));
        assert_eq!(r.negative_count, Some(1));
        assert_eq!(r.score, 0.0);
        assert_eq!(r.label, SentimentLabel::Neutral);
    }

    #[test]
    fn score_of_exactly_point_two_is_neutral() {
        // 3 positive, 2 negative -> (3 - 2) / 5 = 0.2
        let r = score("good great best bad poor");
        assert_eq!(r.positive_count, Some(3));
        assert_eq!(r.negative_count, Some(2));
        assert_eq!(r.label, SentimentLabel::Neutral);
    }

    #[test]
    fn score_of_exactly_minus_point_two_is_neutral() {
        let r = score("good great bad poor awful");
        assert_eq!(r.label, SentimentLabel::Neutral);
    }

    #[test]
    fn reports_fixed_subjectivity_and_method() {
        let r = score("anything at all");
        assert_eq!(r.subjectivity, 0.5);
        assert_eq!(r.method, "simple");
    }

    #[test]
    fn scorer_is_deterministic() {
        let text = "An amazing, wonderful day with one poor moment.";
        assert_eq!(score(text), score(text));
    }
}
