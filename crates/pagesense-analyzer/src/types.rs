use pagesense_core::{Keyword, SentimentLabel};
use serde::{Deserialize, Serialize};

/// Output of a [`crate::SentimentScorer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Polarity in `[-1.0, 1.0]`.
    pub score: f64,
    pub label: SentimentLabel,
    /// Kept for schema compatibility with scorers that estimate it; the
    /// lexicon scorer always reports `0.5`.
    pub subjectivity: f64,
    /// Short tag naming the scorer that produced this result.
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStatistics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub character_count: usize,
    pub average_word_length: f64,
    pub average_sentence_length: f64,
}

/// Everything [`crate::TextAnalyzer::analyze`] derives from one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub sentiment: SentimentResult,
    pub keywords: Vec<Keyword>,
    pub statistics: TextStatistics,
}
