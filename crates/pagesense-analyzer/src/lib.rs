//! Text analysis for fetched pages.
//!
//! Scores sentiment with a pluggable [`SentimentScorer`] (a fixed-lexicon
//! heuristic by default), ranks keywords by frequency after stop-word
//! filtering, and computes naive text statistics. Everything here is pure and
//! deterministic: no I/O, no clocks, no failure paths.

pub mod analyzer;
pub mod keywords;
pub mod scorer;
pub mod stats;
pub mod types;

pub use analyzer::TextAnalyzer;
pub use keywords::{extract_keywords, DEFAULT_TOP_KEYWORDS};
pub use scorer::{LexiconScorer, SentimentScorer};
pub use stats::text_statistics;
pub use types::{SentimentResult, TextAnalysis, TextStatistics};
