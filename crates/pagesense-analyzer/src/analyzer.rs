use crate::keywords::{extract_keywords, DEFAULT_TOP_KEYWORDS};
use crate::scorer::{LexiconScorer, SentimentScorer};
use crate::stats::text_statistics;
use crate::types::TextAnalysis;

/// Runs sentiment scoring, keyword extraction and statistics over one text.
///
/// Generic over the [`SentimentScorer`] so a different backend can be dropped
/// in without touching callers; [`TextAnalyzer::new`] uses [`LexiconScorer`].
#[derive(Debug, Clone)]
pub struct TextAnalyzer<S = LexiconScorer> {
    scorer: S,
    top_keywords: usize,
}

impl TextAnalyzer<LexiconScorer> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_scorer(LexiconScorer)
    }
}

impl Default for TextAnalyzer<LexiconScorer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SentimentScorer> TextAnalyzer<S> {
    #[must_use]
    pub fn with_scorer(scorer: S) -> Self {
        Self {
            scorer,
            top_keywords: DEFAULT_TOP_KEYWORDS,
        }
    }

    /// Override how many keywords [`analyze`](Self::analyze) returns.
    #[must_use]
    pub fn top_keywords(mut self, n: usize) -> Self {
        self.top_keywords = n;
        self
    }

    #[must_use]
    pub fn analyze(&self, text: &str) -> TextAnalysis {
        TextAnalysis {
            sentiment: self.scorer.score(text),
            keywords: extract_keywords(text, self.top_keywords),
            statistics: text_statistics(text),
        }
    }
}
