use pagesense_analyzer::{
    LexiconScorer, SentimentResult, SentimentScorer, TextAnalyzer, TextStatistics,
};
use pagesense_core::Keyword;
use pagesense_db::{DbError, ResultStore};
use pagesense_scraper::{FetchedPage, PageFetcher};
use serde::{Serialize, Serializer};

use crate::guard::UrlLocks;
use crate::response::WithSuccess;

/// Keywords reported per run; the store keeps the analyzer's full list.
pub const REPORTED_KEYWORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Scraping,
    Processing,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scraping => "scraping",
            Self::Processing => "processing",
        }
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub url: String,
    pub title: String,
    /// Characters of page text that were analyzed and stored.
    pub content_length: usize,
    pub sentiment: SentimentResult,
    pub top_keywords: Vec<Keyword>,
    pub statistics: TextStatistics,
    pub url_id: i64,
    pub analysis_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineFailure {
    pub error: String,
    pub stage: Stage,
}

/// Result of one pipeline run. Serializes with a `success` flag.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineResult {
    Success(AnalysisOutcome),
    Failure(PipelineFailure),
}

impl PipelineResult {
    fn failure(stage: Stage, error: impl ToString) -> Self {
        Self::Failure(PipelineFailure {
            error: error.to_string(),
            stage,
        })
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        match self {
            Self::Success(outcome) => Some(outcome),
            Self::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn failure_stage(&self) -> Option<Stage> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure.stage),
        }
    }
}

impl Serialize for PipelineResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(body) => WithSuccess {
                success: true,
                body,
            }
            .serialize(serializer),
            Self::Failure(body) => WithSuccess {
                success: false,
                body,
            }
            .serialize(serializer),
        }
    }
}

/// Fetch, store, analyze and record one URL.
///
/// Safe to share behind an `Arc`: runs for different URLs proceed
/// concurrently while runs for the same URL queue behind each other.
pub struct AnalysisPipeline<F, S = LexiconScorer> {
    fetcher: F,
    analyzer: TextAnalyzer<S>,
    store: ResultStore,
    locks: UrlLocks,
}

impl<F, S> AnalysisPipeline<F, S>
where
    F: PageFetcher,
    S: SentimentScorer,
{
    pub fn new(fetcher: F, analyzer: TextAnalyzer<S>, store: ResultStore) -> Self {
        Self {
            fetcher,
            analyzer,
            store,
            locks: UrlLocks::new(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Run the full pipeline for `url`. Never returns an error: failures come
    /// back as [`PipelineResult::Failure`] tagged with the stage that failed.
    ///
    /// A failure after the page upsert leaves the refreshed page without a
    /// new analysis row.
    pub async fn run(&self, url: &str) -> PipelineResult {
        let _guard = self.locks.acquire(url).await;

        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(url, error = %e, "fetch failed");
                return PipelineResult::failure(Stage::Scraping, e);
            }
        };

        match self.process(page).await {
            Ok(outcome) => {
                tracing::info!(
                    url,
                    url_id = outcome.url_id,
                    analysis_id = outcome.analysis_id,
                    label = %outcome.sentiment.label,
                    score = outcome.sentiment.score,
                    "page analyzed"
                );
                PipelineResult::Success(outcome)
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "processing failed");
                PipelineResult::failure(Stage::Processing, e)
            }
        }
    }

    async fn process(&self, page: FetchedPage) -> Result<AnalysisOutcome, DbError> {
        let url_id = self
            .store
            .upsert_page(&page.url, &page.title, &page.content)
            .await?;

        let analysis = self.analyzer.analyze(&page.content);
        let content_length = page.content.chars().count();

        let analysis_id = self
            .store
            .insert_analysis(
                url_id,
                analysis.sentiment.score,
                analysis.sentiment.label,
                &analysis.keywords,
                analysis.statistics.word_count,
            )
            .await?;

        let mut top_keywords = analysis.keywords;
        top_keywords.truncate(REPORTED_KEYWORDS);

        Ok(AnalysisOutcome {
            url: page.url,
            title: page.title,
            content_length,
            sentiment: analysis.sentiment,
            top_keywords,
            statistics: analysis.statistics,
            url_id,
            analysis_id,
        })
    }
}
