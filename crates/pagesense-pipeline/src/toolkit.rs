//! The operation surface handed to the outer request/response layer.
//!
//! Every method takes plain arguments and returns a serializable response;
//! none of them return `Err`.

use std::sync::Arc;
use std::time::Duration;

use pagesense_analyzer::TextAnalyzer;
use pagesense_core::{AppConfig, SentimentLabel};
use pagesense_db::{HistoryRow, ResultStore};
use pagesense_scraper::ContentFetcher;
use serde::Serialize;

use crate::batch::{BatchCoordinator, BatchResult};
use crate::error::PipelineError;
use crate::feed::{analyze_feed, FeedReport};
use crate::pipeline::{AnalysisPipeline, PipelineResult};
use crate::query::{KeywordAggregate, QueryService, SummaryReport};
use crate::response::ToolResponse;

pub const DEFAULT_HISTORY_LIMIT: u32 = 10;
pub const DEFAULT_MIN_FREQUENCY: f64 = 0.01;
pub const DEFAULT_FEED_MAX_ITEMS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryRow>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSearchResponse {
    pub sentiment_label: SentimentLabel,
    pub results: Vec<HistoryRow>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinksResponse {
    pub url: String,
    pub links: Vec<String>,
    pub count: usize,
}

pub struct Toolkit {
    batch: BatchCoordinator<ContentFetcher>,
    queries: QueryService,
}

impl Toolkit {
    #[must_use]
    pub fn new(fetcher: ContentFetcher, store: ResultStore, batch_delay: Duration) -> Self {
        let queries = QueryService::new(store.clone());
        let pipeline = Arc::new(AnalysisPipeline::new(fetcher, TextAnalyzer::new(), store));
        Self {
            batch: BatchCoordinator::new(pipeline, batch_delay),
            queries,
        }
    }

    /// Build the fetcher and open the store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the HTTP client cannot be built or the
    /// database cannot be opened and migrated.
    pub async fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let fetcher = ContentFetcher::from_config(config)?;
        let store = ResultStore::from_config(config).await?;
        Ok(Self::new(fetcher, store, config.batch_delay()))
    }

    fn pipeline(&self) -> &AnalysisPipeline<ContentFetcher> {
        self.batch.pipeline()
    }

    pub fn store(&self) -> &ResultStore {
        self.pipeline().store()
    }

    pub async fn scrape_and_analyze(&self, url: &str) -> PipelineResult {
        self.pipeline().run(url).await
    }

    pub async fn batch_analyze_urls(&self, urls: &[String]) -> ToolResponse<BatchResult> {
        ToolResponse::Ok(self.batch.run_batch(urls).await)
    }

    pub async fn get_analysis_history(&self, limit: Option<u32>) -> ToolResponse<HistoryResponse> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        self.queries
            .history(limit)
            .await
            .map(|history| HistoryResponse {
                count: history.len(),
                history,
            })
            .inspect_err(|e| tracing::error!(error = %e, "history query failed"))
            .into()
    }

    /// Rejects labels other than positive, negative or neutral.
    pub async fn search_by_sentiment(&self, label: &str) -> ToolResponse<SentimentSearchResponse> {
        let label: SentimentLabel = match label.parse() {
            Ok(label) => label,
            Err(e) => return ToolResponse::error(e),
        };
        self.queries
            .search_by_sentiment(label)
            .await
            .map(|results| SentimentSearchResponse {
                sentiment_label: label,
                count: results.len(),
                results,
            })
            .inspect_err(|e| tracing::error!(error = %e, "sentiment search failed"))
            .into()
    }

    pub async fn get_keyword_analysis(
        &self,
        min_frequency: Option<f64>,
    ) -> ToolResponse<KeywordAggregate> {
        self.queries
            .keyword_aggregate(min_frequency.unwrap_or(DEFAULT_MIN_FREQUENCY))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "keyword aggregation failed"))
            .into()
    }

    pub async fn generate_summary_report(&self) -> ToolResponse<SummaryReport> {
        self.queries
            .summary_report()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "summary report failed"))
            .into()
    }

    /// Fetch the feed at `rss_url` and analyze up to `max_items` linked entries.
    pub async fn analyze_rss_feed(
        &self,
        rss_url: &str,
        max_items: Option<usize>,
    ) -> ToolResponse<FeedReport> {
        let feed = match self.pipeline().fetcher().fetch_feed(rss_url).await {
            Ok(feed) => feed,
            Err(e) => {
                tracing::warn!(url = rss_url, error = %e, "feed fetch failed");
                return ToolResponse::error(PipelineError::from(e));
            }
        };
        let max_items = max_items.unwrap_or(DEFAULT_FEED_MAX_ITEMS);
        ToolResponse::Ok(analyze_feed(&self.batch, &feed, max_items).await)
    }

    pub async fn extract_links(
        &self,
        url: &str,
        base: Option<&str>,
    ) -> ToolResponse<LinksResponse> {
        self.pipeline()
            .fetcher()
            .extract_links(url, base)
            .await
            .map(|links| LinksResponse {
                url: url.to_owned(),
                count: links.len(),
                links,
            })
            .inspect_err(|e| tracing::warn!(url, error = %e, "link extraction failed"))
            .into()
    }
}
