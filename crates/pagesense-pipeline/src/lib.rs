//! Orchestration on top of the fetcher, analyzer and store.
//!
//! [`AnalysisPipeline`] runs one URL end to end and never fails outright:
//! every problem is folded into a [`PipelineResult`] tagged with the stage
//! that broke. [`BatchCoordinator`] drives it over a list of URLs,
//! [`QueryService`] answers read-side questions, and [`Toolkit`] exposes
//! the whole surface as JSON-shaped responses.

pub mod batch;
pub mod error;
pub mod feed;
pub mod guard;
pub mod pipeline;
pub mod query;
pub mod response;
pub mod toolkit;

pub use batch::{BatchCoordinator, BatchItem, BatchResult};
pub use error::PipelineError;
pub use feed::{analyze_feed, FeedItemResult, FeedReport, NO_FEED_TITLE};
pub use pipeline::{AnalysisOutcome, AnalysisPipeline, PipelineFailure, PipelineResult, Stage};
pub use query::{KeywordAggregate, KeywordTotal, QueryService, ReportSummary, SummaryReport};
pub use response::ToolResponse;
pub use toolkit::{
    HistoryResponse, LinksResponse, SentimentSearchResponse, Toolkit, DEFAULT_FEED_MAX_ITEMS,
    DEFAULT_HISTORY_LIMIT, DEFAULT_MIN_FREQUENCY,
};
