//! Read-side queries over stored analyses, plus the summary report command.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use pagesense_core::SentimentLabel;
use pagesense_db::{DbError, HistoryRow, ResultStore};
use serde::Serialize;

/// Keywords returned by [`QueryService::keyword_aggregate`].
pub const KEYWORD_AGGREGATE_LIMIT: usize = 20;
pub const SUMMARY_REPORT_NAME: &str = "Summary Report";
const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordTotal {
    pub word: String,
    pub total_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordAggregate {
    pub top_keywords: Vec<KeywordTotal>,
    /// Number of stored analyses scanned.
    pub analyzed_documents: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_analyses: i64,
    pub sentiment_distribution: BTreeMap<String, i64>,
    pub average_sentiment: f64,
    pub recent_analyses_7days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub summary: ReportSummary,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct QueryService {
    store: ResultStore,
}

impl QueryService {
    #[must_use]
    pub fn new(store: ResultStore) -> Self {
        Self { store }
    }

    /// Newest analyses joined with their page.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn history(&self, limit: u32) -> Result<Vec<HistoryRow>, DbError> {
        self.store.query_history(limit).await
    }

    /// Analyses with `label`, highest score first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn search_by_sentiment(
        &self,
        label: SentimentLabel,
    ) -> Result<Vec<HistoryRow>, DbError> {
        self.store.query_by_sentiment(label).await
    }

    /// Sum keyword counts across every stored analysis, keeping only entries
    /// whose per-document frequency is at least `min_frequency`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store read fails or a stored list is malformed.
    pub async fn keyword_aggregate(&self, min_frequency: f64) -> Result<KeywordAggregate, DbError> {
        let blobs = self.store.query_all_keyword_blobs().await?;
        let analyzed_documents = blobs.len();

        // Insertion order is kept so equal totals rank by first appearance.
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut totals: Vec<KeywordTotal> = Vec::new();
        for keyword in blobs.into_iter().flatten() {
            if keyword.frequency < min_frequency {
                continue;
            }
            match index.get(&keyword.word) {
                Some(&i) => totals[i].total_count += keyword.count,
                None => {
                    index.insert(keyword.word.clone(), totals.len());
                    totals.push(KeywordTotal {
                        word: keyword.word,
                        total_count: keyword.count,
                    });
                }
            }
        }

        totals.sort_by(|a, b| b.total_count.cmp(&a.total_count));
        totals.truncate(KEYWORD_AGGREGATE_LIMIT);

        Ok(KeywordAggregate {
            top_keywords: totals,
            analyzed_documents,
        })
    }

    /// Build the summary snapshot, persist it as a report and return it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if reading the aggregates or writing the report fails.
    pub async fn summary_report(&self) -> Result<SummaryReport, DbError> {
        let generated_at = Utc::now();
        let since = generated_at - Duration::days(RECENT_WINDOW_DAYS);
        let stats = self.store.aggregate_stats(since).await?;

        let report = SummaryReport {
            summary: ReportSummary {
                total_analyses: stats.total_analyses,
                sentiment_distribution: stats.sentiment_distribution,
                average_sentiment: stats.average_sentiment,
                recent_analyses_7days: stats.recent_analyses,
            },
            generated_at,
        };

        let data = serde_json::to_value(&report)?;
        let description = format!(
            "Generated summary report for {} analyses",
            report.summary.total_analyses
        );
        let report_id = self
            .store
            .insert_report(SUMMARY_REPORT_NAME, &description, &data)
            .await?;
        tracing::info!(report_id, total = report.summary.total_analyses, "summary report saved");

        Ok(report)
    }
}
