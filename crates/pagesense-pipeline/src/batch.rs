use std::sync::Arc;
use std::time::Duration;

use pagesense_analyzer::{LexiconScorer, SentimentScorer};
use pagesense_scraper::PageFetcher;
use serde::Serialize;

use crate::pipeline::{AnalysisPipeline, PipelineResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItem {
    pub url: String,
    pub success: bool,
    pub result: PipelineResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub total_urls: usize,
    pub successful: usize,
    pub failed: usize,
    /// One entry per input URL, in input order.
    pub results: Vec<BatchItem>,
}

/// Runs the pipeline over several URLs one at a time, pausing between runs.
pub struct BatchCoordinator<F, S = LexiconScorer> {
    pipeline: Arc<AnalysisPipeline<F, S>>,
    delay: Duration,
}

impl<F, S> BatchCoordinator<F, S>
where
    F: PageFetcher,
    S: SentimentScorer,
{
    pub fn new(pipeline: Arc<AnalysisPipeline<F, S>>, delay: Duration) -> Self {
        Self { pipeline, delay }
    }

    pub fn pipeline(&self) -> &AnalysisPipeline<F, S> {
        &self.pipeline
    }

    /// Run every URL in order. A failing URL is counted and the batch moves on.
    pub async fn run_batch(&self, urls: &[String]) -> BatchResult {
        let results: Vec<BatchItem> = self
            .run_each(urls)
            .await
            .into_iter()
            .zip(urls)
            .map(|(result, url)| BatchItem {
                url: url.clone(),
                success: result.is_success(),
                result,
            })
            .collect();

        let successful = results.iter().filter(|item| item.success).count();
        let failed = results.len() - successful;

        tracing::info!(
            total = results.len(),
            successful,
            failed,
            "batch complete"
        );

        BatchResult {
            total_urls: urls.len(),
            successful,
            failed,
            results,
        }
    }

    /// Run the pipeline for each URL in order, sleeping the configured delay
    /// between consecutive runs (not after the last).
    pub async fn run_each(&self, urls: &[String]) -> Vec<PipelineResult> {
        let mut results = Vec::with_capacity(urls.len());
        for (i, url) in urls.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            results.push(self.pipeline.run(url).await);
        }
        results
    }
}
