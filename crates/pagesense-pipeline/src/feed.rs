//! Run the pipeline over the entries of an RSS or Atom feed.

use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, Feed};
use pagesense_analyzer::SentimentScorer;
use pagesense_scraper::{PageFetcher, NO_TITLE};
use serde::Serialize;

use crate::batch::BatchCoordinator;
use crate::pipeline::PipelineResult;

pub const NO_FEED_TITLE: &str = "Unknown Feed";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItemResult {
    #[serde(flatten)]
    pub result: PipelineResult,
    pub rss_title: String,
    pub published: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedReport {
    pub feed_title: String,
    pub analyzed_items: usize,
    pub results: Vec<FeedItemResult>,
}

struct FeedTarget {
    link: String,
    title: String,
    published: Option<DateTime<Utc>>,
}

fn target(entry: &Entry) -> Option<FeedTarget> {
    let link = entry.links.first()?.href.trim();
    if link.is_empty() {
        return None;
    }
    Some(FeedTarget {
        link: link.to_owned(),
        title: entry
            .title
            .as_ref()
            .map(|t| t.content.trim().to_owned())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_TITLE.to_owned()),
        published: entry.published.or(entry.updated),
    })
}

/// Analyze the first `max_items` linked entries of `feed`, in feed order.
///
/// Entries without a link are skipped and do not count toward `max_items`.
pub async fn analyze_feed<F, S>(
    coordinator: &BatchCoordinator<F, S>,
    feed: &Feed,
    max_items: usize,
) -> FeedReport
where
    F: PageFetcher,
    S: SentimentScorer,
{
    let targets: Vec<FeedTarget> = feed
        .entries
        .iter()
        .filter_map(target)
        .take(max_items)
        .collect();
    let links: Vec<String> = targets.iter().map(|t| t.link.clone()).collect();

    let results: Vec<FeedItemResult> = coordinator
        .run_each(&links)
        .await
        .into_iter()
        .zip(targets)
        .map(|(result, target)| FeedItemResult {
            result,
            rss_title: target.title,
            published: target.published,
        })
        .collect();

    let feed_title = feed
        .title
        .as_ref()
        .map(|t| t.content.trim().to_owned())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_FEED_TITLE.to_owned());

    tracing::info!(feed = %feed_title, analyzed = results.len(), "feed analyzed");

    FeedReport {
        feed_title,
        analyzed_items: results.len(),
        results,
    }
}
