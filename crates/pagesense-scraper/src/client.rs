//! HTTP client that downloads pages and feeds.

use std::future::Future;
use std::time::Duration;

use pagesense_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::FetchError;
use crate::extract::extract_page;
use crate::links::links_from_html;
use crate::types::FetchedPage;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can turn a URL into a [`FetchedPage`].
///
/// The pipeline is generic over this so tests can substitute canned pages.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Single-attempt HTTP fetcher. No retries; the caller decides what a failure means.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
    max_chars: usize,
}

impl ContentFetcher {
    /// Builds a fetcher with a whole-request timeout, `User-Agent` and content cap.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout: Duration, user_agent: &str, max_chars: usize) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client, max_chars })
    }

    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(
            config.fetch_timeout(),
            &config.user_agent,
            config.content_max_chars,
        )
    }

    /// Fetches `url` and returns every distinct absolute http(s) link on it.
    ///
    /// Relative links resolve against `base` when given, otherwise against
    /// the final response URL.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Network`] for transport failures or non-2xx responses.
    /// - [`FetchError::Parse`] if `base` is not a valid URL or the body is not markup.
    pub async fn extract_links(
        &self,
        url: &str,
        base: Option<&str>,
    ) -> Result<Vec<String>, FetchError> {
        let (final_url, html) = self.get_markup(url).await?;
        let base = match base {
            Some(raw) => Url::parse(raw)
                .map_err(|e| FetchError::parse(url, format!("invalid base URL {raw:?}: {e}")))?,
            None => final_url,
        };
        let links = links_from_html(&html, &base)?;
        tracing::debug!(url, count = links.len(), "extracted links");
        Ok(links)
    }

    /// Fetches and parses an RSS or Atom feed.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Network`] for transport failures or non-2xx responses.
    /// - [`FetchError::Parse`] if the body is not a recognizable feed.
    pub async fn fetch_feed(&self, url: &str) -> Result<feed_rs::model::Feed, FetchError> {
        let response = self.send(url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(url, e.to_string()))?;
        feed_rs::parser::parse(&body[..]).map_err(|e| FetchError::parse(url, e.to_string()))
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::network(
                url,
                format!("unexpected HTTP status {} from {url}", status.as_u16()),
            ));
        }
        Ok(response)
    }

    /// Downloads `url` and returns the final URL with the body as text.
    async fn get_markup(&self, url: &str) -> Result<(Url, String), FetchError> {
        let response = self.send(url).await?;

        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_markup_type(content_type) {
                return Err(FetchError::parse(
                    url,
                    format!("unsupported content type {content_type:?}"),
                ));
            }
        }

        let final_url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(url, e.to_string()))?;
        Ok((final_url, String::from_utf8_lossy(&body).into_owned()))
    }
}

impl PageFetcher for ContentFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let (_, html) = self.get_markup(url).await?;
        let page = extract_page(url, &html, self.max_chars)?;
        tracing::debug!(
            url,
            title = %page.title,
            raw_length = page.raw_length,
            "fetched page"
        );
        Ok(page)
    }
}

/// Text and markup media types; anything else is treated as undecodable.
fn is_markup_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence.is_empty()
        || essence.starts_with("text/")
        || essence.contains("html")
        || essence.contains("xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_types_are_accepted() {
        assert!(is_markup_type("text/html"));
        assert!(is_markup_type("text/html; charset=utf-8"));
        assert!(is_markup_type("application/xhtml+xml"));
        assert!(is_markup_type("text/plain"));
        assert!(is_markup_type(""));
    }

    #[test]
    fn binary_types_are_rejected() {
        assert!(!is_markup_type("image/png"));
        assert!(!is_markup_type("application/pdf"));
        assert!(!is_markup_type("application/octet-stream"));
    }

    #[test]
    fn new_builds_client() {
        let fetcher = ContentFetcher::new(Duration::from_secs(5), "pagesense-test/0.1", 100);
        assert!(fetcher.is_ok());
    }
}
