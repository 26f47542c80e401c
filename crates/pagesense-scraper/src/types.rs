use serde::{Deserialize, Serialize};

/// Readable text pulled from one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedPage {
    pub url: String,
    pub title: String,
    /// Cleaned text, truncated to the fetcher's character cap.
    pub content: String,
    /// Character length of the cleaned text before truncation.
    pub raw_length: usize,
}
