use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure, timeout, malformed URL, or a non-2xx response.
    #[error("HTTP Error: {detail}")]
    Network { url: String, detail: String },

    /// The response arrived but its body could not be turned into a document.
    #[error("Parse Error: {detail}")]
    Parse { url: String, detail: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    pub(crate) fn network(url: &str, detail: impl Into<String>) -> Self {
        Self::Network {
            url: url.to_owned(),
            detail: detail.into(),
        }
    }

    pub(crate) fn parse(url: &str, detail: impl Into<String>) -> Self {
        Self::Parse {
            url: url.to_owned(),
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
