use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownLabel;

/// Scores strictly above this are positive; strictly below its negation are negative.
pub const LABEL_THRESHOLD: f64 = 0.2;

/// Coarse sentiment bucket stored alongside every analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Map a score to its label. The `±0.2` boundaries themselves are neutral.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > LABEL_THRESHOLD {
            Self::Positive
        } else if score < -LABEL_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

/// One ranked keyword from a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub count: usize,
    /// `count` divided by the number of tokens that survived filtering.
    pub frequency: f64,
}
