//! Frequency-ranked keyword extraction.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use pagesense_core::Keyword;
use regex::Regex;

pub const DEFAULT_TOP_KEYWORDS: usize = 10;

/// Tokens of this many characters or fewer are discarded.
const MAX_SHORT_TOKEN_CHARS: usize = 2;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid non-word regex"));

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "that", "the", "to", "was", "will", "with", "this", "but", "they",
        "have", "had", "what", "said", "each", "which", "she", "do", "how", "their", "if", "up",
        "out", "many", "then", "them", "these", "so", "some", "her", "would", "make", "like",
        "into", "him", "time", "two", "more", "go", "no", "way", "could", "my", "than", "first",
        "been", "call", "who", "oil", "sit", "now", "find", "down", "day", "did", "get", "come",
        "made", "may", "part",
    ]
    .into_iter()
    .collect()
});

/// Rank the `top_n` most frequent content words of `text`.
///
/// The text is lower-cased, every character that is neither a word character
/// nor whitespace becomes a space, and the result is split on whitespace.
/// Stop words and tokens of two characters or fewer are dropped. Ties in
/// count keep first-occurrence order. `frequency` is relative to the number of
/// tokens that survived filtering, so the frequencies of one call never sum
/// past `1.0`.
#[must_use]
pub fn extract_keywords(text: &str, top_n: usize) -> Vec<Keyword> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, " ");

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut total_filtered = 0usize;

    for token in cleaned.split_whitespace() {
        if token.chars().count() <= MAX_SHORT_TOKEN_CHARS || STOP_WORDS.contains(token) {
            continue;
        }
        total_filtered += 1;
        match index.get(token) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(token, counts.len());
                counts.push((token, 1));
            }
        }
    }

    if total_filtered == 0 {
        return Vec::new();
    }

    // Stable sort keeps first-occurrence order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(top_n);

    #[allow(clippy::cast_precision_loss)]
    let denom = total_filtered as f64;
    counts
        .into_iter()
        .map(|(word, count)| {
            #[allow(clippy::cast_precision_loss)]
            let frequency = count as f64 / denom;
            Keyword {
                word: word.to_string(),
                count,
                frequency,
            }
        })
        .collect()
}
