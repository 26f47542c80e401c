use crate::types::TextStatistics;

/// Naive counts over `text`.
///
/// Words are whitespace-separated tokens. Sentences are the segments produced
/// by splitting on `.`, so text without a period is one sentence and a
/// trailing period yields an empty final segment that still counts. Lengths
/// are measured in characters.
#[must_use]
pub fn text_statistics(text: &str) -> TextStatistics {
    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();
    let sentence_count = text.split('.').count();
    let character_count = text.chars().count();
    let total_word_chars: usize = words.iter().map(|w| w.chars().count()).sum();

    #[allow(clippy::cast_precision_loss)]
    let average_word_length = if word_count == 0 {
        0.0
    } else {
        total_word_chars as f64 / word_count as f64
    };

    #[allow(clippy::cast_precision_loss)]
    let average_sentence_length = word_count as f64 / sentence_count as f64;

    TextStatistics {
        word_count,
        sentence_count,
        character_count,
        average_word_length,
        average_sentence_length,
    }
}
