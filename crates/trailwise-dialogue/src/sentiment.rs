//! Crude lexicon-based sentiment classification.
//!
//! Counts substring occurrences of fixed positive and negative word lists.
//! No tokenization, no negation handling; ties resolve to neutral.

use trailwise_core::types::Sentiment;

/// Words and phrases counted as positive signals.
static POSITIVE_WORDS: &[&str] = &[
    "thanks",
    "thank you",
    "great",
    "good",
    "awesome",
    "love",
    "nice",
    "perfect",
    "helpful",
    "amazing",
    "wonderful",
    "appreciate",
    "excellent",
];

/// Words and phrases counted as negative signals.
static NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "wrong",
    "terrible",
    "awful",
    "hate",
    "annoying",
    "useless",
    "confusing",
    "problem",
    "broken",
    "disappointed",
    "frustrated",
    "horrible",
];

/// Lexicon-based sentiment analyzer.
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    /// Classify the sentiment of raw user text.
    ///
    /// Matching is substring containment on the lower-cased input, so
    /// "appreciate" also fires inside "appreciated". More positive hits
    /// than negative gives positive, the reverse gives negative, and a
    /// tie (including zero hits on both sides) gives neutral.
    pub fn classify(&self, text: &str) -> Sentiment {
        let lower = text.to_lowercase();

        let positive: usize = POSITIVE_WORDS
            .iter()
            .map(|w| lower.matches(w).count())
            .sum();
        let negative: usize = NEGATIVE_WORDS
            .iter()
            .map(|w| lower.matches(w).count())
            .sum();

        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}
