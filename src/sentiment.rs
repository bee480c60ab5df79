//! Keyword-based sentiment classification.
//!
//! Markers are lowercase fragments matched as raw substrings of the
//! lowercased text, so `"хорош"` also matches inside `"хорошист"`. There is
//! no negation handling and no notion of word boundaries.

use crate::models::Sentiment;

/// Fragments counted towards a positive label.
pub const POSITIVE_MARKERS: &[&str] = &["хорош", "люблю"];

/// Fragments counted towards a negative label.
pub const NEGATIVE_MARKERS: &[&str] = &["плохо", "ненавиж"];

/// Raw marker tally for a piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentScore {
    pub positive: usize,
    pub negative: usize,
}

impl SentimentScore {
    /// Majority wins; ties (including no matches at all) are neutral.
    pub fn label(&self) -> Sentiment {
        if self.positive > self.negative {
            Sentiment::Positive
        } else if self.negative > self.positive {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// Stateless classifier over a pair of marker sets.
#[derive(Debug, Clone, Copy)]
pub struct SentimentClassifier {
    positive: &'static [&'static str],
    negative: &'static [&'static str],
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentClassifier {
    pub fn new() -> Self {
        Self::with_markers(POSITIVE_MARKERS, NEGATIVE_MARKERS)
    }

    /// Markers must already be lowercase.
    pub fn with_markers(
        positive: &'static [&'static str],
        negative: &'static [&'static str],
    ) -> Self {
        Self { positive, negative }
    }

    pub fn score(&self, text: &str) -> SentimentScore {
        let lowered = text.to_lowercase();
        SentimentScore {
            positive: count_markers(&lowered, self.positive),
            negative: count_markers(&lowered, self.negative),
        }
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        self.score(text).label()
    }
}

// Non-overlapping occurrences, summed over every marker.
fn count_markers(lowered: &str, markers: &[&str]) -> usize {
    markers
        .iter()
        .filter(|marker| !marker.is_empty())
        .map(|marker| lowered.matches(marker).count())
        .sum()
}
