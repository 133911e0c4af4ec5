//! Bag-of-words feature vectors for raw text
//!
//! Every distinct lowercase word is a feature whose value is the fraction of
//! the text's words it accounts for. Words absent from the text read as 0.

use arbor_core::FeatureVector;
use std::collections::BTreeMap;

/// A block of text vectorized into word frequencies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlock {
    frequencies: BTreeMap<String, f64>,
    word_count: usize,
}

impl TextBlock {
    pub fn new(text: &str) -> Self {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut word_count = 0usize;

        for word in tokenize(text) {
            *counts.entry(word).or_insert(0) += 1;
            word_count += 1;
        }

        let frequencies = counts
            .into_iter()
            .map(|(word, count)| (word, count as f64 / word_count as f64))
            .collect();

        Self {
            frequencies,
            word_count,
        }
    }

    /// Total number of words in the original text
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Number of distinct words
    pub fn vocabulary_size(&self) -> usize {
        self.frequencies.len()
    }
}

/// Lowercase words made of alphanumerics, keeping apostrophes inside words
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|word| word.trim_matches('\''))
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

impl FeatureVector for TextBlock {
    fn get(&self, name: &str) -> f64 {
        self.frequencies.get(name).copied().unwrap_or(0.0)
    }

    fn feature_names(&self) -> Vec<&str> {
        self.frequencies.keys().map(String::as_str).collect()
    }
}
