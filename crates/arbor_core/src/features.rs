//! Named numeric feature vectors consumed by the tree
//!
//! The tree never looks inside a vector beyond two questions: the value of a
//! named feature, and which feature separates two vectors the most.

use std::collections::{BTreeMap, BTreeSet};

/// A mapping from feature name to numeric value.
///
/// `Default` must produce the empty vector; leaves restored from a serialized
/// tree carry one as their exemplar.
pub trait FeatureVector: Default {
    /// Value of `name`, `0.0` when the vector does not know the feature.
    fn get(&self, name: &str) -> f64;

    /// Names of every feature this vector holds a value for.
    fn feature_names(&self) -> Vec<&str>;

    /// Feature with the greatest absolute difference between `self` and `other`.
    ///
    /// Candidates are the union of both vectors' names. Among equally
    /// different features the lexicographically smallest name wins. Returns
    /// `None` only when neither vector has any feature.
    fn most_different_feature(&self, other: &Self) -> Option<String> {
        let names: BTreeSet<&str> = self
            .feature_names()
            .into_iter()
            .chain(other.feature_names())
            .collect();

        let mut best: Option<(&str, f64)> = None;
        for name in names {
            let diff = (self.get(name) - other.get(name)).abs();
            match best {
                Some((_, best_diff)) if diff <= best_diff => {}
                _ => best = Some((name, diff)),
            }
        }

        best.map(|(name, _)| name.to_string())
    }
}

/// Plain feature vector backed by an ordered map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMap {
    values: BTreeMap<String, f64>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature value, returning the vector for chaining
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FeatureVector for FeatureMap {
    fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    fn feature_names(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
