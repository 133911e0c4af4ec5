//! Per-label accuracy reports

use std::collections::BTreeMap;

use serde::Serialize;

/// Key of the entry covering every example regardless of label
pub const OVERALL: &str = "Overall";

/// Correct/total tallies keyed by ground-truth label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccuracyTally {
    correct: BTreeMap<String, usize>,
    total: BTreeMap<String, usize>,
    overall_correct: usize,
    overall_total: usize,
}

impl AccuracyTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one prediction against its true label
    pub fn record(&mut self, predicted: &str, actual: &str) {
        *self.total.entry(actual.to_string()).or_insert(0) += 1;
        self.overall_total += 1;

        let correct = self.correct.entry(actual.to_string()).or_insert(0);
        if predicted == actual {
            *correct += 1;
            self.overall_correct += 1;
        }
    }

    /// Fraction correct per ground-truth label plus the [`OVERALL`] entry
    pub fn finish(self) -> AccuracyReport {
        let mut accuracy = BTreeMap::new();
        for (label, total) in &self.total {
            let correct = self.correct.get(label).copied().unwrap_or(0);
            accuracy.insert(label.clone(), ratio(correct, *total));
        }
        // A ground-truth label named like the overall key is shadowed by it
        accuracy.insert(
            OVERALL.to_string(),
            ratio(self.overall_correct, self.overall_total),
        );

        AccuracyReport {
            accuracy,
            examples: self.overall_total,
        }
    }
}

fn ratio(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

/// Accuracy in `[0, 1]` per label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyReport {
    pub accuracy: BTreeMap<String, f64>,
    /// Number of examples measured
    pub examples: usize,
}

impl AccuracyReport {
    pub fn get(&self, label: &str) -> Option<f64> {
        self.accuracy.get(label).copied()
    }

    pub fn overall(&self) -> f64 {
        self.get(OVERALL).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.accuracy.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
