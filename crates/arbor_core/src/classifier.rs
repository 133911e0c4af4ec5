//! Classifier owning a single decision tree

use std::io::{BufRead, Write};

use tracing::info;

use crate::accuracy::{AccuracyReport, AccuracyTally};
use crate::builder::{build_from_parts, TreeBuilder};
use crate::codec::{read_tree, write_tree};
use crate::errors::{ClassifierError, Result};
use crate::features::FeatureVector;
use crate::tree::{Node, TreeStats};

/// A trained or loaded decision-tree classifier
#[derive(Debug, Clone)]
pub struct Classifier<F> {
    root: Node<F>,
}

impl<F: FeatureVector> Classifier<F> {
    /// Train a classifier from parallel vector and label sequences
    pub fn train<L: Into<String>>(data: Vec<F>, labels: Vec<L>) -> Result<Self> {
        let root = build_from_parts(data, labels)?;
        Ok(Self { root })
    }

    /// Finish a classifier from an online builder
    pub fn from_builder(builder: TreeBuilder<F>) -> Result<Self> {
        Ok(Self {
            root: builder.finish()?,
        })
    }

    /// Load a classifier from a serialized tree document
    pub fn load<R: BufRead>(reader: R) -> Result<Self> {
        let root = read_tree(reader)?;
        let stats = root.stats();
        info!(
            "Loaded tree with {} leaves and {} branches (depth {})",
            stats.leaves, stats.branches, stats.depth
        );
        Ok(Self { root })
    }

    /// Predict the label of `item`
    pub fn classify(&self, item: &F) -> &str {
        self.root.classify(item)
    }

    /// Absorb one more labeled example, splitting a leaf if `item` is
    /// currently misclassified. Returns `true` when the tree changed.
    pub fn learn(&mut self, item: F, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.root.classify(&item) == label {
            return false;
        }
        self.root.update(item, label)
    }

    /// Per-label and overall accuracy against labeled data
    pub fn calculate_accuracy<L: AsRef<str>>(
        &self,
        data: &[F],
        labels: &[L],
    ) -> Result<AccuracyReport> {
        if data.len() != labels.len() {
            return Err(ClassifierError::InvalidArgument(format!(
                "Length of provided data [{}] doesn't match provided labels [{}]",
                data.len(),
                labels.len()
            )));
        }

        let mut tally = AccuracyTally::new();
        for (item, label) in data.iter().zip(labels) {
            tally.record(self.classify(item), label.as_ref());
        }
        Ok(tally.finish())
    }
}

impl<F> Classifier<F> {
    /// Wrap an existing tree
    pub fn from_root(root: Node<F>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node<F> {
        &self.root
    }

    pub fn stats(&self) -> TreeStats {
        self.root.stats()
    }

    /// Write the tree in pre-order form
    pub fn save<W: Write>(&self, mut output: W) -> Result<()> {
        write_tree(&self.root, &mut output)?;
        output.flush()?;
        Ok(())
    }
}
