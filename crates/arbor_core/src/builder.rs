//! Online tree construction
//!
//! Examples are absorbed one at a time in input order. The first example
//! becomes the root leaf; every later example is classified against the tree
//! built so far and only triggers a split when the tree gets it wrong. The
//! resulting tree therefore depends on the order of the examples.

use tracing::{debug, info};

use crate::errors::{ClassifierError, Result};
use crate::features::FeatureVector;
use crate::tree::Node;

/// Accumulates labeled examples into a decision tree
#[derive(Debug)]
pub struct TreeBuilder<F> {
    root: Option<Node<F>>,
    seen: usize,
    splits: usize,
}

impl<F> Default for TreeBuilder<F> {
    fn default() -> Self {
        Self {
            root: None,
            seen: 0,
            splits: 0,
        }
    }
}

impl<F: FeatureVector> TreeBuilder<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb one labeled example. Returns `true` when the tree changed.
    pub fn push(&mut self, item: F, label: impl Into<String>) -> bool {
        let label = label.into();
        self.seen += 1;

        let Some(root) = self.root.as_mut() else {
            debug!("Example {} becomes the root leaf '{}'", self.seen, label);
            self.root = Some(Node::leaf(label, item));
            return true;
        };

        if root.classify(&item) == label {
            return false;
        }

        let changed = root.update(item, label);
        if changed {
            self.splits += 1;
        }
        changed
    }

    /// Number of examples absorbed so far
    pub fn examples_seen(&self) -> usize {
        self.seen
    }

    /// Number of leaves split so far
    pub fn splits(&self) -> usize {
        self.splits
    }

    /// Finish construction, failing if no example was ever pushed
    pub fn finish(self) -> Result<Node<F>> {
        let root = self.root.ok_or_else(|| {
            ClassifierError::InvalidArgument("cannot build a tree from zero examples".to_string())
        })?;

        let stats = root.stats();
        info!(
            "Built tree from {} examples: {} splits, {} leaves, depth {}",
            self.seen, self.splits, stats.leaves, stats.depth
        );
        Ok(root)
    }
}

/// Build a tree from `(vector, label)` pairs in order
pub fn build<F, L, I>(examples: I) -> Result<Node<F>>
where
    F: FeatureVector,
    L: Into<String>,
    I: IntoIterator<Item = (F, L)>,
{
    let mut builder = TreeBuilder::new();
    for (item, label) in examples {
        builder.push(item, label);
    }
    builder.finish()
}

/// Build a tree from parallel vector and label sequences
pub fn build_from_parts<F, L>(data: Vec<F>, labels: Vec<L>) -> Result<Node<F>>
where
    F: FeatureVector,
    L: Into<String>,
{
    if data.len() != labels.len() {
        return Err(ClassifierError::InvalidArgument(format!(
            "Length of provided data [{}] doesn't match provided labels [{}]",
            data.len(),
            labels.len()
        )));
    }
    if data.is_empty() {
        return Err(ClassifierError::InvalidArgument(
            "cannot build a tree from zero examples".to_string(),
        ));
    }

    build(data.into_iter().zip(labels))
}
