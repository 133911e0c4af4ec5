//! Decision tree nodes and traversal
//!
//! A tree is strictly binary: every branch owns exactly two children and a
//! leaf owns none. Branches route an item left when its value on the split
//! feature is strictly below the threshold, and right otherwise (equality
//! goes right).

use serde::Serialize;
use tracing::{debug, warn};

use crate::features::FeatureVector;

/// A decision tree node (branch or leaf)
#[derive(Debug, Clone, PartialEq)]
pub enum Node<F> {
    /// Terminal node reporting a label
    Leaf {
        label: String,
        /// The training vector that produced or last defended this leaf
        exemplar: F,
    },
    /// Internal split node
    Branch {
        feature: String,
        threshold: f64,
        left: Box<Node<F>>,
        right: Box<Node<F>>,
    },
}

/// Shape summary of a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub leaves: usize,
    pub branches: usize,
    /// Number of branches on the longest root-to-leaf path
    pub depth: usize,
}

/// Maximum number of branches on any root-to-leaf path.
///
/// Updates that would split a leaf at this depth are refused, and tree
/// documents nesting deeper are rejected on read and write.
pub const MAX_DEPTH: usize = 2048;

/// Midpoint of two values, computed as `min + |a - b| / 2`
pub fn midpoint(a: f64, b: f64) -> f64 {
    a.min(b) + (a - b).abs() / 2.0
}

impl<F> Node<F> {
    /// Create a new leaf node
    pub fn leaf(label: impl Into<String>, exemplar: F) -> Self {
        Self::Leaf {
            label: label.into(),
            exemplar,
        }
    }

    /// Create a new branch node
    pub fn branch(feature: impl Into<String>, threshold: f64, left: Node<F>, right: Node<F>) -> Self {
        Self::Branch {
            feature: feature.into(),
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Check if this node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Get the label if this is a leaf node
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Leaf { label, .. } => Some(label.as_str()),
            Self::Branch { .. } => None,
        }
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            leaves: 0,
            branches: 0,
            depth: 0,
        };
        let mut pending = vec![(self, 0usize)];

        while let Some((node, depth)) = pending.pop() {
            match node {
                Self::Leaf { .. } => {
                    stats.leaves += 1;
                    stats.depth = stats.depth.max(depth);
                }
                Self::Branch { left, right, .. } => {
                    stats.branches += 1;
                    pending.push((&**left, depth + 1));
                    pending.push((&**right, depth + 1));
                }
            }
        }

        stats
    }

    /// Two trees have the same shape when their branches split on the same
    /// features and thresholds and their leaves report the same labels.
    /// Exemplars are ignored.
    pub fn same_structure<G>(&self, other: &Node<G>) -> bool {
        let mut pending = vec![(self, other)];

        while let Some(pair) = pending.pop() {
            match pair {
                (Node::Leaf { label: a, .. }, Node::Leaf { label: b, .. }) => {
                    if a != b {
                        return false;
                    }
                }
                (
                    Node::Branch {
                        feature: fa,
                        threshold: ta,
                        left: la,
                        right: ra,
                    },
                    Node::Branch {
                        feature: fb,
                        threshold: tb,
                        left: lb,
                        right: rb,
                    },
                ) => {
                    if fa != fb || ta.to_bits() != tb.to_bits() {
                        return false;
                    }
                    pending.push((&**la, &**lb));
                    pending.push((&**ra, &**rb));
                }
                _ => return false,
            }
        }

        true
    }
}

impl<F: FeatureVector> Node<F> {
    /// Walk from this node to a leaf and return its label
    pub fn classify(&self, item: &F) -> &str {
        let mut node = self;

        loop {
            match node {
                Self::Leaf { label, .. } => return label,
                Self::Branch {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if item.get(feature) < *threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }

    /// The leaf `item` reaches, with the number of branches above it
    fn reached_leaf_mut(&mut self, item: &F) -> (&mut Node<F>, usize) {
        let mut node = self;
        let mut depth = 0usize;

        loop {
            match { node } {
                Node::Branch {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if item.get(feature) < *threshold {
                        &mut **left
                    } else {
                        &mut **right
                    };
                    depth += 1;
                }
                leaf => return (leaf, depth),
            }
        }
    }

    /// Repair the subtree so that `item` is classified as `label`.
    ///
    /// Descends with the same comparisons as [`Node::classify`] and replaces
    /// the leaf it reaches with a branch separating the leaf's exemplar from
    /// `item`. Returns `false` when no feature can separate the two vectors
    /// or the leaf already sits at [`MAX_DEPTH`], in which case the tree is
    /// left untouched.
    pub fn update(&mut self, item: F, label: String) -> bool {
        let (node, depth) = self.reached_leaf_mut(&item);
        let Node::Leaf { exemplar, .. } = &*node else {
            return false;
        };

        if depth >= MAX_DEPTH {
            warn!(
                "Leaf at maximum depth {}; example labeled '{}' not learned",
                MAX_DEPTH, label
            );
            return false;
        }

        let Some(feature) = item.most_different_feature(exemplar) else {
            warn!("No feature separates an example labeled '{}' from its leaf", label);
            return false;
        };

        let value = item.get(&feature);
        let threshold = midpoint(value, exemplar.get(&feature));
        let goes_left = value < threshold;
        debug!(
            "Splitting leaf at depth {} on '{}' at {} (new '{}' goes {})",
            depth,
            feature,
            threshold,
            label,
            if goes_left { "left" } else { "right" }
        );

        let old = std::mem::replace(node, Node::leaf(String::new(), F::default()));
        let fresh = Node::leaf(label, item);
        *node = if goes_left {
            Node::branch(feature, threshold, fresh, old)
        } else {
            Node::branch(feature, threshold, old, fresh)
        };
        true
    }
}
