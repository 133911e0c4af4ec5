//! Online binary decision-tree classifier
//!
//! Predicts a categorical label for an item described by named numeric
//! features. Trees are grown one example at a time: an example the current
//! tree already classifies correctly changes nothing, while a misclassified
//! example splits the leaf it reached on the feature that separates it most
//! from that leaf's exemplar.
//!
//! Modules:
//! - `features`: Feature-vector abstraction and a map-backed implementation
//! - `tree`: Tree nodes, traversal, and the leaf-splitting update
//! - `builder`: Online construction from ordered labeled examples
//! - `codec`: Line-oriented pre-order tree documents
//! - `accuracy`: Per-label accuracy reports
//! - `classifier`: Classifier owning a single tree

pub mod accuracy;
pub mod builder;
pub mod classifier;
pub mod codec;
pub mod errors;
pub mod features;
pub mod tree;

pub use accuracy::{AccuracyReport, AccuracyTally, OVERALL};
pub use builder::{build, build_from_parts, TreeBuilder};
pub use classifier::Classifier;
pub use codec::{parse_lines, read_tree, to_lines, write_tree};
pub use errors::{ClassifierError, Result};
pub use features::{FeatureMap, FeatureVector};
pub use tree::{midpoint, Node, TreeStats, MAX_DEPTH};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
