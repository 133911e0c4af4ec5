//! Arbor trainer - datasets, text vectors and tooling around the tree engine
//!
//! Turns delimited files of labeled text into ordered training examples for
//! the online decision tree, and loads and stores trained trees.

pub mod config;
pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod text;

use arbor_core::Classifier;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

pub use config::{DatasetConfig, TrainerConfig, TrainingConfig};
pub use dataset::Dataset;
pub use deterministic::{shuffle_in_place, LcgRng};
pub use errors::TrainerError;
pub use text::TextBlock;

/// Train a classifier from a CSV file, shuffling first when configured to.
pub fn train_classifier_from_csv(
    path: &Path,
    config: &TrainerConfig,
) -> Result<Classifier<TextBlock>, TrainerError> {
    config.validate()?;

    let mut dataset = Dataset::from_csv(path, &config.dataset)?;
    info!("Loaded {} examples from {}", dataset.len(), path.display());
    for (label, count) in dataset.label_counts() {
        info!("  {}: {} examples", label, count);
    }

    if config.training.shuffle {
        info!("Shuffling dataset with seed: {}", config.training.seed);
        dataset.shuffle(config.training.seed);
    }

    let (data, labels) = dataset.into_parts();
    Ok(Classifier::train(data, labels)?)
}

/// Load a saved tree document
pub fn load_classifier(path: &Path) -> Result<Classifier<TextBlock>, TrainerError> {
    let file = File::open(path)?;
    Ok(Classifier::load(BufReader::new(file))?)
}

/// Save a tree document, creating parent directories as needed.
///
/// The file is only created once the whole tree has been serialized.
pub fn save_classifier(
    classifier: &Classifier<TextBlock>,
    path: &Path,
) -> Result<(), TrainerError> {
    let mut document = Vec::new();
    classifier.save(&mut document)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, document)?;
    info!("Saved tree to: {}", path.display());
    Ok(())
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
