//! Trainer configuration
//!
//! Loaded from a TOML file; any section or key left out falls back to the
//! defaults below.
//!
//! ```toml
//! [dataset]
//! train_file = "data/emails/train.csv"
//! test_file = "data/emails/test.csv"
//! label_column = 0
//! content_column = 1
//! has_header = true
//! delimiter = ","
//!
//! [training]
//! shuffle = true
//! seed = 42
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::TrainerError;

/// Top-level trainer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub dataset: DatasetConfig,
    pub training: TrainingConfig,
}

/// Where labeled text lives and how to read it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// CSV file used for training
    pub train_file: PathBuf,
    /// CSV file used for accuracy reports
    pub test_file: PathBuf,
    /// Zero-based column holding the label
    pub label_column: usize,
    /// Zero-based column holding the text to classify
    pub content_column: usize,
    /// Skip the first row
    pub has_header: bool,
    pub delimiter: char,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            train_file: PathBuf::from("data/emails/train.csv"),
            test_file: PathBuf::from("data/emails/test.csv"),
            label_column: 0,
            content_column: 1,
            has_header: true,
            delimiter: ',',
        }
    }
}

/// How examples are fed to the online builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Shuffle examples before training
    pub shuffle: bool,
    /// Seed for the deterministic shuffle
    pub seed: i64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            shuffle: true,
            seed: 42,
        }
    }
}

impl TrainerConfig {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrainerError> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let config: TrainerConfig = toml::from_str(&content)
            .map_err(|e| TrainerError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TrainerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TrainerError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), TrainerError> {
        if self.dataset.label_column == self.dataset.content_column {
            return Err(TrainerError::Config(format!(
                "label and content columns must differ (both are {})",
                self.dataset.label_column
            )));
        }
        if !self.dataset.delimiter.is_ascii() {
            return Err(TrainerError::Config(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.dataset.delimiter
            )));
        }
        Ok(())
    }
}
