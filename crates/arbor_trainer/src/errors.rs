use arbor_core::ClassifierError;
use thiserror::Error;

/// Errors returned by dataset loading, configuration and training.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
