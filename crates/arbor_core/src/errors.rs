//! Error types for the decision-tree engine

use thiserror::Error;

/// Errors that can occur while building, loading, or querying a classifier
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// A required input was empty or inconsistent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The input passed validation but did not describe a usable tree
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A line of a serialized tree could not be parsed
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number within the document
        line: usize,
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for classifier operations
pub type Result<T> = std::result::Result<T, ClassifierError>;
