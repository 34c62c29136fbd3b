//! Error types for spam-core

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, SpamError>;

/// Spam pipeline error types
#[derive(Error, Debug)]
pub enum SpamError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Required dataset column is absent
    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    /// A label cell could not be read as 0 or 1
    #[error("Invalid label '{value}' on row {row}")]
    InvalidLabel { row: usize, value: String },

    /// No usable rows in the dataset
    #[error("Dataset contains no usable rows")]
    EmptyDataset,

    /// Supervised models need both classes
    #[error("Dataset contains a single class ({0}); both spam and legitimate examples are required")]
    SingleClass(usize),

    /// Input text is blank
    #[error("Text cannot be empty")]
    EmptyText,

    /// Unknown model name
    #[error("Invalid model '{0}'. Use 'logistic', 'naive_bayes', or 'kmeans'")]
    InvalidModel(String),

    /// Component used before fitting
    #[error("{0} has not been fitted")]
    NotFitted(&'static str),

    /// Feature dimension differs from the fitted one
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Vectorizer found no terms to build a vocabulary from
    #[error("Empty vocabulary: corpus contains no terms of two or more characters")]
    EmptyVocabulary,

    /// Training input rejected by an estimator
    #[error("Invalid training input: {0}")]
    InvalidInput(String),
}
