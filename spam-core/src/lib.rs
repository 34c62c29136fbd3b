//! Spam detection pipeline
//!
//! Loads a labeled message corpus, turns text into TF-IDF features and fits
//! three classifiers over them:
//! - Logistic regression with balanced class weights
//! - Multinomial Naive Bayes
//! - Two-cluster k-means
//!
//! [`SpamDetector`] wraps the fitted models and answers one message at a time.

pub mod balance;
pub mod dataset;
pub mod detector;
pub mod error;
pub mod models;
pub mod sparse;
pub mod text;
pub mod trainer;
pub mod types;
pub mod vectorizer;

pub use dataset::Dataset;
pub use detector::SpamDetector;
pub use error::{Result, SpamError};
pub use text::TextNormalizer;
pub use trainer::{ModelTrainer, TrainedModels, TrainingConfig, TrainingReport};
pub use types::{ModelKind, PredictionResult, LEGITIMATE_MESSAGE, SPAM_MESSAGE};
pub use vectorizer::TfIdfVectorizer;
