//! Model selection and prediction result types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SpamError;

pub const SPAM_MESSAGE: &str = "This message appears to be spam.";
pub const LEGITIMATE_MESSAGE: &str = "This message appears to be legitimate.";

/// Selectable model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    /// Logistic regression
    #[default]
    #[serde(rename = "logistic")]
    Logistic,
    /// Multinomial Naive Bayes
    #[serde(rename = "naive_bayes")]
    NaiveBayes,
    /// Two-cluster k-means
    #[serde(rename = "kmeans")]
    KMeans,
}

impl ModelKind {
    /// Every selectable model, in display order
    pub const ALL: [ModelKind; 3] = [ModelKind::Logistic, ModelKind::NaiveBayes, ModelKind::KMeans];

    /// Identifier accepted by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Logistic => "logistic",
            ModelKind::NaiveBayes => "naive_bayes",
            ModelKind::KMeans => "kmeans",
        }
    }

    /// Human-readable model name
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::Logistic => "Logistic Regression",
            ModelKind::NaiveBayes => "Naive Bayes",
            ModelKind::KMeans => "K-Means",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ModelKind::Logistic => "Logistic Regression - Best overall performance",
            ModelKind::NaiveBayes => "Naive Bayes - Good for text classification",
            ModelKind::KMeans => "K-Means Clustering - Unsupervised learning",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = SpamError;

    /// Case-insensitive match on the API identifiers
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "logistic" => Ok(ModelKind::Logistic),
            "naive_bayes" => Ok(ModelKind::NaiveBayes),
            "kmeans" => Ok(ModelKind::KMeans),
            _ => Err(SpamError::InvalidModel(s.to_string())),
        }
    }
}

/// Verdict for one message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// True iff the model predicted label 1
    pub is_spam: bool,
    /// Spam probability (supervised models) or distance score (k-means), in `[0, 1]`
    pub confidence: f64,
    pub model_used: ModelKind,
    pub message: String,
}

impl PredictionResult {
    pub fn new(label: usize, confidence: f64, model_used: ModelKind) -> Self {
        let is_spam = label == 1;
        Self {
            is_spam,
            confidence: confidence.clamp(0.0, 1.0),
            model_used,
            message: if is_spam { SPAM_MESSAGE } else { LEGITIMATE_MESSAGE }.to_string(),
        }
    }
}
