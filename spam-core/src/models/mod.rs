//! Spam models
//!
//! Three interchangeable estimators over TF-IDF features:
//!
//! - [`LogisticRegression`]: L2-regularized, class-weighted logistic model
//! - [`MultinomialNaiveBayes`]: multinomial Naive Bayes with additive smoothing
//! - [`KMeans`]: unsupervised two-cluster partitioner
//!
//! Each one implements [`SpamModel`], which maps a feature vector to a label
//! and a confidence score in `[0, 1]`.

pub mod kmeans;
pub mod logistic;
pub mod naive_bayes;

pub use kmeans::KMeans;
pub use logistic::{ClassWeight, LogisticRegression};
pub use naive_bayes::MultinomialNaiveBayes;

use crate::error::{Result, SpamError};
use crate::sparse::SparseVector;

/// Output of a single model evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted label (1 = spam for the supervised models, cluster id for k-means)
    pub label: usize,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

/// Common interface of the fitted spam models.
pub trait SpamModel: Send + Sync {
    /// Predict a label and confidence for one feature vector
    fn predict(&self, features: &SparseVector) -> Result<Prediction>;

    /// Name for logging
    fn name(&self) -> &str;
}

/// Fraction of rows whose predicted label matches `y`; `None` for no rows.
pub fn accuracy<M: SpamModel + ?Sized>(
    model: &M,
    x: &[SparseVector],
    y: &[usize],
) -> Result<Option<f64>> {
    if x.is_empty() {
        return Ok(None);
    }
    let mut correct = 0usize;
    for (features, &label) in x.iter().zip(y) {
        if model.predict(features)?.label == label {
            correct += 1;
        }
    }
    Ok(Some(correct as f64 / x.len() as f64))
}

/// Validate supervised training input and return the feature dimension.
pub(crate) fn check_supervised(x: &[SparseVector], y: &[usize]) -> Result<usize> {
    if x.len() != y.len() {
        return Err(SpamError::InvalidInput(format!(
            "{} samples but {} labels",
            x.len(),
            y.len()
        )));
    }
    let dim = check_features(x)?;
    if let Some(&label) = y.iter().find(|&&l| l > 1) {
        return Err(SpamError::InvalidInput(format!(
            "labels must be 0 or 1, found {}",
            label
        )));
    }
    let positives = y.iter().filter(|&&l| l == 1).count();
    if positives == 0 || positives == y.len() {
        return Err(SpamError::SingleClass(y[0]));
    }
    Ok(dim)
}

/// Validate that all rows share one dimension and return it.
pub(crate) fn check_features(x: &[SparseVector]) -> Result<usize> {
    let first = x
        .first()
        .ok_or_else(|| SpamError::InvalidInput("cannot fit with zero samples".to_string()))?;
    let dim = first.dim();
    if let Some(row) = x.iter().find(|row| row.dim() != dim) {
        return Err(SpamError::DimensionMismatch {
            expected: dim,
            actual: row.dim(),
        });
    }
    Ok(dim)
}

/// Reject vectors whose dimension differs from the fitted one.
pub(crate) fn check_dimension(expected: usize, features: &SparseVector) -> Result<()> {
    if features.dim() != expected {
        return Err(SpamError::DimensionMismatch {
            expected,
            actual: features.dim(),
        });
    }
    Ok(())
}
