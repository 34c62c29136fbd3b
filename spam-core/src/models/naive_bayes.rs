//! Multinomial Naive Bayes over non-negative features

use super::{check_dimension, check_supervised, Prediction, SpamModel};
use crate::error::{Result, SpamError};
use crate::sparse::SparseVector;
use tracing::warn;

const N_CLASSES: usize = 2;

/// Smallest smoothing applied; zero would give `ln(0)` for unseen features.
const ALPHA_MIN: f64 = 1e-10;

/// Multinomial Naive Bayes classifier with additive (Lidstone) smoothing
#[derive(Debug, Clone)]
pub struct MultinomialNaiveBayes {
    alpha: f64,
    /// log P(class)
    class_log_prior: Vec<f64>,
    /// log P(feature | class), one row per class
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNaiveBayes {
    /// Create a classifier with smoothing parameter `alpha`
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            class_log_prior: Vec::new(),
            feature_log_prob: Vec::new(),
        }
    }

    /// Fit on labels in `{0, 1}` with an empirical class prior
    pub fn fit(&mut self, x: &[SparseVector], y: &[usize]) -> Result<()> {
        if self.alpha < 0.0 {
            return Err(SpamError::InvalidInput(format!(
                "alpha must be non-negative, got {}",
                self.alpha
            )));
        }
        let n_features = check_supervised(x, y)?;

        let alpha = if self.alpha < ALPHA_MIN {
            warn!(
                alpha = self.alpha,
                "alpha too small, using {} to avoid numeric errors", ALPHA_MIN
            );
            ALPHA_MIN
        } else {
            self.alpha
        };

        let mut feature_count = vec![vec![0.0; n_features]; N_CLASSES];
        let mut class_count = [0usize; N_CLASSES];

        for (row, &label) in x.iter().zip(y) {
            if row.iter().any(|(_, v)| v < 0.0) {
                return Err(SpamError::InvalidInput(
                    "multinomial Naive Bayes needs non-negative features".to_string(),
                ));
            }
            class_count[label] += 1;
            row.add_scaled_to(&mut feature_count[label], 1.0);
        }

        let n = x.len() as f64;
        self.class_log_prior = class_count.iter().map(|&c| (c as f64 / n).ln()).collect();

        self.feature_log_prob = feature_count
            .into_iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum::<f64>() + alpha * n_features as f64;
                counts
                    .into_iter()
                    .map(|c| ((c + alpha) / total).ln())
                    .collect()
            })
            .collect();

        Ok(())
    }

    /// Posterior probabilities `[P(0 | x), P(1 | x)]`
    pub fn predict_proba(&self, features: &SparseVector) -> Result<Vec<f64>> {
        if self.feature_log_prob.is_empty() {
            return Err(SpamError::NotFitted("Naive Bayes"));
        }
        check_dimension(self.feature_log_prob[0].len(), features)?;

        let joint: Vec<f64> = self
            .class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_prob)| prior + features.dot(log_prob))
            .collect();

        // log-sum-exp for a stable softmax
        let max = joint.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = joint.iter().map(|j| (j - max).exp()).collect();
        let total: f64 = exp.iter().sum();
        Ok(exp.into_iter().map(|e| e / total).collect())
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl SpamModel for MultinomialNaiveBayes {
    fn predict(&self, features: &SparseVector) -> Result<Prediction> {
        let proba = self.predict_proba(features)?;
        // argmax, first class wins ties
        let label = usize::from(proba[1] > proba[0]);
        Ok(Prediction {
            label,
            confidence: proba[1].clamp(0.0, 1.0),
        })
    }

    fn name(&self) -> &str {
        "naive_bayes"
    }
}
