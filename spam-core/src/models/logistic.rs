//! Logistic regression for binary classification.
//!
//! Minimizes `||w||^2 / (2C) + sum_i s_i * logloss_i` by full-batch gradient
//! descent, where `s_i` is the class weight of sample `i`. The intercept is
//! not regularized.

use tracing::debug;

use super::{check_dimension, check_supervised, Prediction, SpamModel};
use crate::error::{Result, SpamError};
use crate::sparse::SparseVector;

/// Per-class sample weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassWeight {
    /// Every sample weighs 1
    Uniform,
    /// Weight `n / (2 * n_class)`, so both classes contribute equally
    Balanced,
}

/// Logistic Regression classifier
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// Inverse regularization strength
    c: f64,
    max_iter: usize,
    /// Stop once every gradient component is below this
    tol: f64,
    class_weight: ClassWeight,
    coefficients: Option<Vec<f64>>,
    intercept: f64,
    n_iter: usize,
}

impl LogisticRegression {
    /// Create a classifier with `C = 1`, 300 iterations and uniform weights
    pub fn new() -> Self {
        Self {
            c: 1.0,
            max_iter: 300,
            tol: 1e-4,
            class_weight: ClassWeight::Uniform,
            coefficients: None,
            intercept: 0.0,
            n_iter: 0,
        }
    }

    /// Set the inverse regularization strength
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_class_weight(mut self, class_weight: ClassWeight) -> Self {
        self.class_weight = class_weight;
        self
    }

    /// Sigmoid activation: 1 / (1 + e^(-z))
    fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let e = z.exp();
            e / (1.0 + e)
        }
    }

    /// Fit on labels in `{0, 1}`
    pub fn fit(&mut self, x: &[SparseVector], y: &[usize]) -> Result<()> {
        if self.c <= 0.0 {
            return Err(SpamError::InvalidInput(format!("C must be positive, got {}", self.c)));
        }
        let n_features = check_supervised(x, y)?;
        let weights = self.sample_weights(y);

        // Lipschitz bound of the gradient gives a step that always descends
        let lipschitz = 1.0 / self.c
            + 0.25
                * x.iter()
                    .zip(&weights)
                    .map(|(row, s)| s * (row.squared_norm() + 1.0))
                    .sum::<f64>();
        let step = 1.0 / lipschitz;

        let mut coef = vec![0.0; n_features];
        let mut intercept = 0.0;
        let mut n_iter = 0;

        for _ in 0..self.max_iter {
            n_iter += 1;

            let mut coef_grad: Vec<f64> = coef.iter().map(|w| w / self.c).collect();
            let mut intercept_grad = 0.0;

            for ((row, &label), &s) in x.iter().zip(y).zip(&weights) {
                let p = Self::sigmoid(row.dot(&coef) + intercept);
                let error = s * (p - label as f64);
                intercept_grad += error;
                row.add_scaled_to(&mut coef_grad, error);
            }

            intercept -= step * intercept_grad;
            for (w, g) in coef.iter_mut().zip(&coef_grad) {
                *w -= step * g;
            }

            if intercept_grad.abs() < self.tol && coef_grad.iter().all(|g| g.abs() < self.tol) {
                break;
            }
        }

        debug!("Logistic regression stopped after {} iterations", n_iter);

        self.coefficients = Some(coef);
        self.intercept = intercept;
        self.n_iter = n_iter;
        Ok(())
    }

    fn sample_weights(&self, y: &[usize]) -> Vec<f64> {
        match self.class_weight {
            ClassWeight::Uniform => vec![1.0; y.len()],
            ClassWeight::Balanced => {
                let n = y.len() as f64;
                let positives = y.iter().filter(|&&l| l == 1).count() as f64;
                let class_weight = [n / (2.0 * (n - positives)), n / (2.0 * positives)];
                y.iter().map(|&l| class_weight[l]).collect()
            }
        }
    }

    /// Probability of class 1
    pub fn predict_proba(&self, features: &SparseVector) -> Result<f64> {
        let coef = self
            .coefficients
            .as_ref()
            .ok_or(SpamError::NotFitted("Logistic regression"))?;
        check_dimension(coef.len(), features)?;
        Ok(Self::sigmoid(features.dot(coef) + self.intercept))
    }

    /// Fitted weights, if any
    pub fn coefficients(&self) -> Option<&[f64]> {
        self.coefficients.as_deref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Iterations run by the last `fit`
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl SpamModel for LogisticRegression {
    fn predict(&self, features: &SparseVector) -> Result<Prediction> {
        let p = self.predict_proba(features)?;
        Ok(Prediction {
            label: usize::from(p > 0.5),
            confidence: p.clamp(0.0, 1.0),
        })
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}
