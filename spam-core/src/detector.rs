//! Prediction service over trained models

use tracing::debug;

use crate::error::{Result, SpamError};
use crate::models::SpamModel;
use crate::text::TextNormalizer;
use crate::trainer::{TrainedModels, TrainingReport};
use crate::types::{ModelKind, PredictionResult};

/// Spam detector
///
/// Holds the fitted vectorizer and models together with the normalizer that
/// must see raw input the same way the training corpus was preprocessed.
/// Read-only once built, so one instance can be shared by every request.
#[derive(Debug)]
pub struct SpamDetector {
    normalizer: TextNormalizer,
    models: TrainedModels,
}

impl SpamDetector {
    pub fn new(models: TrainedModels) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            models,
        }
    }

    /// Classify `text` with the selected model
    pub fn detect(&self, text: &str, kind: ModelKind) -> Result<PredictionResult> {
        if text.trim().is_empty() {
            return Err(SpamError::EmptyText);
        }

        let normalized = self.normalizer.normalize(text);
        let features = self.models.vectorizer.transform(&normalized)?;

        let model: &dyn SpamModel = match kind {
            ModelKind::Logistic => &self.models.logistic,
            ModelKind::NaiveBayes => &self.models.naive_bayes,
            ModelKind::KMeans => &self.models.kmeans,
        };
        let prediction = model.predict(&features)?;

        debug!(
            "{} predicted label {} (confidence {:.3}) for '{}'",
            model.name(),
            prediction.label,
            prediction.confidence,
            normalized
        );

        Ok(PredictionResult::new(prediction.label, prediction.confidence, kind))
    }

    /// Summary of the training run behind this detector
    pub fn report(&self) -> &TrainingReport {
        &self.models.report
    }

    pub fn models(&self) -> &TrainedModels {
        &self.models
    }
}
