//! Lazily trained model registry
//!
//! Models are trained on the first request that needs them. The registry
//! guarantees a single training run per successful initialization: concurrent
//! first requests wait on the same run, and a failed run leaves the registry
//! empty so a later request can try again.

use spam_core::{ModelTrainer, SpamDetector};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::config::TrainingSettings;
use crate::error::{ApiError, Result};

/// Holder of the shared, trained detector
pub struct ModelRegistry {
    dataset_path: PathBuf,
    trainer: ModelTrainer,
    detector: Arc<OnceCell<Arc<SpamDetector>>>,
    training_runs: Arc<AtomicUsize>,
    timeout: Duration,
}

impl ModelRegistry {
    /// Create an untrained registry
    pub fn new(settings: &TrainingSettings, timeout: Duration) -> Self {
        Self {
            dataset_path: settings.dataset_path.clone(),
            trainer: ModelTrainer::new(settings.model.clone()),
            detector: Arc::new(OnceCell::new()),
            training_runs: Arc::new(AtomicUsize::new(0)),
            timeout,
        }
    }

    /// Whether training has completed successfully
    pub fn is_loaded(&self) -> bool {
        self.detector.initialized()
    }

    /// Number of training runs started so far
    pub fn training_runs(&self) -> usize {
        self.training_runs.load(Ordering::SeqCst)
    }

    /// Get the detector, training it first if needed.
    ///
    /// Initialization runs in its own task, so a caller giving up after the
    /// timeout does not abort the training other callers are waiting on.
    pub async fn detector(&self) -> Result<Arc<SpamDetector>> {
        if let Some(detector) = self.detector.get() {
            return Ok(detector.clone());
        }

        let cell = self.detector.clone();
        let runs = self.training_runs.clone();
        let trainer = self.trainer.clone();
        let path = self.dataset_path.clone();

        let init = tokio::spawn(async move {
            cell.get_or_try_init(|| async move {
                let run = runs.fetch_add(1, Ordering::SeqCst) + 1;
                info!("Models not loaded. Training (run {}) from {}", run, path.display());

                let models = tokio::task::spawn_blocking(move || trainer.train_from_path(&path))
                    .await
                    .map_err(|e| ApiError::Internal(format!("Training task failed: {}", e)))?
                    .map_err(|e| {
                        error!("Training failed: {}", e);
                        ApiError::TrainingFailure(e.to_string())
                    })?;

                Ok::<_, ApiError>(Arc::new(SpamDetector::new(models)))
            })
            .await
            .cloned()
        });

        match tokio::time::timeout(self.timeout, init).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(ApiError::Internal(format!("Training task failed: {}", e))),
            Err(_) => {
                warn!(
                    "Gave up waiting for training after {}s",
                    self.timeout.as_secs()
                );
                Err(ApiError::TrainingTimeout(self.timeout.as_secs()))
            }
        }
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("dataset_path", &self.dataset_path)
            .field("loaded", &self.is_loaded())
            .field("training_runs", &self.training_runs())
            .finish()
    }
}
