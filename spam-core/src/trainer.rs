//! One-shot model training
//!
//! Vectorizes the whole corpus, splits it, oversamples the training
//! partition and fits the three models. The supervised models learn from the
//! balanced training partition; k-means is fitted on the full, unbalanced,
//! unsplit corpus.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

use crate::balance::RandomOverSampler;
use crate::dataset::{train_test_split, Dataset};
use crate::error::{Result, SpamError};
use crate::models::{accuracy, ClassWeight, KMeans, LogisticRegression, MultinomialNaiveBayes};
use crate::sparse::SparseVector;
use crate::vectorizer::TfIdfVectorizer;

/// Number of k-means clusters: one per verdict
pub const N_CLUSTERS: usize = 2;

/// Training hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// TF-IDF vocabulary size
    pub max_features: usize,
    /// Longest n-gram (unigrams up to this length)
    pub max_ngram: usize,
    /// Held-out fraction
    pub test_size: f64,
    pub split_seed: u64,
    pub oversample_seed: u64,
    /// Logistic regression inverse regularization strength
    pub logistic_c: f64,
    pub logistic_max_iter: usize,
    /// Naive Bayes additive smoothing
    pub naive_bayes_alpha: f64,
    pub kmeans_seed: u64,
    pub kmeans_n_init: usize,
    pub kmeans_max_iter: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_features: 3000,
            max_ngram: 2,
            test_size: 0.25,
            split_seed: 42,
            oversample_seed: 2,
            logistic_c: 1.0,
            logistic_max_iter: 300,
            naive_bayes_alpha: 0.1,
            kmeans_seed: 2,
            kmeans_n_init: 10,
            kmeans_max_iter: 300,
        }
    }
}

/// Summary of a training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub total_rows: usize,
    pub spam_rows: usize,
    pub train_rows: usize,
    pub balanced_rows: usize,
    pub test_rows: usize,
    pub vocabulary_size: usize,
    /// Held-out accuracy (None when nothing was held out)
    pub logistic_accuracy: Option<f64>,
    pub naive_bayes_accuracy: Option<f64>,
    pub kmeans_inertia: f64,
    pub elapsed: Duration,
}

/// Fitted vectorizer and models
#[derive(Debug)]
pub struct TrainedModels {
    pub vectorizer: TfIdfVectorizer,
    pub logistic: LogisticRegression,
    pub naive_bayes: MultinomialNaiveBayes,
    pub kmeans: KMeans,
    pub report: TrainingReport,
}

/// Model trainer
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainingConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Load the CSV corpus at `path` and train on it
    pub fn train_from_path<P: AsRef<Path>>(&self, path: P) -> Result<TrainedModels> {
        let dataset = Dataset::from_csv_path(path)?;
        self.train(&dataset)
    }

    /// Train all models on `dataset`
    pub fn train(&self, dataset: &Dataset) -> Result<TrainedModels> {
        let started = Instant::now();
        let config = &self.config;

        if dataset.is_empty() {
            return Err(SpamError::EmptyDataset);
        }
        let spam_rows = dataset.spam_count();
        if spam_rows == 0 || spam_rows == dataset.len() {
            return Err(SpamError::SingleClass(dataset.labels()[0]));
        }

        info!(
            "Training on {} rows ({} spam, {} legitimate)",
            dataset.len(),
            spam_rows,
            dataset.len() - spam_rows
        );

        let mut vectorizer = TfIdfVectorizer::new()
            .with_max_features(config.max_features)
            .with_ngram_range(1, config.max_ngram);
        let x = vectorizer.fit_transform(dataset.texts())?;
        let y = dataset.labels();

        let split = train_test_split(x.len(), config.test_size, config.split_seed);
        let (x_train, y_train) = select(&x, y, &split.train);
        let (x_test, y_test) = select(&x, y, &split.test);

        let (x_balanced, y_balanced) =
            RandomOverSampler::new(config.oversample_seed).resample(&x_train, &y_train)?;

        info!("Training Logistic Regression...");
        let mut logistic = LogisticRegression::new()
            .with_c(config.logistic_c)
            .with_max_iter(config.logistic_max_iter)
            .with_class_weight(ClassWeight::Balanced);
        logistic.fit(&x_balanced, &y_balanced)?;

        info!("Training Naive Bayes...");
        let mut naive_bayes = MultinomialNaiveBayes::new(config.naive_bayes_alpha);
        naive_bayes.fit(&x_balanced, &y_balanced)?;

        info!("Training K-Means...");
        let mut kmeans = KMeans::new(N_CLUSTERS)
            .with_seed(config.kmeans_seed)
            .with_n_init(config.kmeans_n_init)
            .with_max_iter(config.kmeans_max_iter);
        kmeans.fit(&x)?;

        let report = TrainingReport {
            total_rows: dataset.len(),
            spam_rows,
            train_rows: x_train.len(),
            balanced_rows: x_balanced.len(),
            test_rows: x_test.len(),
            vocabulary_size: vectorizer.vocabulary_size(),
            logistic_accuracy: accuracy(&logistic, &x_test, &y_test)?,
            naive_bayes_accuracy: accuracy(&naive_bayes, &x_test, &y_test)?,
            kmeans_inertia: kmeans.inertia(),
            elapsed: started.elapsed(),
        };

        info!(
            "All models trained successfully in {:?}: vocabulary {}, held-out accuracy logistic {} / naive bayes {}",
            report.elapsed,
            report.vocabulary_size,
            format_accuracy(report.logistic_accuracy),
            format_accuracy(report.naive_bayes_accuracy),
        );

        Ok(TrainedModels {
            vectorizer,
            logistic,
            naive_bayes,
            kmeans,
            report,
        })
    }
}

fn select(x: &[SparseVector], y: &[usize], rows: &[usize]) -> (Vec<SparseVector>, Vec<usize>) {
    (
        rows.iter().map(|&i| x[i].clone()).collect(),
        rows.iter().map(|&i| y[i]).collect(),
    )
}

fn format_accuracy(accuracy: Option<f64>) -> String {
    accuracy
        .map(|a| format!("{:.3}", a))
        .unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_dataset() -> Dataset {
        let rows = [
            ("win free prize", 1),
            ("free cash prize claim", 1),
            ("urgent win cash", 1),
            ("claim free award", 1),
            ("see meet tomorrow", 0),
            ("lunch tomorrow", 0),
            ("call later home", 0),
            ("meet dinner later", 0),
            ("see home soon", 0),
            ("thank lunch", 0),
            ("work late tonight", 0),
            ("tomorrow meet work", 0),
        ];
        Dataset::new(
            rows.iter().map(|(t, _)| t.to_string()).collect(),
            rows.iter().map(|(_, l)| *l).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_train_reports_partitions() {
        let models = ModelTrainer::default().train(&small_dataset()).unwrap();
        let report = &models.report;
        assert_eq!(report.total_rows, 12);
        assert_eq!(report.test_rows, 3);
        assert_eq!(report.train_rows, 9);
        assert!(report.balanced_rows >= report.train_rows);
        assert_eq!(report.vocabulary_size, models.vectorizer.vocabulary_size());
        assert_eq!(models.kmeans.n_clusters(), N_CLUSTERS);
    }

    #[test]
    fn test_single_class_dataset_fails() {
        let dataset = Dataset::new(vec!["a b".into(), "cc dd".into()], vec![0, 0]).unwrap();
        assert!(matches!(
            ModelTrainer::default().train(&dataset),
            Err(SpamError::SingleClass(0))
        ));
    }

    #[test]
    fn test_empty_dataset_fails() {
        assert!(matches!(
            ModelTrainer::default().train(&Dataset::default()),
            Err(SpamError::EmptyDataset)
        ));
    }

    #[test]
    fn test_missing_file_fails() {
        let result = ModelTrainer::default().train_from_path("/nonexistent/dataset.csv");
        assert!(matches!(result, Err(SpamError::Io(_))));
    }

    #[test]
    fn test_config_overrides_keep_defaults() {
        let config = TrainingConfig {
            max_features: 10,
            ..TrainingConfig::default()
        };
        let trainer = ModelTrainer::new(config);
        assert_eq!(trainer.config().max_features, 10);
        assert_eq!(trainer.config().naive_bayes_alpha, 0.1);
        assert_eq!(trainer.config().split_seed, 42);
    }
}
