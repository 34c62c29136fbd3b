//! Configuration for spam-api

use serde::{Deserialize, Serialize};
use spam_core::TrainingConfig;
use std::path::{Path, PathBuf};

use crate::error::{ApiError, Result};

/// Main API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Training configuration
    #[serde(default)]
    pub training: TrainingSettings,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind host (e.g., "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
    /// How long a request waits for the first training run before getting a 503
    #[serde(default = "default_training_timeout")]
    pub training_timeout_seconds: u64,
}

/// Training data source and hyperparameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingSettings {
    /// CSV corpus with `preprocessed_text` and `spam` columns
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    /// Model hyperparameters, every key optional
    #[serde(flatten)]
    pub model: TrainingConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_training_timeout() -> u64 {
    120
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("dataset/cleaned_dataset_small.csv")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            training_timeout_seconds: default_training_timeout(),
        }
    }
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            model: TrainingConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ApiError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Create a default development configuration
    pub fn development() -> Self {
        Self {
            server: ServerConfig::default(),
            training: TrainingSettings::default(),
        }
    }

    /// Apply `PORT` and `SPAM_DATASET_PATH` from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| ApiError::Config(format!("Invalid PORT '{}': {}", port, e)))?;
        }

        if let Some(path) = lookup("SPAM_DATASET_PATH") {
            self.training.dataset_path = PathBuf::from(path);
        }

        Ok(())
    }

    /// Listen address in `host:port` form
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.training_timeout_seconds == 0 {
            return Err(ApiError::Config(
                "training_timeout_seconds must be greater than zero".to_string(),
            ));
        }

        let model = &self.training.model;
        if !(0.0..1.0).contains(&model.test_size) {
            return Err(ApiError::Config(format!(
                "test_size must be in [0, 1), got {}",
                model.test_size
            )));
        }
        if model.max_features == 0 {
            return Err(ApiError::Config("max_features must be positive".to_string()));
        }
        if model.max_ngram == 0 {
            return Err(ApiError::Config("max_ngram must be at least 1".to_string()));
        }
        if model.logistic_c <= 0.0 {
            return Err(ApiError::Config("logistic_c must be positive".to_string()));
        }
        if model.naive_bayes_alpha <= 0.0 {
            return Err(ApiError::Config(
                "naive_bayes_alpha must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::development()
    }
}
