//! Training corpus loading and partitioning
//!
//! The corpus is a CSV file with a header row. Two columns are required:
//! `preprocessed_text` (already normalized text) and `spam` (0 or 1). Any
//! other column is ignored, and rows whose text is blank are dropped.

use csv::ReaderBuilder;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, SpamError};

pub const TEXT_COLUMN: &str = "preprocessed_text";
pub const LABEL_COLUMN: &str = "spam";

/// Labeled training corpus
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    texts: Vec<String>,
    labels: Vec<usize>,
}

impl Dataset {
    /// Build a dataset from parallel text and label vectors
    pub fn new(texts: Vec<String>, labels: Vec<usize>) -> Result<Self> {
        if texts.len() != labels.len() {
            return Err(SpamError::InvalidInput(format!(
                "{} texts but {} labels",
                texts.len(),
                labels.len()
            )));
        }
        if let Some((row, bad)) = labels.iter().enumerate().find(|(_, &l)| l > 1) {
            return Err(SpamError::InvalidLabel {
                row: row + 1,
                value: bad.to_string(),
            });
        }
        Ok(Self { texts, labels })
    }

    /// Load a CSV corpus from disk
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading training dataset from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Load a CSV corpus from any reader
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| SpamError::MissingColumn(name.to_string()))
        };
        let text_idx = column(TEXT_COLUMN)?;
        let label_idx = column(LABEL_COLUMN)?;

        let mut texts = Vec::new();
        let mut labels = Vec::new();
        let mut dropped = 0usize;

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let text = record.get(text_idx).map(str::trim).unwrap_or("");
            if text.is_empty() {
                dropped += 1;
                continue;
            }

            let raw_label = record.get(label_idx).unwrap_or("");
            let label = parse_label(raw_label).ok_or_else(|| SpamError::InvalidLabel {
                row: row + 1,
                value: raw_label.to_string(),
            })?;

            texts.push(text.to_string());
            labels.push(label);
        }

        if dropped > 0 {
            debug!("Dropped {} rows with missing {}", dropped, TEXT_COLUMN);
        }
        if texts.is_empty() {
            return Err(SpamError::EmptyDataset);
        }

        Ok(Self { texts, labels })
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Number of rows labeled spam
    pub fn spam_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }
}

/// Accepts `0`/`1`, their float spellings and `true`/`false`.
fn parse_label(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => return Some(1),
        "0" | "false" => return Some(0),
        _ => {}
    }
    match raw.parse::<f64>() {
        Ok(v) if v == 1.0 => Some(1),
        Ok(v) if v == 0.0 => Some(0),
        _ => None,
    }
}

/// Row indices of a shuffled train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with `seed` and hold out `ceil(n * test_fraction)` rows.
///
/// At least one row always stays in the training partition.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Split {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * test_fraction.clamp(0.0, 1.0)).ceil() as usize;
    let n_test = n_test.min(n.saturating_sub(1));

    let train = indices.split_off(n_test);
    Split {
        train,
        test: indices,
    }
}
