//! TF-IDF vectorizer for text feature extraction.
//!
//! Fitted once on the training corpus; the vocabulary and IDF weights are
//! frozen afterwards so that every `transform` call produces vectors in the
//! same feature space.

use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use crate::error::{Result, SpamError};
use crate::sparse::SparseVector;

/// Tokens of two or more word characters.
const TERM_PATTERN: &str = r"\b\w\w+\b";

/// TF-IDF vectorizer over word n-grams.
pub struct TfIdfVectorizer {
    /// Maximum vocabulary size, chosen by corpus term frequency
    max_features: Option<usize>,
    /// Inclusive n-gram range
    ngram_range: (usize, usize),
    /// Term -> feature index
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature index
    idf: Vec<f64>,
    term_re: Regex,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("max_features", &self.max_features)
            .field("ngram_range", &self.ngram_range)
            .field("vocabulary_size", &self.vocabulary.len())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer (unigrams, unlimited vocabulary).
    pub fn new() -> Self {
        Self {
            max_features: None,
            ngram_range: (1, 1),
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            term_re: Regex::new(TERM_PATTERN).expect("term pattern is valid"),
        }
    }

    /// Limit the vocabulary to the most frequent terms.
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    /// Set the inclusive n-gram range, e.g. `(1, 2)` for unigrams and bigrams.
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        let min_n = min_n.max(1);
        self.ngram_range = (min_n, max_n.max(min_n));
        self
    }

    /// Fit on the corpus and return its vectors.
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Vec<SparseVector>> {
        self.fit(documents)?;
        documents.iter().map(|doc| self.transform(doc)).collect()
    }

    /// Fit the vocabulary and IDF weights on the corpus.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Err(SpamError::EmptyDataset);
        }

        let mut term_frequency: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = self.analyze(doc);
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
            for term in terms {
                *term_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if term_frequency.is_empty() {
            return Err(SpamError::EmptyVocabulary);
        }

        // Highest frequency first, alphabetical among equals
        let mut ranked: Vec<(String, usize)> = term_frequency.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        if let Some(limit) = self.max_features {
            ranked.truncate(limit);
        }

        // Feature indices follow alphabetical order of the kept terms
        let kept: BTreeMap<String, usize> = ranked.into_iter().collect();
        let n_documents = documents.len() as f64;

        let mut vocabulary = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (idx, term) in kept.into_keys().enumerate() {
            let df = document_frequency.get(&term).copied().unwrap_or(0) as f64;
            // IDF = ln((N + 1) / (df + 1)) + 1
            idf.push(((n_documents + 1.0) / (df + 1.0)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        debug!(
            "Fitted TF-IDF vocabulary: {} terms from {} documents",
            vocabulary.len(),
            documents.len()
        );

        self.vocabulary = vocabulary;
        self.idf = idf;
        Ok(())
    }

    /// Transform a document into an L2-normalized TF-IDF vector.
    ///
    /// Terms outside the fitted vocabulary contribute nothing.
    pub fn transform(&self, document: &str) -> Result<SparseVector> {
        if !self.is_fitted() {
            return Err(SpamError::NotFitted("TF-IDF vectorizer"));
        }

        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(document) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();

        let mut vector = SparseVector::from_entries(self.idf.len(), entries);
        let norm = vector.squared_norm().sqrt();
        if norm > 0.0 {
            vector.scale(1.0 / norm);
        }
        Ok(vector)
    }

    /// Extract the n-gram terms of a document.
    fn analyze(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        let tokens: Vec<&str> = self.term_re.find_iter(&lowered).map(|m| m.as_str()).collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    pub fn is_fitted(&self) -> bool {
        !self.idf.is_empty()
    }

    /// Size of the fitted vocabulary (the feature dimension).
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Feature index of a term, if it is in the vocabulary.
    pub fn feature_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}
