//! Random oversampling for imbalanced training sets

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{Result, SpamError};

/// Random oversampler
///
/// Draws minority-class rows with replacement until every class has as many
/// rows as the majority class. Original rows keep their order and the drawn
/// duplicates are appended after them.
#[derive(Debug, Clone)]
pub struct RandomOverSampler {
    seed: u64,
}

impl RandomOverSampler {
    /// Create an oversampler with a fixed seed
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Balance `(x, y)` by duplicating minority-class rows
    pub fn resample<T: Clone>(&self, x: &[T], y: &[usize]) -> Result<(Vec<T>, Vec<usize>)> {
        if x.len() != y.len() {
            return Err(SpamError::InvalidInput(format!(
                "{} samples but {} labels",
                x.len(),
                y.len()
            )));
        }

        let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (idx, &label) in y.iter().enumerate() {
            by_class.entry(label).or_default().push(idx);
        }

        let target = by_class.values().map(Vec::len).max().unwrap_or(0);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut indices: Vec<usize> = (0..y.len()).collect();
        for (label, members) in &by_class {
            let missing = target - members.len();
            if missing > 0 {
                debug!("Oversampling class {}: {} -> {} rows", label, members.len(), target);
            }
            for _ in 0..missing {
                indices.push(members[rng.gen_range(0..members.len())]);
            }
        }

        let x_out = indices.iter().map(|&i| x[i].clone()).collect();
        let y_out = indices.iter().map(|&i| y[i]).collect();
        Ok((x_out, y_out))
    }
}

impl Default for RandomOverSampler {
    fn default() -> Self {
        Self::new(2)
    }
}
