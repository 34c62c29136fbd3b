//! K-Means clustering algorithm.
//!
//! Uses Lloyd's algorithm with k-means++ initialization. Several seeded
//! restarts are run and the one with the lowest inertia is kept.
//!
//! Cluster ids carry no meaning of their own: which id lands on the spam
//! side depends on the data and the seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{check_dimension, check_features, Prediction, SpamModel};
use crate::error::{Result, SpamError};
use crate::sparse::SparseVector;

/// K-Means clustering
#[derive(Debug, Clone)]
pub struct KMeans {
    n_clusters: usize,
    max_iter: usize,
    /// Convergence tolerance relative to the mean feature variance
    tol: f64,
    /// Number of k-means++ restarts
    n_init: usize,
    seed: u64,
    centroids: Vec<Vec<f64>>,
    centroid_sq_norms: Vec<f64>,
    inertia: f64,
    n_iter: usize,
}

/// Result of a single Lloyd run
struct Run {
    centroids: Vec<Vec<f64>>,
    inertia: f64,
    n_iter: usize,
}

impl KMeans {
    /// Create a partitioner with `n_clusters` centres
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: 300,
            tol: 1e-4,
            n_init: 10,
            seed: 0,
            centroids: Vec::new(),
            centroid_sq_norms: Vec::new(),
            inertia: 0.0,
            n_iter: 0,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fit cluster centres on `x`
    pub fn fit(&mut self, x: &[SparseVector]) -> Result<()> {
        let dim = check_features(x)?;
        if self.n_clusters == 0 || x.len() < self.n_clusters {
            return Err(SpamError::InvalidInput(format!(
                "k-means needs at least {} samples, got {}",
                self.n_clusters.max(1),
                x.len()
            )));
        }

        let tol = self.tol * mean_variance(x, dim);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut best: Option<Run> = None;
        for _ in 0..self.n_init {
            let initial = self.init_plus_plus(x, &mut rng);
            let run = self.lloyd(x, initial, tol);
            if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }

        let best = best.ok_or_else(|| SpamError::InvalidInput("no k-means run".to_string()))?;
        debug!(
            "K-Means converged: inertia {:.4} after {} iterations",
            best.inertia, best.n_iter
        );

        self.centroid_sq_norms = best.centroids.iter().map(|c| squared_norm(c)).collect();
        self.centroids = best.centroids;
        self.inertia = best.inertia;
        self.n_iter = best.n_iter;
        Ok(())
    }

    /// k-means++ seeding: each next centre is drawn with probability
    /// proportional to its squared distance from the closest chosen centre.
    fn init_plus_plus(&self, x: &[SparseVector], rng: &mut StdRng) -> Vec<Vec<f64>> {
        let mut centroids = Vec::with_capacity(self.n_clusters);
        let first = &x[rng.gen_range(0..x.len())];
        centroids.push(first.to_dense());

        let mut closest: Vec<f64> = {
            let c = &centroids[0];
            let norm = squared_norm(c);
            x.iter().map(|row| row.squared_distance(c, norm)).collect()
        };

        while centroids.len() < self.n_clusters {
            let total: f64 = closest.iter().sum();
            let chosen = if total > 0.0 {
                let mut target = rng.gen::<f64>() * total;
                let mut chosen = x.len() - 1;
                for (i, d) in closest.iter().enumerate() {
                    if target < *d {
                        chosen = i;
                        break;
                    }
                    target -= d;
                }
                chosen
            } else {
                rng.gen_range(0..x.len())
            };

            let centre = x[chosen].to_dense();
            let norm = squared_norm(&centre);
            for (d, row) in closest.iter_mut().zip(x) {
                *d = d.min(row.squared_distance(&centre, norm));
            }
            centroids.push(centre);
        }

        centroids
    }

    fn lloyd(&self, x: &[SparseVector], mut centroids: Vec<Vec<f64>>, tol: f64) -> Run {
        let dim = centroids[0].len();
        let mut n_iter = 0;

        for _ in 0..self.max_iter {
            n_iter += 1;
            let norms: Vec<f64> = centroids.iter().map(|c| squared_norm(c)).collect();

            let mut sums = vec![vec![0.0; dim]; self.n_clusters];
            let mut counts = vec![0usize; self.n_clusters];
            for row in x {
                let (cluster, _) = nearest(row, &centroids, &norms);
                row.add_scaled_to(&mut sums[cluster], 1.0);
                counts[cluster] += 1;
            }

            let mut shift = 0.0;
            for ((centre, sum), &count) in centroids.iter_mut().zip(sums).zip(&counts) {
                // an empty cluster keeps its previous centre
                if count == 0 {
                    continue;
                }
                let inv = 1.0 / count as f64;
                for (c, s) in centre.iter_mut().zip(sum) {
                    let updated = s * inv;
                    shift += (updated - *c) * (updated - *c);
                    *c = updated;
                }
            }

            if shift <= tol {
                break;
            }
        }

        let norms: Vec<f64> = centroids.iter().map(|c| squared_norm(c)).collect();
        let inertia = x.iter().map(|row| nearest(row, &centroids, &norms).1).sum();

        Run {
            centroids,
            inertia,
            n_iter,
        }
    }

    /// Euclidean distance from `features` to every centre
    pub fn transform(&self, features: &SparseVector) -> Result<Vec<f64>> {
        let first = self.centroids.first().ok_or(SpamError::NotFitted("K-Means"))?;
        check_dimension(first.len(), features)?;
        Ok(self
            .centroids
            .iter()
            .zip(&self.centroid_sq_norms)
            .map(|(c, &norm)| features.squared_distance(c, norm).sqrt())
            .collect())
    }

    /// Fitted centres
    pub fn centroids(&self) -> &[Vec<f64>] {
        &self.centroids
    }

    /// Sum of squared distances of the training rows to their centre
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Lloyd iterations of the kept run
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }
}

impl SpamModel for KMeans {
    fn predict(&self, features: &SparseVector) -> Result<Prediction> {
        let distances = self.transform(features)?;
        let (label, nearest) = distances
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::INFINITY), |best, (i, d)| if d < best.1 { (i, d) } else { best });
        let farthest = distances.iter().copied().fold(0.0, f64::max);

        Ok(Prediction {
            label,
            confidence: distance_confidence(nearest, farthest),
        })
    }

    fn name(&self) -> &str {
        "kmeans"
    }
}

/// `1 - nearest / farthest`; equidistant points (including a point sitting
/// on every centre) get 0.5.
pub fn distance_confidence(nearest: f64, farthest: f64) -> f64 {
    if (farthest - nearest).abs() <= f64::EPSILON * farthest.max(1.0) {
        return 0.5;
    }
    (1.0 - nearest / farthest).clamp(0.0, 1.0)
}

fn squared_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

/// Index of and squared distance to the closest centre (first wins ties)
fn nearest(row: &SparseVector, centroids: &[Vec<f64>], norms: &[f64]) -> (usize, f64) {
    centroids
        .iter()
        .zip(norms)
        .map(|(c, &norm)| row.squared_distance(c, norm))
        .enumerate()
        .fold((0, f64::INFINITY), |best, (i, d)| if d < best.1 { (i, d) } else { best })
}

/// Mean over features of the per-feature variance
fn mean_variance(x: &[SparseVector], dim: usize) -> f64 {
    if dim == 0 {
        return 0.0;
    }
    let n = x.len() as f64;
    let mut mean = vec![0.0; dim];
    let mut mean_sq = vec![0.0; dim];
    for row in x {
        for (i, v) in row.iter() {
            mean[i] += v / n;
            mean_sq[i] += v * v / n;
        }
    }
    mean.iter()
        .zip(&mean_sq)
        .map(|(m, sq)| (sq - m * m).max(0.0))
        .sum::<f64>()
        / dim as f64
}
