//! One-dimensional k-means (Lloyd's algorithm) with k-means++ seeding and restarts.

use crate::error::{Error, Result};
use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Hyper-parameters of a k-means fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LloydParams {
    /// Number of independently seeded runs; the one with the lowest inertia is kept.
    pub n_init: usize,
    /// Maximum number of assign/update iterations per run.
    pub max_iter: usize,
    /// Convergence threshold on the squared centroid shift, relative to the data variance.
    pub tolerance: f64,
}

impl Default for LloydParams {
    fn default() -> Self {
        Self {
            n_init: 10,
            max_iter: 300,
            tolerance: 1e-4,
        }
    }
}

/// Result of a k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    pub centroids: Vec<f64>,
    /// Index into `centroids` for every input point.
    pub labels: Vec<usize>,
    /// Sum of squared distances of points to their centroid.
    pub inertia: f64,
    pub n_iter: usize,
}

/// Fits `k` centroids to `points`.
///
/// A centroid that loses all of its points keeps its previous position instead of being
/// relocated to a far away point, so a run can finish with fewer than `k` labels in use.
/// Callers treat such labels as empty clusters.
///
/// Errors when `k` is zero or larger than the number of points.
pub fn fit<R: Rng + ?Sized>(
    points: &[f64],
    k: usize,
    params: &LloydParams,
    rng: &mut R,
) -> Result<KMeansFit> {
    if k == 0 || k > points.len() {
        return Err(Error::InvalidClusterCount {
            requested: k,
            n_items: points.len(),
        });
    }

    let threshold = params.tolerance * variance(points);
    (0..params.n_init.max(1))
        .map(|run| {
            let seeds = init_kmeans_plus_plus(points, k, rng);
            let fit = run_lloyd(points, seeds, params.max_iter, threshold);
            debug!(
                "k-means run {} converged after {} iterations, inertia {}",
                run, fit.n_iter, fit.inertia
            );
            fit
        })
        .min_by(|a, b| a.inertia.total_cmp(&b.inertia))
        .ok_or(Error::InvalidClusterCount {
            requested: k,
            n_items: points.len(),
        })
}

fn variance(points: &[f64]) -> f64 {
    let n = points.len() as f64;
    let mean = points.iter().sum::<f64>() / n;
    points.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n
}

/// Nearest centroid and squared distance to it. Ties go to the lowest index.
fn nearest(centroids: &[f64], point: f64) -> (usize, f64) {
    centroids
        .iter()
        .enumerate()
        .map(|(idx, &c)| (idx, (point - c).powi(2)))
        .fold((0, f64::INFINITY), |(min_idx, min_dist), (idx, dist)| {
            if dist < min_dist {
                (idx, dist)
            } else {
                (min_idx, min_dist)
            }
        })
}

/// Picks `k` seeds: the first uniformly, the rest with probability proportional to
/// the squared distance to the closest seed chosen so far.
fn init_kmeans_plus_plus<R: Rng + ?Sized>(points: &[f64], k: usize, rng: &mut R) -> Vec<f64> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..points.len())]);

    let indices: Vec<usize> = (0..points.len()).collect();
    while centroids.len() < k {
        let weights: Vec<f64> = points.iter().map(|&p| nearest(&centroids, p).1).collect();
        let chosen = match indices.choose_weighted(rng, |&idx| weights[idx]) {
            Ok(&idx) => idx,
            Err(e) => {
                // Every point already sits on a seed (duplicate depths).
                debug!("Weighted seed selection failed: {:?}", e);
                rng.random_range(0..points.len())
            }
        };
        centroids.push(points[chosen]);
    }
    centroids
}

fn run_lloyd(points: &[f64], mut centroids: Vec<f64>, max_iter: usize, threshold: f64) -> KMeansFit {
    let k = centroids.len();
    let mut labels = vec![0usize; points.len()];
    let mut n_iter = 0;

    for _ in 0..max_iter {
        n_iter += 1;
        for (label, &point) in labels.iter_mut().zip(points) {
            *label = nearest(&centroids, point).0;
        }

        let mut sums = vec![0.0f64; k];
        let mut counts = vec![0usize; k];
        for (&label, &point) in labels.iter().zip(points) {
            sums[label] += point;
            counts[label] += 1;
        }

        // Empty clusters keep their previous centroid.
        let mut shift = 0.0;
        for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
            if count > 0 {
                let updated = sum / count as f64;
                shift += (updated - *centroid).powi(2);
                *centroid = updated;
            }
        }
        if shift <= threshold {
            break;
        }
    }

    let mut inertia = 0.0;
    for (label, &point) in labels.iter_mut().zip(points) {
        let (idx, dist) = nearest(&centroids, point);
        *label = idx;
        inertia += dist;
    }

    KMeansFit {
        centroids,
        labels,
        inertia,
        n_iter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_separates_two_groups() {
        let points = [1.0, 1.1, 0.9, 10.0, 10.2, 9.8];
        let mut rng = SmallRng::seed_from_u64(42);
        let fit = fit(&points, 2, &LloydParams::default(), &mut rng).unwrap();

        assert_eq!(fit.labels[0], fit.labels[1]);
        assert_eq!(fit.labels[0], fit.labels[2]);
        assert_eq!(fit.labels[3], fit.labels[4]);
        assert_ne!(fit.labels[0], fit.labels[3]);

        let mut centroids = fit.centroids.clone();
        centroids.sort_by(f64::total_cmp);
        assert!((centroids[0] - 1.0).abs() < 1e-9);
        assert!((centroids[1] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_one_cluster_per_point() {
        let points = [3.0, 1.0, 2.0];
        let mut rng = SmallRng::seed_from_u64(7);
        let fit = fit(&points, 3, &LloydParams::default(), &mut rng).unwrap();
        assert_eq!(fit.inertia, 0.0);
        let mut labels = fit.labels.clone();
        labels.sort_unstable();
        assert_eq!(labels, vec![0, 1, 2]);
    }

    #[test]
    fn test_duplicate_points_do_not_panic() {
        let points = [4.0, 4.0, 4.0, 4.0];
        let mut rng = SmallRng::seed_from_u64(1);
        let fit = fit(&points, 2, &LloydParams::default(), &mut rng).unwrap();
        assert_eq!(fit.labels.len(), 4);
        assert_eq!(fit.inertia, 0.0);
    }

    #[test]
    fn test_rejects_too_many_clusters() {
        let mut rng = SmallRng::seed_from_u64(0);
        let result = fit(&[1.0, 2.0], 3, &LloydParams::default(), &mut rng);
        assert!(matches!(
            result,
            Err(Error::InvalidClusterCount { requested: 3, n_items: 2 })
        ));
    }

    #[test]
    fn test_rejects_zero_clusters() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(fit(&[1.0], 0, &LloydParams::default(), &mut rng).is_err());
    }
}
