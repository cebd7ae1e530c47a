use crate::clustering::strategy::ClusteringStrategy;
use crate::core::{Cluster, Splat};
use crate::error::{Error, Result};
use rand::rngs::SmallRng;

/// Online sufficient statistics of one cluster.
///
/// Updated in O(1) per splat and turned into a [`Cluster`] once the pixel is done.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accumulator {
    pub mean_depth: f64,
    pub count: usize,
    pub alpha_sum: f64,
    pub transmittance: f64,
    pub premultiplied_color: [f64; 3],
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            mean_depth: 0.0,
            count: 0,
            alpha_sum: 0.0,
            transmittance: 1.0,
            premultiplied_color: [0.0; 3],
        }
    }
}

impl Accumulator {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Folds one splat in. Empty splats are ignored.
    pub fn add(&mut self, splat: &Splat) {
        if splat.is_empty() {
            return;
        }
        let alpha = f64::from(splat.alpha);
        self.count += 1;
        self.alpha_sum += alpha;
        self.transmittance *= 1.0 - alpha;
        for (acc, &channel) in self.premultiplied_color.iter_mut().zip(&splat.color) {
            *acc += alpha * f64::from(channel);
        }
        self.mean_depth += (f64::from(splat.depth) - self.mean_depth) / self.count as f64;
    }

    pub fn finalize(&self) -> Cluster {
        let color = if self.alpha_sum > 0.0 {
            self.premultiplied_color.map(|c| (c / self.alpha_sum) as f32)
        } else {
            [0.0; 3]
        };
        Cluster::new((1.0 - self.transmittance) as f32, color)
    }
}

/// Index of the accumulator whose mean depth is closest to `depth`, lowest index on ties.
pub(crate) fn nearest_accumulator(accumulators: &[Accumulator], depth: f32) -> usize {
    let depth = f64::from(depth);
    accumulators
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best_idx, best_dist), (idx, acc)| {
            let dist = (acc.mean_depth - depth).abs();
            if dist < best_dist {
                (idx, dist)
            } else {
                (best_idx, best_dist)
            }
        })
        .0
}

/// Finalizes accumulators and orders them by ascending mean depth.
pub(crate) fn finalize_sorted(mut accumulators: Vec<Accumulator>) -> Vec<Cluster> {
    accumulators.sort_by(|a, b| a.mean_depth.total_cmp(&b.mean_depth));
    accumulators.iter().map(Accumulator::finalize).collect()
}

/// Sequential (online) k-means seeded by the first splats that arrive.
///
/// Until every accumulator has been seeded, a splat joins the first accumulator whose
/// mean equals its depth exactly, or else the first empty one. After that each splat
/// joins the accumulator with the nearest running mean.
#[derive(Debug, Clone)]
pub struct SequentialKMeans {
    n_clusters: usize,
}

impl SequentialKMeans {
    pub fn new(n_clusters: usize) -> Result<Self> {
        if n_clusters == 0 {
            return Err(Error::Config("number_of_clusters must be greater than 0".to_string()));
        }
        Ok(Self { n_clusters })
    }

    /// Runs the two-phase assignment and returns the raw accumulators.
    pub fn accumulate(&self, splats: &[Splat]) -> Vec<Accumulator> {
        let mut accumulators = vec![Accumulator::default(); self.n_clusters];
        let mut initial_guesses_found = false;

        for splat in splats.iter().filter(|s| !s.is_empty()) {
            let mut target = nearest_accumulator(&accumulators, splat.depth);

            if !initial_guesses_found {
                for (idx, acc) in accumulators.iter().enumerate() {
                    if idx == self.n_clusters - 1 {
                        initial_guesses_found = true;
                    }
                    if acc.mean_depth == f64::from(splat.depth) || acc.is_empty() {
                        target = idx;
                        break;
                    }
                }
            }

            accumulators[target].add(splat);
        }
        accumulators
    }
}

impl ClusteringStrategy for SequentialKMeans {
    fn pixel_cluster(&self, splats: &[Splat], _rng: &mut SmallRng) -> Result<Vec<Cluster>> {
        Ok(finalize_sorted(self.accumulate(splats)))
    }

    fn n_clusters(&self) -> Option<usize> {
        Some(self.n_clusters)
    }

    fn name(&self) -> &'static str {
        "SequentialKMeans"
    }
}
