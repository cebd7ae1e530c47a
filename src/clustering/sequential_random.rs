use crate::clustering::sequential::{finalize_sorted, nearest_accumulator, Accumulator};
use crate::clustering::strategy::ClusteringStrategy;
use crate::core::{Cluster, Splat};
use crate::error::{Error, Result};
use rand::rngs::SmallRng;
use rand::Rng;
use std::collections::HashSet;

/// Sequential k-means whose accumulators are seeded with randomly drawn splats.
///
/// Seeds are drawn from every row of the pixel, padding included; a seed that lands on
/// an empty splat leaves its accumulator empty.
#[derive(Debug, Clone)]
pub struct SequentialKMeansRandomInit {
    n_clusters: usize,
}

impl SequentialKMeansRandomInit {
    pub fn new(n_clusters: usize) -> Result<Self> {
        if n_clusters == 0 {
            return Err(Error::Config("number_of_clusters must be greater than 0".to_string()));
        }
        Ok(Self { n_clusters })
    }

    /// Draws up to `n_clusters` distinct row indices, resampling repeats.
    fn draw_seeds(&self, n_splats: usize, rng: &mut SmallRng) -> Vec<usize> {
        let n_seeds = self.n_clusters.min(n_splats);
        let mut used = HashSet::with_capacity(n_seeds);
        let mut seeds = Vec::with_capacity(n_seeds);
        while seeds.len() < n_seeds {
            let idx = rng.random_range(0..n_splats);
            if used.insert(idx) {
                seeds.push(idx);
            }
        }
        seeds
    }

    /// Seeds the accumulators, then assigns every other splat to the nearest mean.
    pub fn accumulate(&self, splats: &[Splat], rng: &mut SmallRng) -> Vec<Accumulator> {
        let mut accumulators = vec![Accumulator::default(); self.n_clusters];
        let seeds = self.draw_seeds(splats.len(), rng);
        for (acc, &splat_idx) in accumulators.iter_mut().zip(&seeds) {
            acc.add(&splats[splat_idx]);
        }

        let seeded: HashSet<usize> = seeds.into_iter().collect();
        for (idx, splat) in splats.iter().enumerate() {
            if seeded.contains(&idx) || splat.is_empty() {
                continue;
            }
            let target = nearest_accumulator(&accumulators, splat.depth);
            accumulators[target].add(splat);
        }
        accumulators
    }
}

impl ClusteringStrategy for SequentialKMeansRandomInit {
    fn pixel_cluster(&self, splats: &[Splat], rng: &mut SmallRng) -> Result<Vec<Cluster>> {
        Ok(finalize_sorted(self.accumulate(splats, rng)))
    }

    fn n_clusters(&self) -> Option<usize> {
        Some(self.n_clusters)
    }

    fn name(&self) -> &'static str {
        "SequentialKMeansRandomInit"
    }
}
