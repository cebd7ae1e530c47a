use crate::core::{Cluster, Splat};
use crate::error::Result;
use rand::rngs::SmallRng;

/// Common interface for the per-pixel clustering strategies.
pub trait ClusteringStrategy: Send + Sync {
    /// Clusters the splats of a single pixel into depth-ordered clusters.
    ///
    /// `splats` may contain empty (padding) splats, which must be ignored. `rng` is owned
    /// by this pixel's task; strategies that are not randomized leave it untouched.
    fn pixel_cluster(&self, splats: &[Splat], rng: &mut SmallRng) -> Result<Vec<Cluster>>;

    /// The fixed number of clusters produced per pixel, or `None` if it varies.
    fn n_clusters(&self) -> Option<usize>;

    fn name(&self) -> &'static str;

    /// Whether this pixel is clustered with reduced quality, e.g. fewer clusters fit than
    /// requested. The harness reports the total once per image.
    fn is_degraded(&self, _splats: &[Splat]) -> bool {
        false
    }
}
