use crate::clustering::{ClusteringStrategy, Config};
use crate::core::rng::{pixel_rng, CLUSTER_STAGE};
use crate::core::{Cluster, ClusteredImage, SplatTensor};
use crate::error::Result;
use log::{info, warn};
use rayon::prelude::*;

/// Runs one clustering strategy over every pixel of a splat tensor.
pub struct ClusteringHarness {
    tensor: SplatTensor,
    strategy: Box<dyn ClusteringStrategy>,
    rng_seed: Option<u64>,
    degraded_pixels: usize,
}

impl ClusteringHarness {
    pub fn new(tensor: SplatTensor, strategy: Box<dyn ClusteringStrategy>) -> Self {
        Self {
            tensor,
            strategy,
            rng_seed: None,
            degraded_pixels: 0,
        }
    }

    /// Makes shuffling and per-pixel randomness reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Validates `config` and builds its strategy before any pixel is touched.
    pub fn from_config(tensor: SplatTensor, config: &Config) -> Result<Self> {
        info!("Building clustering harness with configuration: {}", config);
        let strategy = config.build_strategy(&tensor)?;
        Ok(Self {
            tensor,
            strategy,
            rng_seed: config.rng_seed,
            degraded_pixels: 0,
        })
    }

    pub fn tensor(&self) -> &SplatTensor {
        &self.tensor
    }

    pub fn strategy(&self) -> &dyn ClusteringStrategy {
        self.strategy.as_ref()
    }

    /// Pixels the strategy flagged as degraded during the last [`Self::compute`].
    pub fn degraded_pixels(&self) -> usize {
        self.degraded_pixels
    }

    /// Shuffles the splats of every pixel, then clusters all pixels in parallel.
    ///
    /// Output pixel `i` always corresponds to input pixel `i`. The first pixel error
    /// aborts the call and no partial result is returned.
    pub fn compute(&mut self) -> Result<ClusteredImage> {
        info!("Shuffling splats...");
        self.tensor.shuffle(self.rng_seed);

        info!(
            "Clustering {} pixels with {}...",
            self.tensor.num_pixels(),
            self.strategy.name()
        );
        let tensor = &self.tensor;
        let strategy = self.strategy.as_ref();
        let seed = self.rng_seed;
        let results = (0..tensor.num_pixels())
            .into_par_iter()
            .map(|index| -> Result<(Vec<Cluster>, bool)> {
                let mut rng = pixel_rng(seed, index, CLUSTER_STAGE);
                let splats = tensor.pixel_splats(index);
                let clusters = strategy.pixel_cluster(&splats, &mut rng)?;
                Ok((clusters, strategy.is_degraded(&splats)))
            })
            .collect::<Result<Vec<_>>>()?;

        let (pixels, degraded): (Vec<_>, Vec<bool>) = results.into_iter().unzip();
        self.degraded_pixels = degraded.into_iter().filter(|&d| d).count();
        if self.degraded_pixels > 0 {
            warn!(
                "{} of {} pixels had fewer valid splats than clusters and were fit with reduced k",
                self.degraded_pixels,
                pixels.len()
            );
        }

        Ok(ClusteredImage::new(
            self.tensor.height(),
            self.tensor.width(),
            pixels,
        ))
    }
}
