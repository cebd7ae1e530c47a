use crate::clustering::combine::commutative_combine;
use crate::clustering::strategy::ClusteringStrategy;
use crate::core::{Cluster, Splat, SplatTensor};
use crate::error::{Error, Result};
use log::info;
use rand::rngs::SmallRng;

/// Fixed-width depth binning with bin edges shared by the whole image.
#[derive(Debug, Clone)]
pub struct Binned {
    n_clusters: usize,
    depth_range: Option<(f32, f32)>,
}

impl Binned {
    /// Bins spanning `[min_depth, max_depth]`.
    pub fn new(n_clusters: usize, min_depth: f32, max_depth: f32) -> Result<Self> {
        if n_clusters == 0 {
            return Err(Error::Config("number_of_clusters must be greater than 0".to_string()));
        }
        if !(min_depth.is_finite() && max_depth.is_finite()) || max_depth < min_depth {
            return Err(Error::Config(format!(
                "invalid depth range [{}, {}]",
                min_depth, max_depth
            )));
        }
        Ok(Self {
            n_clusters,
            depth_range: Some((min_depth, max_depth)),
        })
    }

    /// Bins spanning the strictly positive depths of the whole tensor.
    pub fn from_tensor(tensor: &SplatTensor, n_clusters: usize) -> Result<Self> {
        match tensor.depth_range() {
            Some((min_depth, max_depth)) => {
                info!("Min depth: {}, Max depth: {}", min_depth, max_depth);
                info!(
                    "Each bin will be {} units wide.",
                    (max_depth - min_depth) / n_clusters.max(1) as f32
                );
                Self::new(n_clusters, min_depth, max_depth)
            }
            None => {
                if n_clusters == 0 {
                    return Err(Error::Config(
                        "number_of_clusters must be greater than 0".to_string(),
                    ));
                }
                info!("No positive depth in tensor, every pixel will be empty");
                Ok(Self {
                    n_clusters,
                    depth_range: None,
                })
            }
        }
    }

    pub fn depth_range(&self) -> Option<(f32, f32)> {
        self.depth_range
    }

    /// Bin of a splat depth, clamped into `[0, K - 1]`.
    pub fn bin_index(&self, depth: f32) -> usize {
        let Some((min_depth, max_depth)) = self.depth_range else {
            return 0;
        };
        let span = max_depth - min_depth;
        if span <= 0.0 {
            return 0;
        }
        let last = self.n_clusters - 1;
        let position = (depth - min_depth) / span * last as f32;
        (position.floor().max(0.0) as usize).min(last)
    }
}

impl ClusteringStrategy for Binned {
    fn pixel_cluster(&self, splats: &[Splat], _rng: &mut SmallRng) -> Result<Vec<Cluster>> {
        let mut bins: Vec<Vec<Splat>> = vec![Vec::new(); self.n_clusters];
        for splat in splats.iter().filter(|splat| !splat.is_empty()) {
            bins[self.bin_index(splat.depth)].push(*splat);
        }
        Ok(commutative_combine(&bins))
    }

    fn n_clusters(&self) -> Option<usize> {
        Some(self.n_clusters)
    }

    fn name(&self) -> &'static str {
        "Binned"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0)
    }

    #[test]
    fn test_bin_index_uses_k_minus_one_scale() {
        let binned = Binned::new(4, 0.0, 10.0).unwrap();
        assert_eq!(binned.bin_index(0.0), 0);
        assert_eq!(binned.bin_index(3.4), 1);
        assert_eq!(binned.bin_index(6.7), 2);
        assert_eq!(binned.bin_index(10.0), 3);
    }

    #[test]
    fn test_bin_index_is_clamped() {
        let binned = Binned::new(3, 1.0, 2.0).unwrap();
        assert_eq!(binned.bin_index(0.5), 0);
        assert_eq!(binned.bin_index(50.0), 2);
    }

    #[test]
    fn test_zero_width_range_uses_first_bin() {
        let binned = Binned::new(3, 5.0, 5.0).unwrap();
        assert_eq!(binned.bin_index(5.0), 0);
    }

    #[test]
    fn test_single_splat_lands_in_first_bin() {
        let binned = Binned::new(2, 0.0, 10.0).unwrap();
        let clusters = binned
            .pixel_cluster(&[Splat::new(1.0, 5.0, [1.0, 1.0, 1.0])], &mut rng())
            .unwrap();
        assert_eq!(clusters, vec![Cluster::new(1.0, [1.0, 1.0, 1.0]), Cluster::EMPTY]);
    }

    #[test]
    fn test_empty_pixel_gives_k_empty_clusters() {
        let binned = Binned::new(3, 1.0, 4.0).unwrap();
        let clusters = binned.pixel_cluster(&[Splat::default(); 5], &mut rng()).unwrap();
        assert_eq!(clusters, vec![Cluster::EMPTY; 3]);
    }

    #[test]
    fn test_rejects_zero_clusters() {
        assert!(Binned::new(0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_from_tensor_without_depths() {
        let tensor = SplatTensor::from_pixels(1, 1, &[vec![Splat::default()]]).unwrap();
        let binned = Binned::from_tensor(&tensor, 2).unwrap();
        assert_eq!(binned.depth_range(), None);
        let clusters = binned.pixel_cluster(&tensor.pixel_splats(0), &mut rng()).unwrap();
        assert_eq!(clusters, vec![Cluster::EMPTY; 2]);
    }
}
