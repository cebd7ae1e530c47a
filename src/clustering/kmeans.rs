use crate::clustering::combine::combine_splats;
use crate::clustering::lloyd::{self, LloydParams};
use crate::clustering::strategy::ClusteringStrategy;
use crate::core::{Cluster, Splat};
use crate::error::{Error, Result};
use log::debug;
use rand::rngs::SmallRng;
use std::str::FromStr;

/// What offline k-means does with a pixel that has fewer valid splats than clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsufficientSplatPolicy {
    /// Fit as many clusters as there are valid splats and pad with empty clusters.
    #[default]
    ReduceK,
    /// Fail the pixel, which aborts the whole image.
    Fail,
}

impl FromStr for InsufficientSplatPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ReduceK" => Ok(Self::ReduceK),
            "Fail" => Ok(Self::Fail),
            _ => Err(Error::Config(format!(
                "Unsupported insufficient splat policy: {}",
                s
            ))),
        }
    }
}

/// Offline k-means over the depths of a pixel's splats.
#[derive(Debug, Clone)]
pub struct KMeans {
    n_clusters: usize,
    params: LloydParams,
    policy: InsufficientSplatPolicy,
}

impl KMeans {
    pub fn new(n_clusters: usize) -> Result<Self> {
        if n_clusters == 0 {
            return Err(Error::Config("number_of_clusters must be greater than 0".to_string()));
        }
        Ok(Self {
            n_clusters,
            params: LloydParams::default(),
            policy: InsufficientSplatPolicy::default(),
        })
    }

    pub fn with_params(mut self, params: LloydParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_policy(mut self, policy: InsufficientSplatPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> InsufficientSplatPolicy {
        self.policy
    }
}

fn median(values: &mut [f32]) -> f32 {
    values.sort_by(f32::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

impl ClusteringStrategy for KMeans {
    fn pixel_cluster(&self, splats: &[Splat], rng: &mut SmallRng) -> Result<Vec<Cluster>> {
        let valid: Vec<Splat> = splats.iter().filter(|s| !s.is_empty()).copied().collect();
        if valid.is_empty() {
            return Ok(vec![Cluster::EMPTY; self.n_clusters]);
        }

        let k = if valid.len() < self.n_clusters {
            match self.policy {
                InsufficientSplatPolicy::Fail => {
                    return Err(Error::InsufficientSplats {
                        required: self.n_clusters,
                        found: valid.len(),
                    })
                }
                InsufficientSplatPolicy::ReduceK => {
                    debug!(
                        "Pixel has {} valid splats, reducing k from {}",
                        valid.len(),
                        self.n_clusters
                    );
                    valid.len()
                }
            }
        } else {
            self.n_clusters
        };

        let depths: Vec<f64> = valid.iter().map(|s| f64::from(s.depth)).collect();
        let fit = lloyd::fit(&depths, k, &self.params, rng)?;

        let mut groups: Vec<Vec<Splat>> = vec![Vec::new(); k];
        for (splat, &label) in valid.iter().zip(&fit.labels) {
            groups[label].push(*splat);
        }

        // (median depth, cluster); labels nobody took sort to the back.
        let mut keyed: Vec<(f32, Cluster)> = groups
            .iter()
            .map(|group| {
                if group.is_empty() {
                    return (f32::INFINITY, Cluster::EMPTY);
                }
                let mut group_depths: Vec<f32> = group.iter().map(|s| s.depth).collect();
                (median(&mut group_depths), combine_splats(group))
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut clusters: Vec<Cluster> = keyed.into_iter().map(|(_, cluster)| cluster).collect();
        clusters.resize(self.n_clusters, Cluster::EMPTY);
        Ok(clusters)
    }

    fn n_clusters(&self) -> Option<usize> {
        Some(self.n_clusters)
    }

    fn name(&self) -> &'static str {
        "KMeans"
    }

    fn is_degraded(&self, splats: &[Splat]) -> bool {
        let valid = splats.iter().filter(|s| !s.is_empty()).count();
        self.policy == InsufficientSplatPolicy::ReduceK && valid > 0 && valid < self.n_clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&mut [4.0, 1.0, 2.0, 3.0]), 2.5);
    }

    #[test]
    fn test_two_depth_layers() {
        let splats = [
            Splat::new(0.5, 10.0, [0.0, 0.0, 1.0]),
            Splat::new(0.5, 1.0, [1.0, 0.0, 0.0]),
            Splat::new(0.5, 10.2, [0.0, 0.0, 1.0]),
            Splat::new(0.5, 1.1, [1.0, 0.0, 0.0]),
            Splat::default(),
        ];
        let clusters = KMeans::new(2).unwrap().pixel_cluster(&splats, &mut rng()).unwrap();
        assert_eq!(clusters.len(), 2);
        assert!((clusters[0].alpha - 0.75).abs() < 1e-6);
        assert!((clusters[0].color[0] - 1.0).abs() < 1e-6);
        assert!((clusters[1].color[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_reduce_k_pads_with_empty_clusters() {
        let splats = [
            Splat::new(0.5, 3.0, [0.0, 1.0, 0.0]),
            Splat::new(0.5, 1.0, [1.0, 0.0, 0.0]),
        ];
        let clusters = KMeans::new(4).unwrap().pixel_cluster(&splats, &mut rng()).unwrap();
        assert_eq!(clusters.len(), 4);
        assert_eq!(clusters[0], Cluster::new(0.5, [1.0, 0.0, 0.0]));
        assert_eq!(clusters[1], Cluster::new(0.5, [0.0, 1.0, 0.0]));
        assert_eq!(&clusters[2..], &[Cluster::EMPTY, Cluster::EMPTY]);
    }

    #[test]
    fn test_reduced_pixels_are_degraded() {
        let kmeans = KMeans::new(3).unwrap();
        let sparse = [Splat::new(0.5, 1.0, [1.0; 3]), Splat::default()];
        let dense = [Splat::new(0.5, 1.0, [1.0; 3]); 3];
        assert!(kmeans.is_degraded(&sparse));
        assert!(!kmeans.is_degraded(&dense));
        assert!(!kmeans.is_degraded(&[Splat::default(); 4]));
        assert!(!kmeans
            .with_policy(InsufficientSplatPolicy::Fail)
            .is_degraded(&sparse));
    }

    #[test]
    fn test_fail_policy_reports_insufficient_splats() {
        let splats = [Splat::new(0.5, 3.0, [0.0, 1.0, 0.0])];
        let result = KMeans::new(2)
            .unwrap()
            .with_policy(InsufficientSplatPolicy::Fail)
            .pixel_cluster(&splats, &mut rng());
        assert!(matches!(
            result,
            Err(Error::InsufficientSplats { required: 2, found: 1 })
        ));
    }

    #[test]
    fn test_transparent_pixel() {
        let clusters = KMeans::new(3)
            .unwrap()
            .with_policy(InsufficientSplatPolicy::Fail)
            .pixel_cluster(&[Splat::default(); 4], &mut rng())
            .unwrap();
        assert_eq!(clusters, vec![Cluster::EMPTY; 3]);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Fail".parse::<InsufficientSplatPolicy>().unwrap(), InsufficientSplatPolicy::Fail);
        assert!("Skip".parse::<InsufficientSplatPolicy>().is_err());
    }
}
