use crate::clustering::combine::combine_splats;
use crate::clustering::strategy::ClusteringStrategy;
use crate::core::{Cluster, Splat};
use crate::error::{Error, Result};
use rand::rngs::SmallRng;

/// Greedy single-pass merging of splats whose depth is within `epsilon` of a cluster key.
///
/// The key of a cluster is the depth of the splat that founded it and is never moved
/// towards the members' mean. Merging therefore depends on arrival order, which the
/// harness randomizes.
#[derive(Debug, Clone)]
pub struct Epsilon {
    epsilon: f32,
}

/// A cluster keyed by its founding depth.
struct KeyedCluster {
    key: f32,
    members: Vec<Splat>,
}

impl Epsilon {
    pub fn new(epsilon: f32) -> Result<Self> {
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(Error::Config(format!(
                "epsilon must be a positive finite number, got {}",
                epsilon
            )));
        }
        Ok(Self { epsilon })
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Index of the key closest to `depth`; the earliest founded cluster wins ties.
    fn closest_cluster(clusters: &[KeyedCluster], depth: f32) -> Option<(usize, f32)> {
        clusters
            .iter()
            .enumerate()
            .map(|(idx, cluster)| (idx, (cluster.key - depth).abs()))
            .fold(None, |best, (idx, distance)| match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((idx, distance)),
            })
    }
}

impl ClusteringStrategy for Epsilon {
    fn pixel_cluster(&self, splats: &[Splat], _rng: &mut SmallRng) -> Result<Vec<Cluster>> {
        let mut clusters: Vec<KeyedCluster> = Vec::new();

        for splat in splats.iter().filter(|splat| !splat.is_empty()) {
            match Self::closest_cluster(&clusters, splat.depth) {
                Some((idx, distance)) if distance <= self.epsilon => {
                    clusters[idx].members.push(*splat);
                }
                _ => clusters.push(KeyedCluster {
                    key: splat.depth,
                    members: vec![*splat],
                }),
            }
        }

        clusters.sort_by(|a, b| a.key.total_cmp(&b.key));
        Ok(clusters
            .iter()
            .map(|cluster| combine_splats(&cluster.members))
            .collect())
    }

    fn n_clusters(&self) -> Option<usize> {
        None
    }

    fn name(&self) -> &'static str {
        "Epsilon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn cluster(epsilon: f32, splats: &[Splat]) -> Vec<Cluster> {
        Epsilon::new(epsilon)
            .unwrap()
            .pixel_cluster(splats, &mut SmallRng::seed_from_u64(0))
            .unwrap()
    }

    #[test]
    fn test_close_splats_merge() {
        let clusters = cluster(
            0.2,
            &[
                Splat::new(0.5, 1.0, [1.0, 0.0, 0.0]),
                Splat::new(0.5, 1.05, [0.0, 1.0, 0.0]),
                Splat::new(1.0, 10.0, [0.0, 0.0, 1.0]),
            ],
        );
        assert_eq!(clusters.len(), 2);
        assert!((clusters[0].alpha - 0.75).abs() < 1e-6);
        assert_eq!(clusters[1], Cluster::new(1.0, [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_key_does_not_follow_members() {
        // 1.0 founds the cluster, 1.15 joins it; 1.3 is 0.3 from the key and founds its own.
        let clusters = cluster(
            0.2,
            &[
                Splat::new(0.5, 1.0, [1.0, 0.0, 0.0]),
                Splat::new(0.5, 1.15, [1.0, 0.0, 0.0]),
                Splat::new(0.5, 1.3, [0.0, 1.0, 0.0]),
            ],
        );
        assert_eq!(clusters.len(), 2);
        assert!((clusters[0].alpha - 0.75).abs() < 1e-6);
        assert_eq!(clusters[1], Cluster::new(0.5, [0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_output_sorted_by_founding_depth() {
        let clusters = cluster(
            0.1,
            &[
                Splat::new(0.5, 9.0, [0.0, 0.0, 1.0]),
                Splat::new(0.5, 1.0, [1.0, 0.0, 0.0]),
                Splat::new(0.5, 5.0, [0.0, 1.0, 0.0]),
            ],
        );
        let reds: Vec<f32> = clusters.iter().map(|c| c.color[0]).collect();
        let blues: Vec<f32> = clusters.iter().map(|c| c.color[2]).collect();
        assert_eq!(reds, vec![1.0, 0.0, 0.0]);
        assert_eq!(blues, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_boundary_distance_merges() {
        let clusters = cluster(
            0.5,
            &[
                Splat::new(0.5, 2.0, [1.0, 1.0, 1.0]),
                Splat::new(0.5, 2.5, [1.0, 1.0, 1.0]),
            ],
        );
        assert_eq!(clusters.len(), 1);
    }

    #[test]
    fn test_skips_transparent_splats() {
        let clusters = cluster(
            0.1,
            &[Splat::new(0.0, 1.0, [1.0, 1.0, 1.0]), Splat::default()],
        );
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_rejects_non_positive_epsilon() {
        assert!(Epsilon::new(0.0).is_err());
        assert!(Epsilon::new(-1.0).is_err());
        assert!(Epsilon::new(f32::NAN).is_err());
    }
}
