use crate::core::{Cluster, Splat};

/// Order-independent reduction of one cluster's splats.
///
/// `alpha = 1 - Π(1 - a_i)` and `color = Σ a_i c_i / Σ a_i`. A cluster with no alpha
/// mass resolves to [`Cluster::EMPTY`]. Accumulates in `f64`.
pub fn combine_splats(splats: &[Splat]) -> Cluster {
    if splats.is_empty() {
        return Cluster::EMPTY;
    }

    let mut transmittance = 1.0f64;
    let mut alpha_sum = 0.0f64;
    let mut weighted = [0.0f64; 3];
    for splat in splats {
        let alpha = f64::from(splat.alpha);
        transmittance *= 1.0 - alpha;
        alpha_sum += alpha;
        for (acc, &channel) in weighted.iter_mut().zip(&splat.color) {
            *acc += alpha * f64::from(channel);
        }
    }

    let color = if alpha_sum > 0.0 {
        weighted.map(|sum| (sum / alpha_sum) as f32)
    } else {
        [0.0; 3]
    };
    Cluster::new((1.0 - transmittance) as f32, color)
}

/// Combines every cluster's splat list, keeping cluster order.
pub fn commutative_combine(splat_clusters: &[Vec<Splat>]) -> Vec<Cluster> {
    splat_clusters
        .iter()
        .map(|splats| combine_splats(splats))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_two_half_alpha_splats() {
        let cluster = combine_splats(&[
            Splat::new(0.5, 1.0, [1.0, 0.0, 0.0]),
            Splat::new(0.5, 1.05, [0.0, 1.0, 0.0]),
        ]);
        assert!((cluster.alpha - 0.75).abs() < 1e-6);
        assert!((cluster.color[0] - 0.5).abs() < 1e-6);
        assert!((cluster.color[1] - 0.5).abs() < 1e-6);
        assert_eq!(cluster.color[2], 0.0);
    }

    #[test]
    fn test_empty_input_is_transparent() {
        assert_eq!(combine_splats(&[]), Cluster::EMPTY);
    }

    #[test]
    fn test_zero_alpha_mass_has_zero_color() {
        let cluster = combine_splats(&[Splat::new(0.0, 3.0, [1.0, 1.0, 1.0])]);
        assert_eq!(cluster, Cluster::EMPTY);
    }

    #[test]
    fn test_commutative_combine_keeps_cluster_order() {
        let clusters = commutative_combine(&[
            vec![],
            vec![Splat::new(1.0, 2.0, [0.0, 0.0, 1.0])],
        ]);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0], Cluster::EMPTY);
        assert_eq!(clusters[1], Cluster::new(1.0, [0.0, 0.0, 1.0]));
    }
}
