pub mod cluster;
pub(crate) mod rng;
pub mod splat;

pub use cluster::{Cluster, ClusteredImage, CLUSTER_FIELDS};
pub use splat::{Splat, SplatTensor, SPLAT_FIELDS};
