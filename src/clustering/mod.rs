pub mod binned;
pub mod combine;
pub mod config;
pub mod epsilon;
pub mod kmeans;
pub mod lloyd;
pub mod sequential;
pub mod sequential_random;
pub mod strategy;

pub use binned::Binned;
pub use combine::{combine_splats, commutative_combine};
pub use config::{Algorithm, Config};
pub use epsilon::Epsilon;
pub use kmeans::{InsufficientSplatPolicy, KMeans};
pub use lloyd::{KMeansFit, LloydParams};
pub use sequential::{Accumulator, SequentialKMeans};
pub use sequential_random::SequentialKMeansRandomInit;
pub use strategy::ClusteringStrategy;
