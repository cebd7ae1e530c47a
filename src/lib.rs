//! splat_cluster: per-pixel depth clustering of Gaussian splats
//!
//! A Gaussian-splatting renderer leaves every pixel with a variable number of
//! translucent, depth-tagged splats. This library reduces each pixel to a few
//! depth-ordered clusters that can be alpha-composited afterwards, and makes it
//! easy to compare different clustering strategies on the same data.
//!
//! # Modules
//! - `core`: splats, the splat tensor and clustered output.
//! - `clustering`: the combination function, the five strategies and configuration.
//! - `harness`: shuffling and the parallel per-pixel fan-out.
//! - `compositor`: front-to-back compositing of clustered pixels.

pub mod clustering;
pub mod compositor;
pub mod core;
pub mod error;
pub mod harness;
pub mod synthetic;
pub mod visualization;

pub use crate::clustering::{
    Algorithm, Binned, ClusteringStrategy, Config, Epsilon, InsufficientSplatPolicy, KMeans,
    SequentialKMeans, SequentialKMeansRandomInit,
};
pub use crate::core::{Cluster, ClusteredImage, Splat, SplatTensor};
pub use crate::error::{Error, Result};
pub use crate::harness::ClusteringHarness;
