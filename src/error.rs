use thiserror::Error;

/// Errors returned while configuring or running the clustering pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration is invalid (unknown algorithm, non-positive K or epsilon, ...).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Tensor dimensions do not match what the caller declared.
    #[error("shape mismatch for {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        /// Which dimension was checked.
        what: &'static str,
        /// Expected size.
        expected: usize,
        /// Found size.
        found: usize,
    },

    /// Requested cluster count is incompatible with the data being fit.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// A pixel has fewer valid splats than the fixed cluster count needs.
    #[error("pixel has {found} valid splats but {required} clusters were requested")]
    InsufficientSplats {
        /// Number of clusters requested.
        required: usize,
        /// Number of non-empty splats in the pixel.
        found: usize,
    },

    /// Reading a configuration file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid YAML for [`crate::clustering::Config`].
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
