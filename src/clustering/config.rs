use crate::clustering::{
    Binned, ClusteringStrategy, Epsilon, InsufficientSplatPolicy, KMeans, LloydParams,
    SequentialKMeans, SequentialKMeansRandomInit,
};
use crate::core::SplatTensor;
use crate::error::{Error, Result};
use log::{error, LevelFilter};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The closed set of per-pixel clustering algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Binned,
    Epsilon,
    KMeans,
    SequentialKMeans,
    SequentialKMeansRandomInit,
}

impl Algorithm {
    /// Whether the algorithm produces a fixed number of clusters per pixel.
    pub fn uses_cluster_count(&self) -> bool {
        !matches!(self, Algorithm::Epsilon)
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Binned" => Ok(Algorithm::Binned),
            "Epsilon" => Ok(Algorithm::Epsilon),
            "KMeans" => Ok(Algorithm::KMeans),
            "SequentialKMeans" => Ok(Algorithm::SequentialKMeans),
            "SequentialKMeansRandomInit" => Ok(Algorithm::SequentialKMeansRandomInit),
            _ => Err(Error::Config(format!("Unsupported algorithm: {}", s))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AlgorithmConfig {
    pub name: String, // E.g., "SequentialKMeans"
    pub number_of_clusters: Option<usize>,
    pub epsilon: Option<f32>,
    pub n_init: Option<usize>,
    pub insufficient_splats: Option<String>, // "ReduceK" or "Fail"
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String, // Log level, e.g., "info", "debug", "warn", "error"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub algorithm: AlgorithmConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub rng_seed: Option<u64>, // Fixes shuffling and per-pixel randomness when set
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Algorithm: {}", self.algorithm.name)?;
        if let Some(k) = self.algorithm.number_of_clusters {
            writeln!(f, "    Number of Clusters: {}", k)?;
        }
        if let Some(epsilon) = self.algorithm.epsilon {
            writeln!(f, "    Epsilon: {}", epsilon)?;
        }
        if let Some(n_init) = self.algorithm.n_init {
            writeln!(f, "    K-Means Restarts: {}", n_init)?;
        }
        if let Some(policy) = &self.algorithm.insufficient_splats {
            writeln!(f, "    Insufficient Splats: {}", policy)?;
        }
        writeln!(f, "  Logging:")?;
        writeln!(f, "    Level: {}", self.logging.level)?;
        match self.rng_seed {
            Some(seed) => writeln!(f, "  RNG Seed: {}", seed)?,
            None => writeln!(f, "  RNG Seed: None")?,
        }
        Ok(())
    }
}

impl Config {
    /// Reads the YAML configuration file and returns a validated `Config`.
    pub fn from_file<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let file_content = std::fs::read_to_string(file_path)?;
        Self::from_yaml_str(&file_content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let algorithm = self.algorithm()?;

        if algorithm.uses_cluster_count() {
            match self.algorithm.number_of_clusters {
                Some(k) if k > 0 => (),
                Some(_) => {
                    return Err(Error::Config(
                        "number_of_clusters must be greater than 0".to_string(),
                    ))
                }
                None => {
                    return Err(Error::Config(format!(
                        "number_of_clusters is required for {}",
                        self.algorithm.name
                    )))
                }
            }
        }

        if algorithm == Algorithm::Epsilon {
            match self.algorithm.epsilon {
                Some(epsilon) if epsilon.is_finite() && epsilon > 0.0 => (),
                Some(epsilon) => {
                    return Err(Error::Config(format!(
                        "epsilon must be greater than 0, got {}",
                        epsilon
                    )))
                }
                None => return Err(Error::Config("epsilon is required for Epsilon".to_string())),
            }
        }

        if self.algorithm.n_init == Some(0) {
            return Err(Error::Config("n_init must be greater than 0".to_string()));
        }
        self.insufficient_splat_policy()?;

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => (),
            _ => {
                return Err(Error::Config(format!(
                    "Unsupported log level: {}",
                    self.logging.level
                )))
            }
        }

        Ok(())
    }

    pub fn algorithm(&self) -> Result<Algorithm> {
        self.algorithm.name.parse()
    }

    pub fn insufficient_splat_policy(&self) -> Result<InsufficientSplatPolicy> {
        match &self.algorithm.insufficient_splats {
            Some(policy) => policy.parse(),
            None => Ok(InsufficientSplatPolicy::default()),
        }
    }

    /// Builds the configured strategy. Binned bins are derived from `tensor`.
    pub fn build_strategy(&self, tensor: &SplatTensor) -> Result<Box<dyn ClusteringStrategy>> {
        self.validate()?;
        let k = self.algorithm.number_of_clusters.unwrap_or(0);

        let strategy: Box<dyn ClusteringStrategy> = match self.algorithm()? {
            Algorithm::Binned => Box::new(Binned::from_tensor(tensor, k)?),
            Algorithm::Epsilon => Box::new(Epsilon::new(self.algorithm.epsilon.unwrap_or(0.0))?),
            Algorithm::KMeans => {
                let mut params = LloydParams::default();
                if let Some(n_init) = self.algorithm.n_init {
                    params.n_init = n_init;
                }
                Box::new(
                    KMeans::new(k)?
                        .with_params(params)
                        .with_policy(self.insufficient_splat_policy()?),
                )
            }
            Algorithm::SequentialKMeans => Box::new(SequentialKMeans::new(k)?),
            Algorithm::SequentialKMeansRandomInit => {
                Box::new(SequentialKMeansRandomInit::new(k)?)
            }
        };
        Ok(strategy)
    }

    /// Sets up logging based on the logging level in the configuration.
    pub fn setup_logging(&self) {
        let level_filter = match self.logging.level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            _ => LevelFilter::Info,
        };

        if let Err(e) = env_logger::Builder::new()
            .filter_level(level_filter)
            .try_init()
        {
            error!("Failed to initialize logger: {}", e);
        }
    }
}
