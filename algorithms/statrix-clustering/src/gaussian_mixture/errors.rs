use crate::k_means::KMeansError;
use thiserror::Error;
pub type Result<T> = std::result::Result<T, GmmError>;

/// An error when modeling a GMM algorithm
#[derive(Error, Debug)]
pub enum GmmError {
    /// When any of the hyperparameters or explicit mixture parameters are set the wrong value
    #[error("Invalid value encountered: {0}")]
    InvalidValue(String),
    /// When more components are requested than there are observations
    #[error("cannot fit {n_clusters} components to {n_samples} observations")]
    InvalidClusterCount { n_clusters: usize, n_samples: usize },
    /// When every observation has the same value, the shared initial standard deviation vanishes
    #[error("Fitting failed: the observations have zero variance")]
    ZeroVariance,
    /// When initial KMeans fails
    #[error("Initial KMeans failed: {0}")]
    KMeansError(#[from] KMeansError),
    #[error(transparent)]
    StatrixError(#[from] statrix::error::Error),
}
