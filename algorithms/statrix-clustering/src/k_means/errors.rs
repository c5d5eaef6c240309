use thiserror::Error;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug)]
pub enum KMeansParamsError {
    #[error("n_clusters cannot be 0")]
    NClusters,
    #[error("n_runs cannot be 0")]
    NRuns,
    #[error("tolerance must be greater than 0")]
    Tolerance,
    #[error("refined start needs at least one sampling round")]
    NSamplings,
    #[error("refined start sample factor must lie in (0, 1]")]
    SampleFactor,
}

/// An error when modeling a KMeans algorithm
#[derive(Error, Debug)]
pub enum KMeansError {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] KMeansParamsError),
    /// When more clusters are requested than there are observations
    #[error("cannot find {n_clusters} clusters in {n_samples} observations")]
    InvalidClusterCount { n_clusters: usize, n_samples: usize },
    /// When the data matrix has no rows
    #[error("cannot cluster an empty set of observations")]
    NotEnoughSamples,
    #[error(transparent)]
    StatrixError(#[from] statrix::error::Error),
}
