use crate::gaussian_mixture::errors::{GmmError, Result};
use crate::gaussian_mixture::init::GmmInitMethod;
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use statrix::{Float, ParamGuard};

#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [GMM algorithm](crate::GaussianMixtureModel).
pub struct GmmValidParams<F: Float, R: Rng> {
    n_clusters: usize,
    tolerance: F,
    n_runs: usize,
    max_n_iter: u64,
    init_method: GmmInitMethod,
    rng: R,
}

impl<F: Float, R: Rng + Clone> GmmValidParams<F, R> {
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    pub fn n_runs(&self) -> usize {
        self.n_runs
    }

    pub fn max_n_iterations(&self) -> u64 {
        self.max_n_iter
    }

    pub fn init_method(&self) -> &GmmInitMethod {
        &self.init_method
    }

    pub fn rng(&self) -> R {
        self.rng.clone()
    }
}

#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [GMM algorithm](crate::GaussianMixtureModel).
pub struct GmmParams<F: Float, R: Rng>(GmmValidParams<F, R>);

impl<F: Float> GmmParams<F, Xoshiro256Plus> {
    #[allow(clippy::new_ret_no_self)]
    pub fn new(n_clusters: usize) -> GmmParams<F, Xoshiro256Plus> {
        Self::new_with_rng(n_clusters, Xoshiro256Plus::seed_from_u64(42))
    }
}

impl<F: Float, R: Rng + Clone> GmmParams<F, R> {
    /// Defaults are provided if optional parameters are not specified:
    /// * `tolerance = 1e-6`
    /// * `max_n_iterations = 1000`
    /// * `n_runs = 1`
    /// * `init_method = Random`
    pub fn new_with_rng(n_clusters: usize, rng: R) -> GmmParams<F, R> {
        Self(GmmValidParams {
            n_clusters,
            tolerance: F::cast(1e-6),
            n_runs: 1,
            max_n_iter: 1000,
            init_method: GmmInitMethod::Random,
            rng,
        })
    }

    /// Set the convergence threshold. EM iterations will stop when the absolute change of the
    /// log-likelihood between two iterations is below this threshold.
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Set the number of initializations to perform. The trial with the highest log-likelihood
    /// is kept.
    pub fn n_runs(mut self, n_runs: usize) -> Self {
        self.0.n_runs = n_runs;
        self
    }

    /// Set the number of EM iterations to perform.
    pub fn max_n_iterations(mut self, max_n_iter: u64) -> Self {
        self.0.max_n_iter = max_n_iter;
        self
    }

    /// Set the method used to initialize the weights, the means and the standard deviations.
    pub fn init_method(mut self, init_method: GmmInitMethod) -> Self {
        self.0.init_method = init_method;
        self
    }

    pub fn with_rng<R2: Rng + Clone>(self, rng: R2) -> GmmParams<F, R2> {
        GmmParams(GmmValidParams {
            n_clusters: self.0.n_clusters,
            tolerance: self.0.tolerance,
            n_runs: self.0.n_runs,
            max_n_iter: self.0.max_n_iter,
            init_method: self.0.init_method,
            rng,
        })
    }
}

impl<F: Float, R: Rng> ParamGuard for GmmParams<F, R> {
    type Checked = GmmValidParams<F, R>;
    type Error = GmmError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.n_clusters == 0 {
            Err(GmmError::InvalidValue(
                "`n_clusters` cannot be 0!".to_string(),
            ))
        } else if self.0.tolerance <= F::zero() {
            Err(GmmError::InvalidValue(
                "`tolerance` must be greater than 0!".to_string(),
            ))
        } else if self.0.n_runs == 0 {
            Err(GmmError::InvalidValue("`n_runs` cannot be 0!".to_string()))
        } else if self.0.max_n_iter == 0 {
            Err(GmmError::InvalidValue(
                "`max_n_iterations` cannot be 0!".to_string(),
            ))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GaussianMixtureModel;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<GmmParams<f64, Xoshiro256Plus>>();
        has_autotraits::<GmmValidParams<f64, Xoshiro256Plus>>();
    }

    #[test]
    fn defaults() {
        let params = GaussianMixtureModel::<f64>::params(2).check().unwrap();
        assert_eq!(params.n_runs(), 1);
        assert_eq!(params.max_n_iterations(), 1000);
        assert_eq!(params.init_method(), &GmmInitMethod::Random);
        assert!((params.tolerance() - 1e-6).abs() < 1e-12);
    }

    #[test]
    fn n_runs_is_counted_like_kmeans() {
        let runs: usize = 4;
        let gmm = GaussianMixtureModel::<f64>::params(2)
            .n_runs(runs)
            .check()
            .unwrap();
        let kmeans = crate::KMeans::<f64>::params(2).n_runs(runs).check().unwrap();
        assert_eq!(gmm.n_runs(), kmeans.n_runs());
    }

    #[test]
    fn test_invalid_n_runs() {
        let res = GaussianMixtureModel::<f64>::params(1).n_runs(0).check();
        assert!(matches!(res, Err(GmmError::InvalidValue(_))));
    }

    #[test]
    fn test_invalid_tolerance() {
        let res = GaussianMixtureModel::params(1).tolerance(0.).check();
        assert!(matches!(res, Err(GmmError::InvalidValue(_))));
    }

    #[test]
    fn test_invalid_n_clusters() {
        let res = GaussianMixtureModel::<f64>::params(0).check();
        assert!(matches!(res, Err(GmmError::InvalidValue(_))));
    }

    #[test]
    fn test_invalid_max_n_iterations() {
        let res = GaussianMixtureModel::<f64>::params(1)
            .max_n_iterations(0)
            .check();
        assert!(matches!(res, Err(GmmError::InvalidValue(_))));
    }
}
