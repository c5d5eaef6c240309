use crate::KMeansParamsError;

use super::init::KMeansInit;
use super::naive::KMeansStep;
use ndarray_rand::rand::Rng;
use statrix::prelude::*;

#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [K-means algorithm](crate::KMeans).
pub struct KMeansValidParams<F: Float, R: Rng> {
    /// Number of times the k-means algorithm will be run with different centroid seeds.
    n_runs: usize,
    /// The training of a run is considered complete once the squared sum of the
    /// squared euclidean displacements of every centroid is lower or equal than `tolerance`.
    tolerance: F,
    /// We exit the training loop when the number of training iterations
    /// reaches `max_n_iterations` even if the `tolerance` convergence
    /// condition has not been met. Zero keeps the initial centroids.
    max_n_iterations: u64,
    /// The number of clusters we will be looking for in the training dataset.
    n_clusters: usize,
    /// The initialization strategy used to initialize the centroids.
    init: KMeansInit<F>,
    /// The strategy performing a single Lloyd iteration.
    step: KMeansStep,
    /// The random number generator
    rng: R,
}

#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](KMeansValidParams) for
/// the [K-means algorithm](crate::KMeans) (using the builder pattern).
pub struct KMeansParams<F: Float, R: Rng>(KMeansValidParams<F, R>);

impl<F: Float, R: Rng> KMeansParams<F, R> {
    /// `new` lets us configure our training algorithm parameters:
    /// * we will be looking for `n_clusters` in the training dataset;
    /// * a run is considered complete once the centroids move by less than `tolerance`;
    /// * we exit the training loop when the number of training iterations
    ///   reaches `max_n_iterations` even if the `tolerance` convergence
    ///   condition has not been met;
    /// * the algorithm is run `n_runs` times and the run with the lowest inertia, the sum of
    ///   squared euclidean distances between every observation and its closest centroid, wins.
    ///
    /// Defaults are provided if optional parameters are not specified:
    /// * `tolerance = 1e-6`
    /// * `max_n_iterations = 1000`
    /// * `n_runs = 1`
    /// * `init = Random`
    /// * `step = Naive`
    pub fn new(n_clusters: usize, rng: R) -> Self {
        Self(KMeansValidParams {
            n_runs: 1,
            tolerance: F::cast(1e-6),
            max_n_iterations: 1000,
            n_clusters,
            init: KMeansInit::Random,
            step: KMeansStep::Naive,
            rng,
        })
    }

    /// Change the value of `n_runs`
    pub fn n_runs(mut self, n_runs: usize) -> Self {
        self.0.n_runs = n_runs;
        self
    }

    /// Change the value of `tolerance`
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Change the value of `max_n_iterations`
    pub fn max_n_iterations(mut self, max_n_iterations: u64) -> Self {
        self.0.max_n_iterations = max_n_iterations;
        self
    }

    /// Change the value of `init`
    pub fn init_method(mut self, init: KMeansInit<F>) -> Self {
        self.0.init = init;
        self
    }

    /// Change the Lloyd iteration strategy
    pub fn step_method(mut self, step: KMeansStep) -> Self {
        self.0.step = step;
        self
    }

    /// Replace the random number generator
    pub fn with_rng<R2: Rng>(self, rng: R2) -> KMeansParams<F, R2> {
        KMeansParams(KMeansValidParams {
            n_runs: self.0.n_runs,
            tolerance: self.0.tolerance,
            max_n_iterations: self.0.max_n_iterations,
            n_clusters: self.0.n_clusters,
            init: self.0.init,
            step: self.0.step,
            rng,
        })
    }
}

impl<F: Float, R: Rng> ParamGuard for KMeansParams<F, R> {
    type Checked = KMeansValidParams<F, R>;
    type Error = KMeansParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.n_clusters == 0 {
            Err(KMeansParamsError::NClusters)
        } else if self.0.n_runs == 0 {
            Err(KMeansParamsError::NRuns)
        } else if self.0.tolerance <= F::zero() {
            Err(KMeansParamsError::Tolerance)
        } else if let KMeansInit::RefinedStart {
            n_samplings,
            sample_factor,
        } = self.0.init
        {
            if n_samplings == 0 {
                Err(KMeansParamsError::NSamplings)
            } else if !(sample_factor > F::zero() && sample_factor <= F::one()) {
                Err(KMeansParamsError::SampleFactor)
            } else {
                Ok(&self.0)
            }
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float, R: Rng> KMeansValidParams<F, R> {
    /// The final results will be the best output of n_runs consecutive runs in terms of inertia.
    pub fn n_runs(&self) -> usize {
        self.n_runs
    }

    /// Upper bound on the centroid displacement for a run to be considered converged.
    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    /// We exit the training loop when the number of training iterations
    /// reaches `max_n_iterations` even if the `tolerance` convergence
    /// condition has not been met.
    pub fn max_n_iterations(&self) -> u64 {
        self.max_n_iterations
    }

    /// The number of clusters we will be looking for in the training dataset.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Cluster initialization strategy
    pub fn init_method(&self) -> &KMeansInit<F> {
        &self.init
    }

    /// Lloyd iteration strategy
    pub fn step_method(&self) -> KMeansStep {
        self.step
    }

    /// Returns the random generator
    pub fn rng(&self) -> &R {
        &self.rng
    }
}
