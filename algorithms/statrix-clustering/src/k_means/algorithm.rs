use crate::k_means::errors::{KMeansError, KMeansParamsError};
use crate::k_means::{KMeansParams, KMeansValidParams, LloydStep};
use log::{debug, trace, warn};
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Data, DataMut, Ix1, Ix2, Zip};
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use statrix::{prelude::*, DatasetBase, Float};

#[derive(Clone, Debug, PartialEq)]
/// K-means clustering aims to partition a set of unlabeled observations into clusters,
/// where each observation belongs to the cluster with the nearest mean.
///
/// The mean of the points within a cluster is called *centroid*.
///
/// Given the set of centroids, you can assign an observation to a cluster
/// choosing the nearest centroid.
///
/// We provide the _standard algorithm_ (also known as Lloyd's Algorithm). More details on the
/// algorithm can be found in the next section or
/// [here](https://en.wikipedia.org/wiki/K-means_clustering).
///
/// ## The algorithm
///
/// K-means is an iterative algorithm: it progressively refines the choice of centroids.
///
/// It's guaranteed to converge, even though it might not find the optimal set of centroids
/// (unfortunately it can get stuck in a local minimum, finding the optimal minimum if NP-hard!).
///
/// There are three steps in the standard algorithm:
/// - initialisation step: select initial centroids using one of the [`KMeansInit`](crate::KMeansInit)
///   strategies.
/// - assignment step: assign each observation to the nearest cluster
///                    (minimum squared euclidean distance, the lowest index wins ties);
/// - update step: recompute the centroid of each cluster. A cluster without observations keeps
///   its previous centroid.
///
/// The initialisation step is a one-off, done at the very beginning.
/// Assignment and update, bundled in a [`LloydStep`](crate::LloydStep), are repeated in a loop
/// until convergence is reached (either the centroids moved by less than `tolerance` or we reach
/// `max_n_iterations`).
///
/// As the result depends on the initial centroids, the whole procedure is repeated `n_runs` times
/// and the centroids with the lowest inertia are kept.
///
/// ## Tutorial
///
/// ```
/// use statrix::DatasetBase;
/// use statrix::traits::{Fit, Predict};
/// use statrix_clustering::{KMeans, KMeansInit, generate_blobs};
/// use ndarray::{Axis, array};
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
/// use approx::assert_abs_diff_eq;
///
/// // Our random number generator, seeded for reproducibility
/// let mut rng = Xoshiro256Plus::seed_from_u64(42);
///
/// // `expected_centroids` has shape `(n_centroids, n_features)`
/// // i.e. three points in the 2-dimensional plane
/// let expected_centroids = array![[0., 1.], [-10., 20.], [-1., 10.]];
/// // Let's generate a synthetic dataset: three blobs of observations
/// // (100 points each) centered around our `expected_centroids`
/// let data = generate_blobs(100, &expected_centroids, 1., &mut rng);
/// let n_clusters = expected_centroids.len_of(Axis(0));
///
/// let observations = DatasetBase::from(data);
/// // `n_clusters` is the only mandatory parameter, the others fall back to their defaults.
/// let model = KMeans::params_with_rng(n_clusters, rng.clone())
///     .init_method(KMeansInit::KMeansPlusPlus)
///     .n_runs(10)
///     .fit(&observations)
///     .expect("KMeans fitted");
///
/// // Once we found our set of centroids, we can also assign new points to the nearest cluster
/// let new_observation = DatasetBase::from(array![[-9., 20.5]]);
/// // Predict returns the **index** of the nearest cluster
/// let dataset = model.predict(new_observation);
/// // We can retrieve the actual centroid of the closest cluster using `.centroids()`
/// let closest_centroid = &model.centroids().index_axis(Axis(0), dataset.targets()[0]);
/// assert_abs_diff_eq!(closest_centroid.to_owned(), array![-10., 20.], epsilon = 1e-1);
/// ```
pub struct KMeans<F: Float> {
    centroids: Array2<F>,
    cluster_count: Array1<F>,
    inertia: F,
}

impl<F: Float> KMeans<F> {
    pub fn params(n_clusters: usize) -> KMeansParams<F, Xoshiro256Plus> {
        KMeansParams::new(n_clusters, Xoshiro256Plus::seed_from_u64(42))
    }

    pub fn params_with_rng<R: Rng>(n_clusters: usize, rng: R) -> KMeansParams<F, R> {
        KMeansParams::new(n_clusters, rng)
    }

    /// Return the set of centroids as a 2-dimensional matrix with shape
    /// `(n_centroids, n_features)`.
    pub fn centroids(&self) -> &Array2<F> {
        &self.centroids
    }

    /// Return the number of training points belonging to each cluster
    pub fn cluster_count(&self) -> &Array1<F> {
        &self.cluster_count
    }

    /// Return the sum of squared distances between each training point and its closest centroid.
    pub fn inertia(&self) -> F {
        self.inertia
    }
}

impl<F: Float, R: Rng> KMeansValidParams<F, R> {
    /// Clusters `observations` drawing every random number from `rng`.
    ///
    /// Runs `n_runs` trials, each one initializing the centroids and refining them with the
    /// configured Lloyd step, and keeps the trial with the lowest inertia.
    pub fn run_with<G: Rng>(
        &self,
        observations: ArrayView2<F>,
        rng: &mut G,
    ) -> Result<KMeans<F>, KMeansError> {
        let n_samples = observations.nrows();
        if n_samples == 0 {
            return Err(KMeansError::NotEnoughSamples);
        }
        if self.n_clusters() > n_samples {
            return Err(KMeansError::InvalidClusterCount {
                n_clusters: self.n_clusters(),
                n_samples,
            });
        }

        let mut step = self.step_method().bind(observations);
        let mut best: Option<(Array2<F>, F)> = None;

        for trial in 0..self.n_runs() {
            let initial = self
                .init_method()
                .run(self.n_clusters(), observations, rng)?;
            let (centroids, inertia) = self.lloyd(step.as_mut(), observations, initial, trial);

            // We keep the centroids which minimize the inertia (defined as the sum of
            // the squared distances of the closest centroid for all observations)
            // over the n runs of the KMeans algorithm.
            if best
                .as_ref()
                .map_or(true, |(_, min_inertia)| inertia < *min_inertia)
            {
                best = Some((centroids, inertia));
            }
        }

        if step.n_empty_clusters() > 0 {
            warn!(
                "clusters ran empty {} times, their previous centroids were kept",
                step.n_empty_clusters()
            );
        }

        let (centroids, inertia) = best.ok_or(KMeansParamsError::NRuns)?;
        let mut memberships = Array1::zeros(n_samples);
        update_cluster_memberships(&centroids, &observations, &mut memberships);
        let mut cluster_count = Array1::zeros(self.n_clusters());
        memberships
            .iter()
            .for_each(|&c| cluster_count[c] += F::one());

        Ok(KMeans {
            centroids,
            cluster_count,
            inertia,
        })
    }

    /// Refines `initial` with Lloyd iterations on `observations` until convergence and returns
    /// the final centroids together with their inertia.
    pub(crate) fn refine_from(
        &self,
        observations: ArrayView2<F>,
        initial: Array2<F>,
    ) -> (Array2<F>, F) {
        let mut step = self.step_method().bind(observations);
        self.lloyd(step.as_mut(), observations, initial, 0)
    }

    fn lloyd(
        &self,
        step: &mut dyn LloydStep<F>,
        observations: ArrayView2<F>,
        mut current: Array2<F>,
        trial: usize,
    ) -> (Array2<F>, F) {
        let mut next = Array2::zeros(current.dim());

        let mut n_iter = 0;
        while n_iter < self.max_n_iterations() {
            let inertia = step.iterate(&current, &mut next);
            std::mem::swap(&mut current, &mut next);
            n_iter += 1;

            let displacement = centroid_displacement(&next, &current);
            trace!(
                "trial {} iteration {}: inertia {}, displacement {}",
                trial,
                n_iter,
                inertia,
                displacement
            );
            if displacement <= self.tolerance() {
                break;
            }
        }

        let inertia = assignment_cost(&current, &observations);
        debug!(
            "trial {} finished after {} iterations with inertia {}",
            trial, n_iter, inertia
        );
        (current, inertia)
    }

    /// Fits the model, then assigns every observation of `dataset` to its closest centroid.
    pub fn fit_predict<DA: Data<Elem = F>, T>(
        &self,
        dataset: &DatasetBase<ArrayBase<DA, Ix2>, T>,
    ) -> Result<(KMeans<F>, Array1<usize>), KMeansError>
    where
        R: Clone,
    {
        let model = self.fit(dataset)?;
        let memberships: Array1<usize> = model.predict(dataset.records());
        Ok((model, memberships))
    }
}

impl<F: Float, R: Rng + Clone> KMeansParams<F, R> {
    /// Checks the hyperparameters, fits the model and assigns every observation of `dataset` to
    /// its closest centroid.
    pub fn fit_predict<DA: Data<Elem = F>, T>(
        &self,
        dataset: &DatasetBase<ArrayBase<DA, Ix2>, T>,
    ) -> Result<(KMeans<F>, Array1<usize>), KMeansError> {
        self.check_ref()?.fit_predict(dataset)
    }
}

impl<F: Float, R: Rng + Clone, DA: Data<Elem = F>, T> Fit<ArrayBase<DA, Ix2>, T, KMeansError>
    for KMeansValidParams<F, R>
{
    type Object = KMeans<F>;

    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `fit` identifies `n_clusters` centroids based on the training data distribution.
    ///
    /// An instance of `KMeans` is returned.
    ///
    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<DA, Ix2>, T>,
    ) -> Result<Self::Object, KMeansError> {
        let mut rng = self.rng().clone();
        self.run_with(dataset.records().view(), &mut rng)
    }
}

impl<F: Float, DA: Data<Elem = F>> Transformer<&ArrayBase<DA, Ix2>, Array1<F>> for KMeans<F> {
    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `transform` returns, for each observation, its squared distance to its centroid.
    fn transform(&self, observations: &ArrayBase<DA, Ix2>) -> Array1<F> {
        let mut dists = Array1::zeros(observations.nrows());
        update_min_dists(&self.centroids, observations, &mut dists);
        dists
    }
}

impl<F: Float, DA: Data<Elem = F>> PredictInplace<ArrayBase<DA, Ix2>, Array1<usize>>
    for KMeans<F>
{
    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `predict` returns, for each observation, the index of the closest cluster/centroid.
    ///
    /// You can retrieve the centroid associated to an index using the
    /// [`centroids` method](#method.centroids).
    fn predict_inplace(&self, observations: &ArrayBase<DA, Ix2>, memberships: &mut Array1<usize>) {
        assert_eq!(
            observations.nrows(),
            memberships.len(),
            "The number of data points must match the number of memberships."
        );

        update_cluster_memberships(&self.centroids, observations, memberships);
    }

    fn default_target(&self, x: &ArrayBase<DA, Ix2>) -> Array1<usize> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float, DA: Data<Elem = F>> PredictInplace<ArrayBase<DA, Ix1>, usize> for KMeans<F> {
    /// Given one input observation, return the index of its closest cluster
    fn predict_inplace(&self, observation: &ArrayBase<DA, Ix1>, membership: &mut usize) {
        *membership = closest_centroid(&self.centroids, observation).0;
    }

    fn default_target(&self, _x: &ArrayBase<DA, Ix1>) -> usize {
        0
    }
}

/// Squared sum of the squared euclidean displacement of every centroid
fn centroid_displacement<F: Float>(old_centroids: &Array2<F>, new_centroids: &Array2<F>) -> F {
    let moved = old_centroids
        .rows()
        .into_iter()
        .zip(new_centroids.rows())
        .map(|(old, new)| squared_distance(&old, &new))
        .sum::<F>();
    moved * moved
}

/// Sum of the squared distances of every observation to its closest centroid
fn assignment_cost<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> F {
    observations
        .rows()
        .into_iter()
        .map(|observation| closest_centroid(centroids, &observation).1)
        .sum()
}

// Update `cluster_memberships` with the index of the cluster each observation belongs to.
pub(crate) fn update_cluster_memberships<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    cluster_memberships: &mut ArrayBase<impl DataMut<Elem = usize>, Ix1>,
) {
    Zip::from(observations.rows())
        .and(cluster_memberships)
        .for_each(|observation, cluster_membership| {
            *cluster_membership = closest_centroid(centroids, &observation).0
        });
}

// Updates `dists` with the squared distance of each observation from its closest centroid.
pub(crate) fn update_min_dists<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.rows())
        .and(dists)
        .for_each(|observation, dist| *dist = closest_centroid(centroids, &observation).1);
}

pub(crate) fn squared_distance<F: Float>(
    a: &ArrayBase<impl Data<Elem = F>, Ix1>,
    b: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> F {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum()
}

/// Given a matrix of centroids with shape (n_centroids, n_features) and an observation,
/// return the index of the closest centroid (the index of the corresponding row in `centroids`)
/// together with the squared distance to it. Ties go to the lowest index.
pub(crate) fn closest_centroid<F: Float>(
    // (n_centroids, n_features)
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_features)
    observation: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> (usize, F) {
    let mut closest_index = 0;
    let mut minimum_distance = F::infinity();

    for (centroid_index, centroid) in centroids.rows().into_iter().enumerate() {
        let distance = squared_distance(&centroid, observation);
        if distance < minimum_distance {
            closest_index = centroid_index;
            minimum_distance = distance;
        }
    }
    (closest_index, minimum_distance)
}

#[cfg(test)]
mod tests {
    use super::super::KMeansInit;
    use super::*;
    use crate::generate_blobs;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, concatenate, Array, Array1, Array2, Axis};
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;

    fn function_test_1d(x: &Array2<f64>) -> Array2<f64> {
        let mut y = Array2::zeros(x.dim());
        Zip::from(&mut y).and(x).for_each(|yi, &xi| {
            if xi < 0.4 {
                *yi = xi * xi;
            } else if (0.4..0.8).contains(&xi) {
                *yi = 3. * xi + 1.;
            } else {
                *yi = f64::sin(10. * xi);
            }
        });
        y
    }

    fn calc_memberships(centroids: &Array2<f64>, observations: &Array2<f64>) -> Array1<usize> {
        let mut memberships = Array1::zeros(observations.nrows());
        update_cluster_memberships(centroids, observations, &mut memberships);
        memberships
    }

    #[test]
    fn test_min_dists() {
        let centroids = array![[0.0, 1.0], [40.0, 10.0]];
        let observations = array![[3.0, 4.0], [1.0, 3.0], [25.0, 15.0]];
        let mut dists = Array1::zeros(observations.nrows());

        update_min_dists(&centroids, &observations, &mut dists);
        assert_abs_diff_eq!(dists, array![18.0, 5.0, 250.0]);
    }

    #[test]
    fn displacement_squares_the_squared_movement() {
        let old = array![[0., 0.], [1., 1.]];
        let new = array![[1., 0.], [1., 3.]];
        // 1 + 4, squared
        assert_abs_diff_eq!(centroid_displacement(&old, &new), 25.);
    }

    #[test]
    fn test_n_runs() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let xt = Array::random_using(100, Uniform::new(0., 1.0), &mut rng).insert_axis(Axis(1));
        let yt = function_test_1d(&xt);
        let data = concatenate(Axis(1), &[xt.view(), yt.view()]).unwrap();

        for init in &[
            KMeansInit::Random,
            KMeansInit::KMeansPlusPlus,
            KMeansInit::RefinedStart {
                n_samplings: 10,
                sample_factor: 0.3,
            },
        ] {
            // First clustering with one run
            let dataset = DatasetBase::from(data.clone());
            let model = KMeans::params_with_rng(3, rng.clone())
                .n_runs(1)
                .init_method(init.clone())
                .fit(&dataset)
                .expect("KMeans fitted");
            let clusters = model.predict(dataset);
            let inertia: f64 = clusters
                .records
                .rows()
                .into_iter()
                .zip(clusters.targets.iter())
                .map(|(row, &c)| squared_distance(&row, &model.centroids().row(c)))
                .sum();
            let total_dist = model.transform(&clusters.records.view()).sum();
            assert_abs_diff_eq!(inertia, total_dist, epsilon = 1e-5);
            assert_abs_diff_eq!(inertia, model.inertia(), epsilon = 1e-5);

            let single_cluster: usize = model.predict(&data.row(0));
            assert_eq!(single_cluster, clusters.targets[0]);

            // Second clustering with 10 runs, the first of which is the previous run
            let dataset2 = DatasetBase::from(clusters.records().clone());
            let model2 = KMeans::params_with_rng(3, rng.clone())
                .n_runs(10)
                .init_method(init.clone())
                .fit(&dataset2)
                .expect("KMeans fitted");
            assert!(model2.inertia() <= model.inertia() + 1e-10);
        }
    }

    #[test]
    fn cluster_count_sums_to_the_number_of_observations() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let data = generate_blobs(40, &array![[0., 0.], [10., 10.]], 1., &mut rng);
        let model = KMeans::params_with_rng(2, rng)
            .fit(&DatasetBase::from(data.view()))
            .unwrap();
        assert_abs_diff_eq!(model.cluster_count().sum(), 80.);
        assert_abs_diff_eq!(model.cluster_count(), &array![40., 40.]);
    }

    #[test]
    fn zero_iterations_keep_the_initial_centroids() {
        let observations = array![[0., 0.], [1., 0.], [10., 10.], [11., 10.]];
        let params = KMeans::params(2).max_n_iterations(0);

        let mut rng = params.check_ref().unwrap().rng().clone();
        let expected = KMeansInit::Random
            .run(2, observations.view(), &mut rng)
            .unwrap();

        let model = params.fit(&DatasetBase::from(observations)).unwrap();
        assert_abs_diff_eq!(model.centroids(), &expected);
    }

    #[test]
    fn converged_centroids_are_a_fixed_point() {
        let mut rng = Xoshiro256Plus::seed_from_u64(7);
        let data = generate_blobs(50, &array![[0., 0., 0.], [8., 8., 8.]], 1., &mut rng);
        let model = KMeans::params_with_rng(2, rng)
            .init_method(KMeansInit::KMeansPlusPlus)
            .fit(&DatasetBase::from(data.view()))
            .unwrap();

        let mut step = crate::NaiveKMeans::new(data.view());
        let mut next = Array2::zeros((2, 3));
        crate::LloydStep::iterate(&mut step, model.centroids(), &mut next);
        assert_abs_diff_eq!(&next, model.centroids(), epsilon = 1e-3);
    }

    #[test]
    fn fit_predict_matches_predict() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let data = generate_blobs(30, &array![[0., 5.], [5., 0.], [-5., -5.]], 0.5, &mut rng);
        let dataset = DatasetBase::from(data);
        let params = KMeans::params_with_rng(3, rng).init_method(KMeansInit::KMeansPlusPlus);

        let (model, memberships) = params.fit_predict(&dataset).unwrap();
        let predicted: Array1<usize> = model.predict(dataset.records());
        assert_eq!(memberships, predicted);
        assert!(memberships.iter().all(|&m| m < 3));
    }

    #[test]
    fn more_clusters_than_observations() {
        let dataset = DatasetBase::from(array![[1., 2.], [3., 4.]]);
        let res = KMeans::params(3).fit(&dataset);
        assert!(matches!(
            res,
            Err(KMeansError::InvalidClusterCount {
                n_clusters: 3,
                n_samples: 2
            })
        ));
    }

    #[test]
    fn empty_observations() {
        let dataset = DatasetBase::from(Array2::<f64>::zeros((0, 2)));
        let res = KMeans::params(1).fit(&dataset);
        assert!(matches!(res, Err(KMeansError::NotEnoughSamples)));
    }

    #[test]
    fn invalid_params_surface_through_fit() {
        let dataset = DatasetBase::from(array![[1., 2.], [3., 4.]]);
        let res = KMeans::params(0).fit(&dataset);
        assert!(matches!(
            res,
            Err(KMeansError::InvalidParams(KMeansParamsError::NClusters))
        ));
    }

    #[test]
    // An observation is closest to itself.
    fn nothing_is_closer_than_self() {
        let n_centroids = 20;
        let n_features = 5;
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let centroids: Array2<f64> = Array::random_using(
            (n_centroids, n_features),
            Uniform::new(-100., 100.),
            &mut rng,
        );

        let expected_memberships = (0..n_centroids).collect::<Array1<_>>();
        assert_eq!(
            calc_memberships(&centroids, &centroids),
            expected_memberships
        );
    }

    #[test]
    fn oracle_test_for_closest_centroid() {
        let centroids = array![[0., 0.], [1., 2.], [20., 0.], [0., 20.],];
        let observations = array![[1., 0.6], [20., 2.], [20., 0.], [7., 20.],];
        let memberships = array![0, 2, 2, 3];

        assert_eq!(calc_memberships(&centroids, &observations), memberships);
    }
}
