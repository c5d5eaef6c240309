use crate::gaussian_mixture::em_fit::EmFit;
use crate::gaussian_mixture::errors::{GmmError, Result};
use crate::gaussian_mixture::gaussian::{mixture_density, Gaussian};
use crate::gaussian_mixture::hyperparams::{GmmParams, GmmValidParams};
use log::{debug, trace};
use ndarray::{Array1, ArrayBase, Data, Ix1};
use ndarray_rand::rand::Rng;
use rand_xoshiro::Xoshiro256Plus;
use statrix::{traits::*, DatasetBase, Float};

/// Gaussian Mixture Model (GMM) of univariate data: a weighted sum of normal distributions.
///
/// GMM assumes all the data points are generated from a mixture of a number K
/// of Gaussian distributions with certain parameters.
/// Expectation-maximization (EM) algorithm is used to fit the GMM to the dataset
/// by parameterizing the weight, mean, and standard deviation of each component.
///
/// ## The algorithm
///
/// The general idea is to maximize the likelihood (equivalently the log likelihood)
/// that is maximising the probability that the dataset is drawn from our mixture of normal distributions.
///
/// After an initialization step which can either pick random observations as component means or
/// reuse the centroids found by the [KMeans](crate::KMeans) algorithm, the core EM iterative
/// algorithm is a fixed-point two-step algorithm, see [`EmFit`](crate::EmFit):
///
/// 1. Expectation step: compute the responsibility of every component for every observation.
/// 2. Maximization step: update the weights, means and standard deviations to maximize the likelihood.
///
/// We stop iterating when the log-likelihood changes by less than `tolerance` or
/// if we reach a max number of iterations (controlled by `max_n_iterations` parameter).
/// As the initialization of the algorithm is subject to randomness, several initializations are
/// performed (controlled by the `n_runs` parameter) and the one reaching the highest
/// log-likelihood is kept.
///
/// A mixture can also be built from known parameters with
/// [`from_parameters`](GaussianMixtureModel::from_parameters) and queried right away.
///
/// ## Tutorial
///
/// ```
/// use statrix::DatasetBase;
/// use statrix::traits::{Fit, Predict};
/// use statrix_clustering::{GaussianMixtureModel, GmmInitMethod};
/// use ndarray::{Array1, array};
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let mut rng = Xoshiro256Plus::seed_from_u64(42);
/// let truth = GaussianMixtureModel::from_parameters(
///     array![0.4, 0.6],
///     array![-5., 5.],
///     array![1., 1.5],
/// )
/// .expect("valid mixture");
///
/// // draw the training data from each component in turn
/// let observations: Array1<f64> = (0..1000)
///     .map(|i| truth.components()[i % 2].sample(&mut rng))
///     .collect();
///
/// let gmm = GaussianMixtureModel::params(2)
///     .init_method(GmmInitMethod::KMeans)
///     .n_runs(3)
///     .with_rng(rng)
///     .fit(&DatasetBase::from(observations.view()))
///     .expect("GMM fitting");
///
/// // labels refer to the order of `gmm.means()`
/// let labels: Array1<usize> = gmm.predict(&array![-4.5, 6.]);
/// assert!(gmm.component_mean(labels[0]) < 0.);
/// assert!(gmm.component_mean(labels[1]) > 0.);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianMixtureModel<F: Float> {
    weights: Array1<F>,
    components: Vec<Gaussian<F>>,
}

impl<F: Float> GaussianMixtureModel<F> {
    pub fn params(n_clusters: usize) -> GmmParams<F, Xoshiro256Plus> {
        GmmParams::new(n_clusters)
    }

    pub fn params_with_rng<R: Rng + Clone>(n_clusters: usize, rng: R) -> GmmParams<F, R> {
        GmmParams::new_with_rng(n_clusters, rng)
    }

    /// Mixture of `n_components` standard normal distributions with equal weights.
    ///
    /// Fails if `n_components` is zero.
    pub fn new(n_components: usize) -> Result<Self> {
        if n_components == 0 {
            return Err(GmmError::InvalidValue(
                "a mixture needs at least one component".to_string(),
            ));
        }
        Ok(GaussianMixtureModel {
            weights: Array1::from_elem(n_components, F::one() / F::cast(n_components)),
            components: vec![Gaussian::standard(); n_components],
        })
    }

    /// Mixture with explicit parameters, one entry per component in each array.
    ///
    /// # Errors
    ///
    /// * the arrays are empty or of different lengths
    /// * a weight is negative or the weights do not sum up to one
    /// * a standard deviation is not strictly positive
    pub fn from_parameters(
        weights: Array1<F>,
        means: Array1<F>,
        standard_deviations: Array1<F>,
    ) -> Result<Self> {
        let n_components = weights.len();
        if n_components == 0 {
            return Err(GmmError::InvalidValue(
                "a mixture needs at least one component".to_string(),
            ));
        }
        if means.len() != n_components || standard_deviations.len() != n_components {
            return Err(GmmError::InvalidValue(format!(
                "got {} weights, {} means and {} standard deviations",
                n_components,
                means.len(),
                standard_deviations.len()
            )));
        }
        if weights.iter().any(|w| !(*w >= F::zero())) {
            return Err(GmmError::InvalidValue(
                "weights cannot be negative".to_string(),
            ));
        }
        if (weights.sum() - F::one()).abs() > F::cast(1e-6) {
            return Err(GmmError::InvalidValue(format!(
                "weights sum up to {} instead of 1",
                weights.sum()
            )));
        }
        if standard_deviations.iter().any(|s| !(*s > F::zero())) {
            return Err(GmmError::InvalidValue(
                "standard deviations must be greater than 0".to_string(),
            ));
        }

        let components = means
            .iter()
            .zip(standard_deviations.iter())
            .map(|(&mean, &std_dev)| Gaussian::new(mean, std_dev))
            .collect();
        Ok(GaussianMixtureModel {
            weights,
            components,
        })
    }

    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    pub fn weights(&self) -> &Array1<F> {
        &self.weights
    }

    pub fn means(&self) -> Array1<F> {
        self.components.iter().map(|c| c.mean()).collect()
    }

    pub fn standard_deviations(&self) -> Array1<F> {
        self.components
            .iter()
            .map(|c| c.standard_deviation())
            .collect()
    }

    pub fn components(&self) -> &[Gaussian<F>] {
        &self.components
    }

    pub fn component_mean(&self, component: usize) -> F {
        self.components[component].mean()
    }

    pub fn component_standard_deviation(&self, component: usize) -> F {
        self.components[component].standard_deviation()
    }

    pub fn component_weight(&self, component: usize) -> F {
        self.weights[component]
    }

    /// Density of the mixture at `x`
    pub fn probability(&self, x: F) -> F {
        mixture_density(&self.components, &self.weights, x)
    }

    /// Density of a single component at `x`, regardless of its weight
    pub fn component_probability(&self, x: F, component: usize) -> F {
        self.components[component].pdf(x)
    }

    /// Index of the component with the highest density at `x`, weights are not taken into
    /// account. Ties go to the lowest index.
    pub fn component_label(&self, x: F) -> usize {
        let mut label = 0;
        let mut max_density = F::neg_infinity();
        for (k, component) in self.components.iter().enumerate() {
            let density = component.pdf(x);
            if density > max_density {
                label = k;
                max_density = density;
            }
        }
        label
    }

    /// Draws a value from the mixture.
    ///
    /// One value is drawn from every component and the draws are summed up, each scaled by
    /// the weight of its component.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> F {
        self.components
            .iter()
            .zip(self.weights.iter())
            .map(|(component, &weight)| weight * component.sample(rng))
            .sum()
    }

    /// Sum of the log densities of the mixture at every observation
    pub fn log_likelihood<D: Data<Elem = F>>(&self, observations: &ArrayBase<D, Ix1>) -> F {
        EmFit::new(observations.view()).log_likelihood(&self.components, &self.weights)
    }
}

impl<F: Float, R: Rng + Clone, D: Data<Elem = F>, T> Fit<ArrayBase<D, Ix1>, T, GmmError>
    for GmmValidParams<F, R>
{
    type Object = GaussianMixtureModel<F>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix1>, T>) -> Result<Self::Object> {
        let observations = dataset.records().view();
        let n_samples = observations.len();
        if n_samples == 0 {
            return Err(statrix::error::Error::NotEnoughSamples.into());
        }
        if self.n_clusters() > n_samples {
            return Err(GmmError::InvalidClusterCount {
                n_clusters: self.n_clusters(),
                n_samples,
            });
        }

        let mut rng = self.rng();
        let em = EmFit::new(observations);
        let mut best: Option<(GaussianMixtureModel<F>, F)> = None;

        for trial in 0..self.n_runs() {
            let (mut components, mut weights) =
                self.init_method()
                    .run(self.n_clusters(), observations, &mut rng)?;
            let mut log_likelihood = em.log_likelihood(&components, &weights);

            let mut n_iter = 0;
            while n_iter < self.max_n_iterations() {
                em.step(&mut components, &mut weights);
                n_iter += 1;

                let new_log_likelihood = em.log_likelihood(&components, &weights);
                let change = (new_log_likelihood - log_likelihood).abs();
                log_likelihood = new_log_likelihood;
                trace!(
                    "trial {} iteration {}: log-likelihood {}",
                    trial,
                    n_iter,
                    log_likelihood
                );
                if change < self.tolerance() {
                    break;
                }
            }
            debug!(
                "trial {} finished after {} iterations with log-likelihood {}",
                trial, n_iter, log_likelihood
            );

            if best
                .as_ref()
                .map_or(true, |(_, max_log_likelihood)| {
                    log_likelihood > *max_log_likelihood
                })
            {
                best = Some((
                    GaussianMixtureModel {
                        weights,
                        components,
                    },
                    log_likelihood,
                ));
            }
        }

        best.map(|(model, _)| model)
            .ok_or_else(|| GmmError::InvalidValue("`n_runs` cannot be 0!".to_string()))
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix1>, Array1<usize>>
    for GaussianMixtureModel<F>
{
    /// Label every observation with the index of its most likely component
    fn predict_inplace(&self, observations: &ArrayBase<D, Ix1>, labels: &mut Array1<usize>) {
        assert_eq!(
            observations.len(),
            labels.len(),
            "The number of data points must match the number of output targets."
        );

        labels
            .iter_mut()
            .zip(observations.iter())
            .for_each(|(label, &x)| *label = self.component_label(x));
    }

    fn default_target(&self, x: &ArrayBase<D, Ix1>) -> Array1<usize> {
        Array1::zeros(x.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaussian_mixture::GmmInitMethod;
    use crate::generate_univariate_blobs;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Axis};
    use ndarray_rand::rand::SeedableRng;
    use statrix::ParamGuard;

    fn reference_mixture() -> GaussianMixtureModel<f64> {
        GaussianMixtureModel::from_parameters(array![0.3, 0.7], array![0., 3.], array![1., 2.])
            .unwrap()
    }

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<GaussianMixtureModel<f64>>();
    }

    #[test]
    fn test_probability() {
        let gmm = reference_mixture();
        let expected = [
            (0., 0.165013842603),
            (1., 0.157280970937),
            (2., 0.139420154321),
            (3., 0.140959352664),
            (-1.3, 0.0652530921706),
            (5.4, 0.067965174965),
        ];
        for &(x, p) in &expected {
            assert_abs_diff_eq!(gmm.probability(x), p, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_component_probability() {
        let gmm = reference_mixture();
        let expected = [
            (0., 0.398942280401, 0.0647587978329),
            (1., 0.241970724519, 0.12098536226),
            (2., 0.0539909665132, 0.176032663382),
            (3., 0.00443184841194, 0.199471140201),
            (-1.3, 0.171368592048, 0.0197750207947),
            (5.4, 1.85736184456e-07, 0.0970930274916),
        ];
        for &(x, p0, p1) in &expected {
            assert_abs_diff_eq!(gmm.component_probability(x, 0), p0, epsilon = 1e-10);
            assert_abs_diff_eq!(gmm.component_probability(x, 1), p1, epsilon = 1e-10);
        }
    }

    #[test]
    fn component_label_ignores_weights() {
        let gmm = reference_mixture();
        // the weighted density of the second component is higher at 1, its own density is not
        assert!(0.7 * gmm.component_probability(1., 1) > 0.3 * gmm.component_probability(1., 0));
        assert_eq!(gmm.component_label(1.), 0);
        assert_eq!(gmm.component_label(3.), 1);

        let labels: Array1<usize> = gmm.predict(&array![-1.3, 0., 5.4]);
        assert_eq!(labels, array![0, 0, 1]);
    }

    #[test]
    fn component_label_ties_go_to_the_lowest_index() {
        let gmm = GaussianMixtureModel::<f64>::new(3).unwrap();
        assert_eq!(gmm.component_label(0.7), 0);
    }

    #[test]
    fn new_mixture_is_uniform_and_standard() {
        let gmm = GaussianMixtureModel::<f64>::new(4).unwrap();
        assert_eq!(gmm.n_components(), 4);
        assert_abs_diff_eq!(gmm.weights(), &Array1::from_elem(4, 0.25));
        assert_abs_diff_eq!(gmm.means(), Array1::<f64>::zeros(4));
        assert_abs_diff_eq!(gmm.standard_deviations(), Array1::<f64>::ones(4));
        assert_abs_diff_eq!(gmm.probability(0.), 0.398942280401, epsilon = 1e-10);
    }

    #[test]
    fn new_mixture_needs_a_component() {
        let res = GaussianMixtureModel::<f64>::new(0);
        assert!(matches!(res, Err(GmmError::InvalidValue(_))));
    }

    #[test]
    fn from_parameters_validates_its_input() {
        let bad = [
            (Array1::zeros(0), Array1::zeros(0), Array1::zeros(0)),
            (array![0.5, 0.5], array![0.], array![1., 1.]),
            (array![1.5, -0.5], array![0., 1.], array![1., 1.]),
            (array![0.2, 0.2], array![0., 1.], array![1., 1.]),
            (array![0.5, 0.5], array![0., 1.], array![1., 0.]),
        ];
        for (weights, means, stdevs) in bad.iter().cloned() {
            let res = GaussianMixtureModel::<f64>::from_parameters(weights, means, stdevs);
            assert!(matches!(res, Err(GmmError::InvalidValue(_))));
        }
    }

    #[test]
    fn accessors_expose_the_parameters() {
        let gmm = reference_mixture();
        assert_eq!(gmm.n_components(), 2);
        assert_abs_diff_eq!(gmm.component_weight(1), 0.7);
        assert_abs_diff_eq!(gmm.component_mean(1), 3.);
        assert_abs_diff_eq!(gmm.component_standard_deviation(0), 1.);
        assert_abs_diff_eq!(gmm.means(), array![0., 3.]);
        assert_abs_diff_eq!(gmm.standard_deviations(), array![1., 2.]);
    }

    #[test]
    fn sample_is_a_weighted_sum_of_draws() {
        let gmm = reference_mixture();
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let samples: Array1<f64> = (0..20_000).map(|_| gmm.sample(&mut rng)).collect();

        // 0.3 N(0, 1) + 0.7 N(3, 2): mean 2.1, variance 0.09 + 1.96
        assert_abs_diff_eq!(samples.mean().unwrap(), 2.1, epsilon = 0.05);
        let variance = samples.var_axis(Axis(0), 0f64).into_scalar();
        assert_abs_diff_eq!(variance, 2.05, epsilon = 0.1);
    }

    #[test]
    fn single_gaussian_recovers_the_moments() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        for &(mean, std_dev, n) in &[(0.3, 0.8, 150), (0.7, 0.2, 700), (0.5, 0.5, 1500)] {
            let observations = generate_univariate_blobs(n, &[mean], &[std_dev], &mut rng);
            let gmm = GaussianMixtureModel::params(1)
                .with_rng(rng.clone())
                .fit(&DatasetBase::from(observations.view()))
                .unwrap();

            let empirical_mean = observations.mean().unwrap();
            let empirical_std = observations.var_axis(Axis(0), 0f64).into_scalar().sqrt();
            assert_abs_diff_eq!(gmm.component_mean(0), empirical_mean, epsilon = 1e-9);
            assert_abs_diff_eq!(
                gmm.component_standard_deviation(0),
                empirical_std,
                epsilon = 1e-9
            );
            assert_abs_diff_eq!(gmm.component_weight(0), 1., epsilon = 1e-12);

            // four standard errors around the generating parameters
            let n = n as f64;
            assert_abs_diff_eq!(gmm.component_mean(0), mean, epsilon = 4. * std_dev / n.sqrt());
            assert_abs_diff_eq!(
                gmm.component_standard_deviation(0),
                std_dev,
                epsilon = 4. * std_dev / (2. * n).sqrt()
            );
        }
    }

    #[test]
    fn fit_separates_two_components() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let observations = generate_univariate_blobs(500, &[-4., 6.], &[1., 2.], &mut rng);

        for init in &[GmmInitMethod::Random, GmmInitMethod::KMeans] {
            let gmm = GaussianMixtureModel::params(2)
                .init_method(*init)
                .n_runs(3)
                .with_rng(rng.clone())
                .fit(&DatasetBase::from(observations.view()))
                .unwrap();

            let (low, high) = if gmm.component_mean(0) < gmm.component_mean(1) {
                (0, 1)
            } else {
                (1, 0)
            };
            assert_abs_diff_eq!(gmm.component_mean(low), -4., epsilon = 0.3);
            assert_abs_diff_eq!(gmm.component_mean(high), 6., epsilon = 0.3);
            assert_abs_diff_eq!(gmm.component_standard_deviation(low), 1., epsilon = 0.2);
            assert_abs_diff_eq!(gmm.component_standard_deviation(high), 2., epsilon = 0.3);
            assert_abs_diff_eq!(gmm.component_weight(low), 0.5, epsilon = 0.05);
            assert_abs_diff_eq!(gmm.weights().sum(), 1., epsilon = 1e-10);
        }
    }

    #[test]
    fn more_runs_never_lower_the_log_likelihood() {
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let observations = generate_univariate_blobs(100, &[0., 5., 12.], &[1., 1., 1.], &mut rng);
        let dataset = DatasetBase::from(observations.view());

        let one = GaussianMixtureModel::params(3)
            .with_rng(rng.clone())
            .fit(&dataset)
            .unwrap();
        let many = GaussianMixtureModel::params(3)
            .n_runs(5)
            .with_rng(rng)
            .fit(&dataset)
            .unwrap();
        assert!(many.log_likelihood(&observations) >= one.log_likelihood(&observations) - 1e-9);
    }

    #[test]
    fn fit_rejects_degenerate_data() {
        let params = GaussianMixtureModel::params(3).check().unwrap();

        let res = params.fit(&DatasetBase::from(array![1., 2.]));
        assert!(matches!(
            res,
            Err(GmmError::InvalidClusterCount {
                n_clusters: 3,
                n_samples: 2
            })
        ));

        let res = params.fit(&DatasetBase::from(Array1::<f64>::zeros(0)));
        assert!(matches!(res, Err(GmmError::StatrixError(_))));

        let res = params.fit(&DatasetBase::from(array![4., 4., 4., 4.]));
        assert!(matches!(res, Err(GmmError::ZeroVariance)));
    }
}
