use crate::gaussian_mixture::errors::{GmmError, Result};
use crate::gaussian_mixture::gaussian::Gaussian;
use crate::k_means::{KMeans, KMeansError, KMeansInit};
use ndarray::{Array1, ArrayView1, Axis};
use ndarray_rand::rand::Rng;
use statrix::{Float, ParamGuard};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A specifier for the method used for the initialization of the fitting algorithm of GMM
pub enum GmmInitMethod {
    /// GMM fitting algorithm is initalized with the result of the [KMeans](crate::KMeans) clustering.
    KMeans,
    /// GMM fitting algorithm is initialized with randomly picked observations as means.
    Random,
}

impl GmmInitMethod {
    /// Builds `n_components` starting components together with uniform weights.
    ///
    /// Every component shares the standard deviation of the whole set of observations, only the
    /// means differ between the methods.
    pub fn run<F: Float, R: Rng>(
        &self,
        n_components: usize,
        observations: ArrayView1<F>,
        rng: &mut R,
    ) -> Result<(Vec<Gaussian<F>>, Array1<F>)> {
        let n_samples = observations.len();
        if n_samples == 0 {
            return Err(statrix::error::Error::NotEnoughSamples.into());
        }
        if n_components == 0 || n_components > n_samples {
            return Err(GmmError::InvalidClusterCount {
                n_clusters: n_components,
                n_samples,
            });
        }

        let variance = observations.var_axis(Axis(0), F::zero()).into_scalar();
        if variance == F::zero() {
            return Err(GmmError::ZeroVariance);
        }
        let std_dev = variance.sqrt();

        let means: Vec<F> = match self {
            Self::Random => (0..n_components)
                .map(|_| observations[rng.gen_range(0..n_samples)])
                .collect(),
            Self::KMeans => {
                let records = observations.insert_axis(Axis(1));
                let model = KMeans::params(n_components)
                    .init_method(KMeansInit::Random)
                    .check()
                    .map_err(KMeansError::from)?
                    .run_with(records, rng)?;
                model.centroids().column(0).to_vec()
            }
        };

        let components = means
            .into_iter()
            .map(|mean| Gaussian::new(mean, std_dev))
            .collect();
        let weights = Array1::from_elem(n_components, F::one() / F::cast(n_components));
        Ok((components, weights))
    }
}
