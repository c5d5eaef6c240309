use ndarray::{Array1, Array2, ArrayView1, Axis};
use statrix::Float;

use super::gaussian::{mixture_density, Gaussian};

/// One expectation-maximization step for a univariate Gaussian mixture.
///
/// The step is bound to the observations it refines the mixture against; the components and
/// weights are updated in place, so several steps can be chained by the caller until the
/// log-likelihood stops improving.
#[derive(Debug, Clone)]
pub struct EmFit<'a, F: Float> {
    observations: ArrayView1<'a, F>,
}

impl<'a, F: Float> EmFit<'a, F> {
    pub fn new(observations: ArrayView1<'a, F>) -> Self {
        EmFit { observations }
    }

    /// Refines `components` and `weights` with one E-step and one M-step.
    ///
    /// A component which receives no responsibility at all keeps its distribution and ends up
    /// with a zero weight. A component whose re-estimated variance is zero keeps its previous
    /// distribution as well.
    pub fn step(&self, components: &mut [Gaussian<F>], weights: &mut Array1<F>) {
        assert_eq!(
            components.len(),
            weights.len(),
            "Every component needs exactly one weight."
        );

        let responsibilities = self.responsibilities(components, weights);
        let totals = responsibilities.sum_axis(Axis(0));
        let n_samples = F::cast(self.observations.len());

        for (k, component) in components.iter_mut().enumerate() {
            let total = totals[k];
            weights[k] = total / n_samples;
            if total == F::zero() {
                continue;
            }

            let resp = responsibilities.column(k);
            let mean = resp
                .iter()
                .zip(self.observations.iter())
                .map(|(&r, &x)| r * x)
                .sum::<F>()
                / total;
            let variance = resp
                .iter()
                .zip(self.observations.iter())
                .map(|(&r, &x)| r * (x - mean) * (x - mean))
                .sum::<F>()
                / total;

            if variance != F::zero() {
                *component = Gaussian::new(mean, variance.sqrt());
            }
        }
    }

    /// Posterior probability of every component for every observation, `(n_samples, n_components)`.
    ///
    /// Rows are normalized to one, except rows where every weighted density vanished.
    pub fn responsibilities(&self, components: &[Gaussian<F>], weights: &Array1<F>) -> Array2<F> {
        let mut responsibilities = Array2::zeros((self.observations.len(), components.len()));
        for (mut row, &x) in responsibilities
            .rows_mut()
            .into_iter()
            .zip(self.observations.iter())
        {
            row.iter_mut()
                .zip(components.iter().zip(weights.iter()))
                .for_each(|(r, (component, &weight))| *r = weight * component.pdf(x));
            let sum = row.sum();
            if sum != F::zero() {
                row /= sum;
            }
        }
        responsibilities
    }

    /// Sum of the log densities of the mixture at every observation. Observations where the
    /// mixture density is exactly zero are left out.
    pub fn log_likelihood(&self, components: &[Gaussian<F>], weights: &Array1<F>) -> F {
        self.observations
            .iter()
            .map(|&x| mixture_density(components, weights, x))
            .filter(|&density| density != F::zero())
            .map(|density| density.ln())
            .sum()
    }
}
