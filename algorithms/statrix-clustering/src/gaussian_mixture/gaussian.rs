use ndarray::Array1;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::{Distribution, StandardNormal};
use statrix::Float;

/// Univariate normal distribution, one component of a [mixture](crate::GaussianMixtureModel).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gaussian<F> {
    mean: F,
    std_dev: F,
}

impl<F: Float> Gaussian<F> {
    pub fn new(mean: F, std_dev: F) -> Self {
        Gaussian { mean, std_dev }
    }

    /// Zero mean, unit standard deviation
    pub fn standard() -> Self {
        Gaussian::new(F::zero(), F::one())
    }

    pub fn mean(&self) -> F {
        self.mean
    }

    pub fn standard_deviation(&self) -> F {
        self.std_dev
    }

    pub fn variance(&self) -> F {
        self.std_dev * self.std_dev
    }

    /// Density of the distribution at `x`
    pub fn pdf(&self, x: F) -> F {
        let z = (x - self.mean) / self.std_dev;
        let norm = self.std_dev * F::cast(2. * std::f64::consts::PI).sqrt();
        (-(z * z) / F::cast(2.)).exp() / norm
    }

    /// Draws one value from the distribution
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> F {
        let z: f64 = StandardNormal.sample(rng);
        self.mean + self.std_dev * F::cast(z)
    }
}

/// Density of the mixture at `x`
pub(crate) fn mixture_density<F: Float>(components: &[Gaussian<F>], weights: &Array1<F>, x: F) -> F {
    components
        .iter()
        .zip(weights.iter())
        .map(|(component, &weight)| weight * component.pdf(x))
        .sum()
}
