use ndarray::{s, Array1, Array2, ArrayBase, Data, Ix2, Zip};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::{Distribution, StandardNormal};
use statrix::Float;

fn standard_normal<F: Float>(rng: &mut impl Rng) -> F {
    let z: f64 = StandardNormal.sample(rng);
    F::cast(z)
}

/// Given an input matrix `blob_centroids`, with shape `(n_blobs, n_features)`,
/// generate `blob_size` data points (a "blob") around each of the blob centroids.
///
/// Every feature of a point is drawn from a normal distribution centered on the matching
/// feature of its blob centroid, with standard deviation `spread`. Blobs are laid out one after
/// the other, so rows `i * blob_size..(i + 1) * blob_size` belong to the `i`-th centroid.
///
/// `generate_blobs` can be used to quickly assemble a synthetic dataset to test or
/// benchmark K-Means on a best-case scenario input.
pub fn generate_blobs<F: Float>(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    spread: F,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_centroids, n_features) = blob_centroids.dim();
    let mut blobs = Array2::zeros((n_centroids * blob_size, n_features));

    for (blob_index, blob_centroid) in blob_centroids.rows().into_iter().enumerate() {
        let mut blob = blobs.slice_mut(s![blob_index * blob_size..(blob_index + 1) * blob_size, ..]);
        for mut point in blob.rows_mut() {
            Zip::from(&mut point)
                .and(&blob_centroid)
                .for_each(|x, &center| *x = center + spread * standard_normal::<F>(rng));
        }
    }
    blobs
}

/// Univariate counterpart of [`generate_blobs`]: `blob_size` values drawn from
/// `N(means[i], std_devs[i])` for every `i`, concatenated in order.
///
/// Handy to produce samples of a Gaussian mixture with equal weights.
pub fn generate_univariate_blobs<F: Float>(
    blob_size: usize,
    means: &[F],
    std_devs: &[F],
    rng: &mut impl Rng,
) -> Array1<F> {
    assert_eq!(
        means.len(),
        std_devs.len(),
        "Every blob needs a mean and a standard deviation."
    );
    means
        .iter()
        .zip(std_devs.iter())
        .flat_map(|(&mean, &std_dev)| std::iter::repeat((mean, std_dev)).take(blob_size))
        .map(|(mean, std_dev)| mean + std_dev * standard_normal::<F>(rng))
        .collect()
}
