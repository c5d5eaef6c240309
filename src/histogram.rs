//! Histogram bucketing of univariate data
//!
//! Two flavours are provided: [`histogram`] splits the observed range into a number of
//! equal-width bins, [`histogram_with_edges`] counts values against caller-provided bin edges.
use ndarray::{Array1, ArrayBase, Data, Ix1};
use num_traits::AsPrimitive;

use crate::error::{Error, Result};
use crate::Float;

/// Number of bins used by numpy-like histograms when nothing else is specified
pub const DEFAULT_N_BINS: usize = 10;

/// Count the values of `v` falling in each of `n_bins` equal-width bins spanning `[min(v), max(v)]`.
///
/// The right-most bin is closed, so the maximum lands in the last bin and the counts always sum up
/// to `v.len()`.
///
/// # Errors
///
/// * `v` is empty or contains non-finite values
/// * `n_bins` is zero
/// * all values are equal and more than one bin is requested
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use statrix::histogram::histogram;
///
/// let counts = histogram(&array![1.0, 2.0, 2.5, 4.0], 3).unwrap();
/// assert_eq!(counts, array![1, 2, 1]);
/// ```
pub fn histogram<F: Float, D: Data<Elem = F>>(
    v: &ArrayBase<D, Ix1>,
    n_bins: usize,
) -> Result<Array1<usize>> {
    if v.is_empty() {
        return Err(Error::Histogram("cannot bucket an empty vector".to_string()));
    }
    if n_bins == 0 {
        return Err(Error::Histogram("number of bins must be positive".to_string()));
    }
    if v.iter().any(|x| !x.is_finite()) {
        return Err(Error::Histogram("values must be finite".to_string()));
    }

    let (min, max) = v.iter().fold((F::infinity(), F::neg_infinity()), |(lo, hi), &x| {
        (lo.min(x), hi.max(x))
    });
    let range = max - min;

    let mut counts = Array1::zeros(n_bins);
    if n_bins == 1 {
        counts[0] = v.len();
        return Ok(counts);
    }
    if range == F::zero() {
        return Err(Error::Histogram(format!(
            "bin size cannot be zero with {} bins",
            n_bins
        )));
    }

    // values lying on an inner edge open the upper bin
    let n_bins_f = F::cast(n_bins);
    for &x in v.iter() {
        let idx: usize = ((x - min) * n_bins_f / range).floor().as_();
        counts[idx.min(n_bins - 1)] += 1;
    }

    Ok(counts)
}

/// Count the values of `v` falling between consecutive `bin_edges`.
///
/// Bin `i` covers `[bin_edges[i], bin_edges[i + 1])`, except the last one which also includes its
/// right edge. Values outside of `[bin_edges[0], bin_edges[n]]` are ignored, hence the counts sum up
/// to the number of values inside the edges.
///
/// # Errors
///
/// * fewer than two bin edges are given
/// * the bin edges are not strictly increasing
pub fn histogram_with_edges<F: Float, D: Data<Elem = F>, E: Data<Elem = F>>(
    v: &ArrayBase<D, Ix1>,
    bin_edges: &ArrayBase<E, Ix1>,
) -> Result<Array1<usize>> {
    if bin_edges.len() < 2 {
        return Err(Error::Histogram(
            "at least two bin edges are required".to_string(),
        ));
    }
    let edges = bin_edges.to_vec();
    if edges.windows(2).any(|w| !(w[0] < w[1])) {
        return Err(Error::Histogram(
            "bin edges must be strictly increasing".to_string(),
        ));
    }

    let n_bins = edges.len() - 1;
    let (lowest, highest) = (edges[0], edges[n_bins]);
    let mut counts = Array1::zeros(n_bins);
    for &x in v.iter() {
        if !(x >= lowest && x <= highest) {
            continue;
        }
        // number of edges at or below `x`, the bin is the one starting at the last of them
        let idx = edges.partition_point(|&edge| edge <= x) - 1;
        counts[idx.min(n_bins - 1)] += 1;
    }

    Ok(counts)
}
