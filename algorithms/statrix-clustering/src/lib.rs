//! `statrix-clustering` provides pure Rust implementations of two classical ways of grouping
//! observations, built on top of [`ndarray`](https://docs.rs/ndarray).
//!
//! ## The big picture
//!
//! `statrix-clustering` is the algorithm crate of the `statrix` workspace. The shared pieces
//! (datasets, the `Fit`/`Predict` traits, hyperparameter checking) live in `statrix`, while this
//! crate hosts the models themselves.
//!
//! ## Current state
//!
//! Right now `statrix-clustering` provides the following algorithms:
//! * [K-Means](KMeans), with [random, K-means++ and refined start](KMeansInit) initialization
//! * [univariate Gaussian Mixture Models](GaussianMixtureModel), trained with the
//!   [expectation-maximization](EmFit) algorithm
//!
//! Implementation choices, algorithmic details and tutorials can be found in the page dedicated to the specific algorithms.
mod gaussian_mixture;
#[allow(clippy::new_ret_no_self)]
mod k_means;
mod utils;

pub use gaussian_mixture::*;
pub use k_means::*;
pub use utils::*;
