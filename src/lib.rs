//! `statrix` provides the shared building blocks of a small statistical learning toolkit
//! built on top of [`ndarray`](https://docs.rs/ndarray).
//!
//! ## The big picture
//!
//! The algorithms themselves live in their own crates (for example `statrix-clustering`,
//! which hosts K-Means and univariate Gaussian Mixture Models). This crate contains what
//! they have in common:
//!
//! * the [`Float`] trait, implemented for `f32` and `f64`;
//! * [`DatasetBase`], a thin pairing of records and targets, together with the
//!   [`Records`](dataset::Records) trait;
//! * the [`Fit`](traits::Fit), [`Predict`](traits::Predict) and
//!   [`Transformer`](traits::Transformer) traits shared by every model;
//! * [`ParamGuard`], which validates hyperparameters before fitting;
//! * histogram bucketing of one-dimensional data in [`histogram`].
//!
//! ## Current state
//!
//! Every algorithm crate follows the same pattern: a `*Params` builder is validated into
//! `*ValidParams`, which implements `Fit` and produces a model. The model answers queries
//! through `Predict`/`PredictInplace`.

pub mod dataset;
pub mod error;
pub mod histogram;
mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{DatasetBase, Float};
pub use param_guard::ParamGuard;
