//! Statrix prelude.
//!
//! This module contains the most used types, type aliases, traits and
//! functions that you can import easily as a group.
//!

#[doc(no_inline)]
pub use crate::error::Error;

#[doc(no_inline)]
pub use crate::traits::*;

#[doc(no_inline)]
pub use crate::dataset::{DatasetBase, Float, Records};

#[doc(no_inline)]
pub use crate::param_guard::ParamGuard;

#[doc(no_inline)]
pub use crate::histogram::{histogram, histogram_with_edges};

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn glob_import_leaves_std_result_alone() {
        fn bucket(n_bins: usize) -> Result<usize, Error> {
            Ok(histogram(&array![1., 2., 3.], n_bins)?.sum())
        }
        assert_eq!(bucket(2).unwrap(), 3);
        assert!(matches!(bucket(0), Err(Error::Histogram(_))));
    }
}
