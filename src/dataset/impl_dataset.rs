use super::{DatasetBase, Float, Records};
use crate::traits::{Predict, PredictInplace};
use ndarray::{ArrayBase, Data, Ix1, Ix2};

impl<R: Records, T> DatasetBase<R, T> {
    /// Create a new dataset from records and targets
    ///
    /// # Example
    ///
    /// ```ignore
    /// let dataset = Dataset::new(records, targets);
    /// ```
    pub fn new(records: R, targets: T) -> DatasetBase<R, T> {
        DatasetBase { records, targets }
    }

    /// Returns reference to records
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Returns reference to targets
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Updates the targets of a dataset
    pub fn with_targets<U>(self, targets: U) -> DatasetBase<R, U> {
        DatasetBase {
            records: self.records,
            targets,
        }
    }

    /// Number of observations in the records
    pub fn nsamples(&self) -> usize {
        self.records.nsamples()
    }

    /// Number of features of every observation
    pub fn nfeatures(&self) -> usize {
        self.records.nfeatures()
    }
}

impl<F: Float, D: Data<Elem = F>> From<ArrayBase<D, Ix2>> for DatasetBase<ArrayBase<D, Ix2>, ()> {
    fn from(records: ArrayBase<D, Ix2>) -> Self {
        DatasetBase {
            records,
            targets: (),
        }
    }
}

impl<F: Float, D: Data<Elem = F>> From<ArrayBase<D, Ix1>> for DatasetBase<ArrayBase<D, Ix1>, ()> {
    fn from(records: ArrayBase<D, Ix1>) -> Self {
        DatasetBase {
            records,
            targets: (),
        }
    }
}

impl<F: Float, T, D: Data<Elem = F>> From<(ArrayBase<D, Ix2>, T)>
    for DatasetBase<ArrayBase<D, Ix2>, T>
{
    fn from(rec_tar: (ArrayBase<D, Ix2>, T)) -> Self {
        DatasetBase {
            records: rec_tar.0,
            targets: rec_tar.1,
        }
    }
}

/// Predict the targets of a two-dimensional array and wrap both into a dataset
impl<F: Float, D: Data<Elem = F>, T, O> Predict<ArrayBase<D, Ix2>, DatasetBase<ArrayBase<D, Ix2>, T>>
    for O
where
    O: PredictInplace<ArrayBase<D, Ix2>, T>,
{
    fn predict(&self, records: ArrayBase<D, Ix2>) -> DatasetBase<ArrayBase<D, Ix2>, T> {
        let mut targets = self.default_target(&records);
        self.predict_inplace(&records, &mut targets);
        DatasetBase::new(records, targets)
    }
}

/// Predict the targets of a dataset, replacing the previous targets
impl<R: Records, S, T, O> Predict<DatasetBase<R, S>, DatasetBase<R, T>> for O
where
    O: PredictInplace<R, T>,
{
    fn predict(&self, ds: DatasetBase<R, S>) -> DatasetBase<R, T> {
        let mut targets = self.default_target(&ds.records);
        self.predict_inplace(&ds.records, &mut targets);
        ds.with_targets(targets)
    }
}

/// Predict the targets of borrowed records
impl<'a, R: Records, T, O> Predict<&'a R, T> for O
where
    O: PredictInplace<R, T>,
{
    fn predict(&self, records: &'a R) -> T {
        let mut targets = self.default_target(records);
        self.predict_inplace(records, &mut targets);
        targets
    }
}
