use log::debug;
use ndarray::{Array1, Array2, ArrayView2, Zip};
use statrix::Float;

use super::algorithm::closest_centroid;

/// A single assignment + update pass of Lloyd's algorithm.
///
/// Implementors are bound to a set of observations when they are built; every call to
/// [`iterate`](LloydStep::iterate) reads the current `centroids` and writes the refined ones into
/// `new_centroids`, which must have the same shape.
pub trait LloydStep<F: Float> {
    /// Performs one iteration and returns the inertia of the assignment made against `centroids`.
    fn iterate(&mut self, centroids: &Array2<F>, new_centroids: &mut Array2<F>) -> F;

    /// Number of times a cluster ended up without any observation since the step was bound.
    fn n_empty_clusters(&self) -> usize;
}

/// Selects the [`LloydStep`] implementation used by the orchestrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KMeansStep {
    /// Brute force assignment against every centroid, see [`NaiveKMeans`]
    Naive,
}

impl KMeansStep {
    /// Builds the iteration strategy for `observations`
    pub fn bind<'a, F: Float>(&self, observations: ArrayView2<'a, F>) -> Box<dyn LloydStep<F> + 'a> {
        match self {
            Self::Naive => Box::new(NaiveKMeans::new(observations)),
        }
    }
}

/// Brute force Lloyd iteration.
///
/// Every observation is compared against every centroid, so one pass costs `O(N K D)`. The new
/// centroid of a cluster is the mean of the observations assigned to it. A cluster which received
/// no observation keeps its previous centroid.
#[derive(Debug)]
pub struct NaiveKMeans<'a, F: Float> {
    observations: ArrayView2<'a, F>,
    memberships: Array1<usize>,
    n_empty_clusters: usize,
}

impl<'a, F: Float> NaiveKMeans<'a, F> {
    pub fn new(observations: ArrayView2<'a, F>) -> Self {
        NaiveKMeans {
            memberships: Array1::zeros(observations.nrows()),
            observations,
            n_empty_clusters: 0,
        }
    }

    /// Cluster index of every observation after the last iteration
    pub fn memberships(&self) -> &Array1<usize> {
        &self.memberships
    }
}

impl<'a, F: Float> LloydStep<F> for NaiveKMeans<'a, F> {
    fn iterate(&mut self, centroids: &Array2<F>, new_centroids: &mut Array2<F>) -> F {
        assert_eq!(
            centroids.dim(),
            new_centroids.dim(),
            "Both centroid buffers must have the same shape."
        );

        let mut inertia = F::zero();
        Zip::from(self.observations.rows())
            .and(&mut self.memberships)
            .for_each(|observation, membership| {
                let (closest, dist) = closest_centroid(centroids, &observation);
                *membership = closest;
                inertia += dist;
            });

        let mut counts = vec![0usize; centroids.nrows()];
        new_centroids.fill(F::zero());
        Zip::from(self.observations.rows())
            .and(&self.memberships)
            .for_each(|observation, &membership| {
                let mut centroid = new_centroids.row_mut(membership);
                centroid += &observation;
                counts[membership] += 1;
            });

        let mut n_empty = 0;
        for (k, (mut centroid, &count)) in new_centroids
            .rows_mut()
            .into_iter()
            .zip(counts.iter())
            .enumerate()
        {
            if count == 0 {
                centroid.assign(&centroids.row(k));
                n_empty += 1;
            } else {
                centroid /= F::cast(count);
            }
        }
        if n_empty > 0 {
            debug!("{} empty clusters kept their previous centroid", n_empty);
            self.n_empty_clusters += n_empty;
        }

        inertia
    }

    fn n_empty_clusters(&self) -> usize {
        self.n_empty_clusters
    }
}
