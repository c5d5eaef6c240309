use super::algorithm::{squared_distance, KMeans};
use super::errors::{KMeansError, KMeansParamsError};
use log::warn;
use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};
use ndarray_rand::rand;
use ndarray_rand::rand::distributions::{Distribution, WeightedIndex};
use ndarray_rand::rand::Rng;
use statrix::{Float, ParamGuard};

#[derive(Clone, Debug, PartialEq)]
/// Specifies centroid initialization algorithm for KMeans.
pub enum KMeansInit<F: Float> {
    /// Pick `n_clusters` observations uniformly at random, with replacement. The same observation
    /// may therefore be picked more than once.
    Random,
    /// K-means++ algorithm. Using this over random initialization causes K-means to converge
    /// faster for almost all cases, since K-means++ produces better centroids.
    KMeansPlusPlus,
    /// Refined start of Bradley and Fayyad. `n_samplings` random subsets holding a
    /// `sample_factor` fraction of the observations are clustered on their own, then the
    /// centroids found on every subset are clustered once more into the final centroids.
    RefinedStart { n_samplings: usize, sample_factor: F },
}

impl<F: Float> KMeansInit<F> {
    /// Refined start with 100 sampling rounds of 3% of the observations each
    pub fn refined_start() -> Self {
        KMeansInit::RefinedStart {
            n_samplings: 100,
            sample_factor: F::cast(0.03),
        }
    }

    /// Runs the chosen initialization routine and returns a `(n_clusters, n_features)` matrix.
    pub fn run<R: Rng>(
        &self,
        n_clusters: usize,
        observations: ArrayView2<F>,
        rng: &mut R,
    ) -> Result<Array2<F>, KMeansError> {
        let n_samples = observations.nrows();
        if n_clusters == 0 {
            return Err(KMeansParamsError::NClusters.into());
        }
        if n_samples == 0 {
            return Err(KMeansError::NotEnoughSamples);
        }
        if n_clusters > n_samples {
            return Err(KMeansError::InvalidClusterCount {
                n_clusters,
                n_samples,
            });
        }

        match self {
            Self::Random => Ok(random_init(n_clusters, observations, rng)),
            Self::KMeansPlusPlus => Ok(k_means_pp(n_clusters, observations, rng)),
            Self::RefinedStart {
                n_samplings,
                sample_factor,
            } => refined_start(n_clusters, *n_samplings, *sample_factor, observations, rng),
        }
    }
}

fn random_init<F: Float>(
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let n_samples = observations.nrows();
    let indices: Vec<usize> = (0..n_clusters)
        .map(|_| rng.gen_range(0..n_samples))
        .collect();
    observations.select(Axis(0), &indices)
}

fn k_means_pp<F: Float>(
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, n_features) = observations.dim();
    let mut centroids = Array2::zeros((n_clusters, n_features));
    let mut chosen = vec![false; n_samples];

    let first = rng.gen_range(0..n_samples);
    chosen[first] = true;
    centroids.row_mut(0).assign(&observations.row(first));

    // squared distance of every observation to its closest chosen centroid
    let mut dists: Array1<F> = observations
        .rows()
        .into_iter()
        .map(|observation| squared_distance(&observation, &centroids.row(0)))
        .collect();

    for c_cnt in 1..n_clusters {
        for (dist, &taken) in dists.iter_mut().zip(chosen.iter()) {
            if taken {
                *dist = F::zero();
            }
        }

        let centroid_idx = match WeightedIndex::new(dists.iter()) {
            Ok(weights) => weights.sample(rng),
            Err(_) => {
                warn!(
                    "k-means++ found no observation away from the {} chosen centroids, picking uniformly",
                    c_cnt
                );
                let remaining: Vec<usize> = (0..n_samples).filter(|&i| !chosen[i]).collect();
                remaining[rng.gen_range(0..remaining.len())]
            }
        };
        chosen[centroid_idx] = true;
        centroids
            .row_mut(c_cnt)
            .assign(&observations.row(centroid_idx));

        let centroid = centroids.row(c_cnt);
        Zip::from(&mut dists)
            .and(observations.rows())
            .for_each(|dist, observation| {
                let d = squared_distance(&observation, &centroid);
                if d < *dist {
                    *dist = d;
                }
            });
    }
    centroids
}

fn refined_start<F: Float, R: Rng>(
    n_clusters: usize,
    n_samplings: usize,
    sample_factor: F,
    observations: ArrayView2<F>,
    rng: &mut R,
) -> Result<Array2<F>, KMeansError> {
    let (n_samples, n_features) = observations.dim();
    let n_points: usize = (sample_factor * F::cast(n_samples)).floor().as_();
    let n_points = n_points.min(n_samples);
    if n_points < n_clusters {
        return Err(KMeansError::InvalidClusterCount {
            n_clusters,
            n_samples: n_points,
        });
    }
    let params = KMeans::<F>::params(n_clusters)
        .init_method(KMeansInit::Random)
        .check()?;

    let mut pool = Array2::zeros((n_samplings * n_clusters, n_features));
    for mut candidates in pool.axis_chunks_iter_mut(Axis(0), n_clusters) {
        let indices = rand::seq::index::sample(rng, n_samples, n_points).into_vec();
        let subset = observations.select(Axis(0), &indices);
        let model = params.run_with(subset.view(), rng)?;
        candidates.assign(model.centroids());
    }

    // every candidate set seeds one clustering of the pool, the lowest inertia wins
    let mut best: Option<(Array2<F>, F)> = None;
    for candidates in pool.axis_chunks_iter(Axis(0), n_clusters) {
        let (centroids, inertia) = params.refine_from(pool.view(), candidates.to_owned());
        if best
            .as_ref()
            .map_or(true, |(_, min_inertia)| inertia < *min_inertia)
        {
            best = Some((centroids, inertia));
        }
    }
    best.map(|(centroids, _)| centroids)
        .ok_or_else(|| KMeansParamsError::NSamplings.into())
}
