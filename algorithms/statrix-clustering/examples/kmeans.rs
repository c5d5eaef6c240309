use ndarray::{array, Axis};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use statrix::traits::Fit;
use statrix::DatasetBase;
use statrix_clustering::{generate_blobs, KMeans, KMeansInit};

// A routine K-means task: build a synthetic dataset, fit the algorithm on it
// with every initialization strategy and report what was found.
fn main() {
    // Our random number generator, seeded for reproducibility
    let mut rng = Xoshiro256Plus::seed_from_u64(42);

    // For each our expected centroids, generate `n` data points around it (a "blob")
    let expected_centroids = array![[10., 10.], [1., 12.], [20., 30.], [-20., 30.],];
    let n = 10000;
    let dataset = DatasetBase::from(generate_blobs(n, &expected_centroids, 1., &mut rng));
    let n_clusters = expected_centroids.len_of(Axis(0));

    for (name, init) in vec![
        ("random", KMeansInit::Random),
        ("k-means++", KMeansInit::KMeansPlusPlus),
        ("refined start", KMeansInit::refined_start()),
    ] {
        // Configure our training algorithm, fit it and assign each point to a cluster
        let (model, memberships) = KMeans::params_with_rng(n_clusters, rng.clone())
            .init_method(init)
            .n_runs(3)
            .max_n_iterations(200)
            .tolerance(1e-5)
            .fit_predict(&dataset)
            .expect("KMeans fitted");

        println!("{} initialization, inertia {:.2}", name, model.inertia());
        for (centroid, count) in model.centroids().rows().into_iter().zip(model.cluster_count()) {
            println!("  centroid {} holds {} points", centroid, count);
        }
        println!(
            "  first observations belong to clusters {:?}",
            memberships.iter().take(5).collect::<Vec<_>>()
        );
    }

    // Going through `Fit` directly gives the model without the memberships
    let model = KMeans::params_with_rng(n_clusters, rng)
        .init_method(KMeansInit::KMeansPlusPlus)
        .fit(&dataset)
        .expect("KMeans fitted");
    println!("k-means++ single run inertia {:.2}", model.inertia());
}
