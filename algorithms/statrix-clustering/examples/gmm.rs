use ndarray::Array1;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use statrix::histogram::histogram;
use statrix::traits::{Fit, Predict};
use statrix::DatasetBase;
use statrix_clustering::{GaussianMixtureModel, GmmInitMethod};

// Draw observations from a known mixture, fit a fresh mixture on them and compare.
fn main() {
    let mut rng = Xoshiro256Plus::seed_from_u64(42);

    let truth = GaussianMixtureModel::from_parameters(
        Array1::from(vec![0.2, 0.5, 0.3]),
        Array1::from(vec![-6., 0., 7.]),
        Array1::from(vec![1., 1.5, 0.8]),
    )
    .expect("valid mixture");

    // pick a component according to the weights, then draw from it
    let observations: Array1<f64> = (0..3000)
        .map(|i| {
            let k = match i % 10 {
                0 | 1 => 0,
                2..=6 => 1,
                _ => 2,
            };
            truth.components()[k].sample(&mut rng)
        })
        .collect();

    let counts = histogram(&observations, 20).expect("histogram");
    println!("histogram of the observations: {}", counts);

    let dataset = DatasetBase::from(observations.view());
    for init in &[GmmInitMethod::Random, GmmInitMethod::KMeans] {
        let gmm = GaussianMixtureModel::params(truth.n_components())
            .init_method(*init)
            .n_runs(5)
            .with_rng(rng.clone())
            .fit(&dataset)
            .expect("GMM fitting");

        println!("{:?} initialization:", init);
        println!("  weights {:.3}", gmm.weights());
        println!("  means {:.3}", gmm.means());
        println!("  standard deviations {:.3}", gmm.standard_deviations());
        println!("  log-likelihood {:.2}", gmm.log_likelihood(&observations));

        let labels: Array1<usize> = gmm.predict(&observations);
        let mut sizes = vec![0; gmm.n_components()];
        labels.iter().for_each(|&l| sizes[l] += 1);
        println!("  observations per component {:?}", sizes);
    }

    println!("a draw from the fitted weighted sum: {:.3}", truth.sample(&mut rng));
}
