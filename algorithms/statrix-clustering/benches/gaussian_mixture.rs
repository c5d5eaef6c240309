use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use statrix::traits::Fit;
use statrix::DatasetBase;
use statrix_clustering::{generate_univariate_blobs, GaussianMixtureModel, GmmInitMethod};

fn gaussian_mixture_bench(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(40);
    let cluster_sizes = vec![10, 100, 1000, 10000];
    let means = [-12., -3., 4., 15.];
    let std_devs = [1., 2., 1.5, 3.];

    let mut benchmark = c.benchmark_group("gaussian_mixture");
    benchmark.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    for cluster_size in cluster_sizes {
        let rng = &mut rng;
        let observations = generate_univariate_blobs(cluster_size, &means, &std_devs, rng);
        let dataset = DatasetBase::from(observations);
        for (name, init) in &[
            ("random", GmmInitMethod::Random),
            ("k_means", GmmInitMethod::KMeans),
        ] {
            benchmark.bench_with_input(
                BenchmarkId::new(*name, cluster_size),
                &dataset,
                |bencher, dataset| {
                    bencher.iter(|| {
                        black_box(
                            GaussianMixtureModel::params(means.len())
                                .init_method(*init)
                                .with_rng(rng.clone())
                                .tolerance(1e-3)
                                .max_n_iterations(1000)
                                .fit(dataset)
                                .expect("GMM fitting fail"),
                        )
                    });
                },
            );
        }
    }
    benchmark.finish();
}

criterion_group! {
  name = benches;
  config = Criterion::default();
  targets = gaussian_mixture_bench
}
criterion_main!(benches);
