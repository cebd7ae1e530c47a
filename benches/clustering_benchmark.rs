use criterion::{black_box, criterion_group, criterion_main, measurement::WallTime, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use splat_cluster::clustering::{
    combine_splats, Binned, ClusteringStrategy, Epsilon, KMeans, SequentialKMeans,
    SequentialKMeansRandomInit,
};
use splat_cluster::compositor::composite_image;
use splat_cluster::synthetic::layered_scene;
use splat_cluster::{ClusteringHarness, SplatTensor};

const NUMBER_OF_CLUSTERS: usize = 8;

fn scene() -> SplatTensor {
    layered_scene(32, 32, 256, 4, 42).expect("Failed to generate scene")
}

fn strategies(tensor: &SplatTensor) -> Vec<Box<dyn ClusteringStrategy>> {
    vec![
        Box::new(Binned::from_tensor(tensor, NUMBER_OF_CLUSTERS).expect("binned")),
        Box::new(Epsilon::new(0.2).expect("epsilon")),
        Box::new(KMeans::new(NUMBER_OF_CLUSTERS).expect("kmeans")),
        Box::new(SequentialKMeans::new(NUMBER_OF_CLUSTERS).expect("sequential")),
        Box::new(SequentialKMeansRandomInit::new(NUMBER_OF_CLUSTERS).expect("random init")),
    ]
}

fn bench_combine(c: &mut Criterion) {
    let tensor = scene();
    let splats = tensor.pixel_splats(0);

    c.bench_function("commutative_combine_256_splats", |b| {
        b.iter(|| combine_splats(black_box(&splats)));
    });
}

fn bench_pixel_cluster(c: &mut Criterion) {
    let tensor = scene();
    let splats = tensor.pixel_splats(0);
    let mut group = c.benchmark_group("pixel_cluster");

    for strategy in strategies(&tensor) {
        group.bench_function(strategy.name(), |b| {
            let mut rng = SmallRng::seed_from_u64(7);
            b.iter(|| strategy.pixel_cluster(black_box(&splats), &mut rng).expect("cluster"));
        });
    }
    group.finish();
}

fn bench_full_image(c: &mut Criterion) {
    let tensor = scene();
    let mut group = c.benchmark_group("compute_32x32");

    for strategy in strategies(&tensor) {
        let name = strategy.name();
        let mut harness = ClusteringHarness::new(tensor.clone(), strategy).with_seed(1);
        group.bench_function(name, |b| {
            b.iter(|| {
                let clustered = harness.compute().expect("Clustering failed");
                black_box(composite_image(&clustered));
            });
        });
    }
    group.finish();
}

fn criterion_config() -> Criterion<WallTime> {
    Criterion::default().measurement_time(std::time::Duration::new(10, 0))
}

criterion_group!(
    name = benches;
    config = criterion_config();
    targets = bench_combine, bench_pixel_cluster, bench_full_image
);
criterion_main!(benches);
