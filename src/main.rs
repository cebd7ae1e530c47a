use log::info;
use splat_cluster::compositor::composite_image;
use splat_cluster::synthetic::layered_scene;
use splat_cluster::visualization::print_cluster_analysis;
use splat_cluster::{ClusteringHarness, Config};

const IMAGE_HEIGHT: usize = 64;
const IMAGE_WIDTH: usize = 64;
const MAX_SPLATS: usize = 128;
const SCENE_LAYERS: usize = 4;

fn main() {
    let config = Config::from_file("demos/config.yaml").expect("Failed to load configuration");
    config.setup_logging();

    let seed = config.rng_seed.unwrap_or(42);
    let tensor = layered_scene(IMAGE_HEIGHT, IMAGE_WIDTH, MAX_SPLATS, SCENE_LAYERS, seed)
        .expect("Failed to generate synthetic scene");

    let mut harness =
        ClusteringHarness::from_config(tensor, &config).expect("Failed to build clustering harness");
    let clustered = harness.compute().expect("Clustering failed");
    print_cluster_analysis(&clustered);

    let image = composite_image(&clustered);
    let n_pixels = (IMAGE_HEIGHT * IMAGE_WIDTH) as f32;
    let mean: Vec<f32> = (0..3)
        .map(|channel| {
            image
                .index_axis(ndarray::Axis(2), channel)
                .sum()
                / n_pixels
        })
        .collect();
    info!("Mean composited color: {:?}", mean);
}
