//! Deterministic synthetic splat tensors for tests, benchmarks and the demo binary.

use crate::core::splat::{ALPHA, COLOR, DEPTH, SPLAT_FIELDS};
use crate::core::SplatTensor;
use crate::error::{Error, Result};
use ndarray::Array3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Distance between consecutive layers.
const LAYER_SPACING: f32 = 4.0;

/// Builds a scene of `layers` translucent surfaces stacked in depth.
///
/// Every pixel gets between `max_splats / 2` and `max_splats` splats, each drawn from a
/// random layer with normally distributed depth jitter; the remaining rows are padding.
pub fn layered_scene(
    height: usize,
    width: usize,
    max_splats: usize,
    layers: usize,
    seed: u64,
) -> Result<SplatTensor> {
    if layers == 0 {
        return Err(Error::Config("layers must be greater than 0".to_string()));
    }
    let mut rng = SmallRng::seed_from_u64(seed);
    let jitter = Normal::new(0.0f32, LAYER_SPACING * 0.05)
        .map_err(|e| Error::Config(format!("invalid jitter: {}", e)))?;

    let palette: Vec<[f32; 3]> = (0..layers)
        .map(|_| [rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>()])
        .collect();

    let mut data = Array3::<f32>::zeros((height * width, max_splats, SPLAT_FIELDS));
    for (pixel_idx, mut pixel) in data.outer_iter_mut().enumerate() {
        // Surfaces tilt slightly across the image so depths differ per pixel.
        let tilt = 1.0 + (pixel_idx % width.max(1)) as f32 / width.max(1) as f32;
        let n_splats = if max_splats == 0 {
            0
        } else {
            rng.random_range(max_splats / 2..=max_splats)
        };

        for mut row in pixel.outer_iter_mut().take(n_splats) {
            let layer = rng.random_range(0..layers);
            let depth = (1.0 + layer as f32 * LAYER_SPACING) * tilt + jitter.sample(&mut rng);
            row[ALPHA] = rng.random_range(0.05f32..0.6);
            row[DEPTH] = depth.max(1e-3);
            for channel in 0..3 {
                row[COLOR + channel] = palette[layer][channel];
            }
        }
    }

    SplatTensor::new(height, width, data)
}
