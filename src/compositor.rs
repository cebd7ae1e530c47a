//! Front-to-back alpha compositing of depth-ordered clusters into final pixel colors.

use crate::core::{Cluster, ClusteredImage};
use ndarray::{Array3, Axis};
use rayon::prelude::*;

/// Compositing stops once the remaining transmittance drops to this value.
pub const MINIMUM_TRANSMITTANCE: f32 = 0.001;

/// Composites clusters sorted front to back into one RGB color.
pub fn composite_pixel(clusters: &[Cluster]) -> [f32; 3] {
    let mut transmittance = 1.0f32;
    let mut color = [0.0f32; 3];

    for cluster in clusters {
        if cluster.is_transparent() {
            continue;
        }
        if transmittance <= MINIMUM_TRANSMITTANCE {
            break;
        }
        for (out, &channel) in color.iter_mut().zip(&cluster.color) {
            *out += cluster.alpha * channel * transmittance;
        }
        transmittance *= 1.0 - cluster.alpha.min(1.0);
    }
    color
}

/// Composites every pixel into an `(H, W, 3)` image.
pub fn composite_image(image: &ClusteredImage) -> Array3<f32> {
    let mut out = Array3::<f32>::zeros((image.height(), image.width(), 3));
    let colors: Vec<[f32; 3]> = image
        .pixels()
        .par_iter()
        .map(|clusters| composite_pixel(clusters))
        .collect();

    for (mut row, row_colors) in out
        .axis_iter_mut(Axis(0))
        .zip(colors.chunks(image.width().max(1)))
    {
        for (mut pixel, color) in row.axis_iter_mut(Axis(0)).zip(row_colors) {
            pixel[0] = color[0];
            pixel[1] = color[1];
            pixel[2] = color[2];
        }
    }
    out
}

/// Clamps to `[0, 1]` and quantizes to interleaved 8-bit RGB.
pub fn to_rgb8(image: &Array3<f32>) -> Vec<u8> {
    image
        .iter()
        .map(|&value| (value.clamp(0.0, 1.0) * 255.0) as u8)
        .collect()
}
