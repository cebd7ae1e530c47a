use crate::core::rng::{pixel_rng, SHUFFLE_STAGE};
use crate::error::{Error, Result};
use ndarray::{s, Array1, Array3, ArrayView1, ArrayView2, Axis};
use ndarray_stats::QuantileExt;
use rand::seq::SliceRandom;
use rayon::prelude::*;

/// Number of fields stored per splat: `(alpha, depth, red, green, blue)`.
pub const SPLAT_FIELDS: usize = 5;
pub const ALPHA: usize = 0;
pub const DEPTH: usize = 1;
pub const COLOR: usize = 2;

/// A single translucent depth sample produced by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Splat {
    pub alpha: f32,
    pub depth: f32,
    pub color: [f32; 3],
}

impl Splat {
    pub fn new(alpha: f32, depth: f32, color: [f32; 3]) -> Self {
        Self {
            alpha,
            depth,
            color,
        }
    }

    /// Reads one `(A, D, R, G, B)` row. Panics if the row has fewer than five fields.
    pub fn from_row(row: ArrayView1<f32>) -> Self {
        Self {
            alpha: row[ALPHA],
            depth: row[DEPTH],
            color: [row[COLOR], row[COLOR + 1], row[COLOR + 2]],
        }
    }

    /// Empty splats (zero alpha or zero depth) are padding and never take part in clustering.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alpha == 0.0 || self.depth == 0.0
    }
}

/// Splats for every pixel of an image, stored densely as `(H * W, max_splats, 5)`.
///
/// Pixels with fewer splats than `max_splats` are padded with all-zero rows.
#[derive(Debug, Clone)]
pub struct SplatTensor {
    height: usize,
    width: usize,
    data: Array3<f32>,
}

impl SplatTensor {
    /// Wraps an already laid out `(H * W, max_splats, 5)` array.
    pub fn new(height: usize, width: usize, data: Array3<f32>) -> Result<Self> {
        let (pixels, _, fields) = data.dim();
        if pixels != height * width {
            return Err(Error::ShapeMismatch {
                what: "pixel count",
                expected: height * width,
                found: pixels,
            });
        }
        if fields != SPLAT_FIELDS {
            return Err(Error::ShapeMismatch {
                what: "splat fields",
                expected: SPLAT_FIELDS,
                found: fields,
            });
        }
        Ok(Self {
            height,
            width,
            data,
        })
    }

    /// Builds a tensor from per-pixel splat lists of varying length, zero padding the short ones.
    pub fn from_pixels(height: usize, width: usize, pixels: &[Vec<Splat>]) -> Result<Self> {
        if pixels.len() != height * width {
            return Err(Error::ShapeMismatch {
                what: "pixel count",
                expected: height * width,
                found: pixels.len(),
            });
        }
        let max_splats = pixels.iter().map(Vec::len).max().unwrap_or(0);
        let mut data = Array3::<f32>::zeros((pixels.len(), max_splats, SPLAT_FIELDS));
        for (pixel_idx, splats) in pixels.iter().enumerate() {
            for (splat_idx, splat) in splats.iter().enumerate() {
                let mut row = data.slice_mut(s![pixel_idx, splat_idx, ..]);
                row[ALPHA] = splat.alpha;
                row[DEPTH] = splat.depth;
                row[COLOR] = splat.color[0];
                row[COLOR + 1] = splat.color[1];
                row[COLOR + 2] = splat.color[2];
            }
        }
        Self::new(height, width, data)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn num_pixels(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn max_splats(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    /// Raw `(max_splats, 5)` view of one pixel.
    pub fn pixel(&self, index: usize) -> ArrayView2<f32> {
        self.data.index_axis(Axis(0), index)
    }

    /// All rows of one pixel (padding included) as splats.
    pub fn pixel_splats(&self, index: usize) -> Vec<Splat> {
        self.pixel(index).rows().into_iter().map(Splat::from_row).collect()
    }

    /// Global minimum and maximum of the strictly positive depths in the tensor.
    pub fn depth_range(&self) -> Option<(f32, f32)> {
        let depths: Array1<f32> = self
            .data
            .slice(s![.., .., DEPTH])
            .iter()
            .copied()
            .filter(|&depth| depth > 0.0)
            .collect();
        if depths.is_empty() {
            return None;
        }
        Some((*depths.min_skipnan(), *depths.max_skipnan()))
    }

    /// Applies an independent uniform permutation to the splats of every pixel.
    pub fn shuffle(&mut self, seed: Option<u64>) {
        self.data
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(index, mut pixel)| {
                let mut rng = pixel_rng(seed, index, SHUFFLE_STAGE);
                let mut order: Vec<usize> = (0..pixel.nrows()).collect();
                order.shuffle(&mut rng);
                let shuffled = pixel.select(Axis(0), &order);
                pixel.assign(&shuffled);
            });
    }
}
