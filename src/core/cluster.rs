use ndarray::Array3;

/// Number of fields in a finalized cluster: `(alpha, red, green, blue)`.
pub const CLUSTER_FIELDS: usize = 4;

/// Finalized cluster: combined opacity and alpha-weighted mean color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cluster {
    pub alpha: f32,
    pub color: [f32; 3],
}

impl Cluster {
    /// A cluster without any contributing alpha mass.
    pub const EMPTY: Cluster = Cluster {
        alpha: 0.0,
        color: [0.0; 3],
    };

    pub fn new(alpha: f32, color: [f32; 3]) -> Self {
        Self { alpha, color }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha == 0.0
    }

    pub fn to_array(&self) -> [f32; CLUSTER_FIELDS] {
        [self.alpha, self.color[0], self.color[1], self.color[2]]
    }
}

/// Depth-ordered clusters for every pixel, in the same pixel order as the input tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteredImage {
    height: usize,
    width: usize,
    pixels: Vec<Vec<Cluster>>,
}

impl ClusteredImage {
    pub fn new(height: usize, width: usize, pixels: Vec<Vec<Cluster>>) -> Self {
        Self {
            height,
            width,
            pixels,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn pixels(&self) -> &[Vec<Cluster>] {
        &self.pixels
    }

    pub fn pixel(&self, index: usize) -> &[Cluster] {
        &self.pixels[index]
    }

    pub fn into_pixels(self) -> Vec<Vec<Cluster>> {
        self.pixels
    }

    /// The shared cluster count, if every pixel has the same number of clusters.
    pub fn fixed_cluster_count(&self) -> Option<usize> {
        let first = self.pixels.first().map_or(0, Vec::len);
        self.pixels
            .iter()
            .all(|clusters| clusters.len() == first)
            .then_some(first)
    }

    /// Dense `(H * W, K, 4)` view of the result. `None` when cluster counts vary per pixel.
    pub fn to_array(&self) -> Option<Array3<f32>> {
        let k = self.fixed_cluster_count()?;
        let mut out = Array3::<f32>::zeros((self.pixels.len(), k, CLUSTER_FIELDS));
        for (pixel_idx, clusters) in self.pixels.iter().enumerate() {
            for (cluster_idx, cluster) in clusters.iter().enumerate() {
                for (field, value) in cluster.to_array().into_iter().enumerate() {
                    out[[pixel_idx, cluster_idx, field]] = value;
                }
            }
        }
        Some(out)
    }
}
