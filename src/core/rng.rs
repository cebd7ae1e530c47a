use rand::rngs::SmallRng;
use rand::{rng, SeedableRng};

/// Stage tag for the per-pixel shuffle stream.
pub(crate) const SHUFFLE_STAGE: u64 = 0x5348_5546;
/// Stage tag for the per-pixel clustering stream.
pub(crate) const CLUSTER_STAGE: u64 = 0x434c_5553;

/// Returns a random number generator for one pixel of one stage.
///
/// With a seed the stream depends only on `(seed, pixel, stage)`, so results do not
/// depend on which worker picks the pixel up. Without one it is drawn from entropy.
pub(crate) fn pixel_rng(seed: Option<u64>, pixel: usize, stage: u64) -> SmallRng {
    match seed {
        Some(seed) => {
            let mixed = seed
                ^ (pixel as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
                ^ stage.rotate_left(32);
            SmallRng::seed_from_u64(mixed)
        }
        None => SmallRng::from_rng(&mut rng()),
    }
}
