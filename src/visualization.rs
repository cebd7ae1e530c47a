use crate::core::ClusteredImage;
use colored::Colorize;
use std::fmt;

pub fn print_cluster_analysis(image: &ClusteredImage) {
    println!("\n{}", "=== Cluster Analysis ===".bold());

    let stats = calculate_image_stats(image);
    println!("\n{}", "Summary Statistics:".bold());
    println!("{}", stats);

    if image.fixed_cluster_count().is_some() {
        print_slot_occupancy(&calculate_slot_stats(image));
    }
}

#[derive(Debug, PartialEq)]
struct ImageStats {
    pixels: usize,
    clusters: usize,
    transparent_clusters: usize,
    max_clusters_per_pixel: usize,
    mean_alpha: f64,
}

fn calculate_image_stats(image: &ClusteredImage) -> ImageStats {
    let clusters = image.pixels().iter().flatten();
    let (count, transparent, alpha_sum) =
        clusters.fold((0usize, 0usize, 0.0f64), |(count, transparent, alpha_sum), cluster| {
            (
                count + 1,
                transparent + usize::from(cluster.is_transparent()),
                alpha_sum + f64::from(cluster.alpha),
            )
        });

    ImageStats {
        pixels: image.pixels().len(),
        clusters: count,
        transparent_clusters: transparent,
        max_clusters_per_pixel: image.pixels().iter().map(Vec::len).max().unwrap_or(0),
        mean_alpha: if count > 0 { alpha_sum / count as f64 } else { 0.0 },
    }
}

impl fmt::Display for ImageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let per_pixel = if self.pixels > 0 {
            self.clusters as f64 / self.pixels as f64
        } else {
            0.0
        };
        writeln!(f, "Total Pixels: {}", self.pixels)?;
        writeln!(f, "Total Clusters: {}", self.clusters)?;
        writeln!(f, "Average Clusters per Pixel: {:.2}", per_pixel)?;
        writeln!(f, "Maximum Clusters per Pixel: {}", self.max_clusters_per_pixel)?;
        writeln!(f, "Transparent Clusters: {}", self.transparent_clusters)?;
        write!(f, "Mean Cluster Alpha: {:.3}", self.mean_alpha)
    }
}

#[derive(Debug, PartialEq)]
struct SlotStats {
    slot: usize,
    occupancy: f64,
    mean_alpha: f64,
}

/// Per cluster position: share of pixels where it is opaque at all, and its mean alpha.
fn calculate_slot_stats(image: &ClusteredImage) -> Vec<SlotStats> {
    let k = image.fixed_cluster_count().unwrap_or(0);
    let n_pixels = image.pixels().len().max(1) as f64;
    (0..k)
        .map(|slot| {
            let (occupied, alpha_sum) = image.pixels().iter().fold(
                (0usize, 0.0f64),
                |(occupied, alpha_sum), clusters| {
                    let cluster = &clusters[slot];
                    (
                        occupied + usize::from(!cluster.is_transparent()),
                        alpha_sum + f64::from(cluster.alpha),
                    )
                },
            );
            SlotStats {
                slot,
                occupancy: occupied as f64 / n_pixels,
                mean_alpha: alpha_sum / n_pixels,
            }
        })
        .collect()
}

impl fmt::Display for SlotStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cluster {}: occupied in {:.1}% of pixels, Mean Alpha: {:.3}",
            self.slot,
            self.occupancy * 100.0,
            self.mean_alpha
        )
    }
}

fn print_slot_occupancy(stats: &[SlotStats]) {
    println!("\n{}", "Cluster Slot Occupancy:".bold());
    for stat in stats {
        let info = stat.to_string();
        match stat.occupancy {
            o if o < 0.25 => println!("{}", info.red()),
            o if o < 0.75 => println!("{}", info.yellow()),
            _ => println!("{}", info.green()),
        }
    }
}
