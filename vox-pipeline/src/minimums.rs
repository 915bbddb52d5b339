use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgba, RgbaImage};

use vox_core::{MinimumHeights, VoxelSet, XYPair};

use crate::error::WriteError;
use crate::stage::{PipelineStatus, Stage};

/// Projects each `(x, y)` column down to its lowest occupied voxel.
///
/// With a raster path configured, also renders the minima as an RGBA PNG
/// sized to the grid's ground plane. The raster is an auxiliary sink: a
/// failure to write it is logged and does not abort the pipeline.
pub struct MinimumHeightFinder {
    pub raster_path: Option<PathBuf>,
}

impl Stage for MinimumHeightFinder {
    type Input = VoxelSet;
    type Output = MinimumHeights;

    fn process(&self, input: VoxelSet, status: &PipelineStatus) -> MinimumHeights {
        status.update("Minimums", 0.0);

        let total = input.voxels.len().max(1) as f64;
        let mut heights: HashMap<XYPair, i32> = HashMap::new();

        for (index, voxel) in input.voxels.iter().enumerate() {
            heights
                .entry(voxel.xy())
                .and_modify(|min| *min = voxel.z.min(*min))
                .or_insert(voxel.z);
            status.set_progress((index + 1) as f64 / total);
        }

        let minimums = MinimumHeights {
            heights,
            voxels: input,
        };

        if let Some(path) = &self.raster_path {
            status.update("Write min", 0.0);
            if let Err(error) = write_minimum_raster(path, &minimums, status) {
                log::error!(
                    "failed to write minimum-height raster {}: {}",
                    path.display(),
                    error
                );
            }
        }

        minimums
    }
}

/// Renders per-column minima over the grid's ground plane, colored along an
/// HSV ramp from blue (low) to red (high); columns with no voxels stay
/// transparent black.
fn write_minimum_raster(
    path: &Path,
    minimums: &MinimumHeights,
    status: &PipelineStatus,
) -> Result<(), WriteError> {
    let extent = &minimums.voxels.extent;
    let mut image = RgbaImage::new(extent.x_voxels, extent.y_voxels);

    let total = minimums.heights.len().max(1) as f64;
    for (index, (point, min)) in minimums.heights.iter().enumerate() {
        let hue = 200.0 - 200.0 * (*min as f64 / extent.z_voxels as f64);
        let [r, g, b] = hsv_to_rgb(hue, 1.0, 1.0);

        if point.x >= 0
            && (point.x as u32) < image.width()
            && point.y >= 0
            && (point.y as u32) < image.height()
        {
            image.put_pixel(point.x as u32, point.y as u32, Rgba([r, g, b, 255]));
        }

        status.set_progress((index + 1) as f64 / total);
    }

    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let sector = (h / 60.0).floor();
    let f = h / 60.0 - sector;

    let p = ((v * (1.0 - s)) * 255.0).round() as u8;
    let q = ((v * (1.0 - s * f)) * 255.0).round() as u8;
    let t = ((v * (1.0 - s * (1.0 - f))) * 255.0).round() as u8;
    let value = (v * 255.0).round() as u8;

    match sector as i32 {
        1 => [q, value, p],
        2 => [p, value, t],
        3 => [p, q, value],
        4 => [t, p, value],
        5 => [value, p, q],
        _ => [value, t, p],
    }
}

/// Adapter that drops the minima and hands the contained voxels onward.
pub struct MinimumDegrouper;

impl Stage for MinimumDegrouper {
    type Input = MinimumHeights;
    type Output = VoxelSet;

    fn process(&self, input: MinimumHeights, _status: &PipelineStatus) -> VoxelSet {
        input.voxels
    }
}
