use std::path::PathBuf;

use vox_core::{HeightGradient, Measurements, VoxelSet};

use crate::error::WriteError;
use crate::stage::{PipelineStatus, Stage};

/// Writes an occupancy grid as `x,y,z` CSV rows.
pub struct VoxelFileWriter {
    pub path: PathBuf,
}

impl Stage for VoxelFileWriter {
    type Input = VoxelSet;
    type Output = Result<(), WriteError>;

    fn process(&self, input: VoxelSet, status: &PipelineStatus) -> Result<(), WriteError> {
        status.update("Writing", 0.0);

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(["x", "y", "z"])?;

        let total = input.voxels.len().max(1) as f64;
        for (index, voxel) in input.voxels.iter().enumerate() {
            writer.write_record([
                voxel.x.to_string(),
                voxel.y.to_string(),
                voxel.z.to_string(),
            ])?;
            status.set_progress((index + 1) as f64 / total);
        }

        writer.flush()?;
        Ok(())
    }
}

/// Writes a height histogram as `height,count` CSV rows, lowest height
/// first.
pub struct GradientFileWriter {
    pub path: PathBuf,
}

impl Stage for GradientFileWriter {
    type Input = HeightGradient;
    type Output = Result<(), WriteError>;

    fn process(&self, input: HeightGradient, status: &PipelineStatus) -> Result<(), WriteError> {
        status.update("Writing", 0.0);

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(["height", "count"])?;

        let mut rows: Vec<(i32, u32)> = input
            .gradient
            .iter()
            .map(|(&height, &count)| (height, count))
            .collect();
        rows.sort_unstable_by_key(|&(height, _)| height);

        let total = rows.len().max(1) as f64;
        for (index, (height, count)) in rows.into_iter().enumerate() {
            writer.write_record([height.to_string(), count.to_string()])?;
            status.set_progress((index + 1) as f64 / total);
        }

        writer.flush()?;
        Ok(())
    }
}

/// Writes per-column canopy measurements as CSV rows keyed by the shared
/// ground-plane cell.
pub struct MeasurementsFileWriter {
    pub path: PathBuf,
}

impl Stage for MeasurementsFileWriter {
    type Input = Measurements;
    type Output = Result<(), WriteError>;

    fn process(&self, input: Measurements, status: &PipelineStatus) -> Result<(), WriteError> {
        status.update("Writing", 0.0);

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record([
            "x",
            "y",
            "understory_height",
            "canopy_base_height",
            "fuel_strata_gap",
            "canopy_height",
        ])?;

        let total = input.len().max(1) as f64;
        for (index, coords) in input.canopy_height.keys().enumerate() {
            let understory = input.understory_height.get(coords).copied().unwrap_or(0);
            let base = input.canopy_base_height.get(coords).copied().unwrap_or(0);
            let gap = input.fuel_strata_gap.get(coords).copied().unwrap_or(0);
            let canopy = input.canopy_height.get(coords).copied().unwrap_or(0);

            writer.write_record([
                coords.x.to_string(),
                coords.y.to_string(),
                understory.to_string(),
                base.to_string(),
                gap.to_string(),
                canopy.to_string(),
            ])?;
            status.set_progress((index + 1) as f64 / total);
        }

        writer.flush()?;
        Ok(())
    }
}
