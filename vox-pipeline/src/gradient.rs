use vox_core::{HeightGradient, VoxelSet};

use crate::stage::{PipelineStatus, Stage};

/// Collapses an occupancy grid into a histogram of voxel counts by
/// elevation.
pub struct GradientProcessor;

impl Stage for GradientProcessor {
    type Input = VoxelSet;
    type Output = HeightGradient;

    fn process(&self, input: VoxelSet, status: &PipelineStatus) -> HeightGradient {
        status.update("Gradient", 0.0);

        let total = input.voxels.len().max(1) as f64;
        let mut gradient = HeightGradient::default();

        for (index, voxel) in input.voxels.iter().enumerate() {
            *gradient.gradient.entry(voxel.z).or_insert(0) += 1;
            status.set_progress((index + 1) as f64 / total);
        }

        gradient
    }
}
