use std::collections::HashSet;

use vox_core::{DensityVoxelSet, VoxelSet};

use crate::stage::{PipelineStatus, Stage};

/// Thresholds a density grid into a plain occupancy set: a voxel survives
/// iff at least `density` points landed in it.
///
/// The threshold is the configured one, which may differ from the density
/// recorded on the input set.
pub struct DensityCondenser {
    pub density: u32,
}

impl Stage for DensityCondenser {
    type Input = DensityVoxelSet;
    type Output = VoxelSet;

    fn process(&self, input: DensityVoxelSet, status: &PipelineStatus) -> VoxelSet {
        status.update("Condensing", 0.0);

        let total = input.voxels.len().max(1) as f64;
        let mut voxels = HashSet::new();

        for (index, (coordinate, count)) in input.voxels.iter().enumerate() {
            if *count >= self.density {
                voxels.insert(*coordinate);
            }
            status.set_progress((index + 1) as f64 / total);
        }

        VoxelSet {
            extent: input.extent,
            origin: input.origin,
            voxels,
        }
    }
}
