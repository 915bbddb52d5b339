use std::collections::HashSet;

use vox_core::{Coordinate, MinimumHeights, VoxelSet};

use crate::stage::{PipelineStatus, Stage};

/// Rebases every column onto its own minimum after ingestion, instead of
/// normalizing point heights during the parallel pass.
///
/// Each voxel `(x, y, z)` becomes `(x, y, z - min(x, y))`, so every
/// surviving column starts at height zero.
pub struct LazyNormalizer;

impl Stage for LazyNormalizer {
    type Input = MinimumHeights;
    type Output = VoxelSet;

    fn process(&self, input: MinimumHeights, status: &PipelineStatus) -> VoxelSet {
        status.update("Normalizing", 0.0);

        let total = input.voxels.voxels.len().max(1) as f64;
        let mut normalized = HashSet::with_capacity(input.voxels.voxels.len());

        for (index, voxel) in input.voxels.voxels.iter().enumerate() {
            let min = input.heights.get(&voxel.xy()).copied().unwrap_or(0);
            normalized.insert(Coordinate {
                x: voxel.x,
                y: voxel.y,
                z: voxel.z - min,
            });
            status.set_progress((index + 1) as f64 / total);
        }

        VoxelSet {
            extent: input.voxels.extent,
            origin: input.voxels.origin,
            voxels: normalized,
        }
    }
}
