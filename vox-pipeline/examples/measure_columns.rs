use std::collections::HashSet;

use vox_core::{Coordinate, VoxelExtent, VoxelSet};
use vox_pipeline::{chain, run_pipeline, MeasurementFinder, PipelineStatus, Stage};

struct PrintMeasurements;

impl Stage for PrintMeasurements {
    type Input = vox_core::Measurements;
    type Output = ();

    fn process(&self, input: vox_core::Measurements, _status: &PipelineStatus) {
        for (coords, canopy) in &input.canopy_height {
            println!(
                "column ({}, {}): CH {} UH {} CBH {} FSG {}",
                coords.x,
                coords.y,
                canopy,
                input.understory_height[coords],
                input.canopy_base_height[coords],
                input.fuel_strata_gap[coords],
            );
        }
    }
}

fn main() {
    // A single column with understory at 0..=1, canopy from 5 up, and a
    // sparse treetop voxel.
    let mut voxels = HashSet::new();
    for z in [0, 1, 5, 6, 12] {
        voxels.insert(Coordinate { x: 0, y: 0, z });
    }

    let voxel_set = VoxelSet {
        extent: VoxelExtent::from_bounds([0.0; 3], [1.0, 1.0, 13.0], 1.0),
        origin: None,
        voxels,
    };

    let status = PipelineStatus::new();
    let pipeline = chain(MeasurementFinder, PrintMeasurements);
    run_pipeline(voxel_set, &pipeline, &status);
}
