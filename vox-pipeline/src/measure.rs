use std::collections::HashMap;

use vox_core::{Column, Measurements, VoxelSet, XYPair};

use crate::stage::{PipelineStatus, Stage};

/// Derives the per-column canopy measurements from an occupancy grid.
///
/// Pass one groups voxels into columns by their ground-plane cell; pass two
/// measures each column: canopy height from the column top, understory and
/// canopy base heights from the longest vertical gap, and the fuel strata
/// gap as their difference.
pub struct MeasurementFinder;

impl Stage for MeasurementFinder {
    type Input = VoxelSet;
    type Output = Measurements;

    fn process(&self, input: VoxelSet, status: &PipelineStatus) -> Measurements {
        status.update("Columns", 0.0);

        let total = input.voxels.len().max(1) as f64;
        let mut columns: HashMap<XYPair, Column> = HashMap::new();

        for (index, voxel) in input.voxels.iter().enumerate() {
            columns
                .entry(voxel.xy())
                .and_modify(|column| column.add_height(voxel.z))
                .or_insert_with(|| Column::new(voxel.z));
            status.set_progress((index + 1) as f64 / total);
        }

        status.update("Measuring", 0.0);

        let total = columns.len().max(1) as f64;
        let mut measurements = Measurements::new();

        for (index, (coords, column)) in columns.iter().enumerate() {
            measurements.add_column(*coords, column);
            status.set_progress((index + 1) as f64 / total);
        }

        measurements
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use vox_core::Coordinate;

    use super::*;

    #[test]
    fn test_measurements_for_a_gapped_column() {
        let mut voxels = HashSet::new();
        for z in [0, 1, 5, 6, 12] {
            voxels.insert(Coordinate { x: 3, y: 4, z });
        }
        let input = VoxelSet {
            voxels,
            ..Default::default()
        };

        let output = MeasurementFinder.process(input, &PipelineStatus::new());
        let coords = XYPair { x: 3, y: 4 };

        assert_eq!(output.understory_height[&coords], 7);
        assert_eq!(output.canopy_base_height[&coords], 12);
        assert_eq!(output.fuel_strata_gap[&coords], 5);
        assert_eq!(output.canopy_height[&coords], 13);
    }

    #[test]
    fn test_each_column_is_measured_independently() {
        let mut voxels = HashSet::new();
        for z in [0, 1, 8] {
            voxels.insert(Coordinate { x: 0, y: 0, z });
        }
        for z in [2, 3, 4] {
            voxels.insert(Coordinate { x: 1, y: 0, z });
        }
        let input = VoxelSet {
            voxels,
            ..Default::default()
        };

        let output = MeasurementFinder.process(input, &PipelineStatus::new());
        assert_eq!(output.len(), 2);

        let gapped = XYPair { x: 0, y: 0 };
        assert_eq!(output.understory_height[&gapped], 2);
        assert_eq!(output.canopy_base_height[&gapped], 8);
        assert_eq!(output.fuel_strata_gap[&gapped], 6);
        assert_eq!(output.canopy_height[&gapped], 9);

        let solid = XYPair { x: 1, y: 0 };
        assert_eq!(output.understory_height[&solid], 3);
        assert_eq!(output.canopy_base_height[&solid], 3);
        assert_eq!(output.fuel_strata_gap[&solid], 0);
        assert_eq!(output.canopy_height[&solid], 5);
    }
}
