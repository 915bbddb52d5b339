use vox_core::{DensityVoxelSet, PointSourceDensityVoxelSet};

use crate::stage::{PipelineStatus, Stage};

/// Fans a source-partitioned density grid out into one standalone density
/// grid per point source, ordered by ascending source id so downstream
/// per-source outputs are deterministic.
///
/// Extent and density threshold are inherited from the parent set.
pub struct PointSourceSplitter;

impl Stage for PointSourceSplitter {
    type Input = PointSourceDensityVoxelSet;
    type Output = Vec<DensityVoxelSet>;

    fn process(
        &self,
        input: PointSourceDensityVoxelSet,
        status: &PipelineStatus,
    ) -> Vec<DensityVoxelSet> {
        status.update("Splitting", 0.0);

        let mut sources: Vec<_> = input.by_source.into_iter().collect();
        sources.sort_unstable_by_key(|&(source, _)| source);

        let total = sources.len().max(1) as f64;
        let mut sets = Vec::with_capacity(sources.len());

        for (index, (_, voxels)) in sources.into_iter().enumerate() {
            sets.push(DensityVoxelSet {
                extent: input.extent,
                origin: None,
                point_density: input.point_density,
                voxels,
            });
            status.set_progress((index + 1) as f64 / total);
        }

        sets
    }
}
