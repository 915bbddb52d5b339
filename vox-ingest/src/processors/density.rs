use vox_core::{point_to_coord, DensityVoxelSet, LatticeOrigin, VoxelExtent};
use vox_las::{decode_point_xyz, LasFile, LasHeader};

use crate::chunk::Chunk;
use crate::error::IngestError;
use crate::processor::{OutputSink, Processor};
use crate::status::WorkerProgress;

/// Aggregates points into per-voxel point counts, letting the condenser
/// stage threshold out sparsely hit voxels later.
pub struct DensityProcessor {
    pub point_density: u32,
    pub voxel_size: f64,
}

impl Processor for DensityProcessor {
    type Output = DensityVoxelSet;

    fn empty(&self, header: &LasHeader) -> DensityVoxelSet {
        DensityVoxelSet {
            extent: VoxelExtent::from_bounds(header.min, header.max, self.voxel_size),
            origin: Some(LatticeOrigin::from_minimums(header.min, self.voxel_size)),
            point_density: self.point_density,
            voxels: Default::default(),
        }
    }

    fn process_chunk(
        &self,
        file: &LasFile,
        chunk: Chunk,
        sink: &OutputSink<DensityVoxelSet>,
        progress: &WorkerProgress,
    ) -> Result<(), IngestError> {
        progress.set(0.0);

        let header = &file.header;
        let bytes = file.read_points(chunk.start, chunk.end)?;
        let record_length = header.point_record_length as usize;
        let total = chunk.len().max(1) as f64;

        let mut voxels = self.empty(header);
        for (index, record) in bytes.chunks_exact(record_length).enumerate() {
            let point = decode_point_xyz(record, header);
            voxels.add_point(point_to_coord(point, header.min, self.voxel_size, true));
            progress.set(index as f64 / total);
        }

        progress.set(1.0);
        let _ = sink.send(Ok(voxels));
        Ok(())
    }

    fn merge(&self, mut base: DensityVoxelSet, incoming: DensityVoxelSet) -> DensityVoxelSet {
        for (coordinate, count) in incoming.voxels {
            *base.voxels.entry(coordinate).or_insert(0) += count;
        }
        base
    }
}
