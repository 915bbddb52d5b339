use vox_core::{point_to_coord, LatticeOrigin, VoxelExtent, VoxelSet};
use vox_las::{decode_point_xyz, LasFile, LasHeader};

use crate::chunk::Chunk;
use crate::error::IngestError;
use crate::processor::{OutputSink, Processor};
use crate::status::WorkerProgress;

/// Aggregates points into a plain occupancy set: a voxel is filled as soon
/// as any point lands in it.
pub struct OccupancyProcessor {
    pub voxel_size: f64,
}

impl Processor for OccupancyProcessor {
    type Output = VoxelSet;

    fn empty(&self, header: &LasHeader) -> VoxelSet {
        VoxelSet {
            extent: VoxelExtent::from_bounds(header.min, header.max, self.voxel_size),
            origin: Some(LatticeOrigin::from_minimums(header.min, self.voxel_size)),
            voxels: Default::default(),
        }
    }

    fn process_chunk(
        &self,
        file: &LasFile,
        chunk: Chunk,
        sink: &OutputSink<VoxelSet>,
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
            voxels
                .voxels
                .insert(point_to_coord(point, header.min, self.voxel_size, true));
            progress.set(index as f64 / total);
        }

        progress.set(1.0);
        let _ = sink.send(Ok(voxels));
        Ok(())
    }

    fn merge(&self, mut base: VoxelSet, incoming: VoxelSet) -> VoxelSet {
        base.voxels.extend(incoming.voxels);
        base
    }
}
