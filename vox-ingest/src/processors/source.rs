use vox_core::{point_to_coord, PointSourceDensityVoxelSet, VoxelExtent};
use vox_las::{decode_point_source, decode_point_xyz, LasFile, LasHeader};

use crate::chunk::Chunk;
use crate::error::IngestError;
use crate::processor::{OutputSink, Processor};
use crate::status::WorkerProgress;

/// Like [`crate::DensityProcessor`], but keeps one density grid per point
/// source id so flight lines can be post-processed independently.
pub struct PointSourceProcessor {
    pub point_density: u32,
    pub voxel_size: f64,
}

impl Processor for PointSourceProcessor {
    type Output = PointSourceDensityVoxelSet;

    fn empty(&self, header: &LasHeader) -> PointSourceDensityVoxelSet {
        PointSourceDensityVoxelSet {
            extent: VoxelExtent::from_bounds(header.min, header.max, self.voxel_size),
            point_density: self.point_density,
            by_source: Default::default(),
        }
    }

    fn process_chunk(
        &self,
        file: &LasFile,
        chunk: Chunk,
        sink: &OutputSink<PointSourceDensityVoxelSet>,
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
            let source = decode_point_source(record, header.point_format);
            voxels.add_point(source, point_to_coord(point, header.min, self.voxel_size, true));
            progress.set(index as f64 / total);
        }

        progress.set(1.0);
        let _ = sink.send(Ok(voxels));
        Ok(())
    }

    fn merge(
        &self,
        mut base: PointSourceDensityVoxelSet,
        incoming: PointSourceDensityVoxelSet,
    ) -> PointSourceDensityVoxelSet {
        for (source, voxels) in incoming.by_source {
            let merged = base.by_source.entry(source).or_default();
            for (coordinate, count) in voxels {
                *merged.entry(coordinate).or_insert(0) += count;
            }
        }
        base
    }
}
