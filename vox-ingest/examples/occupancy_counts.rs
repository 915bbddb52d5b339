use std::env;

use vox_ingest::{chunk_file, process_sequential, ConcurrentStatus, OccupancyProcessor};
use vox_las::LasFile;

fn main() {
    let path = env::args().nth(1).expect("usage: occupancy_counts <input.las>");

    let file = LasFile::open(&path).expect("failed to open LAS file");
    let header = &file.header;
    println!(
        "{} points, format {}, bounds {:?}..{:?}",
        header.number_of_points,
        header.point_format.id(),
        header.min,
        header.max
    );

    let processor = OccupancyProcessor { voxel_size: 0.5 };
    let chunks = chunk_file(header.number_of_points as usize, 16);
    let status = ConcurrentStatus::new();

    let voxels = process_sequential(&file, &chunks, &processor, &status).expect("ingest failed");

    println!(
        "{} occupied voxels in a {}x{}x{} grid ({} merges)",
        voxels.len(),
        voxels.extent.x_voxels,
        voxels.extent.y_voxels,
        voxels.extent.z_voxels,
        status.merges()
    );
}
