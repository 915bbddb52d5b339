use std::collections::{HashMap, HashSet};

use crate::coordinate::{Coordinate, XYPair};

/// Physical and lattice dimensions of a voxelized volume.
///
/// Sizes are rounded up to whole voxels, so `x_size` is `x_voxels` times the
/// voxel edge length rather than the raw extent of the input bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VoxelExtent {
    pub x_size: f64,
    pub y_size: f64,
    pub z_size: f64,
    pub x_voxels: u32,
    pub y_voxels: u32,
    pub z_voxels: u32,
}

impl VoxelExtent {
    /// Computes the extent covering `min..max` with the given voxel edge.
    pub fn from_bounds(min: [f64; 3], max: [f64; 3], voxel_size: f64) -> Self {
        let x_voxels = axis_voxels(max[0] - min[0], voxel_size);
        let y_voxels = axis_voxels(max[1] - min[1], voxel_size);
        let z_voxels = axis_voxels(max[2] - min[2], voxel_size);

        VoxelExtent {
            x_size: x_voxels as f64 * voxel_size,
            y_size: y_voxels as f64 * voxel_size,
            z_size: z_voxels as f64 * voxel_size,
            x_voxels,
            y_voxels,
            z_voxels,
        }
    }
}

fn axis_voxels(raw_size: f64, voxel_size: f64) -> u32 {
    let whole = (raw_size / voxel_size) as u32;
    if raw_size % voxel_size != 0.0 {
        whole + 1
    } else {
        whole
    }
}

/// Lattice cell of the world-space minimum corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeOrigin {
    pub x_min: i32,
    pub y_min: i32,
    pub z_min: i32,
}

impl LatticeOrigin {
    pub fn from_minimums(min: [f64; 3], voxel_size: f64) -> Self {
        LatticeOrigin {
            x_min: (min[0] / voxel_size) as i32,
            y_min: (min[1] / voxel_size) as i32,
            z_min: (min[2] / voxel_size) as i32,
        }
    }
}

/// Occupancy grid: the set of cells deemed filled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoxelSet {
    pub extent: VoxelExtent,
    pub origin: Option<LatticeOrigin>,
    pub voxels: HashSet<Coordinate>,
}

impl VoxelSet {
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }
}

/// Occupancy grid carrying a point count per cell.
///
/// Present keys always have a count of at least one; merging adds counts
/// key-wise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DensityVoxelSet {
    pub extent: VoxelExtent,
    pub origin: Option<LatticeOrigin>,
    /// Minimum points per voxel for the cell to count as filled downstream.
    pub point_density: u32,
    pub voxels: HashMap<Coordinate, u32>,
}

impl DensityVoxelSet {
    pub fn add_point(&mut self, coordinate: Coordinate) {
        *self.voxels.entry(coordinate).or_insert(0) += 1;
    }
}

/// Density grids partitioned by the point source id of the contributing
/// points. Outer and inner maps are dense only on seen keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSourceDensityVoxelSet {
    pub extent: VoxelExtent,
    pub point_density: u32,
    pub by_source: HashMap<u32, HashMap<Coordinate, u32>>,
}

impl PointSourceDensityVoxelSet {
    pub fn add_point(&mut self, source: u32, coordinate: Coordinate) {
        *self
            .by_source
            .entry(source)
            .or_default()
            .entry(coordinate)
            .or_insert(0) += 1;
    }
}

/// Per-column minimum heights, kept alongside the voxels they were derived
/// from so later stages can rebase them.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimumHeights {
    pub heights: HashMap<XYPair, i32>,
    pub voxels: VoxelSet,
}

/// Histogram of occupied voxels by elevation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeightGradient {
    pub gradient: HashMap<i32, u32>,
}
