mod density;
mod occupancy;
mod source;

pub use density::DensityProcessor;
pub use occupancy::OccupancyProcessor;
pub use source::PointSourceProcessor;
