pub mod condense;
pub mod error;
pub mod gradient;
pub mod measure;
pub mod minimums;
pub mod normalize;
pub mod split;
pub mod stage;
pub mod writers;

pub use condense::DensityCondenser;
pub use error::WriteError;
pub use gradient::GradientProcessor;
pub use measure::MeasurementFinder;
pub use minimums::{MinimumDegrouper, MinimumHeightFinder};
pub use normalize::LazyNormalizer;
pub use split::PointSourceSplitter;
pub use stage::{chain, run_pipeline, BoxedStage, Chain, PipelineStatus, Stage};
pub use writers::{GradientFileWriter, MeasurementsFileWriter, VoxelFileWriter};
