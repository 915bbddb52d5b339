pub mod chunk;
pub mod driver;
pub mod error;
pub mod processor;
pub mod processors;
pub mod status;

pub use chunk::{chunk_file, Chunk};
pub use driver::{process_parallel, process_sequential};
pub use error::IngestError;
pub use processor::{OutputSink, Processor};
pub use processors::{DensityProcessor, OccupancyProcessor, PointSourceProcessor};
pub use status::{ConcurrentStatus, WorkerProgress};
