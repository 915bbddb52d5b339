use crossbeam_channel::Sender;

use vox_las::{LasFile, LasHeader};

use crate::chunk::Chunk;
use crate::error::IngestError;
use crate::status::WorkerProgress;

/// Queue a processor publishes its finished per-chunk accumulator to.
pub type OutputSink<T> = Sender<Result<T, IngestError>>;

/// A voxelizing aggregation over LAS point records.
///
/// The drivers seed one accumulator with `empty`, let workers build local
/// accumulators chunk by chunk, and fold the results together with `merge`.
/// `merge` must be associative and commutative with `empty` as identity, so
/// the fold result is invariant under worker completion order.
pub trait Processor: Sync {
    type Output: Send;

    /// Builds the empty accumulator, with extent descriptors and lattice
    /// origin derived from the header bounds.
    fn empty(&self, header: &LasHeader) -> Self::Output;

    /// Reads the chunk's records, aggregates them into a fresh local
    /// accumulator, and publishes it to `sink` exactly once.
    ///
    /// `progress` must rise monotonically from 0.0 and end at exactly 1.0.
    fn process_chunk(
        &self,
        file: &LasFile,
        chunk: Chunk,
        sink: &OutputSink<Self::Output>,
        progress: &WorkerProgress,
    ) -> Result<(), IngestError>;

    /// Combines two accumulators, consuming both.
    fn merge(&self, base: Self::Output, incoming: Self::Output) -> Self::Output;
}
