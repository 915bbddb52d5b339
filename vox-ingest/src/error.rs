use thiserror::Error;

use vox_las::LasError;

/// Errors that tear down an ingest run.
///
/// Chunk work is deterministic given the input file, so there is no
/// per-chunk retry; the first failing worker aborts the whole run.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("LAS read failed: {0}")]
    Las(#[from] LasError),
}
