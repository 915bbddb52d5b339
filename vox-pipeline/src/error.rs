use thiserror::Error;

/// Failure of a pipeline output sink. Writer stages return this as their
/// output value, so the chain's final type carries the run's result.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
