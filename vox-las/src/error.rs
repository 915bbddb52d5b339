use thiserror::Error;

/// Errors raised while opening or reading a LAS file.
#[derive(Error, Debug)]
pub enum LasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported point record format: {0}")]
    UnsupportedPointFormat(u8),

    #[error("point record length {length} is shorter than format {format} requires")]
    RecordLengthTooShort { length: u16, format: u8 },
}
