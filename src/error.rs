//! Error type shared by the mix pipeline stages.

use crate::wav::FormatError;
use thiserror::Error;

/// Everything the inner mix pipeline can fail with.
#[derive(Debug, Error)]
pub enum MixError {
    #[error("bed file: {0}")]
    Format(#[from] FormatError),
    #[error("bed file I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid sample rate conversion {from} Hz -> {to} Hz")]
    InvalidSampleRate { from: u32, to: u32 },
    #[error("buffer length {0} is not a whole number of 16-bit samples")]
    OddLength(usize),
    #[error("{name} must be a non-negative number, got {value}")]
    InvalidGain { name: &'static str, value: f32 },
}
