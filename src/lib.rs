//! stationmix — audio composition core for station voice tracks.
//!
//! Decodes music-bed WAV files, conforms them to the 24 kHz mono 16-bit
//! output format, and mixes them under TTS narration. The CLI consumes this
//! crate; storage and TTS live elsewhere.

pub mod bit_depth;
pub mod channels;
pub mod config;
pub mod error;
pub mod fade;
pub mod gain_mixer;
pub mod looper;
pub mod orchestrator;
pub mod pcm;
pub mod resample;
pub mod wav;

pub use error::MixError;
pub use orchestrator::{MixOrchestrator, MixParameters};
pub use wav::{FormatError, WavDescriptor};
