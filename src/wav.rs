//! WAV container codec — strict RIFF/WAVE decoding and canonical mono encoding.
//!
//! Decoding borrows the PCM payload straight out of the input buffer; encoding
//! always produces the 44-byte canonical header used for every rendered file.

use thiserror::Error;

/// Sample rate of every file this crate writes.
pub const OUTPUT_SAMPLE_RATE: u32 = 24_000;

/// Size of the canonical header written by [`encode`].
pub const HEADER_SIZE: usize = 44;

/// PCM format tag in the `fmt ` chunk.
pub const FORMAT_PCM: u16 = 1;

const RIFF: &[u8; 4] = b"RIFF";
const WAVE: &[u8; 4] = b"WAVE";
const FMT: &[u8; 4] = b"fmt ";
const DATA: &[u8; 4] = b"data";

/// Minimum size of a PCM `fmt ` payload.
const FMT_MIN_SIZE: usize = 16;

/// Typed decode failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("not a RIFF/WAVE file")]
    NotWav,
    #[error("data chunk found before fmt chunk")]
    MissingFmtChunk,
    #[error("no data chunk")]
    MissingDataChunk,
    #[error("chunk '{id}' is truncated")]
    TruncatedChunk { id: String },
}

/// The format fields and PCM payload of a decoded WAV buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavDescriptor<'a> {
    pub audio_format: u16,
    pub sample_rate: u32,
    pub num_channels: u16,
    pub bits_per_sample: u16,
    pub pcm: &'a [u8],
}

impl WavDescriptor<'_> {
    /// Playback length in seconds, from the declared format.
    pub fn duration_secs(&self) -> f64 {
        let bytes_per_frame =
            self.num_channels as u64 * (self.bits_per_sample as u64).div_ceil(8);
        if bytes_per_frame == 0 || self.sample_rate == 0 {
            return 0.0;
        }
        (self.pcm.len() as u64 / bytes_per_frame) as f64 / self.sample_rate as f64
    }

    /// True when the payload is already in the canonical output format.
    pub fn is_canonical(&self) -> bool {
        self.num_channels == 1
            && self.bits_per_sample == 16
            && self.sample_rate == OUTPUT_SAMPLE_RATE
    }
}

fn read_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

/// Returns true if the buffer starts with the RIFF signature.
pub fn has_riff_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(RIFF)
}

/// Decode a WAV byte buffer.
///
/// Chunks after the 12-byte RIFF header are walked in order; unknown chunks
/// are skipped, honoring the even-length padding rule. The first `data`
/// chunk ends the walk.
pub fn decode(bytes: &[u8]) -> Result<WavDescriptor<'_>, FormatError> {
    if bytes.len() < 12 || &bytes[0..4] != RIFF || &bytes[8..12] != WAVE {
        return Err(FormatError::NotWav);
    }

    // (audio_format, channels, sample_rate, bits)
    let mut fmt: Option<(u16, u16, u32, u16)> = None;
    let mut offset = 12usize;

    while offset + 8 <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let size = read_u32(bytes, offset + 4) as usize;
        let body_start = offset + 8;
        let body_end = body_start.saturating_add(size);

        if id == FMT {
            if size < FMT_MIN_SIZE || body_end > bytes.len() {
                return Err(FormatError::TruncatedChunk { id: "fmt ".into() });
            }
            let body = &bytes[body_start..body_end];
            fmt = Some((
                read_u16(body, 0),
                read_u16(body, 2),
                read_u32(body, 4),
                read_u16(body, 14),
            ));
        } else if id == DATA {
            let (audio_format, num_channels, sample_rate, bits_per_sample) =
                fmt.ok_or(FormatError::MissingFmtChunk)?;
            if body_end > bytes.len() {
                return Err(FormatError::TruncatedChunk { id: "data".into() });
            }
            return Ok(WavDescriptor {
                audio_format,
                sample_rate,
                num_channels,
                bits_per_sample,
                pcm: &bytes[body_start..body_end],
            });
        }

        // Chunks are padded to an even length.
        offset = body_end.saturating_add(size & 1);
    }

    Err(FormatError::MissingDataChunk)
}

/// Build the 44-byte canonical header for mono 16-bit PCM.
pub fn header(data_len: u32, sample_rate: u32) -> [u8; HEADER_SIZE] {
    let channels: u16 = 1;
    let bits: u16 = 16;
    let block_align = channels * bits / 8;
    let byte_rate = sample_rate * block_align as u32;

    let mut h = [0u8; HEADER_SIZE];
    h[0..4].copy_from_slice(RIFF);
    h[4..8].copy_from_slice(&(36u32.wrapping_add(data_len)).to_le_bytes());
    h[8..12].copy_from_slice(WAVE);
    h[12..16].copy_from_slice(FMT);
    h[16..20].copy_from_slice(&(FMT_MIN_SIZE as u32).to_le_bytes());
    h[20..22].copy_from_slice(&FORMAT_PCM.to_le_bytes());
    h[22..24].copy_from_slice(&channels.to_le_bytes());
    h[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    h[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    h[32..34].copy_from_slice(&block_align.to_le_bytes());
    h[34..36].copy_from_slice(&bits.to_le_bytes());
    h[36..40].copy_from_slice(DATA);
    h[40..44].copy_from_slice(&data_len.to_le_bytes());
    h
}

/// Encode mono 16-bit PCM as a canonical WAV buffer.
pub fn encode(pcm: &[u8], sample_rate: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + pcm.len());
    out.extend_from_slice(&header(pcm.len() as u32, sample_rate));
    out.extend_from_slice(pcm);
    out
}

/// Encode at the canonical output rate.
pub fn encode_output(pcm: &[u8]) -> Vec<u8> {
    encode(pcm, OUTPUT_SAMPLE_RATE)
}
