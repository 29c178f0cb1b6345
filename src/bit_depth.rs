use crate::pcm;
use std::borrow::Cow;
use tracing::debug;

/// Convert one unsigned 8-bit sample to signed 16-bit.
pub fn u8_to_i16(byte: u8) -> i16 {
    pcm::round_clip((byte as f64 - 128.0) / 128.0 * 32767.0)
}

/// Normalize PCM to 16-bit signed samples.
///
/// 8-bit unsigned data is widened; 16-bit passes through. Other depths are
/// passed through unconverted and will be read as 16-bit downstream.
pub fn to_16_bit(pcm: &[u8], bits_per_sample: u16) -> Cow<'_, [u8]> {
    match bits_per_sample {
        8 => Cow::Owned(pcm::to_bytes(pcm.iter().map(|&b| u8_to_i16(b)))),
        16 => Cow::Borrowed(pcm),
        other => {
            debug!(bits = other, "unsupported bit depth, passing PCM through");
            Cow::Borrowed(pcm)
        }
    }
}
