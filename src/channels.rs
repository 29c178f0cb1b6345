use crate::pcm::{self, BYTES_PER_SAMPLE};
use std::borrow::Cow;

/// Downmix interleaved 16-bit PCM to mono by averaging each frame.
///
/// Mono input (or a zero channel count) is returned borrowed, untouched.
/// A trailing partial frame is dropped.
pub fn to_mono(pcm: &[u8], channels: u16) -> Cow<'_, [u8]> {
    if channels <= 1 {
        return Cow::Borrowed(pcm);
    }
    let n = channels as usize;
    let frames = pcm.chunks_exact(n * BYTES_PER_SAMPLE).map(|frame| {
        let sum: i64 = pcm::samples(frame).map(i64::from).sum();
        pcm::round_clip(sum as f64 / n as f64)
    });
    Cow::Owned(pcm::to_bytes(frames))
}
