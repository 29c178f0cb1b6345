//! Little-endian 16-bit PCM helpers shared by every pipeline stage.

/// Bytes per 16-bit sample.
pub const BYTES_PER_SAMPLE: usize = 2;

/// Hard-clip a wide value to the 16-bit signed range.
pub fn clip_i16(value: i64) -> i16 {
    value.clamp(i16::MIN as i64, i16::MAX as i64) as i16
}

/// Round a float to the nearest integer and hard-clip it to 16 bits.
pub fn round_clip(value: f64) -> i16 {
    // `as i64` saturates on NaN/inf, so the clamp below always sees a finite value.
    clip_i16(value.round() as i64)
}

/// Number of whole samples in a buffer. A trailing odd byte is ignored.
pub fn sample_count(pcm: &[u8]) -> usize {
    pcm.len() / BYTES_PER_SAMPLE
}

/// Read the sample at `index`, or `None` past the end.
pub fn sample_at(pcm: &[u8], index: usize) -> Option<i16> {
    let start = index.checked_mul(BYTES_PER_SAMPLE)?;
    let bytes = pcm.get(start..start + BYTES_PER_SAMPLE)?;
    Some(i16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Iterate over all whole samples.
pub fn samples(pcm: &[u8]) -> impl Iterator<Item = i16> + '_ {
    pcm.chunks_exact(BYTES_PER_SAMPLE)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
}

/// Pack samples back into little-endian bytes.
pub fn to_bytes<I>(samples: I) -> Vec<u8>
where
    I: IntoIterator<Item = i16>,
{
    let iter = samples.into_iter();
    let mut out = Vec::with_capacity(iter.size_hint().0 * BYTES_PER_SAMPLE);
    for s in iter {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

/// Duration in seconds of a mono 16-bit buffer at `sample_rate`.
///
/// The persistence layer stores this next to the file path.
pub fn duration_secs(pcm: &[u8], sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    sample_count(pcm) as f64 / sample_rate as f64
}
