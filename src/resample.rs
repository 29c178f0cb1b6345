//! Linear-interpolation resampling of mono 16-bit PCM.
//!
//! Single pass, stateless, no low-pass pre-filter. Extreme downsampling
//! ratios alias; rendered beds rely on this exact numeric output.

use crate::error::MixError;
use crate::pcm;
use std::borrow::Cow;

/// Resample `pcm` from `from_rate` to `to_rate`.
///
/// Equal rates return the input borrowed. Output length is
/// `floor(input_samples / (from_rate / to_rate))`; a trailing odd byte is
/// dropped.
pub fn linear(pcm: &[u8], from_rate: u32, to_rate: u32) -> Result<Cow<'_, [u8]>, MixError> {
    linear_head(pcm, from_rate, to_rate, usize::MAX)
}

/// [`linear`], stopping after at most `max_samples` output samples.
///
/// The samples produced are the same as the head of the unbounded output.
pub fn linear_head(
    pcm: &[u8],
    from_rate: u32,
    to_rate: u32,
    max_samples: usize,
) -> Result<Cow<'_, [u8]>, MixError> {
    if from_rate == 0 || to_rate == 0 {
        return Err(MixError::InvalidSampleRate {
            from: from_rate,
            to: to_rate,
        });
    }
    let input_len = pcm::sample_count(pcm);
    if from_rate == to_rate {
        let keep = input_len.min(max_samples);
        return Ok(Cow::Borrowed(&pcm[..keep * pcm::BYTES_PER_SAMPLE]));
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = ((input_len as f64 / ratio).floor() as usize).min(max_samples);

    let out = (0..output_len).map(|i| {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = src_pos - src_idx as f64;
        let s0 = pcm::sample_at(pcm, src_idx).unwrap_or(0) as f64;
        let s1 = pcm::sample_at(pcm, src_idx + 1).map_or(s0, f64::from);
        pcm::round_clip(s0 + (s1 - s0) * frac)
    });
    Ok(Cow::Owned(pcm::to_bytes(out)))
}
