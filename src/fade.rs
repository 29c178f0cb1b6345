use crate::pcm;

/// Number of samples covered by a fade of `ms` milliseconds.
pub fn fade_samples(ms: u32, sample_rate: u32) -> usize {
    (ms as f64 / 1000.0 * sample_rate as f64).floor() as usize
}

/// Apply linear fade-in and fade-out envelopes to a copy of `pcm`.
///
/// A zero duration disables that fade. When the two envelopes overlap they
/// are applied one after the other and their gains multiply.
pub fn apply(pcm: &[u8], sample_rate: u32, fade_in_ms: u32, fade_out_ms: u32) -> Vec<u8> {
    let mut samples: Vec<i16> = pcm::samples(pcm).collect();
    let n = samples.len();

    let fade_in = fade_samples(fade_in_ms, sample_rate);
    if fade_in > 0 {
        for (i, s) in samples.iter_mut().enumerate().take(fade_in) {
            let gain = i as f64 / fade_in as f64;
            *s = pcm::round_clip(*s as f64 * gain);
        }
    }

    let fade_out = fade_samples(fade_out_ms, sample_rate);
    if fade_out > 0 {
        let start = n.saturating_sub(fade_out);
        for (i, s) in samples.iter_mut().enumerate().skip(start) {
            let gain = (n - i) as f64 / fade_out as f64;
            *s = pcm::round_clip(*s as f64 * gain);
        }
    }

    pcm::to_bytes(samples)
}
