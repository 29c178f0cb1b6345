use crate::pcm;

/// Mix `voice` over `bed` with independent gains.
///
/// The shorter buffer is zero-padded. Sums are rounded and hard-clipped to
/// the 16-bit range; there is no limiter, so hot gains distort audibly.
pub fn mix(voice: &[u8], bed: &[u8], voice_gain: f32, bed_gain: f32) -> Vec<u8> {
    let len = pcm::sample_count(voice).max(pcm::sample_count(bed));
    let (vg, bg) = (voice_gain as f64, bed_gain as f64);

    let out = (0..len).map(|i| {
        let v = pcm::sample_at(voice, i).unwrap_or(0) as f64;
        let b = pcm::sample_at(bed, i).unwrap_or(0) as f64;
        pcm::round_clip(v * vg + b * bg)
    });
    pcm::to_bytes(out)
}
