use crate::error::MixError;

/// Fit `pcm` to exactly `target` bytes.
///
/// Longer input keeps its head; shorter input is tiled, the last copy
/// partial. Empty input becomes silence.
pub fn to_length(pcm: &[u8], target: usize) -> Result<Vec<u8>, MixError> {
    if target % 2 != 0 {
        return Err(MixError::OddLength(target));
    }
    if pcm.is_empty() {
        return Ok(vec![0u8; target]);
    }
    if pcm.len() >= target {
        return Ok(pcm[..target].to_vec());
    }

    let mut out = Vec::with_capacity(target);
    while out.len() < target {
        let take = (target - out.len()).min(pcm.len());
        out.extend_from_slice(&pcm[..take]);
    }
    Ok(out)
}
