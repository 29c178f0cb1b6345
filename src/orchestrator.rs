//! Voice-over-bed composition.
//!
//! The public entry points never fail: any problem with the bed file (missing,
//! not a WAV, malformed, unsupported) degrades to the voice track alone.
//!
//! The pipeline itself lives in [`MixOrchestrator::try_mix`] and returns a
//! typed [`MixError`]; only the outer wrappers discard it.

use crate::config::Config;
pub use crate::error::MixError;
use crate::wav::{self, WavDescriptor, OUTPUT_SAMPLE_RATE};
use crate::{bit_depth, channels, fade, gain_mixer, looper, pcm, resample};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Gain staging and fade lengths for one mix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixParameters {
    /// Multiplier applied to the voice track.
    pub voice_gain: f32,
    /// Multiplier applied to the music bed.
    pub bed_gain: f32,
    /// Bed fade-in length in milliseconds (0 = none).
    pub fade_in_ms: u32,
    /// Bed fade-out length in milliseconds (0 = none).
    pub fade_out_ms: u32,
}

impl MixParameters {
    /// Bed clearly audible under a boosted voice.
    pub fn music_bed() -> Self {
        MixParameters {
            voice_gain: 1.8,
            bed_gain: 0.25,
            fade_in_ms: 500,
            fade_out_ms: 1500,
        }
    }

    /// Bed barely under narration.
    pub fn subtle_bed() -> Self {
        MixParameters {
            voice_gain: 1.0,
            bed_gain: 0.15,
            fade_in_ms: 300,
            fade_out_ms: 800,
        }
    }

    /// Gains must be finite and non-negative.
    pub fn validate(&self) -> Result<(), MixError> {
        for (name, value) in [("voice_gain", self.voice_gain), ("bed_gain", self.bed_gain)] {
            if !value.is_finite() || value < 0.0 {
                return Err(MixError::InvalidGain { name, value });
            }
        }
        Ok(())
    }
}

impl Default for MixParameters {
    fn default() -> Self {
        Self::music_bed()
    }
}

/// Maps the application's virtual upload prefix onto a directory on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedPathResolver {
    pub virtual_prefix: String,
    pub virtual_root: PathBuf,
}

impl BedPathResolver {
    pub fn new(virtual_prefix: impl Into<String>, virtual_root: impl Into<PathBuf>) -> Self {
        BedPathResolver {
            virtual_prefix: virtual_prefix.into(),
            virtual_root: virtual_root.into(),
        }
    }

    /// `/uploads/beds/a.wav` -> `<root>/beds/a.wav`; anything else unchanged.
    pub fn resolve(&self, bed: &str) -> PathBuf {
        match bed.strip_prefix(self.virtual_prefix.as_str()) {
            Some(rest) if !self.virtual_prefix.is_empty() => {
                self.virtual_root.join(rest.trim_start_matches('/'))
            }
            _ => PathBuf::from(bed),
        }
    }
}

impl Default for BedPathResolver {
    fn default() -> Self {
        let config = Config::default();
        BedPathResolver::new(config.virtual_prefix, config.virtual_root)
    }
}

/// Mixes TTS voice tracks with music beds.
///
/// Holds only immutable path configuration; one instance can serve any
/// number of concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct MixOrchestrator {
    resolver: BedPathResolver,
}

impl MixOrchestrator {
    pub fn new(resolver: BedPathResolver) -> Self {
        MixOrchestrator { resolver }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(BedPathResolver::new(
            config.virtual_prefix.clone(),
            config.virtual_root.clone(),
        ))
    }

    pub fn resolver(&self) -> &BedPathResolver {
        &self.resolver
    }

    /// Mix `voice` (24 kHz mono 16-bit PCM) over the bed file at `bed`.
    ///
    /// Returns the voice unchanged if the bed is missing, is not a RIFF file,
    /// or fails anywhere in the pipeline.
    pub fn mix_voice_with_music_bed(
        &self,
        voice: &[u8],
        bed: &str,
        params: &MixParameters,
    ) -> Vec<u8> {
        let path = self.resolver.resolve(bed);
        let bed_bytes = match read_riff_file(&path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(path = %path.display(), "bed is not a RIFF file, using voice only");
                return voice.to_vec();
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "bed unavailable, using voice only");
                return voice.to_vec();
            }
        };
        self.mix_voice_with_bed_wav(voice, &bed_bytes, params)
    }

    /// [`Self::mix_voice_with_music_bed`] with [`MixParameters::subtle_bed`].
    pub fn mix_subtle_bed(&self, voice: &[u8], bed: &str) -> Vec<u8> {
        self.mix_voice_with_music_bed(voice, bed, &MixParameters::subtle_bed())
    }

    /// Mix over an in-memory bed WAV, degrading to voice-only on any error.
    pub fn mix_voice_with_bed_wav(
        &self,
        voice: &[u8],
        bed_wav: &[u8],
        params: &MixParameters,
    ) -> Vec<u8> {
        match Self::try_mix(voice, bed_wav, params) {
            Ok(mixed) => {
                info!(
                    bytes = mixed.len(),
                    voice_gain = params.voice_gain,
                    bed_gain = params.bed_gain,
                    "mixed voice over bed"
                );
                mixed
            }
            Err(e) => {
                warn!(error = %e, "bed mix failed, using voice only");
                voice.to_vec()
            }
        }
    }

    /// The strict pipeline: decode, normalize, resample, loop, fade, mix.
    pub fn try_mix(
        voice: &[u8],
        bed_wav: &[u8],
        params: &MixParameters,
    ) -> Result<Vec<u8>, MixError> {
        params.validate()?;
        let desc = wav::decode(bed_wav)?;
        debug!(
            rate = desc.sample_rate,
            channels = desc.num_channels,
            bits = desc.bits_per_sample,
            bytes = desc.pcm.len(),
            "decoded bed"
        );

        let bed_pcm = conform_head(&desc, pcm::sample_count(voice))?;
        let bed = looper::to_length(&bed_pcm, voice.len())?;
        let bed = fade::apply(&bed, OUTPUT_SAMPLE_RATE, params.fade_in_ms, params.fade_out_ms);
        debug!(bytes = bed.len(), "bed prepared");

        Ok(gain_mixer::mix(voice, &bed, params.voice_gain, params.bed_gain))
    }
}

/// Bring decoded PCM to the output format: mono, 16-bit, 24 kHz.
pub fn conform(desc: &WavDescriptor<'_>) -> Result<Vec<u8>, MixError> {
    conform_head(desc, usize::MAX)
}

/// [`conform`], keeping at most the first `max_samples` output samples.
///
/// A bed only ever contributes its head to a mix, so low-rate beds are not
/// expanded past what the voice can use.
pub fn conform_head(desc: &WavDescriptor<'_>, max_samples: usize) -> Result<Vec<u8>, MixError> {
    let pcm = match desc.bits_per_sample {
        // 8-bit frames are one byte per channel; widen before averaging.
        8 => {
            let wide = bit_depth::to_16_bit(desc.pcm, 8);
            channels::to_mono(&wide, desc.num_channels).into_owned()
        }
        bits => {
            let mono = channels::to_mono(desc.pcm, desc.num_channels);
            bit_depth::to_16_bit(&mono, bits).into_owned()
        }
    };
    let out = resample::linear_head(&pcm, desc.sample_rate, OUTPUT_SAMPLE_RATE, max_samples)?;
    Ok(out.into_owned())
}

/// Read `path` if it exists and starts with the RIFF signature.
fn read_riff_file(path: &Path) -> Result<Option<Vec<u8>>, MixError> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_err() || !wav::has_riff_signature(&magic) {
        return Ok(None);
    }
    let mut bytes = magic.to_vec();
    file.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}
