//! Headless integration tests for the voice-over-bed pipeline.
//!
//! These write real WAV files into temp directories and drive the public
//! orchestrator end-to-end, the way the station app calls it.

use stationmix::config::Config;
use stationmix::orchestrator::{BedPathResolver, MixOrchestrator, MixParameters};
use stationmix::pcm::{samples, to_bytes};
use stationmix::wav::{self, FormatError, OUTPUT_SAMPLE_RATE};
use std::fs;
use std::path::Path;

fn voice(len_samples: usize, value: i16) -> Vec<u8> {
    to_bytes(vec![value; len_samples])
}

fn flat(voice_gain: f32, bed_gain: f32) -> MixParameters {
    MixParameters {
        voice_gain,
        bed_gain,
        fade_in_ms: 0,
        fade_out_ms: 0,
    }
}

/// Build a WAV with an arbitrary channel count / bit depth and extra chunks.
fn custom_wav(rate: u32, channels: u16, bits: u16, pcm: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(b"LIST");
    body.extend_from_slice(&4u32.to_le_bytes());
    body.extend_from_slice(b"INFO");
    body.extend_from_slice(b"fmt ");
    body.extend_from_slice(&16u32.to_le_bytes());
    body.extend_from_slice(&1u16.to_le_bytes());
    body.extend_from_slice(&channels.to_le_bytes());
    body.extend_from_slice(&rate.to_le_bytes());
    let block_align = channels * bits / 8;
    body.extend_from_slice(&(rate * block_align as u32).to_le_bytes());
    body.extend_from_slice(&block_align.to_le_bytes());
    body.extend_from_slice(&bits.to_le_bytes());
    body.extend_from_slice(b"data");
    body.extend_from_slice(&(pcm.len() as u32).to_le_bytes());
    body.extend_from_slice(pcm);

    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(4 + body.len() as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(&body);
    out
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> String {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path.to_string_lossy().into_owned()
}

// ── Codec ────────────────────────────────────────────────────────────────

#[test]
fn encode_decode_round_trip() {
    let pcm = to_bytes((0..480).map(|i| (i * 67 - 16_000) as i16));
    let encoded = wav::encode(&pcm, OUTPUT_SAMPLE_RATE);
    let desc = wav::decode(&encoded).unwrap();
    assert_eq!(desc.pcm, &pcm[..]);
    assert_eq!(desc.sample_rate, OUTPUT_SAMPLE_RATE);
    assert_eq!(desc.num_channels, 1);
    assert_eq!(desc.bits_per_sample, 16);
    assert_eq!(desc.audio_format, 1);
}

#[test]
fn decode_errors_are_typed() {
    assert_eq!(wav::decode(b"OggS\0\0\0\0\0\0\0\0").unwrap_err(), FormatError::NotWav);

    let mut data_first = Vec::new();
    data_first.extend_from_slice(b"RIFF\x0e\x00\x00\x00WAVE");
    data_first.extend_from_slice(b"data\x02\x00\x00\x00\x00\x00");
    assert_eq!(wav::decode(&data_first).unwrap_err(), FormatError::MissingFmtChunk);

    // drop the trailing empty data chunk header
    let full = custom_wav(8000, 1, 16, &[]);
    let fmt_only = &full[..full.len() - 8];
    assert_eq!(wav::decode(fmt_only).unwrap_err(), FormatError::MissingDataChunk);
}

// ── Orchestrator: fallbacks ──────────────────────────────────────────────

#[test]
fn missing_bed_returns_voice_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let v = voice(100, 1234);
    let bed = dir.path().join("missing.wav");
    let out = MixOrchestrator::default().mix_voice_with_music_bed(
        &v,
        &bed.to_string_lossy(),
        &MixParameters::default(),
    );
    assert_eq!(out, v);
}

#[test]
fn non_wav_bed_returns_voice_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let bed = write(dir.path(), "bed.mp3", b"ID3\x03\x00\x00\x00\x00\x00\x00fake mp3 data");
    let v = voice(100, -500);
    let out = MixOrchestrator::default().mix_voice_with_music_bed(&v, &bed, &MixParameters::default());
    assert_eq!(out, v);
}

#[test]
fn tiny_and_malformed_beds_return_voice_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let v = voice(64, 77);
    let orchestrator = MixOrchestrator::default();

    let short = write(dir.path(), "short.wav", b"RI");
    assert_eq!(orchestrator.mix_voice_with_music_bed(&v, &short, &MixParameters::default()), v);

    let riff_only = write(dir.path(), "riff.wav", b"RIFF\x04\x00\x00\x00WAVE");
    assert_eq!(orchestrator.mix_voice_with_music_bed(&v, &riff_only, &MixParameters::default()), v);

    let not_wave = write(dir.path(), "avi.wav", b"RIFF\x04\x00\x00\x00AVI LIST");
    assert_eq!(orchestrator.mix_subtle_bed(&v, &not_wave), v);
}

#[test]
fn directory_as_bed_returns_voice_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let v = voice(10, 5);
    let out = MixOrchestrator::default().mix_voice_with_music_bed(
        &v,
        &dir.path().to_string_lossy(),
        &MixParameters::default(),
    );
    assert_eq!(out, v);
}

// ── Orchestrator: real mixes ─────────────────────────────────────────────

#[test]
fn short_stereo_44k_bed_is_conformed_and_looped() {
    let dir = tempfile::tempdir().unwrap();
    // 0.1 s of constant stereo at 44.1 kHz
    let frames: Vec<i16> = (0..4410).flat_map(|_| [2000i16, 4000]).collect();
    let bed = write(dir.path(), "bed.wav", &custom_wav(44_100, 2, 16, &to_bytes(frames)));

    // 1 s of voice
    let v = voice(24_000, 0);
    let out = MixOrchestrator::default().mix_voice_with_music_bed(&v, &bed, &flat(1.0, 0.5));

    assert_eq!(out.len(), v.len());
    // mono 3000 * 0.5 everywhere the bed was looped over
    assert!(samples(&out).all(|s| s == 1500));
}

#[test]
fn fades_shape_the_bed_edges() {
    let dir = tempfile::tempdir().unwrap();
    let bed = write(
        dir.path(),
        "bed.wav",
        &wav::encode(&voice(24_000, 10_000), OUTPUT_SAMPLE_RATE),
    );
    let v = voice(24_000, 0);
    let params = MixParameters {
        voice_gain: 1.0,
        bed_gain: 1.0,
        fade_in_ms: 500,
        fade_out_ms: 500,
    };
    let out: Vec<i16> = samples(&MixOrchestrator::default().mix_voice_with_music_bed(&v, &bed, &params)).collect();

    assert_eq!(out[0], 0);
    assert_eq!(out[6_000], 5_000);
    assert_eq!(out[12_000], 10_000);
    assert_eq!(out[18_000], 5_000);
    assert_eq!(out[23_999], 1);
}

#[test]
fn full_scale_voice_with_hot_gain_clips() {
    let dir = tempfile::tempdir().unwrap();
    let bed = write(
        dir.path(),
        "bed.wav",
        &wav::encode(&voice(100, i16::MAX), OUTPUT_SAMPLE_RATE),
    );
    let v = to_bytes([i16::MAX, i16::MIN, i16::MAX, i16::MIN]);
    let out: Vec<i16> =
        samples(&MixOrchestrator::default().mix_voice_with_music_bed(&v, &bed, &flat(10.0, 1.0))).collect();
    assert_eq!(out, vec![i16::MAX, i16::MIN, i16::MAX, i16::MIN]);
}

#[test]
fn eight_bit_mono_bed() {
    let dir = tempfile::tempdir().unwrap();
    let bed = write(dir.path(), "bed8.wav", &custom_wav(OUTPUT_SAMPLE_RATE, 1, 8, &[0, 128, 255, 128]));
    let v = voice(4, 0);
    let out: Vec<i16> =
        samples(&MixOrchestrator::default().mix_voice_with_music_bed(&v, &bed, &flat(1.0, 1.0))).collect();
    assert_eq!(out, vec![-32767, 0, 32511, 0]);
}

#[test]
fn subtle_preset_uses_quieter_bed() {
    let dir = tempfile::tempdir().unwrap();
    let bed = write(
        dir.path(),
        "bed.wav",
        &wav::encode(&voice(96_000, 20_000), OUTPUT_SAMPLE_RATE),
    );
    let v = voice(96_000, 0);
    let orchestrator = MixOrchestrator::default();

    let subtle: Vec<i16> = samples(&orchestrator.mix_subtle_bed(&v, &bed)).collect();
    let regular: Vec<i16> =
        samples(&orchestrator.mix_voice_with_music_bed(&v, &bed, &MixParameters::music_bed())).collect();

    // middle of the buffer, past every fade
    assert_eq!(subtle[48_000], 3_000);
    assert_eq!(regular[48_000], 5_000);
}

#[test]
fn virtual_prefix_resolves_under_configured_root() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("beds")).unwrap();
    fs::write(
        dir.path().join("beds/morning.wav"),
        wav::encode(&voice(10, 1000), OUTPUT_SAMPLE_RATE),
    )
    .unwrap();

    let mut config = Config::default();
    config.virtual_root = dir.path().to_path_buf();
    let orchestrator = MixOrchestrator::from_config(&config);
    assert_eq!(
        orchestrator.resolver(),
        &BedPathResolver::new("/uploads/", dir.path())
    );

    let v = voice(10, 0);
    let out = orchestrator.mix_voice_with_music_bed(&v, "/uploads/beds/morning.wav", &flat(1.0, 1.0));
    assert!(samples(&out).all(|s| s == 1000));
}

#[test]
fn output_encodes_to_canonical_wav() {
    let dir = tempfile::tempdir().unwrap();
    let bed = write(dir.path(), "bed.wav", &custom_wav(16_000, 1, 16, &voice(1600, 800)));
    let v = voice(2400, 100);
    let mixed = MixOrchestrator::default().mix_voice_with_music_bed(&v, &bed, &MixParameters::default());
    let encoded = wav::encode_output(&mixed);

    assert_eq!(encoded.len(), wav::HEADER_SIZE + v.len());
    let desc = wav::decode(&encoded).unwrap();
    assert!(desc.is_canonical());
    assert!((desc.duration_secs() - 0.1).abs() < 1e-9);
}

#[test]
fn concurrent_mixes_share_one_orchestrator() {
    let dir = tempfile::tempdir().unwrap();
    let bed = write(
        dir.path(),
        "bed.wav",
        &wav::encode(&voice(1000, 4000), OUTPUT_SAMPLE_RATE),
    );
    let orchestrator = MixOrchestrator::default();

    std::thread::scope(|s| {
        for n in 1..=4i16 {
            let orchestrator = &orchestrator;
            let bed = &bed;
            s.spawn(move || {
                let v = voice(500, n * 100);
                let out = orchestrator.mix_voice_with_music_bed(&v, bed, &flat(1.0, 0.5));
                assert!(samples(&out).all(|x| x == n * 100 + 2000));
            });
        }
    });
}
