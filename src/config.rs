use crate::orchestrator::MixParameters;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CONFIG_FILE: &str = "stationmix.json";

const DEFAULT_VIRTUAL_PREFIX: &str = "/uploads/";
const DEFAULT_VIRTUAL_ROOT: &str = "public/uploads";

/// Persisted mixer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Parameters for the regular music-bed mix.
    pub music_bed: MixParameters,
    /// Parameters for the subtle bed under narration.
    pub subtle_bed: MixParameters,
    /// URL-style prefix the station app uses for uploaded files.
    pub virtual_prefix: String,
    /// Directory the prefix maps to.
    pub virtual_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            music_bed: MixParameters::music_bed(),
            subtle_bed: MixParameters::subtle_bed(),
            virtual_prefix: DEFAULT_VIRTUAL_PREFIX.to_string(),
            virtual_root: PathBuf::from(DEFAULT_VIRTUAL_ROOT),
        }
    }
}

impl Config {
    /// Load config from JSON, or fall back to defaults if missing or unreadable.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(data) => match serde_json::from_str::<Config>(&data) {
                    Ok(mut config) => {
                        config.reset_invalid_presets(path);
                        return config;
                    }
                    Err(e) => warn!("corrupt config file {}, using defaults: {}", path.display(), e),
                },
                Err(e) => warn!("could not read config file {}: {}", path.display(), e),
            }
        }
        Config::default()
    }

    /// Replace any preset with an unusable gain by its built-in default.
    fn reset_invalid_presets(&mut self, path: &Path) {
        let presets = [
            ("music_bed", &mut self.music_bed, MixParameters::music_bed()),
            ("subtle_bed", &mut self.subtle_bed, MixParameters::subtle_bed()),
        ];
        for (name, params, fallback) in presets {
            if let Err(e) = params.validate() {
                warn!("{} preset in {} is invalid, using defaults: {}", name, path.display(), e);
                *params = fallback;
            }
        }
    }

    /// Persist config as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| format!("Serialize error: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Write error: {}", e))?;
        Ok(())
    }

    /// Look up a preset by name (`bed` or `subtle`, case-insensitive).
    pub fn preset(&self, name: &str) -> Result<MixParameters, String> {
        self.preset_ref(name).copied()
    }

    /// Mutable preset lookup, for editing from the CLI.
    pub fn preset_mut(&mut self, name: &str) -> Result<&mut MixParameters, String> {
        match name.to_ascii_lowercase().as_str() {
            "bed" | "music_bed" => Ok(&mut self.music_bed),
            "subtle" | "subtle_bed" => Ok(&mut self.subtle_bed),
            _ => Err(unknown_preset(name)),
        }
    }

    fn preset_ref(&self, name: &str) -> Result<&MixParameters, String> {
        match name.to_ascii_lowercase().as_str() {
            "bed" | "music_bed" => Ok(&self.music_bed),
            "subtle" | "subtle_bed" => Ok(&self.subtle_bed),
            _ => Err(unknown_preset(name)),
        }
    }
}

fn unknown_preset(name: &str) -> String {
    format!("Unknown preset '{}' (expected 'bed' or 'subtle')", name)
}
