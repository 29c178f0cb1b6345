use clap::{Parser, Subcommand};
use stationmix::config::{Config, CONFIG_FILE};
use stationmix::orchestrator::{self, MixOrchestrator, MixParameters};
use stationmix::{pcm, wav};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stationmix", about = "Voice-over-music-bed mixer")]
struct Cli {
    /// Config file (default: ./stationmix.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mix a voice WAV over a music bed and write a 24 kHz mono WAV
    Mix {
        /// Voice track (WAV)
        voice: PathBuf,
        /// Music bed path (may use the virtual upload prefix)
        bed: String,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        /// Preset to start from: bed or subtle
        #[arg(short, long, default_value = "bed")]
        preset: String,
        #[command(flatten)]
        overrides: ParamOverrides,
    },
    /// Show the format of a WAV file
    Info {
        file: PathBuf,
    },
    /// Mixer configuration
    Config {
        #[command(subcommand)]
        action: ConfigCmd,
    },
}

#[derive(Subcommand)]
enum ConfigCmd {
    /// Show current configuration
    Show,
    /// Map the virtual upload prefix to a directory
    SetRoot {
        /// URL-style prefix, e.g. /uploads/
        prefix: String,
        /// Directory on disk
        dir: PathBuf,
    },
    /// Edit a preset (bed or subtle)
    Preset {
        name: String,
        #[command(flatten)]
        overrides: ParamOverrides,
    },
}

#[derive(clap::Args)]
struct ParamOverrides {
    /// Voice gain multiplier
    #[arg(long)]
    voice_gain: Option<f32>,
    /// Bed gain multiplier
    #[arg(long)]
    bed_gain: Option<f32>,
    /// Bed fade-in in milliseconds
    #[arg(long)]
    fade_in: Option<u32>,
    /// Bed fade-out in milliseconds
    #[arg(long)]
    fade_out: Option<u32>,
}

impl ParamOverrides {
    fn apply(&self, params: &mut MixParameters) -> Result<(), String> {
        for gain in [self.voice_gain, self.bed_gain].into_iter().flatten() {
            if !gain.is_finite() || gain < 0.0 {
                return Err(format!("gain must be a non-negative number, got {}", gain));
            }
        }
        if let Some(g) = self.voice_gain {
            params.voice_gain = g;
        }
        if let Some(g) = self.bed_gain {
            params.bed_gain = g;
        }
        if let Some(ms) = self.fade_in {
            params.fade_in_ms = ms;
        }
        if let Some(ms) = self.fade_out {
            params.fade_out_ms = ms;
        }
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stationmix=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

    if let Err(e) = run(cli.command, &config_path) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, config_path: &Path) -> Result<(), String> {
    let mut config = Config::load(config_path);

    match command {
        Commands::Mix {
            voice,
            bed,
            output,
            preset,
            overrides,
        } => {
            let mut params = config.preset(&preset)?;
            overrides.apply(&mut params)?;

            let voice_pcm = load_voice(&voice)?;
            let mixer = MixOrchestrator::from_config(&config);
            let mixed = mixer.mix_voice_with_music_bed(&voice_pcm, &bed, &params);

            fs::write(&output, wav::encode_output(&mixed))
                .map_err(|e| format!("Cannot write '{}': {}", output.display(), e))?;
            println!(
                "Wrote {} ({:.2}s, voice {} / bed {} @ {})",
                output.display(),
                pcm::duration_secs(&mixed, wav::OUTPUT_SAMPLE_RATE),
                params.voice_gain,
                params.bed_gain,
                mixer.resolver().resolve(&bed).display()
            );
        }
        Commands::Info { file } => {
            let bytes = fs::read(&file)
                .map_err(|e| format!("Cannot open '{}': {}", file.display(), e))?;
            let desc = wav::decode(&bytes).map_err(|e| format!("{}: {}", file.display(), e))?;
            println!(
                "{}: format {} | {} Hz | {} ch | {}-bit | {} bytes | {:.2}s{}",
                file.display(),
                desc.audio_format,
                desc.sample_rate,
                desc.num_channels,
                desc.bits_per_sample,
                desc.pcm.len(),
                desc.duration_secs(),
                if desc.is_canonical() { " (canonical)" } else { "" }
            );
        }
        Commands::Config { action } => match action {
            ConfigCmd::Show => {
                println!("Config file: {}", config_path.display());
                println!("Virtual root: {} -> {}", config.virtual_prefix, config.virtual_root.display());
                for (name, p) in [("bed", &config.music_bed), ("subtle", &config.subtle_bed)] {
                    println!(
                        "  {:<7} voice {:.2} | bed {:.2} | fade in {}ms | fade out {}ms",
                        name, p.voice_gain, p.bed_gain, p.fade_in_ms, p.fade_out_ms
                    );
                }
            }
            ConfigCmd::SetRoot { prefix, dir } => {
                config.virtual_prefix = prefix;
                config.virtual_root = dir;
                config.save(config_path)?;
                println!("Virtual root: {} -> {}", config.virtual_prefix, config.virtual_root.display());
            }
            ConfigCmd::Preset { name, overrides } => {
                overrides.apply(config.preset_mut(&name)?)?;
                config.save(config_path)?;
                println!("Preset '{}' updated", name);
            }
        },
    }

    Ok(())
}

/// Read a voice WAV and bring it to 24 kHz mono 16-bit if it isn't already.
fn load_voice(path: &Path) -> Result<Vec<u8>, String> {
    let bytes =
        fs::read(path).map_err(|e| format!("Cannot open '{}': {}", path.display(), e))?;
    let desc = wav::decode(&bytes).map_err(|e| format!("{}: {}", path.display(), e))?;
    let mut voice_pcm = if desc.is_canonical() {
        desc.pcm.to_vec()
    } else {
        tracing::info!(
            rate = desc.sample_rate,
            channels = desc.num_channels,
            bits = desc.bits_per_sample,
            "converting voice to output format"
        );
        orchestrator::conform(&desc).map_err(|e| format!("{}: {}", path.display(), e))?
    };
    // Whole samples only, so the bed can be looped to the same length.
    voice_pcm.truncate(voice_pcm.len() & !1);
    Ok(voice_pcm)
}
