#![allow(
    clippy::too_many_lines,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::module_name_repetitions
)]

mod batch;
mod common;
mod config;
mod data;
mod generator;
mod genres;
mod library;
mod presets;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use common::{DistancePreset, PairingMode, PresetState, QualityPreset};
use config::Config;
use data::{DataPools, Pool};
use generator::Generator;
use log::{LevelFilter, info};
use presets::StylePreset;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "promptloom")]
#[command(about = "Coherent anime image prompt generator.", long_about = None)]
struct Cli {
    /// Directory holding the word lists
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// History and favorites file
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a batch of prompts to stdout
    Generate(GenerateArgs),
    /// List genre presets
    Genres,
    /// Show which word lists are loaded
    Pools,
    Preset(PresetArgs),
    History(HistoryArgs),
    Favorite(FavoriteArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Start from a saved preset file
    #[arg(long)]
    preset: Option<PathBuf>,

    #[command(flatten)]
    settings: SettingsArgs,

    #[arg(long, value_enum)]
    mode: Option<PairingMode>,

    /// Spike chance for spiky mode (0..1)
    #[arg(long)]
    spike_chance: Option<f64>,

    /// Do not record the batch in history
    #[arg(long)]
    no_history: bool,
}

/// Options shared by `generate` and `preset save`, layered over a preset.
#[derive(Debug, Default, Args)]
struct SettingsArgs {
    #[arg(short, long)]
    genre: Option<String>,

    #[arg(short = 'n', long)]
    count: Option<u32>,

    #[arg(short, long)]
    seed: Option<u64>,

    /// Reuse the same seed for every prompt
    #[arg(long)]
    lock_seed: bool,

    /// Keep the seed fixed instead of stepping it per prompt
    #[arg(long)]
    no_increment: bool,

    #[arg(long)]
    force_1girl: bool,

    #[arg(long, value_enum)]
    quality: Option<QualityPreset>,

    #[arg(long, value_enum)]
    distance: Option<DistancePreset>,

    /// Tags appended to every prompt
    #[arg(long)]
    extra: Option<String>,

    /// Negative tags printed after each prompt
    #[arg(long)]
    negative: Option<String>,

    /// Apply a style preset before the other options
    #[arg(long, value_enum)]
    style: Option<StylePreset>,

    /// Remove the OVA anchor tags
    #[arg(long)]
    unlock_ova: bool,

    /// Enable tags from extra word lists
    #[arg(long)]
    auto_append: bool,

    #[arg(long)]
    master_prob: Option<f64>,

    #[arg(long)]
    max_extra: Option<u32>,

    /// Per-file chance for an extra list, as FILE=PROB
    #[arg(long = "extra-prob", value_parser = parse_file_prob)]
    extra_prob: Vec<(String, f64)>,
}

impl SettingsArgs {
    fn apply(self, state: &mut PresetState) {
        if let Some(style) = self.style {
            style.apply(state);
        }
        if self.unlock_ova {
            presets::unlock_ova(state);
        }

        let basics = &mut state.basics;
        if let Some(genre) = self.genre {
            // Unknown names fall back to random, with a warning
            basics.genre = genres::resolve(&genre).name.to_string();
        }
        if let Some(count) = self.count {
            basics.count = count;
        }
        if self.seed.is_some() {
            basics.seed = self.seed;
        }
        basics.lock_seed |= self.lock_seed;
        if self.no_increment {
            basics.increment_seed = false;
        }
        basics.force_1girl |= self.force_1girl;
        if let Some(quality) = self.quality {
            basics.quality = quality;
        }
        if let Some(distance) = self.distance {
            basics.distance = distance;
        }
        if let Some(extra) = self.extra {
            basics.extra_tags = extra;
        }
        if let Some(negative) = self.negative {
            basics.negative_tags = negative;
        }

        let tuning = &mut state.auto_append;
        tuning.enabled |= self.auto_append;
        if let Some(master_prob) = self.master_prob {
            tuning.master_prob = master_prob.clamp(0.0, 1.0);
        }
        if let Some(max_extra) = self.max_extra {
            tuning.max_extra_tags = max_extra;
        }
        for (file, prob) in self.extra_prob {
            tuning.per_file.insert(file, prob.clamp(0.0, 1.0));
        }
    }
}

fn parse_file_prob(s: &str) -> Result<(String, f64), String> {
    let (file, prob) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FILE=PROB, got '{s}'"))?;
    let prob = prob
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad probability '{prob}': {e}"))?;
    Ok((file.trim().to_string(), prob))
}

#[derive(Debug, Args)]
struct PresetArgs {
    #[command(subcommand)]
    cmd: PresetCmd,
}

#[derive(Debug, Subcommand)]
enum PresetCmd {
    /// Write the resulting settings to a JSON file
    Save {
        path: PathBuf,

        /// Layer over an existing preset
        #[arg(long)]
        from: Option<PathBuf>,

        #[command(flatten)]
        settings: SettingsArgs,
    },
    Show {
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
struct HistoryArgs {
    #[command(subcommand)]
    cmd: Option<HistoryCmd>,
}

#[derive(Debug, Subcommand)]
enum HistoryCmd {
    List {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    Clear,
}

#[derive(Debug, Args)]
struct FavoriteArgs {
    #[command(subcommand)]
    cmd: FavoriteCmd,
}

#[derive(Debug, Subcommand)]
enum FavoriteCmd {
    /// Save a prompt, or the last generated one
    Add { text: Option<String> },
    List,
    /// Remove by id or id prefix
    Remove { id: String },
}

const fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    simple_logger::SimpleLogger::new()
        .with_level(log_level(cli.verbose))
        .init()?;

    let config = Config::from_env()?;
    let library_path = cli.library.clone().unwrap_or_else(|| config.library_path.clone());

    match cli.cmd {
        Command::Generate(args) => generate(args, cli.data_dir, &config, &library_path).await,
        Command::Genres => {
            for genre in genres::list() {
                println!("{:<20} {:<10} {}", genre.name, genre.mood.key(), genre.description);
            }
            Ok(())
        }
        Command::Pools => {
            let dir = cli.data_dir.unwrap_or_else(|| config.data_dir.clone());
            show_pools(&dir)
        }
        Command::Preset(args) => match args.cmd {
            PresetCmd::Save {
                path,
                from,
                settings,
            } => {
                let mut state = match from {
                    Some(from) => presets::load_state(&from).await?,
                    None => PresetState::default(),
                };
                if cli.data_dir.is_some() {
                    state.data_dir = cli.data_dir;
                }
                settings.apply(&mut state);
                presets::save_state(&path, &state).await
            }
            PresetCmd::Show { path } => {
                let state = presets::load_state(&path).await?;
                println!("{}", serde_json::to_string_pretty(&state)?);
                Ok(())
            }
        },
        Command::History(args) => history(args.cmd, &library_path).await,
        Command::Favorite(args) => favorite(args.cmd, &library_path).await,
    }
}

async fn generate(
    args: GenerateArgs,
    data_dir: Option<PathBuf>,
    config: &Config,
    library_path: &Path,
) -> Result<()> {
    let mut state = match &args.preset {
        Some(path) => presets::load_state(path).await?,
        None => PresetState::default(),
    };
    args.settings.apply(&mut state);

    let dir = data_dir
        .or_else(|| state.data_dir.clone())
        .unwrap_or_else(|| config.data_dir.clone());
    let pools = DataPools::load(&dir)
        .with_context(|| format!("Failed loading word lists from {}", dir.display()))?;

    let mode = args.mode.unwrap_or(config.pairing);
    let spike_chance = args
        .spike_chance
        .map_or(config.wild_spike_chance, |c| c.clamp(0.0, 1.0));
    let mut generator = Generator::new(&pools, mode, spike_chance);
    info!(
        "Generating {} {} prompts in {} mode",
        state.basics.count,
        state.basics.genre,
        generator.mode().key()
    );

    let prompts = batch::run_batch(&mut generator, &state)?;
    for prompt in &prompts {
        println!("{prompt}");
    }

    if !args.no_history {
        let mut library = library::read_library(library_path).await?;
        library.push_history(&state.basics.genre, state.basics.seed, prompts);
        library::write_library(library_path, &library).await?;
    }
    Ok(())
}

fn show_pools(dir: &Path) -> Result<()> {
    let pools = DataPools::load(dir)?;
    println!("Data directory: {}", pools.dir().display());
    for pool in Pool::ALL {
        match pools.real(*pool) {
            Some(items) => println!("{:<36} {:>5}", pool.file_name(), items.len()),
            None => println!("{:<36} {:>5}", pool.file_name(), "-"),
        }
    }
    for (file, items) in pools.extras() {
        println!("{file:<36} {:>5}  (extra)", items.len());
    }
    Ok(())
}

async fn history(cmd: Option<HistoryCmd>, path: &Path) -> Result<()> {
    let mut library = library::read_library(path).await?;
    match cmd.unwrap_or(HistoryCmd::List { limit: 10 }) {
        HistoryCmd::List { limit } => {
            for entry in library.history.iter().rev().take(limit) {
                println!(
                    "{}  {}  seed {}  x{}",
                    entry.datetime.format("%Y-%m-%d %H:%M"),
                    entry.genre,
                    entry.seed.map_or_else(|| "-".to_string(), |s| s.to_string()),
                    entry.count
                );
                for prompt in &entry.prompts {
                    println!("    {prompt}");
                }
            }
            Ok(())
        }
        HistoryCmd::Clear => {
            let cleared = library.history.len();
            library.history.clear();
            library::write_library(path, &library).await?;
            println!("Cleared {cleared} history entries");
            Ok(())
        }
    }
}

async fn favorite(cmd: FavoriteCmd, path: &Path) -> Result<()> {
    let mut library = library::read_library(path).await?;
    match cmd {
        FavoriteCmd::Add { text } => {
            let id = library.add_favorite(text.as_deref())?;
            library::write_library(path, &library).await?;
            println!("{id}");
        }
        FavoriteCmd::List => {
            for favorite in library.favorites_sorted() {
                println!(
                    "{}  {}  {}",
                    &favorite.id.to_string()[..8],
                    favorite.datetime.format("%Y-%m-%d %H:%M"),
                    favorite.text
                );
            }
        }
        FavoriteCmd::Remove { id } => {
            let removed = library.remove_favorite(&id)?;
            library::write_library(path, &library).await?;
            println!("Removed {}", removed.id);
        }
    }
    Ok(())
}
