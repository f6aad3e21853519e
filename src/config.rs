use crate::common::PairingMode;
use anyhow::{Context, Result};
use log::warn;
use std::{
    env,
    path::{Path, PathBuf},
};

pub const DEFAULT_SPIKE_CHANCE: f64 = 0.06;
pub const DEFAULT_LIBRARY: &str = "library.ron";
const DEFAULT_DATA_DIR: &str = "data";

/// Settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub pairing: PairingMode,
    pub wild_spike_chance: f64,
    pub data_dir: PathBuf,
    pub library_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let pairing = match get("PAIRING_MODE") {
            Some(mode) => mode
                .parse::<PairingMode>()
                .with_context(|| format!("Invalid PAIRING_MODE '{mode}'"))?,
            None => PairingMode::default(),
        };

        let wild_spike_chance = match get("WILD_SPIKE_CHANCE") {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => value.clamp(0.0, 1.0),
                _ => {
                    warn!("Ignoring invalid WILD_SPIKE_CHANCE '{raw}'");
                    DEFAULT_SPIKE_CHANCE
                }
            },
            None => DEFAULT_SPIKE_CHANCE,
        };

        let data_dir = get("PROMPTLOOM_DATA_DIR").map_or_else(default_data_dir, PathBuf::from);
        let library_path =
            get("PROMPTLOOM_LIBRARY").map_or_else(|| PathBuf::from(DEFAULT_LIBRARY), PathBuf::from);

        Ok(Self {
            pairing,
            wild_spike_chance,
            data_dir,
            library_path,
        })
    }
}

/// `data/` next to the executable when it exists, else `data/` in the working directory.
fn default_data_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::parent)
        .map(|dir| dir.join(DEFAULT_DATA_DIR))
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}
