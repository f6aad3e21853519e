use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf, str::FromStr};
use uuid::Uuid;

pub mod utils;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum QualityPreset {
    #[default]
    Ultra,
    High,
    Standard,
    Artistic,
}

impl QualityPreset {
    #[cfg(test)]
    pub const ALL: [Self; 4] = [Self::Ultra, Self::High, Self::Standard, Self::Artistic];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Ultra => "ultra",
            Self::High => "high",
            Self::Standard => "standard",
            Self::Artistic => "artistic",
        }
    }

    pub const fn default_tags(self) -> &'static str {
        match self {
            Self::Ultra => {
                "masterpiece, best quality, absurdres, newest, very aesthetic, incredibly detailed"
            }
            Self::High => "masterpiece, best quality, absurdres, newest, very aesthetic",
            Self::Standard => "masterpiece, best quality, absurdres, newest",
            Self::Artistic => "masterpiece, best quality, absurdres, very aesthetic, artistic",
        }
    }

    /// Chance of swapping the preset string for a scaffold line.
    pub const fn scaffold_probability(self) -> f64 {
        match self {
            Self::Ultra => 0.70,
            Self::High => 0.60,
            Self::Standard => 0.45,
            Self::Artistic => 0.25,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum DistancePreset {
    FaceCloseup,
    Portrait,
    HalfBody,
    FullBody,
    WideScene,
    #[default]
    Random,
}

impl DistancePreset {
    pub const fn key(self) -> &'static str {
        match self {
            Self::FaceCloseup => "face_closeup",
            Self::Portrait => "portrait",
            Self::HalfBody => "half_body",
            Self::FullBody => "full_body",
            Self::WideScene => "wide_scene",
            Self::Random => "random",
        }
    }

    /// Fixed framing tags; `Random` draws from the camera distance pool instead.
    pub const fn framings(self) -> &'static [&'static str] {
        match self {
            Self::FaceCloseup => &[
                "extreme close-up, face focus",
                "close-up, face only",
                "close-up, portrait",
            ],
            Self::Portrait => &[
                "portrait, head and shoulders",
                "bust shot, upper chest visible",
                "close-up, upper body",
            ],
            Self::HalfBody => &[
                "cowboy shot, thighs up",
                "medium shot, waist up",
                "upper body shot",
            ],
            Self::FullBody => &["full body", "full body shot", "whole body visible", "knee shot"],
            Self::WideScene => &[
                "wide shot, full body with environment",
                "very wide shot, figure in scene",
                "establishing shot",
            ],
            Self::Random => &[],
        }
    }

    /// Closer framings get depth-of-field tags more often.
    pub const fn optics_probability(self) -> f64 {
        match self {
            Self::FaceCloseup => 0.46,
            Self::Portrait => 0.44,
            Self::HalfBody => 0.38,
            Self::FullBody => 0.26,
            Self::WideScene => 0.16,
            Self::Random => 0.30,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum PairingMode {
    /// Every scene slot is sampled independently.
    Pure,
    /// Time of day, location, lighting and weather are kept consistent.
    #[default]
    Paired,
    /// Paired, with at most one deliberate mismatch per prompt.
    Spiky,
}

impl PairingMode {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Pure => "pure",
            Self::Paired => "paired",
            Self::Spiky => "spiky",
        }
    }

    pub const fn pairs(self) -> bool {
        matches!(self, Self::Paired | Self::Spiky)
    }
}

impl FromStr for PairingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pure" => Ok(Self::Pure),
            "paired" => Ok(Self::Paired),
            "spiky" => Ok(Self::Spiky),
            other => Err(anyhow!("Unknown pairing mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub genre: String,
    pub extra_words: String,
    pub distance: DistancePreset,
    pub force_1girl: bool,
    pub quality: QualityPreset,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            genre: "random".to_string(),
            extra_words: String::new(),
            distance: DistancePreset::Random,
            force_1girl: false,
            quality: QualityPreset::Ultra,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraPoolsTuning {
    pub enabled: bool,
    pub master_prob: f64,
    pub max_extra_tags: u32,
    pub per_file: BTreeMap<String, f64>,
}

impl Default for ExtraPoolsTuning {
    fn default() -> Self {
        Self {
            enabled: false,
            master_prob: 0.35,
            max_extra_tags: 2,
            per_file: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Basics {
    pub genre: String,
    pub count: u32,
    pub seed: Option<u64>,
    pub force_1girl: bool,
    pub quality: QualityPreset,
    pub distance: DistancePreset,
    pub extra_tags: String,
    pub negative_tags: String,
    pub ova_locked: bool,
    pub lock_seed: bool,
    pub increment_seed: bool,
}

impl Default for Basics {
    fn default() -> Self {
        Self {
            genre: "random".to_string(),
            count: 1,
            seed: None,
            force_1girl: false,
            quality: QualityPreset::Ultra,
            distance: DistancePreset::Random,
            extra_tags: String::new(),
            negative_tags: String::new(),
            ova_locked: false,
            lock_seed: false,
            increment_seed: true,
        }
    }
}

/// Everything needed to reproduce a batch configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetState {
    pub data_dir: Option<PathBuf>,
    pub basics: Basics,
    pub auto_append: ExtraPoolsTuning,
}

impl PresetState {
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            genre: self.basics.genre.clone(),
            extra_words: self.basics.extra_tags.clone(),
            distance: self.basics.distance,
            force_1girl: self.basics.force_1girl,
            quality: self.basics.quality,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub datetime: DateTime<Utc>,
    pub genre: String,
    pub seed: Option<u64>,
    pub count: u32,
    pub prompts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteData {
    pub id: Uuid,
    pub datetime: DateTime<Utc>,
    pub genre: String,
    pub seed: Option<u64>,
    pub text: String,
}
