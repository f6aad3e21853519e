//! Style presets and preset-state files.

use crate::common::{
    DistancePreset, PresetState, QualityPreset,
    utils::{append_tag, remove_tags},
};
use anyhow::{Context, Result};
use clap::ValueEnum;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Tags the OVA look depends on; kept in the extra tags while locked.
pub const OVA_ANCHOR_TAGS: &[&str] = &[
    "90s anime aesthetic",
    "OVA-era style",
    "vhs scanlines",
    "film grain",
    "cel shading",
    "hand-drawn look",
    "soft chromatic aberration",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    /// Lock the 90s OVA look
    Ova,
    /// 90s look with a safe-for-work negative prompt
    Clean,
    /// Rainy neon night
    Cyber,
    /// Soft warm sunset
    Romance,
}

impl StylePreset {
    pub fn apply(self, state: &mut PresetState) {
        let basics = &mut state.basics;
        match self {
            Self::Ova => lock_ova(state),
            Self::Clean => {
                basics.extra_tags = "90s anime aesthetic, cel shading, film grain".to_string();
                basics.negative_tags = "nsfw, nude, explicit".to_string();
                state.auto_append.enabled = false;
            }
            Self::Cyber => {
                basics.extra_tags =
                    "night city, neon glow, rainy alley, dramatic shadows, 90s anime aesthetic"
                        .to_string();
                basics.negative_tags.clear();
            }
            Self::Romance => {
                basics.extra_tags =
                    "soft lighting, warm palette, sunset, gentle smile, 90s anime aesthetic"
                        .to_string();
            }
        }
        info!("Applied {self:?} preset");
    }
}

/// Merge the OVA anchors into the extra tags and reset the look-defining options.
pub fn lock_ova(state: &mut PresetState) {
    let basics = &mut state.basics;
    basics.extra_tags = OVA_ANCHOR_TAGS
        .iter()
        .fold(basics.extra_tags.clone(), |tags, anchor| append_tag(&tags, anchor));
    basics.genre = crate::genres::RANDOM.to_string();
    basics.quality = QualityPreset::Ultra;
    basics.distance = DistancePreset::Random;
    basics.ova_locked = true;
}

pub fn unlock_ova(state: &mut PresetState) {
    let basics = &mut state.basics;
    basics.extra_tags = remove_tags(&basics.extra_tags, OVA_ANCHOR_TAGS);
    basics.ova_locked = false;
}

pub async fn save_state(path: &Path, state: &PresetState) -> Result<()> {
    let data = serde_json::to_string_pretty(state)?;
    fs::write(path, data)
        .await
        .with_context(|| format!("Failed writing preset {}", path.display()))?;
    info!("Saved preset to {}", path.display());
    Ok(())
}

pub async fn load_state(path: &Path) -> Result<PresetState> {
    let data = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed reading preset {}", path.display()))?;
    let state = serde_json::from_str(&data)
        .with_context(|| format!("Invalid preset file {}", path.display()))?;
    Ok(state)
}
