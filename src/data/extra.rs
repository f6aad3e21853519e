use super::{Pool, read_list};
use crate::common::{
    ExtraPoolsTuning,
    utils::{chance, clean_prompt},
};
use anyhow::{Context, Result};
use log::{debug, warn};
use rand::{Rng, seq::IndexedRandom};
use std::{collections::BTreeMap, fs, io::ErrorKind, path::Path};

/// Load every `.txt` list in `dir` the generator does not read itself.
///
/// Files with no entries are skipped. A missing directory yields no pools.
pub fn discover(dir: &Path) -> Result<BTreeMap<String, Vec<String>>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e).with_context(|| format!("Failed listing {}", dir.display())),
    };

    let mut pools = BTreeMap::new();
    for entry in entries {
        let entry = entry?;
        let Ok(file_name) = entry.file_name().into_string() else {
            warn!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        if !file_name.to_lowercase().ends_with(".txt") || Pool::is_known_file(&file_name) {
            continue;
        }
        match read_list(dir, &file_name)? {
            Some(items) if !items.is_empty() => {
                debug!("Extra pool {file_name} with {} entries", items.len());
                pools.insert(file_name, items);
            }
            _ => debug!("Extra pool {file_name} is empty, skipping"),
        }
    }
    Ok(pools)
}

/// Occasionally append tags drawn from extra pools, per the tuning's probabilities.
pub fn append<R: Rng + ?Sized>(
    rng: &mut R,
    prompt: &str,
    extras: &BTreeMap<String, Vec<String>>,
    tuning: &ExtraPoolsTuning,
) -> String {
    if !tuning.enabled || extras.is_empty() || !chance(rng, tuning.master_prob) {
        return prompt.to_string();
    }

    let candidates = extras
        .keys()
        .filter(|file| {
            let p = tuning.per_file.get(*file).copied().unwrap_or(0.0);
            p > 0.0 && chance(rng, p)
        })
        .collect::<Vec<_>>();
    if candidates.is_empty() {
        return prompt.to_string();
    }

    let k = (tuning.max_extra_tags.max(1) as usize).min(candidates.len());
    let files = candidates
        .choose_multiple(rng, k)
        .copied()
        .collect::<Vec<_>>();
    let picked = files
        .into_iter()
        .filter_map(|file| extras.get(file).and_then(|items| items.choose(rng)))
        .cloned()
        .collect::<Vec<_>>();
    if picked.is_empty() {
        return prompt.to_string();
    }

    debug!("Appending extra tags: {}", picked.join(", "));
    clean_prompt(&format!("{prompt}, {}", picked.join(", ")))
}
