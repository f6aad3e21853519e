use crate::{common::PresetState, generator::Generator};
use anyhow::{Result, bail};
use log::{debug, info};

const PROGRESS_EVERY: u32 = 10;

/// Seed for prompt `index`: locked keeps the base, otherwise it may step by one per prompt.
pub fn seed_for(base: Option<u64>, index: u32, lock: bool, increment: bool) -> Option<u64> {
    match base {
        Some(seed) if !lock && increment => Some(seed.wrapping_add(u64::from(index))),
        other => other,
    }
}

pub fn with_negative(prompt: String, negative: &str) -> String {
    let negative = negative.trim();
    if negative.is_empty() {
        prompt
    } else {
        format!("{prompt} | NEGATIVE: {negative}")
    }
}

/// Generate `state.basics.count` prompts with the preset's options and auto-append tuning.
pub fn run_batch(generator: &mut Generator<'_>, state: &PresetState) -> Result<Vec<String>> {
    let basics = &state.basics;
    if basics.count == 0 {
        bail!("Count must be greater than zero");
    }
    let opts = state.generate_options();

    let mut prompts = Vec::with_capacity(basics.count as usize);
    for index in 0..basics.count {
        let seed = seed_for(basics.seed, index, basics.lock_seed, basics.increment_seed);
        let generated = generator.generate_with_extras(&opts, &state.auto_append, seed);
        debug!(
            "Prompt {} anchored at {} / {} (season: {:?})",
            index + 1,
            generated.time.key(),
            generated.location_type.key(),
            generated.season
        );
        prompts.push(with_negative(generated.text, &basics.negative_tags));

        let done = index + 1;
        if basics.count > PROGRESS_EVERY && done % PROGRESS_EVERY == 0 {
            info!("Generated {done}/{} prompts", basics.count);
        }
    }
    info!(
        "Batch of {} {} prompts done ({} quality, {} framing, seed: {:?})",
        prompts.len(),
        basics.genre,
        basics.quality.key(),
        basics.distance.key(),
        basics.seed
    );
    Ok(prompts)
}
