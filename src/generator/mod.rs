//! Prompt assembly on top of the loaded word lists.

mod character;
mod outfit;
pub mod scene;
mod style;

use crate::{
    common::{
        ExtraPoolsTuning, GenerateOptions, PairingMode,
        utils::{clean_prompt, vec_str},
    },
    data::{DataPools, Pool, extra},
    genres,
};
use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use scene::{LocationType, Season, TimeKey};

pub(crate) fn pick_str<'b, R: Rng + ?Sized>(rng: &mut R, items: &[&'b str]) -> Option<&'b str> {
    items.choose(rng).copied()
}

/// One assembled prompt and the scene it was anchored on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub text: String,
    pub time: TimeKey,
    pub location_type: LocationType,
    pub season: Option<Season>,
}

pub struct Generator<'a> {
    pools: &'a DataPools,
    mode: PairingMode,
    spike_chance: f64,
    spike_budget: u8,
    rng: StdRng,
}

impl<'a> Generator<'a> {
    pub fn new(pools: &'a DataPools, mode: PairingMode, spike_chance: f64) -> Self {
        Self {
            pools,
            mode,
            spike_chance,
            spike_budget: 0,
            rng: StdRng::from_os_rng(),
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub const fn mode(&self) -> PairingMode {
        self.mode
    }

    /// Build one prompt. A seed reseeds the generator first so the result is reproducible.
    pub fn generate_prompt(&mut self, opts: &GenerateOptions, seed: Option<u64>) -> Generated {
        if let Some(seed) = seed {
            self.reseed(seed);
        }
        self.reset_spike_budget();

        let pools = self.pools;
        let genre = genres::resolve(&opts.genre);
        let mut parts: Vec<String> = Vec::new();

        let quality = self.pick_quality(opts.quality);
        parts.push(quality.to_string());
        if let Some(booster) = self.pick_booster(quality) {
            parts.push(booster.to_string());
        }
        parts.push(
            pools
                .pick(&mut self.rng, Pool::StyleEnhancersStandard)
                .to_string(),
        );

        parts.push(self.generate_character(opts.force_1girl));
        let outfit_at = parts.len();
        parts.push(self.coherent_expression(genre.mood).to_string());
        parts.push(self.generate_pose(genre));

        let mood = self.generate_mood();
        if !mood.is_empty() {
            parts.push(mood.clone());
        }
        let scene = self.generate_scene(genre, opts.distance);
        parts.push(scene.text.clone());

        // Outfit sits right after the character
        parts.insert(outfit_at, self.generate_outfit(genre));

        let context = format!("{mood}, {}", scene.text);
        parts.push(self.generate_style(&context));

        if !opts.extra_words.trim().is_empty() {
            parts.push(opts.extra_words.trim().to_string());
        }

        debug!("Generated {} prompt ({} mode)", genre.name, self.mode.key());
        Generated {
            text: clean_prompt(&vec_str(&parts)),
            time: scene.time,
            location_type: scene.location_type,
            season: scene.season,
        }
    }

    /// As [`Self::generate_prompt`], then maybe append tags from extra pools.
    pub fn generate_with_extras(
        &mut self,
        opts: &GenerateOptions,
        tuning: &ExtraPoolsTuning,
        seed: Option<u64>,
    ) -> Generated {
        let mut generated = self.generate_prompt(opts, seed);
        generated.text = extra::append(&mut self.rng, &generated.text, self.pools.extras(), tuning);
        generated
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::data::{DataPools, Pool};

    /// A small but complete set of lists for generator tests.
    pub fn fixture_pools() -> DataPools {
        DataPools::from_lists([
            (Pool::ClothingColors, vec!["teal", "crimson"]),
            (Pool::HairColors, vec!["silver hair", "black hair"]),
            (Pool::HairStyles, vec!["long hair", "ponytail"]),
            (Pool::HairAccessories, vec!["hair ribbon"]),
            (Pool::HairModifiers, vec!["gradient hair"]),
            (Pool::EyeColors, vec!["blue eyes"]),
            (Pool::EyeQuality, vec!["detailed eyes"]),
            (Pool::FaceQuality, vec!["detailed face"]),
            (Pool::BodyTypes, vec!["slender"]),
            (Pool::AgeMaturity, vec!["young adult"]),
            (Pool::NationalityEthnicity, vec!["japanese"]),
            (Pool::SkinTones, vec!["fair skin"]),
            (Pool::SkinDetails, vec!["freckles"]),
            (Pool::Makeup, vec!["light makeup"]),
            (Pool::Jewelry, vec!["silver necklace"]),
            (Pool::ExpressionsPeaceful, vec!["gentle smile"]),
            (Pool::ExpressionsHappy, vec!["bright smile"]),
            (Pool::ExpressionsSerious, vec!["serious expression"]),
            (Pool::ExpressionsMysterious, vec!["enigmatic smile"]),
            (Pool::ExpressionsConfident, vec!["confident smirk"]),
            (Pool::HandPositions, vec!["hand on hip"]),
            (Pool::PosesSitting, vec!["sitting"]),
            (Pool::PosesStanding, vec!["standing"]),
            (Pool::PosesRelaxed, vec!["leaning on railing"]),
            (Pool::PosesLying, vec!["lying on grass"]),
            (Pool::PosesPlayful, vec!["twirling"]),
            (Pool::ClothingCasual, vec!["hoodie and jeans"]),
            (Pool::ClothingCyberpunk, vec!["techwear jacket"]),
            (Pool::ClothingNoir, vec!["trench coat"]),
            (Pool::ClothingStreetwear, vec!["oversized jacket"]),
            (Pool::ClothingScifi, vec!["flight suit"]),
            (Pool::ClothingSchool, vec!["school uniform"]),
            (Pool::ClothingSleepwear, vec!["oversized pajamas"]),
            (Pool::Legwear, vec!["thighhighs"]),
            (Pool::Footwear, vec!["sneakers"]),
            (Pool::Accessories, vec!["wristwatch"]),
            (Pool::LocationsCozy, vec!["reading nook"]),
            (Pool::LocationsUrbanDay, vec!["busy crosswalk"]),
            (Pool::LocationsUrbanNight, vec!["rainy alley"]),
            (Pool::LocationsCyberpunk, vec!["neon market street"]),
            (Pool::LocationsNature, vec!["forest clearing", "mountain meadow"]),
            (Pool::LocationsSchool, vec!["school rooftop"]),
            (
                Pool::Weather,
                vec!["sunny clear sky", "light rain at night", "misty fog"],
            ),
            (Pool::SkyDetails, vec!["starry sky", "clear blue sky"]),
            (Pool::AtmosphericEffects, vec!["late night calm", "warm breeze"]),
            (
                Pool::LightingNatural,
                vec!["harsh midday sun", "moonlight glow", "soft window light"],
            ),
            (Pool::LightingArtificial, vec!["neon glow", "warm lamp light"]),
            (Pool::LightingDramatic, vec!["volumetric lighting"]),
            (Pool::CameraAngles, vec!["from side"]),
            (Pool::CameraDistance, vec!["upper body"]),
            (Pool::StyleEnhancersStandard, vec!["vibrant colors"]),
            (Pool::Moods, vec!["serene", "melancholic", "hopeful"]),
            (Pool::StyleModifiers, vec!["anime screencap"]),
            (Pool::ArtisticStyles, vec!["watercolor"]),
            (Pool::RenderingStyles, vec!["flat color"]),
            (Pool::QualityBoosters, vec!["highres"]),
            (Pool::OpticsBokeh, vec!["depth of field", "bokeh"]),
        ])
    }
}
