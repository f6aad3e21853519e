use super::Generator;
use crate::{
    common::utils::{chance, contains_any, vec_str},
    data::Pool,
    genres::Genre,
};
use rand::{Rng, seq::IndexedRandom};

/// Outfits naming one of these already carry a color.
const COLOR_WORDS: &[&str] = &[
    "white", "black", "red", "blue", "pink", "purple", "green", "yellow", "orange", "grey",
    "brown",
];

impl Generator<'_> {
    pub(super) fn generate_outfit(&mut self, genre: &Genre) -> String {
        let pools = self.pools;
        let mut parts: Vec<String> = Vec::new();

        let clothing = genre
            .clothing
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Pool::ClothingCasual);
        let outfit = pools.pick(&mut self.rng, clothing);
        if chance(&mut self.rng, 0.4) && !contains_any(outfit, COLOR_WORDS) {
            let color = pools.pick(&mut self.rng, Pool::ClothingColors);
            parts.push(format!("{color} {outfit}"));
        } else {
            parts.push(outfit.to_string());
        }

        if chance(&mut self.rng, 0.5) {
            parts.push(pools.pick(&mut self.rng, Pool::Legwear).to_string());
        }
        if chance(&mut self.rng, 0.6) {
            parts.push(pools.pick(&mut self.rng, Pool::Footwear).to_string());
        }

        // Accessory and jewelry slots: usually neither, sometimes one, rarely both
        let roll = self.rng.random::<f64>();
        if roll >= 0.93 {
            parts.push(pools.pick(&mut self.rng, Pool::Accessories).to_string());
            parts.push(pools.pick(&mut self.rng, Pool::Jewelry).to_string());
        } else if roll >= 0.55 {
            let slot = if chance(&mut self.rng, 0.65) {
                Pool::Accessories
            } else {
                Pool::Jewelry
            };
            parts.push(pools.pick(&mut self.rng, slot).to_string());
        }

        vec_str(&parts)
    }
}
