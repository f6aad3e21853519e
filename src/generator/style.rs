use super::{Generator, pick_str};
use crate::{
    common::{
        QualityPreset,
        utils::{chance, contains_any, vec_str},
    },
    data::Pool,
};
use rand::seq::IndexedRandom;

const DRAMATIC_HINTS: &[&str] = &[
    "night",
    "midnight",
    "twilight",
    "dusk",
    "storm",
    "thunder",
    "rainy",
    "neon",
    "noir",
    "spotlight",
    "moonlight",
    "dark",
    "dramatic",
];

const RETRO_ERA_HINTS: &[&str] = &["80", "90", "retro", "vhs", "ova"];

/// Scaffolds already heavy on aesthetic tokens need fewer boosters.
const STRONG_AESTHETIC: &[&str] = &["amazing quality", "extremely aesthetic", "very aesthetic"];

impl<'a> Generator<'a> {
    /// Base quality tags, sometimes swapped for a single scaffold line.
    pub(super) fn pick_quality(&mut self, preset: QualityPreset) -> &'a str {
        let pools = self.pools;
        let base = pools.quality_base(preset);
        let Some(scaffolds) = pools.real(Pool::QualityScaffold) else {
            return base;
        };
        if !chance(&mut self.rng, preset.scaffold_probability()) {
            return base;
        }
        if preset == QualityPreset::Artistic {
            let short = scaffolds
                .iter()
                .map(String::as_str)
                .filter(|s| s.matches(',').count() <= 3)
                .collect::<Vec<_>>();
            if let Some(scaffold) = pick_str(&mut self.rng, &short) {
                return scaffold;
            }
        }
        scaffolds.choose(&mut self.rng).map_or(base, String::as_str)
    }

    pub(super) fn pick_booster(&mut self, quality: &str) -> Option<&'a str> {
        let pools = self.pools;
        let probability = if pools.real(Pool::QualityScaffold).is_some()
            && contains_any(quality, STRONG_AESTHETIC)
        {
            0.30
        } else {
            0.55
        };
        chance(&mut self.rng, probability).then(|| pools.pick(&mut self.rng, Pool::QualityBoosters))
    }

    /// Grain, shading, linework, shadows, contrast and era, plus an occasional retro accent.
    pub(super) fn artistic_style(&mut self) -> String {
        let pools = self.pools;
        let mut elements = [
            (Pool::ArtFilmGrain, "film grain"),
            (Pool::ArtShading, "cel shading"),
            (Pool::ArtLinework, "detailed linework"),
            (Pool::ArtShadows, "soft shadows"),
            (Pool::ArtContrast, "high contrast"),
            (Pool::ArtEra, "modern anime style"),
        ]
        .into_iter()
        .map(|(pool, fallback)| {
            pools
                .real(pool)
                .and_then(|items| items.choose(&mut self.rng))
                .map_or(fallback, String::as_str)
        })
        .collect::<Vec<_>>();

        let era = elements.last().copied().unwrap_or_default();
        if contains_any(era, RETRO_ERA_HINTS) {
            if let Some(retro) = pools.real(Pool::Retro90sFlavor) {
                if chance(&mut self.rng, 0.35) {
                    if let Some(flavor) = retro.choose(&mut self.rng) {
                        elements.push(flavor.as_str());
                    }
                }
            }
        }
        vec_str(&elements)
    }

    /// Style tail; `context` (mood and scene text) steers toward dramatic enhancers.
    pub(super) fn generate_style(&mut self, context: &str) -> String {
        let pools = self.pools;
        let mut parts: Vec<String> = Vec::new();

        if chance(&mut self.rng, 0.6) {
            let dramatic_hint = contains_any(context, DRAMATIC_HINTS);
            let pool = if pools.real(Pool::StyleEnhancersDramatic).is_some() {
                let use_dramatic = if dramatic_hint {
                    chance(&mut self.rng, 0.65)
                } else {
                    chance(&mut self.rng, 0.12)
                };
                if use_dramatic {
                    Pool::StyleEnhancersDramatic
                } else {
                    Pool::StyleEnhancersStandard
                }
            } else {
                Pool::StyleEnhancersStandard
            };
            parts.push(pools.pick(&mut self.rng, pool).to_string());
        }
        if chance(&mut self.rng, 0.6) {
            parts.push(pools.pick(&mut self.rng, Pool::StyleModifiers).to_string());
        }
        if chance(&mut self.rng, 0.7) {
            parts.push(pools.pick(&mut self.rng, Pool::ArtisticStyles).to_string());
        }
        if chance(&mut self.rng, 0.5) {
            parts.push(pools.pick(&mut self.rng, Pool::RenderingStyles).to_string());
        }
        parts.push(self.artistic_style());

        vec_str(&parts)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        common::{PairingMode, QualityPreset},
        data::{DataPools, Pool},
        generator::Generator,
    };

    #[test]
    fn quality_without_scaffolds_is_the_preset() {
        let pools = DataPools::from_lists::<_, &str>([]);
        let mut generator = Generator::new(&pools, PairingMode::Paired, 0.0).with_seed(1);
        for preset in QualityPreset::ALL {
            assert_eq!(generator.pick_quality(preset), preset.default_tags());
        }
    }

    #[test]
    fn artistic_quality_prefers_short_scaffolds() {
        let pools = DataPools::from_lists([(
            Pool::QualityScaffold,
            vec![
                "masterpiece, best quality",
                "masterpiece, best quality, amazing quality, very aesthetic, absurdres, newest",
            ],
        )]);
        let mut generator = Generator::new(&pools, PairingMode::Paired, 0.0).with_seed(4);
        for _ in 0..100 {
            let quality = generator.pick_quality(QualityPreset::Artistic);
            assert!(
                quality == "masterpiece, best quality"
                    || quality == QualityPreset::Artistic.default_tags(),
                "{quality}"
            );
        }
    }

    #[test]
    fn artistic_style_always_has_six_elements_without_retro() {
        let pools = DataPools::from_lists([(Pool::ArtEra, vec!["modern digital era"])]);
        let mut generator = Generator::new(&pools, PairingMode::Paired, 0.0).with_seed(6);
        let style = generator.artistic_style();
        assert_eq!(
            style,
            "film grain, cel shading, detailed linework, soft shadows, high contrast, modern digital era"
        );
    }

    #[test]
    fn retro_era_can_add_flavor() {
        let pools = DataPools::from_lists([
            (Pool::ArtEra, vec!["1990s anime"]),
            (Pool::Retro90sFlavor, vec!["vhs tracking lines"]),
        ]);
        let mut generator = Generator::new(&pools, PairingMode::Paired, 0.0).with_seed(10);
        let styles = (0..100)
            .map(|_| generator.artistic_style())
            .collect::<Vec<_>>();
        assert!(styles.iter().any(|s| s.ends_with("vhs tracking lines")));
        assert!(styles.iter().any(|s| s.ends_with("1990s anime")));
    }
}
