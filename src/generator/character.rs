use super::Generator;
use crate::{
    common::utils::{chance, vec_str, weighted_choice},
    data::Pool,
    genres::{Genre, Mood},
};
use rand::{Rng, seq::IndexedRandom};

pub const SOLO_SUBJECT: &str = "1girl, solo";

const SUBJECTS: &[(&str, u32)] = &[
    (SOLO_SUBJECT, 60),
    ("1boy, solo", 20),
    ("2girls", 12),
    ("1girl, 1boy", 8),
];

impl<'a> Generator<'a> {
    pub(super) fn generate_character(&mut self, force_1girl: bool) -> String {
        let pools = self.pools;
        let mut parts: Vec<String> = Vec::new();

        let subject = if force_1girl {
            SOLO_SUBJECT
        } else {
            weighted_choice(&mut self.rng, SUBJECTS).unwrap_or(SOLO_SUBJECT)
        };
        parts.push(subject.to_string());

        if chance(&mut self.rng, 0.5) {
            parts.push(pools.pick(&mut self.rng, Pool::AgeMaturity).to_string());
        }
        // Ethnicity, else sometimes a skin tone
        if chance(&mut self.rng, 0.4) {
            parts.push(pools.pick(&mut self.rng, Pool::NationalityEthnicity).to_string());
        } else if chance(&mut self.rng, 0.5) {
            parts.push(pools.pick(&mut self.rng, Pool::SkinTones).to_string());
        }
        if chance(&mut self.rng, 0.7) {
            parts.push(pools.pick(&mut self.rng, Pool::FaceQuality).to_string());
        }
        if chance(&mut self.rng, 0.5) {
            parts.push(pools.pick(&mut self.rng, Pool::BodyTypes).to_string());
        }
        if chance(&mut self.rng, 0.3) {
            parts.push(pools.pick(&mut self.rng, Pool::SkinDetails).to_string());
        }
        if chance(&mut self.rng, 0.3) {
            parts.push(pools.pick(&mut self.rng, Pool::Makeup).to_string());
        }

        let eye_color = pools.pick(&mut self.rng, Pool::EyeColors);
        let eye_quality = pools.pick(&mut self.rng, Pool::EyeQuality);
        parts.push(format!("{eye_color}, {eye_quality}"));

        let hair_color = pools.pick(&mut self.rng, Pool::HairColors);
        if chance(&mut self.rng, 0.3) {
            let modifier = pools.pick(&mut self.rng, Pool::HairModifiers);
            parts.push(format!("{hair_color}, {modifier}"));
        } else {
            parts.push(hair_color.to_string());
        }
        parts.push(pools.pick(&mut self.rng, Pool::HairStyles).to_string());

        if chance(&mut self.rng, 0.3) {
            parts.push(pools.pick(&mut self.rng, Pool::HairAccessories).to_string());
        }

        vec_str(&parts)
    }

    pub(super) fn coherent_expression(&mut self, mood: Mood) -> &'a str {
        let pools = self.pools;
        pools.pick_any(&mut self.rng, mood.expressions())
    }

    pub(super) fn generate_pose(&mut self, genre: &Genre) -> String {
        let pools = self.pools;
        let pose = pools.pick_any(&mut self.rng, genre.poses);
        if chance(&mut self.rng, 0.4) {
            let hands = pools.pick(&mut self.rng, Pool::HandPositions);
            return format!("{pose}, {hands}");
        }
        pose.to_string()
    }

    /// Zero to two distinct mood tags.
    pub(super) fn generate_mood(&mut self) -> String {
        let pools = self.pools;
        let Some(moods) = pools.real(Pool::Moods) else {
            return String::new();
        };
        let roll = self.rng.random::<f64>();
        if roll < 0.35 {
            return String::new();
        }
        let count = if roll < 0.85 { 1 } else { 2 };
        let picks = moods
            .choose_multiple(&mut self.rng, count.min(moods.len()))
            .map(String::as_str)
            .collect::<Vec<_>>();
        vec_str(&picks)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        common::PairingMode,
        data::{DataPools, Pool},
        generator::{Generator, character::SOLO_SUBJECT, fixtures::fixture_pools},
        genres,
    };

    #[test]
    fn forced_solo_character_leads_with_subject() {
        let pools = fixture_pools();
        let mut generator = Generator::new(&pools, PairingMode::Paired, 0.0).with_seed(5);
        for _ in 0..20 {
            let character = generator.generate_character(true);
            assert!(character.starts_with(SOLO_SUBJECT), "{character}");
            assert!(character.contains("blue eyes"), "{character}");
        }
    }

    #[test]
    fn ethnicity_and_skin_tone_are_exclusive() {
        let pools = DataPools::from_lists([
            (Pool::AgeMaturity, vec!["young adult"]),
            (Pool::NationalityEthnicity, vec!["japanese"]),
            (Pool::SkinTones, vec!["tan skin"]),
        ]);
        let mut generator = Generator::new(&pools, PairingMode::Paired, 0.0).with_seed(19);
        let characters = (0..300)
            .map(|_| generator.generate_character(true))
            .collect::<Vec<_>>();
        for character in &characters {
            assert!(
                !(character.contains("japanese") && character.contains("tan skin")),
                "{character}"
            );
        }
        for slot in ["young adult", "japanese", "tan skin"] {
            assert!(characters.iter().any(|c| c.contains(slot)), "{slot} never drawn");
            assert!(characters.iter().any(|c| !c.contains(slot)), "{slot} always drawn");
        }
    }

    #[test]
    fn pose_comes_from_genre_pools() {
        let pools = DataPools::from_lists([
            (Pool::PosesStanding, vec!["standing"]),
            (Pool::PosesSitting, vec!["sitting"]),
            (Pool::PosesLying, vec!["lying down"]),
            (Pool::HandPositions, vec!["hand on hip"]),
        ]);
        let mut generator = Generator::new(&pools, PairingMode::Paired, 0.0).with_seed(11);
        let genre = genres::resolve("neo_noir");
        for _ in 0..50 {
            let pose = generator.generate_pose(genre);
            assert!(pose.starts_with("standing") || pose.starts_with("sitting"), "{pose}");
            assert!(!pose.contains("lying"));
        }
    }

    #[test]
    fn mood_tags_are_distinct_and_few() {
        let pools = fixture_pools();
        let mut generator = Generator::new(&pools, PairingMode::Paired, 0.0).with_seed(13);
        let mut saw_empty = false;
        for _ in 0..200 {
            let mood = generator.generate_mood();
            if mood.is_empty() {
                saw_empty = true;
                continue;
            }
            let tags = mood.split(", ").collect::<Vec<_>>();
            assert!(tags.len() <= 2);
            if tags.len() == 2 {
                assert_ne!(tags[0], tags[1]);
            }
        }
        assert!(saw_empty);
    }

    #[test]
    fn expressions_follow_mood() {
        let pools = DataPools::from_lists([
            (Pool::ExpressionsMysterious, vec!["enigmatic smile"]),
            (Pool::ExpressionsSerious, vec!["stern look"]),
            (Pool::ExpressionsHappy, vec!["grin"]),
        ]);
        let mut generator = Generator::new(&pools, PairingMode::Paired, 0.0).with_seed(2);
        for _ in 0..50 {
            let expression = generator.coherent_expression(genres::Mood::Noir);
            assert!(["enigmatic smile", "stern look"].contains(&expression));
        }
    }
}
