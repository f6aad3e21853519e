//! Scene assembly: framing, time of day, location, lighting, weather and atmosphere.
//!
//! In paired mode each slot is filtered by keyword hints derived from the chosen
//! time of day and location bucket, so a midnight alley does not get harsh noon
//! sunlight. Spiky mode allows one deliberate contradiction per prompt.

use super::{Generator, pick_str};
use crate::{
    common::{
        DistancePreset, PairingMode,
        utils::{chance, contains_any, filter_by_keywords, vec_str, weighted_choice},
    },
    data::Pool,
    genres::Genre,
};
use log::debug;
use rand::{Rng, seq::IndexedRandom};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationType {
    Cozy,
    UrbanDay,
    UrbanNight,
    Cyberpunk,
    Fantasy,
    Nature,
    School,
    Historical,
    Modern,
}

impl LocationType {
    pub const ALL: &[Self] = &[
        Self::Cozy,
        Self::UrbanDay,
        Self::UrbanNight,
        Self::Cyberpunk,
        Self::Fantasy,
        Self::Nature,
        Self::School,
        Self::Historical,
        Self::Modern,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Cozy => "cozy",
            Self::UrbanDay => "urban_day",
            Self::UrbanNight => "urban_night",
            Self::Cyberpunk => "cyberpunk",
            Self::Fantasy => "fantasy",
            Self::Nature => "nature",
            Self::School => "school",
            Self::Historical => "historical",
            Self::Modern => "modern",
        }
    }

    pub const fn pool(self) -> Pool {
        match self {
            Self::Cozy => Pool::LocationsCozy,
            Self::UrbanDay => Pool::LocationsUrbanDay,
            Self::UrbanNight => Pool::LocationsUrbanNight,
            Self::Cyberpunk => Pool::LocationsCyberpunk,
            Self::Fantasy => Pool::LocationsFantasy,
            Self::Nature => Pool::LocationsNature,
            Self::School => Pool::LocationsSchool,
            Self::Historical => Pool::LocationsHistorical,
            Self::Modern => Pool::LocationsModern,
        }
    }

    /// Bucket default when the location tag itself gives no indoor/outdoor hint.
    const fn likely_outdoor(self) -> bool {
        !matches!(self, Self::Cozy | Self::School | Self::Modern)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeKey {
    Dawn,
    Morning,
    Noon,
    Afternoon,
    GoldenHour,
    Dusk,
    Night,
    Midnight,
}

impl TimeKey {
    pub const ALL: &[Self] = &[
        Self::Dawn,
        Self::Morning,
        Self::Noon,
        Self::Afternoon,
        Self::GoldenHour,
        Self::Dusk,
        Self::Night,
        Self::Midnight,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Dawn => "dawn",
            Self::Morning => "morning",
            Self::Noon => "noon",
            Self::Afternoon => "afternoon",
            Self::GoldenHour => "golden_hour",
            Self::Dusk => "dusk",
            Self::Night => "night",
            Self::Midnight => "midnight",
        }
    }

    pub const fn default_tag(self) -> &'static str {
        match self {
            Self::Dawn => "dawn, early morning light, soft pink sky, golden hour beginning",
            Self::Morning => "morning, bright daylight, fresh atmosphere, clear sky",
            Self::Noon => "midday, bright sunlight, harsh shadows, clear blue sky",
            Self::Afternoon => "afternoon, warm sunlight, long shadows, golden tones",
            Self::GoldenHour => "golden hour, warm orange light, long shadows, magical atmosphere",
            Self::Dusk => "dusk, twilight, purple sky, fading light",
            Self::Night => "night, darkness, artificial lights, nighttime atmosphere",
            Self::Midnight => "midnight, deep darkness, moonlight, stars visible",
        }
    }

    pub const fn variants(self) -> Pool {
        match self {
            Self::Dawn => Pool::TimeDawn,
            Self::Morning => Pool::TimeMorning,
            Self::Noon => Pool::TimeNoon,
            Self::Afternoon => Pool::TimeAfternoon,
            Self::GoldenHour => Pool::TimeGoldenHour,
            Self::Dusk => Pool::TimeDusk,
            Self::Night => Pool::TimeNight,
            Self::Midnight => Pool::TimeMidnight,
        }
    }

    /// The time a spike flips to.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Night | Self::Dusk => Self::Noon,
            Self::Midnight => Self::Morning,
            Self::GoldenHour | Self::Morning | Self::Afternoon => Self::Midnight,
            Self::Dawn | Self::Noon => Self::Night,
        }
    }

    pub const fn is_night(self) -> bool {
        matches!(self, Self::Night | Self::Midnight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

/// A generated scene plus the anchors it was built around.
#[derive(Debug, Clone)]
pub struct Scene {
    pub text: String,
    pub time: TimeKey,
    pub location_type: LocationType,
    pub season: Option<Season>,
}

const OUTDOOR_KEYWORDS: &[&str] = &[
    "street",
    "alley",
    "rooftop",
    "park",
    "beach",
    "shore",
    "pier",
    "forest",
    "mountain",
    "river",
    "lake",
    "field",
    "garden",
    "courtyard",
    "balcony",
    "bridge",
    "station platform",
    "festival",
    "market",
    "sidewalk",
    "crosswalk",
    "stairs outside",
    "sky",
    "outdoors",
];

const INDOOR_KEYWORDS: &[&str] = &[
    "bedroom",
    "bathroom",
    "room",
    "apartment",
    "living room",
    "kitchen",
    "cafe",
    "classroom",
    "library",
    "hallway",
    "locker",
    "hotel",
    "office",
    "train car",
    "subway car",
    "elevator",
];

const EXPLICIT_EFFECTS: &[&str] = &[
    "sunbeam",
    "volumetric",
    "god rays",
    "light shafts",
    "crepuscular",
];

/// Indoor keywords in the tag win, then outdoor keywords, then the bucket default.
pub fn is_outdoor(location_type: LocationType, location: &str) -> bool {
    if contains_any(location, INDOOR_KEYWORDS) {
        return false;
    }
    if contains_any(location, OUTDOOR_KEYWORDS) {
        return true;
    }
    location_type.likely_outdoor()
}

pub fn season_from_weather(weather: &str) -> Option<Season> {
    if contains_any(
        weather,
        &["snow", "blizzard", "sleet", "freezing", "ice", "frost", "cold snap"],
    ) {
        Some(Season::Winter)
    } else if contains_any(
        weather,
        &["heat wave", "desert heat", "heat shimmer", "humid", "monsoon", "summer"],
    ) {
        Some(Season::Summer)
    } else if contains_any(weather, &["autumn", "fall", "leaf", "harvest"]) {
        Some(Season::Autumn)
    } else if contains_any(weather, &["spring", "pollen", "cherry blossom"]) {
        Some(Season::Spring)
    } else {
        None
    }
}

pub const fn weather_probability(outdoor: bool) -> f64 {
    if outdoor { 0.75 } else { 0.25 }
}

fn sky_hints(time: TimeKey) -> &'static [&'static str] {
    match time {
        TimeKey::Night | TimeKey::Midnight => &["night", "star", "moon", "milky"],
        TimeKey::Dawn => &["dawn", "sunrise", "pink", "peach", "horizon"],
        TimeKey::Morning => &["morning", "blue", "clear", "fresh"],
        TimeKey::Noon => &["noon", "midday", "blue", "bright", "summer", "heat"],
        TimeKey::Afternoon => &["afternoon", "warm", "haze", "azure"],
        TimeKey::GoldenHour | TimeKey::Dusk => {
            &["sunset", "twilight", "orange", "purple", "afterglow", "lavender"]
        }
    }
}

fn lighting_hints(time: TimeKey, location_type: LocationType) -> Vec<&'static str> {
    let mut hints = match time {
        TimeKey::Night | TimeKey::Midnight => vec![
            "night",
            "moon",
            "starlight",
            "moonlight",
            "neon",
            "streetlight",
            "lamp",
            "artificial",
            "fluorescent",
            "volumetric",
            "light shafts",
        ],
        TimeKey::Dusk | TimeKey::GoldenHour => vec![
            "sunset",
            "golden",
            "warm",
            "rim",
            "twilight",
            "evening",
            "sunbeam",
            "rays",
            "light shafts",
            "god rays",
            "volumetric",
        ],
        TimeKey::Dawn | TimeKey::Morning => vec![
            "morning", "early", "soft", "window", "sunlight", "daylight", "sunbeam", "rays",
            "dappled", "god rays",
        ],
        TimeKey::Noon => vec![
            "midday",
            "harsh",
            "bright",
            "sunlight",
            "daylight",
            "sunbeam",
            "sun rays",
            "light shafts",
            "volumetric sunlight",
        ],
        TimeKey::Afternoon => vec!["daylight", "sunlight", "ambient", "window"],
    };
    match location_type {
        LocationType::UrbanNight | LocationType::Cyberpunk => {
            hints.extend(["neon", "streetlight", "sign", "artificial", "glow"]);
        }
        LocationType::Cozy => hints.extend(["lamp", "bedside", "warm", "indoor", "soft"]),
        LocationType::Nature | LocationType::Fantasy | LocationType::Historical => hints.extend([
            "sunlight", "ambient", "soft", "dramatic", "dappled", "sunbeam", "rays",
        ]),
        _ => {}
    }
    hints
}

fn weather_hints(time: TimeKey, location_type: LocationType) -> Vec<&'static str> {
    let mut hints = match time {
        TimeKey::Night | TimeKey::Midnight => {
            vec!["night", "fog", "mist", "clear night", "star", "moon", "cloud"]
        }
        TimeKey::Dusk | TimeKey::GoldenHour => {
            vec!["sunset", "twilight", "clearing", "partly cloudy", "cloud"]
        }
        TimeKey::Dawn | TimeKey::Morning => {
            vec!["morning", "mist", "fog", "clear", "pale", "sunny"]
        }
        TimeKey::Noon => vec!["sunny", "clear", "harsh", "heat", "blue"],
        TimeKey::Afternoon => vec!["partly", "cloud", "clear", "breeze"],
    };
    match location_type {
        LocationType::Cyberpunk | LocationType::UrbanNight => {
            hints.extend(["rain", "drizzle", "wet", "fog", "mist", "storm"]);
        }
        LocationType::Nature => hints.extend(["breeze", "clear", "cloud", "mist", "rain"]),
        LocationType::Fantasy => hints.extend(["mist", "fog", "storm", "clearing", "rainbow"]),
        _ => {}
    }
    hints
}

fn atmosphere_hints(time: TimeKey, location_type: LocationType) -> Vec<&'static str> {
    let mut hints = match time {
        TimeKey::Night | TimeKey::Midnight => vec![
            "night",
            "late night",
            "moon",
            "neon",
            "city lights",
            "quiet",
            "noir",
            "fog",
            "mist",
        ],
        TimeKey::Dusk | TimeKey::GoldenHour => vec![
            "sunset",
            "golden",
            "twilight",
            "evening",
            "warm",
            "long shadows",
            "nostalgia",
        ],
        TimeKey::Dawn | TimeKey::Morning => {
            vec!["morning", "spring morning", "early", "fresh", "soft", "calm"]
        }
        TimeKey::Noon => vec!["midday", "noon", "bright", "summer", "heat"],
        TimeKey::Afternoon => vec!["afternoon", "daytime", "warm", "breeze"],
    };
    match location_type {
        LocationType::Cyberpunk | LocationType::UrbanNight => {
            hints.extend(["neon", "rain", "wet", "city pop", "noir", "alley"]);
        }
        LocationType::Cozy => hints.extend(["cozy", "quiet room", "soft", "intimate", "bedroom"]),
        LocationType::Nature => hints.extend(["breeze", "forest", "sunlight", "mist", "fresh"]),
        LocationType::School => hints.extend(["after school", "classroom", "rooftop"]),
        LocationType::Fantasy => hints.extend(["mystic", "mist", "enchanted", "dreamy"]),
        _ => {}
    }
    hints
}

fn preferred_locations(time: TimeKey) -> &'static [LocationType] {
    use LocationType::{Cozy, Cyberpunk, Fantasy, Historical, Modern, Nature, School, UrbanDay, UrbanNight};
    match time {
        TimeKey::Night | TimeKey::Midnight => {
            &[UrbanNight, Cyberpunk, Modern, Cozy, Historical, School]
        }
        TimeKey::Dusk => &[UrbanDay, UrbanNight, Modern, Nature, School, Cozy, Historical],
        TimeKey::Dawn => &[Nature, UrbanDay, School, Cozy, Historical],
        TimeKey::Noon => &[UrbanDay, Nature, School, Modern],
        TimeKey::Morning | TimeKey::Afternoon | TimeKey::GoldenHour => {
            &[UrbanDay, Modern, School, Nature, Cozy, Historical, Fantasy]
        }
    }
}

fn time_weights(location_type: LocationType) -> [(TimeKey, u32); 8] {
    use TimeKey::{Afternoon, Dawn, Dusk, GoldenHour, Midnight, Morning, Night, Noon};
    match location_type {
        LocationType::Cozy => [
            (Dusk, 14),
            (Night, 22),
            (Midnight, 14),
            (GoldenHour, 10),
            (Afternoon, 8),
            (Morning, 6),
            (Dawn, 6),
            (Noon, 4),
        ],
        LocationType::UrbanNight | LocationType::Cyberpunk => [
            (Night, 24),
            (Dusk, 14),
            (Midnight, 14),
            (GoldenHour, 10),
            (Afternoon, 8),
            (Morning, 6),
            (Dawn, 4),
            (Noon, 4),
        ],
        _ => [
            (Morning, 14),
            (Afternoon, 14),
            (GoldenHour, 14),
            (Dawn, 10),
            (Dusk, 10),
            (Noon, 10),
            (Night, 10),
            (Midnight, 6),
        ],
    }
}

impl<'a> Generator<'a> {
    /// Start a new prompt: spiky mode gets exactly one spike to spend.
    pub(super) fn reset_spike_budget(&mut self) {
        if self.mode == PairingMode::Spiky {
            self.spike_chance = self.spike_chance.max(0.03);
            self.spike_budget = 1;
        } else {
            self.spike_budget = 0;
        }
    }

    /// Roll for a spike, consuming the budget on success.
    pub(super) fn try_spike(&mut self) -> bool {
        if self.mode != PairingMode::Spiky || self.spike_budget == 0 {
            return false;
        }
        if chance(&mut self.rng, self.spike_chance) {
            self.spike_budget -= 1;
            debug!("Spike consumed");
            return true;
        }
        false
    }

    pub(super) fn pick_time_key(&mut self, location_type: LocationType) -> TimeKey {
        if !self.mode.pairs() {
            return *TimeKey::ALL.choose(&mut self.rng).unwrap_or(&TimeKey::Night);
        }
        weighted_choice(&mut self.rng, &time_weights(location_type)).unwrap_or(TimeKey::Night)
    }

    /// On a spike, flip the time to its opposite or move to a contrasting bucket.
    /// The flag is set when the location was moved.
    pub(super) fn spike_override(
        &mut self,
        time: TimeKey,
        location_type: LocationType,
    ) -> (TimeKey, LocationType, bool) {
        if !self.try_spike() {
            return (time, location_type, false);
        }
        if self.rng.random_bool(0.5) {
            debug!("Spike: time {} -> {}", time.key(), time.opposite().key());
            return (time.opposite(), location_type, false);
        }
        let contrast = LocationType::ALL
            .iter()
            .copied()
            .filter(|l| *l != location_type)
            .collect::<Vec<_>>();
        let swapped = contrast.choose(&mut self.rng).copied().unwrap_or(location_type);
        debug!("Spike: location {} -> {}", location_type.key(), swapped.key());
        (time, swapped, true)
    }

    /// Pick a bucket that suits the time of day, staying within the genre's buckets.
    pub(super) fn coherent_location_type(
        &mut self,
        preset: &[LocationType],
        time: TimeKey,
    ) -> LocationType {
        let fallback = preset.first().copied().unwrap_or(LocationType::Cozy);
        if !self.mode.pairs() {
            return preset.choose(&mut self.rng).copied().unwrap_or(fallback);
        }
        let viable = preferred_locations(time)
            .iter()
            .copied()
            .filter(|l| preset.contains(l))
            .collect::<Vec<_>>();
        viable
            .choose(&mut self.rng)
            .or_else(|| preset.choose(&mut self.rng))
            .copied()
            .unwrap_or(fallback)
    }

    /// Time tag from the variant list when present, else the built-in tag.
    pub(super) fn time_tag(&mut self, time: TimeKey) -> &'a str {
        let pools = self.pools;
        pools
            .real(time.variants())
            .and_then(|variants| variants.choose(&mut self.rng))
            .map_or(time.default_tag(), String::as_str)
    }

    pub(super) fn coherent_sky(&mut self, time: TimeKey) -> Option<&'a str> {
        let pools = self.pools;
        let sky = pools.real(Pool::SkyDetails)?;
        let candidates = filter_by_keywords(sky.iter().map(String::as_str), sky_hints(time), &[]);
        pick_str(&mut self.rng, &candidates)
            .or_else(|| sky.choose(&mut self.rng).map(String::as_str))
    }

    pub(super) fn coherent_lighting(
        &mut self,
        preset_lighting: &[Pool],
        time: TimeKey,
        location_type: LocationType,
    ) -> &'a str {
        let pools = self.pools;
        let lighting = pools.union(preset_lighting);
        if !self.mode.pairs() {
            return pick_str(&mut self.rng, &lighting).unwrap_or(crate::data::PLACEHOLDER);
        }
        let candidates = filter_by_keywords(
            lighting.iter().copied(),
            &lighting_hints(time, location_type),
            &[],
        );
        pick_str(&mut self.rng, &candidates)
            .or_else(|| pick_str(&mut self.rng, &lighting))
            .unwrap_or(crate::data::PLACEHOLDER)
    }

    /// Optional depth-of-field tag, more likely for close framings.
    pub(super) fn pick_optics(&mut self, distance: DistancePreset) -> Option<&'a str> {
        let pools = self.pools;
        let optics = pools.real(Pool::OpticsBokeh)?;
        if !chance(&mut self.rng, distance.optics_probability()) {
            return None;
        }
        let short = optics
            .iter()
            .map(String::as_str)
            .filter(|o| o.matches(',').count() <= 1)
            .collect::<Vec<_>>();
        if short.is_empty() {
            optics.choose(&mut self.rng).map(String::as_str)
        } else {
            pick_str(&mut self.rng, &short)
        }
    }

    /// Occasional sunbeam or volumetric accent that is not already in `existing`.
    pub(super) fn pick_light_effect(
        &mut self,
        time: TimeKey,
        outdoor: bool,
        existing: &str,
    ) -> Option<&'a str> {
        let probability = if outdoor { 0.22 } else { 0.10 };
        if !chance(&mut self.rng, probability) {
            return None;
        }
        let include: &[&str] = if time.is_night() {
            &["volumetric", "light shafts", "god rays", "moonlight", "starlight"]
        } else {
            &[
                "sunbeam",
                "sunbeams",
                "sun rays",
                "god rays",
                "crepuscular",
                "light shafts",
                "volumetric",
            ]
        };
        let pools = self.pools;
        let pool = pools.union(&[Pool::LightingNatural, Pool::LightingDramatic]);
        let existing = existing.to_lowercase();
        let fresh = filter_by_keywords(pool.iter().copied(), include, &[])
            .into_iter()
            .filter(|c| !existing.contains(&c.to_lowercase()))
            .collect::<Vec<_>>();
        let explicit = filter_by_keywords(fresh.iter().copied(), EXPLICIT_EFFECTS, &[]);
        if explicit.is_empty() {
            pick_str(&mut self.rng, &fresh)
        } else {
            pick_str(&mut self.rng, &explicit)
        }
    }

    pub(super) fn coherent_weather(
        &mut self,
        time: TimeKey,
        location_type: LocationType,
        outdoor: bool,
    ) -> Option<&'a str> {
        let pools = self.pools;
        let weather = pools.get(Pool::Weather);
        if weather.is_empty() || !chance(&mut self.rng, weather_probability(outdoor)) {
            return None;
        }
        if !self.mode.pairs() {
            return weather.choose(&mut self.rng).map(String::as_str);
        }
        let candidates = filter_by_keywords(
            weather.iter().map(String::as_str),
            &weather_hints(time, location_type),
            &[],
        );
        pick_str(&mut self.rng, &candidates)
            .or_else(|| weather.choose(&mut self.rng).map(String::as_str))
    }

    pub(super) fn coherent_atmosphere(
        &mut self,
        time: TimeKey,
        location_type: LocationType,
    ) -> Option<&'a str> {
        let pools = self.pools;
        let atmosphere = pools.get(Pool::AtmosphericEffects);
        if !self.mode.pairs() {
            return atmosphere.choose(&mut self.rng).map(String::as_str);
        }
        let candidates = filter_by_keywords(
            atmosphere.iter().map(String::as_str),
            &atmosphere_hints(time, location_type),
            &[],
        );
        pick_str(&mut self.rng, &candidates)
            .or_else(|| atmosphere.choose(&mut self.rng).map(String::as_str))
    }

    /// Coherent atmosphere, unless a spike fires and the whole list is sampled unfiltered.
    pub(super) fn pick_atmosphere(
        &mut self,
        time: TimeKey,
        location_type: LocationType,
    ) -> Option<&'a str> {
        if self.try_spike() {
            let pools = self.pools;
            return pools
                .get(Pool::AtmosphericEffects)
                .choose(&mut self.rng)
                .map(String::as_str);
        }
        self.coherent_atmosphere(time, location_type)
    }

    pub(super) fn generate_scene(&mut self, genre: &Genre, distance: DistancePreset) -> Scene {
        let pools = self.pools;
        let mut parts: Vec<&str> = Vec::new();

        // Framing first, then angle
        let framing = distance
            .framings()
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_else(|| pools.pick(&mut self.rng, Pool::CameraDistance));
        parts.push(framing);
        parts.push(match pools.real(Pool::CameraAngles) {
            Some(angles) => angles.choose(&mut self.rng).map_or("from front", String::as_str),
            None => ["from front", "from side", "three-quarter view", "profile", "straight-on"]
                .choose(&mut self.rng)
                .copied()
                .unwrap_or("from front"),
        });

        let raw_location = genre
            .locations
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(LocationType::Cozy);
        let time = self.pick_time_key(raw_location);
        let (time, raw_location, location_spiked) = self.spike_override(time, raw_location);
        let location_type = if self.mode.pairs() && !location_spiked {
            self.coherent_location_type(genre.locations, time)
        } else {
            raw_location
        };

        let location = pools.pick(&mut self.rng, location_type.pool());
        let outdoor = is_outdoor(location_type, location);
        parts.push(self.time_tag(time));

        if chance(&mut self.rng, if outdoor { 0.70 } else { 0.18 }) {
            if let Some(sky) = self.coherent_sky(time) {
                parts.push(sky);
            }
        }
        parts.push(location);
        parts.push(self.coherent_lighting(genre.lighting, time, location_type));

        if let Some(optics) = self.pick_optics(distance) {
            parts.push(optics);
        }
        let existing = vec_str(&parts);
        if let Some(effect) = self.pick_light_effect(time, outdoor, &existing) {
            parts.push(effect);
        }

        let mut season = None;
        if let Some(weather) = self.coherent_weather(time, location_type, outdoor) {
            parts.push(weather);
            season = season_from_weather(weather);
        }

        if chance(&mut self.rng, 0.30) {
            if let Some(atmosphere) = self.pick_atmosphere(time, location_type) {
                parts.push(atmosphere);
            }
        }

        debug!(
            "Scene anchored at {} / {} (outdoor: {outdoor})",
            time.key(),
            location_type.key()
        );
        Scene {
            text: vec_str(&parts),
            time,
            location_type,
            season,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::DataPools,
        generator::{Generator, fixtures::fixture_pools},
        genres,
    };

    fn generator(pools: &DataPools, mode: PairingMode, spike_chance: f64) -> Generator<'_> {
        let mut generator = Generator::new(pools, mode, spike_chance).with_seed(42);
        generator.reset_spike_budget();
        generator
    }

    #[test]
    fn indoor_keywords_beat_outdoor_ones() {
        assert!(!is_outdoor(LocationType::UrbanDay, "rooftop cafe"));
        assert!(is_outdoor(LocationType::Cozy, "garden terrace"));
        assert!(is_outdoor(LocationType::Nature, "quiet clearing"));
        assert!(!is_outdoor(LocationType::Cozy, "reading nook"));
        assert!(is_outdoor(LocationType::Fantasy, "ancient ruins"));
    }

    #[test]
    fn seasons_follow_weather_keywords() {
        assert_eq!(season_from_weather("light snowfall"), Some(Season::Winter));
        assert_eq!(season_from_weather("humid summer haze"), Some(Season::Summer));
        assert_eq!(season_from_weather("falling maple leaves"), Some(Season::Autumn));
        assert_eq!(season_from_weather("cherry blossom breeze"), Some(Season::Spring));
        assert_eq!(season_from_weather("light rain"), None);
    }

    #[test]
    fn opposite_times_differ() {
        for time in TimeKey::ALL {
            assert_ne!(time.opposite(), *time);
        }
    }

    #[test]
    fn spiky_mode_spends_a_single_spike() {
        let pools = fixture_pools();
        let mut spiky = generator(&pools, PairingMode::Spiky, 1.0);
        assert!(spiky.try_spike());
        assert!(!spiky.try_spike());
        spiky.reset_spike_budget();
        assert!(spiky.try_spike());

        let mut paired = generator(&pools, PairingMode::Paired, 1.0);
        assert!(!paired.try_spike());
    }

    #[test]
    fn spike_chance_is_clamped_upwards() {
        let pools = fixture_pools();
        let spiky = generator(&pools, PairingMode::Spiky, 0.0);
        assert!((spiky.spike_chance - 0.03).abs() < f64::EPSILON);
    }

    #[test]
    fn paired_night_prefers_night_buckets() {
        let pools = fixture_pools();
        let mut generator = generator(&pools, PairingMode::Paired, 0.0);
        let preset = [LocationType::Nature, LocationType::UrbanNight];
        for _ in 0..100 {
            assert_eq!(
                generator.coherent_location_type(&preset, TimeKey::Night),
                LocationType::UrbanNight
            );
        }
        // No preferred bucket available, any preset bucket will do
        let preset = [LocationType::Fantasy];
        assert_eq!(
            generator.coherent_location_type(&preset, TimeKey::Noon),
            LocationType::Fantasy
        );
    }

    #[test]
    fn paired_lighting_matches_time_of_day() {
        let pools = fixture_pools();
        let mut generator = generator(&pools, PairingMode::Paired, 0.0);
        for _ in 0..100 {
            let lighting = generator.coherent_lighting(
                &[Pool::LightingNatural, Pool::LightingArtificial],
                TimeKey::Midnight,
                LocationType::Nature,
            );
            assert_ne!(lighting, "harsh midday sun", "{lighting}");
        }
    }

    #[test]
    fn paired_weather_at_night_avoids_sunny_entries() {
        let pools = fixture_pools();
        let mut generator = generator(&pools, PairingMode::Paired, 0.0);
        for _ in 0..200 {
            if let Some(weather) =
                generator.coherent_weather(TimeKey::Night, LocationType::UrbanNight, true)
            {
                assert_ne!(weather, "sunny clear sky");
            }
        }
    }

    #[test]
    fn light_effects_never_repeat_existing_text() {
        let pools = fixture_pools();
        let mut generator = generator(&pools, PairingMode::Paired, 0.0);
        for _ in 0..200 {
            if let Some(effect) =
                generator.pick_light_effect(TimeKey::Noon, true, "sunbeams through leaves")
            {
                assert_ne!(effect, "sunbeams through leaves");
            }
        }
    }

    #[test]
    fn fixed_distance_leads_the_scene() {
        let pools = fixture_pools();
        let mut generator = generator(&pools, PairingMode::Paired, 0.0);
        let genre = genres::resolve("nature_scenic");
        for _ in 0..20 {
            let scene = generator.generate_scene(genre, DistancePreset::WideScene);
            assert!(
                DistancePreset::WideScene
                    .framings()
                    .iter()
                    .any(|f| scene.text.starts_with(f)),
                "{}",
                scene.text
            );
            assert_eq!(scene.location_type, LocationType::Nature);
        }
    }

    #[test]
    fn pure_mode_keeps_genre_buckets() {
        let pools = fixture_pools();
        let mut generator = generator(&pools, PairingMode::Pure, 0.0);
        let genre = genres::resolve("cyberpunk_noir");
        for _ in 0..50 {
            let scene = generator.generate_scene(genre, DistancePreset::Random);
            assert!(genre.locations.contains(&scene.location_type));
        }
    }
    #[test]
    fn spike_flips_time_or_moves_location() {
        let pools = fixture_pools();
        let mut generator = generator(&pools, PairingMode::Spiky, 1.0);
        let (mut flipped, mut moved) = (false, false);
        for _ in 0..100 {
            generator.reset_spike_budget();
            let (time, location_type, location_spiked) =
                generator.spike_override(TimeKey::Noon, LocationType::Nature);
            if location_spiked {
                assert_eq!(time, TimeKey::Noon);
                assert_ne!(location_type, LocationType::Nature);
                moved = true;
            } else {
                assert_eq!(time, TimeKey::Noon.opposite());
                assert_eq!(location_type, LocationType::Nature);
                flipped = true;
            }
            // Budget is spent, a second call leaves everything alone
            assert_eq!(
                generator.spike_override(TimeKey::Noon, LocationType::Nature),
                (TimeKey::Noon, LocationType::Nature, false)
            );
        }
        assert!(flipped && moved);
    }

    #[test]
    fn location_spike_survives_scene_assembly() {
        let pools = fixture_pools();
        let mut generator = generator(&pools, PairingMode::Spiky, 1.0);
        let genre = genres::resolve("nature_scenic");
        let (mut moved, mut kept) = (0, 0);
        for _ in 0..100 {
            generator.reset_spike_budget();
            if generator.generate_scene(genre, DistancePreset::Random).location_type
                == LocationType::Nature
            {
                kept += 1;
            } else {
                moved += 1;
            }
        }
        assert!(moved > 0 && kept > 0, "moved {moved}, kept {kept}");
    }

    #[test]
    fn atmosphere_spike_samples_unfiltered() {
        let pools = fixture_pools();
        let mut paired = generator(&pools, PairingMode::Paired, 1.0);
        for _ in 0..100 {
            assert_eq!(
                paired.pick_atmosphere(TimeKey::Night, LocationType::UrbanNight),
                Some("late night calm")
            );
        }

        let mut spiky = generator(&pools, PairingMode::Spiky, 1.0);
        let mut saw_mismatch = false;
        for _ in 0..100 {
            spiky.reset_spike_budget();
            let atmosphere = spiky.pick_atmosphere(TimeKey::Night, LocationType::UrbanNight);
            saw_mismatch |= atmosphere == Some("warm breeze");
            // Budget spent, back to the coherent pick
            assert_eq!(
                spiky.pick_atmosphere(TimeKey::Night, LocationType::UrbanNight),
                Some("late night calm")
            );
        }
        assert!(saw_mismatch);
    }

    #[test]
    fn optics_skip_placeholders_and_prefer_short_entries() {
        let empty = DataPools::from_lists::<_, &str>([]);
        let mut generator_empty = generator(&empty, PairingMode::Paired, 0.0);
        for _ in 0..50 {
            assert_eq!(generator_empty.pick_optics(DistancePreset::FaceCloseup), None);
        }

        let pools = DataPools::from_lists([(
            Pool::OpticsBokeh,
            vec!["bokeh", "depth of field, bokeh, blurry background, lens blur"],
        )]);
        let mut generator = generator(&pools, PairingMode::Paired, 0.0);
        let picks = (0..200)
            .filter_map(|_| generator.pick_optics(DistancePreset::FaceCloseup))
            .collect::<Vec<_>>();
        assert!(!picks.is_empty());
        assert!(picks.iter().all(|p| *p == "bokeh"));
    }

    #[test]
    fn time_tag_prefers_variants() {
        let pools = DataPools::from_lists([(Pool::TimeNight, vec!["starlit night"])]);
        let mut generator = generator(&pools, PairingMode::Paired, 0.0);
        assert_eq!(generator.time_tag(TimeKey::Night), "starlit night");
        assert_eq!(generator.time_tag(TimeKey::Dawn), TimeKey::Dawn.default_tag());
    }

    #[test]
    fn time_weights_follow_mode_and_location() {
        let pools = fixture_pools();
        let mut pure = generator(&pools, PairingMode::Pure, 0.0);
        let mut counts = std::collections::HashMap::new();
        for _ in 0..8000 {
            *counts.entry(pure.pick_time_key(LocationType::Cozy)).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), TimeKey::ALL.len());
        assert!(counts.values().all(|c| (700..1300).contains(c)), "{counts:?}");

        let mut paired = generator(&pools, PairingMode::Paired, 0.0);
        let (mut late, mut early) = (0, 0);
        for _ in 0..2000 {
            match paired.pick_time_key(LocationType::Cozy) {
                TimeKey::Dusk | TimeKey::Night | TimeKey::Midnight => late += 1,
                TimeKey::Dawn | TimeKey::Morning | TimeKey::Noon => early += 1,
                _ => {}
            }
        }
        assert!(late > early * 2, "late {late}, early {early}");
    }
}
