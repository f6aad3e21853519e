use crate::{data::Pool, generator::scene::LocationType};
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Peaceful,
    Urban,
    Dark,
    Futuristic,
    Epic,
    Medieval,
    Noir,
    Intense,
    Varied,
}

impl Mood {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Peaceful => "peaceful",
            Self::Urban => "urban",
            Self::Dark => "dark",
            Self::Futuristic => "futuristic",
            Self::Epic => "epic",
            Self::Medieval => "medieval",
            Self::Noir => "noir",
            Self::Intense => "intense",
            Self::Varied => "varied",
        }
    }

    /// Expression lists that fit the mood.
    pub const fn expressions(self) -> &'static [Pool] {
        use Pool::{
            ExpressionsAngry, ExpressionsConfident, ExpressionsHappy, ExpressionsMysterious,
            ExpressionsOther, ExpressionsPeaceful, ExpressionsSad, ExpressionsSerious,
            ExpressionsShy, ExpressionsSurprised,
        };
        match self {
            Self::Peaceful => &[ExpressionsPeaceful],
            Self::Urban => &[ExpressionsConfident, ExpressionsOther],
            Self::Dark => &[ExpressionsSerious, ExpressionsMysterious],
            Self::Futuristic | Self::Epic => &[ExpressionsSerious, ExpressionsConfident],
            Self::Medieval => &[ExpressionsPeaceful, ExpressionsSerious],
            Self::Noir => &[ExpressionsMysterious, ExpressionsSerious],
            Self::Intense => &[ExpressionsSerious, ExpressionsAngry],
            Self::Varied => &[
                ExpressionsPeaceful,
                ExpressionsHappy,
                ExpressionsShy,
                ExpressionsSerious,
                ExpressionsSad,
                ExpressionsSurprised,
                ExpressionsConfident,
                ExpressionsMysterious,
                ExpressionsOther,
            ],
        }
    }
}

#[derive(Debug)]
pub struct Genre {
    pub name: &'static str,
    pub description: &'static str,
    pub clothing: &'static [Pool],
    pub locations: &'static [LocationType],
    pub poses: &'static [Pool],
    pub lighting: &'static [Pool],
    pub mood: Mood,
}

const SITTING: Pool = Pool::PosesSitting;
const LYING: Pool = Pool::PosesLying;
const STANDING: Pool = Pool::PosesStanding;
const RELAXED: Pool = Pool::PosesRelaxed;
const PLAYFUL: Pool = Pool::PosesPlayful;
const NATURAL: Pool = Pool::LightingNatural;
const ARTIFICIAL: Pool = Pool::LightingArtificial;
const DRAMATIC: Pool = Pool::LightingDramatic;

pub const RANDOM: &str = "random";

pub static GENRES: &[Genre] = &[
    Genre {
        name: "cozy_slice_of_life",
        description: "Peaceful cafes, bedrooms, warm lighting",
        clothing: &[Pool::ClothingCasual, Pool::ClothingSleepwear, Pool::ClothingSchool],
        locations: &[LocationType::Cozy, LocationType::School, LocationType::Nature],
        poses: &[SITTING, LYING, RELAXED],
        lighting: &[NATURAL],
        mood: Mood::Peaceful,
    },
    Genre {
        name: "urban_contemporary",
        description: "Modern streets, rooftops, city vibes",
        clothing: &[
            Pool::ClothingCasual,
            Pool::ClothingStreetwear,
            Pool::ClothingBusiness,
            Pool::ClothingAthletic,
        ],
        locations: &[LocationType::UrbanDay, LocationType::UrbanNight, LocationType::Modern],
        poses: &[STANDING, SITTING, RELAXED],
        lighting: &[NATURAL, ARTIFICIAL],
        mood: Mood::Urban,
    },
    Genre {
        name: "cyberpunk_noir",
        description: "Neon streets, tech wear, rain-slicked",
        clothing: &[
            Pool::ClothingCyberpunk,
            Pool::ClothingNoir,
            Pool::ClothingStreetwear,
            Pool::ClothingScifi,
        ],
        locations: &[LocationType::Cyberpunk, LocationType::UrbanNight],
        poses: &[STANDING, SITTING],
        lighting: &[ARTIFICIAL, DRAMATIC],
        mood: Mood::Dark,
    },
    Genre {
        name: "scifi_future",
        description: "Space suits, androids, futuristic",
        clothing: &[Pool::ClothingScifi, Pool::ClothingCyberpunk],
        locations: &[LocationType::Cyberpunk, LocationType::Modern],
        poses: &[STANDING, SITTING, RELAXED],
        lighting: &[ARTIFICIAL, DRAMATIC],
        mood: Mood::Futuristic,
    },
    Genre {
        name: "fantasy_adventure",
        description: "Castles, magic, medieval settings",
        clothing: &[Pool::ClothingFantasy, Pool::ClothingElegant, Pool::ClothingMedieval],
        locations: &[LocationType::Fantasy, LocationType::Nature, LocationType::Historical],
        poses: &[STANDING, SITTING],
        lighting: &[DRAMATIC, NATURAL],
        mood: Mood::Epic,
    },
    Genre {
        name: "medieval_fantasy",
        description: "Taverns, knights, princesses",
        clothing: &[Pool::ClothingMedieval, Pool::ClothingFantasy],
        locations: &[LocationType::Fantasy, LocationType::Historical, LocationType::Nature],
        poses: &[STANDING, SITTING, LYING],
        lighting: &[NATURAL, DRAMATIC],
        mood: Mood::Medieval,
    },
    Genre {
        name: "neo_noir",
        description: "Detective aesthetic, dramatic shadows",
        clothing: &[Pool::ClothingNoir, Pool::ClothingBusiness, Pool::ClothingElegant],
        locations: &[LocationType::UrbanNight, LocationType::Modern],
        poses: &[STANDING, SITTING],
        lighting: &[DRAMATIC],
        mood: Mood::Noir,
    },
    Genre {
        name: "nature_scenic",
        description: "Beaches, forests, mountains, outdoors",
        clothing: &[Pool::ClothingCasual, Pool::ClothingElegant, Pool::ClothingAthletic],
        locations: &[LocationType::Nature],
        poses: &[STANDING, SITTING, RELAXED, PLAYFUL],
        lighting: &[NATURAL],
        mood: Mood::Peaceful,
    },
    Genre {
        name: "action_torn",
        description: "Battle damaged gear, dynamic scenes",
        clothing: &[
            Pool::ClothingTorn,
            Pool::ClothingFantasy,
            Pool::ClothingScifi,
            Pool::ClothingCyberpunk,
        ],
        locations: &[
            LocationType::UrbanDay,
            LocationType::UrbanNight,
            LocationType::Fantasy,
            LocationType::Cyberpunk,
        ],
        poses: &[STANDING, SITTING],
        lighting: &[DRAMATIC, ARTIFICIAL],
        mood: Mood::Intense,
    },
    Genre {
        name: RANDOM,
        description: "Mix of everything",
        clothing: &[
            Pool::ClothingCasual,
            Pool::ClothingSchool,
            Pool::ClothingBusiness,
            Pool::ClothingStreetwear,
            Pool::ClothingFantasy,
            Pool::ClothingMedieval,
            Pool::ClothingScifi,
            Pool::ClothingCyberpunk,
            Pool::ClothingNoir,
            Pool::ClothingSleepwear,
            Pool::ClothingElegant,
            Pool::ClothingAthletic,
            Pool::ClothingTorn,
        ],
        locations: LocationType::ALL,
        poses: &[SITTING, LYING, STANDING, RELAXED, PLAYFUL],
        lighting: &[NATURAL, ARTIFICIAL, DRAMATIC],
        mood: Mood::Varied,
    },
];

pub fn get(name: &str) -> Option<&'static Genre> {
    let name = name.trim();
    GENRES.iter().find(|genre| genre.name.eq_ignore_ascii_case(name))
}

/// Look up a genre, falling back to `random` for unknown names.
pub fn resolve(name: &str) -> &'static Genre {
    get(name).unwrap_or_else(|| {
        if !name.trim().is_empty() {
            warn!("Unknown genre '{name}', using {RANDOM}");
        }
        &GENRES[GENRES.len() - 1]
    })
}

/// All genres sorted by name.
pub fn list() -> Vec<&'static Genre> {
    let mut genres = GENRES.iter().collect::<Vec<_>>();
    genres.sort_by_key(|genre| genre.name);
    genres
}
