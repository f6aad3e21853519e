use crate::common::QualityPreset;
use anyhow::{Context, Result};
use log::{debug, warn};
use rand::{Rng, seq::IndexedRandom};
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

pub mod extra;

/// Stand-in entry for a list whose file is missing or empty.
pub const PLACEHOLDER: &str = "default";

/// Key=value files that live in the data dir alongside the lists.
pub const DICT_FILES: &[&str] = &["quality_presets.txt"];

macro_rules! pools {
    ($($variant:ident => $file:literal,)*) => {
        /// Every word list the generator reads, keyed to its file in the data dir.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Pool {
            $($variant,)*
        }

        impl Pool {
            pub const ALL: &[Self] = &[$(Self::$variant,)*];

            pub const fn file_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $file,)*
                }
            }
        }
    };
}

pools! {
    ClothingColors => "colors_clothing.txt",
    HairColors => "hair_colors.txt",
    HairStyles => "hair_styles.txt",
    HairAccessories => "hair_accessories.txt",
    HairModifiers => "hair_modifiers.txt",
    EyeColors => "eye_colors.txt",
    EyeQuality => "eye_quality.txt",
    FaceQuality => "face_quality.txt",
    BodyTypes => "body_types.txt",
    AgeMaturity => "age_maturity.txt",
    NationalityEthnicity => "nationality_ethnicity.txt",
    SkinTones => "skin_tones.txt",
    SkinDetails => "skin_details.txt",
    Makeup => "makeup.txt",
    Jewelry => "jewelry.txt",
    ExpressionsPeaceful => "expressions_peaceful.txt",
    ExpressionsHappy => "expressions_happy.txt",
    ExpressionsShy => "expressions_shy.txt",
    ExpressionsSerious => "expressions_serious.txt",
    ExpressionsSad => "expressions_sad.txt",
    ExpressionsSurprised => "expressions_surprised.txt",
    ExpressionsConfident => "expressions_confident.txt",
    ExpressionsMysterious => "expressions_mysterious.txt",
    ExpressionsAngry => "expressions_angry.txt",
    ExpressionsOther => "expressions_other.txt",
    HandPositions => "hand_positions.txt",
    PosesSitting => "poses_sitting.txt",
    PosesLying => "poses_lying.txt",
    PosesStanding => "poses_standing.txt",
    PosesRelaxed => "poses_relaxed.txt",
    PosesPlayful => "poses_playful.txt",
    ClothingCasual => "clothing_casual.txt",
    ClothingSchool => "clothing_school.txt",
    ClothingBusiness => "clothing_business.txt",
    ClothingStreetwear => "clothing_streetwear.txt",
    ClothingFantasy => "clothing_fantasy.txt",
    ClothingMedieval => "clothing_medieval.txt",
    ClothingScifi => "clothing_scifi.txt",
    ClothingCyberpunk => "clothing_cyberpunk.txt",
    ClothingNoir => "clothing_noir.txt",
    ClothingSleepwear => "clothing_sleepwear.txt",
    ClothingElegant => "clothing_elegant.txt",
    ClothingAthletic => "clothing_athletic.txt",
    ClothingTorn => "clothing_torn.txt",
    Legwear => "legwear.txt",
    Footwear => "footwear.txt",
    Accessories => "accessories.txt",
    LocationsCozy => "locations_cozy.txt",
    LocationsUrbanDay => "locations_urban_day.txt",
    LocationsUrbanNight => "locations_urban_night.txt",
    LocationsCyberpunk => "locations_cyberpunk.txt",
    LocationsFantasy => "locations_fantasy.txt",
    LocationsNature => "locations_nature.txt",
    LocationsSchool => "locations_school.txt",
    LocationsHistorical => "locations_historical.txt",
    LocationsModern => "locations_modern.txt",
    Weather => "weather.txt",
    SkyDetails => "sky_details.txt",
    TimeDawn => "time_dawn.txt",
    TimeMorning => "time_morning.txt",
    TimeNoon => "time_noon.txt",
    TimeAfternoon => "time_afternoon.txt",
    TimeGoldenHour => "time_golden_hour.txt",
    TimeDusk => "time_dusk.txt",
    TimeNight => "time_night.txt",
    TimeMidnight => "time_midnight.txt",
    AtmosphericEffects => "atmospheric_effects.txt",
    LightingNatural => "lighting_natural.txt",
    LightingArtificial => "lighting_artificial.txt",
    LightingDramatic => "lighting_dramatic.txt",
    CameraAngles => "camera_angles.txt",
    CameraDistance => "camera_distance.txt",
    StyleEnhancersStandard => "style_enhancers_standard.txt",
    StyleEnhancersDramatic => "style_enhancers_dramatic.txt",
    Moods => "moods.txt",
    Retro90sFlavor => "retro_90s_flavor.txt",
    StyleModifiers => "style_modifiers.txt",
    ArtisticStyles => "artistic_styles.txt",
    RenderingStyles => "rendering_styles.txt",
    QualityBoosters => "quality_boosters.txt",
    QualityScaffold => "quality_scaffold_illustrious.txt",
    OpticsBokeh => "optics_bokeh.txt",
    ArtFilmGrain => "artistic_film_grain.txt",
    ArtShading => "artistic_shading.txt",
    ArtLinework => "artistic_linework.txt",
    ArtShadows => "artistic_shadows.txt",
    ArtContrast => "artistic_contrast.txt",
    ArtEra => "artistic_era.txt",
}

impl Pool {
    /// Whether `file_name` is read by the generator itself, as opposed to an extra pool.
    pub fn is_known_file(file_name: &str) -> bool {
        Self::ALL.iter().any(|pool| pool.file_name() == file_name) || DICT_FILES.contains(&file_name)
    }
}

/// Parse list file contents: one entry per line, `#` comments (full line or inline) ignored.
pub fn parse_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.split_once('#').map_or(line, |(tag, _)| tag).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a list file, returning `None` when it does not exist.
pub fn read_list(dir: &Path, file_name: &str) -> Result<Option<Vec<String>>> {
    let path = dir.join(file_name);
    match fs::read_to_string(&path) {
        Ok(contents) => Ok(Some(parse_list(&contents))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed reading {}", path.display())),
    }
}

/// Load a list; a missing or empty file falls back to the placeholder entry.
pub fn load_list(dir: &Path, file_name: &str) -> Result<Vec<String>> {
    match read_list(dir, file_name)? {
        Some(items) if !items.is_empty() => Ok(items),
        Some(_) => {
            warn!("{file_name} is empty, using defaults");
            Ok(vec![PLACEHOLDER.to_string()])
        }
        None => {
            warn!("{file_name} not found, using defaults");
            Ok(vec![PLACEHOLDER.to_string()])
        }
    }
}

/// Load `key=value` lines; a missing file yields an empty map.
pub fn load_dict(dir: &Path, file_name: &str) -> Result<HashMap<String, String>> {
    let path = dir.join(file_name);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{file_name} not found, no overrides");
            return Ok(HashMap::new());
        }
        Err(e) => return Err(e).with_context(|| format!("Failed reading {}", path.display())),
    };
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect())
}

pub fn is_real_list<S: AsRef<str>>(items: &[S]) -> bool {
    !items.is_empty() && !(items.len() == 1 && items[0].as_ref() == PLACEHOLDER)
}

/// All word lists loaded from one data directory.
#[derive(Debug, Clone)]
pub struct DataPools {
    dir: PathBuf,
    lists: HashMap<Pool, Vec<String>>,
    quality_overrides: HashMap<String, String>,
    extras: BTreeMap<String, Vec<String>>,
}

impl DataPools {
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            warn!("Data directory {} does not exist", dir.display());
        }
        let mut lists = HashMap::with_capacity(Pool::ALL.len());
        for pool in Pool::ALL {
            lists.insert(*pool, load_list(dir, pool.file_name())?);
        }
        let quality_overrides = load_dict(dir, DICT_FILES[0])?;
        let extras = extra::discover(dir)?;
        debug!(
            "Loaded {} lists and {} extra pools from {}",
            lists.len(),
            extras.len(),
            dir.display()
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            lists,
            quality_overrides,
            extras,
        })
    }

    /// Build pools in memory; lists not given get the placeholder entry.
    #[cfg(test)]
    pub fn from_lists<I, S>(lists: I) -> Self
    where
        I: IntoIterator<Item = (Pool, Vec<S>)>,
        S: Into<String>,
    {
        let mut map = Pool::ALL
            .iter()
            .map(|pool| (*pool, vec![PLACEHOLDER.to_string()]))
            .collect::<HashMap<_, _>>();
        for (pool, items) in lists {
            map.insert(pool, items.into_iter().map(Into::into).collect());
        }
        Self {
            dir: PathBuf::new(),
            lists: map,
            quality_overrides: HashMap::new(),
            extras: BTreeMap::new(),
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_extras(mut self, extras: BTreeMap<String, Vec<String>>) -> Self {
        self.extras = extras;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn get(&self, pool: Pool) -> &[String] {
        self.lists.get(&pool).map(Vec::as_slice).unwrap_or_default()
    }

    /// The list, unless it is missing or only the placeholder.
    pub fn real(&self, pool: Pool) -> Option<&[String]> {
        let items = self.get(pool);
        is_real_list(items).then_some(items)
    }

    pub fn union(&self, pools: &[Pool]) -> Vec<&str> {
        pools
            .iter()
            .flat_map(|pool| self.get(*pool))
            .map(String::as_str)
            .collect()
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R, pool: Pool) -> &str {
        self.get(pool)
            .choose(rng)
            .map_or(PLACEHOLDER, String::as_str)
    }

    pub fn pick_any<R: Rng + ?Sized>(&self, rng: &mut R, pools: &[Pool]) -> &str {
        self.union(pools).choose(rng).copied().unwrap_or(PLACEHOLDER)
    }

    pub fn quality_base(&self, preset: QualityPreset) -> &str {
        self.quality_overrides
            .get(preset.key())
            .map_or_else(|| preset.default_tags(), String::as_str)
    }

    pub const fn extras(&self) -> &BTreeMap<String, Vec<String>> {
        &self.extras
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parse_list_strips_comments_and_blanks() {
        let items = parse_list("# header\n\nred hair\n  blue hair  # cool tone\n#skip\n   \n");
        assert_eq!(items, vec!["red hair", "blue hair"]);
    }

    #[test]
    fn missing_and_empty_lists_fall_back_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.txt"), "# only comments\n").unwrap();
        assert_eq!(load_list(dir.path(), "nope.txt").unwrap(), vec![PLACEHOLDER]);
        assert_eq!(load_list(dir.path(), "empty.txt").unwrap(), vec![PLACEHOLDER]);
        assert!(!is_real_list(&[PLACEHOLDER]));
        assert!(is_real_list(&["x"]));
    }

    #[test]
    fn load_dict_reads_key_values() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("quality_presets.txt"),
            "# overrides\nultra = best quality, masterpiece\nbroken line\nhigh=a=b\n",
        )
        .unwrap();
        let dict = load_dict(dir.path(), "quality_presets.txt").unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict["ultra"], "best quality, masterpiece");
        assert_eq!(dict["high"], "a=b");
        assert!(load_dict(dir.path(), "absent.txt").unwrap().is_empty());
    }

    #[test]
    fn load_reads_lists_overrides_and_extras() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hair_colors.txt"), "silver hair\nblack hair\n").unwrap();
        fs::write(dir.path().join("quality_presets.txt"), "standard=best quality\n").unwrap();
        fs::write(dir.path().join("props.txt"), "paper lantern\n").unwrap();

        let pools = DataPools::load(dir.path()).unwrap();
        assert_eq!(pools.get(Pool::HairColors), ["silver hair", "black hair"]);
        assert!(pools.real(Pool::EyeColors).is_none());
        assert_eq!(pools.quality_base(QualityPreset::Standard), "best quality");
        assert_eq!(
            pools.quality_base(QualityPreset::High),
            QualityPreset::High.default_tags()
        );
        assert_eq!(pools.extras().keys().collect::<Vec<_>>(), ["props.txt"]);
    }

    #[test]
    fn shipped_lists_cover_every_pool() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let pools = DataPools::load(&dir).unwrap();
        for pool in Pool::ALL {
            assert!(pools.real(*pool).is_some(), "{} is empty", pool.file_name());
        }
    }

    #[test]
    fn pool_files_are_unique() {
        let mut names = Pool::ALL.iter().map(|p| p.file_name()).collect::<Vec<_>>();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Pool::ALL.len());
        assert!(Pool::is_known_file("weather.txt"));
        assert!(Pool::is_known_file("quality_presets.txt"));
        assert!(!Pool::is_known_file("props.txt"));
    }
}
