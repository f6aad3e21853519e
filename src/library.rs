//! History and favorites, persisted as one ron file.

use crate::common::{FavoriteData, HistoryEntry};
use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, io::ErrorKind, path::Path};
use tokio::fs;
use uuid::Uuid;

pub const HISTORY_LIMIT: usize = 200;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Library {
    pub history: Vec<HistoryEntry>,
    pub favorites: HashMap<Uuid, FavoriteData>,
}

impl Library {
    /// Record a batch, dropping the oldest entries beyond the limit.
    pub fn push_history(
        &mut self,
        genre: &str,
        seed: Option<u64>,
        prompts: Vec<String>,
    ) -> &HistoryEntry {
        let count = u32::try_from(prompts.len()).unwrap_or(u32::MAX);
        self.history.push(HistoryEntry {
            id: Uuid::new_v4(),
            datetime: Utc::now(),
            genre: genre.to_string(),
            seed,
            count,
            prompts,
        });
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
        &self.history[self.history.len() - 1]
    }

    pub fn last_prompt(&self) -> Option<(&HistoryEntry, &str)> {
        self.history
            .iter()
            .rev()
            .find_map(|entry| entry.prompts.last().map(|p| (entry, p.as_str())))
    }

    /// Save `text`, or the most recent generated prompt when none is given.
    pub fn add_favorite(&mut self, text: Option<&str>) -> Result<Uuid> {
        let (genre, seed, text) = match text.map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => (String::new(), None, text.to_string()),
            None => {
                let (entry, prompt) = self
                    .last_prompt()
                    .ok_or_else(|| anyhow!("No generated prompt to favorite yet"))?;
                (entry.genre.clone(), entry.seed, prompt.to_string())
            }
        };
        let id = Uuid::new_v4();
        self.favorites.insert(
            id,
            FavoriteData {
                id,
                datetime: Utc::now(),
                genre,
                seed,
                text,
            },
        );
        Ok(id)
    }

    /// Favorites, newest first.
    pub fn favorites_sorted(&self) -> Vec<&FavoriteData> {
        let mut favorites = self.favorites.values().collect::<Vec<_>>();
        favorites.sort_by(|a, b| b.datetime.cmp(&a.datetime));
        favorites
    }

    /// Remove by full id or unique id prefix.
    pub fn remove_favorite(&mut self, id: &str) -> Result<FavoriteData> {
        let id = id.trim().to_lowercase();
        let matches = self
            .favorites
            .keys()
            .filter(|key| key.to_string().starts_with(&id))
            .copied()
            .collect::<Vec<_>>();
        match matches.as_slice() {
            [key] => self
                .favorites
                .remove(key)
                .ok_or_else(|| anyhow!("Favorite {key} vanished")),
            [] => Err(anyhow!("No favorite matches '{id}'")),
            _ => Err(anyhow!("Favorite id '{id}' is ambiguous")),
        }
    }
}

pub async fn read_library(path: &Path) -> Result<Library> {
    let data = match fs::read_to_string(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Library::default()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed reading library {}", path.display()));
        }
    };
    ron::from_str(&data).with_context(|| format!("Invalid library file {}", path.display()))
}

pub async fn write_library(path: &Path, library: &Library) -> Result<()> {
    let pretty = ron::ser::PrettyConfig::new().compact_arrays(true);
    let data = ron::ser::to_string_pretty(library, pretty)?;
    fs::write(path, data)
        .await
        .with_context(|| format!("Failed writing library {}", path.display()))?;
    info!("Library saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_capped() {
        let mut library = Library::default();
        for i in 0..(HISTORY_LIMIT + 5) {
            library.push_history("random", Some(i as u64), vec![format!("prompt {i}")]);
        }
        assert_eq!(library.history.len(), HISTORY_LIMIT);
        assert_eq!(library.history[0].seed, Some(5));
        assert_eq!(library.last_prompt().unwrap().1, format!("prompt {}", HISTORY_LIMIT + 4));
    }

    #[test]
    fn favorites_from_text_or_last_prompt() {
        let mut library = Library::default();
        assert!(library.add_favorite(None).is_err());

        library.push_history("neo_noir", Some(3), vec!["a".to_string(), "b".to_string()]);
        let id = library.add_favorite(None).unwrap();
        assert_eq!(library.favorites[&id].text, "b");
        assert_eq!(library.favorites[&id].genre, "neo_noir");

        let typed = library.add_favorite(Some("  hand typed  ")).unwrap();
        assert_eq!(library.favorites[&typed].text, "hand typed");
        assert_eq!(library.favorites_sorted().len(), 2);

        let removed = library.remove_favorite(&id.to_string()[..8]).unwrap();
        assert_eq!(removed.id, id);
        assert!(library.remove_favorite("zzz").is_err());
    }

    #[tokio::test]
    async fn library_round_trips_through_ron() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.ron");
        assert_eq!(read_library(&path).await.unwrap(), Library::default());

        let mut library = Library::default();
        library.push_history("random", None, vec!["1girl, solo, rain".to_string()]);
        library.add_favorite(None).unwrap();
        write_library(&path, &library).await.unwrap();
        assert_eq!(read_library(&path).await.unwrap(), library);

        fs::write(&path, "not ron at all (").await.unwrap();
        assert!(read_library(&path).await.is_err());
    }
}
