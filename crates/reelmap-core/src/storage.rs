use chrono::{DateTime, Utc};
use reelmap_config::PathManager;
use reelmap_models::{CountryMap, ProcessedMovie, UserEdit};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::overrides::upsert_edit;

const LIBRARY_KEY: &str = "library";
const EDITS_KEY: &str = "edits";
const CUSTOM_MOVIES_KEY: &str = "custom_movies";

/// Nominal size budget reported by [`LibraryStore::storage_info`]
pub const STORAGE_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Enriched library as persisted after an import or an edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredLibrary {
    pub movies: Vec<ProcessedMovie>,
    #[serde(with = "country_pairs")]
    pub country_data: CountryMap,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
}

impl StoredLibrary {
    pub fn new(movies: Vec<ProcessedMovie>, country_data: CountryMap, original_file_name: Option<String>) -> Self {
        Self {
            movies,
            country_data,
            last_updated: Utc::now(),
            original_file_name,
        }
    }
}

/// The country map is stored as `[[code, aggregate], ...]`.
mod country_pairs {
    use reelmap_models::{CountryAggregate, CountryMap};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(map: &CountryMap, serializer: S) -> Result<S::Ok, S::Error> {
        let pairs: Vec<(&String, &CountryAggregate)> = map.iter().collect();
        pairs.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CountryMap, D::Error> {
        let pairs = Vec::<(String, CountryAggregate)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreHealth {
    /// Nothing imported yet
    Empty,
    Healthy,
    Corrupted { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageInfo {
    pub library_bytes: u64,
    pub edits_bytes: u64,
    pub custom_movies_bytes: u64,
}

impl StorageInfo {
    pub fn used(&self) -> u64 {
        self.library_bytes + self.edits_bytes + self.custom_movies_bytes
    }

    pub fn available(&self) -> u64 {
        STORAGE_QUOTA_BYTES.saturating_sub(self.used())
    }
}

/// File-backed store with one JSON document per key.
///
/// Every save replaces exactly one file through a temp file and a rename.
/// Files that fail to parse are logged and read as absent; they are left on
/// disk so that [`LibraryStore::health`] can report them. Saves that extend
/// an existing list refuse to overwrite a list they cannot read.
#[derive(Debug, Clone)]
pub struct LibraryStore {
    store_dir: PathBuf,
}

impl LibraryStore {
    pub fn new(store_dir: impl Into<PathBuf>) -> Self {
        Self {
            store_dir: store_dir.into(),
        }
    }

    pub fn from_paths(path_manager: &PathManager) -> Self {
        Self::new(path_manager.store_dir())
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.store_dir.join(format!("{}.json", key))
    }

    pub fn save_library(&self, library: &StoredLibrary) -> Result<(), StorageError> {
        self.write_key(LIBRARY_KEY, library)?;
        info!(
            "Saved library: {} movies across {} countries",
            library.movies.len(),
            library.country_data.len()
        );
        Ok(())
    }

    pub fn load_library(&self) -> Option<StoredLibrary> {
        self.read_key(LIBRARY_KEY).ok().flatten()
    }

    /// Upsert `edit` by movie id and return the full edit list as saved.
    pub fn save_edit(&self, edit: UserEdit) -> Result<Vec<UserEdit>, StorageError> {
        let mut edits: Vec<UserEdit> = self.read_list_for_update(EDITS_KEY)?;
        upsert_edit(&mut edits, edit);
        self.write_key(EDITS_KEY, &edits)?;
        Ok(edits)
    }

    pub fn load_edits(&self) -> Vec<UserEdit> {
        self.read_key(EDITS_KEY).ok().flatten().unwrap_or_default()
    }

    /// Append a manually added movie and return the full list as saved.
    pub fn save_custom_movie(&self, movie: ProcessedMovie) -> Result<Vec<ProcessedMovie>, StorageError> {
        let mut movies: Vec<ProcessedMovie> = self.read_list_for_update(CUSTOM_MOVIES_KEY)?;
        movies.push(movie);
        self.write_key(CUSTOM_MOVIES_KEY, &movies)?;
        Ok(movies)
    }

    pub fn load_custom_movies(&self) -> Vec<ProcessedMovie> {
        self.read_key(CUSTOM_MOVIES_KEY).ok().flatten().unwrap_or_default()
    }

    pub fn clear_all(&self) -> Result<(), StorageError> {
        for key in [LIBRARY_KEY, EDITS_KEY, CUSTOM_MOVIES_KEY] {
            let path = self.key_path(key);
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => return Err(StorageError::Remove { path, source }),
            }
        }
        info!("Cleared all stored data");
        Ok(())
    }

    pub fn storage_info(&self) -> StorageInfo {
        let size = |key: &str| std::fs::metadata(self.key_path(key)).map(|m| m.len()).unwrap_or(0);
        StorageInfo {
            library_bytes: size(LIBRARY_KEY),
            edits_bytes: size(EDITS_KEY),
            custom_movies_bytes: size(CUSTOM_MOVIES_KEY),
        }
    }

    /// Inspect the stored data without modifying anything.
    ///
    /// Any key that exists but cannot be read is reported as corrupted, as is
    /// a library that holds no movies or whose country map disagrees with its
    /// own counts.
    pub fn health(&self) -> StoreHealth {
        let side_keys = [
            (EDITS_KEY, self.read_key::<Vec<UserEdit>>(EDITS_KEY).err()),
            (CUSTOM_MOVIES_KEY, self.read_key::<Vec<ProcessedMovie>>(CUSTOM_MOVIES_KEY).err()),
        ];
        if let Some((key, Some(reason))) = side_keys.into_iter().find(|(_, err)| err.is_some()) {
            return StoreHealth::Corrupted {
                reason: format!("{} cannot be read: {}", key, reason),
            };
        }

        let library = match self.read_key::<StoredLibrary>(LIBRARY_KEY) {
            Ok(None) => return StoreHealth::Empty,
            Ok(Some(library)) => library,
            Err(reason) => return StoreHealth::Corrupted { reason },
        };

        if library.movies.is_empty() {
            return StoreHealth::Corrupted {
                reason: "library has no movies".to_string(),
            };
        }
        if let Some((code, _)) = library
            .country_data
            .iter()
            .find(|(_, aggregate)| aggregate.movie_count != aggregate.movies.len())
        {
            return StoreHealth::Corrupted {
                reason: format!("movie count for {} does not match its movie list", code),
            };
        }
        if library.country_data.is_empty() && library.movies.iter().any(|m| m.primary_country().is_some()) {
            return StoreHealth::Corrupted {
                reason: "country data is missing".to_string(),
            };
        }
        StoreHealth::Healthy
    }

    /// `Ok(None)` when the key was never written, `Err` with a reason when it
    /// exists but cannot be used.
    fn read_key<T>(&self, key: &str) -> Result<Option<T>, String>
    where
        T: for<'de> Deserialize<'de>,
    {
        let path = self.key_path(key);
        if !path.exists() {
            debug!("Store miss: {} (file does not exist)", key);
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            warn!("Failed to read stored {}: {}", key, e);
            e.to_string()
        })?;

        match serde_json::from_str::<T>(&content) {
            Ok(value) => {
                debug!("Store hit: {}", key);
                Ok(Some(value))
            }
            Err(e) => {
                warn!("Stored {} is corrupted: {}. Treating it as empty.", key, e);
                Err(e.to_string())
            }
        }
    }

    fn read_list_for_update<T>(&self, key: &'static str) -> Result<Vec<T>, StorageError>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.read_key(key)
            .map(Option::unwrap_or_default)
            .map_err(|reason| StorageError::Corrupted { key, reason })
    }

    fn write_key<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> Result<(), StorageError> {
        let path = self.key_path(key);
        std::fs::create_dir_all(&self.store_dir).map_err(|source| StorageError::Write {
            path: self.store_dir.clone(),
            source,
        })?;

        let json = serde_json::to_string_pretty(value).map_err(|source| StorageError::Serialize { key, source })?;

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json).map_err(|source| StorageError::Write {
            path: temp_path.clone(),
            source,
        })?;
        std::fs::rename(&temp_path, &path).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;
        debug!("Store saved: {}", key);
        Ok(())
    }
}
