pub mod browse;
pub mod clear;
pub mod config;
pub mod edit;
pub mod export;
pub mod import;
pub mod import_ui;
pub mod prompts;
pub mod search;
pub mod status;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use reelmap_config::{Config, CredentialStore, PathManager};
use reelmap_core::{LibraryStore, StoredLibrary};
use reelmap_sources::TmdbClient;
use std::path::PathBuf;

/// Paths, configuration and store shared by every command.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub store: LibraryStore,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;
        paths
            .ensure_directories()
            .map_err(|e| eyre!("Failed to create {}: {}", paths.config_dir().display(), e))?;
        let store = LibraryStore::from_paths(&paths);
        Ok(Self { paths, config, store })
    }

    /// TMDB client using the key from `TMDB_API_KEY` or the credentials file.
    pub fn tmdb_client(&self) -> Result<TmdbClient> {
        let mut credentials = CredentialStore::new(self.paths.credentials_file());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials: {}", e))?;
        TmdbClient::new(credentials.resolve_tmdb_api_key(), &self.config.tmdb).map_err(|e| eyre!("{}", e))
    }

    /// The stored library, or an error telling the user to import first.
    pub fn require_library(&self) -> Result<StoredLibrary> {
        self.store
            .load_library()
            .ok_or_else(|| eyre!("No library imported yet. Run `reelmap import <watched.csv>` first."))
    }
}

/// Log file from config.toml, read before logging is set up so failures stay silent.
pub fn configured_log_file() -> Option<PathBuf> {
    let paths = PathManager::default();
    Config::load_or_default(&paths.config_file()).ok()?.logging.file
}
