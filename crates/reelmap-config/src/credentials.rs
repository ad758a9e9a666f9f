use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the stored TMDB key
pub const TMDB_API_KEY_ENV: &str = "TMDB_API_KEY";

/// Contents of `credentials.toml`, stored apart from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tmdb_api_key: Option<String>,
}

pub struct CredentialStore {
    path: PathBuf,
    credentials: Credentials,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: Credentials::default(),
        }
    }

    /// Read the file if it exists; a missing file leaves the store empty.
    pub fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        self.credentials = toml::from_str(&content).with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.credentials)?;
        std::fs::write(&self.path, content).with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    pub fn get_tmdb_api_key(&self) -> Option<&str> {
        self.credentials.tmdb_api_key.as_deref()
    }

    pub fn set_tmdb_api_key(&mut self, key: String) {
        self.credentials.tmdb_api_key = Some(key);
    }

    /// `TMDB_API_KEY` from the environment wins over the stored key
    pub fn resolve_tmdb_api_key(&self) -> Option<String> {
        self.resolve_with_env(std::env::var(TMDB_API_KEY_ENV).ok())
    }

    fn resolve_with_env(&self, env_key: Option<String>) -> Option<String> {
        env_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .or_else(|| self.get_tmdb_api_key().map(str::to_string))
    }
}
