use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// TMDB endpoint settings. The API key itself lives in the credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    #[serde(default = "default_tmdb_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Pause between two movies, to stay under TMDB's rate limits
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Trust a `Production Countries` column in the imported CSV instead of querying TMDB
    #[serde(default)]
    pub reuse_csv_countries: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// CSV imported by `reelmap import --default`
    #[serde(default)]
    pub default_csv: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to a daily-rotated file instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_request_delay_ms() -> u64 {
    100
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_tmdb_base_url(),
            image_base_url: default_tmdb_image_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            reuse_csv_countries: false,
        }
    }
}

impl TmdbConfig {
    /// Full poster URL for a TMDB `poster_path` such as `/abc.jpg`
    pub fn poster_url(&self, poster_path: &str) -> String {
        format!("{}{}", self.image_base_url.trim_end_matches('/'), poster_path)
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, or defaults when it does not exist yet
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tmdb.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("tmdb.timeout_seconds must be greater than zero"));
        }

        if !self.tmdb.base_url.starts_with("http://") && !self.tmdb.base_url.starts_with("https://") {
            return Err(anyhow::anyhow!("tmdb.base_url must be an http(s) URL: {}", self.tmdb.base_url));
        }

        if let Some(ref csv) = self.library.default_csv {
            if csv.as_os_str().is_empty() {
                return Err(anyhow::anyhow!("library.default_csv cannot be empty"));
            }
        }

        Ok(())
    }

    /// Set one value by its dotted key, e.g. `enrichment.request_delay_ms`.
    /// An empty value unsets the optional paths.
    pub fn set_value(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let value = value.trim();
        let optional_path = |v: &str| if v.is_empty() { None } else { Some(PathBuf::from(v)) };
        match key {
            "tmdb.base_url" => self.tmdb.base_url = value.trim_end_matches('/').to_string(),
            "tmdb.image_base_url" => self.tmdb.image_base_url = value.to_string(),
            "tmdb.timeout_seconds" => self.tmdb.timeout_seconds = parse_value(key, value)?,
            "enrichment.request_delay_ms" => self.enrichment.request_delay_ms = parse_value(key, value)?,
            "enrichment.reuse_csv_countries" => self.enrichment.reuse_csv_countries = parse_value(key, value)?,
            "library.default_csv" => self.library.default_csv = optional_path(value),
            "logging.file" => self.logging.file = optional_path(value),
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown config key: {}. Valid keys: {}",
                    key,
                    CONFIG_KEYS.join(", ")
                ))
            }
        }
        self.validate()
    }
}

pub const CONFIG_KEYS: [&str; 7] = [
    "tmdb.base_url",
    "tmdb.image_base_url",
    "tmdb.timeout_seconds",
    "enrichment.request_delay_ms",
    "enrichment.reuse_csv_countries",
    "library.default_csv",
    "logging.file",
];

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> anyhow::Result<T> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid value for {}: {:?}", key, value))
}
