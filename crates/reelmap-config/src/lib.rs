pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, CONFIG_KEYS, EnrichmentConfig, LibraryConfig, LoggingConfig, TmdbConfig};
pub use credentials::CredentialStore;
pub use paths::{PathManager, container_base_path};
