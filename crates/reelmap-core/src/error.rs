use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Enrichment cancelled after {processed} movies")]
    Cancelled { processed: usize },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored {key} cannot be read ({reason}); fix or clear it before saving")]
    Corrupted { key: &'static str, reason: String },

    #[error("Failed to serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Rejected input for a manually added movie or an edit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Movie name is required")]
    EmptyName,

    #[error("Year must be between {min} and {max} (got {year})")]
    YearOutOfRange { year: u32, min: u32, max: u32 },

    #[error("Country code must be two letters (got {0:?})")]
    InvalidCountryCode(String),
}

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("No library imported yet (run `reelmap import <file.csv>` first)")]
    NoLibrary,

    #[error("No movie named {name:?} from {year} in the library")]
    MovieNotFound { name: String, year: u32 },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
