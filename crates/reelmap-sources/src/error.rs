use std::path::PathBuf;
use thiserror::Error;

/// Problems with the uploaded watch-history file. All of them abort the import.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Please select a CSV file (got {0})")]
    NotCsv(PathBuf),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV file is empty")]
    Empty,

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid year in row {row}: {value}")]
    InvalidYear { row: usize, value: String },

    #[error("No valid movies found in the CSV file")]
    NoMovies,
}

/// Failure talking to the metadata API for a single request.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("TMDB API key is not configured (run `reelmap config set-api-key` or set TMDB_API_KEY)")]
    MissingApiKey,

    #[error("TMDB request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TMDB API error: {status} on {endpoint} - {body}")]
    Status {
        status: u16,
        endpoint: String,
        body: String,
    },
}

impl MetadataError {
    /// Short category used in progress summaries
    pub fn category(&self) -> &'static str {
        match self {
            MetadataError::MissingApiKey => "missing_api_key",
            MetadataError::Http(e) if e.is_timeout() => "timeout",
            MetadataError::Http(_) => "network",
            MetadataError::Status { status: 429, .. } => "rate_limited",
            MetadataError::Status { status: 401, .. } => "unauthorized",
            MetadataError::Status { .. } => "api_error",
        }
    }
}
