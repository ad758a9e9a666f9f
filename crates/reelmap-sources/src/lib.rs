pub mod error;
pub mod letterboxd;
pub mod progress;
pub mod tmdb;
pub mod traits;

pub use error::{IngestError, MetadataError};
pub use letterboxd::{parse_watched_csv, parse_watched_reader};
pub use progress::ProgressTracker;
pub use tmdb::TmdbClient;
pub use traits::{MetadataSource, MovieDetails, SearchResult};
