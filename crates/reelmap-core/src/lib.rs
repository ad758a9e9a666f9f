pub mod browse;
pub mod countries;
pub mod custom;
pub mod enrichment;
pub mod error;
pub mod export;
pub mod library;
pub mod overrides;
pub mod resolver;
pub mod storage;

pub use browse::{filter_movies, rank_countries, CountryRank, MovieSort};
pub use countries::{country_name, group_by_continent, is_known_country, lookup as lookup_country, unexplored, Continent, CountryInfo, COUNTRIES};
pub use custom::{slug_uri, tmdb_uri, validate_country_code, CustomMovieInput};
pub use enrichment::{EnrichmentOptions, EnrichmentOutput, EnrichmentPipeline, EnrichmentStats, ProgressObserver};
pub use error::{EnrichmentError, LibraryError, StorageError, ValidationError};
pub use export::{export_csv, export_json};
pub use library::{add_custom_movie, edit_movie, finish_import, recover, RecoveryOutcome};
pub use overrides::{apply_edits, apply_edits_with_fallback, find_edit, rebuild_country_map, upsert_edit, Rebuilt};
pub use resolver::{normalize_country_code, normalize_country_list, order_with_primary, resolve_primary_country};
pub use storage::{LibraryStore, StorageInfo, StoreHealth, StoredLibrary};
