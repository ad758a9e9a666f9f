pub mod country;
pub mod edit;
pub mod movie;
pub mod progress;

pub use country::{CountryAggregate, CountryMap, ProductionCountry};
pub use edit::UserEdit;
pub use movie::{movie_id, ProcessedMovie, WatchedMovie};
pub use progress::{ProcessingProgress, COMPLETE_LABEL};
