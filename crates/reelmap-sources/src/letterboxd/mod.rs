pub mod parser;

pub use parser::{parse_watched_csv, parse_watched_reader, REQUIRED_COLUMNS};
