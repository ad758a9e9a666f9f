use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user correction of a movie's primary country.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserEdit {
    /// `"{name}-{year}"`, see [`crate::movie_id`]
    pub movie_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_country: Option<String>,
    pub new_country: String,
    pub timestamp: DateTime<Utc>,
}

impl UserEdit {
    pub fn new(movie_id: String, original_country: Option<String>, new_country: &str) -> Self {
        Self {
            movie_id,
            original_country,
            new_country: new_country.trim().to_uppercase(),
            timestamp: Utc::now(),
        }
    }
}
