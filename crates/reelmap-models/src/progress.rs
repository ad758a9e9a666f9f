use serde::{Deserialize, Serialize};

/// Label carried by the last progress report of a run.
pub const COMPLETE_LABEL: &str = "Complete";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingProgress {
    pub processed: usize,
    pub total: usize,
    pub current_movie: String,
}

impl ProcessingProgress {
    pub fn is_complete(&self) -> bool {
        self.processed == self.total && self.current_movie == COMPLETE_LABEL
    }
}
