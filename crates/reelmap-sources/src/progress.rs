use std::collections::HashMap;
use tracing::{info, warn};

/// Progress tracker for the enrichment loop.
/// Logs periodic progress lines and a final summary to keep per-movie noise at debug level.
pub struct ProgressTracker {
    total: usize,
    matched: usize,
    unmatched: usize,
    failed: usize,
    reused: usize,
    start_time: std::time::Instant,
    progress_interval: usize, // Log every N items
    last_progress_log: usize,
    error_counts: HashMap<String, usize>,
}

impl ProgressTracker {
    /// `progress_interval`: log progress every N movies
    pub fn new(total: usize, progress_interval: usize) -> Self {
        if total > 10 || progress_interval < total {
            info!("Starting enrichment: {} movies to process", total);
        }
        Self {
            total,
            matched: 0,
            unmatched: 0,
            failed: 0,
            reused: 0,
            start_time: std::time::Instant::now(),
            progress_interval: progress_interval.max(1),
            last_progress_log: 0,
            error_counts: HashMap::new(),
        }
    }

    /// Movie found on the metadata source
    pub fn record_matched(&mut self) {
        self.matched += 1;
    }

    /// Search returned no candidates
    pub fn record_unmatched(&mut self) {
        self.unmatched += 1;
    }

    /// Countries taken from the imported file, no lookup made
    pub fn record_reused(&mut self) {
        self.reused += 1;
    }

    pub fn record_failed_with_error(&mut self, error_category: &str) {
        self.failed += 1;
        *self.error_counts.entry(error_category.to_string()).or_insert(0) += 1;
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn unmatched(&self) -> usize {
        self.unmatched
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn reused(&self) -> usize {
        self.reused
    }

    /// `current` is 1-based
    pub fn log_progress(&mut self, current: usize) {
        if current - self.last_progress_log >= self.progress_interval || current == self.total {
            let elapsed = self.start_time.elapsed();
            let rate = if elapsed.as_secs_f64() > 0.0 {
                current as f64 / elapsed.as_secs_f64()
            } else {
                0.0
            };

            info!(
                "Progress: {}/{} ({:.1} movies/sec) | Matched: {} | Unmatched: {} | Failed: {} | Reused: {}",
                current, self.total, rate,
                self.matched, self.unmatched, self.failed, self.reused
            );
            self.last_progress_log = current;
        }
    }

    pub fn log_summary(&self, operation_name: &str) {
        let elapsed = self.start_time.elapsed();
        if self.failed > 0 {
            warn!(
                "{} completed: {} total in {:.1}s | Matched: {} | Unmatched: {} | Failed: {} | Reused: {}",
                operation_name, self.total, elapsed.as_secs_f64(),
                self.matched, self.unmatched, self.failed, self.reused
            );

            let mut error_entries: Vec<_> = self.error_counts.iter().collect();
            error_entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            let error_summary: Vec<String> = error_entries
                .iter()
                .map(|(category, count)| format!("{}: {}", category, count))
                .collect();

            info!("Error breakdown: {}", error_summary.join(", "));
        } else {
            info!(
                "{} completed: {} total in {:.1}s | Matched: {} | Unmatched: {} | Reused: {}",
                operation_name, self.total, elapsed.as_secs_f64(),
                self.matched, self.unmatched, self.reused
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut tracker = ProgressTracker::new(4, 2);
        tracker.record_matched();
        tracker.record_unmatched();
        tracker.record_failed_with_error("network");
        tracker.record_failed_with_error("network");
        tracker.log_progress(4);
        tracker.log_summary("Enrichment");

        assert_eq!(tracker.matched(), 1);
        assert_eq!(tracker.unmatched(), 1);
        assert_eq!(tracker.failed(), 2);
        assert_eq!(tracker.reused(), 0);
        assert_eq!(tracker.error_counts.get("network"), Some(&2));
    }
}
