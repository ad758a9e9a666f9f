//! Enrichment of a parsed watch history with production countries.
//!
//! Movies are looked up one at a time with a fixed pause between lookups, so
//! at most one request to the metadata source is in flight. Lookup failures
//! for a single movie are logged and the movie is kept without a country.

use std::sync::Arc;
use std::time::Duration;

use reelmap_config::EnrichmentConfig;
use reelmap_models::{CountryMap, ProcessedMovie, ProcessingProgress, WatchedMovie, COMPLETE_LABEL};
use reelmap_sources::{MetadataError, MetadataSource, ProgressTracker};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::EnrichmentError;
use crate::resolver::{normalize_country_code, normalize_country_list, order_with_primary, resolve_primary_country};

const PROGRESS_LOG_INTERVAL: usize = 50;

/// Receives a progress report after every movie and once more at the end.
pub trait ProgressObserver: Send {
    fn on_progress(&mut self, progress: &ProcessingProgress);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&ProcessingProgress) + Send,
{
    fn on_progress(&mut self, progress: &ProcessingProgress) {
        self(progress)
    }
}

#[derive(Debug, Clone)]
pub struct EnrichmentOptions {
    /// Pause after each lookup
    pub request_delay: Duration,
    /// Take countries from the imported file when it already has them
    pub reuse_csv_countries: bool,
}

impl Default for EnrichmentOptions {
    fn default() -> Self {
        Self::from(&EnrichmentConfig::default())
    }
}

impl From<&EnrichmentConfig> for EnrichmentOptions {
    fn from(config: &EnrichmentConfig) -> Self {
        Self {
            request_delay: Duration::from_millis(config.request_delay_ms),
            reuse_csv_countries: config.reuse_csv_countries,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentStats {
    pub matched: usize,
    pub unmatched: usize,
    pub failed: usize,
    pub reused: usize,
}

#[derive(Debug, Clone, Default)]
pub struct EnrichmentOutput {
    pub countries: CountryMap,
    /// Every input movie, in input order, including the ones without a country
    pub movies: Vec<ProcessedMovie>,
    pub stats: EnrichmentStats,
}

enum Lookup {
    Matched(ProcessedMovie),
    NotFound,
}

pub struct EnrichmentPipeline {
    source: Arc<dyn MetadataSource>,
    options: EnrichmentOptions,
}

impl EnrichmentPipeline {
    pub fn new(source: Arc<dyn MetadataSource>, options: EnrichmentOptions) -> Self {
        Self { source, options }
    }

    pub async fn run(
        &self,
        movies: &[WatchedMovie],
        observer: &mut dyn ProgressObserver,
        cancel: &CancellationToken,
    ) -> Result<EnrichmentOutput, EnrichmentError> {
        let total = movies.len();
        let mut tracker = ProgressTracker::new(total, PROGRESS_LOG_INTERVAL);
        let mut output = EnrichmentOutput {
            movies: Vec::with_capacity(total),
            ..Default::default()
        };

        for (index, movie) in movies.iter().enumerate() {
            if cancel.is_cancelled() {
                info!("Enrichment cancelled after {} of {} movies", index, total);
                return Err(EnrichmentError::Cancelled { processed: index });
            }

            let (processed, looked_up) = match self.reused_countries(movie) {
                Some(processed) => {
                    tracker.record_reused();
                    (processed, false)
                }
                None => (self.enrich_movie(movie, &mut tracker).await, true),
            };

            if let Some(primary) = processed.primary_country() {
                output
                    .countries
                    .entry(primary.to_string())
                    .or_default()
                    .push(processed.clone());
            }
            output.movies.push(processed);

            observer.on_progress(&ProcessingProgress {
                processed: index + 1,
                total,
                current_movie: movie.name.clone(),
            });
            tracker.log_progress(index + 1);

            let more_to_go = index + 1 < total;
            if looked_up && more_to_go && !self.options.request_delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("Enrichment cancelled after {} of {} movies", index + 1, total);
                        return Err(EnrichmentError::Cancelled { processed: index + 1 });
                    }
                    _ = tokio::time::sleep(self.options.request_delay) => {}
                }
            }
        }

        observer.on_progress(&ProcessingProgress {
            processed: total,
            total,
            current_movie: COMPLETE_LABEL.to_string(),
        });
        tracker.log_summary("Enrichment");

        output.stats = EnrichmentStats {
            matched: tracker.matched(),
            unmatched: tracker.unmatched(),
            failed: tracker.failed(),
            reused: tracker.reused(),
        };
        Ok(output)
    }

    /// Countries carried by the imported row, when reuse is enabled and the row has any.
    fn reused_countries(&self, movie: &WatchedMovie) -> Option<ProcessedMovie> {
        if !self.options.reuse_csv_countries {
            return None;
        }
        let carried = movie.production_countries.as_ref().filter(|c| !c.is_empty())?;
        let normalized: Vec<String> = carried.iter().map(|c| normalize_country_code(c)).collect();
        let primary = normalized.first().cloned();
        debug!("Reusing countries for {} ({}): {:?}", movie.name, movie.year, normalized);
        Some(ProcessedMovie::with_countries(
            movie,
            order_with_primary(primary.as_deref(), &normalized),
        ))
    }

    async fn enrich_movie(&self, movie: &WatchedMovie, tracker: &mut ProgressTracker) -> ProcessedMovie {
        match self.lookup(movie).await {
            Ok(Lookup::Matched(processed)) => {
                tracker.record_matched();
                processed
            }
            Ok(Lookup::NotFound) => {
                debug!("No {} match for {} ({})", self.source.source_name(), movie.name, movie.year);
                tracker.record_unmatched();
                ProcessedMovie::unmatched(movie)
            }
            Err(e) => {
                warn!("Failed to enrich {} ({}): {}", movie.name, movie.year, e);
                tracker.record_failed_with_error(e.category());
                ProcessedMovie::unmatched(movie)
            }
        }
    }

    async fn lookup(&self, movie: &WatchedMovie) -> Result<Lookup, MetadataError> {
        let results = self.source.search_movie(&movie.name, Some(movie.year)).await?;
        let Some(best) = results.first() else {
            return Ok(Lookup::NotFound);
        };

        let details = self.source.movie_details(best.id).await?;
        let normalized = normalize_country_list(&details.production_countries);
        let primary = resolve_primary_country(&details.origin_country, &details.production_countries);
        debug!(
            "{} ({}) → tmdb {} primary {:?} from {:?}",
            movie.name, movie.year, details.id, primary, normalized
        );

        let mut processed = ProcessedMovie::with_countries(movie, order_with_primary(primary.as_deref(), &normalized));
        processed.tmdb_id = Some(details.id);
        processed.poster_path = details.poster_path.or_else(|| best.poster_path.clone());
        Ok(Lookup::Matched(processed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reelmap_models::ProductionCountry;
    use reelmap_sources::{MovieDetails, SearchResult};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory source keyed by title
    #[derive(Default)]
    struct ScriptedSource {
        details: HashMap<String, MovieDetails>,
        failing: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn with_movie(mut self, title: &str, id: u64, origin: &[&str], production: &[&str]) -> Self {
            self.details.insert(
                title.to_string(),
                MovieDetails {
                    id,
                    title: title.to_string(),
                    release_date: None,
                    poster_path: Some(format!("/{}.jpg", id)),
                    production_countries: production.iter().map(|c| ProductionCountry::new(*c, "")).collect(),
                    origin_country: origin.iter().map(|c| c.to_string()).collect(),
                },
            );
            self
        }

        fn failing_on(mut self, title: &str) -> Self {
            self.failing.push(title.to_string());
            self
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl MetadataSource for ScriptedSource {
        fn source_name(&self) -> &str {
            "scripted"
        }

        async fn search_movie(&self, title: &str, _year: Option<u32>) -> Result<Vec<SearchResult>, MetadataError> {
            self.calls.lock().unwrap().push(title.to_string());
            if self.failing.iter().any(|t| t == title) {
                return Err(MetadataError::Status {
                    status: 500,
                    endpoint: "/search/movie".to_string(),
                    body: "boom".to_string(),
                });
            }
            Ok(self
                .details
                .get(title)
                .map(|d| {
                    vec![SearchResult {
                        id: d.id,
                        title: d.title.clone(),
                        release_date: None,
                        overview: None,
                        poster_path: None,
                    }]
                })
                .unwrap_or_default())
        }

        async fn movie_details(&self, id: u64) -> Result<MovieDetails, MetadataError> {
            self.details
                .values()
                .find(|d| d.id == id)
                .cloned()
                .ok_or(MetadataError::Status {
                    status: 404,
                    endpoint: format!("/movie/{}", id),
                    body: String::new(),
                })
        }
    }

    fn no_delay() -> EnrichmentOptions {
        EnrichmentOptions {
            request_delay: Duration::ZERO,
            reuse_csv_countries: false,
        }
    }

    fn watched(name: &str, year: u32) -> WatchedMovie {
        WatchedMovie::new("2024-01-01", name, year, format!("https://boxd.it/{}", name.to_lowercase()))
    }

    fn pipeline(source: ScriptedSource, options: EnrichmentOptions) -> (EnrichmentPipeline, Arc<ScriptedSource>) {
        let source = Arc::new(source);
        (EnrichmentPipeline::new(source.clone(), options), source)
    }

    #[tokio::test]
    async fn test_movies_grouped_by_primary_country() {
        let source = ScriptedSource::default()
            .with_movie("Stalker", 1398, &[], &["SU", "DE"])
            .with_movie("Amelie", 194, &["FR"], &["DE", "FR"])
            .with_movie("Taste of Cherry", 30020, &[], &["FR", "IR"]);
        let (pipeline, _) = pipeline(source, no_delay());
        let movies = vec![watched("Stalker", 1979), watched("Amelie", 2001), watched("Taste of Cherry", 1997)];

        let output = pipeline.run(&movies, &mut |_: &ProcessingProgress| {}, &CancellationToken::new()).await.unwrap();

        assert_eq!(output.countries.keys().collect::<Vec<_>>(), vec!["FR", "IR", "RU"]);
        assert_eq!(output.movies[0].production_countries, vec!["RU", "DE"]);
        assert_eq!(output.movies[0].tmdb_id, Some(1398));
        assert_eq!(output.movies[0].poster_path.as_deref(), Some("/1398.jpg"));
        assert_eq!(output.movies[1].production_countries, vec!["FR", "DE"]);
        assert_eq!(output.movies[2].production_countries, vec!["IR", "FR"]);
        assert_eq!(output.stats.matched, 3);
        for aggregate in output.countries.values() {
            assert_eq!(aggregate.movie_count, aggregate.movies.len());
        }
    }

    #[tokio::test]
    async fn test_unmatched_and_failed_movies_are_kept() {
        let source = ScriptedSource::default()
            .with_movie("Stalker", 1398, &[], &["SU"])
            .failing_on("Broken");
        let (pipeline, _) = pipeline(source, no_delay());
        let movies = vec![watched("Nowhere", 2020), watched("Broken", 2001), watched("Stalker", 1979)];

        let output = pipeline.run(&movies, &mut |_: &ProcessingProgress| {}, &CancellationToken::new()).await.unwrap();

        assert_eq!(output.movies.len(), 3);
        assert!(output.movies[0].production_countries.is_empty());
        assert_eq!(output.movies[0].tmdb_id, None);
        assert!(output.movies[1].production_countries.is_empty());
        assert_eq!(output.countries.len(), 1);
        assert_eq!(output.countries["RU"].movie_count, 1);
        assert_eq!(
            output.stats,
            EnrichmentStats {
                matched: 1,
                unmatched: 1,
                failed: 1,
                reused: 0
            }
        );
    }

    #[tokio::test]
    async fn test_progress_reported_per_movie_then_complete() {
        let source = ScriptedSource::default().with_movie("Stalker", 1398, &[], &["RU"]);
        let (pipeline, _) = pipeline(source, no_delay());
        let movies = vec![watched("Stalker", 1979), watched("Nowhere", 2020)];

        let mut reports = Vec::new();
        let mut observer = |p: &ProcessingProgress| reports.push(p.clone());
        pipeline.run(&movies, &mut observer, &CancellationToken::new()).await.unwrap();

        let seen: Vec<_> = reports.iter().map(|p| (p.processed, p.total, p.current_movie.as_str())).collect();
        assert_eq!(seen, vec![(1, 2, "Stalker"), (2, 2, "Nowhere"), (2, 2, "Complete")]);
        assert!(reports.last().unwrap().is_complete());
    }

    #[tokio::test]
    async fn test_empty_input_reports_complete() {
        let (pipeline, _) = pipeline(ScriptedSource::default(), no_delay());
        let mut reports = Vec::new();
        let mut observer = |p: &ProcessingProgress| reports.push(p.clone());
        let output = pipeline.run(&[], &mut observer, &CancellationToken::new()).await.unwrap();

        assert!(output.countries.is_empty());
        assert_eq!(reports.len(), 1);
        assert!(reports[0].is_complete());
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let (pipeline, source) = pipeline(ScriptedSource::default(), no_delay());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = pipeline.run(&[watched("Stalker", 1979)], &mut |_: &ProcessingProgress| {}, &cancel).await;

        assert!(matches!(result, Err(EnrichmentError::Cancelled { processed: 0 })));
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_during_delay_stops_run() {
        let source = ScriptedSource::default().with_movie("Stalker", 1398, &[], &["RU"]);
        let options = EnrichmentOptions {
            request_delay: Duration::from_secs(60),
            reuse_csv_countries: false,
        };
        let (pipeline, source) = pipeline(source, options);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let mut observer = move |p: &ProcessingProgress| {
            if p.processed == 1 {
                trigger.cancel();
            }
        };

        let movies = vec![watched("Stalker", 1979), watched("Mirror", 1975)];
        let result = pipeline.run(&movies, &mut observer, &cancel).await;

        assert!(matches!(result, Err(EnrichmentError::Cancelled { processed: 1 })));
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_reuse_csv_countries_skips_lookup() {
        let options = EnrichmentOptions {
            request_delay: Duration::ZERO,
            reuse_csv_countries: true,
        };
        let (pipeline, source) = pipeline(ScriptedSource::default(), options);
        let mut exported = watched("Mirror", 1975);
        exported.production_countries = Some(vec!["su".to_string(), "SE".to_string()]);

        let output = pipeline
            .run(&[exported, watched("Nowhere", 2020)], &mut |_: &ProcessingProgress| {}, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(output.movies[0].production_countries, vec!["RU", "SE"]);
        assert_eq!(output.countries["RU"].movie_count, 1);
        assert_eq!(output.stats.reused, 1);
        assert_eq!(output.stats.unmatched, 1);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_carried_countries_ignored_without_reuse() {
        let source = ScriptedSource::default().with_movie("Mirror", 1411, &[], &["SU"]);
        let (pipeline, source) = pipeline(source, no_delay());
        let mut exported = watched("Mirror", 1975);
        exported.production_countries = Some(vec!["FR".to_string()]);

        let output = pipeline.run(&[exported], &mut |_: &ProcessingProgress| {}, &CancellationToken::new()).await.unwrap();

        assert_eq!(output.movies[0].production_countries, vec!["RU"]);
        assert_eq!(source.call_count(), 1);
    }
}
