use super::import_ui::ImportUI;
use super::AppContext;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use reelmap_core::{finish_import, EnrichmentError, EnrichmentOptions, EnrichmentPipeline};
use reelmap_sources::parse_watched_csv;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub async fn run_import(file: Option<PathBuf>, use_default: bool, reuse_countries: bool, output: &Output) -> Result<()> {
    tracing::debug!("Import command started");
    let ctx = AppContext::load()?;

    let path = if use_default {
        ctx.config
            .library
            .default_csv
            .clone()
            .ok_or_else(|| eyre!("No default CSV configured. Set one with `reelmap config set library.default_csv <path>`."))?
    } else {
        file.ok_or_else(|| eyre!("No CSV file given"))?
    };

    let movies = parse_watched_csv(&path).map_err(|e| {
        output.error(format!("{}", e));
        eyre!("Could not import {}. Fix the file and run the import again.", path.display())
    })?;
    output.info(format!("Parsed {} movies from {}", movies.len(), path.display()));

    let client = ctx.tmdb_client()?;
    let mut options = EnrichmentOptions::from(&ctx.config.enrichment);
    options.reuse_csv_countries |= reuse_countries;
    let pipeline = EnrichmentPipeline::new(Arc::new(client), options);

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut ui = ImportUI::new(movies.len(), output.is_quiet() || !output.is_human());
    let result = pipeline.run(&movies, &mut ui, &cancel).await;
    let enriched = match result {
        Ok(enriched) => {
            ui.finish("Done");
            enriched
        }
        Err(EnrichmentError::Cancelled { processed }) => {
            ui.abandon("Cancelled");
            output.warn(format!(
                "Import cancelled after {} of {} movies. Nothing was saved.",
                processed,
                movies.len()
            ));
            return Ok(());
        }
    };

    let stats = enriched.stats.clone();
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
    let library = finish_import(&ctx.store, enriched, file_name).map_err(|e| eyre!("Failed to save library: {}", e))?;

    output.success(format!(
        "Imported {} movies across {} countries",
        library.movies.len(),
        library.country_data.len()
    ));
    if stats.unmatched + stats.failed > 0 {
        output.warn(format!(
            "{} movies not found on TMDB and {} lookups failed; use `reelmap edit` to place them",
            stats.unmatched, stats.failed
        ));
    }
    output.json(&json!({
        "type": "import",
        "file": path.display().to_string(),
        "movies": library.movies.len(),
        "countries": library.country_data.len(),
        "stats": stats,
    }));
    Ok(())
}
