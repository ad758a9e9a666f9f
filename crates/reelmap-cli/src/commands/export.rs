use super::AppContext;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use reelmap_core::{export_csv, export_json};
use serde_json::json;
use std::path::PathBuf;

pub fn run_export(csv: bool, json_backup: bool, out: Option<PathBuf>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let edits = ctx.store.load_edits();

    // CSV unless a JSON backup was asked for
    let (contents, extension) = if json_backup && !csv {
        let library = ctx.store.load_library();
        let custom_movies = ctx.store.load_custom_movies();
        let contents = export_json(library.as_ref(), &edits, &custom_movies)
            .map_err(|e| eyre!("Failed to serialize backup: {}", e))?;
        (contents, "json")
    } else {
        let library = ctx.require_library()?;
        let contents = export_csv(&library.movies, &edits).map_err(|e| eyre!("Failed to write CSV: {}", e))?;
        (contents, "csv")
    };

    let path = match out {
        Some(path) => path,
        None => {
            let dir = ctx.paths.exports_dir();
            std::fs::create_dir_all(&dir).map_err(|e| eyre!("Failed to create {}: {}", dir.display(), e))?;
            dir.join(format!(
                "reelmap-{}.{}",
                chrono::Utc::now().format("%Y-%m-%d"),
                extension
            ))
        }
    };
    std::fs::write(&path, contents).map_err(|e| eyre!("Failed to write {}: {}", path.display(), e))?;

    output.success(format!("Exported to {}", path.display()));
    output.json(&json!({
        "type": "export",
        "format": extension,
        "path": path.display().to_string(),
    }));
    Ok(())
}
