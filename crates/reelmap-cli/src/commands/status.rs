use super::AppContext;
use crate::output::{new_table, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use reelmap_core::{recover, RecoveryOutcome, StoreHealth};
use serde_json::json;

fn kib(bytes: u64) -> String {
    format!("{:.1} KiB", bytes as f64 / 1024.0)
}

pub fn run_status(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let health = ctx.store.health();
    let info = ctx.store.storage_info();
    let library = ctx.store.load_library();
    let edits = ctx.store.load_edits();
    let custom_movies = ctx.store.load_custom_movies();

    let (health_label, health_color) = match &health {
        StoreHealth::Empty => ("empty".to_string(), Color::Yellow),
        StoreHealth::Healthy => ("healthy".to_string(), Color::Green),
        StoreHealth::Corrupted { reason } => (format!("corrupted: {}", reason), Color::Red),
    };

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Library").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(ctx.store.store_dir().display().to_string()),
    ]);
    table.add_row(vec![Cell::new("Health"), Cell::new(&health_label).fg(health_color)]);
    if let Some(library) = &library {
        table.add_row(vec![
            Cell::new("Source file"),
            Cell::new(library.original_file_name.as_deref().unwrap_or("-")),
        ]);
        table.add_row(vec![Cell::new("Movies"), Cell::new(library.movies.len())]);
        table.add_row(vec![Cell::new("Countries"), Cell::new(library.country_data.len())]);
        table.add_row(vec![
            Cell::new("Last updated"),
            Cell::new(library.last_updated.format("%Y-%m-%d %H:%M UTC")),
        ]);
    }
    table.add_row(vec![Cell::new("Edits"), Cell::new(edits.len())]);
    table.add_row(vec![Cell::new("Added movies"), Cell::new(custom_movies.len())]);
    table.add_row(vec![
        Cell::new("Storage used"),
        Cell::new(format!(
            "{} (library {}, edits {}, added {})",
            kib(info.used()),
            kib(info.library_bytes),
            kib(info.edits_bytes),
            kib(info.custom_movies_bytes)
        )),
    ]);
    table.add_row(vec![Cell::new("Storage available"), Cell::new(kib(info.available()))]);
    output.table(&table);

    match &health {
        StoreHealth::Corrupted { .. } => {
            output.warn("Your data appears to be corrupted. Run `reelmap recover` to rebuild it or `reelmap clear` to start fresh.");
        }
        StoreHealth::Empty => output.info("Nothing imported yet. Run `reelmap import <watched.csv>`."),
        StoreHealth::Healthy => {}
    }

    output.json(&json!({
        "type": "status",
        "health": health_label,
        "movies": library.as_ref().map(|l| l.movies.len()),
        "countries": library.as_ref().map(|l| l.country_data.len()),
        "edits": edits.len(),
        "custom_movies": custom_movies.len(),
        "storage": {
            "used": info.used(),
            "available": info.available(),
            "library": info.library_bytes,
            "edits": info.edits_bytes,
            "custom_movies": info.custom_movies_bytes,
        },
    }));
    Ok(())
}

pub fn run_recover(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    match recover(&ctx.store).map_err(|e| eyre!("Recovery failed: {}", e))? {
        RecoveryOutcome::Recovered(library) => {
            output.success(format!(
                "Recovered {} movies across {} countries",
                library.movies.len(),
                library.country_data.len()
            ));
            output.json(&json!({
                "type": "recover",
                "recovered": true,
                "movies": library.movies.len(),
                "countries": library.country_data.len(),
            }));
        }
        RecoveryOutcome::Cleared => {
            output.warn("No recoverable data found. Stored data was cleared; import your CSV again.");
            output.json(&json!({ "type": "recover", "recovered": false }));
        }
    }
    Ok(())
}
