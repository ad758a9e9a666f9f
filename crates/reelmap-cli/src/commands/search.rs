use super::AppContext;
use crate::output::{new_table, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell};
use serde_json::json;

pub async fn run_search(query: &str, limit: usize, output: &Output) -> Result<()> {
    if query.trim().chars().count() < 2 {
        return Err(eyre!("Search for at least two characters"));
    }

    let ctx = AppContext::load()?;
    let client = ctx.tmdb_client()?;
    let results = client
        .search_movies(query.trim(), limit)
        .await
        .map_err(|e| eyre!("TMDB search failed: {}", e))?;

    if results.is_empty() {
        output.info(format!("No TMDB results for \"{}\"", query));
    }

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("TMDB id").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
    ]);
    for result in &results {
        table.add_row(vec![
            Cell::new(result.id),
            Cell::new(&result.title),
            Cell::new(
                result
                    .release_year()
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "Unknown year".to_string()),
            ),
        ]);
    }
    if !results.is_empty() {
        output.table(&table);
        output.info("Add one with `reelmap add --tmdb-id <id> --name <title> --year <year> --country <code>`");
    }

    output.json(&json!({
        "type": "search",
        "query": query,
        "results": results,
    }));
    Ok(())
}
