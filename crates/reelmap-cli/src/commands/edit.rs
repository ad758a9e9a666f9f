use super::AppContext;
use crate::output::Output;
use chrono::NaiveDate;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use reelmap_core::{add_custom_movie, country_name, edit_movie, is_known_country, CustomMovieInput};
use serde_json::json;

fn warn_unknown_country(code: &str, output: &Output) {
    if !is_known_country(code) {
        output.warn(format!("{} is not a known country code; it is stored as given", code.trim().to_uppercase()));
    }
}

pub fn run_edit(name: &str, year: u32, country: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    warn_unknown_country(country, output);

    let library = edit_movie(&ctx.store, name, year, country).map_err(|e| eyre!("{}", e))?;
    let code = country.trim().to_uppercase();
    let count = library.country_data.get(&code).map(|a| a.movie_count).unwrap_or(0);

    output.success(format!(
        "Moved {} ({}) to {} ({}), now {} movies there",
        name,
        year,
        country_name(&code),
        code,
        count
    ));
    output.json(&json!({
        "type": "edit",
        "movie_id": reelmap_models::movie_id(name, year),
        "new_country": code,
        "country_movie_count": count,
    }));
    Ok(())
}

pub async fn run_add(
    name: String,
    year: u32,
    country: String,
    date: Option<NaiveDate>,
    uri: Option<String>,
    tmdb_id: Option<u64>,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::load()?;
    warn_unknown_country(&country, output);

    // A picked TMDB id brings its poster along
    let poster_path = match tmdb_id {
        Some(id) => {
            let client = ctx.tmdb_client()?;
            match reelmap_sources::MetadataSource::movie_details(&client, id).await {
                Ok(details) => details.poster_path,
                Err(e) => {
                    tracing::warn!("Could not fetch TMDB details for {}: {}", id, e);
                    None
                }
            }
        }
        None => None,
    };

    let input = CustomMovieInput {
        name,
        year,
        country,
        date,
        letterboxd_uri: uri,
        tmdb_id,
        poster_path,
    };
    let library = add_custom_movie(&ctx.store, input).map_err(|e| eyre!("{}", e))?;
    let added = library
        .movies
        .last()
        .ok_or_else(|| eyre!("Library is empty after adding a movie"))?;

    output.success(format!(
        "Added {} ({}) to {}",
        added.name,
        added.year,
        added.primary_country().map(country_name).unwrap_or("no country")
    ));
    output.json(&json!({
        "type": "add",
        "movie": added,
        "total_movies": library.movies.len(),
    }));
    Ok(())
}
