use super::prompts;
use crate::output::{new_table, Output};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use reelmap_config::{Config, CredentialStore, PathManager};
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output),
        ConfigCommands::SetApiKey { key } => set_api_key(key, output),
        ConfigCommands::Set { key, value } => set_value(&key, &value, output),
    }
}

fn load_credentials(path_manager: &PathManager) -> Result<CredentialStore> {
    let credentials_file = path_manager.credentials_file();
    let mut store = CredentialStore::new(credentials_file.clone());
    store
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    Ok(store)
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    let credentials = load_credentials(&path_manager)?;
    let api_key = credentials.resolve_tmdb_api_key().unwrap_or_default();
    let api_key_display = if full { api_key.clone() } else { mask_string(&api_key) };

    let display_path = |p: &Option<std::path::PathBuf>| p.as_ref().map(|p| p.display().to_string());

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Config File").add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{}{}",
            config_file.display(),
            if config_file.exists() { "" } else { " (defaults)" }
        )),
    ]);
    let section = |name: &str| Cell::new(name).fg(Color::Cyan).add_attribute(Attribute::Bold);
    table.add_row(vec![section("TMDB"), Cell::new("")]);
    table.add_row(vec![Cell::new("API key"), Cell::new(&api_key_display)]);
    table.add_row(vec![Cell::new("base_url"), Cell::new(&config.tmdb.base_url)]);
    table.add_row(vec![Cell::new("image_base_url"), Cell::new(&config.tmdb.image_base_url)]);
    table.add_row(vec![Cell::new("timeout_seconds"), Cell::new(config.tmdb.timeout_seconds)]);
    table.add_row(vec![section("Enrichment"), Cell::new("")]);
    table.add_row(vec![Cell::new("request_delay_ms"), Cell::new(config.enrichment.request_delay_ms)]);
    table.add_row(vec![
        Cell::new("reuse_csv_countries"),
        Cell::new(config.enrichment.reuse_csv_countries),
    ]);
    table.add_row(vec![section("Paths"), Cell::new("")]);
    table.add_row(vec![
        Cell::new("library.default_csv"),
        Cell::new(display_path(&config.library.default_csv).unwrap_or_else(|| "<not set>".to_string())),
    ]);
    table.add_row(vec![
        Cell::new("logging.file"),
        Cell::new(display_path(&config.logging.file).unwrap_or_else(|| "<stderr>".to_string())),
    ]);
    table.add_row(vec![
        Cell::new("data"),
        Cell::new(path_manager.data_dir().display().to_string()),
    ]);
    output.table(&table);

    output.json(&json!({
        "config_file": config_file.display().to_string(),
        "tmdb": {
            "api_key": api_key_display,
            "base_url": config.tmdb.base_url,
            "image_base_url": config.tmdb.image_base_url,
            "timeout_seconds": config.tmdb.timeout_seconds,
        },
        "enrichment": {
            "request_delay_ms": config.enrichment.request_delay_ms,
            "reuse_csv_countries": config.enrichment.reuse_csv_countries,
        },
        "library": { "default_csv": display_path(&config.library.default_csv) },
        "logging": { "file": display_path(&config.logging.file) },
        "data_dir": path_manager.data_dir().display().to_string(),
    }));
    Ok(())
}

fn set_api_key(key: Option<String>, output: &Output) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => prompts::prompt_password("TMDB API key (v3)")?,
    };
    let key = key.trim().to_string();
    validate_api_key(&key).map_err(|e| eyre!("{}", e))?;

    let path_manager = PathManager::default();
    let mut credentials = load_credentials(&path_manager)?;
    credentials.set_tmdb_api_key(key);
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;

    output.success(format!("TMDB API key saved to {}", path_manager.credentials_file().display()));
    Ok(())
}

fn set_value(key: &str, value: &str, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();
    let mut config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    config.set_value(key, value).map_err(|e| eyre!("{}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Set {} = {}", key, value.trim()));
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}

/// TMDB v3 keys are 32 hex characters
fn validate_api_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("API key cannot be empty".to_string());
    }
    if key.len() != 32 || !key.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("API key should be the 32-character v3 key from https://www.themoviedb.org/settings/api".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abcd"), "****");
        assert_eq!(mask_string("0123456789abcdef"), "01***ef");
    }

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key("0123456789abcdef0123456789ABCDEF").is_ok());
        assert!(validate_api_key("").is_err());
        assert!(validate_api_key("short").is_err());
        assert!(validate_api_key("0123456789abcdef0123456789abcdeg").is_err());
    }
}
