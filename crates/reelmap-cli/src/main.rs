use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{browse, clear, config, edit, export, import, search, status};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelmap")]
#[command(about = "reelmap - Map your Letterboxd watch history by production country")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    Name,
    Year,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a Letterboxd watched.csv export and look up every movie on TMDB
    #[command(long_about = "Parse a Letterboxd CSV export (Date, Name, Year, Letterboxd URI), look up each movie's production countries on TMDB and store the per-country library. Stored edits and manually added movies are applied on top. Press Ctrl-C to cancel; nothing is saved from a cancelled import.")]
    Import {
        /// Path to the CSV export
        #[arg(required_unless_present = "default", conflicts_with = "default")]
        file: Option<PathBuf>,

        /// Import the file configured as library.default_csv
        #[arg(long, action = ArgAction::SetTrue)]
        default: bool,

        /// Trust the Production Countries column of a previously exported file
        #[arg(long, action = ArgAction::SetTrue)]
        reuse_countries: bool,
    },
    /// List countries by number of movies watched
    Countries {
        /// Show only the top N countries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List the movies counted under one country
    Country {
        /// ISO 3166-1 alpha-2 code, e.g. JP
        code: String,

        /// Only titles containing this text
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value = "name", value_enum)]
        sort: SortArg,
    },
    /// List countries you have not watched a movie from yet
    Unexplored {
        /// Only countries whose name contains this text
        #[arg(long)]
        search: Option<String>,

        /// Group the list by continent
        #[arg(long, action = ArgAction::SetTrue)]
        by_continent: bool,
    },
    /// Move a movie to a different country
    #[command(long_about = "Record a correction of a movie's primary country. Movies are identified by title and year; the correction survives re-imports until the stored data is cleared.")]
    Edit {
        /// Title exactly as in the library
        name: String,
        year: u32,
        /// New country code
        country: String,
    },
    /// Add a movie that is missing from the import
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        year: u32,

        /// Production country code
        #[arg(long)]
        country: String,

        /// Watch date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<chrono::NaiveDate>,

        /// Letterboxd URI, derived from the title when omitted
        #[arg(long)]
        uri: Option<String>,

        /// TMDB id from `reelmap search`; fills in poster and URI
        #[arg(long)]
        tmdb_id: Option<u64>,
    },
    /// Search TMDB for a movie (to pick an id for `add --tmdb-id`)
    Search {
        query: String,

        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Export the library as CSV (re-importable) or as a full JSON backup
    Export {
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "json")]
        csv: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,

        /// Output file, defaults to a dated file in the exports directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Check stored data and show storage usage
    Status,
    /// Rebuild the country data from the stored movie list and edits
    Recover,
    /// Delete the library, edits and manually added movies
    Clear {
        /// Do not ask for confirmation
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Store the TMDB API key in the credentials file
    SetApiKey {
        /// API key (prompted for when omitted)
        key: Option<String>,
    },
    /// Set a configuration value, e.g. `enrichment.request_delay_ms 250`
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = commands::configured_log_file();
    logging::init_logging(cli.verbose, cli.quiet, log_file).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Import {
            file,
            default,
            reuse_countries,
        } => import::run_import(file, default, reuse_countries, &output).await,
        Commands::Countries { limit } => browse::run_countries(limit, &output),
        Commands::Country { code, search, sort } => browse::run_country(&code, search.as_deref(), sort, &output),
        Commands::Unexplored { search, by_continent } => browse::run_unexplored(search.as_deref(), by_continent, &output),
        Commands::Edit { name, year, country } => edit::run_edit(&name, year, &country, &output),
        Commands::Add {
            name,
            year,
            country,
            date,
            uri,
            tmdb_id,
        } => edit::run_add(name, year, country, date, uri, tmdb_id, &output).await,
        Commands::Search { query, limit } => search::run_search(&query, limit, &output).await,
        Commands::Export { csv, json, out } => export::run_export(csv, json, out, &output),
        Commands::Status => status::run_status(&output),
        Commands::Recover => status::run_recover(&output),
        Commands::Clear { yes } => clear::run_clear(yes, &output),
        Commands::Config { cmd } => config::run_config(cmd, &output),
    }
}
