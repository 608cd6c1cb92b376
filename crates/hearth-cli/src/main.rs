use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use hearth_ingest::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "hearth", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog snapshot to load (default: ~/.local/share/hearth/catalog.json)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Engine settings file (default: built-in weights)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Show the listings most similar to one property
    ///
    /// Loads the catalog snapshot, builds the similarity index, and prints the
    /// property's nearest peers with their scores, best first. Scores combine
    /// metadata, interior, exterior and neighbourhood similarity, each scaled
    /// by its aspect weight and by how much evidence both properties carry
    /// for it.
    Recommend {
        /// Property id
        id: String,
    },
    /// Recommend listings from a viewing history
    ///
    /// Give the viewed ids in the order they were viewed: the LAST id is the
    /// most recent view and weighs the most. Properties already viewed are
    /// never recommended, and unknown ids are ignored.
    History {
        /// Viewed property ids, oldest first
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    /// Show the similarity score of two properties
    Similarity {
        /// First property id
        a: String,
        /// Second property id
        b: String,
    },
    /// Show catalog and index statistics
    Stats,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage engine settings (weights, image caps, list sizes)
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the current effective configuration
    Show,
    /// Show the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

#[derive(Debug, clap::Subcommand)]
enum SettingsAction {
    /// Check a settings file for errors
    Validate {
        /// Settings file (default: the configured settings path)
        path: Option<PathBuf>,
    },
    /// Print an example settings file
    Example,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_with_overrides(cli.catalog, cli.settings)?;
    twyg::setup(config.logging.clone())
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {e}"))?;

    match cli.command {
        Commands::Recommend { id } => commands::recommend::run(&config, &id)?,
        Commands::History { ids } => commands::history::run(&config, &ids)?,
        Commands::Similarity { a, b } => commands::similarity::run(&config, &a, &b)?,
        Commands::Stats => commands::stats::run(&config)?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
        Commands::Settings { action } => match action {
            SettingsAction::Validate { path } => commands::settings::validate(&config, path)?,
            SettingsAction::Example => commands::settings::show_example()?,
        },
    }

    Ok(())
}
