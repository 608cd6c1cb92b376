pub mod config;
pub mod history;
pub mod recommend;
pub mod settings;
pub mod similarity;
pub mod stats;

use anyhow::{Context, Result};
use hearth_core::Neighbour;
use hearth_ingest::{Catalog, Config, IngestReport};
use hearth_search::RecommendationEngine;

/// Load the configured catalog into a fresh engine.
pub fn load_engine(config: &Config) -> Result<(RecommendationEngine, IngestReport)> {
    let settings = config.engine_settings()?;
    let catalog = Catalog::load(&config.catalog_path).with_context(|| {
        format!(
            "Failed to load catalog {}\n\nSet one with --catalog or HEARTH_CATALOG_PATH.",
            config.catalog_path.display()
        )
    })?;
    let ingested = catalog.into_raw_properties(&settings);

    let engine = RecommendationEngine::new(settings).context("Invalid engine settings")?;
    engine
        .load_all(&ingested.properties)
        .context("Failed to build the similarity index")?;

    Ok((engine, ingested.report))
}

/// Print a ranked list, one `rank. id  score` line per entry.
pub fn print_ranked(neighbours: &[Neighbour]) {
    for (rank, neighbour) in neighbours.iter().enumerate() {
        println!("  {:>2}. {:<40} {:.4}", rank + 1, neighbour.id.as_str(), neighbour.score);
    }
}
