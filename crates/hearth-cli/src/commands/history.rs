use anyhow::Result;
use hearth_ingest::Config;

use super::{load_engine, print_ranked};

/// Print recommendations for a viewing history, oldest view first.
pub fn run(config: &Config, viewed: &[String]) -> Result<()> {
    let (engine, _) = load_engine(config)?;

    let unknown: Vec<&str> = viewed
        .iter()
        .map(String::as_str)
        .filter(|id| !engine.contains(id))
        .collect();
    if !unknown.is_empty() {
        log::warn!("Ignoring unknown ids in history: {}", unknown.join(", "));
    }

    let recommendations = engine.recommend_from_history(viewed);

    println!("\nRecommended from {} viewed listings\n", viewed.len());
    if recommendations.is_empty() {
        println!("  Nothing to recommend yet.");
    } else {
        print_ranked(&recommendations);
    }

    Ok(())
}
