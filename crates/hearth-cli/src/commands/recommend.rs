use anyhow::Result;
use hearth_ingest::Config;

use super::{load_engine, print_ranked};

/// Print the nearest peers of one property.
pub fn run(config: &Config, id: &str) -> Result<()> {
    let (engine, _) = load_engine(config)?;

    let recommendations = match engine.recommend(id) {
        Ok(recs) => recs,
        Err(e) if e.is_not_found() => anyhow::bail!("Property not found: {}", id),
        Err(e) => return Err(e.into()),
    };

    println!("\nListings similar to {}\n", id);
    if recommendations.is_empty() {
        println!("  No other listings to compare against.");
    } else {
        print_ranked(&recommendations);
    }

    Ok(())
}
