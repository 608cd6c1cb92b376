use anyhow::Result;
use hearth_ingest::Config;

use super::load_engine;

/// Print the combined similarity of two properties.
pub fn run(config: &Config, a: &str, b: &str) -> Result<()> {
    let (engine, _) = load_engine(config)?;

    match engine.similarity(a, b) {
        Ok(score) => println!("{:.6}", score),
        Err(e) if e.is_not_found() => anyhow::bail!("{}", e),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
