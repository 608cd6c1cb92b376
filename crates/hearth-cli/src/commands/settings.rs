use anyhow::Result;
use hearth_core::EngineSettings;
use hearth_ingest::Config;
use std::path::PathBuf;

/// Validate an engine settings file and summarise it.
pub fn validate(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let Some(path) = path.or_else(|| config.settings_path.clone()) else {
        println!("No settings file configured; the built-in weights are in use.");
        println!("\nRun 'hearth settings example' for a template.");
        return Ok(());
    };

    if !path.exists() {
        println!("Settings file not found: {}", path.display());
        return Ok(());
    }

    match EngineSettings::load(&path) {
        Ok(settings) => {
            println!("✓ Settings file is valid!");
            println!("\nSummary:");
            println!("  Metadata fields: {}", settings.metadata_weights.len());
            for (aspect, weight) in &settings.aspect_weights {
                println!("  {:<15}  weight {}", aspect.as_str(), weight);
            }
            println!("  top_k:           {}", settings.top_k);
            println!("  history_limit:   {}", settings.history_limit);
            println!("  max_entities:    {}", settings.max_entities);
        }
        Err(e) => {
            println!("✗ Settings file has errors:");
            println!("\n{}", e);
            println!("\nFix the errors and run 'hearth settings validate' again.");
        }
    }

    Ok(())
}

/// Show example settings.
pub fn show_example() -> Result<()> {
    print!("{}", EngineSettings::example());
    Ok(())
}
