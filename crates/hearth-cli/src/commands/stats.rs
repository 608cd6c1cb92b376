use anyhow::Result;
use hearth_core::AspectKind;
use hearth_ingest::{Catalog, Config};

/// Show what the catalog holds and what the engine would index.
pub fn run(config: &Config) -> Result<()> {
    let settings = config.engine_settings()?;
    let ingested = Catalog::load(&config.catalog_path)?.into_raw_properties(&settings);
    let report = &ingested.report;

    println!("\n🏠 Hearth Catalog\n");
    println!("  Catalog: {}", config.catalog_path.display());
    println!("  Property rows:          {}", report.property_rows);
    println!("  Loaded:                 {}", report.loaded);
    println!("  Skipped (status):       {}", report.skipped_status);
    println!("  Image rows:             {}", report.image_rows);
    println!("  Orphan images:          {}", report.orphan_images);
    println!("  Unknown aspects:        {}", report.unknown_aspects);
    println!("  Missing neighbourhoods: {}", report.missing_neighbourhoods);
    println!("  Unreadable fields:      {}", report.unreadable_fields);

    println!("\nAspect coverage:");
    for aspect in AspectKind::IMAGE {
        let covered = ingested
            .properties
            .iter()
            .filter(|p| !p.aspect_vectors[aspect].is_empty())
            .count();
        println!(
            "  {:<14} {:>6} of {}  (weight {}, saturates at {} images)",
            aspect.as_str(),
            covered,
            report.loaded,
            settings.aspect_weight(aspect),
            settings.max_images_for(aspect)
        );
    }

    println!("\nIndex:");
    println!("  top_k:         {}", settings.top_k);
    println!("  history_limit: {}", settings.history_limit);
    if report.loaded > settings.max_entities {
        println!(
            "  ✗ {} listings exceed max_entities ({}); raise it in the settings file",
            report.loaded, settings.max_entities
        );
    } else {
        println!("  max_entities:  {}", settings.max_entities);
    }

    Ok(())
}
