//! Catalog snapshots: the `properties`, `property_images` and
//! `neighbourhoods` tables exported as one JSON document.
//!
//! ```json
//! {
//!   "properties": [
//!     { "id": "p1", "bedrooms": 3, "price": 450000, "status": "for_sale",
//!       "neighbourhood": "n1" }
//!   ],
//!   "property_images": [
//!     { "property_id": "p1", "aspect": "interior", "embedding": [0.1, 0.2] }
//!   ],
//!   "neighbourhoods": [ { "id": "n1", "embeddings": [0.3, 0.4] } ]
//! }
//! ```
//!
//! Ids may be strings or integers. Property rows carry their metadata fields
//! inline; only the fields named in the engine settings are read.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use hearth_core::model::STATUS_FIELD;
use hearth_core::{AspectKind, EngineSettings, Error, ListingStatus, RawProperty, Result};

/// A row key as exported: text or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowKey {
    Text(String),
    Number(i64),
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRow {
    pub id: RowKey,
    #[serde(default)]
    pub neighbourhood: Option<RowKey>,
    /// Every other column of the row.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRow {
    pub property_id: RowKey,
    pub aspect: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighbourhoodRow {
    pub id: RowKey,
    pub embeddings: Vec<f32>,
}

/// An exported catalog snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub properties: Vec<PropertyRow>,
    #[serde(default)]
    pub property_images: Vec<ImageRow>,
    #[serde(default)]
    pub neighbourhoods: Vec<NeighbourhoodRow>,
}

/// What happened to each input row during conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub property_rows: usize,
    pub loaded: usize,
    /// Rows whose status is neither `for_rent` nor `for_sale`.
    pub skipped_status: usize,
    pub image_rows: usize,
    /// Image rows naming a property that was not loaded.
    pub orphan_images: usize,
    pub unknown_aspects: usize,
    /// Rows whose neighbourhood id has no entry in the neighbourhood table.
    pub missing_neighbourhoods: usize,
    /// Field values that were neither numbers, numeric strings, nor empty.
    pub unreadable_fields: usize,
}

/// Raw properties ready for the engine, plus the conversion report.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub properties: Vec<RawProperty>,
    pub report: IngestReport,
}

impl Catalog {
    /// Load a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or
    /// [`Error::InvalidData`] if it is not a valid snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content).map_err(|e| match e {
            Error::InvalidData(msg) => Error::InvalidData(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        log::debug!(
            "Loaded catalog snapshot {} ({} properties, {} images, {} neighbourhoods)",
            path.display(),
            catalog.properties.len(),
            catalog.property_images.len(),
            catalog.neighbourhoods.len()
        );
        Ok(catalog)
    }

    /// Parse a snapshot from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the document does not parse.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::InvalidData(format!("invalid catalog snapshot: {e}")))
    }

    /// Convert the snapshot into raw properties for the engine.
    ///
    /// Rows that cannot be listed (status other than `for_rent` or
    /// `for_sale`) are dropped, as are images of dropped or unknown
    /// properties. Every drop is logged and counted in the report.
    pub fn into_raw_properties(self, settings: &EngineSettings) -> Ingested {
        let mut report = IngestReport {
            property_rows: self.properties.len(),
            image_rows: self.property_images.len(),
            ..IngestReport::default()
        };

        let neighbourhoods: HashMap<String, Vec<f32>> = self
            .neighbourhoods
            .into_iter()
            .map(|row| (row.id.to_string(), row.embeddings))
            .collect();

        let mut properties = Vec::with_capacity(self.properties.len());
        for row in self.properties {
            let Some(status) = listing_status(&row) else {
                log::warn!("Skipping property {}: not for rent or sale", row.id);
                report.skipped_status += 1;
                continue;
            };

            let mut raw = RawProperty::new(row.id.to_string());
            for field in settings.metadata_fields() {
                let value = if field == STATUS_FIELD {
                    Some(status.code())
                } else {
                    match field_value(row.fields.get(field)) {
                        Ok(value) => value,
                        Err(()) => {
                            log::warn!("Ignoring unreadable {} on property {}", field, row.id);
                            report.unreadable_fields += 1;
                            None
                        }
                    }
                };
                raw.metadata.insert(field.to_string(), value);
            }

            if let Some(key) = &row.neighbourhood {
                match neighbourhoods.get(&key.to_string()) {
                    Some(vector) => raw.aspect_vectors[AspectKind::Neighbourhood].push(vector.clone()),
                    None => {
                        log::debug!("Property {} has no vector for neighbourhood {}", row.id, key);
                        report.missing_neighbourhoods += 1;
                    }
                }
            }
            properties.push(raw);
        }

        let positions: HashMap<String, usize> = properties
            .iter()
            .enumerate()
            .map(|(i, raw)| (raw.id.to_string(), i))
            .collect();
        let mut unknown_names: HashSet<String> = HashSet::new();

        for image in self.property_images {
            let aspect = match image.aspect.parse::<AspectKind>() {
                Ok(aspect) if aspect != AspectKind::Metadata => aspect,
                _ => {
                    if unknown_names.insert(image.aspect.clone()) {
                        log::warn!("Ignoring images with unknown aspect '{}'", image.aspect);
                    }
                    report.unknown_aspects += 1;
                    continue;
                }
            };
            match positions.get(&image.property_id.to_string()) {
                Some(&i) => properties[i].aspect_vectors[aspect].push(image.embedding),
                None => report.orphan_images += 1,
            }
        }
        if report.orphan_images > 0 {
            log::warn!(
                "Ignored {} images of properties that were not loaded",
                report.orphan_images
            );
        }

        report.loaded = properties.len();
        log::info!(
            "Converted {} of {} catalog properties",
            report.loaded,
            report.property_rows
        );
        Ingested { properties, report }
    }
}

fn listing_status(row: &PropertyRow) -> Option<ListingStatus> {
    row.fields
        .get(STATUS_FIELD)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}

/// Numbers and numeric strings are values; null, empty, or absent is
/// missing. Anything else is unreadable.
fn field_value(value: Option<&Value>) -> std::result::Result<Option<f64>, ()> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or(()),
        Some(_) => Err(()),
    }
}
