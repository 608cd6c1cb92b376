//! Engine settings: field and aspect weights, image caps, and result sizes.
//!
//! Settings are loaded from a TOML file. Any table or key left out falls back
//! to the built-in defaults, which match the weights the marketplace has been
//! running with.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use hearth_core::settings::EngineSettings;
//!
//! let settings = EngineSettings::load(Path::new("settings.toml")).unwrap();
//! assert!(settings.top_k > 0);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{AspectKind, STATUS_FIELD};

/// Max-image cap used for aspects missing from `max_images`.
pub const DEFAULT_MAX_IMAGES: i64 = 1;

/// Configuration of the similarity engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Metadata field name to weight. Key order fixes the metadata vector
    /// layout.
    pub metadata_weights: BTreeMap<String, f64>,

    /// Aspect to weight. Aspects left out contribute nothing to similarity.
    /// Weights need not sum to one.
    pub aspect_weights: BTreeMap<AspectKind, f64>,

    /// Number of vectors at which an aspect's confidence saturates.
    pub max_images: BTreeMap<AspectKind, i64>,

    /// Length of each property's neighbour list.
    pub top_k: usize,

    /// Length of a history-based recommendation list.
    pub history_limit: usize,

    /// Largest collection a full rebuild will accept.
    pub max_entities: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            metadata_weights: BTreeMap::from([
                ("bedrooms".to_string(), 1.0),
                ("bathrooms".to_string(), 1.0),
                ("price".to_string(), 1.5),
                ("interior_size_sqm".to_string(), 1.2),
                (STATUS_FIELD.to_string(), 3.0),
            ]),
            aspect_weights: BTreeMap::from([
                (AspectKind::Metadata, 0.4),
                (AspectKind::Interior, 0.3),
                (AspectKind::Exterior, 0.2),
                (AspectKind::Neighbourhood, 0.1),
            ]),
            max_images: BTreeMap::from([
                (AspectKind::Interior, 10),
                (AspectKind::Exterior, 5),
                (AspectKind::Neighbourhood, 1),
            ]),
            top_k: 10,
            history_limit: 10,
            max_entities: 5000,
        }
    }
}

impl EngineSettings {
    /// Load and validate settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting settings are invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        let settings = Self::from_toml(&content).map_err(|e| match e {
            Error::InvalidData(msg) => Error::InvalidData(format!(
                "failed to parse engine settings from {}: {msg}",
                path.display()
            )),
            other => other,
        })?;
        log::debug!("Loaded engine settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(content).map_err(|e| Error::InvalidData(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the settings for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(invalid("top_k must be greater than zero"));
        }
        if self.history_limit == 0 {
            return Err(invalid("history_limit must be greater than zero"));
        }
        if self.max_entities == 0 {
            return Err(invalid("max_entities must be greater than zero"));
        }
        if self.metadata_weights.is_empty() {
            return Err(invalid("metadata_weights must name at least one field"));
        }
        for (field, &weight) in &self.metadata_weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(&format!(
                    "metadata weight for {field:?} must be a finite, non-negative number (got {weight})"
                )));
            }
        }
        for (aspect, &weight) in &self.aspect_weights {
            if !weight.is_finite() {
                return Err(invalid(&format!(
                    "aspect weight for {aspect} must be finite (got {weight})"
                )));
            }
        }
        Ok(())
    }

    /// Weight of an aspect, zero when not configured.
    pub fn aspect_weight(&self, aspect: AspectKind) -> f64 {
        self.aspect_weights.get(&aspect).copied().unwrap_or(0.0)
    }

    /// Confidence saturation point for an aspect.
    pub fn max_images_for(&self, aspect: AspectKind) -> i64 {
        self.max_images
            .get(&aspect)
            .copied()
            .unwrap_or(DEFAULT_MAX_IMAGES)
    }

    /// Metadata field names in vector layout order.
    pub fn metadata_fields(&self) -> impl Iterator<Item = &str> {
        self.metadata_weights.keys().map(String::as_str)
    }

    /// Metadata weights in vector layout order.
    pub fn metadata_scale(&self) -> Vec<f64> {
        self.metadata_weights.values().copied().collect()
    }

    /// A commented settings file holding the defaults.
    pub fn example() -> &'static str {
        r#"# Hearth Engine Settings
#
# Keys left out fall back to the built-in defaults shown here.

# Length of each property's "similar properties" list
top_k = 10

# Length of a history-based recommendation list
history_limit = 10

# Largest number of properties a full rebuild will accept.
# A full rebuild compares every pair, so cost grows with the square of this.
max_entities = 5000

# Metadata fields and their weights.
# The field names fix the layout of the metadata vector; weights are applied
# when two properties are compared. `status` is encoded as for_rent = 0,
# for_sale = 1.
[metadata_weights]
bathrooms = 1.0
bedrooms = 1.0
interior_size_sqm = 1.2
price = 1.5
status = 3.0

# Weight of each aspect in the combined score. Need not sum to 1.
# Leave an aspect out to ignore it.
[aspect_weights]
metadata = 0.4
interior = 0.3
exterior = 0.2
neighbourhood = 0.1

# Number of vectors at which an aspect's confidence reaches 1.
# Aspects left out use 1.
[max_images]
interior = 10
exterior = 5
neighbourhood = 1
"#
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidConfiguration(message.to_string())
}
