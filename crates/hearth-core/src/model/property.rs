use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::model::aspect::{AspectKind, AspectMap};
use crate::model::ids::PropertyId;

/// Metadata field carrying the encoded [`ListingStatus`].
pub const STATUS_FIELD: &str = "status";

/// Listing status of a property.
///
/// Only rentals and sales take part in recommendations; any other upstream
/// status is rejected when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    ForRent,
    ForSale,
}

impl ListingStatus {
    /// Numeric encoding used in the metadata vector.
    #[must_use]
    pub const fn code(self) -> f64 {
        match self {
            Self::ForRent => 0.0,
            Self::ForSale => 1.0,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ForRent => "for_rent",
            Self::ForSale => "for_sale",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "for_rent" => Ok(Self::ForRent),
            "for_sale" => Ok(Self::ForSale),
            other => Err(Error::InvalidInput(format!(
                "unmapped listing status: {other:?}"
            ))),
        }
    }
}

/// A property as handed to the engine: metadata plus grouped aspect vectors.
///
/// `metadata` holds `None` for fields the source left null or empty. The
/// `Metadata` slot of `aspect_vectors` is ignored; metadata is built from the
/// field map instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProperty {
    pub id: PropertyId,
    #[serde(default)]
    pub metadata: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub aspect_vectors: AspectMap<Vec<Vec<f32>>>,
}

impl RawProperty {
    #[must_use]
    pub fn new(id: impl Into<PropertyId>) -> Self {
        Self {
            id: id.into(),
            metadata: BTreeMap::new(),
            aspect_vectors: AspectMap::default(),
        }
    }

    /// Set a numeric metadata field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metadata.insert(name.into(), Some(value));
        self
    }

    /// Record a metadata field the source left empty.
    #[must_use]
    pub fn with_missing_field(mut self, name: impl Into<String>) -> Self {
        self.metadata.insert(name.into(), None);
        self
    }

    /// Set the encoded listing status.
    #[must_use]
    pub fn with_status(self, status: ListingStatus) -> Self {
        self.with_field(STATUS_FIELD, status.code())
    }

    /// Append one vector to an aspect.
    #[must_use]
    pub fn with_vector(mut self, aspect: AspectKind, vector: Vec<f32>) -> Self {
        self.aspect_vectors[aspect].push(vector);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ListingStatus::ForRent.code(), 0.0);
        assert_eq!(ListingStatus::ForSale.code(), 1.0);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("for_rent".parse::<ListingStatus>().unwrap(), ListingStatus::ForRent);
        assert_eq!("for_sale".parse::<ListingStatus>().unwrap(), ListingStatus::ForSale);
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        for value in ["sold", "", "FOR_SALE"] {
            let err = value.parse::<ListingStatus>().unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "{value:?}");
        }
    }

    #[test]
    fn test_raw_property_builder() {
        let raw = RawProperty::new("p1")
            .with_field("bedrooms", 3.0)
            .with_missing_field("price")
            .with_status(ListingStatus::ForSale)
            .with_vector(AspectKind::Interior, vec![1.0, 0.0])
            .with_vector(AspectKind::Interior, vec![0.0, 1.0]);

        assert_eq!(raw.id.as_str(), "p1");
        assert_eq!(raw.metadata.get("bedrooms"), Some(&Some(3.0)));
        assert_eq!(raw.metadata.get("price"), Some(&None));
        assert_eq!(raw.metadata.get(STATUS_FIELD), Some(&Some(1.0)));
        assert_eq!(raw.aspect_vectors[AspectKind::Interior].len(), 2);
        assert!(raw.aspect_vectors[AspectKind::Exterior].is_empty());
    }
}
