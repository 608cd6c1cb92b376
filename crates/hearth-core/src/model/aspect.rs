use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::error::Error;

/// A feature channel contributing independently weighted similarity.
///
/// Serialized as its canonical lowercase name so it can key TOML tables
/// (`[aspect_weights] interior = 0.3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AspectKind {
    /// Structured listing fields (bedrooms, price, status, ...).
    Metadata,
    /// Interior photographs.
    Interior,
    /// Exterior photographs.
    Exterior,
    /// Locality context for the listing's neighbourhood.
    Neighbourhood,
}

/// Canonical names, in declaration order.
const ASPECT_NAMES: &[(AspectKind, &str)] = &[
    (AspectKind::Metadata, "metadata"),
    (AspectKind::Interior, "interior"),
    (AspectKind::Exterior, "exterior"),
    (AspectKind::Neighbourhood, "neighbourhood"),
];

impl AspectKind {
    /// Number of aspect kinds.
    pub const COUNT: usize = 4;

    /// Every aspect, in layout order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Metadata,
        Self::Interior,
        Self::Exterior,
        Self::Neighbourhood,
    ];

    /// Aspects whose vector is pooled from externally computed embeddings.
    pub const IMAGE: [Self; 3] = [Self::Interior, Self::Exterior, Self::Neighbourhood];

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        ASPECT_NAMES[self.index()].1
    }

    const fn index(self) -> usize {
        match self {
            Self::Metadata => 0,
            Self::Interior => 1,
            Self::Exterior => 2,
            Self::Neighbourhood => 3,
        }
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectKind {
    type Err = Error;

    /// Parse a canonical name, ignoring ASCII case.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ASPECT_NAMES
            .iter()
            .find(|(_, canonical)| canonical.eq_ignore_ascii_case(name.trim()))
            .map(|&(kind, _)| kind)
            .ok_or_else(|| Error::InvalidInput(format!("unknown aspect: {name:?}")))
    }
}

impl TryFrom<String> for AspectKind {
    type Error = Error;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<AspectKind> for String {
    fn from(kind: AspectKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One value per [`AspectKind`], stored inline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AspectMap<T>([T; AspectKind::COUNT]);

impl<T> AspectMap<T> {
    /// Build a map by evaluating `f` for each aspect.
    pub fn from_fn(mut f: impl FnMut(AspectKind) -> T) -> Self {
        Self(AspectKind::ALL.map(&mut f))
    }

    /// Iterate `(aspect, value)` pairs in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (AspectKind, &T)> {
        AspectKind::ALL.into_iter().zip(self.0.iter())
    }

    /// Transform every value, keeping the aspect association.
    pub fn map<U>(self, mut f: impl FnMut(AspectKind, T) -> U) -> AspectMap<U> {
        let mut position = 0;
        AspectMap(self.0.map(|value| {
            let kind = AspectKind::ALL[position];
            position += 1;
            f(kind, value)
        }))
    }
}

impl<T> Index<AspectKind> for AspectMap<T> {
    type Output = T;

    fn index(&self, kind: AspectKind) -> &T {
        &self.0[kind.index()]
    }
}

impl<T> IndexMut<AspectKind> for AspectMap<T> {
    fn index_mut(&mut self, kind: AspectKind) -> &mut T {
        &mut self.0[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_names_round_trip() {
        for kind in AspectKind::ALL {
            assert_eq!(kind.as_str().parse::<AspectKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_aspect_parse_case_insensitive() {
        assert_eq!("Interior".parse::<AspectKind>().unwrap(), AspectKind::Interior);
        assert_eq!(" EXTERIOR ".parse::<AspectKind>().unwrap(), AspectKind::Exterior);
    }

    #[test]
    fn test_aspect_parse_unknown() {
        let err = "yard".parse::<AspectKind>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_image_aspects_exclude_metadata() {
        assert!(!AspectKind::IMAGE.contains(&AspectKind::Metadata));
        assert_eq!(AspectKind::IMAGE.len() + 1, AspectKind::COUNT);
    }

    #[test]
    fn test_aspect_map_indexing() {
        let mut map: AspectMap<u32> = AspectMap::default();
        map[AspectKind::Exterior] = 7;
        assert_eq!(map[AspectKind::Exterior], 7);
        assert_eq!(map[AspectKind::Interior], 0);
    }

    #[test]
    fn test_aspect_map_from_fn_and_map() {
        let names = AspectMap::from_fn(AspectKind::as_str);
        assert_eq!(names[AspectKind::Neighbourhood], "neighbourhood");

        let lengths = names.map(|_, name| name.len());
        assert_eq!(lengths[AspectKind::Metadata], 8);
        let order: Vec<AspectKind> = lengths.iter().map(|(k, _)| k).collect();
        assert_eq!(order, AspectKind::ALL.to_vec());
    }

    #[test]
    fn test_aspect_serializes_as_name() {
        let json = serde_json::to_string(&AspectKind::Interior).unwrap();
        assert_eq!(json, "\"interior\"");
        let parsed: AspectKind = serde_json::from_str("\"neighbourhood\"").unwrap();
        assert_eq!(parsed, AspectKind::Neighbourhood);
    }
}
