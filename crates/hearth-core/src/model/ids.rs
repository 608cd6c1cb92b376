use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque identifier for a property listing.
///
/// Ids come from the upstream record store and are never parsed; ordering is
/// plain string ordering, which is what ranking uses to break score ties.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(String);

impl PropertyId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PropertyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PropertyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PropertyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PropertyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_property_id_display() {
        let id = PropertyId::new("prop-42");
        assert_eq!(id.to_string(), "prop-42");
        assert_eq!(id.as_str(), "prop-42");
    }

    #[test]
    fn test_property_id_ordering_is_lexical() {
        let a = PropertyId::from("a");
        let b = PropertyId::from("b");
        assert!(a < b);
    }

    #[test]
    fn test_property_id_borrow_lookup() {
        let mut map = HashMap::new();
        map.insert(PropertyId::from("p1"), 1);
        assert_eq!(map.get("p1"), Some(&1));
    }

    #[test]
    fn test_property_id_serde_transparent() {
        let id = PropertyId::from("p1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"p1\"");
    }
}
