use serde::{Deserialize, Serialize};

use crate::model::aspect::{AspectKind, AspectMap};
use crate::model::ids::PropertyId;

/// One aspect of a composite embedding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AspectEmbedding {
    /// Pooled vector, absent when nothing contributed.
    pub vector: Option<Vec<f32>>,
    /// Evidence behind `vector`, in `[0, 1]`.
    pub confidence: f64,
}

impl AspectEmbedding {
    #[must_use]
    pub fn new(vector: Option<Vec<f32>>, confidence: f64) -> Self {
        Self { vector, confidence }
    }

    /// An aspect with no vector and zero confidence.
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.vector.is_some()
    }
}

/// An entity's full representation: vector-or-absent plus confidence for
/// every aspect.
///
/// The metadata aspect is always present. Its vector holds the raw field
/// values in settings layout order; field weights are applied when scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeEmbedding {
    pub aspects: AspectMap<AspectEmbedding>,
}

impl CompositeEmbedding {
    #[must_use]
    pub fn new(aspects: AspectMap<AspectEmbedding>) -> Self {
        Self { aspects }
    }

    #[must_use]
    pub fn aspect(&self, kind: AspectKind) -> &AspectEmbedding {
        &self.aspects[kind]
    }

    #[must_use]
    pub fn vector(&self, kind: AspectKind) -> Option<&[f32]> {
        self.aspects[kind].vector.as_deref()
    }

    #[must_use]
    pub fn confidence(&self, kind: AspectKind) -> f64 {
        self.aspects[kind].confidence
    }
}

/// One entry of a top-k list: a peer and its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbour {
    pub id: PropertyId,
    pub score: f64,
}

impl Neighbour {
    #[must_use]
    pub fn new(id: impl Into<PropertyId>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}
