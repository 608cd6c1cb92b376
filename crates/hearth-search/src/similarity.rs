//! Confidence-weighted multi-aspect cosine similarity.
//!
//! For every aspect with a configured weight the score adds
//!
//! ```text
//! cosine(a, b) × aspect_weight × (confidence_a + confidence_b) / 2
//! ```
//!
//! An aspect that is absent on either side, or whose vectors are degenerate
//! (zero norm, mismatched length), contributes exactly zero. Nothing is
//! normalised across aspects; the weights carry the calibration.
//!
//! The metadata aspect is compared after scaling each slot by its field
//! weight, which gives the same cosine as storing pre-weighted vectors.

use hearth_core::{AspectKind, AspectMap, CompositeEmbedding, EngineSettings};

/// Cosine similarity, `0.0` for empty, mismatched, or zero-norm inputs.
pub fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    cosine_of(
        a.iter()
            .zip(b)
            .map(|(&x, &y)| (f64::from(x), f64::from(y))),
    )
}

/// Cosine similarity of `a ⊙ scale` and `b ⊙ scale`.
pub fn weighted_cosine(a: &[f32], b: &[f32], scale: &[f64]) -> f64 {
    if a.len() != b.len() || a.len() != scale.len() {
        return 0.0;
    }
    cosine_of(
        a.iter()
            .zip(b)
            .zip(scale)
            .map(|((&x, &y), &w)| (f64::from(x) * w, f64::from(y) * w)),
    )
}

fn cosine_of(pairs: impl Iterator<Item = (f64, f64)>) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in pairs {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let sim = dot / (norm_a * norm_b).sqrt();
    if sim.is_finite() {
        sim.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Scores pairs of composite embeddings under one set of weights.
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    aspect_weights: AspectMap<f64>,
    metadata_scale: Vec<f64>,
}

impl SimilarityScorer {
    #[must_use]
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            aspect_weights: AspectMap::from_fn(|aspect| settings.aspect_weight(aspect)),
            metadata_scale: settings.metadata_scale(),
        }
    }

    /// Combined similarity of two properties. Symmetric in its arguments.
    pub fn pair_similarity(&self, a: &CompositeEmbedding, b: &CompositeEmbedding) -> f64 {
        self.aspect_weights
            .iter()
            .filter(|(_, &weight)| weight != 0.0)
            .map(|(aspect, &weight)| {
                let confidence = (a.confidence(aspect) + b.confidence(aspect)) / 2.0;
                self.aspect_similarity(aspect, a, b) * weight * confidence
            })
            .sum()
    }

    /// Raw cosine for one aspect, before weighting.
    pub fn aspect_similarity(
        &self,
        aspect: AspectKind,
        a: &CompositeEmbedding,
        b: &CompositeEmbedding,
    ) -> f64 {
        match (a.vector(aspect), b.vector(aspect)) {
            (Some(va), Some(vb)) if aspect == AspectKind::Metadata => {
                weighted_cosine(va, vb, &self.metadata_scale)
            }
            (Some(va), Some(vb)) => cosine(va, vb),
            _ => 0.0,
        }
    }
}
