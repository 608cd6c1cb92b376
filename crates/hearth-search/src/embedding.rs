//! Composite embedding construction.
//!
//! The metadata aspect is a fixed-layout vector of raw field values (one slot
//! per configured field, zero when missing). Its confidence is the share of
//! field weight that was actually populated. Every other aspect is the mean
//! of its contributing vectors, with a confidence that grows with the
//! logarithm of the vector count and saturates at the configured cap.

use std::collections::BTreeMap;

use hearth_core::{
    AspectEmbedding, AspectKind, AspectMap, CompositeEmbedding, EngineSettings, Error,
    RawProperty, Result,
};

/// Turns raw properties into [`CompositeEmbedding`]s.
#[derive(Debug, Clone)]
pub struct EmbeddingBuilder {
    metadata_weights: BTreeMap<String, f64>,
    max_images: AspectMap<i64>,
}

impl EmbeddingBuilder {
    #[must_use]
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            metadata_weights: settings.metadata_weights.clone(),
            max_images: AspectMap::from_fn(|aspect| settings.max_images_for(aspect)),
        }
    }

    /// Build the composite embedding for one property.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when a metadata value is not finite or
    /// does not fit an `f32`, or when an aspect mixes vectors of different
    /// lengths.
    pub fn build(&self, raw: &RawProperty) -> Result<CompositeEmbedding> {
        self.build_parts(&raw.metadata, &raw.aspect_vectors)
            .map_err(|e| match e {
                Error::InvalidInput(msg) => {
                    Error::InvalidInput(format!("property {}: {msg}", raw.id))
                }
                other => other,
            })
    }

    /// Build a composite embedding from metadata and grouped aspect vectors.
    pub fn build_parts(
        &self,
        metadata: &BTreeMap<String, Option<f64>>,
        grouped: &AspectMap<Vec<Vec<f32>>>,
    ) -> Result<CompositeEmbedding> {
        let mut aspects: AspectMap<AspectEmbedding> = AspectMap::default();

        aspects[AspectKind::Metadata] = AspectEmbedding::new(
            Some(metadata_vector(metadata, &self.metadata_weights)?),
            metadata_confidence(metadata, &self.metadata_weights),
        );

        for aspect in AspectKind::IMAGE {
            let vectors = &grouped[aspect];
            let pooled = mean_pool(vectors)
                .map_err(|msg| Error::InvalidInput(format!("{aspect} vectors: {msg}")))?;
            aspects[aspect] =
                AspectEmbedding::new(pooled, image_confidence(vectors.len(), self.max_images[aspect]));
        }

        Ok(CompositeEmbedding::new(aspects))
    }
}

/// Raw field values in weight-map key order, `0.0` for missing fields.
///
/// Weights are applied at scoring time, see [`crate::similarity::weighted_cosine`].
pub fn metadata_vector(
    metadata: &BTreeMap<String, Option<f64>>,
    weights: &BTreeMap<String, f64>,
) -> Result<Vec<f32>> {
    weights
        .keys()
        .map(|field| match metadata.get(field).copied().flatten() {
            None => Ok(0.0),
            Some(value) if value.is_finite() && value.abs() <= f64::from(f32::MAX) => {
                #[allow(clippy::cast_possible_truncation)]
                let narrowed = value as f32;
                Ok(narrowed)
            }
            Some(value) => Err(Error::InvalidInput(format!(
                "metadata field {field:?} is out of range ({value})"
            ))),
        })
        .collect()
}

/// Populated weight over total weight, `0.0` when the total is not positive.
pub fn metadata_confidence(
    metadata: &BTreeMap<String, Option<f64>>,
    weights: &BTreeMap<String, f64>,
) -> f64 {
    let total: f64 = weights.values().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let filled: f64 = weights
        .iter()
        .filter(|(field, _)| matches!(metadata.get(*field), Some(Some(_))))
        .map(|(_, weight)| weight)
        .sum();
    (filled / total).clamp(0.0, 1.0)
}

/// Element-wise mean of `vectors`; `None` for an empty list.
///
/// Fails when the vectors do not all share one length.
pub fn mean_pool(vectors: &[Vec<f32>]) -> std::result::Result<Option<Vec<f32>>, String> {
    let Some(first) = vectors.first() else {
        return Ok(None);
    };
    let dim = first.len();
    let mut sum = vec![0.0_f64; dim];

    for (i, vector) in vectors.iter().enumerate() {
        if vector.len() != dim {
            return Err(format!(
                "vector {i} has {} dimensions, expected {dim}",
                vector.len()
            ));
        }
        for (acc, &x) in sum.iter_mut().zip(vector) {
            *acc += f64::from(x);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let n = vectors.len() as f64;
    #[allow(clippy::cast_possible_truncation)]
    let mean = sum.into_iter().map(|acc| (acc / n) as f32).collect();
    Ok(Some(mean))
}

/// `ln(n+1) / ln(max+1)`, clamped to `[0, 1]`.
///
/// Zero when nothing contributed or the cap is not positive; one once `n`
/// reaches the cap.
pub fn image_confidence(n: usize, max_images: i64) -> f64 {
    if n == 0 || max_images <= 0 {
        return 0.0;
    }
    let n = i64::try_from(n).unwrap_or(i64::MAX);
    if n >= max_images {
        return 1.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = ((n + 1) as f64).ln() / ((max_images + 1) as f64).ln();
    ratio.clamp(0.0, 1.0)
}
