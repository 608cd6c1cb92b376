//! Exact top-k similarity index.
//!
//! Holds every property's composite embedding and, for each property, the
//! `top_k` most similar peers in rank order. The index is fully derived from
//! the embeddings and the settings: after any sequence of [`add`] and
//! [`delete`] calls it holds exactly what [`build_full`] would produce for
//! the same embeddings.
//!
//! A full build costs O(N²) pair evaluations plus O(N log k) heap work, which
//! is why `max_entities` caps it. Incremental updates cost O(N) scores per
//! insertion; a deletion purges the removed id from every list and rescores
//! only the lists it was pushed out of.
//!
//! [`add`]: SimilarityIndex::add
//! [`delete`]: SimilarityIndex::delete
//! [`build_full`]: SimilarityIndex::build_full

use std::collections::HashMap;

use rayon::prelude::*;

use hearth_core::{CompositeEmbedding, EngineSettings, Error, Neighbour, PropertyId, Result};

use crate::ranking::{rank_into, ranks_ahead, TopK};
use crate::similarity::SimilarityScorer;

/// In-memory similarity index over a working set of properties.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    scorer: SimilarityScorer,
    top_k: usize,
    max_entities: usize,
    embeddings: HashMap<PropertyId, CompositeEmbedding>,
    neighbours: HashMap<PropertyId, Vec<Neighbour>>,
}

impl SimilarityIndex {
    /// An empty index.
    #[must_use]
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            scorer: SimilarityScorer::new(settings),
            top_k: settings.top_k,
            max_entities: settings.max_entities,
            embeddings: HashMap::new(),
            neighbours: HashMap::new(),
        }
    }

    /// Build the index from a full batch of embeddings.
    ///
    /// Neighbour lists are computed in parallel; each worker only reads the
    /// embedding map and produces one property's list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] when the batch is larger than
    /// `max_entities`.
    pub fn build_full(
        settings: &EngineSettings,
        embeddings: HashMap<PropertyId, CompositeEmbedding>,
    ) -> Result<Self> {
        let mut index = Self::new(settings);
        if embeddings.len() > index.max_entities {
            return Err(Error::CapacityExceeded {
                limit: index.max_entities,
                requested: embeddings.len(),
            });
        }

        let scorer = &index.scorer;
        let top_k = index.top_k;
        let neighbours: HashMap<PropertyId, Vec<Neighbour>> = embeddings
            .par_iter()
            .map(|(id, embedding)| {
                let list = rank_candidates(scorer, top_k, id, embedding, &embeddings);
                (id.clone(), list)
            })
            .collect();

        log::info!(
            "Built similarity index over {} properties (top_k = {})",
            embeddings.len(),
            top_k
        );

        index.neighbours = neighbours;
        index.embeddings = embeddings;
        Ok(index)
    }

    /// Insert a property, or replace it when already indexed.
    ///
    /// The newcomer gets its own ranked list, and is merged into every
    /// existing list it ranks in.
    pub fn add(&mut self, id: PropertyId, embedding: CompositeEmbedding) {
        if self.remove_entry(id.as_str()).is_some() {
            log::debug!("Replacing indexed property {}", id);
        }

        let mut top = TopK::for_pool(self.top_k, self.embeddings.len());
        for (other_id, other) in &self.embeddings {
            let score = self.scorer.pair_similarity(&embedding, other);
            top.offer(other_id, score);
            if let Some(list) = self.neighbours.get_mut(other_id) {
                if admits(list, self.top_k, score, &id) {
                    rank_into(list, Neighbour::new(id.clone(), score), self.top_k);
                }
            }
        }

        log::debug!("Indexed property {} against {} peers", id, self.embeddings.len());
        self.neighbours.insert(id.clone(), top.into_sorted_vec());
        self.embeddings.insert(id, embedding);
    }

    /// Remove a property and every reference to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` is not indexed.
    pub fn delete(&mut self, id: &str) -> Result<CompositeEmbedding> {
        let removed = self
            .remove_entry(id)
            .ok_or_else(|| Error::property_not_found(id))?;
        log::debug!("Removed property {} from the index", id);
        Ok(removed)
    }

    /// Ranked neighbours of `id`, best first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` is not indexed.
    pub fn neighbours(&self, id: &str) -> Result<&[Neighbour]> {
        self.neighbours
            .get(id)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::property_not_found(id))
    }

    /// Combined similarity of two indexed properties.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if either id is not indexed.
    pub fn pair_similarity(&self, a: &str, b: &str) -> Result<f64> {
        let ea = self.embedding(a).ok_or_else(|| Error::property_not_found(a))?;
        let eb = self.embedding(b).ok_or_else(|| Error::property_not_found(b))?;
        Ok(self.scorer.pair_similarity(ea, eb))
    }

    pub fn embedding(&self, id: &str) -> Option<&CompositeEmbedding> {
        self.embeddings.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.embeddings.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Indexed ids in ascending order.
    pub fn ids(&self) -> Vec<&PropertyId> {
        let mut ids: Vec<&PropertyId> = self.embeddings.keys().collect();
        ids.sort();
        ids
    }

    /// Drop `id` and purge it from every other list, refilling lists that
    /// were full so they still hold the best `top_k` remaining peers.
    fn remove_entry(&mut self, id: &str) -> Option<CompositeEmbedding> {
        let removed = self.embeddings.remove(id)?;
        self.neighbours.remove(id);

        let mut refill: Vec<PropertyId> = Vec::new();
        for (owner, list) in &mut self.neighbours {
            let before = list.len();
            list.retain(|n| n.id.as_str() != id);
            // A list shorter than top_k already held every peer.
            if list.len() != before && before == self.top_k {
                refill.push(owner.clone());
            }
        }

        for owner in refill {
            if let Some(embedding) = self.embeddings.get(&owner) {
                let list =
                    rank_candidates(&self.scorer, self.top_k, &owner, embedding, &self.embeddings);
                self.neighbours.insert(owner, list);
            }
        }

        Some(removed)
    }
}

/// Rank every entry of `pool` except `id` itself against `embedding`.
fn rank_candidates(
    scorer: &SimilarityScorer,
    top_k: usize,
    id: &PropertyId,
    embedding: &CompositeEmbedding,
    pool: &HashMap<PropertyId, CompositeEmbedding>,
) -> Vec<Neighbour> {
    let mut top = TopK::for_pool(top_k, pool.len());
    for (other_id, other) in pool {
        if other_id == id {
            continue;
        }
        top.offer(other_id, scorer.pair_similarity(embedding, other));
    }
    top.into_sorted_vec()
}

/// Whether a candidate would survive [`rank_into`] on `list`.
fn admits(list: &[Neighbour], top_k: usize, score: f64, id: &PropertyId) -> bool {
    list.len() < top_k || list.last().is_some_and(|worst| ranks_ahead(score, id, worst))
}
