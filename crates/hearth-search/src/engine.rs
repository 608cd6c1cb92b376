//! The recommendation engine: settings, embedding builder, and the live
//! similarity index behind one read-write lock.
//!
//! [`RecommendationEngine::load_all`] is the correctness baseline: it rebuilds
//! everything from a full batch, outside the index lock, and swaps the result
//! in. [`upsert`](RecommendationEngine::upsert) and
//! [`remove`](RecommendationEngine::remove) update the live index in place
//! and leave it identical to what a full rebuild would give.
//!
//! Mutations are serialized by a separate writer lock that `load_all` holds
//! for the whole rebuild, so an update is never lost to a concurrent swap.
//! Queries only take the index read lock and keep running during a rebuild.

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};

use hearth_core::{
    CompositeEmbedding, EngineSettings, Neighbour, PropertyId, RawProperty, Result,
};

use crate::embedding::EmbeddingBuilder;
use crate::history::HistoryAggregator;
use crate::index::SimilarityIndex;

/// Facade over embedding construction and the similarity index.
///
/// Queries take the read lock and run concurrently. Mutations hold the
/// writer lock first, then take the write lock only to apply their change.
/// Share one instance between handlers with an `Arc`.
#[derive(Debug)]
pub struct RecommendationEngine {
    settings: EngineSettings,
    builder: EmbeddingBuilder,
    history: HistoryAggregator,
    writer: Mutex<()>,
    index: RwLock<SimilarityIndex>,
}

impl RecommendationEngine {
    /// Create an engine with an empty index.
    ///
    /// # Errors
    ///
    /// Returns [`hearth_core::Error::InvalidConfiguration`] when the settings
    /// do not validate.
    pub fn new(settings: EngineSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            builder: EmbeddingBuilder::new(&settings),
            history: HistoryAggregator::new(settings.history_limit),
            writer: Mutex::new(()),
            index: RwLock::new(SimilarityIndex::new(&settings)),
            settings,
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Replace the whole index with one built from `properties`.
    ///
    /// When an id appears more than once the last record wins. On error the
    /// current index is left untouched. Upserts and removals issued while the
    /// rebuild runs wait for it and are applied on top of the new index.
    pub fn load_all<'a, I>(&self, properties: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a RawProperty>,
    {
        let _writer = self.writer.lock();
        let mut embeddings: HashMap<PropertyId, CompositeEmbedding> = HashMap::new();
        for raw in properties {
            embeddings.insert(raw.id.clone(), self.builder.build(raw)?);
        }
        let count = embeddings.len();
        let rebuilt = SimilarityIndex::build_full(&self.settings, embeddings)?;

        *self.index.write() = rebuilt;
        log::info!("Loaded {} properties into the recommendation engine", count);
        Ok(())
    }

    /// Insert or replace one property.
    pub fn upsert(&self, raw: &RawProperty) -> Result<()> {
        let embedding = self.builder.build(raw)?;
        let _writer = self.writer.lock();
        self.index.write().add(raw.id.clone(), embedding);
        Ok(())
    }

    /// Remove one property.
    ///
    /// # Errors
    ///
    /// Returns [`hearth_core::Error::NotFound`] if `id` is not indexed.
    pub fn remove(&self, id: &str) -> Result<()> {
        let _writer = self.writer.lock();
        self.index.write().delete(id).map(|_| ())
    }

    /// Ranked peers of `id`, at most `top_k` of them.
    ///
    /// # Errors
    ///
    /// Returns [`hearth_core::Error::NotFound`] if `id` is not indexed.
    pub fn recommend(&self, id: &str) -> Result<Vec<Neighbour>> {
        self.index.read().neighbours(id).map(<[Neighbour]>::to_vec)
    }

    /// Ranked peers for a viewing history given oldest first (the last id is
    /// the most recent view).
    pub fn recommend_from_history<I: AsRef<str>>(&self, viewed: &[I]) -> Vec<Neighbour> {
        let index = self.index.read();
        self.history.aggregate(&*index, viewed)
    }

    /// Combined similarity of two indexed properties.
    pub fn similarity(&self, a: &str, b: &str) -> Result<f64> {
        self.index.read().pair_similarity(a, b)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.read().contains(id)
    }

    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    /// Snapshot of the indexed ids, ascending.
    pub fn ids(&self) -> Vec<PropertyId> {
        self.index.read().ids().into_iter().cloned().collect()
    }
}
