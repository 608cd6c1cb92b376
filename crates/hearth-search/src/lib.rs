//! Similarity search and recommendations for hearth.
//!
//! Builds composite embeddings from raw properties, keeps an exact top-k
//! neighbour list for every property, and answers "similar to this one" and
//! "similar to what I viewed" queries.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod embedding;
pub mod engine;
pub mod history;
pub mod index;
pub mod ranking;
pub mod similarity;

pub use embedding::EmbeddingBuilder;
pub use engine::RecommendationEngine;
pub use history::HistoryAggregator;
pub use index::SimilarityIndex;
pub use similarity::SimilarityScorer;
