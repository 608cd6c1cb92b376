//! Core domain model for hearth.
//!
//! This crate defines the property model (raw records, aspect kinds,
//! composite embeddings), the engine settings, and the shared error type
//! used by the search and ingest crates.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod settings;

pub use error::{Error, Result};
pub use model::{
    AspectEmbedding, AspectKind, AspectMap, CompositeEmbedding, ListingStatus, Neighbour,
    PropertyId, RawProperty,
};
pub use settings::EngineSettings;
