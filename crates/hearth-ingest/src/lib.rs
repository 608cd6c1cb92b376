//! Ingest layer for hearth.
//!
//! Loads the application configuration and turns exported catalog snapshots
//! into raw property records for the recommendation engine.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod config;

pub use catalog::{Catalog, IngestReport, Ingested};
pub use config::Config;
