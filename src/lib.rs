//! Swift log features: per-node sliding-window feature extraction from an Elasticsearch log store.
//!
//! Modular structure:
//! - [`query`]: Date range, scope and the declarative aggregation request
//! - [`backend`]: Search backend trait and blocking Elasticsearch client
//! - [`features`]: Response flattening, fixed-schema projection, extraction entry points
//! - [`config`]: JSON configuration with defaults
//! - [`logging`]: tracing setup and NDJSON row output

pub mod backend;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod query;

pub use backend::{ElasticClient, SearchBackend};
pub use config::ExtractorConfig;
pub use error::{ExtractError, Result};
pub use features::{FeatureExtractor, FeatureRow, FeatureTable};
pub use logging::StructuredLogger;
pub use query::{DateRange, LogScope};
