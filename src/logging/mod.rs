//! Structured logging setup and NDJSON output.

mod format;

pub use format::{RowRecord, StructuredLogger};
