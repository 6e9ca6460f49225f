//! Search query construction: date range and scope in, aggregation request body out.

mod builder;
mod dsl;

pub use builder::{
    build_search_request, fields, INTERNAL_USER_AGENT, NODE_AGG, STATUS_TERMS_SIZE, WINDOW_AGG,
    WINDOW_INTERVAL,
};
pub use dsl::{AggKind, Aggregation, BoolQuery, Query, SearchRequest};

use crate::error::{ExtractError, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive timestamp bounds, passed to the backend untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Range of the last `minutes` minutes ending at `end`, formatted as RFC 3339 with
    /// milliseconds. Non-positive or out-of-range spans are rejected.
    pub fn ending_at(end: DateTime<Utc>, minutes: i64) -> Result<Self> {
        if minutes <= 0 {
            return Err(ExtractError::Config(format!(
                "range length must be positive, got {} minutes",
                minutes
            )));
        }
        let start = Duration::try_minutes(minutes)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| {
                ExtractError::Config(format!("range of {} minutes is out of bounds", minutes))
            })?;
        Ok(Self::new(
            start.to_rfc3339_opts(SecondsFormat::Millis, true),
            end.to_rfc3339_opts(SecondsFormat::Millis, true),
        ))
    }
}

/// Which services' events take part in the extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogScope {
    /// object/container/account/proxy server only
    MainLog,
    /// no service filter
    AllLog,
}

impl LogScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogScope::MainLog => "main",
            LogScope::AllLog => "all",
        }
    }
}
