//! Extractor configuration. Backend credentials are only handed to the HTTP client.

use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Search backend connection
    pub elastic: ElasticConfig,
    /// Query tuning
    pub query: QueryConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticConfig {
    /// Base URL, e.g. http://localhost:9200
    pub url: String,
    /// Index (or index pattern) holding the log events
    pub index: String,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Number of node buckets requested; `None` keeps the backend default
    pub node_terms_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            index: "swift-logs".to_string(),
            user: None,
            password: None,
            timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl ExtractorConfig {
    /// Load from JSON file if present; otherwise return default.
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)
            .map_err(|e| ExtractError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str::<ExtractorConfig>(&data)
            .map_err(|e| ExtractError::Config(format!("{}: {}", path.display(), e)))
    }
}
