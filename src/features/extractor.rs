//! Extraction pipeline: build query → backend search → flatten → project, per node.

use super::flatten::flatten_response;
use super::projector::project;
use super::FeatureTable;
use crate::backend::SearchBackend;
use crate::config::QueryConfig;
use crate::error::Result;
use crate::query::{build_search_request, DateRange, LogScope};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Turn a raw search response into node → table. Fails as a whole on any malformed bucket.
pub fn tables_from_response(response: &Value) -> Result<BTreeMap<String, FeatureTable>> {
    let mut tables = BTreeMap::new();
    for node in flatten_response(response)? {
        let rows = node.windows.iter().map(project).collect();
        tables.insert(
            node.node.clone(),
            FeatureTable {
                node: node.node,
                rows,
            },
        );
    }
    Ok(tables)
}

/// Stateless extractor over a search backend; safe to share between callers if the backend is.
pub struct FeatureExtractor<B> {
    backend: B,
    query: QueryConfig,
}

impl<B: SearchBackend> FeatureExtractor<B> {
    pub fn new(backend: B, query: QueryConfig) -> Self {
        Self { backend, query }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Request body that `extract` would send for this range and scope.
    pub fn request_body(&self, range: &DateRange, scope: LogScope) -> Value {
        build_search_request(range, scope, &self.query).to_json()
    }

    pub fn extract(
        &self,
        range: &DateRange,
        scope: LogScope,
    ) -> Result<BTreeMap<String, FeatureTable>> {
        let body = self.request_body(range, scope);
        debug!(scope = scope.as_str(), start = %range.start, end = %range.end, "search request built");
        let response = self.backend.search(&body)?;
        let tables = tables_from_response(&response)?;
        info!(
            scope = scope.as_str(),
            nodes = tables.len(),
            rows = tables.values().map(FeatureTable::len).sum::<usize>(),
            "features extracted"
        );
        Ok(tables)
    }

    /// Features from the four core storage services only.
    pub fn extract_main_log_features(
        &self,
        range: &DateRange,
    ) -> Result<BTreeMap<String, FeatureTable>> {
        self.extract(range, LogScope::MainLog)
    }

    /// Features from every service's info-level events.
    pub fn extract_all_log_features(
        &self,
        range: &DateRange,
    ) -> Result<BTreeMap<String, FeatureTable>> {
        self.extract(range, LogScope::AllLog)
    }
}
