//! Aggregation response → per-node windows. Absent sub-aggregations and null statistics flatten to
//! zero; a missing node or window bucket key is a structure error naming its JSON path.

use super::schema::{HttpVerb, BYTES_RECVD, BYTES_SENT};
use super::ExtendedStats;
use crate::error::{ExtractError, Result};
use crate::query::{NODE_AGG, WINDOW_AGG};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One window with its terms breakdowns widened into `key → doc_count` maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatWindow {
    pub key: i64,
    pub key_as_string: String,
    pub doc_count: u64,
    pub bytes_recvd: ExtendedStats,
    pub bytes_sent: ExtendedStats,
    /// Indexed like `HttpVerb::ALL`
    pub request_time: [ExtendedStats; 5],
    pub replication_fail: f64,
    pub replication_success: f64,
    pub replicator_time_minutes: f64,
    pub programname: BTreeMap<String, u64>,
    pub severity: BTreeMap<String, u64>,
    pub request_method: BTreeMap<String, u64>,
    pub status_int: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeWindows {
    pub node: String,
    pub windows: Vec<FlatWindow>,
}

#[derive(Deserialize)]
struct RawStats {
    sum: Option<f64>,
    avg: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
    std_deviation: Option<f64>,
}

impl From<&RawStats> for ExtendedStats {
    fn from(raw: &RawStats) -> Self {
        ExtendedStats {
            sum: raw.sum.unwrap_or(0.0),
            avg: raw.avg.unwrap_or(0.0),
            min: raw.min.unwrap_or(0.0),
            max: raw.max.unwrap_or(0.0),
            std_deviation: raw.std_deviation.unwrap_or(0.0),
        }
    }
}

/// Filter bucket wrapping one extended-stats aggregation.
#[derive(Deserialize)]
struct StatsFilter {
    #[serde(alias = "bytes-recvd-stats", alias = "bytes-sent-stats", alias = "req-time")]
    stats: Option<RawStats>,
}

#[derive(Deserialize)]
struct TermBucket {
    key: Value,
    doc_count: u64,
}

#[derive(Deserialize)]
struct Terms {
    #[serde(default)]
    buckets: Vec<TermBucket>,
}

#[derive(Deserialize)]
struct RequestMethodFilter {
    #[serde(rename = "req-count")]
    req_count: Option<Terms>,
}

#[derive(Deserialize)]
struct SumValue {
    value: Option<f64>,
}

#[derive(Deserialize)]
struct RawWindow {
    key: i64,
    key_as_string: String,
    doc_count: u64,
    #[serde(rename = "sum-of-replication-fail")]
    replication_fail: Option<SumValue>,
    #[serde(rename = "sum-of-replication-success")]
    replication_success: Option<SumValue>,
    #[serde(rename = "sum-of-total-replicator-time-minutes")]
    replicator_time: Option<SumValue>,
    #[serde(rename = "value-counts-of-programname")]
    programname: Option<Terms>,
    #[serde(rename = "value-counts-of-severity")]
    severity: Option<Terms>,
    #[serde(rename = "value-counts-of-request-method")]
    request_method: Option<RequestMethodFilter>,
    #[serde(rename = "value-counts-of-status-int")]
    status_int: Option<Terms>,
    /// Byte and request-time filters, keyed by aggregation name
    #[serde(flatten)]
    filtered_stats: BTreeMap<String, Option<StatsFilter>>,
}

impl RawWindow {
    fn stats(&self, agg: &str) -> ExtendedStats {
        self.filtered_stats
            .get(agg)
            .and_then(Option::as_ref)
            .and_then(|f| f.stats.as_ref())
            .map(ExtendedStats::from)
            .unwrap_or_default()
    }
}

fn sum(value: &Option<SumValue>) -> f64 {
    value.as_ref().and_then(|v| v.value).unwrap_or(0.0)
}

fn term_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn widen(terms: Option<&Terms>) -> BTreeMap<String, u64> {
    terms
        .map(|t| {
            t.buckets
                .iter()
                .map(|b| (term_key(&b.key), b.doc_count))
                .collect()
        })
        .unwrap_or_default()
}

impl From<RawWindow> for FlatWindow {
    fn from(raw: RawWindow) -> Self {
        FlatWindow {
            key: raw.key,
            bytes_recvd: raw.stats(BYTES_RECVD),
            bytes_sent: raw.stats(BYTES_SENT),
            request_time: HttpVerb::ALL.map(|verb| raw.stats(&verb.request_time_agg())),
            replication_fail: sum(&raw.replication_fail),
            replication_success: sum(&raw.replication_success),
            replicator_time_minutes: sum(&raw.replicator_time),
            programname: widen(raw.programname.as_ref()),
            severity: widen(raw.severity.as_ref()),
            request_method: widen(
                raw.request_method
                    .as_ref()
                    .and_then(|f| f.req_count.as_ref()),
            ),
            status_int: widen(raw.status_int.as_ref()),
            key_as_string: raw.key_as_string,
            doc_count: raw.doc_count,
        }
    }
}

fn buckets<'a>(value: &'a Value, field: &str, path: &str) -> Result<&'a Vec<Value>> {
    value
        .get(field)
        .and_then(|agg| agg.get("buckets"))
        .and_then(Value::as_array)
        .ok_or_else(|| ExtractError::structure(format!("{}.{}.buckets", path, field), "missing buckets"))
}

fn flatten_window(bucket: &Value, path: &str) -> Result<FlatWindow> {
    RawWindow::deserialize(bucket)
        .map(FlatWindow::from)
        .map_err(|e| ExtractError::structure(path, e))
}

fn flatten_node(bucket: &Value, path: &str) -> Result<NodeWindows> {
    let node = bucket
        .get("key")
        .and_then(Value::as_str)
        .ok_or_else(|| ExtractError::structure(format!("{}.key", path), "missing node key"))?
        .to_string();
    let windows_path = format!("{}.{}.buckets", path, WINDOW_AGG);
    let windows = buckets(bucket, WINDOW_AGG, path)?
        .iter()
        .enumerate()
        .map(|(i, w)| flatten_window(w, &format!("{}[{}]", windows_path, i)))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(node = %node, windows = windows.len(), "flattened node");
    Ok(NodeWindows { node, windows })
}

/// Flatten a full search response into one entry per node bucket, in backend order.
pub fn flatten_response(response: &Value) -> Result<Vec<NodeWindows>> {
    let aggregations = response
        .get("aggregations")
        .ok_or_else(|| ExtractError::structure("aggregations", "missing aggregations"))?;
    let nodes_path = format!("aggregations.{}.buckets", NODE_AGG);
    buckets(aggregations, NODE_AGG, "aggregations")?
        .iter()
        .enumerate()
        .map(|(i, node)| flatten_node(node, &format!("{}[{}]", nodes_path, i)))
        .collect()
}
