//! Per-node, per-window feature tables built from the aggregation response.

mod extractor;
mod flatten;
mod projector;
pub mod schema;

pub use extractor::{tables_from_response, FeatureExtractor};
pub use flatten::{flatten_response, FlatWindow, NodeWindows};
pub use projector::project;

use schema::{HttpVerb, STATS};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Extended statistics of one numeric field within a window. Absent values are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExtendedStats {
    pub sum: f64,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub std_deviation: f64,
}

impl ExtendedStats {
    /// Values in `schema::STATS` order.
    pub fn values(&self) -> [f64; 5] {
        [self.sum, self.avg, self.min, self.max, self.std_deviation]
    }
}

/// One value of a feature row.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(i64),
    Count(u64),
    Float(f64),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Text(_) => None,
            Cell::Int(v) => Some(*v as f64),
            Cell::Count(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
        }
    }
}

/// One 30-second window of one node, with every column of the closed schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    pub key_as_string: String,
    /// Window start, epoch milliseconds
    pub key: i64,
    pub doc_count: u64,
    pub replication_success: f64,
    pub replication_fail: f64,
    pub replicator_time_minutes: f64,
    /// 2XX, 3XX, 4XX, 5XX
    pub status_classes: [u64; 4],
    pub bytes_recvd: ExtendedStats,
    pub bytes_sent: ExtendedStats,
    /// Indexed like `HttpVerb::ALL`
    pub request_time: [ExtendedStats; 5],
    /// Indexed like `schema::SERVICES`
    pub service_counts: [u64; 13],
    /// Indexed like `HttpVerb::ALL`
    pub verb_counts: [u64; 5],
}

/// Position of `verb` in `HttpVerb::ALL`.
fn verb_slot(verb: HttpVerb) -> usize {
    match verb {
        HttpVerb::Put => 0,
        HttpVerb::Get => 1,
        HttpVerb::Options => 2,
        HttpVerb::Post => 3,
        HttpVerb::Delete => 4,
    }
}

impl FeatureRow {
    pub fn request_time(&self, verb: HttpVerb) -> &ExtendedStats {
        &self.request_time[verb_slot(verb)]
    }

    pub fn verb_count(&self, verb: HttpVerb) -> u64 {
        self.verb_counts[verb_slot(verb)]
    }

    pub fn service_count(&self, service: &str) -> Option<u64> {
        schema::service_index(service).map(|i| self.service_counts[i])
    }

    /// All columns with their values, in `schema::columns()` order.
    pub fn cells(&self) -> Vec<(String, Cell)> {
        let mut cells = vec![
            ("key_as_string".to_string(), Cell::Text(self.key_as_string.clone())),
            ("key".to_string(), Cell::Int(self.key)),
            ("doc_count".to_string(), Cell::Count(self.doc_count)),
            (
                schema::value_column(schema::REPLICATION_SUCCESS),
                Cell::Float(self.replication_success),
            ),
            (
                schema::value_column(schema::REPLICATION_FAIL),
                Cell::Float(self.replication_fail),
            ),
            (
                schema::value_column(schema::REPLICATOR_TIME),
                Cell::Float(self.replicator_time_minutes),
            ),
        ];
        for (class, count) in schema::STATUS_CLASSES.iter().zip(self.status_classes) {
            cells.push((schema::status_column(class), Cell::Count(count)));
        }
        let mut push_stats = |namespace: &str, stats: &ExtendedStats| {
            for (stat, value) in STATS.iter().zip(stats.values()) {
                cells.push((schema::stat_column(namespace, stat), Cell::Float(value)));
            }
        };
        push_stats(schema::BYTES_RECVD, &self.bytes_recvd);
        push_stats(schema::BYTES_SENT, &self.bytes_sent);
        for (verb, stats) in HttpVerb::ALL.iter().zip(&self.request_time) {
            push_stats(&verb.request_time_agg(), stats);
        }
        for (service, count) in schema::SERVICES.iter().zip(self.service_counts) {
            cells.push((schema::count_column(service), Cell::Count(count)));
        }
        for (verb, count) in HttpVerb::ALL.iter().zip(self.verb_counts) {
            cells.push((schema::count_column(verb.as_str()), Cell::Count(count)));
        }
        cells
    }

    /// Numeric column by its external name; `None` for unknown names and `key_as_string`.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.cells()
            .into_iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, cell)| cell.as_f64())
    }
}

impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let cells = self.cells();
        let mut map = serializer.serialize_map(Some(cells.len()))?;
        for (name, cell) in &cells {
            map.serialize_entry(name, cell)?;
        }
        map.end()
    }
}

/// Rows of one node in backend window order.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct FeatureTable {
    pub node: String,
    pub rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row whose window starts at `key_as_string`.
    pub fn window(&self, key_as_string: &str) -> Option<&FeatureRow> {
        self.rows.iter().find(|r| r.key_as_string == key_as_string)
    }
}
