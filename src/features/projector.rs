//! Flattened window → fixed-schema feature row.

use super::flatten::FlatWindow;
use super::schema::{self, HttpVerb};
use super::FeatureRow;
use std::collections::BTreeMap;
use tracing::trace;

/// Sum status-code buckets into 2XX..5XX. Only the status-code breakdown takes part; codes
/// outside 200..=599 or keys that are not numbers fall into no class.
fn status_classes(status_int: &BTreeMap<String, u64>) -> [u64; 4] {
    let mut classes = [0u64; 4];
    for (key, count) in status_int {
        match key.trim().parse::<u16>().ok().and_then(schema::status_class) {
            Some(slot) => classes[slot] += count,
            None => trace!(status = %key, count, "status code outside known classes"),
        }
    }
    classes
}

fn service_counts(programname: &BTreeMap<String, u64>) -> [u64; 13] {
    let mut counts = [0u64; 13];
    for (service, count) in programname {
        match schema::service_index(service) {
            Some(i) => counts[i] = *count,
            None => trace!(service = %service, count, "service without a count column"),
        }
    }
    counts
}

fn verb_counts(request_method: &BTreeMap<String, u64>) -> [u64; 5] {
    let mut counts = [0u64; 5];
    for (i, verb) in HttpVerb::ALL.iter().enumerate() {
        counts[i] = request_method.get(verb.as_str()).copied().unwrap_or(0);
    }
    counts
}

/// Project one window onto the closed schema. Columns the window has no data for stay zero.
pub fn project(window: &FlatWindow) -> FeatureRow {
    FeatureRow {
        key_as_string: window.key_as_string.clone(),
        key: window.key,
        doc_count: window.doc_count,
        replication_success: window.replication_success,
        replication_fail: window.replication_fail,
        replicator_time_minutes: window.replicator_time_minutes,
        status_classes: status_classes(&window.status_int),
        bytes_recvd: window.bytes_recvd,
        bytes_sent: window.bytes_sent,
        request_time: window.request_time,
        service_counts: service_counts(&window.programname),
        verb_counts: verb_counts(&window.request_method),
    }
}
