//! Flattening and projection on hand-written responses.

use serde_json::{json, Value};
use swift_log_features::{
    features::{
        flatten_response, project,
        schema::{self, HttpVerb},
        tables_from_response,
    },
    ExtractError,
};

fn response_with_window(window: Value) -> Value {
    json!({
        "aggregations": {
            "node": {
                "buckets": [
                    { "key": "m2-r1z2s07", "doc_count": 1, "sliding_windows": { "buckets": [window] } }
                ]
            }
        }
    })
}

fn window(extra: Value) -> Value {
    let mut w = json!({
        "key_as_string": "2022-07-04T05:11:00.000Z",
        "key": 1656911460000i64,
        "doc_count": 12
    });
    if let (Some(obj), Value::Object(extra)) = (w.as_object_mut(), extra) {
        obj.extend(extra);
    }
    w
}

#[test]
fn status_classes_ignore_other_breakdowns() {
    let response = response_with_window(window(json!({
        "value-counts-of-programname": { "buckets": [
            { "key": "2023-migrator", "doc_count": 5 },
            { "key": "proxy-server", "doc_count": 7 }
        ] },
        "value-counts-of-severity": { "buckets": [ { "key": "500", "doc_count": 12 } ] },
        "value-counts-of-status-int": { "buckets": [
            { "key": "200", "doc_count": 3 },
            { "key": "302", "doc_count": 1 },
            { "key": "499", "doc_count": 2 },
            { "key": "507", "doc_count": 1 }
        ] }
    })));
    let tables = tables_from_response(&response).unwrap();
    let row = &tables["m2-r1z2s07"].rows[0];
    assert_eq!(row.status_classes, [3, 1, 2, 1]);
    assert_eq!(row.get("proxy-server.count"), Some(7.0));
}

#[test]
fn residual_status_codes_count_in_no_class() {
    let response = response_with_window(window(json!({
        "value-counts-of-status-int": { "buckets": [
            { "key": "100", "doc_count": 4 },
            { "key": "200", "doc_count": 6 },
            { "key": "-", "doc_count": 2 }
        ] }
    })));
    let nodes = flatten_response(&response).unwrap();
    let flat = &nodes[0].windows[0];
    assert_eq!(flat.status_int.values().sum::<u64>(), 12);

    let row = project(flat);
    assert_eq!(row.status_classes, [6, 0, 0, 0]);
}

#[test]
fn numeric_term_keys_are_read_as_text() {
    let response = response_with_window(window(json!({
        "value-counts-of-status-int": { "buckets": [
            { "key": 201, "doc_count": 9 },
            { "key": 404, "doc_count": 3 }
        ] }
    })));
    let nodes = flatten_response(&response).unwrap();
    let flat = &nodes[0].windows[0];
    assert_eq!(flat.status_int.get("201"), Some(&9));
    assert_eq!(project(flat).status_classes, [9, 0, 3, 0]);
}

#[test]
fn unknown_services_and_verbs_are_dropped() {
    let response = response_with_window(window(json!({
        "value-counts-of-programname": { "buckets": [
            { "key": "object-expirer", "doc_count": 4 },
            { "key": "object-auditor", "doc_count": 8 }
        ] },
        "value-counts-of-request-method": {
            "doc_count": 6,
            "req-count": { "buckets": [
                { "key": "HEAD", "doc_count": 2 },
                { "key": "COPY", "doc_count": 1 },
                { "key": "POST", "doc_count": 3 }
            ] }
        }
    })));
    let tables = tables_from_response(&response).unwrap();
    let row = &tables["m2-r1z2s07"].rows[0];
    assert_eq!(row.service_counts.iter().sum::<u64>(), 8);
    assert_eq!(row.service_count("object-auditor"), Some(8));
    assert_eq!(row.service_count("object-expirer"), None);
    assert_eq!(row.verb_counts.iter().sum::<u64>(), 3);
    assert_eq!(row.get("POST.count"), Some(3.0));
    assert_eq!(row.get("HEAD.count"), None);
}

#[test]
fn flattened_window_keeps_severity_breakdown() {
    let response = response_with_window(window(json!({
        "value-counts-of-severity": { "buckets": [ { "key": "info", "doc_count": 12 } ] },
        "sum-of-replication-fail": { "value": null }
    })));
    let nodes = flatten_response(&response).unwrap();
    assert_eq!(nodes[0].node, "m2-r1z2s07");
    let flat = &nodes[0].windows[0];
    assert_eq!(flat.severity.get("info"), Some(&12));
    assert_eq!(flat.replication_fail, 0.0);
}

#[test]
fn row_serializes_in_schema_order() {
    let response = response_with_window(window(json!({})));
    let tables = tables_from_response(&response).unwrap();
    let line = serde_json::to_string(&tables["m2-r1z2s07"].rows[0]).unwrap();
    assert!(line.starts_with(r#"{"key_as_string":"2022-07-04T05:11:00.000Z","key":1656911460000,"doc_count":12,"#));

    let mut last = 0;
    for column in schema::columns() {
        let at = line.find(&format!("\"{}\":", column)).unwrap();
        assert!(at >= last, "{} out of order", column);
        last = at;
    }
}

#[test]
fn empty_node_list_gives_no_tables() {
    let response = json!({ "aggregations": { "node": { "buckets": [] } } });
    assert!(tables_from_response(&response).unwrap().is_empty());
}

fn structure_path(response: &Value) -> String {
    match flatten_response(response).unwrap_err() {
        ExtractError::Structure { path, .. } => path,
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn structure_errors_name_the_path() {
    assert_eq!(structure_path(&json!({ "hits": {} })), "aggregations");
    assert_eq!(
        structure_path(&json!({ "aggregations": {} })),
        "aggregations.node.buckets"
    );
    assert_eq!(
        structure_path(&json!({ "aggregations": { "node": { "buckets": [ { "doc_count": 3 } ] } } })),
        "aggregations.node.buckets[0].key"
    );
    assert_eq!(
        structure_path(&json!({ "aggregations": { "node": { "buckets": [ { "key": "n1" } ] } } })),
        "aggregations.node.buckets[0].sliding_windows.buckets"
    );
    assert_eq!(
        structure_path(&response_with_window(json!({ "key": "not-a-number" }))),
        "aggregations.node.buckets[0].sliding_windows.buckets[0]"
    );
}

#[test]
fn each_verb_reads_its_own_request_time_and_count() {
    let mut extra = serde_json::Map::new();
    let mut method_buckets = Vec::new();
    for (i, verb) in HttpVerb::ALL.iter().enumerate() {
        let avg = (i + 1) as f64 / 10.0;
        extra.insert(
            verb.request_time_agg(),
            json!({ "doc_count": i + 1, "req-time": { "count": i + 1, "sum": avg, "avg": avg, "min": avg, "max": avg, "std_deviation": 0.0 } }),
        );
        method_buckets.push(json!({ "key": verb.as_str(), "doc_count": i + 1 }));
    }
    extra.insert(
        "value-counts-of-request-method".to_string(),
        json!({ "doc_count": 15, "req-count": { "buckets": method_buckets } }),
    );
    let response = response_with_window(window(Value::Object(extra)));

    let tables = tables_from_response(&response).unwrap();
    let row = &tables["m2-r1z2s07"].rows[0];
    for (i, verb) in HttpVerb::ALL.into_iter().enumerate() {
        let expected = (i + 1) as f64 / 10.0;
        assert_eq!(row.request_time(verb).avg, expected, "{}", verb.as_str());
        assert_eq!(
            row.get(&format!("{}.avg", verb.request_time_agg())),
            Some(expected)
        );
        assert_eq!(row.verb_count(verb), (i + 1) as u64);
        assert_eq!(row.request_time[i], *row.request_time(verb));
    }
}
