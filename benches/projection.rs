//! Projection benchmark: one hour of 30-second windows for a small cluster → feature tables.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use swift_log_features::features::{flatten_response, tables_from_response};

const NODES: usize = 8;
const WINDOWS: usize = 120;

fn stats(sum: f64) -> Value {
    json!({ "count": 10, "min": 0.0, "max": sum / 2.0, "avg": sum / 10.0, "sum": sum, "std_deviation": 1.5 })
}

fn make_window(i: usize) -> Value {
    let mut w = json!({
        "key_as_string": format!("2022-07-04T05:{:02}:{:02}.000Z", i / 2, (i % 2) * 30),
        "key": 1656910800000i64 + (i as i64) * 30_000,
        "doc_count": 160 + i,
        "stats-of-bytes-recvd": { "doc_count": 73, "bytes-recvd-stats": stats(949661.0) },
        "stats-of-bytes-sent": { "doc_count": 1, "bytes-sent-stats": stats(512.0) },
        "value-counts-of-programname": { "buckets": [
            { "key": "proxy-server", "doc_count": 79 },
            { "key": "account-server", "doc_count": 70 },
            { "key": "container-server", "doc_count": 10 },
            { "key": "object-server", "doc_count": 1 + i }
        ] },
        "value-counts-of-severity": { "buckets": [ { "key": "info", "doc_count": 160 + i } ] },
        "value-counts-of-request-method": { "doc_count": 77, "req-count": { "buckets": [
            { "key": "PUT", "doc_count": 73 },
            { "key": "GET", "doc_count": 4 }
        ] } },
        "sum-of-replication-fail": { "value": 0.0 },
        "sum-of-replication-success": { "value": 23.0 },
        "sum-of-total-replicator-time-minutes": { "value": 0.07 },
        "value-counts-of-status-int": { "buckets": [
            { "key": "201", "doc_count": 73 },
            { "key": "200", "doc_count": 80 },
            { "key": "404", "doc_count": 7 + i }
        ] }
    });
    for verb in ["put", "get", "options", "post", "delete"] {
        w[format!("stats-of-request-time-{}", verb)] = json!({ "doc_count": 10, "req-time": stats(0.27) });
    }
    w
}

fn make_response() -> Value {
    let buckets: Vec<Value> = (0..NODES)
        .map(|n| {
            json!({
                "key": format!("m1-r1z1s{:02}", n),
                "doc_count": WINDOWS * 160,
                "sliding_windows": { "buckets": (0..WINDOWS).map(make_window).collect::<Vec<_>>() }
            })
        })
        .collect();
    json!({ "aggregations": { "node": { "buckets": buckets } } })
}

fn bench_flatten(c: &mut Criterion) {
    let response = make_response();
    c.bench_function("flatten_8_nodes_120_windows", |b| {
        b.iter(|| black_box(flatten_response(black_box(&response))))
    });
}

fn bench_full_projection(c: &mut Criterion) {
    let response = make_response();
    c.bench_function("response_to_feature_tables", |b| {
        b.iter(|| black_box(tables_from_response(black_box(&response))))
    });
}

criterion_group!(benches, bench_flatten, bench_full_projection);
criterion_main!(benches);
