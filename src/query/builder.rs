//! Builds the per-node, per-window aggregation request for one date range and scope.

use super::dsl::{Aggregation, BoolQuery, Query, SearchRequest};
use super::{DateRange, LogScope};
use crate::config::QueryConfig;
use crate::features::schema::{
    HttpVerb, BYTES_RECVD, BYTES_SENT, CORE_SERVICES, REPLICATION_FAIL, REPLICATION_SUCCESS,
    REPLICATOR_TIME, SERVICES,
};

/// Log event field names as indexed by the log shipper.
pub mod fields {
    pub const TIMESTAMP: &str = "@timestamp";
    pub const HOST: &str = "sysloghost.keyword";
    pub const PROGRAMNAME: &str = "programname";
    pub const PROGRAMNAME_KEYWORD: &str = "programname.keyword";
    pub const SEVERITY: &str = "severity";
    pub const SEVERITY_KEYWORD: &str = "severity.keyword";
    pub const REQUEST_METHOD: &str = "request_method";
    pub const REQUEST_METHOD_KEYWORD: &str = "request_method.keyword";
    pub const STATUS_INT_KEYWORD: &str = "status_int.keyword";
    pub const USER_AGENT: &str = "user_agent";
    pub const BYTES_RECVD: &str = "bytes_recvd";
    pub const BYTES_SENT: &str = "bytes_sent";
    pub const REQUEST_TIME: &str = "request_time";
    pub const REPLICATION_FAIL: &str = "ReplicationFail";
    pub const REPLICATION_SUCCESS: &str = "ReplicationSuccess";
    pub const REPLICATOR_TIME: &str = "TotalReplicatorTimeMinutes";
}

pub const NODE_AGG: &str = "node";
pub const WINDOW_AGG: &str = "sliding_windows";
pub const WINDOW_INTERVAL: &str = "30s";
/// User agent of Swift's internal client; its requests are not user traffic.
pub const INTERNAL_USER_AGENT: &str = "Swift";

/// Distinct status codes requested per window; well above the codes a proxy emits.
pub const STATUS_TERMS_SIZE: u32 = 100;

const SEVERITY: &str = "info";
const PROXY_SERVER: &str = "proxy-server";

pub fn build_search_request(
    range: &DateRange,
    scope: LogScope,
    config: &QueryConfig,
) -> SearchRequest {
    let mut filter = vec![
        Query::range(fields::TIMESTAMP, &range.start, &range.end),
        Query::matches(fields::SEVERITY, SEVERITY),
    ];
    if scope == LogScope::MainLog {
        filter.push(Query::Bool(BoolQuery {
            should: CORE_SERVICES
                .iter()
                .map(|s| Query::phrase(fields::PROGRAMNAME, s))
                .collect(),
            minimum_should_match: Some(1),
            ..Default::default()
        }));
    }

    let windows = Aggregation::date_histogram(WINDOW_AGG, fields::TIMESTAMP, WINDOW_INTERVAL)
        .with_all(window_metrics());
    let nodes = Aggregation::terms(NODE_AGG, fields::HOST, config.node_terms_size).with(windows);

    SearchRequest {
        query: Query::Bool(BoolQuery {
            filter,
            ..Default::default()
        }),
        aggs: vec![nodes],
    }
}

/// Proxy-server events for user traffic, optionally narrowed to one verb.
fn user_proxy_requests(verb: Option<HttpVerb>) -> Query {
    let mut filter = vec![Query::phrase(fields::PROGRAMNAME, PROXY_SERVER)];
    if let Some(verb) = verb {
        filter.push(Query::phrase(fields::REQUEST_METHOD, verb.as_str()));
    }
    Query::Bool(BoolQuery {
        filter,
        must_not: vec![Query::matches(fields::USER_AGENT, INTERNAL_USER_AGENT)],
        ..Default::default()
    })
}

fn verb_only(verb: HttpVerb) -> Query {
    Query::Bool(BoolQuery {
        filter: vec![Query::phrase(fields::REQUEST_METHOD, verb.as_str())],
        ..Default::default()
    })
}

fn window_metrics() -> Vec<Aggregation> {
    let mut metrics = vec![
        Aggregation::filter(BYTES_RECVD, verb_only(HttpVerb::Put))
            .with(Aggregation::extended_stats("bytes-recvd-stats", fields::BYTES_RECVD)),
        Aggregation::filter(BYTES_SENT, verb_only(HttpVerb::Get))
            .with(Aggregation::extended_stats("bytes-sent-stats", fields::BYTES_SENT)),
        Aggregation::terms("value-counts-of-programname", fields::PROGRAMNAME_KEYWORD, None)
            .only_keys(&SERVICES),
        Aggregation::terms("value-counts-of-severity", fields::SEVERITY_KEYWORD, None),
        Aggregation::filter("value-counts-of-request-method", user_proxy_requests(None))
            .with(Aggregation::terms("req-count", fields::REQUEST_METHOD_KEYWORD, None)),
        Aggregation::sum(REPLICATION_FAIL, fields::REPLICATION_FAIL),
        Aggregation::sum(REPLICATION_SUCCESS, fields::REPLICATION_SUCCESS),
        Aggregation::sum(REPLICATOR_TIME, fields::REPLICATOR_TIME),
        Aggregation::terms(
            "value-counts-of-status-int",
            fields::STATUS_INT_KEYWORD,
            Some(STATUS_TERMS_SIZE),
        ),
    ];
    metrics.extend(HttpVerb::ALL.into_iter().map(|verb| {
        Aggregation::filter(&verb.request_time_agg(), user_proxy_requests(Some(verb)))
            .with(Aggregation::extended_stats("req-time", fields::REQUEST_TIME))
    }));
    metrics
}
