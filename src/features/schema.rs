//! Closed output schema: every row carries exactly these columns, named by these rules.

/// HTTP verbs with their own request-time statistics and count column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Put,
    Get,
    Options,
    Post,
    Delete,
}

impl HttpVerb {
    pub const ALL: [HttpVerb; 5] = [
        HttpVerb::Put,
        HttpVerb::Get,
        HttpVerb::Options,
        HttpVerb::Post,
        HttpVerb::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Put => "PUT",
            HttpVerb::Get => "GET",
            HttpVerb::Options => "OPTIONS",
            HttpVerb::Post => "POST",
            HttpVerb::Delete => "DELETE",
        }
    }

    pub fn lowercase(&self) -> &'static str {
        match self {
            HttpVerb::Put => "put",
            HttpVerb::Get => "get",
            HttpVerb::Options => "options",
            HttpVerb::Post => "post",
            HttpVerb::Delete => "delete",
        }
    }

    /// Name of the filtered request-time aggregation and of its output namespace.
    pub fn request_time_agg(&self) -> String {
        format!("stats-of-request-time-{}", self.lowercase())
    }
}

/// The four core storage services that make up the main log.
pub const CORE_SERVICES: [&str; 4] = [
    "object-server",
    "container-server",
    "account-server",
    "proxy-server",
];

/// Services with a `<service>.count` column.
pub const SERVICES: [&str; 13] = [
    "container-server",
    "object-server",
    "proxy-server",
    "account-server",
    "container-auditor",
    "object-auditor",
    "container-replicator",
    "object-updater",
    "object-replicator",
    "container-sync",
    "account-auditor",
    "container-updater",
    "account-replicator",
];

pub fn service_index(name: &str) -> Option<usize> {
    SERVICES.iter().position(|s| *s == name)
}

/// Statistics kept from each extended-stats aggregation.
pub const STATS: [&str; 5] = ["sum", "avg", "min", "max", "std_deviation"];

/// Status classes derived from the status-code breakdown, indexed by hundreds digit minus two.
pub const STATUS_CLASSES: [&str; 4] = ["2XX", "3XX", "4XX", "5XX"];

/// Class slot for a status code, `None` for codes outside 200..=599.
pub fn status_class(code: u16) -> Option<usize> {
    match code {
        200..=599 => Some(usize::from(code / 100 - 2)),
        _ => None,
    }
}

pub const BYTES_RECVD: &str = "stats-of-bytes-recvd";
pub const BYTES_SENT: &str = "stats-of-bytes-sent";
pub const REPLICATION_SUCCESS: &str = "sum-of-replication-success";
pub const REPLICATION_FAIL: &str = "sum-of-replication-fail";
pub const REPLICATOR_TIME: &str = "sum-of-total-replicator-time-minutes";

pub fn stat_column(namespace: &str, stat: &str) -> String {
    format!("{}.{}", namespace, stat)
}

pub fn count_column(name: &str) -> String {
    format!("{}.count", name)
}

pub fn status_column(class: &str) -> String {
    format!("status-int-{}.count", class)
}

pub fn value_column(sum_agg: &str) -> String {
    format!("{}.value", sum_agg)
}

/// All output columns in their canonical order.
pub fn columns() -> Vec<String> {
    let mut cols = vec![
        "key_as_string".to_string(),
        "key".to_string(),
        "doc_count".to_string(),
        value_column(REPLICATION_SUCCESS),
        value_column(REPLICATION_FAIL),
        value_column(REPLICATOR_TIME),
    ];
    cols.extend(STATUS_CLASSES.iter().map(|c| status_column(c)));
    for namespace in [BYTES_RECVD, BYTES_SENT] {
        cols.extend(STATS.iter().map(|s| stat_column(namespace, s)));
    }
    for verb in HttpVerb::ALL {
        let namespace = verb.request_time_agg();
        cols.extend(STATS.iter().map(|s| stat_column(&namespace, s)));
    }
    cols.extend(SERVICES.iter().map(|s| count_column(s)));
    cols.extend(HttpVerb::ALL.iter().map(|v| count_column(v.as_str())));
    cols
}
