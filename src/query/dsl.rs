//! Declarative query and aggregation tree, rendered to the backend's JSON DSL in one walk.

use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Bool(BoolQuery),
    Match { field: String, value: String },
    MatchPhrase { field: String, value: String },
    /// Inclusive on both ends
    Range { field: String, gte: String, lte: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub filter: Vec<Query>,
    pub should: Vec<Query>,
    pub must_not: Vec<Query>,
    pub minimum_should_match: Option<u32>,
}

impl Query {
    pub fn matches(field: &str, value: &str) -> Self {
        Query::Match {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn phrase(field: &str, value: &str) -> Self {
        Query::MatchPhrase {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn range(field: &str, gte: &str, lte: &str) -> Self {
        Query::Range {
            field: field.to_string(),
            gte: gte.to_string(),
            lte: lte.to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Query::Bool(b) => json!({ "bool": b.to_json() }),
            Query::Match { field, value } => json!({ "match": { field.as_str(): value } }),
            Query::MatchPhrase { field, value } => {
                json!({ "match_phrase": { field.as_str(): value } })
            }
            Query::Range { field, gte, lte } => {
                json!({ "range": { field.as_str(): { "gte": gte, "lte": lte } } })
            }
        }
    }
}

impl BoolQuery {
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        for (clause, queries) in [
            ("filter", &self.filter),
            ("should", &self.should),
            ("must_not", &self.must_not),
        ] {
            if !queries.is_empty() {
                let rendered = queries.iter().map(Query::to_json).collect();
                out.insert(clause.to_string(), Value::Array(rendered));
            }
        }
        if let Some(n) = self.minimum_should_match {
            out.insert("minimum_should_match".to_string(), json!(n));
        }
        Value::Object(out)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AggKind {
    /// An empty `include` list keeps every key
    Terms {
        field: String,
        size: Option<u32>,
        include: Vec<String>,
    },
    DateHistogram { field: String, fixed_interval: String },
    Filter(Query),
    Sum { field: String },
    ExtendedStats { field: String },
}

/// Named aggregation with nested sub-aggregations.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub name: String,
    pub kind: AggKind,
    pub aggs: Vec<Aggregation>,
}

impl Aggregation {
    fn new(name: &str, kind: AggKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            aggs: Vec::new(),
        }
    }

    pub fn terms(name: &str, field: &str, size: Option<u32>) -> Self {
        Self::new(
            name,
            AggKind::Terms {
                field: field.to_string(),
                size,
                include: Vec::new(),
            },
        )
    }

    pub fn date_histogram(name: &str, field: &str, fixed_interval: &str) -> Self {
        Self::new(
            name,
            AggKind::DateHistogram {
                field: field.to_string(),
                fixed_interval: fixed_interval.to_string(),
            },
        )
    }

    pub fn filter(name: &str, query: Query) -> Self {
        Self::new(name, AggKind::Filter(query))
    }

    pub fn sum(name: &str, field: &str) -> Self {
        Self::new(
            name,
            AggKind::Sum {
                field: field.to_string(),
            },
        )
    }

    pub fn extended_stats(name: &str, field: &str) -> Self {
        Self::new(
            name,
            AggKind::ExtendedStats {
                field: field.to_string(),
            },
        )
    }

    /// Attach a sub-aggregation.
    pub fn with(mut self, child: Aggregation) -> Self {
        self.aggs.push(child);
        self
    }

    pub fn with_all(mut self, children: impl IntoIterator<Item = Aggregation>) -> Self {
        self.aggs.extend(children);
        self
    }

    /// Restrict a terms aggregation to exactly `keys`, with room for all of them.
    pub fn only_keys(mut self, keys: &[&str]) -> Self {
        if let AggKind::Terms { size, include, .. } = &mut self.kind {
            *size = Some(keys.len() as u32);
            *include = keys.iter().map(|k| k.to_string()).collect();
        }
        self
    }

    fn body(&self) -> Value {
        let mut out = Map::new();
        let (kind, params) = match &self.kind {
            AggKind::Terms {
                field,
                size,
                include,
            } => {
                let mut p = json!({ "field": field });
                if let Some(size) = size {
                    p["size"] = json!(size);
                }
                if !include.is_empty() {
                    p["include"] = json!(include);
                }
                ("terms", p)
            }
            AggKind::DateHistogram {
                field,
                fixed_interval,
            } => (
                "date_histogram",
                json!({ "field": field, "fixed_interval": fixed_interval }),
            ),
            AggKind::Filter(q) => ("filter", q.to_json()),
            AggKind::Sum { field } => ("sum", json!({ "field": field })),
            AggKind::ExtendedStats { field } => ("extended_stats", json!({ "field": field })),
        };
        out.insert(kind.to_string(), params);
        if !self.aggs.is_empty() {
            out.insert("aggs".to_string(), aggs_to_json(&self.aggs));
        }
        Value::Object(out)
    }
}

fn aggs_to_json(aggs: &[Aggregation]) -> Value {
    let mut out = Map::new();
    for a in aggs {
        out.insert(a.name.clone(), a.body());
    }
    Value::Object(out)
}

/// Complete search body: top-level filter plus the aggregation tree. Hits are not requested.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: Query,
    pub aggs: Vec<Aggregation>,
}

impl SearchRequest {
    pub fn to_json(&self) -> Value {
        json!({
            "size": 0,
            "query": self.query.to_json(),
            "aggs": aggs_to_json(&self.aggs),
        })
    }
}
