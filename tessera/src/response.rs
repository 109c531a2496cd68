//! Search response shape consumed by widgets

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Search response returned by the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: HitsResponse,
    #[serde(default)]
    pub aggregations: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitsResponse {
    pub total: TotalHits,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// `hits.total`, either a bare count or the `{value, relation}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Object {
        value: u64,
        #[serde(default)]
        relation: Option<String>,
    },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) => *n,
            TotalHits::Object { value, .. } => *value,
        }
    }
}

/// One raw result document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, rename = "_index", skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(default, rename = "_score", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, rename = "_source")]
    pub source: Map<String, Value>,
}

impl SearchResponse {
    /// Parse a raw transport body, rejecting anything without `hits`.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::MalformedResponse(e.to_string()))
    }

    pub fn total(&self) -> u64 {
        self.hits.total.value()
    }

    /// Single `value` of a metric aggregation, e.g. a cardinality count.
    pub fn metric_value(&self, name: &str) -> Option<f64> {
        self.aggregations.get(name)?.get("value")?.as_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_numeric_total() {
        let resp = SearchResponse::from_value(json!({
            "hits": {"total": 42, "hits": [
                {"_id": "a1", "_source": {"title": "Paper"}}
            ]},
            "aggregations": {"sources": {"buckets": []}}
        }))
        .unwrap();
        assert_eq!(resp.total(), 42);
        assert_eq!(resp.hits.hits[0].id, "a1");
        assert!(resp.aggregations.contains_key("sources"));
    }

    #[test]
    fn test_parse_object_total() {
        let resp = SearchResponse::from_value(json!({
            "hits": {"total": {"value": 10000, "relation": "gte"}, "hits": []}
        }))
        .unwrap();
        assert_eq!(resp.total(), 10000);
        assert!(resp.aggregations.is_empty());
    }

    #[test]
    fn test_metric_value() {
        let resp = SearchResponse::from_value(json!({
            "hits": {"total": 5, "hits": []},
            "aggregations": {"relatedContributors": {"value": 17}}
        }))
        .unwrap();
        assert_eq!(resp.metric_value("relatedContributors"), Some(17.0));
        assert_eq!(resp.metric_value("missing"), None);
    }

    #[test]
    fn test_malformed_response() {
        let err = SearchResponse::from_value(json!({"took": 3})).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
        assert!(err.is_transport_error());
    }
}
