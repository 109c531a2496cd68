//! Search request body types
//!
//! The subset of the backend's query DSL that widgets emit.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Date formats accepted by the range clause: full dates or bare years.
pub const RANGE_DATE_FORMAT: &str = "yyyy-MM-dd||yyyy";

/// Root search request body
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchBody {
    pub query: EsQuery,

    /// Starting offset
    #[serde(default)]
    pub from: u64,

    /// Maximum number of hits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aggregations: BTreeMap<String, AggregationClause>,
}

/// Query types
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EsQuery {
    /// Bool query (must, filter)
    Bool(BoolQuery),

    /// Query string (Lucene syntax)
    QueryString(QueryStringQuery),

    /// Range query, keyed by field
    Range(BTreeMap<String, RangeParams>),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BoolQuery {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<EsQuery>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<EsQuery>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QueryStringQuery {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RangeParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl EsQuery {
    pub fn query_string(query: impl Into<String>) -> Self {
        EsQuery::QueryString(QueryStringQuery {
            query: query.into(),
        })
    }

    /// Inclusive date range on `field`.
    pub fn date_range(field: &str, gte: impl Into<String>, lte: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(
            field.to_string(),
            RangeParams {
                gte: Some(gte.into()),
                lte: Some(lte.into()),
                format: Some(RANGE_DATE_FORMAT.to_string()),
            },
        );
        EsQuery::Range(fields)
    }
}

/// One named aggregation: its type body plus optional children.
///
/// Serializes as `{"<type>": {...}, "aggregations": {...}}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AggregationClause {
    #[serde(flatten)]
    pub body: BTreeMap<String, Map<String, Value>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aggregations: BTreeMap<String, AggregationClause>,
}

impl AggregationClause {
    pub fn new(type_id: &str, options: Map<String, Value>) -> Self {
        let mut body = BTreeMap::new();
        body.insert(type_id.to_string(), options);
        Self {
            body,
            aggregations: BTreeMap::new(),
        }
    }

    /// The aggregation type id of this clause.
    pub fn type_id(&self) -> Option<&str> {
        self.body.keys().next().map(String::as_str)
    }

    pub fn options(&self) -> Option<&Map<String, Value>> {
        self.body.values().next()
    }
}
