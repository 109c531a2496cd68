//! Aggregation catalog and user-chosen aggregation specs

mod catalog;
pub mod definition;
mod registry;

pub use definition::{
    AggregationTypeDefinition, ParamRule, ParameterDefinition, MAX_PRECISION_THRESHOLD,
};
pub use registry::AggregationRegistry;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An aggregation attached to a widget: one registry type, its parameter
/// values, and the bucket name it is reported under.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AggregationSpec {
    /// Caller-assigned label, e.g. `sources` or `tags`.
    pub bucket: String,

    /// Registry id, e.g. `avg` or `date_histogram`.
    #[serde(rename = "type")]
    pub type_id: String,

    #[serde(default)]
    pub values: Map<String, Value>,

    /// Sub-aggregations computed inside each bucket.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aggregations: Vec<AggregationSpec>,
}

impl AggregationSpec {
    pub fn new(bucket: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            type_id: type_id.into(),
            values: Map::new(),
            aggregations: Vec::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn with_sub_aggregation(mut self, sub: AggregationSpec) -> Self {
        self.aggregations.push(sub);
        self
    }
}
