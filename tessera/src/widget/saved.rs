//! Persisted widget documents
//!
//! A saved widget always carries the full default aggregation set, whatever
//! the live widget displays.

use super::config::{DateRange, WidgetSettings};
use crate::aggregations::AggregationSpec;
use crate::query::types::{BoolQuery, EsQuery, SearchBody};
use crate::query::{QueryBuilder, DATE_FIELD};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Bucket count of each default terms aggregation.
pub const DEFAULT_TERMS_SIZE: u64 = 200;

pub const SOURCES_BUCKET: &str = "sources";
pub const CONTRIBUTORS_BUCKET: &str = "contributors";
pub const TAGS_BUCKET: &str = "tags";
pub const HISTOGRAM_BUCKET: &str = "articles_over_time";
/// Per-type breakdown nested inside each histogram bucket.
pub const TYPE_BREAKDOWN_BUCKET: &str = "arttype";

/// Document handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedWidget {
    pub name: String,
    pub width: u8,
    pub height: u32,
    pub query: SearchBody,
    pub settings: WidgetSettings,
}

fn terms(bucket: &str, field: &str) -> AggregationSpec {
    AggregationSpec::new(bucket, "terms")
        .with_value("field", field)
        .with_value("size", DEFAULT_TERMS_SIZE)
}

/// Sources, contributors, tags, and a date histogram broken down by type.
pub fn default_aggregation_specs() -> Vec<AggregationSpec> {
    vec![
        terms(SOURCES_BUCKET, "sources.raw"),
        terms(CONTRIBUTORS_BUCKET, "contributors.raw"),
        terms(TAGS_BUCKET, "tags.raw"),
        AggregationSpec::new(HISTOGRAM_BUCKET, "date_histogram")
            .with_value("field", DATE_FIELD)
            .with_value("format", "yyyy-MM-dd")
            .with_sub_aggregation(
                AggregationSpec::new(TYPE_BREAKDOWN_BUCKET, "terms").with_value("field", "type"),
            ),
    ]
}

/// Query stored with a saved widget: text and date range plus the default
/// aggregations, starting at offset 0.
pub fn persisted_query(builder: &QueryBuilder<'_>, text: &str, range: DateRange) -> Result<SearchBody> {
    let (gte, lte) = range.bounds();
    let aggregations = builder.build_aggregations(&default_aggregation_specs(), range.interval())?;

    Ok(SearchBody {
        query: EsQuery::Bool(BoolQuery {
            must: vec![
                EsQuery::query_string(text),
                EsQuery::date_range(DATE_FIELD, gte, lte),
            ],
            filter: vec![],
        }),
        from: 0,
        size: None,
        aggregations,
    })
}
