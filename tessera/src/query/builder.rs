//! Builds search request bodies from widget configuration

use crate::aggregations::{AggregationRegistry, AggregationSpec, MAX_PRECISION_THRESHOLD};
use crate::error::{Error, Result};
use crate::interval::IntervalUnit;
use crate::query::canonical::to_canonical_string;
use crate::query::types::{AggregationClause, BoolQuery, EsQuery, SearchBody};
use crate::widget::config::{DateRange, WidgetConfig};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;

/// Field the date range clause applies to.
pub const DATE_FIELD: &str = "date";

/// Result of building a widget's query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPlan {
    /// The widget has nothing to fetch.
    Empty,
    Search(SearchBody),
}

impl QueryPlan {
    pub fn is_empty(&self) -> bool {
        matches!(self, QueryPlan::Empty)
    }

    pub fn body(&self) -> Option<&SearchBody> {
        match self {
            QueryPlan::Empty => None,
            QueryPlan::Search(body) => Some(body),
        }
    }
}

/// Turns a [`WidgetConfig`] into a search body
pub struct QueryBuilder<'r> {
    registry: &'r AggregationRegistry,
    default_range: DateRange,
}

impl QueryBuilder<'static> {
    /// Builder over the global registry with default ranges ending on `today`.
    pub fn ending(today: NaiveDate, default_from: NaiveDate) -> Self {
        QueryBuilder::new(
            AggregationRegistry::global(),
            DateRange::new(default_from, today),
        )
    }
}

impl<'r> QueryBuilder<'r> {
    /// `default_range` applies to widgets without their own date range.
    pub fn new(registry: &'r AggregationRegistry, default_range: DateRange) -> Self {
        Self {
            registry,
            default_range,
        }
    }

    pub fn resolve_range(&self, config: &WidgetConfig) -> DateRange {
        config.date_range.unwrap_or(self.default_range)
    }

    /// Build the search body for `config`.
    ///
    /// Aggregation specs are validated in order and the first invalid one
    /// aborts the build.
    pub fn build(&self, config: &WidgetConfig) -> Result<QueryPlan> {
        if !config.has_request_body() {
            tracing::debug!("Widget '{}' has no request body", config.name);
            return Ok(QueryPlan::Empty);
        }

        let range = self.resolve_range(config);
        let interval = range.interval();
        let (gte, lte) = range.bounds();

        let query = EsQuery::Bool(BoolQuery {
            must: vec![
                EsQuery::query_string(config.query.clone()),
                EsQuery::date_range(DATE_FIELD, gte, lte),
            ],
            filter: vec![],
        });

        let aggregations = self.build_aggregations(&config.aggregations, interval)?;

        tracing::debug!(
            "Built query for widget '{}': {} aggregation(s), interval={}",
            config.name,
            aggregations.len(),
            interval
        );

        Ok(QueryPlan::Search(SearchBody {
            query,
            from: config.offset,
            size: config.size,
            aggregations,
        }))
    }

    /// Build and serialize with sorted keys.
    pub fn build_canonical(&self, config: &WidgetConfig) -> Result<Option<String>> {
        match self.build(config)? {
            QueryPlan::Empty => Ok(None),
            QueryPlan::Search(body) => to_canonical_string(&body).map(Some),
        }
    }

    /// Build named aggregation clauses, children depth-first.
    pub fn build_aggregations(
        &self,
        specs: &[AggregationSpec],
        interval: IntervalUnit,
    ) -> Result<BTreeMap<String, AggregationClause>> {
        let mut clauses = BTreeMap::new();

        for spec in specs {
            if spec.bucket.trim().is_empty() {
                return Err(Error::Build(format!(
                    "'{}' aggregation has an empty bucket name",
                    spec.type_id
                )));
            }
            if clauses.contains_key(&spec.bucket) {
                return Err(Error::Build(format!(
                    "duplicate aggregation bucket '{}'",
                    spec.bucket
                )));
            }

            let clause = self.build_clause(spec, interval)?;
            clauses.insert(spec.bucket.clone(), clause);
        }

        Ok(clauses)
    }

    fn build_clause(&self, spec: &AggregationSpec, interval: IntervalUnit) -> Result<AggregationClause> {
        self.registry.validate(&spec.type_id, &spec.values)?;

        let mut options = spec.values.clone();
        options.retain(|_, v| !v.is_null());

        match spec.type_id.as_str() {
            "date_histogram" => {
                options
                    .entry("interval")
                    .or_insert_with(|| Value::from(interval.as_str()));
            }
            "cardinality" => {
                if let Some(threshold) = options.get("precision_threshold").and_then(Value::as_u64) {
                    if threshold > MAX_PRECISION_THRESHOLD {
                        options.insert(
                            "precision_threshold".to_string(),
                            Value::from(MAX_PRECISION_THRESHOLD),
                        );
                    }
                }
            }
            _ => {}
        }

        let mut clause = AggregationClause::new(&spec.type_id, options);
        clause.aggregations = self.build_aggregations(&spec.aggregations, interval)?;
        Ok(clause)
    }
}
