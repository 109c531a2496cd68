//! Widget configuration

use crate::aggregations::AggregationSpec;
use crate::interval::{compute_interval, IntervalUnit};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Chart type whose total is the distinct-contributor count, not the hit count.
pub const RELATED_RESEARCHERS: &str = "relatedResearchers";

/// Aggregation holding that count for [`RELATED_RESEARCHERS`] widgets.
pub const RELATED_CONTRIBUTORS_AGG: &str = "relatedContributors";

pub const MIN_WIDTH: u8 = 1;
pub const MAX_WIDTH: u8 = 12;

/// Inclusive date range a widget queries over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn interval(&self) -> IntervalUnit {
        compute_interval(self.from, self.to)
    }

    /// `from` and `to` formatted for the range clause.
    pub fn bounds(&self) -> (String, String) {
        (
            self.from.format("%Y-%m-%d").to_string(),
            self.to.format("%Y-%m-%d").to_string(),
        )
    }
}

/// Settings persisted next to a saved widget's query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSettings {
    pub js_engine: String,
    pub chart_type: String,
}

/// A configured dashboard widget.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WidgetConfig {
    pub name: String,

    /// Requested width in grid columns; the widget clamps it into `1..=12`.
    /// Unset means the dashboard default.
    #[serde(default, alias = "widthSetting", skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,

    /// Unset means the dashboard default.
    #[serde(default, alias = "heightSetting", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default, alias = "chartType")]
    pub chart_type: String,

    #[serde(default, alias = "widgetType", skip_serializing_if = "Option::is_none")]
    pub widget_type: Option<String>,

    /// Rendering engine identifier; unset means the dashboard default.
    #[serde(default, alias = "jsEngine", skip_serializing_if = "Option::is_none")]
    pub js_engine: Option<String>,

    /// Defaults to the dashboard start date through "today" when absent.
    #[serde(default, alias = "dateRange", skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,

    /// Free-text query; empty matches everything.
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub aggregations: Vec<AggregationSpec>,

    /// Search endpoint override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, alias = "indexVersion", skip_serializing_if = "Option::is_none")]
    pub index_version: Option<String>,

    /// Pagination offset emitted as `from`.
    #[serde(default)]
    pub offset: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl WidgetConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: None,
            height: None,
            chart_type: String::new(),
            widget_type: None,
            js_engine: None,
            date_range: None,
            query: String::new(),
            aggregations: Vec::new(),
            endpoint: None,
            index_version: None,
            offset: 0,
            size: None,
        }
    }

    /// Whether there is anything to fetch. A widget without aggregations and
    /// without a query is a valid empty widget, not an error.
    pub fn has_request_body(&self) -> bool {
        !self.aggregations.is_empty() || !self.query.is_empty()
    }

    pub fn is_related_researchers(&self) -> bool {
        self.chart_type == RELATED_RESEARCHERS
    }
}

/// Clamp a requested width into `1..=12`; values below 1 keep `previous`.
pub fn effective_width(requested: i64, previous: u8) -> u8 {
    if requested < i64::from(MIN_WIDTH) {
        previous.clamp(MIN_WIDTH, MAX_WIDTH)
    } else if requested > i64::from(MAX_WIDTH) {
        MAX_WIDTH
    } else {
        requested as u8
    }
}
