use crate::interval::IntervalUnit;
use crate::response::{Hit, SearchResponse};
use serde::Serialize;
use serde_json::{Map, Value};

/// Fetch phase of a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Panel shown over the widget. Configuring and picking exclude each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UiMode {
    #[default]
    Viewing,
    Configuring,
    Picking,
}

/// Runtime state owned by one widget, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetState {
    pub phase: Phase,
    /// Raw response of the last applied fetch; `None` before the first
    /// fetch and for widgets with nothing to fetch.
    pub response: Option<SearchResponse>,
    pub total: Option<u64>,
    /// Reason of the last failure while in [`Phase::Error`].
    pub error: Option<String>,
    pub interval: IntervalUnit,
}

impl WidgetState {
    pub fn idle(interval: IntervalUnit) -> Self {
        Self {
            phase: Phase::Idle,
            response: None,
            total: None,
            error: None,
            interval,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Aggregation buckets of the last response.
    pub fn aggregations(&self) -> Option<&Map<String, Value>> {
        self.response.as_ref().map(|r| &r.aggregations)
    }

    pub fn hits(&self) -> &[Hit] {
        self.response
            .as_ref()
            .map(|r| r.hits.hits.as_slice())
            .unwrap_or_default()
    }

    /// Loaded without a response: the widget had nothing to fetch.
    pub fn is_empty_result(&self) -> bool {
        self.phase == Phase::Loaded && self.response.is_none()
    }
}
