//! Widget query engine for aggregation-backed search dashboards.
//!
//! A [`Widget`] turns its [`WidgetConfig`] into a search body through the
//! [`QueryBuilder`], validating every aggregation against the
//! [`AggregationRegistry`], then posts it through a [`Transport`] and keeps
//! the response for rendering.

pub mod aggregations;
pub mod collaborators;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod interval;
pub mod query;
pub mod response;
pub mod results;
pub mod transport;
pub mod widget;

pub use aggregations::{AggregationRegistry, AggregationSpec};
pub use collaborators::{Navigator, QueryParams, RenderNotifier, WidgetStore};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{Error, Result};
pub use interval::{compute_interval, IntervalUnit};
pub use query::{QueryBuilder, QueryPlan, SearchBody};
pub use response::SearchResponse;
pub use results::{DisplayDocument, ResultsView};
pub use transport::{SearchRequest, Transport};
pub use widget::{FetchStatus, Phase, SavedWidget, UiMode, Widget, WidgetConfig, WidgetContext};
