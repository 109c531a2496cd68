//! Dashboard widgets: configuration, runtime state and lifecycle

pub mod config;
pub mod help;
mod lifecycle;
pub mod saved;
mod state;

pub use config::{effective_width, DateRange, WidgetConfig, WidgetSettings, RELATED_RESEARCHERS};
pub use lifecycle::{FetchStatus, PendingFetch, Widget, WidgetContext};
pub use saved::{default_aggregation_specs, SavedWidget};
pub use state::{Phase, UiMode, WidgetState};
