pub mod catalog;
pub mod widget;

pub use catalog::{run_aggregations, run_validate};
pub use widget::{run_build, run_fetch, run_save, WidgetTarget};
