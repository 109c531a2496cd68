use crate::http::HttpTransport;
use crate::store::{FileStore, StdoutStore};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tessera::results::ResultsView;
use tessera::{Dashboard, DashboardConfig, Phase, QueryBuilder, Widget, WidgetConfig, WidgetContext};

/// A widget picked out of a dashboard file
pub struct WidgetTarget {
    pub dashboard: PathBuf,
    pub widget: String,
    pub today: NaiveDate,
}

impl WidgetTarget {
    fn load(&self) -> Result<WidgetConfig> {
        let dashboard = Dashboard::load(&self.dashboard)
            .with_context(|| format!("Failed to load dashboard {:?}", self.dashboard))?;
        dashboard.get(&self.widget).cloned().with_context(|| {
            format!(
                "Dashboard '{}' has no widget named '{}'",
                dashboard.name, self.widget
            )
        })
    }
}

/// Print the request a widget would send
pub fn run_build(config: &DashboardConfig, target: &WidgetTarget) -> Result<()> {
    let widget = target.load()?;
    let builder = QueryBuilder::ending(target.today, config.defaults.date_from);

    match builder.build_canonical(&widget)? {
        Some(body) => {
            let url = config
                .api
                .search_url(widget.endpoint.as_deref(), widget.index_version.as_deref());
            println!("POST {}", url);
            println!("{}", body);
        }
        None => println!("Widget '{}' has nothing to fetch", widget.name),
    }
    Ok(())
}

/// Fetch a widget and print its total and documents
pub async fn run_fetch(config: &DashboardConfig, target: &WidgetTarget, timeout: Duration) -> Result<()> {
    let transport = HttpTransport::new(timeout)?;
    let ctx = WidgetContext::from_config(config, target.today);
    let widget = Widget::initialize(target.load()?, ctx, &transport).await;
    let state = widget.state();

    match state.phase {
        Phase::Error => {
            anyhow::bail!(
                "Fetch failed for '{}': {}",
                widget.name(),
                state.error.as_deref().unwrap_or("unknown error")
            );
        }
        _ if state.is_empty_result() => {
            println!("Widget '{}' has nothing to fetch", widget.name());
        }
        _ => {
            println!("Widget:   {}", widget.name());
            println!("Total:    {}", state.total.unwrap_or_default());
            println!("Interval: {}", state.interval);
            if let Some(response) = &state.response {
                let view = ResultsView::new(response, widget.parameters().clone());
                println!("{}", serde_json::to_string_pretty(&view.documents)?);
                if let Some(aggregations) = state.aggregations().filter(|a| !a.is_empty()) {
                    println!("{}", serde_json::to_string_pretty(aggregations)?);
                }
            }
        }
    }
    Ok(())
}

/// Save a widget into `output`, or print it when no directory is given
pub async fn run_save(
    config: &DashboardConfig,
    target: &WidgetTarget,
    output: Option<&Path>,
) -> Result<()> {
    let ctx = WidgetContext::from_config(config, target.today);
    let widget = Widget::new(target.load()?, ctx);
    match output {
        Some(dir) => widget.save(&FileStore::new(dir)).await?,
        None => widget.save(&StdoutStore).await?,
    }
    Ok(())
}
