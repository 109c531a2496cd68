//! Widget fetch and configuration lifecycle
//!
//! A fetch is split into [`Widget::begin_fetch`] and [`Widget::complete_fetch`]
//! so responses can be matched to the request that produced them. Each
//! request gets a sequence number; a response for anything but the latest
//! request is discarded.

use super::config::{effective_width, WidgetConfig, WidgetSettings, RELATED_CONTRIBUTORS_AGG};
use super::help;
use super::saved::{persisted_query, SavedWidget};
use super::state::{Phase, UiMode, WidgetState};
use crate::collaborators::{Navigator, QueryParams, RenderNotifier, WidgetStore};
use crate::config::{ApiConfig, DashboardConfig};
use crate::dashboard::Dashboard;
use crate::error::{Error, Result};
use crate::query::{to_canonical_string, QueryBuilder, QueryPlan};
use crate::response::SearchResponse;
use crate::transport::{SearchRequest, Transport};
use chrono::NaiveDate;
use serde_json::Value;

/// Pixel size used before the widget is first rendered.
const INITIAL_COMPUTED_SIZE: u32 = 200;

/// Everything a widget needs from its surroundings, supplied once.
#[derive(Debug, Clone)]
pub struct WidgetContext {
    pub api: ApiConfig,
    /// Date the default range ends on.
    pub today: NaiveDate,
    /// Date the default range starts on.
    pub default_from: NaiveDate,
    /// Width of widgets without one, also kept when a widget asks for less
    /// than one column.
    pub fallback_width: u8,
    /// Height of widgets without one.
    pub default_height: u32,
    /// Rendering engine of widgets without one.
    pub default_js_engine: String,
}

impl WidgetContext {
    pub fn from_config(config: &DashboardConfig, today: NaiveDate) -> Self {
        Self {
            api: config.api.clone(),
            today,
            default_from: config.defaults.date_from,
            fallback_width: effective_width(config.defaults.width, 2),
            default_height: config.defaults.height,
            default_js_engine: config.defaults.js_engine.clone(),
        }
    }

    fn builder(&self) -> QueryBuilder<'static> {
        QueryBuilder::ending(self.today, self.default_from)
    }
}

/// An in-flight request issued by [`Widget::begin_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub seq: u64,
    pub request: SearchRequest,
}

/// What [`Widget::complete_fetch`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Applied,
    /// A newer request was issued since; the response was dropped.
    Stale,
}

/// A dashboard widget and its runtime state
pub struct Widget {
    config: WidgetConfig,
    ctx: WidgetContext,
    width: u8,
    state: WidgetState,
    mode: UiMode,
    parameters: QueryParams,
    last_seq: u64,
    pending: Option<u64>,
    resized_signal: bool,
    computed_height: u32,
    computed_width: u32,
}

impl Widget {
    /// Create an idle widget without fetching.
    pub fn new(config: WidgetConfig, ctx: WidgetContext) -> Self {
        let width = match config.width {
            Some(requested) => effective_width(requested, ctx.fallback_width),
            None => ctx.fallback_width,
        };
        let interval = ctx.builder().resolve_range(&config).interval();

        Self {
            config,
            width,
            state: WidgetState::idle(interval),
            mode: UiMode::Viewing,
            parameters: QueryParams::new(),
            last_seq: 0,
            pending: None,
            resized_signal: false,
            computed_height: INITIAL_COMPUTED_SIZE,
            computed_width: INITIAL_COMPUTED_SIZE,
            ctx,
        }
    }

    /// Create a widget and fetch its data right away.
    ///
    /// A failed fetch leaves the widget in [`Phase::Error`]; it is still
    /// returned so the caller can render the failure.
    pub async fn initialize<T: Transport + ?Sized>(
        config: WidgetConfig,
        ctx: WidgetContext,
        transport: &T,
    ) -> Self {
        let mut widget = Self::new(config, ctx);
        if let Err(e) = widget.fetch(transport).await {
            tracing::debug!("Initial fetch of widget '{}' failed: {}", widget.name(), e);
        }
        widget
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn mode(&self) -> UiMode {
        self.mode
    }

    /// Effective width in grid columns, always within `1..=12`.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// CSS column class for the effective width.
    pub fn width_class(&self) -> String {
        format!("col-md-{}", self.width)
    }

    pub fn parameters(&self) -> &QueryParams {
        &self.parameters
    }

    pub fn set_parameters(&mut self, parameters: QueryParams) {
        self.parameters = parameters;
    }

    pub fn computed_size(&self) -> (u32, u32) {
        (self.computed_height, self.computed_width)
    }

    pub fn shows_help_text(&self) -> bool {
        help::shows_help_text(&self.config.name, self.config.widget_type.as_deref())
    }

    pub fn height(&self) -> u32 {
        self.config.height.unwrap_or(self.ctx.default_height)
    }

    pub fn js_engine(&self) -> &str {
        self.config
            .js_engine
            .as_deref()
            .unwrap_or(&self.ctx.default_js_engine)
    }

    /// Settings persisted with a saved widget.
    pub fn settings(&self) -> WidgetSettings {
        WidgetSettings {
            js_engine: self.js_engine().to_string(),
            chart_type: self.config.chart_type.clone(),
        }
    }

    pub fn help_text(&self) -> Option<&'static str> {
        help::help_text(&self.config.name)
    }

    /// Request a new width; below 1 keeps the current width, above 12 clamps.
    pub fn set_width(&mut self, requested: i64) -> u8 {
        self.config.width = Some(requested);
        self.width = effective_width(requested, self.width);
        self.width
    }

    // ------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------

    /// Build this widget's request and move to [`Phase::Loading`].
    ///
    /// Returns `None` when there is nothing to fetch; the widget is then
    /// `Loaded` with an empty result. Build failures move the widget to
    /// [`Phase::Error`] and are returned.
    pub fn begin_fetch(&mut self) -> Result<Option<PendingFetch>> {
        // Whatever is still in flight is stale from here on.
        self.pending = None;

        let builder = self.ctx.builder();
        self.state.interval = builder.resolve_range(&self.config).interval();

        let body = match builder.build(&self.config) {
            Ok(QueryPlan::Search(body)) => body,
            Ok(QueryPlan::Empty) => {
                self.state.phase = Phase::Loaded;
                self.state.response = None;
                self.state.total = None;
                self.state.error = None;
                return Ok(None);
            }
            Err(e) => return Err(self.fail(e)),
        };

        let body = match to_canonical_string(&body) {
            Ok(body) => body,
            Err(e) => return Err(self.fail(e)),
        };

        let url = self.ctx.api.search_url(
            self.config.endpoint.as_deref(),
            self.config.index_version.as_deref(),
        );

        self.last_seq += 1;
        let seq = self.last_seq;
        self.pending = Some(seq);
        self.state.phase = Phase::Loading;
        self.state.error = None;

        tracing::info!("Fetching widget '{}' (request #{}) from {}", self.config.name, seq, url);

        Ok(Some(PendingFetch {
            seq,
            request: SearchRequest::new(url, body),
        }))
    }

    /// Apply the transport outcome of request `seq`.
    ///
    /// Outcomes for anything but the latest request are dropped and reported
    /// as [`FetchStatus::Stale`].
    pub fn complete_fetch(&mut self, seq: u64, outcome: Result<Value>) -> Result<FetchStatus> {
        if self.pending != Some(seq) {
            tracing::warn!(
                "Discarding stale response #{} for widget '{}' (latest #{})",
                seq,
                self.config.name,
                self.last_seq
            );
            return Ok(FetchStatus::Stale);
        }
        self.pending = None;

        let response = match outcome.and_then(SearchResponse::from_value) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Fetch failed for widget '{}': {}", self.config.name, e);
                return Err(self.fail(e));
            }
        };

        let total = if self.config.is_related_researchers() {
            match response.metric_value(RELATED_CONTRIBUTORS_AGG) {
                Some(count) => count as u64,
                None => {
                    return Err(self.fail(Error::MalformedResponse(format!(
                        "missing '{RELATED_CONTRIBUTORS_AGG}' aggregation value"
                    ))))
                }
            }
        } else {
            response.total()
        };

        tracing::info!(
            "Widget '{}' loaded: total={}, {} hit(s)",
            self.config.name,
            total,
            response.hits.hits.len()
        );

        self.state.phase = Phase::Loaded;
        self.state.total = Some(total);
        self.state.response = Some(response);
        self.state.error = None;
        Ok(FetchStatus::Applied)
    }

    /// Build, send and apply one request. No retries.
    pub async fn fetch<T: Transport + ?Sized>(&mut self, transport: &T) -> Result<FetchStatus> {
        let Some(pending) = self.begin_fetch()? else {
            return Ok(FetchStatus::Applied);
        };
        let outcome = transport.search(&pending.request).await;
        self.complete_fetch(pending.seq, outcome)
    }

    fn fail(&mut self, error: Error) -> Error {
        self.state.phase = Phase::Error;
        self.state.error = Some(error.to_string());
        error
    }

    // ------------------------------------------------------------------
    // UI actions
    // ------------------------------------------------------------------

    /// Swap in another widget configuration and refetch.
    pub async fn pick<T: Transport + ?Sized>(
        &mut self,
        config: WidgetConfig,
        transport: &T,
    ) -> Result<FetchStatus> {
        tracing::debug!("Widget '{}' replaced by '{}'", self.config.name, config.name);
        self.config = config;
        self.mode = UiMode::Viewing;
        self.fetch(transport).await
    }

    pub fn toggle_configuring(&mut self) -> UiMode {
        self.mode = match self.mode {
            UiMode::Configuring => UiMode::Viewing,
            _ => UiMode::Configuring,
        };
        self.mode
    }

    pub fn toggle_picking(&mut self) -> UiMode {
        self.mode = match self.mode {
            UiMode::Picking => UiMode::Viewing,
            _ => UiMode::Picking,
        };
        self.mode
    }

    /// Configuration was edited. The first call closes the configuration
    /// panel and raises the resize signal; later calls only toggle it.
    pub fn config_changed(&mut self) {
        self.toggle_configuring();
        if self.resized_signal {
            return;
        }
        self.resized_signal = true;
        self.mode = UiMode::Viewing;
    }

    pub fn resized_signal(&self) -> bool {
        self.resized_signal
    }

    pub fn change_chart(&mut self, chart_type: impl Into<String>) {
        self.config.chart_type = chart_type.into();
    }

    pub fn change_engine(&mut self, js_engine: impl Into<String>) {
        self.config.js_engine = Some(js_engine.into());
    }

    /// Merge `new_params` over the current route parameters and navigate to
    /// `dashboard`.
    pub fn transition_to_facet(
        &mut self,
        dashboard: &str,
        new_params: QueryParams,
        navigator: &dyn Navigator,
    ) {
        self.parameters.extend(new_params);
        navigator.navigate(dashboard, self.parameters.clone());
    }

    /// Remove this widget's configuration from `dashboard`.
    pub fn remove(&self, dashboard: &mut Dashboard) -> Option<WidgetConfig> {
        tracing::info!("Removing widget '{}' from '{}'", self.config.name, dashboard.name);
        dashboard.remove(&self.config.name)
    }

    /// Record rendered dimensions and announce the new content.
    pub fn did_render(&mut self, height: u32, width: u32, notifier: &dyn RenderNotifier) {
        self.computed_height = height;
        self.computed_width = width;
        notifier.content_changed(&self.config.name);
    }

    // ------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------

    /// The persisted form of this widget.
    pub fn saved_widget(&self) -> Result<SavedWidget> {
        let builder = self.ctx.builder();
        let range = builder.resolve_range(&self.config);
        let query = persisted_query(&builder, &self.config.query, range)?;

        Ok(SavedWidget {
            name: self.config.name.clone(),
            width: self.width,
            height: self.height(),
            query,
            settings: self.settings(),
        })
    }

    pub async fn save(&self, store: &dyn WidgetStore) -> Result<()> {
        let saved = self.saved_widget()?;
        tracing::info!("Saving widget '{}'", saved.name);
        store.save_widget(saved).await
    }
}

impl std::fmt::Debug for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("name", &self.config.name)
            .field("width", &self.width)
            .field("phase", &self.state.phase)
            .field("mode", &self.mode)
            .field("pending", &self.pending)
            .finish()
    }
}
