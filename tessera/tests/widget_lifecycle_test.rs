//! End-to-end widget lifecycle tests against in-memory collaborators.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use tessera::widget::DateRange;
use tessera::{
    AggregationSpec, Dashboard, DashboardConfig, Error, FetchStatus, Navigator, Phase, QueryParams,
    RenderNotifier, Result, SavedWidget, SearchRequest, Transport, UiMode, Widget, WidgetConfig,
    WidgetContext, WidgetStore,
};

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockTransport {
    requests: Mutex<Vec<SearchRequest>>,
    responses: Mutex<VecDeque<Result<Value>>>,
}

impl MockTransport {
    fn replying(responses: Vec<Result<Value>>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(responses.into()),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_body(&self) -> Value {
        let requests = self.requests.lock().unwrap();
        serde_json::from_str(&requests.last().unwrap().body).unwrap()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn search(&self, request: &SearchRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport("no scripted response".into())))
    }
}

#[derive(Default)]
struct RecordingNavigator {
    calls: Mutex<Vec<(String, QueryParams)>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, facet: &str, params: QueryParams) {
        self.calls.lock().unwrap().push((facet.to_string(), params));
    }
}

#[derive(Default)]
struct MemoryStore {
    saved: Mutex<Vec<SavedWidget>>,
}

#[async_trait]
impl WidgetStore for MemoryStore {
    async fn save_widget(&self, widget: SavedWidget) -> Result<()> {
        self.saved.lock().unwrap().push(widget);
        Ok(())
    }
}

#[derive(Default)]
struct CountingNotifier {
    widgets: Mutex<Vec<String>>,
}

impl RenderNotifier for CountingNotifier {
    fn content_changed(&self, widget: &str) {
        self.widgets.lock().unwrap().push(widget.to_string());
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn ctx() -> WidgetContext {
    WidgetContext::from_config(&DashboardConfig::default(), date("2020-06-30"))
}

fn hits_response(total: u64) -> Value {
    json!({
        "hits": {
            "total": total,
            "hits": [{"_id": "d1", "_source": {"title": "A paper"}}]
        },
        "aggregations": {}
    })
}

fn query_widget(name: &str, query: &str) -> WidgetConfig {
    let mut config = WidgetConfig::new(name);
    config.query = query.to_string();
    config
}

fn related_researchers() -> WidgetConfig {
    let mut config = WidgetConfig::new("Related researchers");
    config.chart_type = "relatedResearchers".to_string();
    config.aggregations.push(
        AggregationSpec::new("relatedContributors", "cardinality")
            .with_value("field", "contributors.raw")
            .with_value("precision_threshold", 100_000),
    );
    config
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_empty_widget_never_calls_transport() {
    let transport = MockTransport::default();
    let widget = Widget::initialize(WidgetConfig::new("Empty"), ctx(), &transport).await;

    assert_eq!(transport.calls(), 0);
    assert_eq!(widget.phase(), Phase::Loaded);
    assert!(widget.state().is_empty_result());
    assert!(widget.state().hits().is_empty());
}

#[tokio::test]
async fn test_query_widget_posts_canonical_body() {
    let transport = MockTransport::replying(vec![Ok(hits_response(42))]);
    let widget = Widget::initialize(query_widget("Climate", "climate"), ctx(), &transport).await;

    assert_eq!(widget.phase(), Phase::Loaded);
    assert_eq!(widget.state().total, Some(42));
    assert_eq!(widget.state().hits().len(), 1);

    let requests = transport.requests.lock().unwrap();
    assert_eq!(
        requests[0].url,
        "http://localhost:9200/records/_search?request_cache=true"
    );
    assert_eq!(
        requests[0].body,
        r#"{"from":0,"query":{"bool":{"must":[{"query_string":{"query":"climate"}},{"range":{"date":{"format":"yyyy-MM-dd||yyyy","gte":"1996-01-01","lte":"2020-06-30"}}}]}}}"#
    );
}

#[tokio::test]
async fn test_endpoint_override_and_index_version() {
    let transport = MockTransport::replying(vec![Ok(hits_response(1))]);
    let mut config = query_widget("People", "smith");
    config.endpoint = Some("people".to_string());
    config.index_version = Some("4".to_string());
    Widget::initialize(config, ctx(), &transport).await;

    let requests = transport.requests.lock().unwrap();
    assert_eq!(
        requests[0].url,
        "http://localhost:9200/api/search/people/_search?request_cache=true&v=4"
    );
}

#[tokio::test]
async fn test_related_researchers_total_from_cardinality() {
    let transport = MockTransport::replying(vec![Ok(json!({
        "hits": {"total": {"value": 500, "relation": "eq"}, "hits": []},
        "aggregations": {"relatedContributors": {"value": 17}}
    }))]);
    let widget = Widget::initialize(related_researchers(), ctx(), &transport).await;

    assert_eq!(widget.state().total, Some(17));
    let body = transport.last_body();
    assert_eq!(
        body["aggregations"]["relatedContributors"]["cardinality"]["precision_threshold"],
        json!(40_000)
    );
}

#[tokio::test]
async fn test_related_researchers_without_count_is_error() {
    let transport = MockTransport::replying(vec![Ok(hits_response(3))]);
    let widget = Widget::initialize(related_researchers(), ctx(), &transport).await;

    assert_eq!(widget.phase(), Phase::Error);
    assert!(widget.state().error.as_deref().unwrap().contains("relatedContributors"));
}

#[tokio::test]
async fn test_transport_failure_is_not_retried() {
    let transport =
        MockTransport::replying(vec![Err(Error::Transport("connection refused".into()))]);
    let mut widget = Widget::new(query_widget("Climate", "climate"), ctx());

    let err = widget.fetch(&transport).await.unwrap_err();
    assert!(err.is_transport_error());
    assert_eq!(widget.phase(), Phase::Error);
    assert_eq!(transport.calls(), 1);
    assert!(widget.state().response.is_none());
}

#[tokio::test]
async fn test_malformed_response() {
    let transport = MockTransport::replying(vec![Ok(json!({"took": 3}))]);
    let mut widget = Widget::new(query_widget("Climate", "climate"), ctx());

    let err = widget.fetch(&transport).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
    assert_eq!(widget.phase(), Phase::Error);
}

#[tokio::test]
async fn test_invalid_aggregation_fails_before_network() {
    let transport = MockTransport::default();
    let mut config = WidgetConfig::new("Average");
    config.aggregations.push(
        AggregationSpec::new("avg_score", "avg")
            .with_value("field", "score")
            .with_value("unknownParam", 1),
    );
    let mut widget = Widget::new(config, ctx());

    let err = widget.fetch(&transport).await.unwrap_err();
    assert!(err.is_build_error());
    assert_eq!(err.parameter(), Some("unknownParam"));
    assert_eq!(transport.calls(), 0);
    assert_eq!(widget.phase(), Phase::Error);
}

#[tokio::test]
async fn test_failed_widget_recovers_on_refetch() {
    let transport = MockTransport::replying(vec![
        Err(Error::Transport("timeout".into())),
        Ok(hits_response(5)),
    ]);
    let mut widget = Widget::new(query_widget("Climate", "climate"), ctx());

    assert!(widget.fetch(&transport).await.is_err());
    assert_eq!(widget.fetch(&transport).await.unwrap(), FetchStatus::Applied);
    assert_eq!(widget.phase(), Phase::Loaded);
    assert!(widget.state().error.is_none());
}

#[test]
fn test_stale_response_discarded() {
    let mut widget = Widget::new(query_widget("Climate", "climate"), ctx());

    let first = widget.begin_fetch().unwrap().unwrap();
    let second = widget.begin_fetch().unwrap().unwrap();
    assert!(second.seq > first.seq);
    assert!(widget.state().is_loading());

    let status = widget.complete_fetch(first.seq, Ok(hits_response(1))).unwrap();
    assert_eq!(status, FetchStatus::Stale);
    assert_eq!(widget.phase(), Phase::Loading);
    assert!(widget.state().total.is_none());

    let status = widget.complete_fetch(second.seq, Ok(hits_response(2))).unwrap();
    assert_eq!(status, FetchStatus::Applied);
    assert_eq!(widget.state().total, Some(2));

    // A late duplicate of the applied response is stale too.
    let status = widget.complete_fetch(second.seq, Ok(hits_response(9))).unwrap();
    assert_eq!(status, FetchStatus::Stale);
    assert_eq!(widget.state().total, Some(2));
}

#[test]
fn test_interval_follows_date_range() {
    let mut config = query_widget("Recent", "climate");
    config.date_range = Some(DateRange::new(date("2020-06-01"), date("2020-06-20")));
    let widget = Widget::new(config, ctx());
    assert_eq!(widget.state().interval.as_str(), "day");

    let widget = Widget::new(query_widget("All time", "climate"), ctx());
    assert_eq!(widget.state().interval.as_str(), "year");
}

// ---------------------------------------------------------------------------
// UI actions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_pick_replaces_config_and_refetches() {
    let transport = MockTransport::replying(vec![Ok(hits_response(1)), Ok(hits_response(8))]);
    let mut widget = Widget::initialize(query_widget("First", "a"), ctx(), &transport).await;
    widget.toggle_picking();

    let status = widget.pick(query_widget("Second", "b"), &transport).await.unwrap();
    assert_eq!(status, FetchStatus::Applied);
    assert_eq!(widget.name(), "Second");
    assert_eq!(widget.mode(), UiMode::Viewing);
    assert_eq!(widget.state().total, Some(8));
    assert_eq!(
        transport.last_body()["query"]["bool"]["must"][0]["query_string"]["query"],
        json!("b")
    );
}

#[test]
fn test_configuring_and_picking_exclusive() {
    let mut widget = Widget::new(WidgetConfig::new("w"), ctx());
    assert_eq!(widget.toggle_configuring(), UiMode::Configuring);
    assert_eq!(widget.toggle_picking(), UiMode::Picking);
    assert_eq!(widget.toggle_configuring(), UiMode::Configuring);
    assert_eq!(widget.toggle_configuring(), UiMode::Viewing);
}

#[test]
fn test_config_changed_raises_resize_once() {
    let mut widget = Widget::new(WidgetConfig::new("w"), ctx());
    assert!(!widget.resized_signal());

    widget.config_changed();
    assert!(widget.resized_signal());
    assert_eq!(widget.mode(), UiMode::Viewing);

    widget.config_changed();
    assert!(widget.resized_signal());
    assert_eq!(widget.mode(), UiMode::Configuring);
}

#[test]
fn test_width_rules() {
    let mut config = WidgetConfig::new("w");
    config.width = Some(20);
    let mut widget = Widget::new(config, ctx());
    assert_eq!(widget.width(), 12);

    assert_eq!(widget.set_width(4), 4);
    assert_eq!(widget.width_class(), "col-md-4");
    assert_eq!(widget.set_width(0), 4);
    assert_eq!(widget.set_width(-1), 4);
    assert_eq!(widget.set_width(13), 12);
}

#[test]
fn test_zero_width_config_falls_back_to_default() {
    let mut config = WidgetConfig::new("w");
    config.width = Some(0);
    assert_eq!(Widget::new(config, ctx()).width(), 2);
}

#[test]
fn test_chart_and_engine_changes() {
    let mut widget = Widget::new(WidgetConfig::new("w"), ctx());
    widget.change_chart("donut");
    widget.change_engine("d3");
    assert_eq!(widget.config().chart_type, "donut");
    assert_eq!(widget.config().js_engine.as_deref(), Some("d3"));
    assert_eq!(widget.js_engine(), "d3");
}

#[test]
fn test_transition_to_facet_merges_parameters() {
    let nav = RecordingNavigator::default();
    let mut widget = Widget::new(WidgetConfig::new("w"), ctx());
    widget.set_parameters(json!({"q": "dna", "page": 10}).as_object().cloned().unwrap());

    widget.transition_to_facet(
        "sources",
        json!({"source": "arXiv", "page": 0}).as_object().cloned().unwrap(),
        &nav,
    );

    let calls = nav.calls.lock().unwrap();
    assert_eq!(calls[0].0, "sources");
    assert_eq!(
        Value::Object(calls[0].1.clone()),
        json!({"q": "dna", "page": 0, "source": "arXiv"})
    );
}

#[test]
fn test_remove_from_dashboard() {
    let mut dashboard = Dashboard::new("main");
    dashboard.add(WidgetConfig::new("Tags")).unwrap();
    dashboard.add(WidgetConfig::new("Funders")).unwrap();

    let widget = Widget::new(dashboard.get("Tags").cloned().unwrap(), ctx());
    assert_eq!(widget.remove(&mut dashboard).map(|c| c.name), Some("Tags".to_string()));
    assert!(dashboard.get("Tags").is_none());
    assert_eq!(dashboard.widgets.len(), 1);
    assert!(widget.remove(&mut dashboard).is_none());
}

#[test]
fn test_did_render_records_size() {
    let notifier = CountingNotifier::default();
    let mut widget = Widget::new(WidgetConfig::new("Tags"), ctx());
    assert_eq!(widget.computed_size(), (200, 200));

    widget.did_render(320, 640, &notifier);
    assert_eq!(widget.computed_size(), (320, 640));
    assert_eq!(*notifier.widgets.lock().unwrap(), vec!["Tags".to_string()]);
}

#[test]
fn test_help_text_visibility() {
    let widget = Widget::new(WidgetConfig::new("Funders"), ctx());
    assert!(widget.shows_help_text());
    assert!(widget.help_text().unwrap().starts_with("Organizations"));

    let widget = Widget::new(WidgetConfig::new("Top Tags"), ctx());
    assert!(!widget.shows_help_text());
}

// ---------------------------------------------------------------------------
// Saving
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_save_persists_default_aggregations() {
    let store = MemoryStore::default();
    let mut config = query_widget("Tags", "climate");
    config.width = Some(0);
    config.chart_type = "donut".to_string();
    config.offset = 40;
    config
        .aggregations
        .push(AggregationSpec::new("only_this", "terms").with_value("field", "tags.raw"));
    let widget = Widget::new(config, ctx());

    widget.save(&store).await.unwrap();

    let saved = store.saved.lock().unwrap();
    let saved = &saved[0];
    assert_eq!(saved.name, "Tags");
    assert_eq!(saved.width, 2);
    assert_eq!(saved.settings.chart_type, "donut");
    assert_eq!(saved.settings.js_engine, "c3");
    assert_eq!(saved.query.from, 0);

    let buckets: Vec<&str> = saved.query.aggregations.keys().map(String::as_str).collect();
    assert_eq!(buckets, vec!["articles_over_time", "contributors", "sources", "tags"]);

    let v = serde_json::to_value(&saved.query).unwrap();
    assert_eq!(
        v["aggregations"]["articles_over_time"]["date_histogram"]["interval"],
        json!("year")
    );
}

#[test]
fn test_saved_widget_uses_dashboard_defaults() {
    let config = DashboardConfig::load_from_str(
        "[defaults]\njs_engine = \"d3\"\nheight = 7\nwidth = 5\n",
    )
    .unwrap();
    let ctx = WidgetContext::from_config(&config, date("2020-06-30"));

    let saved = Widget::new(WidgetConfig::new("w"), ctx.clone())
        .saved_widget()
        .unwrap();
    assert_eq!(saved.settings.js_engine, "d3");
    assert_eq!(saved.height, 7);
    assert_eq!(saved.width, 5);

    // Widget-level settings win over the dashboard defaults.
    let mut own = WidgetConfig::new("own");
    own.js_engine = Some("c3".to_string());
    own.height = Some(3);
    own.width = Some(8);
    let saved = Widget::new(own, ctx).saved_widget().unwrap();
    assert_eq!(saved.settings.js_engine, "c3");
    assert_eq!(saved.height, 3);
    assert_eq!(saved.width, 8);
}
