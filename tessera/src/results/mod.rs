//! Results list presentation: normalized documents and paging actions

pub mod normalize;
pub mod paging;

pub use normalize::{normalize, DisplayDocument};
pub use paging::{page, PAGE_STEP};

use crate::collaborators::{Navigator, QueryParams};
use crate::response::SearchResponse;
use serde_json::Value;

/// Facet that results paging navigates to.
pub const SEARCH_FACET: &str = "search";

/// Route parameter holding the results offset.
pub const PAGE_PARAM: &str = "page";

/// A results list bound to the current route parameters
#[derive(Debug, Clone)]
pub struct ResultsView {
    pub documents: Vec<DisplayDocument>,
    parameters: QueryParams,
}

impl ResultsView {
    pub fn new(response: &SearchResponse, parameters: QueryParams) -> Self {
        Self {
            documents: normalize(&response.hits.hits),
            parameters,
        }
    }

    /// Offset of the previous page.
    pub fn previous_offset(&self) -> i64 {
        page(self.current_page(), -PAGE_STEP, 0)
    }

    /// Offset of the next page.
    pub fn next_offset(&self) -> i64 {
        page(self.current_page(), PAGE_STEP, 0)
    }

    pub fn page_back(&self, navigator: &dyn Navigator) {
        self.go_to_offset(self.previous_offset(), navigator);
    }

    pub fn page_next(&self, navigator: &dyn Navigator) {
        self.go_to_offset(self.next_offset(), navigator);
    }

    /// Navigate to `facet` filtered by a single parameter.
    pub fn transition_to_facet(
        &self,
        facet: &str,
        parameter: &str,
        value: Value,
        navigator: &dyn Navigator,
    ) {
        let mut params = QueryParams::new();
        params.insert(parameter.to_string(), value);
        navigator.navigate(facet, params);
    }

    fn current_page(&self) -> &Value {
        self.parameters.get(PAGE_PARAM).unwrap_or(&Value::Null)
    }

    fn go_to_offset(&self, offset: i64, navigator: &dyn Navigator) {
        let mut params = QueryParams::new();
        params.insert(PAGE_PARAM.to_string(), Value::from(offset));
        navigator.navigate(SEARCH_FACET, params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNavigator {
        calls: Mutex<Vec<(String, QueryParams)>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, facet: &str, params: QueryParams) {
            self.calls.lock().unwrap().push((facet.to_string(), params));
        }
    }

    fn view(params: Value) -> ResultsView {
        let response = SearchResponse::from_value(json!({
            "hits": {"total": 1, "hits": [{"_id": "x", "_source": {"description": "d"}}]}
        }))
        .unwrap();
        ResultsView::new(&response, params.as_object().cloned().unwrap())
    }

    #[test]
    fn test_documents_normalized() {
        let v = view(json!({}));
        assert_eq!(v.documents.len(), 1);
        assert_eq!(v.documents[0].description_truncated.as_deref(), Some("d..."));
    }

    #[test]
    fn test_page_next_and_back() {
        let nav = RecordingNavigator::default();
        let v = view(json!({"page": "20", "q": "ignored"}));
        v.page_next(&nav);
        v.page_back(&nav);

        let calls = nav.calls.lock().unwrap();
        assert_eq!(calls[0].0, "search");
        assert_eq!(calls[0].1, json!({"page": 30}).as_object().cloned().unwrap());
        assert_eq!(calls[1].1["page"], json!(10));
    }

    #[test]
    fn test_page_back_from_first_page() {
        let nav = RecordingNavigator::default();
        view(json!({})).page_back(&nav);
        assert_eq!(nav.calls.lock().unwrap()[0].1["page"], json!(0));
    }

    #[test]
    fn test_facet_transition() {
        let nav = RecordingNavigator::default();
        view(json!({})).transition_to_facet("sources", "source", json!("arXiv"), &nav);
        let calls = nav.calls.lock().unwrap();
        assert_eq!(calls[0].0, "sources");
        assert_eq!(calls[0].1["source"], json!("arXiv"));
    }
}
