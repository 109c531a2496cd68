//! Collaborators a widget talks to besides the transport

use crate::widget::SavedWidget;
use crate::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Route parameters carried by a navigation request.
pub type QueryParams = Map<String, Value>;

/// Receives facet navigation requests.
pub trait Navigator: Send + Sync {
    /// Merge `params` into the current route and navigate to `facet`.
    fn navigate(&self, facet: &str, params: QueryParams);
}

/// Stores saved widgets.
#[async_trait]
pub trait WidgetStore: Send + Sync {
    async fn save_widget(&self, widget: SavedWidget) -> Result<()>;
}

/// Told when rendered widget content changed, e.g. to re-typeset it.
pub trait RenderNotifier: Send + Sync {
    fn content_changed(&self, widget: &str);
}
