//! Widget stores for saved widget documents

use async_trait::async_trait;
use std::path::PathBuf;
use tessera::{Result, SavedWidget, WidgetStore};

/// Writes each saved widget to `<dir>/<name>.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        let file: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

#[async_trait]
impl WidgetStore for FileStore {
    async fn save_widget(&self, widget: SavedWidget) -> Result<()> {
        let path = self.path_for(&widget.name);
        let content = serde_json::to_string_pretty(&widget)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, content).await?;
        tracing::info!("Saved widget '{}' to {}", widget.name, path.display());
        Ok(())
    }
}

/// Prints saved widgets to stdout.
pub struct StdoutStore;

#[async_trait]
impl WidgetStore for StdoutStore {
    async fn save_widget(&self, widget: SavedWidget) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(&widget)?);
        Ok(())
    }
}
