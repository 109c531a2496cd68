//! Named collections of widget configurations, stored as YAML

use crate::widget::WidgetConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub name: String,
    #[serde(default)]
    pub widgets: Vec<WidgetConfig>,
}

impl Dashboard {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            widgets: Vec::new(),
        }
    }

    /// Append a widget. Names are unique within a dashboard.
    pub fn add(&mut self, widget: WidgetConfig) -> Result<()> {
        if self.get(&widget.name).is_some() {
            return Err(Error::Build(format!(
                "dashboard '{}' already has a widget named '{}'",
                self.name, widget.name
            )));
        }
        self.widgets.push(widget);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<WidgetConfig> {
        let pos = self.widgets.iter().position(|w| w.name == name)?;
        Some(self.widgets.remove(pos))
    }

    pub fn get(&self, name: &str) -> Option<&WidgetConfig> {
        self.widgets.iter().find(|w| w.name == name)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let dashboard = Self::from_yaml(&content)?;
        tracing::debug!(
            "Loaded dashboard '{}' with {} widget(s) from {}",
            dashboard.name,
            dashboard.widgets.len(),
            path.display()
        );
        Ok(dashboard)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}
