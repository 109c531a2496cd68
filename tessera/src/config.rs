//! Dashboard configuration
//!
//! Loaded from a TOML file; every section is optional.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub defaults: WidgetDefaults,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the search API, with trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Search path used when a widget has no endpoint override
    #[serde(default = "default_path")]
    pub default_path: String,
    /// Prefix for per-widget endpoint overrides
    #[serde(default = "default_override_prefix")]
    pub override_prefix: String,
    /// Ask the backend to cache request results
    #[serde(default = "default_true")]
    pub request_cache: bool,
}

fn default_base_url() -> String {
    "http://localhost:9200/".to_string()
}

fn default_path() -> String {
    "records/_search".to_string()
}

fn default_override_prefix() -> String {
    "/api/search/".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_path: default_path(),
            override_prefix: default_override_prefix(),
            request_cache: true,
        }
    }
}

impl ApiConfig {
    /// URL a widget's search is posted to.
    pub fn search_url(&self, endpoint: Option<&str>, index_version: Option<&str>) -> String {
        let mut url = match endpoint {
            Some(endpoint) => join_url(&[&self.base_url, &self.override_prefix, endpoint, "_search"]),
            None => join_url(&[&self.base_url, &self.default_path]),
        };

        let mut params = Vec::new();
        if self.request_cache {
            params.push("request_cache=true".to_string());
        }
        if let Some(v) = index_version {
            params.push(format!("v={v}"));
        }
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        url
    }
}

/// Join URL segments with exactly one slash between non-empty segments.
fn join_url(segments: &[&str]) -> String {
    let mut url = segments[0].trim_end_matches('/').to_string();
    for segment in &segments[1..] {
        let segment = segment.trim_matches('/');
        if !segment.is_empty() {
            url.push('/');
            url.push_str(segment);
        }
    }
    url
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WidgetDefaults {
    #[serde(default = "default_js_engine")]
    pub js_engine: String,
    #[serde(default = "default_width")]
    pub width: i64,
    #[serde(default = "default_height")]
    pub height: u32,
    /// First day of the default date range
    #[serde(default = "default_date_from")]
    pub date_from: NaiveDate,
}

fn default_js_engine() -> String {
    "c3".to_string()
}

fn default_width() -> i64 {
    2
}

fn default_height() -> u32 {
    2
}

pub fn default_date_from() -> NaiveDate {
    NaiveDate::from_ymd_opt(1996, 1, 1).unwrap_or_default()
}

impl Default for WidgetDefaults {
    fn default() -> Self {
        Self {
            js_engine: default_js_engine(),
            width: default_width(),
            height: default_height(),
            date_from: default_date_from(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Level filter; `RUST_LOG` takes precedence
    #[serde(default = "default_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl DashboardConfig {
    pub fn load_from_str(content: &str) -> Result<Self> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file path, or create default
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)?;
            Self::load_from_str(&content)
        } else {
            let config = DashboardConfig::default();
            // Try to save default config
            if let Some(parent) = config_path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = config.save(config_path);
            Ok(config)
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(anyhow!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            ));
        }
        Ok(())
    }
}
