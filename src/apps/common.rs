//! Configuration sections shared by every micro-app.

use std::collections::BTreeMap;

use mfe_schema::{Field, FieldKind, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Base URL of the mock data service API
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

pub const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;

pub(crate) const HEX_COLOR_PATTERN: &str = r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$";

pub(crate) const HTTP_URL_PATTERN: &str = r"^https?://";

/// REST API access: base URL, timeout and named route templates.
///
/// Route templates use `{name}` placeholders, e.g. `/users/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub routes: BTreeMap<String, String>,
}

impl ApiConfig {
    pub fn new(routes: &[(&str, &str)]) -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_ms: DEFAULT_API_TIMEOUT_MS,
            routes: routes
                .iter()
                .map(|(name, template)| (name.to_string(), template.to_string()))
                .collect(),
        }
    }

    /// Schema for this section with `self` as the defaults.
    pub fn schema(&self) -> Schema {
        Schema::new()
            .field(
                "baseUrl",
                Field::string()
                    .default(self.base_url.as_str())
                    .pattern(HTTP_URL_PATTERN)
                    .describe("Base URL of the REST API"),
            )
            .field(
                "timeoutMs",
                Field::integer()
                    .default(self.timeout_ms)
                    .range(100, 120_000)
                    .describe("Request timeout in milliseconds"),
            )
            .field(
                "routes",
                Field::map(FieldKind::String)
                    .default(json!(self.routes))
                    .describe("Named route templates relative to baseUrl"),
            )
    }

    /// Expand a route template and join it onto the base URL.
    ///
    /// Returns None for an unknown route or when a placeholder is left unfilled.
    pub fn url_for(&self, route: &str, params: &[(&str, &str)]) -> Option<String> {
        let mut path = self.routes.get(route)?.clone();
        for (name, value) in params {
            path = path.replace(&format!("{{{}}}", name), value);
        }
        if path.contains('{') {
            return None;
        }
        Some(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Theme overrides applied on top of the component library's theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub mode: ThemeMode,
    pub primary_color: String,
    pub secondary_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Light,
            primary_color: "#61dafb".to_string(),
            secondary_color: "#ff6b6b".to_string(),
        }
    }
}

impl ThemeConfig {
    pub fn schema(&self) -> Schema {
        let mode = match self.mode {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        Schema::new()
            .field("mode", Field::string().default(mode).one_of(&["light", "dark"]))
            .field(
                "primaryColor",
                Field::string()
                    .default(self.primary_color.as_str())
                    .pattern(HEX_COLOR_PATTERN),
            )
            .field(
                "secondaryColor",
                Field::string()
                    .default(self.secondary_color.as_str())
                    .pattern(HEX_COLOR_PATTERN),
            )
    }
}

/// Canned data served instead of calling the API (demo and offline use).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockDataConfig {
    pub enabled: bool,
    /// Artificial latency added to mocked responses
    pub delay_ms: u64,
    /// Fixture payloads keyed by route name
    pub fixtures: BTreeMap<String, Value>,
}

impl MockDataConfig {
    pub fn schema(&self) -> Schema {
        Schema::new()
            .field("enabled", Field::boolean().default(self.enabled))
            .field("delayMs", Field::integer().default(self.delay_ms).range(0, 10_000))
            .field("fixtures", Field::map(FieldKind::Any).default(json!(self.fixtures)))
    }
}

/// Feature flag map schema with the given defaults.
pub fn features_schema(defaults: &BTreeMap<String, bool>) -> Field {
    Field::map(FieldKind::Boolean)
        .default(json!(defaults))
        .describe("Feature flags keyed by name")
}

pub(crate) fn flags(entries: &[(&str, bool)]) -> BTreeMap<String, bool> {
    entries
        .iter()
        .map(|(name, on)| (name.to_string(), *on))
        .collect()
}
