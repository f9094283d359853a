//! Analytics dashboard remote configuration.

use std::collections::BTreeMap;

use mfe_schema::{Field, FieldKind, Schema};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{features_schema, flags, ApiConfig, MockDataConfig, ThemeConfig};
use super::MicroApp;

const CHART_KINDS: &[&str] = &["line", "bar", "pie"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsConfig {
    pub api: ApiConfig,
    pub theme: ThemeConfig,
    /// Dashboard polling interval
    pub refresh_interval_ms: u64,
    /// Charts shown on the dashboard, in order
    pub charts: Vec<String>,
    pub features: BTreeMap<String, bool>,
    pub mock_data: MockDataConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::new(&[
                ("summary", "/analytics"),
                ("metrics", "/analytics/metrics"),
                ("chart", "/analytics/charts/{kind}"),
            ]),
            theme: ThemeConfig::default(),
            refresh_interval_ms: 60_000,
            charts: CHART_KINDS.iter().map(|c| c.to_string()).collect(),
            features: flags(&[("autoRefresh", true), ("exportCsv", false)]),
            mock_data: MockDataConfig::default(),
        }
    }
}

pub struct Analytics;

impl MicroApp for Analytics {
    const NAME: &'static str = "analytics";
    const DEV_PORT: u16 = 3003;
    type Config = AnalyticsConfig;

    fn schema() -> Schema {
        let d = AnalyticsConfig::default();
        Schema::new()
            .field("api", Field::object(d.api.schema()))
            .field("theme", Field::object(d.theme.schema()))
            .field(
                "refreshIntervalMs",
                Field::integer()
                    .default(d.refresh_interval_ms)
                    .range(1_000, 3_600_000)
                    .describe("Dashboard polling interval in milliseconds"),
            )
            .field("charts", Field::array(FieldKind::String).default(json!(d.charts)))
            .field("features", features_schema(&d.features))
            .field("mockData", Field::object(d.mock_data.schema()))
    }
}

impl AnalyticsConfig {
    /// Charts that this build knows how to render; unknown kinds are skipped.
    pub fn renderable_charts(&self) -> impl Iterator<Item = &str> {
        self.charts
            .iter()
            .map(|c| c.as_str())
            .filter(|c| CHART_KINDS.contains(c))
    }
}
