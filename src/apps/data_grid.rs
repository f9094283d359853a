//! Data grid remote configuration.

use std::collections::BTreeMap;

use mfe_schema::{Field, FieldKind, Schema};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{features_schema, flags, ApiConfig, MockDataConfig, ThemeConfig};
use super::MicroApp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataGridConfig {
    pub api: ApiConfig,
    pub theme: ThemeConfig,
    pub page_size: u64,
    pub page_size_options: Vec<u64>,
    /// Visible columns, in display order
    pub columns: Vec<String>,
    pub features: BTreeMap<String, bool>,
    pub mock_data: MockDataConfig,
}

impl Default for DataGridConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::new(&[("rows", "/data"), ("row", "/data/{id}")]),
            theme: ThemeConfig::default(),
            page_size: 25,
            page_size_options: vec![10, 25, 50, 100],
            columns: ["id", "name", "category", "value", "status", "createdAt"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            features: flags(&[("sorting", true), ("filtering", true), ("export", true), ("inlineEdit", false)]),
            mock_data: MockDataConfig::default(),
        }
    }
}

pub struct DataGrid;

impl MicroApp for DataGrid {
    const NAME: &'static str = "dataGrid";
    const DEV_PORT: u16 = 3002;
    type Config = DataGridConfig;

    fn schema() -> Schema {
        let d = DataGridConfig::default();
        Schema::new()
            .field("api", Field::object(d.api.schema()))
            .field("theme", Field::object(d.theme.schema()))
            .field("pageSize", Field::integer().default(d.page_size).range(1, 1000))
            .field(
                "pageSizeOptions",
                Field::array(FieldKind::Integer)
                    .default(json!(d.page_size_options))
                    .min_length(1)
                    .items_range(1, 1000),
            )
            .field(
                "columns",
                Field::array(FieldKind::String).default(json!(d.columns)).min_length(1),
            )
            .field("features", features_schema(&d.features))
            .field("mockData", Field::object(d.mock_data.schema()))
    }
}
