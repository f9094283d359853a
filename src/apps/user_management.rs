//! User management remote configuration.

use std::collections::BTreeMap;

use mfe_schema::{Field, Schema};
use serde::{Deserialize, Serialize};

use super::common::{features_schema, flags, ApiConfig, MockDataConfig, ThemeConfig};
use super::MicroApp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserManagementConfig {
    pub api: ApiConfig,
    pub theme: ThemeConfig,
    pub page_size: u64,
    /// Role assigned to newly created users
    pub default_role: String,
    pub features: BTreeMap<String, bool>,
    pub mock_data: MockDataConfig,
}

impl Default for UserManagementConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::new(&[("users", "/users"), ("user", "/users/{id}")]),
            theme: ThemeConfig::default(),
            page_size: 10,
            default_role: "user".to_string(),
            features: flags(&[("createUser", true), ("editUser", true), ("deleteUser", true), ("bulkActions", false)]),
            mock_data: MockDataConfig::default(),
        }
    }
}

pub struct UserManagement;

impl MicroApp for UserManagement {
    const NAME: &'static str = "userManagement";
    const DEV_PORT: u16 = 3001;
    type Config = UserManagementConfig;

    fn schema() -> Schema {
        let d = UserManagementConfig::default();
        Schema::new()
            .field("api", Field::object(d.api.schema()))
            .field("theme", Field::object(d.theme.schema()))
            .field("pageSize", Field::integer().default(d.page_size).range(1, 500))
            .field(
                "defaultRole",
                Field::string()
                    .default(d.default_role.as_str())
                    .one_of(&["admin", "user", "viewer"]),
            )
            .field("features", features_schema(&d.features))
            .field("mockData", Field::object(d.mock_data.schema()))
    }
}
