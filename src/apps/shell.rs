//! Container (shell) application configuration.
//!
//! The shell owns navigation, authentication and the list of remote apps it
//! mounts, so its configuration carries the remote entry URLs.

use std::collections::BTreeMap;

use mfe_schema::{Field, FieldKind, Schema};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{features_schema, flags, ApiConfig, ThemeConfig, HTTP_URL_PATTERN};
use super::MicroApp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellConfig {
    pub title: String,
    /// Remote name -> remote entry URL
    pub remotes: BTreeMap<String, String>,
    pub api: ApiConfig,
    pub theme: ThemeConfig,
    pub features: BTreeMap<String, bool>,
    pub error_reporting: ErrorReportingConfig,
}

/// Where client-side errors are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReportingConfig {
    pub enabled: bool,
    pub endpoint: String,
    /// Errors buffered before a flush
    pub batch_size: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        let remotes = [
            ("userManagement", 3001),
            ("dataGrid", 3002),
            ("analytics", 3003),
            ("settings", 3004),
        ]
        .iter()
        .map(|(name, port)| (name.to_string(), format!("http://localhost:{}/remoteEntry.js", port)))
        .collect();

        Self {
            title: "Micro-Frontend Platform".to_string(),
            remotes,
            api: ApiConfig::new(&[
                ("login", "/auth/login"),
                ("refresh", "/auth/refresh"),
                ("logout", "/auth/logout"),
                ("me", "/auth/me"),
            ]),
            theme: ThemeConfig::default(),
            features: flags(&[("authentication", true), ("errorReporting", true), ("darkModeToggle", true)]),
            error_reporting: ErrorReportingConfig {
                enabled: true,
                endpoint: "http://localhost:8000/api/errors".to_string(),
                batch_size: 10,
            },
        }
    }
}

/// The container application.
pub struct Shell;

impl MicroApp for Shell {
    const NAME: &'static str = "shell";
    const DEV_PORT: u16 = 3000;
    type Config = ShellConfig;

    fn schema() -> Schema {
        let d = ShellConfig::default();
        Schema::new()
            .field("title", Field::string().default(d.title.as_str()).min_length(1))
            .field(
                "remotes",
                Field::map(FieldKind::String)
                    .default(json!(d.remotes))
                    .describe("Remote app name to remote entry URL"),
            )
            .field("api", Field::object(d.api.schema()))
            .field("theme", Field::object(d.theme.schema()))
            .field("features", features_schema(&d.features))
            .field(
                "errorReporting",
                Field::object(
                    Schema::new()
                        .field("enabled", Field::boolean().default(d.error_reporting.enabled))
                        .field(
                            "endpoint",
                            Field::string()
                                .default(d.error_reporting.endpoint.as_str())
                                .pattern(HTTP_URL_PATTERN),
                        )
                        .field(
                            "batchSize",
                            Field::integer().default(d.error_reporting.batch_size).range(1, 1000),
                        ),
                ),
            )
    }
}
