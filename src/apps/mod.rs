//! The platform's micro-apps and their hardcoded default configurations.
//!
//! Each app pairs a typed configuration model (whose `Default` is the
//! last-resort fallback) with a schema describing the same shape.

mod analytics;
mod common;
mod data_grid;
mod settings;
mod shell;
mod user_management;

pub use analytics::{Analytics, AnalyticsConfig};
pub use common::{
    features_schema, ApiConfig, MockDataConfig, ThemeConfig, ThemeMode, DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_MS,
};
pub use data_grid::{DataGrid, DataGridConfig};
pub use settings::{Preferences, Settings, SettingsConfig};
pub use shell::{ErrorReportingConfig, Shell, ShellConfig};
pub use user_management::{UserManagement, UserManagementConfig};

use mfe_schema::Schema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::{ConfigError, ConfigLoader};

/// A micro-app with a namespaced, schema-checked configuration.
pub trait MicroApp: 'static {
    /// Namespace used for host injection and logging
    const NAME: &'static str;

    /// Port of the app's local dev server
    const DEV_PORT: u16;

    type Config: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static;

    fn schema() -> Schema;

    /// Hardcoded defaults as a JSON object.
    fn defaults() -> Result<Value, ConfigError> {
        serde_json::to_value(Self::Config::default())
            .map_err(|e| ConfigError::ParseError(format!("failed to serialize defaults for {}: {}", Self::NAME, e)))
    }

    fn loader() -> Result<ConfigLoader, ConfigError> {
        ConfigLoader::new(Self::NAME, Self::schema(), Self::defaults()?)
    }
}

/// Namespaces of every app on the platform, shell first.
pub const APP_NAMES: [&str; 5] = [
    Shell::NAME,
    UserManagement::NAME,
    DataGrid::NAME,
    Analytics::NAME,
    Settings::NAME,
];

/// Loader for an app looked up by namespace.
pub fn loader_for(name: &str) -> Result<ConfigLoader, ConfigError> {
    match name {
        Shell::NAME => Shell::loader(),
        UserManagement::NAME => UserManagement::loader(),
        DataGrid::NAME => DataGrid::loader(),
        Analytics::NAME => Analytics::loader(),
        Settings::NAME => Settings::loader(),
        other => Err(ConfigError::UnknownApp(other.to_string())),
    }
}

/// Dev server port for an app looked up by namespace.
pub fn dev_port_for(name: &str) -> Option<u16> {
    match name {
        Shell::NAME => Some(Shell::DEV_PORT),
        UserManagement::NAME => Some(UserManagement::DEV_PORT),
        DataGrid::NAME => Some(DataGrid::DEV_PORT),
        Analytics::NAME => Some(Analytics::DEV_PORT),
        Settings::NAME => Some(Settings::DEV_PORT),
        _ => None,
    }
}
