//! Settings remote configuration.
//!
//! `preferences` holds the defaults shown before the user's saved settings
//! arrive from the API (and what "reset" restores).

use std::collections::BTreeMap;

use mfe_schema::{Field, Schema};
use serde::{Deserialize, Serialize};

use super::common::{features_schema, flags, ApiConfig, MockDataConfig, ThemeConfig};
use super::MicroApp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsConfig {
    pub api: ApiConfig,
    pub theme: ThemeConfig,
    pub preferences: Preferences,
    pub features: BTreeMap<String, bool>,
    pub mock_data: MockDataConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub language: String,
    pub timezone: String,
    pub notifications_enabled: bool,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub auto_save: bool,
    pub compact_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            timezone: "UTC".to_string(),
            notifications_enabled: true,
            email_notifications: true,
            push_notifications: false,
            auto_save: true,
            compact_mode: false,
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::new(&[("settings", "/settings"), ("reset", "/settings/reset")]),
            theme: ThemeConfig::default(),
            preferences: Preferences::default(),
            features: flags(&[("notifications", true), ("languageSelector", true)]),
            mock_data: MockDataConfig::default(),
        }
    }
}

pub struct Settings;

impl MicroApp for Settings {
    const NAME: &'static str = "settings";
    const DEV_PORT: u16 = 3004;
    type Config = SettingsConfig;

    fn schema() -> Schema {
        let d = SettingsConfig::default();
        let p = &d.preferences;
        let preferences = Schema::new()
            .field(
                "language",
                Field::string().default(p.language.as_str()).pattern(r"^[a-z]{2}(?:-[A-Z]{2})?$"),
            )
            .field("timezone", Field::string().default(p.timezone.as_str()).min_length(1))
            .field("notificationsEnabled", Field::boolean().default(p.notifications_enabled))
            .field("emailNotifications", Field::boolean().default(p.email_notifications))
            .field("pushNotifications", Field::boolean().default(p.push_notifications))
            .field("autoSave", Field::boolean().default(p.auto_save))
            .field("compactMode", Field::boolean().default(p.compact_mode));

        Schema::new()
            .field("api", Field::object(d.api.schema()))
            .field("theme", Field::object(d.theme.schema()))
            .field("preferences", Field::object(preferences))
            .field("features", features_schema(&d.features))
            .field("mockData", Field::object(d.mock_data.schema()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_language_tag_format() {
        let schema = Settings::schema();
        assert!(schema.validate(&json!({"preferences": {"language": "de-AT"}})).is_ok());
        assert!(schema.validate(&json!({"preferences": {"language": "german"}})).is_err());
    }

    #[test]
    fn test_reset_route() {
        let config = SettingsConfig::default();
        assert_eq!(
            config.api.url_for("reset", &[]).as_deref(),
            Some("http://localhost:8000/api/settings/reset")
        );
    }
}
