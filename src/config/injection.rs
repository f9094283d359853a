//! Host-supplied configuration
//!
//! The host page prepares one object per app namespace before any app boots
//! and hands the whole set to each loader. Nothing is looked up from ambient
//! state; an app only sees what the host passed in.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use super::error::ConfigError;

/// Namespaced configuration supplied by the host. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostInjection {
    entries: BTreeMap<String, Value>,
}

impl HostInjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry for `namespace`, replacing any previous one.
    pub fn with(mut self, namespace: impl Into<String>, value: Value) -> Self {
        self.entries.insert(namespace.into(), value);
        self
    }

    /// Build from a top-level object keyed by namespace.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) => Ok(Self {
                entries: map.into_iter().collect(),
            }),
            other => Err(ConfigError::InjectionError(format!(
                "expected an object keyed by app name, found {}",
                mfe_schema::json_type_name(&other)
            ))),
        }
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(contents)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let toml_value: toml::Value = toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
        Self::from_value(toml_to_json(toml_value))
    }

    /// Load from a `.json` or `.toml` file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_value(read_config_file(path)?)
    }

    /// Entry for one namespace, if the host provided one.
    pub fn get(&self, namespace: &str) -> Option<&Value> {
        self.entries.get(namespace)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read a `.json` or `.toml` file into a JSON value.
pub fn read_config_file(path: &Path) -> Result<Value, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e))),
        "toml" => {
            let toml_value: toml::Value = toml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
            Ok(toml_to_json(toml_value))
        }
        ext => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            Value::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_get_by_namespace() {
        let injection = HostInjection::new().with("analytics", json!({"theme": {"mode": "dark"}}));

        assert_eq!(injection.get("analytics").unwrap()["theme"]["mode"], "dark");
        assert!(injection.get("dataGrid").is_none());
    }

    #[test]
    fn test_from_json_str() {
        let injection = HostInjection::from_json_str(
            r#"{"shell": {"title": "Ops"}, "settings": {"api": {"timeoutMs": 5000}}}"#,
        )
        .unwrap();

        let namespaces: Vec<&str> = injection.namespaces().collect();
        assert_eq!(namespaces, vec!["settings", "shell"]);
    }

    #[test]
    fn test_rejects_non_object() {
        let err = HostInjection::from_json_str("[]").unwrap_err();
        assert!(err.to_string().contains("found array"));
    }

    #[test]
    fn test_from_toml_str() {
        let injection = HostInjection::from_toml_str(
            r#"
            [analytics]
            refreshIntervalMs = 15000

            [analytics.theme]
            mode = "dark"
            "#,
        )
        .unwrap();

        let analytics = injection.get("analytics").unwrap();
        assert_eq!(analytics["refreshIntervalMs"], 15000);
        assert_eq!(analytics["theme"]["mode"], "dark");
    }

    #[test]
    fn test_from_file_by_extension() {
        let mut temp = Builder::new().suffix(".json").tempfile().unwrap();
        write!(temp, r#"{{"dataGrid": {{"pageSize": 50}}}}"#).unwrap();

        let injection = HostInjection::from_file(temp.path()).unwrap();
        assert_eq!(injection.get("dataGrid").unwrap()["pageSize"], 50);
    }

    #[test]
    fn test_from_file_unsupported_extension() {
        let temp = Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = HostInjection::from_file(temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref ext) if ext == "yaml"));
    }
}
