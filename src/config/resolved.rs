//! Resolved configuration with provenance
//!
//! The resolved config captures the merged, validated configuration plus
//! information about where it came from and whether validation passed.

use chrono::{DateTime, Utc};
use mfe_schema::ValidationIssue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::layer::{LayerKind, LayerSource};

/// How the final configuration was arrived at.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The merged layers satisfied the schema
    Validated,
    /// The merged layers failed validation; hardcoded defaults were used
    FellBack { issues: Vec<ValidationIssue> },
}

/// Resolved configuration for one app
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// App namespace
    pub app: String,

    /// When this config was resolved
    pub created_at: DateTime<Utc>,

    /// The configuration object
    pub config: Value,

    /// Layers that make up `config`, in merge order (lowest precedence first)
    pub sources: Vec<LayerSource>,

    pub outcome: Outcome,

    /// SHA-256 of the canonical (RFC 8785) JSON of `config`
    pub fingerprint: String,
}

impl ResolvedConfig {
    pub(crate) fn new(app: &str, config: Value, sources: Vec<LayerSource>, outcome: Outcome) -> Self {
        let fingerprint = fingerprint(&config);
        Self {
            app: app.to_string(),
            created_at: Utc::now(),
            config,
            sources,
            outcome,
            fingerprint,
        }
    }

    /// Highest-precedence layer that contributed.
    pub fn primary_source(&self) -> LayerKind {
        self.sources
            .iter()
            .map(|s| s.kind)
            .max()
            .unwrap_or(LayerKind::Hardcoded)
    }

    pub fn fell_back(&self) -> bool {
        matches!(self.outcome, Outcome::FellBack { .. })
    }

    /// Issues that caused a fallback (empty when validated)
    pub fn issues(&self) -> &[ValidationIssue] {
        match &self.outcome {
            Outcome::Validated => &[],
            Outcome::FellBack { issues } => issues,
        }
    }

    /// Get a config value by path (dot-separated)
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.config;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn get_u64(&self, path: &str) -> Option<u64> {
        self.get(path).and_then(|v| v.as_u64())
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }

    /// Deserialize the configuration into a typed model.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.config.clone())
    }

    /// Serialize with provenance
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// SHA-256 over the canonical JSON form of `value`, hex encoded.
pub fn fingerprint(value: &Value) -> String {
    let bytes = serde_json_canonicalizer::to_vec(value).unwrap_or_else(|_| value.to_string().into_bytes());
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    hex::encode(hasher.finalize())
}
