//! Configuration layers and their provenance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a configuration layer came from.
///
/// Variants are declared lowest precedence first, so the derived `Ord`
/// follows merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Hardcoded defaults compiled into the app
    Hardcoded,
    /// Bundled default file (`/config.default.json`)
    DefaultFile,
    /// Project-specific file (`/config.project.json`)
    ProjectFile,
    /// Entry supplied by the host page for this app's namespace
    Injected,
    /// Explicit override passed to the loader
    Override,
}

impl LayerKind {
    /// All kinds in merge order (lowest precedence first).
    pub const MERGE_ORDER: [LayerKind; 5] = [
        LayerKind::Hardcoded,
        LayerKind::DefaultFile,
        LayerKind::ProjectFile,
        LayerKind::Injected,
        LayerKind::Override,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hardcoded => "hardcoded",
            Self::DefaultFile => "default_file",
            Self::ProjectFile => "project_file",
            Self::Injected => "injected",
            Self::Override => "override",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contributing layer with provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSource {
    pub kind: LayerKind,

    /// URL or file path the layer was fetched from (None for in-memory layers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// SHA-256 digest of the raw fetched bytes (None for in-memory layers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl LayerSource {
    pub fn in_memory(kind: LayerKind) -> Self {
        Self {
            kind,
            location: None,
            digest: None,
        }
    }

    pub fn fetched(kind: LayerKind, location: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            kind,
            location: Some(location.into()),
            digest: Some(digest.into()),
        }
    }
}
