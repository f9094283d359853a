//! Layered configuration loader
//!
//! Resolves one app's configuration from, highest precedence first:
//! 1. Explicit override passed by the caller
//! 2. Host injection entry for the app's namespace
//! 3. Project file (`/config.project.json`)
//! 4. Default file (`/config.default.json`)
//! 5. Hardcoded defaults
//!
//! Every layer that is present is deep-merged on top of the ones below it.
//! Fetch failures mean "layer absent". A merged result that fails the schema
//! is discarded in favour of the hardcoded defaults.

use std::sync::Arc;
use std::time::Duration;

use mfe_schema::{Schema, ValidationIssue};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::error::{join_issues, ConfigError};
use super::injection::HostInjection;
use super::layer::{LayerKind, LayerSource};
use super::merge::merge_layers;
use super::resolved::{Outcome, ResolvedConfig};
use super::source::{ConfigFetcher, FetchError, NoFetch};

/// Page-relative path of the project-specific configuration file
pub const PROJECT_CONFIG_PATH: &str = "/config.project.json";

/// Page-relative path of the bundled default configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/config.default.json";

/// Loader tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    pub project_path: String,
    pub default_path: String,
    /// Per-fetch timeout applied by the loader (None: rely on the fetcher)
    pub fetch_timeout: Option<Duration>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            project_path: PROJECT_CONFIG_PATH.to_string(),
            default_path: DEFAULT_CONFIG_PATH.to_string(),
            fetch_timeout: None,
        }
    }
}

/// What the hosting page provides to every app it boots: a way to fetch
/// page-relative files and the namespaced injection entries.
#[derive(Clone)]
pub struct Host {
    fetcher: Arc<dyn ConfigFetcher>,
    injection: HostInjection,
}

impl Host {
    pub fn new(fetcher: Arc<dyn ConfigFetcher>) -> Self {
        Self {
            fetcher,
            injection: HostInjection::default(),
        }
    }

    /// A host with no files and no injection (hardcoded defaults plus overrides only).
    pub fn detached() -> Self {
        Self::new(Arc::new(NoFetch))
    }

    pub fn with_injection(mut self, injection: HostInjection) -> Self {
        self.injection = injection;
        self
    }

    pub fn fetcher(&self) -> &dyn ConfigFetcher {
        self.fetcher.as_ref()
    }

    pub fn injection(&self) -> &HostInjection {
        &self.injection
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("fetcher", &self.fetcher.describe())
            .field("injection", &self.injection)
            .finish()
    }
}

/// Loader for one app namespace, parameterised by schema and defaults.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    app: String,
    schema: Schema,
    defaults: Value,
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Create a loader. The hardcoded defaults must satisfy the schema on
    /// their own, since they are the last-resort result.
    pub fn new(app: impl Into<String>, schema: Schema, defaults: Value) -> Result<Self, ConfigError> {
        let app = app.into();
        if let Err(issues) = schema.validate(&defaults) {
            return Err(ConfigError::InvalidDefaults { app, issues });
        }
        if let Err(issues) = schema.check_patterns() {
            return Err(ConfigError::InvalidDefaults { app, issues });
        }
        Ok(Self {
            app,
            schema,
            defaults,
            options: LoaderOptions::default(),
        })
    }

    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn defaults(&self) -> &Value {
        &self.defaults
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Resolve the configuration. Never fails: a merged result that does not
    /// satisfy the schema is replaced by the hardcoded defaults, and the
    /// reason is recorded in the returned [`Outcome`].
    pub async fn load(&self, host: &Host, explicit: Option<Value>) -> ResolvedConfig {
        match self.resolve(host, explicit).await {
            Ok(resolved) => resolved,
            Err(issues) => {
                error!(
                    app = %self.app,
                    issues = %join_issues(&issues),
                    "configuration failed validation, using hardcoded defaults"
                );
                self.fallback(issues)
            }
        }
    }

    /// The hardcoded defaults as a resolved configuration, recording why
    /// they replaced the merged layers.
    pub fn fallback(&self, issues: Vec<ValidationIssue>) -> ResolvedConfig {
        ResolvedConfig::new(
            &self.app,
            self.defaults.clone(),
            vec![LayerSource::in_memory(LayerKind::Hardcoded)],
            Outcome::FellBack { issues },
        )
    }

    /// Resolve the configuration, reporting validation failure as an error
    /// instead of falling back.
    pub async fn load_strict(&self, host: &Host, explicit: Option<Value>) -> Result<ResolvedConfig, ConfigError> {
        self.resolve(host, explicit).await.map_err(|issues| {
            error!(app = %self.app, issues = %join_issues(&issues), "configuration failed validation");
            ConfigError::ValidationError {
                app: self.app.clone(),
                issues,
            }
        })
    }

    async fn resolve(&self, host: &Host, explicit: Option<Value>) -> Result<ResolvedConfig, Vec<ValidationIssue>> {
        let layers = self.collect_layers(host, explicit).await;

        let (sources, values): (Vec<LayerSource>, Vec<Value>) = layers.into_iter().unzip();
        let merged = merge_layers(values);
        let config = self.schema.validate(&merged)?;

        let resolved = ResolvedConfig::new(&self.app, config, sources, Outcome::Validated);
        info!(
            app = %self.app,
            source = %resolved.primary_source(),
            layers = resolved.sources.len(),
            "configuration resolved"
        );
        Ok(resolved)
    }

    /// Gather every available layer in merge order (lowest precedence first).
    async fn collect_layers(&self, host: &Host, explicit: Option<Value>) -> Vec<(LayerSource, Value)> {
        let mut layers = vec![(LayerSource::in_memory(LayerKind::Hardcoded), self.defaults.clone())];

        // Fetched sequentially: project file first, then the bundled default.
        let project = self.fetch_layer(host, LayerKind::ProjectFile, &self.options.project_path).await;
        let default = self.fetch_layer(host, LayerKind::DefaultFile, &self.options.default_path).await;
        layers.extend(default);
        layers.extend(project);

        if let Some(injected) = host.injection().get(&self.app) {
            if let Some(layer) = self.in_memory_layer(LayerKind::Injected, injected.clone()) {
                layers.push(layer);
            }
        }

        if let Some(value) = explicit {
            if let Some(layer) = self.in_memory_layer(LayerKind::Override, value) {
                layers.push(layer);
            }
        }

        layers
    }

    async fn fetch_layer(&self, host: &Host, kind: LayerKind, path: &str) -> Option<(LayerSource, Value)> {
        debug!(app = %self.app, layer = %kind, path, fetcher = %host.fetcher().describe(), "fetching configuration layer");

        let fetched = match self.options.fetch_timeout {
            Some(limit) => match tokio::time::timeout(limit, host.fetcher().fetch(path)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Network {
                    location: path.to_string(),
                    reason: format!("timed out after {:?}", limit),
                }),
            },
            None => host.fetcher().fetch(path).await,
        };

        match fetched {
            Ok(doc) => {
                debug!(app = %self.app, layer = %kind, location = %doc.location, digest = %doc.digest, "layer loaded");
                Some((LayerSource::fetched(kind, doc.location, doc.digest), doc.value))
            }
            Err(e) => {
                warn!(app = %self.app, layer = %kind, error = %e, "configuration source unavailable, skipping");
                None
            }
        }
    }

    fn in_memory_layer(&self, kind: LayerKind, value: Value) -> Option<(LayerSource, Value)> {
        if value.is_object() {
            debug!(app = %self.app, layer = %kind, "layer supplied in memory");
            Some((LayerSource::in_memory(kind), value))
        } else {
            warn!(
                app = %self.app,
                layer = %kind,
                found = mfe_schema::json_type_name(&value),
                "ignoring configuration layer that is not an object"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::source::StaticFetcher;
    use mfe_schema::Field;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new()
            .field(
                "theme",
                Field::object(Schema::new().field("mode", Field::string().default("light").one_of(&["light", "dark"]))),
            )
            .field("refreshIntervalMs", Field::integer().default(60000).range(1000, 3_600_000))
    }

    fn loader() -> ConfigLoader {
        ConfigLoader::new(
            "analytics",
            schema(),
            json!({"theme": {"mode": "light"}, "refreshIntervalMs": 60000}),
        )
        .unwrap()
    }

    fn host(fetcher: StaticFetcher) -> Host {
        Host::new(Arc::new(fetcher))
    }

    #[test]
    fn test_invalid_defaults_rejected() {
        let result = ConfigLoader::new("analytics", schema(), json!({"refreshIntervalMs": "soon"}));
        assert!(matches!(result, Err(ConfigError::InvalidDefaults { .. })));
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let schema = Schema::new().field("color", Field::string().default("#fff").pattern("(["));
        let result = ConfigLoader::new("shell", schema, json!({"color": "#fff"}));
        assert!(matches!(result, Err(ConfigError::InvalidDefaults { .. })));
    }

    #[tokio::test]
    async fn test_hardcoded_only() {
        let resolved = loader().load(&Host::detached(), None).await;

        assert_eq!(resolved.config, json!({"theme": {"mode": "light"}, "refreshIntervalMs": 60000}));
        assert_eq!(resolved.primary_source(), LayerKind::Hardcoded);
        assert!(!resolved.fell_back());
    }

    #[tokio::test]
    async fn test_project_file_beats_default_file() {
        let fetcher = StaticFetcher::new()
            .with_json(DEFAULT_CONFIG_PATH, &json!({"refreshIntervalMs": 30000, "theme": {"mode": "dark"}}))
            .with_json(PROJECT_CONFIG_PATH, &json!({"refreshIntervalMs": 15000}));

        let resolved = loader().load(&host(fetcher), None).await;

        assert_eq!(resolved.get_u64("refreshIntervalMs"), Some(15000));
        assert_eq!(resolved.get_str("theme.mode"), Some("dark"));
        let kinds: Vec<LayerKind> = resolved.sources.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![LayerKind::Hardcoded, LayerKind::DefaultFile, LayerKind::ProjectFile]
        );
    }

    #[tokio::test]
    async fn test_override_is_highest() {
        let fetcher = StaticFetcher::new().with_json(PROJECT_CONFIG_PATH, &json!({"refreshIntervalMs": 15000}));
        let host = host(fetcher).with_injection(
            HostInjection::new().with("analytics", json!({"refreshIntervalMs": 20000})),
        );

        let resolved = loader().load(&host, Some(json!({"refreshIntervalMs": 5000}))).await;

        assert_eq!(resolved.get_u64("refreshIntervalMs"), Some(5000));
        assert_eq!(resolved.primary_source(), LayerKind::Override);
    }

    #[tokio::test]
    async fn test_injection_for_other_namespace_ignored() {
        let host = Host::detached().with_injection(HostInjection::new().with("dataGrid", json!({"refreshIntervalMs": 2000})));

        let resolved = loader().load(&host, None).await;
        assert_eq!(resolved.get_u64("refreshIntervalMs"), Some(60000));
    }

    #[tokio::test]
    async fn test_non_object_override_ignored() {
        let resolved = loader().load(&Host::detached(), Some(json!("dark"))).await;

        assert_eq!(resolved.primary_source(), LayerKind::Hardcoded);
        assert!(!resolved.fell_back());
    }

    #[tokio::test]
    async fn test_validation_failure_returns_defaults() {
        let resolved = loader()
            .load(&Host::detached(), Some(json!({"theme": {"mode": "neon"}})))
            .await;

        assert!(resolved.fell_back());
        assert_eq!(&resolved.config, loader().defaults());
        assert_eq!(resolved.issues()[0].path, "theme.mode");
    }

    #[tokio::test]
    async fn test_strict_reports_validation_failure() {
        let result = loader()
            .load_strict(&Host::detached(), Some(json!({"refreshIntervalMs": 1})))
            .await;

        match result {
            Err(ConfigError::ValidationError { app, issues }) => {
                assert_eq!(app, "analytics");
                assert_eq!(issues[0].path, "refreshIntervalMs");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_custom_paths() {
        let fetcher = StaticFetcher::new().with_json("/analytics/config.json", &json!({"refreshIntervalMs": 45000}));
        let options = LoaderOptions {
            project_path: "/analytics/config.json".to_string(),
            ..LoaderOptions::default()
        };

        let resolved = loader().with_options(options).load(&host(fetcher), None).await;
        assert_eq!(resolved.get_u64("refreshIntervalMs"), Some(45000));
    }
}
