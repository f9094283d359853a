//! Read-only configuration handles for app code.
//!
//! A [`ConfigContext`] is what an app's UI layer receives: the typed
//! configuration plus its provenance, shared behind an `Arc` and never
//! mutated after bootstrap.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use mfe_schema::{IssueKind, ValidationIssue};
use serde_json::Value;
use tracing::{error, info};

use crate::apps::{Analytics, DataGrid, MicroApp, Settings, Shell, UserManagement};
use crate::config::{ConfigError, Host, ResolvedConfig};

struct Inner<A: MicroApp> {
    config: A::Config,
    resolved: ResolvedConfig,
}

/// Shared, immutable configuration for one app.
pub struct ConfigContext<A: MicroApp> {
    inner: Arc<Inner<A>>,
}

impl<A: MicroApp> ConfigContext<A> {
    fn new(config: A::Config, resolved: ResolvedConfig) -> Self {
        Self {
            inner: Arc::new(Inner { config, resolved }),
        }
    }

    pub fn config(&self) -> &A::Config {
        &self.inner.config
    }

    pub fn resolved(&self) -> &ResolvedConfig {
        &self.inner.resolved
    }

    pub fn name(&self) -> &'static str {
        A::NAME
    }
}

impl<A: MicroApp> Clone for ConfigContext<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: MicroApp> Deref for ConfigContext<A> {
    type Target = A::Config;

    fn deref(&self) -> &Self::Target {
        &self.inner.config
    }
}

impl<A: MicroApp> fmt::Debug for ConfigContext<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigContext")
            .field("app", &A::NAME)
            .field("source", &self.inner.resolved.primary_source())
            .field("fingerprint", &self.inner.resolved.fingerprint)
            .finish()
    }
}

/// Load one app's configuration and wrap it for the UI layer.
///
/// Bad external configuration never surfaces as an error: values that fail
/// the schema or do not fit the typed model yield the hardcoded defaults.
/// Only an inconsistent app definition (defaults vs schema) is an error.
pub async fn load_app<A: MicroApp>(host: &Host, explicit: Option<Value>) -> Result<ConfigContext<A>, ConfigError> {
    let loader = A::loader()?;
    let resolved = loader.load(host, explicit).await;

    let context = match resolved.deserialize::<A::Config>() {
        Ok(config) => ConfigContext::new(config, resolved),
        Err(e) => {
            error!(
                app = A::NAME,
                error = %e,
                "resolved configuration does not fit the typed model, using hardcoded defaults"
            );
            let issues = vec![ValidationIssue::new(
                "",
                IssueKind::ModelMismatch {
                    reason: e.to_string(),
                },
            )];
            ConfigContext::new(A::Config::default(), loader.fallback(issues))
        }
    };
    Ok(context)
}

/// Strict variant of [`load_app`]: validation failures are returned.
pub async fn load_app_strict<A: MicroApp>(
    host: &Host,
    explicit: Option<Value>,
) -> Result<ConfigContext<A>, ConfigError> {
    let resolved = A::loader()?.load_strict(host, explicit).await?;
    let config = resolved.deserialize::<A::Config>().map_err(|e| {
        error!(app = A::NAME, error = %e, "resolved configuration does not fit the typed model");
        ConfigError::ModelMismatch {
            app: A::NAME.to_string(),
            reason: e.to_string(),
        }
    })?;
    Ok(ConfigContext::new(config, resolved))
}

/// Configuration for every app on the platform, loaded once at bootstrap.
#[derive(Debug, Clone)]
pub struct Platform {
    pub shell: ConfigContext<Shell>,
    pub user_management: ConfigContext<UserManagement>,
    pub data_grid: ConfigContext<DataGrid>,
    pub analytics: ConfigContext<Analytics>,
    pub settings: ConfigContext<Settings>,
}

impl Platform {
    /// Load each app independently against the same host.
    pub async fn bootstrap(host: &Host) -> Result<Self, ConfigError> {
        let platform = Self {
            shell: load_app(host, None).await?,
            user_management: load_app(host, None).await?,
            data_grid: load_app(host, None).await?,
            analytics: load_app(host, None).await?,
            settings: load_app(host, None).await?,
        };

        for (app, resolved) in platform.resolved() {
            info!(
                app,
                source = %resolved.primary_source(),
                fell_back = resolved.fell_back(),
                "app configured"
            );
        }
        Ok(platform)
    }

    /// Resolved configuration of every app, shell first.
    pub fn resolved(&self) -> [(&'static str, &ResolvedConfig); 5] {
        [
            (self.shell.name(), self.shell.resolved()),
            (self.user_management.name(), self.user_management.resolved()),
            (self.data_grid.name(), self.data_grid.resolved()),
            (self.analytics.name(), self.analytics.resolved()),
            (self.settings.name(), self.settings.resolved()),
        ]
    }
}
