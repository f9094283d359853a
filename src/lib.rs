//! MFE Config - layered configuration for micro-frontend apps
//!
//! Every app on the platform (the container shell and its remotes) resolves
//! its configuration once at bootstrap from a precedence chain: explicit
//! override, host injection, project file, bundled default file, hardcoded
//! defaults. Layers are deep-merged and the result is checked against the
//! app's schema, falling back to the hardcoded defaults when it does not fit.

pub mod apps;
pub mod config;
pub mod context;

pub use apps::MicroApp;
pub use config::{ConfigError, ConfigLoader, Host, HostInjection, ResolvedConfig};
pub use context::{load_app, load_app_strict, ConfigContext, Platform};
pub use mfe_schema::{Field, FieldKind, Rule, Schema, ValidationIssue};
