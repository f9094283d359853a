//! Layered configuration loading
//!
//! Implements the 5-layer resolution for a micro-app's configuration:
//! 1. Hardcoded defaults
//! 2. Default file (/config.default.json)
//! 3. Project file (/config.project.json)
//! 4. Host injection entry for the app namespace
//! 5. Explicit override

mod error;
mod injection;
mod layer;
mod loader;
mod merge;
mod resolved;
mod source;

pub use error::ConfigError;
pub use injection::{read_config_file, HostInjection};
pub use layer::{LayerKind, LayerSource};
pub use loader::{ConfigLoader, Host, LoaderOptions, DEFAULT_CONFIG_PATH, PROJECT_CONFIG_PATH};
pub use merge::{deep_merge, merge_layers};
pub use resolved::{fingerprint, Outcome, ResolvedConfig};
pub use source::{ConfigFetcher, DirFetcher, FetchError, FetchedDocument, HttpFetcher, NoFetch, StaticFetcher};
