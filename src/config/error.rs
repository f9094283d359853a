use mfe_schema::ValidationIssue;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid host injection: {0}")]
    InjectionError(String),

    #[error("Hardcoded defaults for '{app}' do not satisfy the schema: {}", join_issues(issues))]
    InvalidDefaults {
        app: String,
        issues: Vec<ValidationIssue>,
    },

    #[error("Configuration for '{app}' failed validation: {}", join_issues(issues))]
    ValidationError {
        app: String,
        issues: Vec<ValidationIssue>,
    },

    #[error("Configuration for '{app}' does not match its typed model: {reason}")]
    ModelMismatch { app: String, reason: String },

    #[error("Unknown app: {0}")]
    UnknownApp(String),
}

pub(crate) fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
