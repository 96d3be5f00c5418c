use std::path::PathBuf;
use thiserror::Error;

/// Message shown when a decisions file still uses the retired list names.
pub const DEPRECATED_SYNTAX_MESSAGE: &str = "The decisions file seems to have whitelist/blacklist keys which are deprecated. \
     Please replace them with permit/restrict respectively and try again! More info - \
     https://github.com/pivotal/LicenseFinder/commit/a40b22fda11b3a0efbb3c0a021381534bc998dd9";

/// Errors raised while restoring, persisting or inheriting decisions.
#[derive(Error, Debug)]
pub enum DecisionsError {
    #[error("{}", DEPRECATED_SYNTAX_MESSAGE)]
    DeprecatedSyntax { operation: String },

    #[error("authorization references environment variable `{name}`, which is not set")]
    UnresolvedSecret { name: String },

    #[error("failed to read decisions from {}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch decisions from {url}")]
    FetchFailure {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("failed to read response body from {url}")]
    ResponseBody {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("library `{name}` could not be located in any library path")]
    LibraryNotFound { name: String },

    #[error("invalid inheritance source {source_name}: {reason}")]
    InvalidSource { source_name: String, reason: String },

    #[error("inheritance cycle detected: {source_name} inherits from itself")]
    InheritanceCycle { source_name: String },

    #[error("malformed decisions record #{index}: {reason}")]
    MalformedLog { index: usize, reason: String },

    #[error("invalid decisions YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DecisionsError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        DecisionsError::MalformedLog {
            index,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DecisionsError>;
