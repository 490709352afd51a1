//! Error types for the assistant core.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Boxed error type used at the skill boundary. The registry catches these
/// and converts them to a "not handled" result; they never cross the router.
pub type SkillError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur inside the assistant core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid pattern rule '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown role name: {0}")]
    UnknownRole(String),

    #[error("permission table error: {0}")]
    PermissionTable(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("learned-data store error: {0}")]
    LearnedStore(#[from] std::io::Error),

    #[error("learned-data encoding error: {0}")]
    LearnedEncoding(#[from] serde_json::Error),
}
