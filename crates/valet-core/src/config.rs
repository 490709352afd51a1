//! Assistant configuration loaded from the environment.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | VALET_CONTEXT_CAPACITY | 20 | Turns kept in conversation context. |
//! | VALET_CONFIDENCE_NOTICE | 0.8 | Below this, the detected intent is disclosed before dispatch. |
//! | VALET_ALIAS_THRESHOLD | 2 | Corrections required before an alias rule is generated. |
//! | VALET_SUGGESTION_LIMIT | 3 | Max "did you mean" suggestions. |
//! | VALET_FAIL_CLOSED_PERMISSIONS | false | Reject intents missing from the permission table. |
//! | VALET_PERMISSIONS_PATH | unset | Optional TOML file overriding the built-in permission table. |
//! | VALET_LEARNED_DATA_PATH | valet_learned.json | Learned-data snapshot location. |

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::context::DEFAULT_CONTEXT_CAPACITY;
use crate::learning::DEFAULT_ALIAS_THRESHOLD;
use crate::nlu::DEFAULT_SUGGESTION_LIMIT;

/// Default confidence below which the router discloses the detected intent.
pub const DEFAULT_CONFIDENCE_NOTICE: f64 = 0.8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_context_capacity")]
    pub context_capacity: usize,
    #[serde(default = "default_confidence_notice")]
    pub confidence_notice_threshold: f64,
    #[serde(default = "default_alias_threshold")]
    pub alias_threshold: usize,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    /// When true, intents missing from the permission table are rejected
    /// instead of defaulting to the lowest role.
    #[serde(default)]
    pub fail_closed_permissions: bool,
    #[serde(default)]
    pub permissions_path: Option<PathBuf>,
    #[serde(default = "default_learned_data_path")]
    pub learned_data_path: PathBuf,
}

impl AssistantConfig {
    /// Load tunables from the environment. Unset or unparsable values fall
    /// back to the documented defaults.
    pub fn from_env() -> Self {
        Self {
            context_capacity: env_usize("VALET_CONTEXT_CAPACITY", DEFAULT_CONTEXT_CAPACITY).max(1),
            confidence_notice_threshold: env_f64(
                "VALET_CONFIDENCE_NOTICE",
                DEFAULT_CONFIDENCE_NOTICE,
            )
            .clamp(0.0, 1.0),
            alias_threshold: env_usize("VALET_ALIAS_THRESHOLD", DEFAULT_ALIAS_THRESHOLD).max(1),
            suggestion_limit: env_usize("VALET_SUGGESTION_LIMIT", DEFAULT_SUGGESTION_LIMIT).max(1),
            fail_closed_permissions: env_bool("VALET_FAIL_CLOSED_PERMISSIONS", false),
            permissions_path: env_opt_path("VALET_PERMISSIONS_PATH"),
            learned_data_path: env_opt_path("VALET_LEARNED_DATA_PATH")
                .unwrap_or_else(default_learned_data_path),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            context_capacity: default_context_capacity(),
            confidence_notice_threshold: default_confidence_notice(),
            alias_threshold: default_alias_threshold(),
            suggestion_limit: default_suggestion_limit(),
            fail_closed_permissions: false,
            permissions_path: None,
            learned_data_path: default_learned_data_path(),
        }
    }
}

fn default_context_capacity() -> usize {
    DEFAULT_CONTEXT_CAPACITY
}

fn default_confidence_notice() -> f64 {
    DEFAULT_CONFIDENCE_NOTICE
}

fn default_alias_threshold() -> usize {
    DEFAULT_ALIAS_THRESHOLD
}

fn default_suggestion_limit() -> usize {
    DEFAULT_SUGGESTION_LIMIT
}

fn default_learned_data_path() -> PathBuf {
    PathBuf::from("valet_learned.json")
}

fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => v.trim().eq_ignore_ascii_case("true") || (v.trim().is_empty() && default),
        Err(_) => default,
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    match std::env::var(name) {
        Ok(v) => v.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_f64(name: &str, default: f64) -> f64 {
    match std::env::var(name) {
        Ok(v) => v.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_opt_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}
