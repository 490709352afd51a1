//! Intent data model: classified commands, extracted slots, and pattern rules.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};

/// Named parameters extracted from a command. Keys are defined per pattern;
/// insertion order carries no meaning.
pub type SlotMap = HashMap<String, String>;

/// A classified user command. Built only by the NLU engine and never mutated
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// Intent identifier (e.g. `open_application`).
    pub name: String,
    /// Extracted slot values. Absent optional captures are present as empty
    /// strings, so consumers must tolerate `""`.
    pub slots: SlotMap,
    /// Classification certainty in `[0, 1]`.
    pub confidence: f64,
    /// Near-miss alternative surfaced by the keyword fallback tier, used for
    /// the "did you mean" clarification.
    pub fuzzy_match: Option<String>,
}

impl Intent {
    pub fn new(name: impl Into<String>, slots: SlotMap, confidence: f64) -> Self {
        Self {
            name: name.into(),
            slots,
            confidence: confidence.clamp(0.0, 1.0),
            fuzzy_match: None,
        }
    }

    pub fn with_fuzzy_match(mut self, alternative: impl Into<String>) -> Self {
        self.fuzzy_match = Some(alternative.into());
        self
    }
}

/// One recognition rule: a regex matcher, the intent it classifies to, and the
/// base confidence assigned on a hit. Rule *order* is the NLU engine's match
/// priority: first match wins.
#[derive(Debug, Clone)]
pub struct PatternRule {
    matcher: Regex,
    intent: String,
    confidence: f64,
}

impl PatternRule {
    /// Compile a rule from a regex pattern. Named capture groups become slots.
    pub fn new(pattern: &str, intent: &str, confidence: f64) -> CoreResult<Self> {
        let matcher = Regex::new(pattern).map_err(|source| CoreError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            matcher,
            intent: intent.to_string(),
            confidence: confidence.clamp(0.0, 1.0),
        })
    }

    /// Build an exact-match rule for a literal phrase. Used by the learning
    /// engine when it promotes a repeated correction to an alias.
    pub fn literal(text: &str, intent: &str, confidence: f64) -> CoreResult<Self> {
        let pattern = format!(r"^\s*{}\s*$", regex::escape(text.trim()));
        Self::new(&pattern, intent, confidence)
    }

    pub fn intent(&self) -> &str {
        &self.intent
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    /// Match the rule against normalized text. On a hit, returns the slot map
    /// built from named capture groups: values trimmed, absent optional
    /// captures mapped to the empty string rather than omitted.
    pub fn try_match(&self, text: &str) -> Option<SlotMap> {
        let caps = self.matcher.captures(text)?;
        let mut slots = SlotMap::new();
        for group in self.matcher.capture_names().flatten() {
            let value = caps
                .name(group)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            slots.insert(group.to_string(), value);
        }
        Some(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_captures_become_slots() {
        let rule = PatternRule::new(r"open (?P<app>.+)", "open_application", 1.0).unwrap();
        let slots = rule.try_match("open calculator").unwrap();
        assert_eq!(slots.get("app").map(String::as_str), Some("calculator"));
    }

    #[test]
    fn absent_optional_capture_is_empty_string() {
        let rule = PatternRule::new(
            r"get activity log(?: for user (?P<user>\w+))?",
            "get_activity_log",
            0.95,
        )
        .unwrap();
        let slots = rule.try_match("get activity log").unwrap();
        assert_eq!(slots.get("user").map(String::as_str), Some(""));
    }

    #[test]
    fn literal_rule_matches_whole_input_only() {
        let rule = PatternRule::literal("xyzzy", "magic_word", 0.99).unwrap();
        assert!(rule.try_match("xyzzy").is_some());
        assert!(rule.try_match("  xyzzy  ").is_some());
        assert!(rule.try_match("say xyzzy twice").is_none());
    }

    #[test]
    fn invalid_pattern_is_an_error_not_a_panic() {
        let err = PatternRule::new(r"open (?P<app", "open_application", 1.0);
        assert!(err.is_err());
    }

    #[test]
    fn confidence_is_clamped() {
        let rule = PatternRule::new(r"ping", "test_network_connectivity", 1.7).unwrap();
        assert!((rule.confidence() - 1.0).abs() < f64::EPSILON);
    }
}
