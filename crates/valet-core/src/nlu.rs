//! Rule-based NLU: ordered pattern matching with confidence scoring, a keyword
//! fallback tier, and deterministic suggestions when nothing matches.
//!
//! The rule sequence is the engine's sole state. First match wins, so earlier
//! rules pre-empt later ones; skill-declared rules are inserted ahead of the
//! generic built-ins at bootstrap. `parse` never mutates the engine — rules
//! and match history change only through explicit registration calls.

use std::collections::VecDeque;

use crate::intent::{Intent, PatternRule, SlotMap};

/// Maximum number of suggestions surfaced on a recognition failure.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

/// Bounded history of intent names the router confirmed as handled, used as
/// the recency signal for suggestions.
const MATCH_HISTORY_CAP: usize = 50;

/// Confidence assigned to keyword-tier hits.
const KEYWORD_CONFIDENCE: f64 = 0.7;

pub struct NluEngine {
    rules: Vec<PatternRule>,
    keywords: Vec<(String, String)>,
    match_history: VecDeque<String>,
    suggestion_limit: usize,
}

impl NluEngine {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            keywords: Vec::new(),
            match_history: VecDeque::new(),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit.max(1);
        self
    }

    /// Append a rule at the end of the sequence (lowest priority so far).
    pub fn register_rule(&mut self, rule: PatternRule) {
        tracing::debug!(
            target: "valet::nlu",
            intent = rule.intent(),
            pattern = rule.pattern(),
            "rule registered"
        );
        self.rules.push(rule);
    }

    pub fn register_rules(&mut self, rules: impl IntoIterator<Item = PatternRule>) {
        for rule in rules {
            self.register_rule(rule);
        }
    }

    /// Insert rules ahead of everything already registered, preserving their
    /// relative order. Used for skill-declared patterns, which pre-empt the
    /// generic built-ins.
    pub fn register_rules_front(&mut self, rules: impl IntoIterator<Item = PatternRule>) {
        for (offset, rule) in rules.into_iter().enumerate() {
            self.rules.insert(offset, rule);
        }
    }

    /// Register a keyword fallback: checked only when no rule matches, at
    /// reduced confidence and with the keyword surfaced as a fuzzy match.
    pub fn register_keyword(&mut self, keyword: &str, intent: &str) {
        self.keywords
            .push((keyword.to_lowercase(), intent.to_string()));
    }

    /// Record a successfully handled intent. Called by the router after a
    /// turn resolves, never from `parse`.
    pub fn note_match(&mut self, intent_name: &str) {
        if self.match_history.len() == MATCH_HISTORY_CAP {
            self.match_history.pop_back();
        }
        self.match_history.push_front(intent_name.to_string());
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Classify text against the rule sequence, first match wins.
    pub fn parse(&self, text: &str) -> Option<Intent> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return None;
        }
        for rule in &self.rules {
            if let Some(slots) = rule.try_match(&normalized) {
                return Some(Intent::new(rule.intent(), slots, rule.confidence()));
            }
        }
        self.keyword_match(&normalized)
    }

    /// Classify text; when nothing matches, also return up to
    /// `suggestion_limit` suggestion strings ranked by recency and lexical
    /// overlap. Deterministic for a fixed history.
    pub fn parse_with_confidence(&self, text: &str) -> (Option<Intent>, Vec<String>) {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return (None, Vec::new());
        }
        if let Some(intent) = self.parse(text) {
            return (Some(intent), Vec::new());
        }
        (None, self.suggestions_for(&normalized))
    }

    fn keyword_match(&self, normalized: &str) -> Option<Intent> {
        for (keyword, intent_name) in &self.keywords {
            if normalized.contains(keyword.as_str()) {
                let mut slots = SlotMap::new();
                if intent_name == "open_application" {
                    slots.insert("app_name".to_string(), keyword.clone());
                } else if intent_name == "set_volume" {
                    if let Some(level) = first_number(normalized) {
                        slots.insert("level".to_string(), level);
                    }
                }
                return Some(
                    Intent::new(intent_name, slots, KEYWORD_CONFIDENCE)
                        .with_fuzzy_match(keyword.clone()),
                );
            }
        }
        None
    }

    /// Rank candidate intent names for a "did you mean" hint: confirmed
    /// matches (most recent first) and then rule intents in registration
    /// order, scored by token overlap with the input. Ties keep source order,
    /// so the result is stable for a fixed history.
    fn suggestions_for(&self, normalized: &str) -> Vec<String> {
        let input_tokens: Vec<&str> = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        let mut candidates: Vec<String> = Vec::new();
        for name in self
            .match_history
            .iter()
            .map(String::as_str)
            .chain(self.rules.iter().map(|r| r.intent()))
        {
            if !candidates.iter().any(|c| c == name) {
                candidates.push(name.to_string());
            }
        }

        let mut scored: Vec<(usize, String)> = candidates
            .into_iter()
            .map(|name| {
                let overlap = name
                    .split('_')
                    .filter(|part| input_tokens.contains(part))
                    .count();
                (overlap, name)
            })
            .filter(|(overlap, _)| *overlap > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(self.suggestion_limit);

        if scored.is_empty() {
            // No lexical signal: fall back to the most recent confirmed intents.
            return self
                .match_history
                .iter()
                .take(self.suggestion_limit)
                .cloned()
                .collect();
        }
        scored.into_iter().map(|(_, name)| name).collect()
    }
}

impl Default for NluEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn first_number(text: &str) -> Option<String> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    (!digits.is_empty()).then_some(digits)
}

/// Split a compound command on spoken conjunctions ("open chrome and play
/// music"). The router only applies this when the whole text failed to parse
/// as a single intent.
pub fn split_multipart(text: &str) -> Vec<String> {
    let mut parts = vec![text.to_string()];
    for separator in [" and ", " then ", " also ", ", "] {
        parts = parts
            .iter()
            .flat_map(|part| part.split(separator))
            .map(str::to_string)
            .collect();
    }
    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::PatternRule;

    fn engine_with(rules: Vec<(&str, &str, f64)>) -> NluEngine {
        let mut engine = NluEngine::new();
        for (pattern, intent, confidence) in rules {
            engine.register_rule(PatternRule::new(pattern, intent, confidence).unwrap());
        }
        engine
    }

    #[test]
    fn parse_extracts_named_slots_with_declared_confidence() {
        let engine = engine_with(vec![(r"open (?P<app>.+)", "open_application", 1.0)]);
        let intent = engine.parse("open calculator").unwrap();
        assert_eq!(intent.name, "open_application");
        assert_eq!(intent.slots.get("app").map(String::as_str), Some("calculator"));
        assert!((intent.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn earlier_rule_wins_over_later_generic_rule() {
        let engine = engine_with(vec![
            (r"volume (?P<n>\d+)", "set_volume", 0.95),
            (r"(?P<text>.+)", "free_text", 0.5),
        ]);
        let intent = engine.parse("volume 50").unwrap();
        assert_eq!(intent.name, "set_volume");
        assert_eq!(intent.slots.get("n").map(String::as_str), Some("50"));
    }

    #[test]
    fn input_is_normalized_before_matching() {
        let engine = engine_with(vec![(r"open (?P<app>.+)", "open_application", 1.0)]);
        let intent = engine.parse("  OPEN Calculator  ").unwrap();
        assert_eq!(intent.slots.get("app").map(String::as_str), Some("calculator"));
    }

    #[test]
    fn keyword_tier_fires_only_when_rules_miss() {
        let mut engine = engine_with(vec![(r"^restart the pc$", "restart_computer", 1.0)]);
        engine.register_keyword("reboot", "restart_computer");
        let intent = engine.parse("please reboot now").unwrap();
        assert_eq!(intent.name, "restart_computer");
        assert!((intent.confidence - KEYWORD_CONFIDENCE).abs() < f64::EPSILON);
        assert!(intent.fuzzy_match.is_some());
    }

    #[test]
    fn suggestions_are_capped_and_deterministic() {
        let mut engine = engine_with(vec![
            (r"^get service status$", "get_service_status", 0.95),
            (r"^stop service$", "control_service", 0.95),
            (r"^restart everything$", "restart_computer", 0.95),
        ]);
        engine.note_match("control_service");

        let (intent, first) = engine.parse_with_confidence("service please");
        assert!(intent.is_none());
        assert!(!first.is_empty() && first.len() <= DEFAULT_SUGGESTION_LIMIT);
        // Both service intents overlap on "service"; history puts control_service first.
        assert_eq!(first[0], "control_service");
        assert!(first.contains(&"get_service_status".to_string()));

        let (_, second) = engine.parse_with_confidence("service please");
        assert_eq!(first, second);
    }

    #[test]
    fn no_match_and_no_signal_yields_recent_history() {
        let mut engine = engine_with(vec![(r"^ping$", "test_network_connectivity", 0.8)]);
        engine.note_match("get_time");
        let (intent, suggestions) = engine.parse_with_confidence("frobnicate");
        assert!(intent.is_none());
        assert_eq!(suggestions, vec!["get_time".to_string()]);
    }

    #[test]
    fn multipart_split_on_conjunctions() {
        let parts = split_multipart("open chrome and play music then lock the screen");
        assert_eq!(parts, vec!["open chrome", "play music", "lock the screen"]);
    }
}
