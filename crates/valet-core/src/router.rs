//! Intent router: the per-turn dispatch pipeline.
//!
//! Parse → record context → confidence notice → permission gate → skill
//! dispatch → legacy dispatch → learned-command dispatch → fuzzy skill
//! fallback → terminal fallback. Every stage contains its own faults and
//! reports "not handled" instead of aborting, so the terminal fallback is
//! always reachable. The only silent exit is empty input; the only other
//! early exit is a permission denial. Non-empty input always ends in a
//! spoken response, never in an error to the caller.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::AssistantConfig;
use crate::context::{ContextEntry, ContextTracker};
use crate::intent::{Intent, SlotMap};
use crate::learning::LearningEngine;
use crate::legacy::{builtin_legacy_handlers, LegacyHandler};
use crate::nlu::{split_multipart, NluEngine};
use crate::permissions::{PermissionModel, Role};
use crate::registry::{SkillContext, SkillRegistry};
use crate::rules;
use crate::speech::SpeechOutput;

/// Mutable per-process assistant state. One exclusive lock guards the rule
/// sequence, the context history, and the learning records; the router takes
/// it only for short sections and never holds it across a skill dispatch.
pub struct AssistantState {
    pub nlu: NluEngine,
    pub context: ContextTracker,
    pub learning: LearningEngine,
}

impl AssistantState {
    /// State primed for production use: NLU seeded with the built-in rules
    /// and keyword fallbacks, learning engine restored from the learned-data
    /// snapshot when one exists.
    pub fn new(config: &AssistantConfig) -> Self {
        let mut nlu = NluEngine::new().with_suggestion_limit(config.suggestion_limit);
        nlu.register_rules(rules::builtin_rules());
        for (keyword, intent) in rules::BUILTIN_KEYWORDS.iter() {
            nlu.register_keyword(keyword, intent);
        }

        let mut learning = LearningEngine::new();
        if config.learned_data_path.exists() {
            learning.import_learned_data(&config.learned_data_path);
        }

        Self {
            nlu,
            context: ContextTracker::new(config.context_capacity),
            learning,
        }
    }

    /// Empty state with no seeded rules. Primarily for tests that register
    /// their own rule set.
    pub fn bare() -> Self {
        Self {
            nlu: NluEngine::new(),
            context: ContextTracker::default(),
            learning: LearningEngine::new(),
        }
    }
}

/// Shared handle to the assistant state, cloned into meta skills.
pub type SharedState = Arc<Mutex<AssistantState>>;

pub struct IntentRouter {
    state: SharedState,
    registry: Arc<SkillRegistry>,
    permissions: Arc<PermissionModel>,
    voice: Arc<dyn SpeechOutput>,
    legacy: HashMap<String, LegacyHandler>,
    confidence_notice_threshold: f64,
}

impl IntentRouter {
    pub fn new(
        state: SharedState,
        registry: Arc<SkillRegistry>,
        permissions: Arc<PermissionModel>,
        voice: Arc<dyn SpeechOutput>,
        config: &AssistantConfig,
    ) -> Self {
        Self {
            state,
            registry,
            permissions,
            voice,
            legacy: builtin_legacy_handlers(),
            confidence_notice_threshold: config.confidence_notice_threshold,
        }
    }

    /// Replace or add a legacy handler. Bootstrap-time only.
    pub fn register_legacy(&mut self, intent: &str, handler: LegacyHandler) {
        self.legacy.insert(intent.to_string(), handler);
    }

    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    /// Process one command through the full pipeline. Returns false only for
    /// empty input, which is dropped silently; every other input is consumed
    /// and answered through the speech interface.
    pub fn handle_command(&self, raw: &str, role: Role) -> bool {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            tracing::warn!(target: "valet::router", "empty command dropped");
            return false;
        }

        let (intent, suggestions) = {
            let state = self.lock_state();
            state.nlu.parse_with_confidence(trimmed)
        };

        let Some(intent) = intent else {
            tracing::info!(target: "valet::router", command = trimmed, "no intent recognized");
            // A phrase the user already corrected resolves here even though
            // no rule matches it yet.
            let ctx = SkillContext::new(Arc::clone(&self.voice));
            if self.try_learned(trimmed, None, role, &ctx) {
                return true;
            }
            return self.terminal_fallback(trimmed, &suggestions);
        };

        tracing::info!(
            target: "valet::router",
            intent = %intent.name,
            confidence = intent.confidence,
            "intent parsed"
        );

        // Context recording is best-effort; a failure here must not end the turn.
        {
            let mut state = self.lock_state();
            state.context.record(ContextEntry::from_intent(&intent));
        }

        if intent.confidence < self.confidence_notice_threshold {
            self.speak_confidence_notice(&intent);
        }

        if !self.permissions.is_authorized(role, &intent.name) {
            tracing::warn!(
                target: "valet::router",
                intent = %intent.name,
                role = %role,
                "permission denied"
            );
            self.voice.speak("You do not have permission for this action.");
            return true;
        }

        let ctx = SkillContext::new(Arc::clone(&self.voice));

        if self.registry.dispatch(&intent.name, &intent.slots, &ctx) {
            tracing::info!(target: "valet::router", intent = %intent.name, "handled by skill");
            self.note_success(&intent.name);
            return true;
        }

        if self.try_legacy(&intent.name, &intent.slots) {
            tracing::info!(target: "valet::router", intent = %intent.name, "handled by legacy handler");
            self.note_success(&intent.name);
            return true;
        }

        if self.try_learned(trimmed, Some(&intent), role, &ctx) {
            return true;
        }

        if self.registry.dispatch_fuzzy(&intent.name, &intent.slots, &ctx) {
            tracing::info!(target: "valet::router", intent = %intent.name, "handled by fuzzy skill claim");
            self.note_success(&intent.name);
            return true;
        }

        self.terminal_fallback(trimmed, &suggestions)
    }

    /// Route a possibly compound command. When the whole text already parses
    /// as a single intent it is routed as one turn; otherwise it is split on
    /// spoken conjunctions and each part gets its own turn.
    pub fn handle_command_multipart(&self, raw: &str, role: Role) -> bool {
        let parses_whole = {
            let state = self.lock_state();
            state.nlu.parse(raw).is_some()
        };
        if parses_whole {
            return self.handle_command(raw, role);
        }

        let parts = split_multipart(raw);
        if parts.len() <= 1 {
            return self.handle_command(raw, role);
        }

        tracing::info!(target: "valet::router", parts = parts.len(), "compound command split");
        let mut any = false;
        for part in parts {
            any |= self.handle_command(&part, role);
        }
        any
    }

    /// Stage 4: disclose a low-confidence classification before dispatching.
    fn speak_confidence_notice(&self, intent: &Intent) {
        let percent = (intent.confidence * 100.0).round() as u32;
        let mut notice = format!(
            "I believe you mean {}, though I am only {percent} percent certain.",
            intent.name
        );
        if let Some(alternative) = &intent.fuzzy_match {
            notice.push_str(&format!(" Did you mean {alternative}?"));
        }
        self.voice.speak(&notice);
    }

    /// Stage 7: legacy built-in handler keyed by intent name. Errors and
    /// panics are swallowed here and logged; the pipeline continues.
    fn try_legacy(&self, intent: &str, slots: &SlotMap) -> bool {
        let Some(handler) = self.legacy.get(intent).copied() else {
            return false;
        };
        let voice = Arc::clone(&self.voice);
        let outcome = catch_unwind(AssertUnwindSafe(|| handler(slots, voice.as_ref())));
        match outcome {
            Ok(Ok(handled)) => handled,
            Ok(Err(e)) => {
                tracing::error!(target: "valet::router", intent, error = %e, "legacy handler failed");
                false
            }
            Err(_) => {
                tracing::error!(target: "valet::router", intent, "legacy handler panicked");
                false
            }
        }
    }

    /// Learned-command dispatch: resolve through previously learned
    /// corrections. A binding for this exact phrase re-enters skill and
    /// legacy dispatch under the corrected intent name. Reached both after
    /// an unhandled parse and when no rule matched at all.
    fn try_learned(&self, raw: &str, parsed: Option<&Intent>, role: Role, ctx: &SkillContext) -> bool {
        let learned = {
            let state = self.lock_state();
            state.learning.lookup_correction(raw)
        };
        let Some(corrected) = learned else {
            return false;
        };
        if parsed.map(|intent| intent.name == corrected).unwrap_or(false) {
            return false;
        }
        // The corrected intent may require more privilege than the parsed
        // one; gate it the same way.
        if !self.permissions.is_authorized(role, &corrected) {
            tracing::warn!(
                target: "valet::router",
                intent = %corrected,
                role = %role,
                "permission denied for learned correction"
            );
            self.voice.speak("You do not have permission for this action.");
            return true;
        }
        tracing::info!(
            target: "valet::router",
            from = parsed.map(|i| i.name.as_str()).unwrap_or("<unparsed>"),
            to = %corrected,
            "rerouting through learned correction"
        );
        let empty = SlotMap::new();
        let slots = parsed.map(|intent| &intent.slots).unwrap_or(&empty);
        if self.registry.dispatch(&corrected, slots, ctx) || self.try_legacy(&corrected, slots) {
            self.note_success(&corrected);
            return true;
        }
        false
    }

    /// Stage 10: the always-reachable terminal response. Records the miss so
    /// a later correction can bind to it.
    fn terminal_fallback(&self, raw: &str, suggestions: &[String]) -> bool {
        {
            let mut state = self.lock_state();
            state.learning.record_miss(raw);
        }
        if suggestions.is_empty() {
            self.voice.speak("I could not process that instruction, sir.");
        } else {
            self.voice.speak(&format!(
                "I did not understand. Maybe you meant: {}.",
                suggestions.join(", ")
            ));
        }
        true
    }

    /// Feed the suggestion history after a resolved turn.
    fn note_success(&self, intent_name: &str) {
        let mut state = self.lock_state();
        state.nlu.note_match(intent_name);
    }

    fn lock_state(&self) -> MutexGuard<'_, AssistantState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
