//! Skill registry: intent ownership, conflict detection, and guarded dispatch.
//!
//! At most one skill owns a given intent name. A second claim is a conflict:
//! it is logged at registration time and the first-registered skill keeps
//! ownership. Faults inside a skill handler (errors and panics alike) are
//! caught at the registry boundary and reported as "not handled"; they never
//! reach the router.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::SkillError;
use crate::intent::{PatternRule, SlotMap};
use crate::speech::SpeechOutput;

/// Capabilities handed to a skill handler. Mutable session state is passed
/// explicitly, never captured at construction.
pub struct SkillContext {
    voice: Arc<dyn SpeechOutput>,
}

impl SkillContext {
    pub fn new(voice: Arc<dyn SpeechOutput>) -> Self {
        Self { voice }
    }

    pub fn speak(&self, text: &str) {
        self.voice.speak(text);
    }

    pub fn voice(&self) -> Arc<dyn SpeechOutput> {
        Arc::clone(&self.voice)
    }
}

/// A self-contained handler unit owning one or more intents.
pub trait Skill: Send + Sync {
    /// Unique skill identifier.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str {
        ""
    }

    /// Intent names this skill owns.
    fn intents(&self) -> Vec<&'static str>;

    /// Recognition rules this skill contributes. Registered ahead of the
    /// generic built-ins so they take match priority.
    fn rules(&self) -> Vec<PatternRule> {
        Vec::new()
    }

    /// Broader claim used only by the fallback-with-skills stage, after exact
    /// ownership lookup has failed. Must be deterministic.
    fn claims_fuzzy(&self, _intent: &str) -> bool {
        false
    }

    /// Handle an intent. `Ok(true)` means the turn is resolved; `Ok(false)`
    /// and `Err(_)` both mean "not handled" to the pipeline.
    fn handle(&self, intent: &str, slots: &SlotMap, ctx: &SkillContext) -> Result<bool, SkillError>;
}

/// Registry over all registered skills and the intent -> owner map.
/// Registration happens at bootstrap; afterwards the maps are read-only.
#[derive(Default)]
pub struct SkillRegistry {
    skills: RwLock<Vec<Arc<dyn Skill>>>,
    owners: RwLock<HashMap<String, Arc<dyn Skill>>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a skill and claim its declared intents. Conflicting claims
    /// keep the first-registered owner and are logged as conflicts.
    pub fn register(&self, skill: Arc<dyn Skill>) {
        let mut owners = self.owners_mut();
        for intent in skill.intents() {
            if let Some(existing) = owners.get(intent) {
                tracing::warn!(
                    target: "valet::registry",
                    intent,
                    owner = existing.name(),
                    rejected = skill.name(),
                    "intent ownership conflict: keeping first-registered skill"
                );
                continue;
            }
            owners.insert(intent.to_string(), Arc::clone(&skill));
        }
        drop(owners);

        tracing::info!(
            target: "valet::registry",
            skill = skill.name(),
            intents = skill.intents().len(),
            "skill registered"
        );
        self.skills_mut().push(skill);
    }

    /// Recognition rules contributed by all skills, in registration order.
    pub fn skill_rules(&self) -> Vec<PatternRule> {
        self.skills().iter().flat_map(|s| s.rules()).collect()
    }

    /// All declared intents with an owner.
    pub fn declared_intents(&self) -> Vec<String> {
        let mut intents: Vec<String> = self.owners().keys().cloned().collect();
        intents.sort();
        intents
    }

    pub fn owner_of(&self, intent: &str) -> Option<Arc<dyn Skill>> {
        self.owners().get(intent).cloned()
    }

    pub fn skill_count(&self) -> usize {
        self.skills().len()
    }

    /// Dispatch to the owning skill. No owner is not an error — the pipeline
    /// simply moves to its next stage.
    pub fn dispatch(&self, intent: &str, slots: &SlotMap, ctx: &SkillContext) -> bool {
        let Some(skill) = self.owner_of(intent) else {
            return false;
        };
        guarded_handle(&skill, intent, slots, ctx)
    }

    /// Secondary, broader pass: in registration order, the first skill whose
    /// fuzzy claim accepts the intent gets a guarded handling attempt.
    pub fn dispatch_fuzzy(&self, intent: &str, slots: &SlotMap, ctx: &SkillContext) -> bool {
        let candidates: Vec<Arc<dyn Skill>> = self
            .skills()
            .iter()
            .filter(|s| s.claims_fuzzy(intent))
            .cloned()
            .collect();
        for skill in candidates {
            tracing::debug!(
                target: "valet::registry",
                intent,
                skill = skill.name(),
                "fuzzy claim attempt"
            );
            if guarded_handle(&skill, intent, slots, ctx) {
                return true;
            }
        }
        false
    }

    fn skills(&self) -> RwLockReadGuard<'_, Vec<Arc<dyn Skill>>> {
        self.skills.read().unwrap_or_else(|e| e.into_inner())
    }

    fn skills_mut(&self) -> RwLockWriteGuard<'_, Vec<Arc<dyn Skill>>> {
        self.skills.write().unwrap_or_else(|e| e.into_inner())
    }

    fn owners(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<dyn Skill>>> {
        self.owners.read().unwrap_or_else(|e| e.into_inner())
    }

    fn owners_mut(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<dyn Skill>>> {
        self.owners.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Invoke a skill handler with both error and panic containment.
fn guarded_handle(skill: &Arc<dyn Skill>, intent: &str, slots: &SlotMap, ctx: &SkillContext) -> bool {
    let outcome = catch_unwind(AssertUnwindSafe(|| skill.handle(intent, slots, ctx)));
    match outcome {
        Ok(Ok(handled)) => handled,
        Ok(Err(e)) => {
            tracing::error!(
                target: "valet::registry",
                skill = skill.name(),
                intent,
                error = %e,
                "skill handler failed"
            );
            false
        }
        Err(_) => {
            tracing::error!(
                target: "valet::registry",
                skill = skill.name(),
                intent,
                "skill handler panicked"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::SilentVoice;

    struct FixedSkill {
        name: &'static str,
        intents: Vec<&'static str>,
    }

    impl Skill for FixedSkill {
        fn name(&self) -> &str {
            self.name
        }
        fn intents(&self) -> Vec<&'static str> {
            self.intents.clone()
        }
        fn handle(&self, _: &str, _: &SlotMap, _: &SkillContext) -> Result<bool, SkillError> {
            Ok(true)
        }
    }

    struct FaultySkill;

    impl Skill for FaultySkill {
        fn name(&self) -> &str {
            "faulty"
        }
        fn intents(&self) -> Vec<&'static str> {
            vec!["boom", "kaboom"]
        }
        fn handle(&self, intent: &str, _: &SlotMap, _: &SkillContext) -> Result<bool, SkillError> {
            if intent == "kaboom" {
                panic!("deliberate test panic");
            }
            Err("deliberate test failure".into())
        }
    }

    fn ctx() -> SkillContext {
        SkillContext::new(Arc::new(SilentVoice))
    }

    #[test]
    fn conflict_keeps_first_registered_owner() {
        let registry = SkillRegistry::new();
        registry.register(Arc::new(FixedSkill {
            name: "first",
            intents: vec!["foo"],
        }));
        registry.register(Arc::new(FixedSkill {
            name: "second",
            intents: vec!["foo", "bar"],
        }));

        let owner = registry.owner_of("foo").unwrap();
        assert_eq!(owner.name(), "first");
        // The non-conflicting intent is still claimed.
        assert_eq!(registry.owner_of("bar").unwrap().name(), "second");
    }

    #[test]
    fn dispatch_without_owner_is_not_handled() {
        let registry = SkillRegistry::new();
        assert!(!registry.dispatch("nobody_home", &SlotMap::new(), &ctx()));
    }

    #[test]
    fn handler_error_is_contained_as_not_handled() {
        let registry = SkillRegistry::new();
        registry.register(Arc::new(FaultySkill));
        assert!(!registry.dispatch("boom", &SlotMap::new(), &ctx()));
    }

    #[test]
    fn handler_panic_is_contained_as_not_handled() {
        let registry = SkillRegistry::new();
        registry.register(Arc::new(FaultySkill));
        assert!(!registry.dispatch("kaboom", &SlotMap::new(), &ctx()));
    }

    #[test]
    fn fuzzy_dispatch_skips_non_claimants() {
        struct FuzzyHandler;
        impl Skill for FuzzyHandler {
            fn name(&self) -> &str {
                "fuzzy"
            }
            fn intents(&self) -> Vec<&'static str> {
                vec!["exact_only"]
            }
            fn claims_fuzzy(&self, intent: &str) -> bool {
                intent.starts_with("exact")
            }
            fn handle(&self, _: &str, _: &SlotMap, _: &SkillContext) -> Result<bool, SkillError> {
                Ok(true)
            }
        }

        let registry = SkillRegistry::new();
        registry.register(Arc::new(FuzzyHandler));
        assert!(registry.dispatch_fuzzy("exactish_variant", &SlotMap::new(), &ctx()));
        assert!(!registry.dispatch_fuzzy("unrelated", &SlotMap::new(), &ctx()));
    }
}
