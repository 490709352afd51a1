//! Conversation-context meta-commands: inspect and clear the turn history.

use std::sync::MutexGuard;
use valet_core::{
    compile_rules, AssistantState, PatternRule, SharedState, Skill, SkillContext, SkillError,
    SlotMap,
};

pub struct NluMetaSkill {
    state: SharedState,
}

impl NluMetaSkill {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    fn lock(&self) -> MutexGuard<'_, AssistantState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Skill for NluMetaSkill {
    fn name(&self) -> &str {
        "nlu_meta"
    }

    fn description(&self) -> &str {
        "Shows and clears the conversation context"
    }

    fn intents(&self) -> Vec<&'static str> {
        vec!["get_context", "clear_context"]
    }

    fn rules(&self) -> Vec<PatternRule> {
        compile_rules(&[
            (r"^(?:get |show )?context$", "get_context", 0.95),
            (r"^clear (?:the )?context$", "clear_context", 0.95),
        ])
    }

    fn handle(&self, intent: &str, _slots: &SlotMap, ctx: &SkillContext) -> Result<bool, SkillError> {
        match intent {
            "get_context" => {
                let recent: Vec<String> = {
                    let state = self.lock();
                    state
                        .context
                        .recent_entries(5)
                        .iter()
                        .map(|entry| entry.name.clone())
                        .collect()
                };
                if recent.is_empty() {
                    ctx.speak("The conversation context is empty, sir.");
                } else {
                    ctx.speak(&format!("Recent intents: {}.", recent.join(", ")));
                }
                Ok(true)
            }
            "clear_context" => {
                self.lock().context.clear();
                ctx.speak("Context cleared, sir.");
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
