//! Learning meta-commands: corrections, statistics, alias generation, and
//! learned-data export.
//!
//! A correction binds the most recent unresolved miss to the intent the user
//! names ("this means set_volume"). Once the same phrase has been corrected
//! to the same intent enough times, an alias rule is generated and the phrase
//! starts matching like any other pattern.

use std::path::PathBuf;
use std::sync::MutexGuard;
use valet_core::{
    compile_rules, AssistantState, PatternRule, SharedState, Skill, SkillContext, SkillError,
    SlotMap,
};

pub struct LearningSkill {
    state: SharedState,
    alias_threshold: usize,
    export_path: PathBuf,
}

impl LearningSkill {
    pub fn new(state: SharedState, alias_threshold: usize, export_path: PathBuf) -> Self {
        Self {
            state,
            alias_threshold: alias_threshold.max(1),
            export_path,
        }
    }

    fn lock(&self) -> MutexGuard<'_, AssistantState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn apply_correction(&self, spoken_intent: &str, ctx: &SkillContext) {
        let intent = spoken_intent.trim().to_lowercase().replace(' ', "_");
        if intent.is_empty() {
            ctx.speak("Which intent did you mean, sir?");
            return;
        }

        let mut guard = self.lock();
        let state = &mut *guard;
        let Some(phrase) = state.learning.recent_misses(1).first().map(|m| m.text.clone()) else {
            ctx.speak("No recent unrecognized commands to correct.");
            return;
        };

        if !state.learning.apply_correction(&phrase, &intent) {
            ctx.speak("No recent unrecognized commands to correct.");
            return;
        }

        // Promote the phrase to an alias as soon as it qualifies.
        let AssistantState { nlu, learning, .. } = state;
        learning.auto_generate_aliases(self.alias_threshold, nlu);

        ctx.speak(&format!("Learned! '{phrase}' will now trigger {intent}."));
    }
}

impl Skill for LearningSkill {
    fn name(&self) -> &str {
        "learning"
    }

    fn description(&self) -> &str {
        "Corrections, learning statistics, and alias generation"
    }

    fn intents(&self) -> Vec<&'static str> {
        vec![
            "learning_correction",
            "show_learning_stats",
            "optimize_learning",
            "export_learning",
            "show_recent_mistakes",
        ]
    }

    fn rules(&self) -> Vec<PatternRule> {
        compile_rules(&[
            (r"^this means (?P<intent>.+)$", "learning_correction", 0.99),
            (r"^that was (?P<intent>.+)$", "learning_correction", 0.99),
            (r"^i meant (?P<intent>.+)$", "learning_correction", 0.99),
            (r"^correct: (?P<intent>.+)$", "learning_correction", 0.99),
            (r"^show learning stats$", "show_learning_stats", 0.95),
            (r"^optimize learning$", "optimize_learning", 0.95),
            (r"^export learning data$", "export_learning", 0.95),
            (r"^show recent (?:mistakes|misses)$", "show_recent_mistakes", 0.95),
        ])
    }

    fn handle(&self, intent: &str, slots: &SlotMap, ctx: &SkillContext) -> Result<bool, SkillError> {
        match intent {
            "learning_correction" => {
                let spoken = slots.get("intent").map(String::as_str).unwrap_or("");
                self.apply_correction(spoken, ctx);
                Ok(true)
            }
            "show_learning_stats" => {
                let stats = self.lock().learning.statistics();
                ctx.speak(&format!(
                    "Learning statistics: {} corrections learned, {} aliases created, {} misses on record.",
                    stats.corrected, stats.aliases, stats.misses
                ));
                Ok(true)
            }
            "optimize_learning" => {
                ctx.speak("Running learning optimization.");
                let created = {
                    let mut guard = self.lock();
                    let AssistantState { nlu, learning, .. } = &mut *guard;
                    learning.auto_generate_aliases(self.alias_threshold, nlu)
                };
                if created > 0 {
                    ctx.speak(&format!("Created {created} new recognition aliases."));
                } else {
                    ctx.speak("No optimizations needed.");
                }
                Ok(true)
            }
            "export_learning" => {
                let result = self.lock().learning.export_learned_data(&self.export_path);
                match result {
                    Ok(path) => {
                        let file = path
                            .file_name()
                            .map(|f| f.to_string_lossy().to_string())
                            .unwrap_or_else(|| path.display().to_string());
                        ctx.speak(&format!("Learning data exported to {file}."));
                    }
                    Err(e) => {
                        tracing::error!(target: "valet::skills::learning", error = %e, "export failed");
                        ctx.speak("I could not export the learning data, sir.");
                    }
                }
                Ok(true)
            }
            "show_recent_mistakes" => {
                let recent: Vec<String> = self
                    .lock()
                    .learning
                    .recent_misses(3)
                    .iter()
                    .map(|m| m.text.clone())
                    .collect();
                if recent.is_empty() {
                    ctx.speak("No recent unrecognized commands.");
                } else {
                    ctx.speak(&format!("Found {} recent unrecognized commands.", recent.len()));
                    for text in recent {
                        ctx.speak(&format!("Did not understand: {text}."));
                    }
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
