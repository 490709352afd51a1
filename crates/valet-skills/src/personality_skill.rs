//! Small talk. Declares its own recognition rules, which take priority over
//! the generic built-ins.

use std::sync::Mutex;
use valet_core::{compile_rules, PatternRule, Skill, SkillContext, SkillError, SlotMap};

const JOKES: &[&str] = &[
    "I would tell you a UDP joke, but you might not get it.",
    "There are only two hard things in computer science: cache invalidation, naming things, and off-by-one errors.",
    "I asked the shell how it was doing. It said it had no prompt response.",
];

pub struct PersonalitySkill {
    next_joke: Mutex<usize>,
}

impl PersonalitySkill {
    pub fn new() -> Self {
        Self { next_joke: Mutex::new(0) }
    }
}

impl Default for PersonalitySkill {
    fn default() -> Self {
        Self::new()
    }
}

impl Skill for PersonalitySkill {
    fn name(&self) -> &str {
        "personality"
    }

    fn description(&self) -> &str {
        "Greetings and small talk"
    }

    fn intents(&self) -> Vec<&'static str> {
        vec!["greeting", "how_are_you", "tell_joke"]
    }

    fn rules(&self) -> Vec<PatternRule> {
        compile_rules(&[
            (r"^(?:hello|hi|hey)\b", "greeting", 0.9),
            (r"how are you", "how_are_you", 0.95),
            (r"tell (?:me )?a joke|make me laugh", "tell_joke", 0.9),
        ])
    }

    fn claims_fuzzy(&self, intent: &str) -> bool {
        matches!(intent, "say_hello" | "greet_user" | "small_talk")
    }

    fn handle(&self, intent: &str, _slots: &SlotMap, ctx: &SkillContext) -> Result<bool, SkillError> {
        match intent {
            "greeting" | "say_hello" | "greet_user" => {
                ctx.speak("Good day, sir. How may I be of service?");
                Ok(true)
            }
            "how_are_you" | "small_talk" => {
                ctx.speak("All subsystems nominal, sir. Thank you for asking.");
                Ok(true)
            }
            "tell_joke" => {
                let mut index = self.next_joke.lock().unwrap_or_else(|e| e.into_inner());
                ctx.speak(JOKES[*index % JOKES.len()]);
                *index = (*index + 1) % JOKES.len();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
