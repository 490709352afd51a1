//! Application launch and close requests.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use valet_core::{Skill, SkillContext, SkillError, SlotMap};

/// Spoken name -> binary the desktop integration would launch.
static KNOWN_APPS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("chrome", "google-chrome"),
        ("firefox", "firefox"),
        ("notepad", "notepad"),
        ("calculator", "calc"),
        ("terminal", "terminal"),
        ("files", "file-manager"),
    ])
});

pub struct AppSkill;

impl AppSkill {
    fn app_name<'a>(slots: &'a SlotMap) -> &'a str {
        slots.get("app_name").map(String::as_str).unwrap_or("")
    }
}

impl Skill for AppSkill {
    fn name(&self) -> &str {
        "application"
    }

    fn description(&self) -> &str {
        "Opens and closes desktop applications"
    }

    fn intents(&self) -> Vec<&'static str> {
        vec!["open_application", "close_application", "list_programs"]
    }

    // Variants like open_app_with_context still belong here.
    fn claims_fuzzy(&self, intent: &str) -> bool {
        intent.starts_with("open_") || intent.starts_with("close_")
    }

    fn handle(&self, intent: &str, slots: &SlotMap, ctx: &SkillContext) -> Result<bool, SkillError> {
        match intent {
            i if i.starts_with("open_") => {
                let app = Self::app_name(slots);
                if app.is_empty() {
                    ctx.speak("Which application should I open, sir?");
                    return Ok(true);
                }
                match KNOWN_APPS.get(app) {
                    Some(binary) => {
                        tracing::info!(target: "valet::skills::app", app, binary, "launch requested");
                        ctx.speak(&format!("Opening {app}."));
                    }
                    None => {
                        tracing::warn!(target: "valet::skills::app", app, "unknown application");
                        ctx.speak(&format!("I cannot find {app} on this system, sir."));
                    }
                }
                Ok(true)
            }
            _ if intent.starts_with("close_") => {
                let app = Self::app_name(slots);
                if app.is_empty() {
                    ctx.speak("Which application should I close, sir?");
                } else {
                    tracing::info!(target: "valet::skills::app", app, "close requested");
                    ctx.speak(&format!("Closing {app}."));
                }
                Ok(true)
            }
            "list_programs" => {
                let mut names: Vec<&str> = KNOWN_APPS.keys().copied().collect();
                names.sort_unstable();
                ctx.speak(&format!("I can manage: {}.", names.join(", ")));
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
