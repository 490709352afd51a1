//! Audio volume and display brightness.
//!
//! Keeps the last requested levels so relative commands ("volume up") have a
//! base; the actual mixer call belongs to the desktop integration.

use std::sync::Mutex;
use valet_core::{Skill, SkillContext, SkillError, SlotMap};

const STEP: i32 = 10;

pub struct VolumeSkill {
    level: Mutex<i32>,
}

impl VolumeSkill {
    pub fn new() -> Self {
        Self { level: Mutex::new(50) }
    }

    fn current(&self) -> i32 {
        *self.level.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set(&self, value: i32) -> i32 {
        let clamped = value.clamp(0, 100);
        *self.level.lock().unwrap_or_else(|e| e.into_inner()) = clamped;
        clamped
    }
}

impl Default for VolumeSkill {
    fn default() -> Self {
        Self::new()
    }
}

impl Skill for VolumeSkill {
    fn name(&self) -> &str {
        "volume"
    }

    fn description(&self) -> &str {
        "Volume and brightness control"
    }

    fn intents(&self) -> Vec<&'static str> {
        vec!["set_volume", "set_brightness"]
    }

    fn handle(&self, intent: &str, slots: &SlotMap, ctx: &SkillContext) -> Result<bool, SkillError> {
        match intent {
            "set_volume" => {
                let level = slots.get("level").and_then(|v| v.parse::<i32>().ok());
                let direction = slots.get("direction").map(String::as_str).unwrap_or("");
                let new_level = match (level, direction) {
                    (Some(value), _) => self.set(value),
                    (None, "up") => self.set(self.current() + STEP),
                    (None, "down") => self.set(self.current() - STEP),
                    // Bare "mute" arrives with no slots at all.
                    (None, _) => self.set(0),
                };
                tracing::info!(target: "valet::skills::volume", level = new_level, "volume updated");
                if new_level == 0 {
                    ctx.speak("Audio muted.");
                } else {
                    ctx.speak(&format!("Volume set to {new_level} percent."));
                }
                Ok(true)
            }
            "set_brightness" => {
                let level = slots
                    .get("level")
                    .and_then(|v| v.parse::<i32>().ok())
                    .unwrap_or(50)
                    .clamp(0, 100);
                tracing::info!(target: "valet::skills::volume", level, "brightness updated");
                ctx.speak(&format!("Brightness set to {level} percent."));
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
