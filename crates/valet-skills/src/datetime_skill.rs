//! Time and date queries.

use chrono::Local;
use valet_core::{Skill, SkillContext, SkillError, SlotMap};

pub struct DateTimeSkill;

impl Skill for DateTimeSkill {
    fn name(&self) -> &str {
        "datetime"
    }

    fn description(&self) -> &str {
        "Answers time and date questions"
    }

    fn intents(&self) -> Vec<&'static str> {
        vec!["get_time", "get_date"]
    }

    fn handle(&self, intent: &str, _slots: &SlotMap, ctx: &SkillContext) -> Result<bool, SkillError> {
        match intent {
            "get_time" => {
                ctx.speak(&format!("It is {}.", Local::now().format("%H:%M")));
                Ok(true)
            }
            "get_date" => {
                ctx.speak(&format!("Today is {}.", Local::now().format("%A, %B %e, %Y")));
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
