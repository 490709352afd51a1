//! System power and session control.
//!
//! Acknowledges the command and forwards it to the platform adapter via a
//! structured log; this crate never touches the OS power state directly.

use valet_core::{Skill, SkillContext, SkillError, SlotMap};

pub struct SystemSkill;

impl Skill for SystemSkill {
    fn name(&self) -> &str {
        "system"
    }

    fn description(&self) -> &str {
        "Shutdown, restart, sleep, and lock commands"
    }

    fn intents(&self) -> Vec<&'static str> {
        vec![
            "shutdown_computer",
            "restart_computer",
            "sleep_computer",
            "lock_computer",
            "log_off_user",
        ]
    }

    fn handle(&self, intent: &str, _slots: &SlotMap, ctx: &SkillContext) -> Result<bool, SkillError> {
        let response = match intent {
            "shutdown_computer" => "Shutting down the computer. Goodbye, sir.",
            "restart_computer" => "Restarting the computer now, sir.",
            "sleep_computer" => "Putting the computer to sleep.",
            "lock_computer" => "Locking the screen.",
            "log_off_user" => "Logging off the current session.",
            _ => return Ok(false),
        };
        tracing::info!(target: "valet::skills::system", intent, "forwarded to platform adapter");
        ctx.speak(response);
        Ok(true)
    }
}
