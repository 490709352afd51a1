//! Security and compliance queries, forwarded to the security integration.
//! Audit-related requests are logged as security-relevant events.

use valet_core::{Skill, SkillContext, SkillError, SlotMap};

pub struct SecuritySkill;

impl Skill for SecuritySkill {
    fn name(&self) -> &str {
        "security"
    }

    fn description(&self) -> &str {
        "Antivirus status, scans, audit logs, and compliance reports"
    }

    fn intents(&self) -> Vec<&'static str> {
        vec![
            "get_defender_status",
            "run_defender_scan",
            "detect_suspicious_processes",
            "get_activity_log",
            "get_audit_events",
            "generate_compliance_report",
            "verify_security_policy",
        ]
    }

    fn handle(&self, intent: &str, slots: &SlotMap, ctx: &SkillContext) -> Result<bool, SkillError> {
        match intent {
            "get_defender_status" => {
                ctx.speak("The antivirus service reports real-time protection is active.");
                Ok(true)
            }
            "run_defender_scan" => {
                tracing::warn!(target: "valet::skills::security", "scan requested");
                ctx.speak("Starting a quick antivirus scan, sir.");
                Ok(true)
            }
            "detect_suspicious_processes" => {
                ctx.speak("Reviewing running processes for anomalies, sir.");
                Ok(true)
            }
            "get_activity_log" => {
                let user = slots.get("user").map(String::as_str).unwrap_or("");
                tracing::warn!(target: "valet::skills::security", user, "activity log requested");
                if user.is_empty() {
                    ctx.speak("Fetching the recent activity log.");
                } else {
                    ctx.speak(&format!("Fetching the activity log for {user}."));
                }
                Ok(true)
            }
            "get_audit_events" => {
                tracing::warn!(target: "valet::skills::security", "audit events requested");
                ctx.speak("Retrieving audit events from the security store.");
                Ok(true)
            }
            "generate_compliance_report" => {
                ctx.speak("Generating the compliance report; it will be filed shortly.");
                Ok(true)
            }
            "verify_security_policy" => {
                ctx.speak("Verifying the security policy against the baseline, sir.");
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
