//! Lightweight health analytics over host telemetry: anomaly heuristics and
//! capacity projections.

use sysinfo::System;
use valet_core::{Skill, SkillContext, SkillError, SlotMap};

/// Memory utilisation above this ratio is flagged as an anomaly.
const MEMORY_ANOMALY_RATIO: f64 = 0.9;
/// A disk below this free-space ratio is flagged as a failure risk.
const DISK_LOW_FREE_RATIO: f64 = 0.1;

pub struct AnalyticsSkill;

impl AnalyticsSkill {
    fn memory_ratio() -> f64 {
        let mut sys = System::new_all();
        sys.refresh_memory();
        if sys.total_memory() == 0 {
            return 0.0;
        }
        sys.used_memory() as f64 / sys.total_memory() as f64
    }

    fn tight_disks() -> Vec<String> {
        let disks = sysinfo::Disks::new_with_refreshed_list();
        disks
            .list()
            .iter()
            .filter(|disk| {
                disk.total_space() > 0
                    && (disk.available_space() as f64 / disk.total_space() as f64)
                        < DISK_LOW_FREE_RATIO
            })
            .map(|disk| disk.mount_point().display().to_string())
            .collect()
    }
}

impl Skill for AnalyticsSkill {
    fn name(&self) -> &str {
        "analytics"
    }

    fn description(&self) -> &str {
        "Anomaly detection and capacity projections"
    }

    fn intents(&self) -> Vec<&'static str> {
        vec![
            "detect_anomalies",
            "predict_disk_failure",
            "predict_memory_leak",
            "get_performance_suggestions",
            "diagnose_issue",
        ]
    }

    fn handle(&self, intent: &str, _slots: &SlotMap, ctx: &SkillContext) -> Result<bool, SkillError> {
        match intent {
            "detect_anomalies" => {
                let ratio = Self::memory_ratio();
                if ratio > MEMORY_ANOMALY_RATIO {
                    tracing::warn!(target: "valet::skills::analytics", memory_ratio = ratio, "memory anomaly");
                    ctx.speak(&format!(
                        "Anomaly detected: memory utilisation is at {:.0} percent.",
                        ratio * 100.0
                    ));
                } else {
                    ctx.speak("No anomalies detected, sir.");
                }
                Ok(true)
            }
            "predict_disk_failure" => {
                let tight = Self::tight_disks();
                if tight.is_empty() {
                    ctx.speak("All disks have comfortable headroom, sir.");
                } else {
                    ctx.speak(&format!(
                        "These volumes are running low and deserve attention: {}.",
                        tight.join(", ")
                    ));
                }
                Ok(true)
            }
            "predict_memory_leak" => {
                let ratio = Self::memory_ratio();
                ctx.speak(&format!(
                    "Memory utilisation is at {:.0} percent; I will flag any sustained climb.",
                    ratio * 100.0
                ));
                Ok(true)
            }
            "get_performance_suggestions" => {
                let mut suggestions = Vec::new();
                if Self::memory_ratio() > 0.75 {
                    suggestions.push("closing unused applications to free memory");
                }
                if !Self::tight_disks().is_empty() {
                    suggestions.push("clearing space on the low disks");
                }
                if suggestions.is_empty() {
                    ctx.speak("The system is performing well; I have no suggestions.");
                } else {
                    ctx.speak(&format!("I would suggest {}.", suggestions.join(" and ")));
                }
                Ok(true)
            }
            "diagnose_issue" => {
                ctx.speak("Tell me the symptom and I will check the relevant telemetry, sir.");
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
