//! Host telemetry: CPU, memory, disk, and network summaries via sysinfo.

use sysinfo::System;
use valet_core::{Skill, SkillContext, SkillError, SlotMap};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub struct MonitoringSkill;

impl MonitoringSkill {
    fn refreshed_system() -> System {
        let mut sys = System::new_all();
        sys.refresh_all();
        sys
    }
}

impl Skill for MonitoringSkill {
    fn name(&self) -> &str {
        "monitoring"
    }

    fn description(&self) -> &str {
        "Reports CPU, memory, disk, and network state"
    }

    fn intents(&self) -> Vec<&'static str> {
        vec![
            "get_cpu_info",
            "get_memory_info",
            "get_system_status",
            "get_system_performance",
            "check_disk_space",
            "get_network_stats",
            "get_disk_io",
        ]
    }

    fn claims_fuzzy(&self, intent: &str) -> bool {
        intent.starts_with("get_")
            && ["cpu", "memory", "disk", "network", "performance", "system"]
                .iter()
                .any(|topic| intent.contains(topic))
    }

    fn handle(&self, intent: &str, _slots: &SlotMap, ctx: &SkillContext) -> Result<bool, SkillError> {
        match intent {
            i if i.starts_with("get_") && i.contains("cpu") => {
                let sys = Self::refreshed_system();
                let brand = sys
                    .cpus()
                    .first()
                    .map(|c| c.brand().to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                ctx.speak(&format!(
                    "{} cores of {}, currently at {:.0} percent load.",
                    sys.cpus().len(),
                    brand.trim(),
                    sys.global_cpu_info().cpu_usage()
                ));
                Ok(true)
            }
            i if i.starts_with("get_") && i.contains("memory") => {
                let sys = Self::refreshed_system();
                ctx.speak(&format!(
                    "{:.1} of {:.1} gigabytes of memory in use.",
                    sys.used_memory() as f64 / GIB,
                    sys.total_memory() as f64 / GIB
                ));
                Ok(true)
            }
            "get_system_status" | "get_system_performance" => {
                let sys = Self::refreshed_system();
                let memory_pct = if sys.total_memory() == 0 {
                    0.0
                } else {
                    sys.used_memory() as f64 / sys.total_memory() as f64 * 100.0
                };
                ctx.speak(&format!(
                    "CPU at {:.0} percent, memory at {memory_pct:.0} percent, {} processes running.",
                    sys.global_cpu_info().cpu_usage(),
                    sys.processes().len()
                ));
                Ok(true)
            }
            "check_disk_space" | "get_disk_io" => {
                let disks = sysinfo::Disks::new_with_refreshed_list();
                if disks.list().is_empty() {
                    ctx.speak("No disks visible from this process, sir.");
                    return Ok(true);
                }
                let summary: Vec<String> = disks
                    .list()
                    .iter()
                    .map(|disk| {
                        format!(
                            "{} has {:.0} gigabytes free",
                            disk.mount_point().display(),
                            disk.available_space() as f64 / GIB
                        )
                    })
                    .collect();
                ctx.speak(&format!("{}.", summary.join(", ")));
                Ok(true)
            }
            i if i.contains("network") => {
                let networks = sysinfo::Networks::new_with_refreshed_list();
                let total_rx: u64 = networks.iter().map(|(_, data)| data.total_received()).sum();
                let total_tx: u64 = networks.iter().map(|(_, data)| data.total_transmitted()).sum();
                ctx.speak(&format!(
                    "{} interfaces, {:.1} gigabytes received and {:.1} sent since boot.",
                    networks.iter().count(),
                    total_rx as f64 / GIB,
                    total_tx as f64 / GIB
                ));
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
