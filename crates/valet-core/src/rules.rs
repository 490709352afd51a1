//! Built-in generic recognition rules and keyword fallbacks.
//!
//! These seed the NLU engine at bootstrap, *after* any skill-declared rules,
//! so a skill can always pre-empt a generic pattern. Order within this list
//! matters: more specific patterns sit above broader ones.

use once_cell::sync::Lazy;

use crate::intent::PatternRule;

/// (pattern, intent, confidence) triples for the generic built-in rules.
static BUILTIN_RULE_SPECS: Lazy<Vec<(&'static str, &'static str, f64)>> = Lazy::new(|| {
    vec![
        // System control (anchored: bare verbs must not swallow longer commands)
        (r"^(?:shutdown|shut down|power off)(?: the)?(?: computer| pc)?$", "shutdown_computer", 1.0),
        (r"^(?:restart|reboot)(?: the)?(?: computer| pc)?$", "restart_computer", 1.0),
        (r"\b(?:hibernate|go to sleep)\b", "sleep_computer", 0.9),
        (r"\block(?: the)?(?: computer| screen)\b", "lock_computer", 0.9),
        // System info
        (r"(?:get |show |what'?s |what is )?(?:my )?\bip(?: address)?\b", "get_ip_address", 0.95),
        (r"(?:get |show |what'?s |what is )?(?:the )?\bcpu(?: info| usage)?\b", "get_cpu_info", 0.9),
        (r"(?:get |show |what'?s |what is )?(?:the )?\bmemory(?: info| usage)?\b", "get_memory_info", 0.9),
        (r"system (?:status|health|info)", "get_system_status", 0.95),
        (r"disk space", "check_disk_space", 0.95),
        // Monitoring
        (r"(?:get |show )?system performance", "get_system_performance", 0.95),
        (r"(?:get |show )?network stats", "get_network_stats", 0.95),
        (r"(?:get |show )?disk io", "get_disk_io", 0.9),
        // Network
        (r"(?:run |do )?speed test", "run_speed_test", 0.95),
        (r"test (?:network |internet )?connect(?:ion|ivity)?", "test_network_connectivity", 0.9),
        (r"\bping\b", "test_network_connectivity", 0.8),
        // Volume
        (r"(?:set |change )?volume(?: to)? (?P<level>\d+)", "set_volume", 0.95),
        (r"volume (?P<direction>up|down)", "set_volume", 0.9),
        (r"\bmute\b", "set_volume", 0.9),
        // Time and date
        (r"what(?:'s| is) the time|current time", "get_time", 1.0),
        (r"what(?:'s| is) (?:the |today'?s )?date", "get_date", 1.0),
        // Services
        (r"list (?:all )?services", "list_services", 0.95),
        (r"(?P<action>start|stop|restart) service (?P<name>.+)", "control_service", 0.95),
        (r"get service status (?P<name>.+)", "get_service_status", 0.95),
        // Smart home (state both before and after the device name)
        (r"turn (?P<state>on|off) (?P<device>.+)", "smarthome_toggle", 0.9),
        (r"turn (?P<device>.+?) (?P<state>on|off)\b", "smarthome_toggle", 0.9),
        // Security and compliance
        (r"(?:get |show )?defender status", "get_defender_status", 0.95),
        (r"run defender scan", "run_defender_scan", 0.95),
        (r"(?:get |show )?activity log(?: for user (?P<user>\w+))?", "get_activity_log", 0.95),
        (r"(?:get |show )?audit (?:log|events)", "get_audit_events", 0.95),
        (r"generate compliance report", "generate_compliance_report", 0.95),
        // Analytics
        (r"detect anomalies", "detect_anomalies", 0.95),
        (r"predict disk failure", "predict_disk_failure", 0.95),
        (r"(?:get |show )?performance suggestions", "get_performance_suggestions", 0.9),
        // Application control (after every more specific verb pattern)
        (r"\bopen (?P<app_name>.+)", "open_application", 0.95),
        (r"\bclose (?P<app_name>.+)", "close_application", 0.95),
        (r"\blaunch (?P<app_name>.+)", "open_application", 0.9),
        // File operations
        (r"(?:create|make) folder (?P<path>.+)", "create_folder", 0.95),
        (r"delete (?P<path>.+)", "delete_path", 0.9),
        (r"\bsearch(?: for)? (?P<query>.+)", "web_search", 0.85),
        (r"\bfind (?P<query>.+)", "search_files", 0.85),
    ]
});

/// Keyword fallbacks, consulted only when no rule matches.
pub static BUILTIN_KEYWORDS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("shutdown", "shutdown_computer"),
        ("reboot", "restart_computer"),
        ("volume", "set_volume"),
        ("time", "get_time"),
        ("date", "get_date"),
        ("weather", "get_weather"),
        ("notepad", "open_application"),
        ("calculator", "open_application"),
        ("chrome", "open_application"),
        ("services", "list_services"),
        ("performance", "get_system_performance"),
    ]
});

/// Compile (pattern, intent, confidence) specs, logging and skipping any that
/// fail to compile. Static rule tables are expected to never lose entries;
/// the tests pin that down.
pub fn compile_rules(specs: &[(&str, &str, f64)]) -> Vec<PatternRule> {
    specs
        .iter()
        .filter_map(|(pattern, intent, confidence)| {
            match PatternRule::new(pattern, intent, *confidence) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    tracing::error!(target: "valet::nlu", error = %e, "rule rejected");
                    None
                }
            }
        })
        .collect()
}

/// Compile the built-in rule set.
pub fn builtin_rules() -> Vec<PatternRule> {
    compile_rules(&BUILTIN_RULE_SPECS)
}
