//! Role-based permission model: intent name -> minimum required role.
//!
//! Owner and the hybrid admin-owner role bypass the table entirely. Unlisted
//! intents default to `Standard` (fail-open); set
//! `VALET_FAIL_CLOSED_PERMISSIONS=true` to reject them instead.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Authorization level of the calling principal, assigned by the surrounding
/// application. Strict total order, except the hybrid `AdminOwner` which sits
/// above everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Standard,
    Admin,
    Owner,
    /// Hybrid role combining admin and owner privilege; always authorized.
    AdminOwner,
}

impl Role {
    /// Numeric level used for hierarchy comparison.
    pub fn level(self) -> u32 {
        match self {
            Role::Standard => 1,
            Role::Admin => 2,
            Role::Owner => 3,
            Role::AdminOwner => 999,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Standard => "standard",
            Role::Admin => "admin",
            Role::Owner => "owner",
            Role::AdminOwner => "admin_owner",
        }
    }

    /// Parse a role name, case-insensitive.
    pub fn from_name(name: &str) -> CoreResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "standard" => Ok(Role::Standard),
            "admin" => Ok(Role::Admin),
            "owner" => Ok(Role::Owner),
            "admin_owner" | "adminowner" => Ok(Role::AdminOwner),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }

    /// True for roles granted unconditional access.
    pub fn bypasses_table(self) -> bool {
        matches!(self, Role::Owner | Role::AdminOwner)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in intent -> minimum role defaults. A permissions file can extend or
/// override these at load time; the table is read-only afterwards.
pub static BUILTIN_PERMISSIONS: Lazy<HashMap<&'static str, Role>> = Lazy::new(|| {
    use Role::*;
    HashMap::from([
        // System control
        ("shutdown_computer", Admin),
        ("restart_computer", Admin),
        ("sleep_computer", Admin),
        ("lock_computer", Admin),
        ("log_off_user", Admin),
        // Process management
        ("kill_process", Admin),
        ("list_processes", Admin),
        ("set_process_priority", Admin),
        // File operations
        ("delete_path", Admin),
        ("create_folder", Admin),
        ("run_shell_command", Admin),
        ("copy_recursive", Admin),
        ("move_recursive", Admin),
        ("delete_recursive", Admin),
        ("search_files", Standard),
        ("find_duplicate_files", Standard),
        // Info queries
        ("get_cpu_info", Standard),
        ("get_memory_info", Standard),
        ("get_system_status", Standard),
        ("get_weather", Standard),
        ("get_ip_address", Standard),
        ("run_speed_test", Standard),
        ("check_disk_space", Standard),
        // Application control
        ("open_application", Standard),
        ("close_application", Standard),
        ("list_programs", Standard),
        // Media
        ("set_volume", Standard),
        ("set_brightness", Standard),
        // Utilities
        ("create_note", Standard),
        ("take_screenshot", Standard),
        ("web_search", Standard),
        // Monitoring
        ("get_system_performance", Standard),
        ("get_network_stats", Standard),
        ("get_disk_io", Standard),
        // Services
        ("control_service", Admin),
        ("get_service_status", Standard),
        ("list_services", Standard),
        // Network management
        ("test_network_connectivity", Standard),
        ("flush_dns_cache", Admin),
        ("connect_vpn", Admin),
        ("disconnect_vpn", Admin),
        ("list_vpn_connections", Standard),
        ("create_firewall_rule", Admin),
        ("delete_firewall_rule", Admin),
        ("list_firewall_rules", Standard),
        ("get_firewall_status", Standard),
        ("get_listening_ports", Standard),
        // Security
        ("get_defender_status", Standard),
        ("run_defender_scan", Admin),
        ("remove_defender_threat", Admin),
        ("detect_suspicious_processes", Standard),
        ("set_file_permissions", Admin),
        // Compliance
        ("get_activity_log", Standard),
        ("get_audit_events", Admin),
        ("generate_compliance_report", Admin),
        ("verify_security_policy", Admin),
        // Smart home
        ("smarthome_toggle", Standard),
        // AI analytics
        ("detect_anomalies", Standard),
        ("predict_disk_failure", Standard),
        ("predict_memory_leak", Standard),
        ("get_performance_suggestions", Standard),
        ("diagnose_issue", Standard),
        // NLU extensions and learning
        ("get_context", Standard),
        ("clear_context", Standard),
        ("learning_correction", Standard),
        ("show_learning_stats", Standard),
        ("optimize_learning", Standard),
        ("export_learning", Standard),
        ("show_recent_mistakes", Standard),
        // Personality
        ("greeting", Standard),
        ("how_are_you", Standard),
        ("tell_joke", Standard),
        ("get_time", Standard),
        ("get_date", Standard),
    ])
});

/// On-disk permission overrides: `[intents]` table mapping intent names to
/// role names.
#[derive(Debug, Default, Deserialize)]
struct PermissionsFile {
    #[serde(default)]
    intents: HashMap<String, Role>,
}

/// Evaluates whether a caller's role satisfies the minimum role required for
/// an intent. Pure; the table never changes after construction.
#[derive(Debug)]
pub struct PermissionModel {
    table: HashMap<String, Role>,
    /// Required role applied to unlisted intents; `None` rejects them.
    unlisted_default: Option<Role>,
}

impl PermissionModel {
    /// Model backed by the built-in defaults.
    pub fn with_builtin_table(fail_closed: bool) -> Self {
        let table = BUILTIN_PERMISSIONS
            .iter()
            .map(|(intent, role)| (intent.to_string(), *role))
            .collect();
        Self {
            table,
            unlisted_default: if fail_closed { None } else { Some(Role::Standard) },
        }
    }

    /// Built-in defaults overlaid with entries from a TOML permissions file.
    pub fn from_toml_path(path: &Path, fail_closed: bool) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: PermissionsFile = toml::from_str(&content)
            .map_err(|e| CoreError::PermissionTable(format!("{}: {}", path.display(), e)))?;
        let mut model = Self::with_builtin_table(fail_closed);
        for (intent, role) in file.intents {
            model.table.insert(intent, role);
        }
        tracing::info!(
            target: "valet::permissions",
            path = %path.display(),
            entries = model.table.len(),
            "permission table loaded"
        );
        Ok(model)
    }

    /// Minimum role required for an intent; `None` when unlisted.
    pub fn required_role(&self, intent: &str) -> Option<Role> {
        self.table.get(intent).copied()
    }

    /// Authorization check. Owner and admin-owner short-circuit to true
    /// without consulting the table.
    pub fn is_authorized(&self, role: Role, intent: &str) -> bool {
        if role.bypasses_table() {
            return true;
        }
        let required = match self.table.get(intent) {
            Some(required) => *required,
            None => match self.unlisted_default {
                Some(required) => required,
                None => return false,
            },
        };
        role.level() >= required.level()
    }
}

impl Default for PermissionModel {
    fn default() -> Self {
        Self::with_builtin_table(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_cannot_run_admin_intents() {
        let model = PermissionModel::default();
        assert!(!model.is_authorized(Role::Standard, "shutdown_computer"));
        assert!(model.is_authorized(Role::Admin, "shutdown_computer"));
    }

    #[test]
    fn owner_bypasses_table_even_for_unlisted_intents() {
        let model = PermissionModel::with_builtin_table(true);
        assert!(model.is_authorized(Role::Owner, "totally_unknown_intent"));
        assert!(model.is_authorized(Role::AdminOwner, "totally_unknown_intent"));
    }

    #[test]
    fn unlisted_intents_default_to_standard_when_fail_open() {
        let model = PermissionModel::with_builtin_table(false);
        assert!(model.is_authorized(Role::Standard, "totally_unknown_intent"));
    }

    #[test]
    fn unlisted_intents_are_rejected_when_fail_closed() {
        let model = PermissionModel::with_builtin_table(true);
        assert!(!model.is_authorized(Role::Standard, "totally_unknown_intent"));
        assert!(!model.is_authorized(Role::Admin, "totally_unknown_intent"));
    }

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!(Role::from_name("ADMIN_OWNER").unwrap(), Role::AdminOwner);
        assert_eq!(Role::from_name(" Standard ").unwrap(), Role::Standard);
        assert!(Role::from_name("sudo").is_err());
    }
}
