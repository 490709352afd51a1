//! valet-skills: built-in skill implementations for the valet assistant.
//!
//! Each skill is a self-contained handler owning a set of intents; some also
//! declare their own recognition rules, which are registered ahead of the
//! generic built-ins. Discovery is deliberately explicit: the host constructs
//! every skill and registers it, no runtime scanning.

use std::sync::Arc;

use valet_core::{AssistantConfig, SharedState, Skill};

mod analytics_skill;
mod app_skill;
mod datetime_skill;
mod learning_skill;
mod monitoring_skill;
mod network_skill;
mod nlu_skill;
mod personality_skill;
mod security_skill;
mod service_skill;
mod storage_skill;
mod system_skill;
mod volume_skill;

pub use analytics_skill::AnalyticsSkill;
pub use app_skill::AppSkill;
pub use datetime_skill::DateTimeSkill;
pub use learning_skill::LearningSkill;
pub use monitoring_skill::MonitoringSkill;
pub use network_skill::NetworkSkill;
pub use nlu_skill::NluMetaSkill;
pub use personality_skill::PersonalitySkill;
pub use security_skill::SecuritySkill;
pub use service_skill::ServiceSkill;
pub use storage_skill::StorageSkill;
pub use system_skill::SystemSkill;
pub use volume_skill::VolumeSkill;

/// Construct the full built-in skill set in canonical registration order.
/// The meta skills get a handle to the shared assistant state; everything
/// else is stateless or self-contained.
pub fn builtin_skills(state: SharedState, config: &AssistantConfig) -> Vec<Arc<dyn Skill>> {
    vec![
        Arc::new(PersonalitySkill::new()),
        Arc::new(DateTimeSkill),
        Arc::new(SystemSkill),
        Arc::new(AppSkill),
        Arc::new(VolumeSkill::new()),
        Arc::new(MonitoringSkill),
        Arc::new(NetworkSkill),
        Arc::new(ServiceSkill),
        Arc::new(StorageSkill),
        Arc::new(SecuritySkill),
        Arc::new(AnalyticsSkill),
        Arc::new(NluMetaSkill::new(Arc::clone(&state))),
        Arc::new(LearningSkill::new(
            state,
            config.alias_threshold,
            config.learned_data_path.clone(),
        )),
    ]
}
