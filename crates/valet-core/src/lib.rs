//! valet-core: assistant core library (intent model, rule-based NLU, context
//! tracking, role permissions, skill registry, dispatch pipeline, and the
//! learning/correction engine).
//!
//! The surrounding application supplies the outer layers — audio capture,
//! wake word, STT/TTS engines, any HTTP surface — and feeds raw text to the
//! [`IntentRouter`]. The router guarantees a spoken response for every
//! non-empty command; all failure signaling happens through speech, never
//! through a return code.

mod config;
mod context;
mod error;
mod intent;
mod learning;
mod legacy;
mod nlu;
mod permissions;
mod registry;
mod router;
mod rules;
mod speech;

// Intent data model
pub use intent::{Intent, PatternRule, SlotMap};

// NLU engine + built-in rule seed
pub use nlu::{split_multipart, NluEngine, DEFAULT_SUGGESTION_LIMIT};
pub use rules::{builtin_rules, compile_rules, BUILTIN_KEYWORDS};

// Conversation context
pub use context::{ContextEntry, ContextTracker, EntryKind, DEFAULT_CONTEXT_CAPACITY};

// Permissions
pub use permissions::{PermissionModel, Role, BUILTIN_PERMISSIONS};

// Skill registry and capability interface
pub use registry::{Skill, SkillContext, SkillRegistry};

// Dispatch pipeline
pub use router::{AssistantState, IntentRouter, SharedState};

// Legacy built-in handlers
pub use legacy::{builtin_legacy_handlers, LegacyHandler};

// Learning/correction engine
pub use learning::{
    LearningEngine, LearningStats, MissRecord, DEFAULT_ALIAS_THRESHOLD,
};

// Speech output boundary
pub use speech::{ConsoleVoice, SilentVoice, SpeechOutput};

// Configuration and errors
pub use config::{AssistantConfig, DEFAULT_CONFIDENCE_NOTICE};
pub use error::{CoreError, CoreResult, SkillError};
