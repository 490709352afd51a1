//! Integration test: built-in skill behavior through the capability
//! interface, without the router in the loop.
//!
//! ## Scenarios
//! 1. Volume: absolute, relative, and mute handling with clamped levels.
//! 2. Applications: known apps launch, unknown apps get a spoken refusal.
//! 3. Learning meta skill: correction binding, stats, and export.
//! 4. Context meta skill: show and clear.

use std::sync::{Arc, Mutex};

use valet_core::{
    AssistantConfig, AssistantState, ContextEntry, Intent, SharedState, Skill, SkillContext,
    SlotMap, SpeechOutput,
};
use valet_skills::{AppSkill, LearningSkill, NluMetaSkill, VolumeSkill};

#[derive(Default)]
struct RecordingVoice {
    spoken: Mutex<Vec<String>>,
}

impl RecordingVoice {
    fn last(&self) -> String {
        self.spoken.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl SpeechOutput for RecordingVoice {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

fn recording_ctx() -> (SkillContext, Arc<RecordingVoice>) {
    let voice = Arc::new(RecordingVoice::default());
    let voice_dyn: Arc<dyn SpeechOutput> = Arc::clone(&voice) as Arc<dyn SpeechOutput>;
    (SkillContext::new(voice_dyn), voice)
}

fn shared_state() -> SharedState {
    Arc::new(Mutex::new(AssistantState::bare()))
}

fn slots(pairs: &[(&str, &str)]) -> SlotMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ===========================================================================
// 1: volume handling
// ===========================================================================

#[test]
fn volume_steps_and_clamps() {
    let skill = VolumeSkill::new();
    let (ctx, voice) = recording_ctx();

    skill.handle("set_volume", &slots(&[("level", "95")]), &ctx).unwrap();
    assert_eq!(voice.last(), "Volume set to 95 percent.");

    skill.handle("set_volume", &slots(&[("direction", "up")]), &ctx).unwrap();
    assert_eq!(voice.last(), "Volume set to 100 percent.");

    skill.handle("set_volume", &SlotMap::new(), &ctx).unwrap();
    assert_eq!(voice.last(), "Audio muted.");
}

// ===========================================================================
// 2: application launching
// ===========================================================================

#[test]
fn known_and_unknown_applications() {
    let skill = AppSkill;
    let (ctx, voice) = recording_ctx();

    skill
        .handle("open_application", &slots(&[("app_name", "chrome")]), &ctx)
        .unwrap();
    assert_eq!(voice.last(), "Opening chrome.");

    skill
        .handle("open_application", &slots(&[("app_name", "frobulator")]), &ctx)
        .unwrap();
    assert_eq!(voice.last(), "I cannot find frobulator on this system, sir.");

    // Fuzzy variants stay inside this skill.
    assert!(skill.claims_fuzzy("open_app_with_context"));
    assert!(!skill.claims_fuzzy("get_time"));
}

// ===========================================================================
// 3: learning meta skill
// ===========================================================================

#[test]
fn correction_binding_and_stats() {
    let state = shared_state();
    let skill = LearningSkill::new(Arc::clone(&state), 2, std::env::temp_dir().join("unused.json"));
    let (ctx, voice) = recording_ctx();

    state.lock().unwrap().learning.record_miss("frobnicate");

    skill
        .handle("learning_correction", &slots(&[("intent", "open_application")]), &ctx)
        .unwrap();
    assert_eq!(
        voice.last(),
        "Learned! 'frobnicate' will now trigger open_application."
    );

    skill.handle("show_learning_stats", &SlotMap::new(), &ctx).unwrap();
    assert!(voice.last().contains("1 corrections learned"));

    // Second correction with nothing pending.
    skill
        .handle("learning_correction", &slots(&[("intent", "open_application")]), &ctx)
        .unwrap();
    assert_eq!(voice.last(), "No recent unrecognized commands to correct.");
}

#[test]
fn export_writes_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("learned.json");

    let state = shared_state();
    let skill = LearningSkill::new(Arc::clone(&state), 2, path.clone());
    let (ctx, voice) = recording_ctx();

    state.lock().unwrap().learning.record_miss("xyzzy");
    skill.handle("export_learning", &SlotMap::new(), &ctx).unwrap();

    assert!(path.exists());
    assert_eq!(voice.last(), "Learning data exported to learned.json.");
}

// ===========================================================================
// 4: context meta skill
// ===========================================================================

#[test]
fn context_show_and_clear() {
    let state = shared_state();
    let skill = NluMetaSkill::new(Arc::clone(&state));
    let (ctx, voice) = recording_ctx();

    skill.handle("get_context", &SlotMap::new(), &ctx).unwrap();
    assert_eq!(voice.last(), "The conversation context is empty, sir.");

    {
        let mut guard = state.lock().unwrap();
        let intent = Intent::new("get_time", SlotMap::new(), 1.0);
        guard.context.record(ContextEntry::from_intent(&intent));
    }

    skill.handle("get_context", &SlotMap::new(), &ctx).unwrap();
    assert_eq!(voice.last(), "Recent intents: get_time.");

    skill.handle("clear_context", &SlotMap::new(), &ctx).unwrap();
    assert_eq!(voice.last(), "Context cleared, sir.");

    skill.handle("get_context", &SlotMap::new(), &ctx).unwrap();
    assert_eq!(voice.last(), "The conversation context is empty, sir.");
}

// ===========================================================================
// 5: the full built-in set constructs and declares intents
// ===========================================================================

#[test]
fn builtin_set_constructs() {
    let state = shared_state();
    let skills = valet_skills::builtin_skills(state, &AssistantConfig::default());
    assert!(skills.len() >= 12);
    for skill in &skills {
        assert!(!skill.intents().is_empty());
    }
}
