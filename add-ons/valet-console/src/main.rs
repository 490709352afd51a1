//! Interactive console front end for the valet assistant.
//!
//! Reads commands line by line and routes each one through the dispatch
//! pipeline. This is the text stand-in for the voice front end: wake-word
//! capture, STT, and TTS adapters feed the same router with the same
//! contract. Learned data is persisted on shutdown and restored on start.

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use valet_core::{
    AssistantConfig, AssistantState, ConsoleVoice, IntentRouter, PermissionModel, Role,
    SkillRegistry, SpeechOutput,
};

#[tokio::main]
async fn main() {
    // Load .env if present (before any env::var calls).
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[valet-console] .env not loaded: {e} (using system environment)");
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AssistantConfig::from_env();

    // The caller's role comes from the surrounding application; the console
    // maps it from the environment and defaults to the hybrid owner role.
    let role = std::env::var("VALET_ROLE")
        .ok()
        .and_then(|name| Role::from_name(&name).ok())
        .unwrap_or(Role::AdminOwner);

    let permissions = match &config.permissions_path {
        Some(path) => match PermissionModel::from_toml_path(path, config.fail_closed_permissions) {
            Ok(model) => model,
            Err(e) => {
                tracing::warn!(error = %e, "permission file rejected; using built-in table");
                PermissionModel::with_builtin_table(config.fail_closed_permissions)
            }
        },
        None => PermissionModel::with_builtin_table(config.fail_closed_permissions),
    };

    let state = Arc::new(Mutex::new(AssistantState::new(&config)));

    // Explicit registration, no module scanning: construct every built-in
    // skill, register it, and feed its declared rules to the NLU engine ahead
    // of the generic patterns.
    let registry = Arc::new(SkillRegistry::new());
    let mut skill_rules = Vec::new();
    for skill in valet_skills::builtin_skills(Arc::clone(&state), &config) {
        skill_rules.extend(skill.rules());
        registry.register(skill);
    }
    {
        let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
        guard.nlu.register_rules_front(skill_rules);
    }

    let voice: Arc<dyn SpeechOutput> = Arc::new(ConsoleVoice);
    let router = IntentRouter::new(
        Arc::clone(&state),
        Arc::clone(&registry),
        Arc::new(permissions),
        Arc::clone(&voice),
        &config,
    );

    tracing::info!(
        role = %role,
        skills = registry.skill_count(),
        "valet console started"
    );
    voice.speak("Valet online and awaiting your orders, sir.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let input = line.trim();
                        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
                            break;
                        }
                        router.handle_command_multipart(input, role);
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "stdin read failed");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("CTRL-C received; shutting down");
                break;
            }
        }
    }

    // Persist learned data for the next session.
    {
        let guard = state.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = guard.learning.export_learned_data(&config.learned_data_path) {
            tracing::warn!(error = %e, "could not persist learned data");
        }
    }
    voice.speak("Goodbye, sir.");
}
