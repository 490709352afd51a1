//! Legacy built-in handlers, keyed by intent name.
//!
//! These predate the skill system and cover intents no skill owns. The router
//! tries them after registry dispatch; faults are swallowed at the stage
//! boundary and treated as "not handled".

use std::collections::HashMap;

use crate::error::SkillError;
use crate::intent::SlotMap;
use crate::speech::SpeechOutput;

/// A legacy handler: slots in, spoken response out.
pub type LegacyHandler = fn(&SlotMap, &dyn SpeechOutput) -> Result<bool, SkillError>;

fn slot<'a>(slots: &'a SlotMap, key: &str) -> &'a str {
    slots.get(key).map(String::as_str).unwrap_or("")
}

fn web_search(slots: &SlotMap, voice: &dyn SpeechOutput) -> Result<bool, SkillError> {
    let query = slot(slots, "query");
    if query.is_empty() {
        voice.speak("What would you like me to search for, sir?");
        return Ok(true);
    }
    tracing::info!(target: "valet::legacy", query, "web search requested");
    voice.speak(&format!("Searching the web for {query}."));
    Ok(true)
}

fn smarthome_toggle(slots: &SlotMap, voice: &dyn SpeechOutput) -> Result<bool, SkillError> {
    let device = slot(slots, "device");
    let state = slot(slots, "state");
    if device.is_empty() || state.is_empty() {
        return Ok(false);
    }
    tracing::info!(target: "valet::legacy", device, state, "smart home toggle");
    voice.speak(&format!("Turning {state} {device}."));
    Ok(true)
}

fn get_weather(_slots: &SlotMap, voice: &dyn SpeechOutput) -> Result<bool, SkillError> {
    voice.speak("Weather lookups are not configured on this installation, sir.");
    Ok(true)
}

fn take_screenshot(_slots: &SlotMap, voice: &dyn SpeechOutput) -> Result<bool, SkillError> {
    tracing::info!(target: "valet::legacy", "screenshot requested");
    voice.speak("Screenshot capture is handled by the desktop integration, sir.");
    Ok(true)
}

fn create_note(slots: &SlotMap, voice: &dyn SpeechOutput) -> Result<bool, SkillError> {
    let text = slot(slots, "text");
    if text.is_empty() {
        voice.speak("What should the note say, sir?");
    } else {
        tracing::info!(target: "valet::legacy", note = text, "note recorded");
        voice.speak("Noted, sir.");
    }
    Ok(true)
}

/// The default legacy handler table.
pub fn builtin_legacy_handlers() -> HashMap<String, LegacyHandler> {
    let entries: [(&str, LegacyHandler); 5] = [
        ("web_search", web_search),
        ("smarthome_toggle", smarthome_toggle),
        ("get_weather", get_weather),
        ("take_screenshot", take_screenshot),
        ("create_note", create_note),
    ];
    entries
        .into_iter()
        .map(|(name, handler)| (name.to_string(), handler))
        .collect()
}
