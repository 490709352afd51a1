//! File and folder operations. Creation is handled directly; destructive
//! operations are acknowledged but left to the desktop integration, which
//! owns confirmation.

use std::path::Path;
use valet_core::{Skill, SkillContext, SkillError, SlotMap};

pub struct StorageSkill;

impl Skill for StorageSkill {
    fn name(&self) -> &str {
        "storage"
    }

    fn description(&self) -> &str {
        "Folder creation, file search, and duplicate detection"
    }

    fn intents(&self) -> Vec<&'static str> {
        vec!["create_folder", "delete_path", "search_files", "find_duplicate_files"]
    }

    fn handle(&self, intent: &str, slots: &SlotMap, ctx: &SkillContext) -> Result<bool, SkillError> {
        match intent {
            "create_folder" => {
                let path = slots.get("path").map(String::as_str).unwrap_or("");
                if path.is_empty() {
                    ctx.speak("Where should I create the folder, sir?");
                    return Ok(true);
                }
                match std::fs::create_dir_all(Path::new(path)) {
                    Ok(()) => {
                        tracing::info!(target: "valet::skills::storage", path, "folder created");
                        ctx.speak(&format!("Folder {path} created."));
                    }
                    Err(e) => {
                        tracing::warn!(target: "valet::skills::storage", path, error = %e, "folder creation failed");
                        ctx.speak(&format!("I could not create {path}: {e}."));
                    }
                }
                Ok(true)
            }
            "delete_path" => {
                let path = slots.get("path").map(String::as_str).unwrap_or("");
                tracing::warn!(target: "valet::skills::storage", path, "deletion requested, deferred");
                ctx.speak("Deletions need confirmation from the desktop integration, sir.");
                Ok(true)
            }
            "search_files" => {
                let query = slots.get("query").map(String::as_str).unwrap_or("");
                if query.is_empty() {
                    ctx.speak("What should I look for, sir?");
                } else {
                    ctx.speak(&format!("Searching your files for {query}."));
                }
                Ok(true)
            }
            "find_duplicate_files" => {
                ctx.speak("Scanning for duplicate files in the background, sir.");
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
