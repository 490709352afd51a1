//! Learning engine: miss records, user corrections, and auto-generated
//! recognition aliases.
//!
//! A miss is recorded when every dispatch stage fails. A correction binds the
//! most recent uncorrected miss to the intent it should have matched. Once the
//! same phrase has been corrected to the same intent often enough, an
//! exact-match alias rule is generated and handed to the NLU engine, after
//! which it participates in ordinary matching.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::CoreResult;
use crate::intent::PatternRule;
use crate::nlu::NluEngine;

/// Corrections required before an alias rule is generated for a phrase.
pub const DEFAULT_ALIAS_THRESHOLD: usize = 2;

/// Confidence assigned to generated alias rules.
const ALIAS_CONFIDENCE: f64 = 0.99;

/// One unrecognized input. Mutated exactly once, when a correction binds it
/// to an intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissRecord {
    pub text: String,
    pub corrected: bool,
    pub resolved_intent: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Counters surfaced by the learning meta-commands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LearningStats {
    pub misses: usize,
    pub corrected: usize,
    pub aliases: usize,
}

/// Serialized snapshot for export/import. The on-disk layout is an
/// implementation detail; only the logical operations are contractual.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LearnedData {
    misses: Vec<MissRecord>,
    generated: BTreeSet<(String, String)>,
}

#[derive(Debug, Default)]
pub struct LearningEngine {
    misses: Vec<MissRecord>,
    /// (text, intent) pairs that already produced an alias rule; keeps
    /// generation idempotent.
    generated: BTreeSet<(String, String)>,
}

impl LearningEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an unrecognized input.
    pub fn record_miss(&mut self, text: &str) {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return;
        }
        tracing::debug!(target: "valet::learning", %text, "miss recorded");
        self.misses.push(MissRecord {
            text,
            corrected: false,
            resolved_intent: None,
            recorded_at: Utc::now(),
        });
    }

    /// Bind the most recent uncorrected miss to `intent`. Returns false when
    /// every miss has already been corrected (nothing to correct).
    pub fn apply_correction(&mut self, text: &str, intent: &str) -> bool {
        let Some(miss) = self.misses.iter_mut().rev().find(|m| !m.corrected) else {
            tracing::info!(target: "valet::learning", "correction requested but nothing to correct");
            return false;
        };
        miss.corrected = true;
        miss.resolved_intent = Some(intent.to_string());
        tracing::info!(
            target: "valet::learning",
            phrase = %miss.text,
            intent,
            requested_for = %text.trim().to_lowercase(),
            "correction applied"
        );
        true
    }

    /// Resolve a phrase through past corrections, newest binding first.
    pub fn lookup_correction(&self, text: &str) -> Option<String> {
        let text = text.trim().to_lowercase();
        self.misses
            .iter()
            .rev()
            .find(|m| m.corrected && m.text == text)
            .and_then(|m| m.resolved_intent.clone())
    }

    /// Generate exact-match alias rules for every (phrase, intent) pair whose
    /// correction count reached `threshold`, register them with the NLU
    /// engine, and return how many were created. Pairs that already produced
    /// a rule are skipped, so repeated calls are idempotent.
    pub fn auto_generate_aliases(&mut self, threshold: usize, nlu: &mut NluEngine) -> usize {
        let threshold = threshold.max(1);
        let mut groups: BTreeMap<(String, String), usize> = BTreeMap::new();
        for miss in self.misses.iter().filter(|m| m.corrected) {
            if let Some(intent) = &miss.resolved_intent {
                *groups
                    .entry((miss.text.clone(), intent.clone()))
                    .or_default() += 1;
            }
        }

        let mut created = 0;
        for (pair, count) in groups {
            if count < threshold || self.generated.contains(&pair) {
                continue;
            }
            let (text, intent) = &pair;
            match PatternRule::literal(text, intent, ALIAS_CONFIDENCE) {
                Ok(rule) => {
                    nlu.register_rule(rule);
                    tracing::info!(
                        target: "valet::learning",
                        phrase = %text,
                        intent = %intent,
                        count,
                        "alias rule generated"
                    );
                    self.generated.insert(pair);
                    created += 1;
                }
                Err(e) => {
                    tracing::warn!(target: "valet::learning", error = %e, "alias rule rejected");
                }
            }
        }
        created
    }

    /// Recent uncorrected misses, newest first, capped at `limit`.
    pub fn recent_misses(&self, limit: usize) -> Vec<&MissRecord> {
        self.misses
            .iter()
            .rev()
            .filter(|m| !m.corrected)
            .take(limit)
            .collect()
    }

    pub fn statistics(&self) -> LearningStats {
        LearningStats {
            misses: self.misses.len(),
            corrected: self.misses.iter().filter(|m| m.corrected).count(),
            aliases: self.generated.len(),
        }
    }

    /// Write the learned data snapshot to `path` and return it.
    pub fn export_learned_data(&self, path: &Path) -> CoreResult<PathBuf> {
        let snapshot = LearnedData {
            misses: self.misses.clone(),
            generated: self.generated.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json)?;
        tracing::info!(target: "valet::learning", path = %path.display(), "learned data exported");
        Ok(path.to_path_buf())
    }

    /// Replace the engine's state with a previously exported snapshot.
    /// Returns false (leaving current state intact) when the file is missing
    /// or unreadable.
    pub fn import_learned_data(&mut self, path: &Path) -> bool {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    target: "valet::learning",
                    path = %path.display(),
                    error = %e,
                    "learned data import failed"
                );
                return false;
            }
        };
        match serde_json::from_str::<LearnedData>(&content) {
            Ok(snapshot) => {
                self.misses = snapshot.misses;
                self.generated = snapshot.generated;
                tracing::info!(
                    target: "valet::learning",
                    path = %path.display(),
                    misses = self.misses.len(),
                    "learned data imported"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    target: "valet::learning",
                    path = %path.display(),
                    error = %e,
                    "learned data decode failed"
                );
                false
            }
        }
    }
}
