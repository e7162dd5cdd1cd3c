use crate::error::Result;
use crate::model::{FaqEntry, MatchResult, ScoredEntry};
use crate::similarity::{confidence_from_score, similarity};
use crate::storage::load_entries_json;
use crate::unmatched::UnmatchedSink;
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_THRESHOLD: f64 = 60.0;
pub const DEFAULT_EMPTY_MESSAGE: &str = "Please ask a question.";
pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "I did not quite understand your question. Could you rephrase it or contact an operator?";
pub const DEFAULT_ERROR_MESSAGE: &str = "Internal processing error.";

#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Minimum score on the 0-100 scale for a stored answer to be returned.
    pub threshold: f64,
    pub empty_message: String,
    pub fallback_message: String,
    pub error_message: String,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

impl MatchConfig {
    pub fn internal_error(&self) -> MatchResult {
        MatchResult::internal_error(&self.error_message)
    }
}

/// Nearest-question matcher over an immutable knowledge base.
///
/// Stored questions are case-folded once at construction.
#[derive(Debug, Clone)]
pub struct Matcher {
    entries: Vec<FaqEntry>,
    folded: Vec<String>,
    config: MatchConfig,
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

impl Matcher {
    pub fn new(entries: Vec<FaqEntry>, config: MatchConfig) -> Self {
        let folded = entries.iter().map(|e| e.question.to_lowercase()).collect();
        Self {
            entries,
            folded,
            config,
        }
    }

    pub fn from_path(path: &Path, config: MatchConfig) -> Result<Self> {
        let entries = load_entries_json(path)?;
        debug!(entries = entries.len(), path = %path.display(), "loaded knowledge base");
        Ok(Self::new(entries, config))
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    fn scored(&self, folded_query: &str) -> Vec<ScoredEntry<'_>> {
        self.entries
            .iter()
            .zip(&self.folded)
            .enumerate()
            .map(|(index, (entry, question))| ScoredEntry {
                index,
                entry,
                score: similarity(question, folded_query),
            })
            .collect()
    }

    /// Highest-scoring entry for `query`, first entry wins ties.
    /// `None` when the query is blank or the knowledge base is empty.
    pub fn best_match(&self, query: &str) -> Option<ScoredEntry<'_>> {
        let query = normalize(query);
        if query.is_empty() {
            return None;
        }

        let mut best: Option<ScoredEntry<'_>> = None;
        for candidate in self.scored(&query) {
            if best.map_or(true, |b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }
        best
    }

    /// Up to `k` entries by descending score, ties in file order.
    pub fn top_k(&self, query: &str, k: usize) -> Vec<ScoredEntry<'_>> {
        let query = normalize(query);
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored = self.scored(&query);
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        scored
    }

    /// Answers `message`, recording it in `sink` when nothing clears the
    /// threshold. A failing sink is logged and does not change the reply.
    pub fn answer<S>(&self, message: &str, sink: &S) -> MatchResult
    where
        S: UnmatchedSink + ?Sized,
    {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return MatchResult::empty(&self.config.empty_message);
        }

        let best = self.best_match(trimmed);
        let score = best.map_or(0.0, |b| b.score);

        match best {
            Some(hit) if hit.score > 0.0 && hit.score >= self.config.threshold => {
                debug!(index = hit.index, score = hit.score, "matched stored question");
                MatchResult::hit(&hit.entry.answer, hit.score, confidence_from_score(hit.score))
            }
            _ => {
                debug!(score, "no stored question cleared the threshold");
                if let Err(err) = sink.record(trimmed) {
                    warn!(error = %err, "failed to record unmatched question");
                }
                MatchResult::miss(&self.config.fallback_message, score)
            }
        }
    }
}
