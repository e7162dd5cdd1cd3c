pub mod error;
pub mod lint;
pub mod model;
pub mod retrieval;
pub mod similarity;
pub mod storage;
pub mod unmatched;

pub use error::{FaqError, Result};
pub use lint::{lint_entries, Duplicate, LintReport};
pub use model::{Decision, FaqEntry, MatchResult, ScoredEntry};
pub use retrieval::{
    MatchConfig, Matcher, DEFAULT_EMPTY_MESSAGE, DEFAULT_ERROR_MESSAGE, DEFAULT_FALLBACK_MESSAGE,
    DEFAULT_THRESHOLD,
};
pub use similarity::{confidence_from_score, similar_chars, similarity};
pub use storage::{load_entries_json, parse_entries_json};
pub use unmatched::{
    format_log_line, parse_log_line, summarize_unmatched, FileUnmatchedLog, LogRecord,
    MemoryUnmatchedLog, NoopUnmatchedLog, UnmatchedCount, UnmatchedSink, UnmatchedSummary,
    TIMESTAMP_FORMAT,
};
