use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaqError {
    #[error("failed to read knowledge base {path}: {source}")]
    KnowledgeBaseIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed knowledge base {path}: {source}")]
    KnowledgeBaseParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to append to unmatched log {path}: {source}")]
    UnmatchedLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unmatched log lock poisoned")]
    LogPoisoned,
}

pub type Result<T> = std::result::Result<T, FaqError>;
