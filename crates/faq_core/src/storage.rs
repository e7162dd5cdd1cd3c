use crate::error::{FaqError, Result};
use crate::model::FaqEntry;
use std::fs;
use std::path::Path;

/// Reads a knowledge base: a JSON array of `{ "question", "answer" }` objects.
pub fn load_entries_json(path: &Path) -> Result<Vec<FaqEntry>> {
    let bytes = fs::read(path).map_err(|source| FaqError::KnowledgeBaseIo {
        path: path.to_path_buf(),
        source,
    })?;
    parse_entries_json(path, &bytes)
}

/// `path` is only used to label errors.
pub fn parse_entries_json(path: &Path, bytes: &[u8]) -> Result<Vec<FaqEntry>> {
    serde_json::from_slice(bytes).map_err(|source| FaqError::KnowledgeBaseParse {
        path: path.to_path_buf(),
        source,
    })
}
