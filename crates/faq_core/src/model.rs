use serde::{Deserialize, Serialize};

/// A stored question/answer pair. Unknown fields in the source file are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Hit,
    Miss,
    Empty,
    Error,
}

/// Response body returned to callers. Only `answer` and `confidence` go on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub answer: String,
    pub confidence: f64,
    #[serde(skip)]
    pub decision: Decision,
    #[serde(skip)]
    pub score: f64,
}

impl MatchResult {
    pub fn hit(answer: impl Into<String>, score: f64, confidence: f64) -> Self {
        Self {
            answer: answer.into(),
            confidence,
            decision: Decision::Hit,
            score,
        }
    }

    pub fn miss(fallback: impl Into<String>, score: f64) -> Self {
        Self {
            answer: fallback.into(),
            confidence: 0.0,
            decision: Decision::Miss,
            score,
        }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            answer: message.into(),
            confidence: 0.0,
            decision: Decision::Empty,
            score: 0.0,
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            answer: message.into(),
            confidence: 0.0,
            decision: Decision::Error,
            score: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEntry<'a> {
    pub index: usize,
    pub entry: &'a FaqEntry,
    pub score: f64,
}
