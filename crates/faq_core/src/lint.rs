use crate::model::FaqEntry;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duplicate {
    /// Entry that would win every match.
    pub kept: usize,
    /// Entry that can never be selected.
    pub shadowed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintReport {
    pub entries: usize,
    pub blank_questions: Vec<usize>,
    pub blank_answers: Vec<usize>,
    pub duplicates: Vec<Duplicate>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.blank_questions.is_empty() && self.blank_answers.is_empty() && self.duplicates.is_empty()
    }
}

/// Flags entries the matcher handles poorly: blank fields, and questions that
/// repeat an earlier one after case folding. Stored questions are not trimmed
/// before scoring, so whitespace variants are distinct questions.
pub fn lint_entries(entries: &[FaqEntry]) -> LintReport {
    let mut report = LintReport {
        entries: entries.len(),
        ..LintReport::default()
    };
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (i, entry) in entries.iter().enumerate() {
        let question = entry.question.to_lowercase();
        if question.trim().is_empty() {
            report.blank_questions.push(i);
        } else if let Some(&kept) = seen.get(&question) {
            report.duplicates.push(Duplicate { kept, shadowed: i });
        } else {
            seen.insert(question, i);
        }

        if entry.answer.trim().is_empty() {
            report.blank_answers.push(i);
        }
    }

    report
}
