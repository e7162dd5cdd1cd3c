use std::io::{self, Write};

use faq_core::{FaqEntry, LintReport, ScoredEntry, UnmatchedSummary, TIMESTAMP_FORMAT};

pub fn write_top(out: &mut impl Write, candidates: &[ScoredEntry<'_>]) -> io::Result<()> {
    if candidates.is_empty() {
        writeln!(out, "no candidates")?;
    }
    for (rank, c) in candidates.iter().enumerate() {
        writeln!(
            out,
            "rank={} score={:.4} index={} question={:?}",
            rank + 1,
            c.score,
            c.index,
            c.entry.question
        )?;
    }
    Ok(())
}

pub fn write_unmatched(
    out: &mut impl Write,
    summary: &UnmatchedSummary,
    limit: Option<usize>,
) -> io::Result<()> {
    writeln!(
        out,
        "unmatched_total={} distinct={} skipped_lines={}",
        summary.total,
        summary.queries.len(),
        summary.skipped
    )?;
    let shown = limit.unwrap_or(summary.queries.len());
    for q in summary.queries.iter().take(shown) {
        writeln!(
            out,
            "count={} last_seen={} question={:?}",
            q.count,
            q.last_seen.format(TIMESTAMP_FORMAT),
            q.query
        )?;
    }
    Ok(())
}

pub fn write_lint(out: &mut impl Write, report: &LintReport, entries: &[FaqEntry]) -> io::Result<()> {
    writeln!(
        out,
        "entries={} blank_questions={} blank_answers={} duplicates={}",
        report.entries,
        report.blank_questions.len(),
        report.blank_answers.len(),
        report.duplicates.len()
    )?;
    for i in &report.blank_questions {
        writeln!(out, "blank_question index={i}")?;
    }
    for i in &report.blank_answers {
        writeln!(out, "blank_answer index={i}")?;
    }
    for d in &report.duplicates {
        let question = entries
            .get(d.shadowed)
            .map(|e| e.question.as_str())
            .unwrap_or_default();
        writeln!(
            out,
            "duplicate index={} shadowed_by={} question={:?}",
            d.shadowed, d.kept, question
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use faq_core::{lint_entries, summarize_unmatched, MatchConfig, Matcher};

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).expect("write");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn top_lists_ranked_candidates() {
        let matcher = Matcher::new(
            vec![
                FaqEntry::new("Where are you?", "Downtown"),
                FaqEntry::new("What are your hours?", "9am-5pm"),
            ],
            MatchConfig::default(),
        );
        let text = render(|out| write_top(out, &matcher.top_k("what are your hours?", 2)));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "rank=1 score=100.0000 index=1 question=\"What are your hours?\""
        );
        assert!(lines[1].starts_with("rank=2 "));
    }

    #[test]
    fn unmatched_respects_limit() {
        let summary = summarize_unmatched(
            "2024-03-09 07:00:00 - banana\n2024-03-09 07:01:00 - kiwi\n2024-03-09 07:02:00 - banana\n",
        );
        let text = render(|out| write_unmatched(out, &summary, Some(1)));

        assert_eq!(
            text,
            "unmatched_total=3 distinct=2 skipped_lines=0\n\
             count=2 last_seen=2024-03-09 07:02:00 question=\"banana\"\n"
        );
    }

    #[test]
    fn lint_names_shadowed_duplicates() {
        let entries = vec![
            FaqEntry::new("Hours?", "9-5"),
            FaqEntry::new("hours?", "10-6"),
        ];
        let report = lint_entries(&entries);
        let text = render(|out| write_lint(out, &report, &entries));

        assert!(text.starts_with("entries=2 blank_questions=0 blank_answers=0 duplicates=1\n"));
        assert!(text.contains("duplicate index=1 shadowed_by=0 question=\"hours?\""));
    }
}
