//! Append-only record of queries that no stored question answered.
//!
//! Line format: `YYYY-MM-DD HH:MM:SS - <query>`, local time.

use crate::error::{FaqError, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::collections::HashMap;
use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR: &str = " - ";

pub trait UnmatchedSink {
    fn record(&self, query: &str) -> Result<()>;
}

/// Renders one log line, newline included. Line breaks inside the query are
/// flattened to spaces so every record stays on a single line.
pub fn format_log_line<Tz>(at: &DateTime<Tz>, query: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let flat: String = query
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    format!("{}{SEPARATOR}{flat}\n", at.format(TIMESTAMP_FORMAT))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub at: NaiveDateTime,
    pub query: String,
}

pub fn parse_log_line(line: &str) -> Option<LogRecord> {
    let line = line.trim_end_matches(['\n', '\r']);
    let stamp = line.get(..19)?;
    let query = line.get(19..)?.strip_prefix(SEPARATOR)?;
    let at = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;
    Some(LogRecord {
        at,
        query: query.to_string(),
    })
}

/// Appends to a file opened in append mode, one `write_all` per line.
/// Writers inside the process are serialized by a mutex.
#[derive(Debug)]
pub struct FileUnmatchedLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileUnmatchedLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

impl UnmatchedSink for FileUnmatchedLog {
    fn record(&self, query: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| FaqError::LogPoisoned)?;
        let line = format_log_line(&Local::now(), query);
        self.append(&line).map_err(|source| FaqError::UnmatchedLog {
            path: self.path.clone(),
            source,
        })
    }
}

/// Keeps recorded queries in memory.
#[derive(Debug, Default)]
pub struct MemoryUnmatchedLog {
    queries: Mutex<Vec<String>>,
}

impl MemoryUnmatchedLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

impl UnmatchedSink for MemoryUnmatchedLog {
    fn record(&self, query: &str) -> Result<()> {
        self.queries
            .lock()
            .map_err(|_| FaqError::LogPoisoned)?
            .push(query.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUnmatchedLog;

impl UnmatchedSink for NoopUnmatchedLog {
    fn record(&self, _query: &str) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedCount {
    pub query: String,
    pub count: usize,
    pub last_seen: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnmatchedSummary {
    pub queries: Vec<UnmatchedCount>,
    pub total: usize,
    pub skipped: usize,
}

/// Groups log lines by case-folded query, most frequent first. Ties keep the
/// order in which queries first appeared. Blank lines are ignored, other
/// unparseable lines are counted in `skipped`.
pub fn summarize_unmatched(contents: &str) -> UnmatchedSummary {
    let mut summary = UnmatchedSummary::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(record) = parse_log_line(line) else {
            summary.skipped += 1;
            continue;
        };
        summary.total += 1;

        let key = record.query.trim().to_lowercase();
        match index.get(&key) {
            Some(&i) => {
                let slot = &mut summary.queries[i];
                slot.count += 1;
                slot.last_seen = slot.last_seen.max(record.at);
            }
            None => {
                index.insert(key, summary.queries.len());
                summary.queries.push(UnmatchedCount {
                    query: record.query,
                    count: 1,
                    last_seen: record.at,
                });
            }
        }
    }

    summary.queries.sort_by(|a, b| b.count.cmp(&a.count));
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use std::sync::Arc;

    fn at(h: u32, m: u32, s: u32) -> DateTime<chrono::Utc> {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .expect("valid date")
            .and_utc()
    }

    #[test]
    fn formats_timestamped_line() {
        assert_eq!(
            format_log_line(&at(7, 5, 3), "banana"),
            "2024-03-09 07:05:03 - banana\n"
        );
    }

    #[test]
    fn flattens_line_breaks() {
        assert_eq!(
            format_log_line(&at(0, 0, 0), "first\r\nsecond"),
            "2024-03-09 00:00:00 - first  second\n"
        );
    }

    #[test]
    fn parses_formatted_line() {
        let record = parse_log_line("2024-03-09 07:05:03 - where - exactly?\n").expect("parse");
        assert_eq!(record.at, at(7, 5, 3).naive_utc());
        assert_eq!(record.query, "where - exactly?");

        assert!(parse_log_line("garbage").is_none());
        assert!(parse_log_line("2024-03-09 07:05:03 banana").is_none());
    }

    #[test]
    fn file_log_appends_one_line_per_record() {
        let dir = tempfile::tempdir().expect("dir");
        let path = dir.path().join("unmatched.log");
        fs::write(&path, "2024-01-01 00:00:00 - older\n").expect("seed");

        let log = FileUnmatchedLog::new(&path);
        log.record("banana").expect("record");
        log.record("kiwi").expect("record");

        let contents = fs::read_to_string(&path).expect("read");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "2024-01-01 00:00:00 - older");
        assert_eq!(parse_log_line(lines[1]).expect("line").query, "banana");
        assert_eq!(parse_log_line(lines[2]).expect("line").query, "kiwi");
    }

    #[test]
    fn concurrent_records_do_not_interleave() {
        let dir = tempfile::tempdir().expect("dir");
        let path = dir.path().join("unmatched.log");
        let log = Arc::new(FileUnmatchedLog::new(&path));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        log.record(&format!("thread {t} query {i} {}", "x".repeat(200)))
                            .expect("record");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("join");
        }

        let contents = fs::read_to_string(&path).expect("read");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 200);
        let mut previous = None;
        for line in lines {
            let record = parse_log_line(line).expect("well-formed line");
            assert!(record.query.starts_with("thread "));
            assert!(record.query.ends_with(&"x".repeat(200)));
            if let Some(previous) = previous {
                assert!(record.at >= previous, "timestamps out of order at {line:?}");
            }
            previous = Some(record.at);
        }
    }

    #[test]
    fn unwritable_path_is_reported() {
        let dir = tempfile::tempdir().expect("dir");
        let log = FileUnmatchedLog::new(dir.path().join("missing").join("unmatched.log"));
        let err = log.record("banana").unwrap_err();
        assert!(matches!(err, FaqError::UnmatchedLog { .. }));
    }

    #[test]
    fn summary_groups_case_insensitively() {
        let contents = "\
2024-03-09 07:00:00 - Banana
2024-03-09 07:01:00 - kiwi
not a log line
2024-03-09 07:02:00 - banana

2024-03-09 07:03:00 - mango
2024-03-09 07:04:00 - KIWI
2024-03-09 07:05:00 - BANANA
";
        let summary = summarize_unmatched(contents);

        assert_eq!(summary.total, 6);
        assert_eq!(summary.skipped, 1);
        let got: Vec<(&str, usize)> = summary
            .queries
            .iter()
            .map(|q| (q.query.as_str(), q.count))
            .collect();
        assert_eq!(got, vec![("Banana", 3), ("kiwi", 2), ("mango", 1)]);
        assert_eq!(summary.queries[0].last_seen, at(7, 5, 0).naive_utc());
    }
}
