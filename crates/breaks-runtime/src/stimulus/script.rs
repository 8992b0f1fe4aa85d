//! Text stimulus scripts.
//!
//! ```text
//! version 1
//! comment power on, hold reset
//! |.Y...|16|
//! # release and run one line
//! |NY...|2728|
//! ```
//!
//! The first line is the version header. Blank lines and lines starting with
//! `#` are skipped; `comment` lines are kept. Every other line is a record
//! `|FLAGS|COUNT|`: one column per pad in `N Y S O B` order holding either
//! its letter (high) or `.` (low), and the number of master half-cycles the
//! state is held for.

use std::fmt;
use std::io::{BufRead, Cursor};

use crate::error::RuntimeError;
use crate::stimulus::{FLAG_COLUMNS, StimulusFlags, StimulusRecord};

pub const SCRIPT_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub comments: Vec<String>,
    pub records: Vec<StimulusRecord>,
}

impl Script {
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, RuntimeError> {
        let mut lines = reader.lines().enumerate();
        let (_, header) = lines.next().ok_or_else(|| invalid(1, "missing version header"))?;
        parse_header(&header?)?;

        let mut script = Script::default();
        for (index, line) in lines {
            let line_no = index + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(text) = line.strip_prefix("comment") {
                if text.is_empty() || text.starts_with(char::is_whitespace) {
                    script.comments.push(text.trim().to_string());
                    continue;
                }
            }
            if line.starts_with('|') {
                script.records.push(parse_record(line, line_no)?);
                continue;
            }
            return Err(invalid(line_no, format!("unexpected line {line:?}")));
        }
        tracing::debug!(
            records = script.records.len(),
            half_cycles = script.total_half_cycles(),
            "parsed stimulus script"
        );
        Ok(script)
    }

    pub fn parse_str(s: &str) -> Result<Self, RuntimeError> {
        Self::parse(Cursor::new(s))
    }

    /// Master half-cycles covered by all records.
    pub fn total_half_cycles(&self) -> u64 {
        self.records.iter().map(|r| u64::from(r.count)).sum()
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "version {SCRIPT_VERSION}")?;
        for comment in &self.comments {
            writeln!(f, "comment {comment}")?;
        }
        for record in &self.records {
            f.write_str("|")?;
            for (letter, flag) in FLAG_COLUMNS {
                let c = if record.flags.contains(flag) { letter } else { '.' };
                write!(f, "{c}")?;
            }
            writeln!(f, "|{}|", record.count)?;
        }
        Ok(())
    }
}

fn invalid(line: usize, reason: impl Into<String>) -> RuntimeError {
    RuntimeError::InvalidScript {
        line,
        reason: reason.into(),
    }
}

fn parse_header(line: &str) -> Result<(), RuntimeError> {
    let version = line
        .trim()
        .strip_prefix("version")
        .map(str::trim)
        .ok_or_else(|| invalid(1, "missing version header"))?;
    let version: u32 = version
        .parse()
        .map_err(|_| invalid(1, format!("bad version {version:?}")))?;
    if version != SCRIPT_VERSION {
        return Err(RuntimeError::UnsupportedScriptVersion(version));
    }
    Ok(())
}

fn parse_record(line: &str, line_no: usize) -> Result<StimulusRecord, RuntimeError> {
    let parts: Vec<&str> = line.split('|').collect();
    // A well-formed record splits into ["", flags, count, ""].
    if parts.len() != 4 || !parts[3].is_empty() {
        return Err(invalid(line_no, "expected |FLAGS|COUNT|"));
    }

    let columns: Vec<char> = parts[1].chars().collect();
    if columns.len() != FLAG_COLUMNS.len() {
        return Err(invalid(
            line_no,
            format!("flags field must have {} columns", FLAG_COLUMNS.len()),
        ));
    }
    let mut flags = StimulusFlags::empty();
    for (c, (letter, flag)) in columns.into_iter().zip(FLAG_COLUMNS) {
        match c {
            '.' => {}
            c if c == letter => flags |= flag,
            c => {
                return Err(invalid(
                    line_no,
                    format!("column {letter} holds {c:?}, expected {letter:?} or '.'"),
                ));
            }
        }
    }

    let count: u32 = parts[2]
        .trim()
        .parse()
        .map_err(|_| invalid(line_no, format!("bad count {:?}", parts[2])))?;
    if count == 0 {
        return Err(invalid(line_no, "count must be at least 1"));
    }
    Ok(StimulusRecord { flags, count })
}
