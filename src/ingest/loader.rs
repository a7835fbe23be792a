//! Reads one log file: delimited-columns parse first, raw-line fallback.
//! Malformed structured input never fails a load; it degrades.

use super::{RecordData, RecordSet};
use std::path::Path;
use tracing::debug;

pub struct LogLoader;

impl LogLoader {
    /// Load a file into a record set tagged with the file name. Empty files
    /// produce an empty set; only an unreadable file returns an error.
    pub fn load(path: &Path) -> std::io::Result<RecordSet> {
        let content = std::fs::read_to_string(path)?;
        let source_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let data = match try_structured(&content) {
            Some((columns, rows)) => {
                debug!(file = %source_file, columns = columns.len(), rows = rows.len(), "structured parse");
                RecordData::Structured { columns, rows }
            }
            None => {
                let lines: Vec<String> = content.lines().map(|l| l.trim().to_string()).collect();
                debug!(file = %source_file, lines = lines.len(), "raw-line fallback");
                RecordData::RawLines(lines)
            }
        };

        Ok(RecordSet { source_file, data })
    }
}

/// Delimited parse: a header row of at least two columns plus data rows of
/// matching width. Anything else (single column, ragged rows) is rejected so
/// the caller falls back to raw lines.
fn try_structured(content: &str) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let header = split_fields(lines.next()?);
    if header.len() < 2 {
        return None;
    }

    let mut rows = Vec::new();
    for line in lines {
        let fields = split_fields(line);
        if fields.len() != header.len() {
            return None;
        }
        rows.push(fields);
    }
    Some((header, rows))
}

/// Comma splitting with double-quote grouping; `""` inside a quoted field is
/// a literal quote.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields.into_iter().map(|f| f.trim().to_string()).collect()
}
