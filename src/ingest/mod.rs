//! Log ingestion: one input file becomes an ordered record set, structured
//! where the file parses as delimited columns, raw lines otherwise.

mod loader;

pub use loader::LogLoader;

/// Column name presented by raw-line record sets.
pub const RAW_LOG_COLUMN: &str = "raw_log";

/// Parsed contents of one input file, tagged with its origin for provenance.
#[derive(Debug, Clone)]
pub struct RecordSet {
    pub source_file: String,
    pub data: RecordData,
}

/// Either the structured parse succeeded, or the file degraded to one record
/// per line. Downstream stages match on the shape instead of guessing.
#[derive(Debug, Clone)]
pub enum RecordData {
    Structured {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    RawLines(Vec<String>),
}

impl RecordSet {
    pub fn len(&self) -> usize {
        match &self.data {
            RecordData::Structured { rows, .. } => rows.len(),
            RecordData::RawLines(lines) => lines.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names of the original fields, before alert columns are appended.
    pub fn columns(&self) -> Vec<String> {
        match &self.data {
            RecordData::Structured { columns, .. } => columns.clone(),
            RecordData::RawLines(_) => vec![RAW_LOG_COLUMN.to_string()],
        }
    }

    /// Field values of record `idx`, aligned with [`columns`](Self::columns).
    pub fn row(&self, idx: usize) -> Vec<String> {
        match &self.data {
            RecordData::Structured { rows, .. } => rows[idx].clone(),
            RecordData::RawLines(lines) => vec![lines[idx].clone()],
        }
    }
}
