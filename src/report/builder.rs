//! Joins records with their scores into immutable alert rows and writes
//! delimited reports, per-file and combined.

use super::ALERT_COLUMNS;
use crate::ingest::RecordSet;
use crate::scoring::{AlertLevel, ScoreResult};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// One scored record: original field values plus detection metadata.
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct Alert {
    /// Values aligned with the owning report's `original_columns`.
    pub fields: Vec<String>,
    pub source_file: String,
    pub threat_detected: u8,
    pub threat_probability: f32,
    pub alert_level: AlertLevel,
    pub timestamp: DateTime<Utc>,
}

/// All alerts derived from one input file, with the column schema they share.
#[derive(Debug, Clone)]
pub struct AlertReport {
    pub original_columns: Vec<String>,
    pub alerts: Vec<Alert>,
}

impl AlertReport {
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn flagged(&self) -> usize {
        self.alerts.iter().filter(|a| a.threat_detected == 1).count()
    }
}

pub struct AlertBuilder;

impl AlertBuilder {
    /// Join records with their scores, one alert per record. Every alert in
    /// the result shares `generated_at`, captured once by the caller, so a
    /// single report is internally consistent. Callers guarantee the scores
    /// are index-aligned with the records.
    pub fn build(
        records: &RecordSet,
        scores: &ScoreResult,
        generated_at: DateTime<Utc>,
    ) -> AlertReport {
        let original_columns = records.columns();
        let alerts = (0..records.len())
            .map(|i| Alert {
                fields: records.row(i),
                source_file: records.source_file.clone(),
                threat_detected: scores.predictions[i],
                threat_probability: scores.probabilities[i],
                alert_level: AlertLevel::from_probability(scores.probabilities[i]),
                timestamp: generated_at,
            })
            .collect();

        AlertReport {
            original_columns,
            alerts,
        }
    }
}

/// Write one per-file report: original columns first, then the alert columns.
pub fn write_report(report: &AlertReport, path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    write_header(&mut w, &report.original_columns)?;
    for alert in &report.alerts {
        let mut row = alert.fields.clone();
        push_alert_fields(&mut row, alert);
        write_line(&mut w, &row)?;
    }
    w.flush()?;

    info!(path = %path.display(), rows = report.len(), "report written");
    Ok(())
}

/// Concatenate per-file reports in discovery order. The header takes the
/// union of original columns, first seen first; files lacking a column
/// serialize it empty. No reports at all still produces a well-formed
/// header-only file.
pub fn write_combined(reports: &[AlertReport], path: &Path) -> std::io::Result<()> {
    let mut union: Vec<String> = Vec::new();
    for report in reports {
        for col in &report.original_columns {
            if !union.contains(col) {
                union.push(col.clone());
            }
        }
    }

    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    write_header(&mut w, &union)?;

    let mut rows = 0usize;
    for report in reports {
        let mapping: Vec<Option<usize>> = union
            .iter()
            .map(|c| report.original_columns.iter().position(|o| o == c))
            .collect();
        for alert in &report.alerts {
            let mut row: Vec<String> = mapping
                .iter()
                .map(|m| m.map(|i| alert.fields[i].clone()).unwrap_or_default())
                .collect();
            push_alert_fields(&mut row, alert);
            write_line(&mut w, &row)?;
            rows += 1;
        }
    }
    w.flush()?;

    info!(path = %path.display(), rows, "combined report written");
    Ok(())
}

fn push_alert_fields(row: &mut Vec<String>, alert: &Alert) {
    row.push(alert.source_file.clone());
    row.push(alert.threat_detected.to_string());
    row.push(alert.threat_probability.to_string());
    row.push(alert.alert_level.as_str().to_string());
    row.push(alert.timestamp.to_rfc3339());
}

fn write_header(w: &mut impl Write, original: &[String]) -> std::io::Result<()> {
    let mut columns = original.to_vec();
    columns.extend(ALERT_COLUMNS.iter().map(|c| c.to_string()));
    write_line(w, &columns)
}

fn write_line(w: &mut impl Write, fields: &[String]) -> std::io::Result<()> {
    let escaped: Vec<String> = fields.iter().map(|f| escape(f)).collect();
    writeln!(w, "{}", escaped.join(","))
}

/// Quote a field when it would otherwise break the row shape.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
