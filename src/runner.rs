//! Orchestrates the per-file pipeline across the discovered input set and
//! folds surviving reports into the combined output.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::features::Featurizer;
use crate::ingest::LogLoader;
use crate::model::ThreatModel;
use crate::report::{self, AlertBuilder, AlertReport};
use crate::scoring::ThreatScorer;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

/// Extensions recognized as input, scanned in this order.
const LOG_EXTENSIONS: [&str; 3] = ["log", "csv", "txt"];

/// File name of the aggregated report.
const COMBINED_REPORT: &str = "alerts.csv";

/// Where a file currently stands in the pipeline. A file that fails at any
/// stage keeps its failure reason and is excluded from aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileState {
    Pending,
    Parsed,
    Featurized,
    Scored,
    Reported,
    Failed(String),
}

/// Run-level totals, logged once at the end of a run. Derived, never
/// persisted.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_alerts: usize,
    pub total_flagged: usize,
    /// Percentage of rows flagged; absent when there are no rows.
    pub flag_rate: Option<f64>,
}

pub struct PipelineRunner {
    config: PipelineConfig,
    model: Box<dyn ThreatModel>,
    featurizer: Box<dyn Featurizer>,
    scorer: ThreatScorer,
}

impl PipelineRunner {
    pub fn new(
        config: PipelineConfig,
        model: Box<dyn ThreatModel>,
        featurizer: Box<dyn Featurizer>,
    ) -> Self {
        let scorer = ThreatScorer::new(config.detection.threshold);
        Self {
            config,
            model,
            featurizer,
            scorer,
        }
    }

    /// Process every discovered file in order, then aggregate. Per-file
    /// failures are logged and skipped; only the combined report's I/O can
    /// fail the run itself. An empty input set is not an error: the combined
    /// report is still written, header-only.
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        let run_id = Uuid::new_v4().to_string();
        let files = discover_files(&self.config.input_dir);
        info!(
            run_id = %run_id,
            files = files.len(),
            input_dir = %self.config.input_dir.display(),
            "starting triage run"
        );

        let combined_path = self.config.output_dir.join(COMBINED_REPORT);

        if files.is_empty() {
            warn!(input_dir = %self.config.input_dir.display(), "no log files found");
            report::write_combined(&[], &combined_path)?;
            return Ok(RunSummary {
                run_id,
                files_processed: 0,
                files_failed: 0,
                total_alerts: 0,
                total_flagged: 0,
                flag_rate: None,
            });
        }

        let mut reports: Vec<AlertReport> = Vec::new();
        let mut states: Vec<(PathBuf, FileState)> = Vec::new();

        for path in files {
            let mut state = FileState::Pending;
            match self.process_file(&path, &mut state) {
                Ok(report) => reports.push(report),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "file failed; continuing");
                    state = FileState::Failed(e.to_string());
                }
            }
            states.push((path, state));
        }

        report::write_combined(&reports, &combined_path)?;

        let total_alerts: usize = reports.iter().map(|r| r.len()).sum();
        let total_flagged: usize = reports.iter().map(|r| r.flagged()).sum();
        let files_failed = states
            .iter()
            .filter(|(_, s)| matches!(s, FileState::Failed(_)))
            .count();
        let flag_rate = (total_alerts > 0)
            .then(|| total_flagged as f64 / total_alerts as f64 * 100.0);

        let summary = RunSummary {
            run_id,
            files_processed: reports.len(),
            files_failed,
            total_alerts,
            total_flagged,
            flag_rate,
        };
        match summary.flag_rate {
            Some(rate) => info!(
                run_id = %summary.run_id,
                total = summary.total_alerts,
                flagged = summary.total_flagged,
                rate_pct = %format_args!("{:.2}", rate),
                "detection summary"
            ),
            None => info!(run_id = %summary.run_id, total = 0usize, "detection summary"),
        }
        Ok(summary)
    }

    /// One file through parse → featurize → score → report, advancing the
    /// caller's state marker at each stage boundary.
    fn process_file(&self, path: &Path, state: &mut FileState) -> Result<AlertReport, PipelineError> {
        info!(file = %path.display(), "processing");

        let records = LogLoader::load(path)?;
        *state = FileState::Parsed;
        info!(file = %records.source_file, records = records.len(), "parsed");

        let features = self.featurizer.extract(&records);
        if features.len() != records.len() {
            return Err(PipelineError::Inference {
                reason: format!(
                    "featurizer produced {} rows for {} records",
                    features.len(),
                    records.len()
                ),
            });
        }
        *state = FileState::Featurized;
        debug!(rows = features.len(), dim = features.dim, "featurized");

        let scores = self.scorer.detect(self.model.as_ref(), &features)?;
        *state = FileState::Scored;

        let report = AlertBuilder::build(&records, &scores, Utc::now());
        let out_path = self.config.output_dir.join(report_name(path));
        report::write_report(&report, &out_path)?;
        *state = FileState::Reported;

        Ok(report)
    }
}

/// `alerts_<stem>.csv` next to the combined report.
fn report_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    format!("alerts_{}.csv", stem)
}

/// Non-recursive scan for known log extensions; `.log` before `.csv` before
/// `.txt`, sorted within each extension so runs are deterministic.
pub fn discover_files(input_dir: &Path) -> Vec<PathBuf> {
    let mut groups: Vec<Vec<PathBuf>> = vec![Vec::new(); LOG_EXTENSIONS.len()];
    for entry in WalkDir::new(input_dir)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if let Some(pos) = LOG_EXTENSIONS
            .iter()
            .position(|&k| k.eq_ignore_ascii_case(ext))
        {
            groups[pos].push(path.to_path_buf());
        }
    }
    for group in &mut groups {
        group.sort();
    }
    groups.into_iter().flatten().collect()
}
