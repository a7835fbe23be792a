//! End-to-end runs against stub scoring models: aggregation across files,
//! per-file failure isolation, empty input handling, threshold boundary.

use netriage::config::PipelineConfig;
use netriage::error::PipelineError;
use netriage::features::{FeatureMatrix, LexicalFeaturizer};
use netriage::model::ThreatModel;
use netriage::runner::{discover_files, PipelineRunner};
use std::io::Write;
use std::path::Path;

/// Returns a fixed probability sequence, cycled over the input rows; can be
/// told to fail whenever it sees a matrix with a given row count.
struct StubModel {
    probabilities: Vec<f32>,
    fail_on_rows: Option<usize>,
}

impl StubModel {
    fn constant(p: f32) -> Self {
        Self {
            probabilities: vec![p],
            fail_on_rows: None,
        }
    }
}

impl ThreatModel for StubModel {
    fn score(&self, features: &FeatureMatrix) -> Result<Vec<f32>, PipelineError> {
        if self.fail_on_rows == Some(features.len()) {
            return Err(PipelineError::Inference {
                reason: "induced failure".to_string(),
            });
        }
        Ok((0..features.len())
            .map(|i| self.probabilities[i % self.probabilities.len()])
            .collect())
    }
}

fn write_file(dir: &Path, name: &str, content: &str) {
    let mut f = std::fs::File::create(dir.join(name)).unwrap();
    f.write_all(content.as_bytes()).unwrap();
}

fn make_runner(input: &Path, output: &Path, model: StubModel) -> PipelineRunner {
    let config = PipelineConfig {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        ..PipelineConfig::default()
    };
    let featurizer = Box::new(LexicalFeaturizer::new(config.features.clone()));
    PipelineRunner::new(config, Box::new(model), featurizer)
}

fn data_rows(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(1)
        .map(|l| l.to_string())
        .collect()
}

#[test]
fn discovery_orders_by_extension_then_name() {
    let input = tempfile::tempdir().unwrap();
    write_file(input.path(), "z.log", "x\n");
    write_file(input.path(), "a.txt", "x\n");
    write_file(input.path(), "b.csv", "a,b\n1,2\n");
    write_file(input.path(), "a.log", "x\n");
    write_file(input.path(), "notes.md", "ignored\n");

    let names: Vec<String> = discover_files(input.path())
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a.log", "z.log", "b.csv", "a.txt"]);
}

#[test]
fn run_aggregates_all_files_in_discovery_order() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(input.path(), "a.log", "line one\nline two\n");
    write_file(input.path(), "b.csv", "src_ip,bytes\n10.0.0.1,10\n10.0.0.2,20\n10.0.0.3,30\n");

    let runner = make_runner(input.path(), output.path(), StubModel::constant(0.95));
    let summary = runner.run().unwrap();

    assert_eq!(summary.files_processed, 2);
    assert_eq!(summary.files_failed, 0);
    assert_eq!(summary.total_alerts, 5);
    assert_eq!(summary.total_flagged, 5);
    assert_eq!(summary.flag_rate, Some(100.0));

    assert_eq!(data_rows(&output.path().join("alerts_a.csv")).len(), 2);
    assert_eq!(data_rows(&output.path().join("alerts_b.csv")).len(), 3);

    let combined = data_rows(&output.path().join("alerts.csv"));
    assert_eq!(combined.len(), 5);
    // a.log rows precede b.csv rows.
    assert!(combined[0].contains("a.log"));
    assert!(combined[4].contains("b.csv"));
}

#[test]
fn failed_file_is_isolated_and_run_succeeds() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(input.path(), "good.log", "one\ntwo\n");
    write_file(input.path(), "poison.log", "one\ntwo\nthree\n");

    let model = StubModel {
        probabilities: vec![0.95],
        fail_on_rows: Some(3),
    };
    let runner = make_runner(input.path(), output.path(), model);
    let summary = runner.run().unwrap();

    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.files_failed, 1);
    assert_eq!(summary.total_alerts, 2);

    // Only the survivor contributes rows; the failed file leaves no report.
    let combined = data_rows(&output.path().join("alerts.csv"));
    assert_eq!(combined.len(), 2);
    assert!(combined.iter().all(|r| r.contains("good.log")));
    assert!(!output.path().join("alerts_poison.csv").exists());
}

#[test]
fn empty_input_dir_writes_header_only_combined_report() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let runner = make_runner(input.path(), output.path(), StubModel::constant(0.5));
    let summary = runner.run().unwrap();

    assert_eq!(summary.total_alerts, 0);
    assert_eq!(summary.flag_rate, None);

    let content = std::fs::read_to_string(output.path().join("alerts.csv")).unwrap();
    assert_eq!(
        content,
        "source_file,threat_detected,threat_probability,alert_level,timestamp\n"
    );
}

#[test]
fn empty_input_file_yields_empty_report_not_failure() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(input.path(), "empty.log", "");

    let runner = make_runner(input.path(), output.path(), StubModel::constant(0.95));
    let summary = runner.run().unwrap();

    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.files_failed, 0);
    assert_eq!(summary.total_alerts, 0);
    assert_eq!(summary.flag_rate, None);
    assert_eq!(data_rows(&output.path().join("alerts_empty.csv")).len(), 0);
}

#[test]
fn threshold_boundary_scenario() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(
        input.path(),
        "flows.csv",
        "src_ip,bytes\n10.0.0.1,1\n10.0.0.2,2\n10.0.0.3,3\n10.0.0.4,4\n",
    );

    let model = StubModel {
        probabilities: vec![0.2, 0.85, 0.9, 0.5],
        fail_on_rows: None,
    };
    let runner = make_runner(input.path(), output.path(), model);
    let summary = runner.run().unwrap();

    assert_eq!(summary.total_alerts, 4);
    assert_eq!(summary.total_flagged, 2);
    assert_eq!(summary.flag_rate, Some(50.0));

    let rows = data_rows(&output.path().join("alerts_flows.csv"));
    let detected: Vec<&str> = rows.iter().map(|r| r.split(',').nth(3).unwrap()).collect();
    let levels: Vec<&str> = rows.iter().map(|r| r.split(',').nth(5).unwrap()).collect();
    assert_eq!(detected, vec!["0", "1", "1", "0"]);
    assert_eq!(levels, vec!["LOW", "HIGH", "CRITICAL", "LOW"]);
}

#[test]
fn report_timestamps_are_shared_within_a_file() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(input.path(), "a.log", "one\ntwo\nthree\n");

    let runner = make_runner(input.path(), output.path(), StubModel::constant(0.1));
    runner.run().unwrap();

    let rows = data_rows(&output.path().join("alerts_a.csv"));
    let timestamps: Vec<&str> = rows.iter().map(|r| r.rsplit(',').next().unwrap()).collect();
    assert!(timestamps.windows(2).all(|w| w[0] == w[1]));
}
