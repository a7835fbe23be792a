//! Pipeline configuration. Built once at the entry point and passed in by
//! value; components never read the environment themselves.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory scanned (non-recursively) for input log files
    pub input_dir: PathBuf,
    /// Directory receiving per-file and combined alert reports
    pub output_dir: PathBuf,
    /// Path to the ONNX classifier artifact
    pub model_path: PathBuf,
    /// Detection threshold
    pub detection: DetectionConfig,
    /// Feature extraction parameters
    pub features: FeaturesConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Probability at/above which a record is flagged (0.0–1.0)
    pub threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Number of numerical features expected by the model
    pub feature_dim: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("/input/logs"),
            output_dir: PathBuf::from("/output"),
            model_path: PathBuf::from("/app/model.onnx"),
            detection: DetectionConfig::default(),
            features: FeaturesConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self { threshold: 0.85 }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self { feature_dim: 10 }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl PipelineConfig {
    /// Load from JSON file if present, defaults otherwise, then apply
    /// environment overrides. An unusable `DETECTION_THRESHOLD` aborts
    /// startup rather than scoring a whole batch against a bad cutoff.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let mut config = Self::read_file(path).unwrap_or_default();
        config.apply_env()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Option<Self> {
        let data = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    fn apply_env(&mut self) -> Result<(), PipelineError> {
        if let Ok(raw) = std::env::var("DETECTION_THRESHOLD") {
            self.detection.threshold = parse_threshold(&raw)?;
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.log.level = level;
        }
        if let Ok(dir) = std::env::var("TRIAGE_INPUT_DIR") {
            self.input_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("TRIAGE_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("TRIAGE_MODEL_PATH") {
            self.model_path = PathBuf::from(path);
        }
        Ok(())
    }
}

/// A threshold must be a finite real in [0, 1].
pub fn parse_threshold(raw: &str) -> Result<f32, PipelineError> {
    let value: f32 = raw.trim().parse().map_err(|_| PipelineError::InvalidThreshold {
        raw: raw.to_string(),
    })?;
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(PipelineError::InvalidThreshold {
            raw: raw.to_string(),
        });
    }
    Ok(value)
}
