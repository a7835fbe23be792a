//! Applies the detection threshold to model probabilities and assigns each
//! record a severity tier.

use crate::error::PipelineError;
use crate::features::FeatureMatrix;
use crate::model::ThreatModel;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertLevel {
    /// Tier edges favor the higher tier at 0.75 and 0.9; exactly 0.5 stays
    /// LOW, and a probability of 0 is LOW by assignment.
    pub fn from_probability(p: f32) -> Self {
        if p >= 0.9 {
            AlertLevel::Critical
        } else if p >= 0.75 {
            AlertLevel::High
        } else if p > 0.5 {
            AlertLevel::Medium
        } else {
            AlertLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Low => "LOW",
            AlertLevel::Medium => "MEDIUM",
            AlertLevel::High => "HIGH",
            AlertLevel::Critical => "CRITICAL",
        }
    }
}

/// Parallel probability / prediction sequences, index-aligned with the
/// feature matrix that produced them.
#[derive(Debug, Clone, Default)]
pub struct ScoreResult {
    pub probabilities: Vec<f32>,
    pub predictions: Vec<u8>,
}

impl ScoreResult {
    /// Ties at exactly the threshold count as detected.
    pub fn from_probabilities(probabilities: Vec<f32>, threshold: f32) -> Self {
        let predictions = probabilities
            .iter()
            .map(|&p| u8::from(p >= threshold))
            .collect();
        Self {
            probabilities,
            predictions,
        }
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn flagged(&self) -> usize {
        self.predictions.iter().map(|&p| p as usize).sum()
    }
}

pub struct ThreatScorer {
    threshold: f32,
}

impl ThreatScorer {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Score a feature matrix. A scoring failure or a shape mismatch from
    /// the model invalidates this file's results and is surfaced to the
    /// caller; other files are unaffected.
    pub fn detect(
        &self,
        model: &dyn ThreatModel,
        features: &FeatureMatrix,
    ) -> Result<ScoreResult, PipelineError> {
        let probabilities = model.score(features)?;
        if probabilities.len() != features.len() {
            return Err(PipelineError::ScoreShape {
                expected: features.len(),
                got: probabilities.len(),
            });
        }

        let result = ScoreResult::from_probabilities(probabilities, self.threshold);
        info!(records = result.len(), flagged = result.flagged(), "threat detection complete");
        Ok(result)
    }
}
