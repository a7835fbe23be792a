//! ONNX classifier inference over batched feature matrices.

mod onnx;

pub use onnx::OnnxModel;

use crate::error::PipelineError;
use crate::features::FeatureMatrix;

/// Scoring capability: one threat probability in [0, 1] per matrix row.
/// Implementations must not mutate the features they are given.
pub trait ThreatModel: Send + Sync {
    fn score(&self, features: &FeatureMatrix) -> Result<Vec<f32>, PipelineError>;
}
