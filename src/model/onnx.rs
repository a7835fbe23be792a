//! ONNX Runtime inference. Input: [n, feature_dim] f32. Prefers a
//! probability output when the model exposes one; otherwise the hard 0/1
//! decision output stands in for the probability.

use super::ThreatModel;
use crate::error::PipelineError;
use crate::features::FeatureMatrix;
use ndarray::Array2;
use std::path::Path;
use std::sync::OnceLock;

static ORT_ENV: OnceLock<()> = OnceLock::new();

fn init_env() {
    ORT_ENV.get_or_init(|| {
        ort::init()
            .with_name("netriage")
            .commit()
            .expect("ORT environment");
    });
}

#[derive(Debug)]
pub struct OnnxModel {
    session: ort::Session,
    input_name: String,
    /// Index of a probability-shaped output, when the model has one.
    prob_output: Option<usize>,
    feature_dim: usize,
}

impl OnnxModel {
    /// Load the classifier artifact. A missing or undeserializable artifact
    /// is fatal to the run: without a model nothing can be scored.
    pub fn load(path: &Path, feature_dim: usize) -> Result<Self, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::ModelLoad {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        init_env();
        let session = ort::Session::builder()
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| PipelineError::ModelLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "input".to_string());

        // sklearn-style converters emit a decision output plus a probability
        // output; prefer the latter when present.
        let prob_output = session
            .outputs
            .iter()
            .position(|o| o.name.to_ascii_lowercase().contains("prob"));

        Ok(Self {
            session,
            input_name,
            prob_output,
            feature_dim,
        })
    }
}

impl ThreatModel for OnnxModel {
    /// One probability per row, clamped to [0, 1].
    fn score(&self, features: &FeatureMatrix) -> Result<Vec<f32>, PipelineError> {
        if features.is_empty() {
            return Ok(Vec::new());
        }
        if features.dim != self.feature_dim {
            return Err(PipelineError::Inference {
                reason: format!(
                    "feature width {} does not match model width {}",
                    features.dim, self.feature_dim
                ),
            });
        }

        let n = features.len();
        let arr = Array2::from_shape_vec((n, self.feature_dim), features.to_flat())
            .map_err(|e| PipelineError::Inference {
                reason: e.to_string(),
            })?;
        let shape = arr.shape().to_vec();
        let input = ort::Value::from_array((shape, arr.into_raw_vec())).map_err(|e| {
            PipelineError::Inference {
                reason: e.to_string(),
            }
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input].map_err(|e| {
            PipelineError::Inference {
                reason: e.to_string(),
            }
        })?;
        let outputs = self.session.run(inputs).map_err(|e| PipelineError::Inference {
            reason: e.to_string(),
        })?;

        let idx = self.prob_output.unwrap_or(0);
        let out = self
            .session
            .outputs
            .get(idx)
            .and_then(|o| outputs.get(o.name.as_str()))
            .ok_or_else(|| PipelineError::Inference {
                reason: format!("model produced no output at index {}", idx),
            })?;

        let scores = extract_scores(out, n)?;
        Ok(scores.into_iter().map(|v| v.clamp(0.0, 1.0)).collect())
    }
}

/// Pull per-row scores out of a tensor shaped [n] or [n, k]; the class-
/// probability layout puts the positive class in the last column.
fn extract_scores(tensor: &ort::Value, n: usize) -> Result<Vec<f32>, PipelineError> {
    let raw: Vec<f32> = if let Ok(view) = tensor.try_extract_raw_tensor::<f32>() {
        view.1.to_vec()
    } else if let Ok(view) = tensor.try_extract_raw_tensor::<i64>() {
        view.1.iter().map(|&v| v as f32).collect()
    } else {
        return Err(PipelineError::Inference {
            reason: "unsupported output tensor type".to_string(),
        });
    };

    if raw.len() == n {
        return Ok(raw);
    }
    if n > 0 && raw.len() % n == 0 {
        let k = raw.len() / n;
        return Ok(raw.chunks(k).map(|row| row[k - 1]).collect());
    }
    Err(PipelineError::ScoreShape {
        expected: n,
        got: raw.len(),
    })
}
