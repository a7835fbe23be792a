//! Error taxonomy for a triage run: a model that cannot be loaded aborts the
//! whole run, everything else is scoped to the file that raised it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fatal: without a model nothing can be scored.
    #[error("cannot load model from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    /// Scoring failed for one file; the file is skipped and the run continues.
    #[error("inference failed: {reason}")]
    Inference { reason: String },

    /// The model returned a score sequence that does not line up with the rows it was given.
    #[error("model returned {got} scores for {expected} records")]
    ScoreShape { expected: usize, got: usize },

    /// Fatal at startup: the configured threshold is unusable.
    #[error("invalid detection threshold {raw:?}: expected a number in [0, 1]")]
    InvalidThreshold { raw: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
