//! Threshold detection and severity tiers over model probabilities.

mod engine;

pub use engine::{AlertLevel, ScoreResult, ThreatScorer};
