//! netriage — batch threat triage over network activity logs.
//!
//! Modular structure:
//! - [`ingest`] — Log file loading (structured parse with raw-line fallback)
//! - [`features`] — Fixed-width numeric feature derivation per record
//! - [`model`] — ONNX classifier inference
//! - [`scoring`] — Threshold detection and severity tiers
//! - [`report`] — Alert construction and report serialization
//! - [`runner`] — Per-file pipeline orchestration and aggregation
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod error;
pub mod features;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;
pub mod runner;
pub mod scoring;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use features::{FeatureMatrix, Featurizer, LexicalFeaturizer};
pub use ingest::{LogLoader, RecordData, RecordSet};
pub use logging::StructuredLogger;
pub use model::{OnnxModel, ThreatModel};
pub use report::{Alert, AlertBuilder, AlertReport};
pub use runner::{FileState, PipelineRunner, RunSummary};
pub use scoring::{AlertLevel, ScoreResult, ThreatScorer};
