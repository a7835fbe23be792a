//! Deterministic lexical statistics per record: field counts, length stats,
//! character-class ratios, byte entropy, port-like values.

use super::{FeatureMatrix, Featurizer};
use crate::config::FeaturesConfig;
use crate::ingest::RecordSet;

pub struct LexicalFeaturizer {
    config: FeaturesConfig,
}

impl LexicalFeaturizer {
    pub fn new(config: FeaturesConfig) -> Self {
        Self { config }
    }
}

impl Featurizer for LexicalFeaturizer {
    fn feature_dim(&self) -> usize {
        self.config.feature_dim
    }

    fn extract(&self, records: &RecordSet) -> FeatureMatrix {
        let dim = self.config.feature_dim;
        let rows = (0..records.len())
            .map(|i| encode(&records.row(i), dim))
            .collect();
        FeatureMatrix { dim, rows }
    }
}

/// Encode one record's fields into a fixed-dim vector (normalized, padded or
/// truncated to `dim`).
fn encode(fields: &[String], dim: usize) -> Vec<f32> {
    let text = fields.join(" ");
    let bytes = text.as_bytes();
    let total_len = bytes.len();

    let mut digits = 0u32;
    let mut alpha = 0u32;
    let mut punct = 0u32;
    for &b in bytes {
        if b.is_ascii_digit() {
            digits += 1;
        } else if b.is_ascii_alphabetic() {
            alpha += 1;
        } else if b.is_ascii_punctuation() {
            punct += 1;
        }
    }
    let len_f = total_len.max(1) as f32;

    let numeric: Vec<f64> = fields.iter().filter_map(|f| f.parse::<f64>().ok()).collect();
    let ports = numeric
        .iter()
        .filter(|v| v.fract() == 0.0 && (1.0..=65535.0).contains(*v))
        .count();
    let numeric_sum: f64 = numeric.iter().map(|v| v.abs()).sum();
    let avg_field_len = total_len as f32 / fields.len().max(1) as f32;

    let raw: Vec<f32> = vec![
        (fields.len() as f32 / 64.0).min(1.0),
        (total_len as f32 / 1024.0).min(1.0),
        (avg_field_len / 256.0).min(1.0),
        digits as f32 / len_f,
        alpha as f32 / len_f,
        punct as f32 / len_f,
        byte_entropy(bytes) / 8.0,
        numeric.len() as f32 / fields.len().max(1) as f32,
        (numeric_sum.ln_1p() / 20.0).min(1.0) as f32,
        (ports as f32 / 8.0).min(1.0),
    ];

    // Pad or truncate to dim
    let mut out = vec![0.0f32; dim];
    let copy = raw.len().min(dim);
    out[..copy].copy_from_slice(&raw[..copy]);
    for v in &mut out {
        if !v.is_finite() {
            *v = 0.0;
        }
    }
    out
}

/// Shannon entropy over byte values, in bits (0..=8).
fn byte_entropy(data: &[u8]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let mut counts = [0u32; 256];
    for &b in data {
        counts[b as usize] += 1;
    }
    let total = data.len() as f32;
    let mut entropy = 0.0f32;
    for &c in &counts {
        if c > 0 {
            let p = c as f32 / total;
            entropy -= p * p.log2();
        }
    }
    entropy
}
