//! netriage entrypoint: one batch triage run over the configured input
//! directory. A model that cannot be loaded, or an unusable threshold,
//! aborts with a non-zero exit; per-file failures do not.

use netriage::{
    config::PipelineConfig, features::LexicalFeaturizer, logging::StructuredLogger,
    model::OnnxModel, runner::PipelineRunner,
};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("TRIAGE_CONFIG_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("netriage.json"));
    let config = PipelineConfig::load(&config_path)?;

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(
        input_dir = %config.input_dir.display(),
        output_dir = %config.output_dir.display(),
        threshold = config.detection.threshold,
        "netriage starting"
    );

    std::fs::create_dir_all(&config.output_dir)?;

    let model = OnnxModel::load(&config.model_path, config.features.feature_dim)?;
    info!(model = %config.model_path.display(), "model loaded");

    let featurizer = Box::new(LexicalFeaturizer::new(config.features.clone()));
    let runner = PipelineRunner::new(config, Box::new(model), featurizer);
    let summary = runner.run()?;

    info!(
        files = summary.files_processed,
        failed = summary.files_failed,
        alerts = summary.total_alerts,
        flagged = summary.total_flagged,
        "netriage run complete"
    );
    Ok(())
}
