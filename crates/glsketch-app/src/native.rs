//! Native script runner.

use crate::app::{App, AppConfig, AppError};
use crate::script::SessionScript;
use glsketch_core::storage::FileStorage;
use std::path::Path;

/// Replay the script at `path` and export the final scene.
///
/// Configuration comes from `GLSKETCH_*` environment variables. Returns the
/// exported file name.
pub async fn run_script_file(path: &Path) -> Result<String, AppError> {
    let config = AppConfig::from_env()?;
    log::info!(
        "Viewport {}x{}, exporting to {}",
        config.width,
        config.height,
        config.export_dir.display()
    );

    let json = std::fs::read_to_string(path)?;
    let script = SessionScript::from_json(&json)?;
    let storage = FileStorage::new(config.export_dir.clone())?;
    let mut app = App::new(config, storage)?;

    let report = script.replay(&mut app).await;
    log::info!(
        "Replayed {} steps ({} failed), {} frames rendered",
        report.steps,
        report.failures,
        report.frames
    );
    for (index, batch) in app.renderer().batches().enumerate() {
        log::info!("Draw {index}: {:?} x{}", batch.mode, batch.count);
    }

    let file_name = app.export().await?;
    let documents = app.documents().await?;
    log::info!(
        "{} documents in {}: {}",
        documents.len(),
        app.config().export_dir.display(),
        documents.join(", ")
    );
    Ok(file_name)
}
