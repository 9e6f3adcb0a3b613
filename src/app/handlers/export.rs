//! Handler für den Export des Roboters.

use crate::app::state::ExportOutput;
use crate::app::{AppState, ExportFormat};
use crate::export::{write_x3d, DEFAULT_ASSET_BASE_URL};

/// Erzeugt den Export im gewünschten Format und legt ihn für den Host ab.
pub fn export(state: &mut AppState, format: ExportFormat) -> anyhow::Result<()> {
    let content = match format {
        ExportFormat::X3d => write_x3d(&state.robot, DEFAULT_ASSET_BASE_URL)?,
        ExportFormat::Json => state.robot.to_json()?,
    };
    log::info!("Export erzeugt: {:?}, {} Zeichen", format, content.len());
    state.ui.last_export = Some(ExportOutput { format, content });
    Ok(())
}
