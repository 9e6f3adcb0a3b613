//! Handler für Undo/Redo-Operationen.

use crate::app::AppState;
use crate::core::CommandError;
use anyhow::Context;

/// Führt einen Undo-Schritt aus, falls vorhanden.
pub fn undo(state: &mut AppState) -> anyhow::Result<()> {
    match state.history.undo(&mut state.robot) {
        Ok(()) => log::info!("Undo ausgeführt"),
        Err(CommandError::History(_)) => log::debug!("Undo: nichts zu tun"),
        Err(err) => return Err(err).context("Undo fehlgeschlagen"),
    }
    state.sync_after_history();
    Ok(())
}

/// Führt einen Redo-Schritt aus, falls vorhanden.
pub fn redo(state: &mut AppState) -> anyhow::Result<()> {
    match state.history.redo(&mut state.robot) {
        Ok(()) => log::info!("Redo ausgeführt"),
        Err(CommandError::History(_)) => log::debug!("Redo: nichts zu tun"),
        Err(err) => return Err(err).context("Redo fehlgeschlagen"),
    }
    state.sync_after_history();
    Ok(())
}
