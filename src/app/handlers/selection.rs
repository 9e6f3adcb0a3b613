//! Handler für Selektions-Operationen.

use crate::app::AppState;
use glam::Vec2;

/// Selektiert das Bauteil unter `screen_pos`; ein Klick ins Leere hebt die Selektion auf.
pub fn pick_part_at(state: &mut AppState, screen_pos: Vec2) {
    let viewport = state.view.viewport();
    let hit = state.picker.pick(
        &state.scene.borrow(),
        &state.view.camera,
        viewport,
        screen_pos,
    );

    match hit {
        Some(hit) => {
            log::debug!(
                "Bauteil {} selektiert (Element {} bei {:?})",
                hit.part_id,
                hit.local_id,
                hit.point
            );
            state.selection.select(hit.part_id, hit.container);
        }
        None => state.selection.clear(),
    }
    state.sync_highlight();
}

/// Hebt die Selektion auf.
pub fn clear(state: &mut AppState) {
    state.selection.clear();
    state.sync_highlight();
}
