//! Handler für Kamera, Viewport, Frame-Takt und Optionen.

use crate::app::AppState;
use crate::interaction::Camera3D;
use crate::shared::EditorOptions;
use glam::Vec3;

/// Setzt die Viewport-Größe (der ID-Puffer folgt beim nächsten Pick).
pub fn set_viewport_size(state: &mut AppState, size: [f32; 2]) {
    state.view.viewport_size = size;
}

/// Setzt die Kamera auf die Standardansicht zurück.
pub fn reset_camera(state: &mut AppState) {
    state.view.camera = Camera3D::default();
}

/// Richtet die Kamera auf `target` aus.
pub fn focus_camera(state: &mut AppState, target: Vec3) {
    state.view.camera.look_at(target);
}

/// Arbeitet abgeschlossene Ladevorgänge ein.
pub fn pump_asset_loads(state: &mut AppState) {
    let delivered = state.pump_asset_loads();
    if delivered > 0 {
        log::debug!("{} Repräsentation(en) ausgeliefert", delivered);
    }
}

/// Übernimmt geänderte Optionen.
///
/// Die History-Tiefe wirkt erst in der nächsten Sitzung.
pub fn apply_options(state: &mut AppState, options: EditorOptions) {
    if options.history_depth != state.options.history_depth {
        log::info!(
            "History-Tiefe {} gilt ab der nächsten Sitzung",
            options.history_depth
        );
    }
    {
        let mut scene = state.scene.borrow_mut();
        scene.set_default_color(options.default_part_color);
        scene.set_highlight_color(options.highlight_color);
    }
    state.options = options;
    state.picker.mark_dirty();
}
