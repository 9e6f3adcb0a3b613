//! Handler für Drag & Drop aus dem Asset-Katalog.

use crate::app::history::EditCommand;
use crate::app::AppState;
use crate::core::Part;
use crate::interaction::{DropAction, Ghost};
use anyhow::Context;
use glam::Vec2;
use std::rc::Rc;
use std::sync::Arc;

/// Beginnt einen Drag: legt die Vorschau an und fordert ihre Repräsentation an.
pub fn start(state: &mut AppState, asset_name: &str) -> anyhow::Result<()> {
    let asset = state
        .catalog
        .resolve(asset_name)
        .map(Arc::clone)
        .context("Drag konnte nicht beginnen")?;
    let ghost = Ghost::spawn(
        Rc::clone(&state.scene),
        &state.loads,
        asset_name,
        state.options.ghost_opacity,
    );
    state.drag.start(&state.scene, asset, ghost);
    Ok(())
}

/// Aktualisiert Slot-Ziel und Vorschau für die neue Zeigerposition.
pub fn update_hover(state: &mut AppState, screen_pos: Vec2) {
    let ray = state
        .view
        .camera
        .screen_to_ray(screen_pos, state.view.viewport());
    state.drag.pointer_moved(&state.scene, ray, &state.options);
}

/// Beendet den Drag und führt das passende Einsetz-Command aus.
///
/// Ohne passenden Slot wird nur ein zulässiges Wurzel-Asset eingesetzt,
/// sonst bleibt der Drop wirkungslos.
pub fn drop(state: &mut AppState, screen_pos: Vec2) -> anyhow::Result<()> {
    let ray = state
        .view
        .camera
        .screen_to_ray(screen_pos, state.view.viewport());
    let Some(action) = state.drag.drop_at(&state.scene, ray, &state.options) else {
        return Ok(());
    };

    let (part, command) = match action {
        DropAction::AttachToSlot {
            asset,
            parent,
            slot_name,
        } => {
            let part = Part::new(asset);
            let id = part.id();
            (id, EditCommand::add_part(parent, slot_name, part))
        }
        DropAction::AddRoot { asset, translation } => {
            if !asset.root || state.robot.has_root_part() {
                log::info!("Drop ohne Ziel verworfen: {}", asset.name);
                state.sync_highlight();
                return Ok(());
            }
            let part = Part::new(asset).with_translation(translation);
            let id = part.id();
            (id, EditCommand::add_root_part(part))
        }
    };

    state
        .history
        .execute(&mut state.robot, command)
        .context("Bauteil konnte nicht eingesetzt werden")?;
    state.selection.selected_part = Some(part);
    state.sync_after_history();
    Ok(())
}

/// Bricht den Drag ab.
pub fn cancel(state: &mut AppState) {
    state.drag.cancel(&state.scene);
    state.sync_highlight();
}
