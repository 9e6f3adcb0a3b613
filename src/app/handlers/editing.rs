//! Handler für Bearbeitungs-Commands am selektierten Bauteil.

use crate::app::history::EditCommand;
use crate::app::AppState;
use crate::interaction::snapping::{snap_rotation, snap_translation};
use crate::shared::{parse_hex_color, to_hex_color};
use anyhow::Context;
use glam::{Quat, Vec3};

/// Entfernt das selektierte Bauteil samt Teilbaum.
pub fn remove_selected(state: &mut AppState) -> anyhow::Result<()> {
    let Some(part_id) = state.selection.selected_part else {
        return Ok(());
    };
    let command = EditCommand::remove_part(&state.robot, part_id)
        .with_context(|| format!("Bauteil {} kann nicht entfernt werden", part_id))?;
    execute(state, command)
}

/// Setzt die Position des selektierten Bauteils (relativ zu seinem Slot).
pub fn translate_selected(state: &mut AppState, translation: Vec3) -> anyhow::Result<()> {
    let Some(part_id) = state.selection.selected_part else {
        return Ok(());
    };
    let snapped = snap_translation(
        &state.robot,
        part_id,
        translation,
        state.options.apply_slot_snapping,
    );
    if state
        .robot
        .find_part(part_id)
        .is_some_and(|part| part.translation() == snapped)
    {
        return Ok(());
    }
    execute(state, EditCommand::translate(part_id, snapped))
}

/// Setzt die Orientierung des selektierten Bauteils.
pub fn rotate_selected(state: &mut AppState, rotation: Quat) -> anyhow::Result<()> {
    let Some(part_id) = state.selection.selected_part else {
        return Ok(());
    };
    let snapped = snap_rotation(
        &state.robot,
        part_id,
        rotation,
        state.options.apply_slot_snapping,
    );
    execute(state, EditCommand::rotate(part_id, snapped))
}

/// Setzt die Farbe des selektierten Bauteils.
///
/// Zulässig sind die Farben aus den Asset-Parametern oder ein freier Hex-Wert,
/// der als `#rrggbb` normalisiert wird.
pub fn set_selected_color(state: &mut AppState, color: Option<String>) -> anyhow::Result<()> {
    let Some(part_id) = state.selection.selected_part else {
        return Ok(());
    };
    let Some(part) = state.robot.find_part(part_id) else {
        return Ok(());
    };
    let color = match color {
        Some(color) if !part.asset().color_choices().contains(&color) => {
            match parse_hex_color(&color) {
                Some(rgba) => Some(to_hex_color(rgba)),
                None => {
                    log::warn!("Ungültige Farbe '{}' für Bauteil {}", color, part_id);
                    return Ok(());
                }
            }
        }
        other => other,
    };
    if part.color() == color.as_deref() {
        return Ok(());
    }
    execute(state, EditCommand::set_color(part_id, color))
}

fn execute(state: &mut AppState, command: EditCommand) -> anyhow::Result<()> {
    let label = command.label();
    state
        .history
        .execute(&mut state.robot, command)
        .with_context(|| format!("{} fehlgeschlagen", label))?;
    state.sync_after_history();
    Ok(())
}
