//! Mapping von UI-Intents auf mutierende App-Commands.
//!
//! Hier werden Vorbedingungen geprüft (Undo verfügbar, Asset ziehbar,
//! Selektion vorhanden). Ein unzulässiger Intent ergibt keine Commands.

use super::{AppCommand, AppIntent, AppState};

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    let dragging = state.drag.is_dragging();
    let has_selection = !state.selection.is_empty();

    match intent {
        AppIntent::FrameStarted => vec![AppCommand::PumpAssetLoads],
        AppIntent::ViewportResized { size } => vec![AppCommand::SetViewportSize { size }],
        AppIntent::ResetCameraRequested => vec![AppCommand::ResetCamera],
        AppIntent::CameraFocusRequested { target } => vec![AppCommand::FocusCamera { target }],

        AppIntent::AssetDragStarted { asset_name } => {
            if state.is_draggable(&asset_name) {
                vec![AppCommand::StartAssetDrag { asset_name }]
            } else {
                log::debug!("Asset '{}' ist aktuell nicht einsetzbar", asset_name);
                vec![]
            }
        }
        AppIntent::DragPointerMoved { screen_pos } if dragging => {
            vec![AppCommand::UpdateDragHover { screen_pos }]
        }
        AppIntent::AssetDropped { screen_pos } if dragging => {
            vec![AppCommand::DropDraggedAsset { screen_pos }]
        }
        AppIntent::DragCancelled if dragging => vec![AppCommand::CancelAssetDrag],
        AppIntent::DragPointerMoved { .. }
        | AppIntent::AssetDropped { .. }
        | AppIntent::DragCancelled => vec![],

        AppIntent::ViewportClicked { screen_pos } => {
            if dragging {
                vec![]
            } else {
                vec![AppCommand::PickPartAt { screen_pos }]
            }
        }
        AppIntent::SelectionClearRequested => vec![AppCommand::ClearSelection],

        AppIntent::UndoRequested if state.can_undo() => vec![AppCommand::Undo],
        AppIntent::RedoRequested if state.can_redo() => vec![AppCommand::Redo],
        AppIntent::UndoRequested | AppIntent::RedoRequested => vec![],

        AppIntent::DeleteSelectedRequested if has_selection => {
            vec![AppCommand::RemoveSelectedPart]
        }
        AppIntent::SelectedTranslationEdited { translation } if has_selection => {
            vec![AppCommand::TranslateSelectedPart { translation }]
        }
        AppIntent::SelectedRotationEdited { rotation } if has_selection => {
            vec![AppCommand::RotateSelectedPart { rotation }]
        }
        AppIntent::SelectedColorChosen { color } if has_selection => {
            vec![AppCommand::SetSelectedPartColor { color }]
        }
        AppIntent::DeleteSelectedRequested
        | AppIntent::SelectedTranslationEdited { .. }
        | AppIntent::SelectedRotationEdited { .. }
        | AppIntent::SelectedColorChosen { .. } => vec![],

        AppIntent::ExportRequested { format } => vec![AppCommand::Export { format }],
        AppIntent::OptionsChanged { options } => vec![AppCommand::ApplyOptions { options }],
    }
}
