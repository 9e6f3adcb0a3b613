//! Application Controller für zentrale Event-Verarbeitung.

use super::{AppCommand, AppIntent, AppState};

/// Orchestriert UI-Events und Handler auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: AppIntent) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus und protokolliert sie
    /// mit dem ausgelösten History-Schritt.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        let revision = state.history.revision();
        self.dispatch(state, command.clone())?;
        let step = state
            .history
            .last_step()
            .filter(|step| step.revision != revision);
        state.command_log.record(command, step);
        Ok(())
    }

    /// Dispatcht an Feature-Handler in `handlers/`.
    fn dispatch(&mut self, state: &mut AppState, command: AppCommand) -> anyhow::Result<()> {
        use super::handlers;

        match command {
            // === Frame & Viewport ===
            AppCommand::PumpAssetLoads => handlers::view::pump_asset_loads(state),
            AppCommand::SetViewportSize { size } => handlers::view::set_viewport_size(state, size),
            AppCommand::ResetCamera => handlers::view::reset_camera(state),
            AppCommand::FocusCamera { target } => handlers::view::focus_camera(state, target),
            AppCommand::ApplyOptions { options } => handlers::view::apply_options(state, *options),

            // === Drag & Drop ===
            AppCommand::StartAssetDrag { asset_name } => handlers::drag::start(state, &asset_name)?,
            AppCommand::UpdateDragHover { screen_pos } => {
                handlers::drag::update_hover(state, screen_pos)
            }
            AppCommand::DropDraggedAsset { screen_pos } => handlers::drag::drop(state, screen_pos)?,
            AppCommand::CancelAssetDrag => handlers::drag::cancel(state),

            // === Selektion ===
            AppCommand::PickPartAt { screen_pos } => {
                handlers::selection::pick_part_at(state, screen_pos)
            }
            AppCommand::ClearSelection => handlers::selection::clear(state),

            // === History ===
            AppCommand::Undo => handlers::history::undo(state)?,
            AppCommand::Redo => handlers::history::redo(state)?,

            // === Bearbeiten ===
            AppCommand::RemoveSelectedPart => handlers::editing::remove_selected(state)?,
            AppCommand::TranslateSelectedPart { translation } => {
                handlers::editing::translate_selected(state, translation)?
            }
            AppCommand::RotateSelectedPart { rotation } => {
                handlers::editing::rotate_selected(state, rotation)?
            }
            AppCommand::SetSelectedPartColor { color } => {
                handlers::editing::set_selected_color(state, color)?
            }

            // === Export ===
            AppCommand::Export { format } => handlers::export::export(state, format)?,
        }

        Ok(())
    }
}
