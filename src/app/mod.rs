//! Application-Layer: Controller, State, Events, Handler und Undo-Engine.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
pub mod history;
mod intent_mapping;
/// Zustand einer Editor-Sitzung
pub mod state;

pub use command_log::{CommandLog, LogEntry};
pub use controller::AppController;
pub use events::{AppCommand, AppIntent, ExportFormat};
pub use history::{CommandHistory, Direction, EditCommand, HistoryEvent, HistoryStep};
pub use state::{AppState, ExportOutput, SelectionState, UiState, ViewState};
