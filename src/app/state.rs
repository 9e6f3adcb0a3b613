//! Application State: zentrale Datenhaltung einer Editor-Sitzung.

mod app_state;
mod selection;
mod ui;
mod view;

pub use app_state::AppState;
pub use selection::SelectionState;
pub use ui::{ExportOutput, UiState};
pub use view::ViewState;
