use crate::app::ExportFormat;
use indexmap::IndexSet;

/// Ergebnis des letzten Exports (vom Host in eine Datei geschrieben).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutput {
    pub format: ExportFormat,
    pub content: String,
}

/// Vom UI gelesener, abgeleiteter Zustand.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Undo-Button aktiv
    pub can_undo: bool,
    /// Redo-Button aktiv
    pub can_redo: bool,
    /// Assets, die aktuell aus dem Katalog gezogen werden dürfen
    pub draggable_assets: IndexSet<String>,
    /// Zuletzt erzeugter Export
    pub last_export: Option<ExportOutput>,
    /// Statuszeile
    pub status_message: Option<String>,
}

impl UiState {
    /// Erstellt den Ausgangszustand (nichts rückgängig zu machen).
    pub fn new() -> Self {
        Self::default()
    }
}
