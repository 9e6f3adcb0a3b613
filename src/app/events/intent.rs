use super::command::ExportFormat;
use crate::shared::EditorOptions;
use glam::{Quat, Vec2, Vec3};

/// App-Intent Events.
/// Intents sind Eingaben aus UI/System ohne direkte Mutationslogik.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Neuer Frame beginnt (abgeschlossene Ladevorgänge einarbeiten)
    FrameStarted,
    /// Viewport-Größe hat sich geändert
    ViewportResized { size: [f32; 2] },
    /// Kamera auf Standard zurücksetzen
    ResetCameraRequested,
    /// Kamera auf einen Weltpunkt ausrichten
    CameraFocusRequested { target: Vec3 },

    /// Katalogeintrag wird in den Viewport gezogen
    AssetDragStarted { asset_name: String },
    /// Zeiger bewegt sich während eines Drags
    DragPointerMoved { screen_pos: Vec2 },
    /// Zeiger wurde über dem Viewport losgelassen
    AssetDropped { screen_pos: Vec2 },
    /// Drag abgebrochen (Escape, Zeiger verlässt das Fenster)
    DragCancelled,

    /// Einfacher Klick in den Viewport (Bauteil-Pick)
    ViewportClicked { screen_pos: Vec2 },
    /// Selektion aufheben
    SelectionClearRequested,

    /// Letzten Schritt rückgängig machen
    UndoRequested,
    /// Rückgängig gemachten Schritt wiederholen
    RedoRequested,

    /// Selektiertes Bauteil samt Teilbaum entfernen
    DeleteSelectedRequested,
    /// Position des selektierten Bauteils im Eigenschaften-Panel geändert
    SelectedTranslationEdited { translation: Vec3 },
    /// Orientierung des selektierten Bauteils geändert
    SelectedRotationEdited { rotation: Quat },
    /// Farbe des selektierten Bauteils gewählt (`None` = Standardfarbe)
    SelectedColorChosen { color: Option<String> },

    /// Export des aktuellen Roboters anfordern
    ExportRequested { format: ExportFormat },
    /// Optionen wurden im Dialog geändert
    OptionsChanged { options: Box<EditorOptions> },
}
