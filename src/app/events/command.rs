use crate::shared::EditorOptions;
use glam::{Quat, Vec2, Vec3};

/// Zielformat eines Exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// X3D-Szenenbeschreibung
    X3d,
    /// JSON-Abbild von `Robot::serialize()`
    Json,
}

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Abgeschlossene Repräsentations-Ladevorgänge ausliefern
    PumpAssetLoads,
    /// Viewport-Größe setzen
    SetViewportSize { size: [f32; 2] },
    /// Kamera zurücksetzen
    ResetCamera,
    /// Kamera auf Punkt ausrichten
    FocusCamera { target: Vec3 },

    /// Drag eines Katalog-Assets beginnen (Ghost anlegen)
    StartAssetDrag { asset_name: String },
    /// Slot-Auflösung und Ghost für neue Zeigerposition aktualisieren
    UpdateDragHover { screen_pos: Vec2 },
    /// Drag beenden und Bauteil einsetzen
    DropDraggedAsset { screen_pos: Vec2 },
    /// Drag verwerfen
    CancelAssetDrag,

    /// Bauteil unter dem Zeiger selektieren (leer = Selektion aufheben)
    PickPartAt { screen_pos: Vec2 },
    /// Selektion aufheben
    ClearSelection,

    /// Undo-Schritt
    Undo,
    /// Redo-Schritt
    Redo,

    /// Selektiertes Bauteil entfernen
    RemoveSelectedPart,
    /// Selektiertes Bauteil an neue Position setzen
    TranslateSelectedPart { translation: Vec3 },
    /// Selektiertes Bauteil neu ausrichten
    RotateSelectedPart { rotation: Quat },
    /// Farbe des selektierten Bauteils setzen
    SetSelectedPartColor { color: Option<String> },

    /// Roboter exportieren
    Export { format: ExportFormat },
    /// Neue Optionen übernehmen
    ApplyOptions { options: Box<EditorOptions> },
}
