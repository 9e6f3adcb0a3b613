//! Zentrale Konfiguration für den Robot-Composer.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── History ─────────────────────────────────────────────────────────

/// Maximale Anzahl an Undo-Schritten.
pub const HISTORY_DEPTH: usize = 200;

// ── Drag & Drop ────────────────────────────────────────────────────

/// Deckkraft der Drag-Vorschau (Ghost).
pub const GHOST_OPACITY: f32 = 0.45;
/// Höhe der Bodenebene (Y), auf die ein Ghost ohne passenden Slot fällt.
pub const GROUND_PLANE_HEIGHT: f32 = 0.0;

// ── Farben ─────────────────────────────────────────────────────────

/// Farbe des hervorgehobenen Slots / der Selektion (RGBA: Orange).
pub const HIGHLIGHT_COLOR: [f32; 4] = [1.0, 0.6, 0.1, 1.0];
/// Standardfarbe für Geometrie ohne eigene Farbe (RGBA: Hellgrau).
pub const DEFAULT_PART_COLOR: [f32; 4] = [0.75, 0.75, 0.78, 1.0];

/// Laufzeit-Optionen des Editors.
///
/// Wird als `robot_composer.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Maximale Undo-Tiefe (älteste Einträge fallen heraus)
    pub history_depth: usize,
    /// Maximaler Abstand Strahl↔Slot beim Andocken (`None` = unbegrenzt)
    pub slot_snap_max_distance: Option<f32>,
    /// Deckkraft der Drag-Vorschau
    pub ghost_opacity: f32,
    /// Farbe für Slot-Hervorhebung
    pub highlight_color: [f32; 4],
    /// Standardfarbe für Geometrie ohne eigene Farbe
    pub default_part_color: [f32; 4],
    /// Y-Höhe der Bodenebene für Drops ohne Slot
    pub ground_plane_height: f32,
    /// Pose-Änderungen auf das Raster des Slots einrasten
    pub apply_slot_snapping: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_depth: HISTORY_DEPTH,
            slot_snap_max_distance: None,
            ghost_opacity: GHOST_OPACITY,
            highlight_color: HIGHLIGHT_COLOR,
            default_part_color: DEFAULT_PART_COLOR,
            ground_plane_height: GROUND_PLANE_HEIGHT,
            apply_slot_snapping: true,
        }
    }
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler → Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("robot_composer"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("robot_composer.toml")
    }

    /// Quadrat des Andock-Grenzabstands (`None` = unbegrenzt).
    pub fn slot_snap_max_distance_sq(&self) -> Option<f32> {
        self.slot_snap_max_distance.map(|d| d * d)
    }
}
