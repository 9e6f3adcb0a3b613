//! Fehlertypen des Domänenmodells und der Undo-Engine.

use super::PartId;
use thiserror::Error;

/// Verletzung einer Modell-Invariante (Programmierfehler des Aufrufers).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Kein Bauteil mit dieser ID im Baum
    #[error("Bauteil {0} existiert nicht im Roboter")]
    UnknownPart(PartId),
    /// Asset besitzt keinen Slot dieses Namens
    #[error("Asset '{asset}' hat keinen Slot '{slot}'")]
    UnknownSlot { asset: String, slot: String },
    /// Slot ist bereits belegt
    #[error("Slot '{slot}' ist bereits belegt")]
    SlotOccupied { slot: String },
    /// Das Bauteil passt nicht in diesen Slot-Typ
    #[error("Asset '{asset}' passt nicht in Slot-Typ '{slot_type}'")]
    SlotTypeMismatch { asset: String, slot_type: String },
    /// Bauteil hängt nicht in einem Slot dieses Elternteils
    #[error("Bauteil {part} hängt nicht an Bauteil {parent}")]
    NotAChild { parent: PartId, part: PartId },
    /// Roboter hat bereits ein Wurzelbauteil
    #[error("Roboter besitzt bereits ein Wurzelbauteil")]
    RootPartPresent,
    /// Roboter hat kein Wurzelbauteil
    #[error("Roboter besitzt kein Wurzelbauteil")]
    NoRootPart,
    /// Asset darf nicht als Wurzel eingesetzt werden
    #[error("Asset '{0}' ist nicht als Wurzelbauteil zulässig")]
    NotRootEligible(String),
    /// Asset ist nicht im Katalog
    #[error("Asset '{0}' ist nicht im Katalog")]
    UnknownAsset(String),
    /// Command wurde in inkonsistentem Zustand angewendet
    #[error("Command-Zustand inkonsistent: {0}")]
    CommandState(&'static str),
}

/// Grenzfehler der Undo/Redo-History.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// Nichts mehr rückgängig zu machen
    #[error("Kein weiterer Undo-Schritt vorhanden")]
    NoMoreUndo,
    /// Nichts mehr wiederherzustellen
    #[error("Kein weiterer Redo-Schritt vorhanden")]
    NoMoreRedo,
}

/// Fehler beim Ausführen, Rückgängigmachen oder Wiederholen eines Commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// History-Grenze erreicht
    #[error(transparent)]
    History(#[from] HistoryError),
    /// Modell-Invariante verletzt
    #[error(transparent)]
    Model(#[from] ModelError),
}
