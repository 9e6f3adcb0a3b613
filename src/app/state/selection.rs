use crate::core::PartId;
use crate::scene::NodeId;

/// Auswahlbezogener Anwendungszustand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Aktuell selektiertes Bauteil
    pub selected_part: Option<PartId>,
    /// Bauteil-Container des selektierten Bauteils zum Zeitpunkt des Picks
    pub container: Option<NodeId>,
}

impl SelectionState {
    /// Erstellt einen leeren Selektionszustand.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, part_id: PartId, container: NodeId) {
        self.selected_part = Some(part_id);
        self.container = Some(container);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.selected_part.is_none()
    }
}
