//! Zustandsmaschine einer Drag-Geste aus dem Katalog in die Szene.
//!
//! `Idle → Dragging → {OverSlot, OverFloor} → Idle`

use super::camera::Ray;
use super::ghost::Ghost;
use super::slot_resolver::{resolve_nearest_slot, SlotMatch};
use crate::core::{Asset, PartId};
use crate::scene::SceneGraph;
use crate::shared::EditorOptions;
use glam::{Quat, Vec3};
use std::cell::RefCell;
use std::sync::Arc;

/// Ziel unter dem Zeiger während des Drags.
#[derive(Debug, Clone, PartialEq)]
pub enum DragHover {
    /// Weder Slot noch Boden getroffen
    Nothing,
    /// Passender freier Slot
    OverSlot(SlotMatch),
    /// Punkt auf der Bodenebene
    OverFloor(Vec3),
}

/// Laufende Drag-Geste.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub asset: Arc<Asset>,
    /// Benötigter Slot-Typ (`None` für reine Wurzel-Assets)
    pub slot_type: Option<String>,
    pub ghost: Ghost,
    pub hover: DragHover,
}

/// Was beim Loslassen passieren soll.
#[derive(Debug, Clone, PartialEq)]
pub enum DropAction {
    /// In den Slot `slot_name` von `parent` einsetzen
    AttachToSlot {
        asset: Arc<Asset>,
        parent: PartId,
        slot_name: String,
    },
    /// Als Wurzelbauteil an `translation` einsetzen (falls zulässig)
    AddRoot {
        asset: Arc<Asset>,
        translation: Vec3,
    },
}

#[derive(Debug, Clone, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl DragState {
    /// `true` zwischen Drag-Start und Drop/Abbruch.
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }

    /// Laufende Geste (gezogenes Asset, Vorschau, aktuelles Ziel).
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            DragState::Idle => None,
            DragState::Dragging(session) => Some(session),
        }
    }

    /// Beginnt einen Drag. Ein noch laufender Drag wird abgebrochen.
    pub fn start(&mut self, scene: &RefCell<SceneGraph>, asset: Arc<Asset>, ghost: Ghost) {
        self.cancel(scene);
        let slot_type = if asset.root {
            None
        } else {
            asset.slot_type.clone()
        };
        log::info!(
            "Drag gestartet: {} (Slot-Typ: {})",
            asset.name,
            slot_type.as_deref().unwrap_or("-")
        );
        *self = DragState::Dragging(DragSession {
            asset,
            slot_type,
            ghost,
            hover: DragHover::Nothing,
        });
    }

    /// Aktualisiert Ziel, Hervorhebung und Vorschau für einen neuen Zeigerstrahl.
    pub fn pointer_moved(
        &mut self,
        scene: &RefCell<SceneGraph>,
        ray: Option<Ray>,
        options: &EditorOptions,
    ) {
        let DragState::Dragging(session) = self else {
            return;
        };

        let slot = match (&ray, &session.slot_type) {
            (Some(ray), Some(slot_type)) => resolve_nearest_slot(
                &scene.borrow(),
                ray,
                slot_type,
                options.slot_snap_max_distance_sq(),
            ),
            _ => None,
        };

        session.hover = match slot {
            Some(slot) => DragHover::OverSlot(slot),
            None => ray
                .and_then(|ray| ray.intersect_ground(options.ground_plane_height))
                .map_or(DragHover::Nothing, DragHover::OverFloor),
        };

        match &session.hover {
            DragHover::OverSlot(slot) => {
                scene.borrow_mut().set_highlight(Some(slot.node));
                session.ghost.place(slot.world_origin, slot.world_rotation);
            }
            DragHover::OverFloor(point) => {
                scene.borrow_mut().set_highlight(None);
                session.ghost.place(*point, Quat::IDENTITY);
            }
            DragHover::Nothing => {
                scene.borrow_mut().set_highlight(None);
                session.ghost.hide();
            }
        }
    }

    /// Beendet den Drag am Strahl `ray` und liefert die auszuführende Aktion.
    ///
    /// Vorschau und Hervorhebung werden in jedem Fall entfernt.
    pub fn drop_at(
        &mut self,
        scene: &RefCell<SceneGraph>,
        ray: Option<Ray>,
        options: &EditorOptions,
    ) -> Option<DropAction> {
        self.pointer_moved(scene, ray, options);
        let DragState::Dragging(session) = std::mem::take(self) else {
            return None;
        };
        Self::clear_visuals(scene, &session);

        let action = match session.hover {
            DragHover::OverSlot(slot) => DropAction::AttachToSlot {
                asset: session.asset,
                parent: slot.owner_part,
                slot_name: slot.slot_name,
            },
            DragHover::OverFloor(point) => DropAction::AddRoot {
                asset: session.asset,
                translation: point,
            },
            DragHover::Nothing => DropAction::AddRoot {
                asset: session.asset,
                translation: Vec3::ZERO,
            },
        };
        log::info!("Drag beendet: {:?}", DropSummary(&action));
        Some(action)
    }

    /// Bricht den Drag ab (Vorschau und Hervorhebung werden entfernt).
    pub fn cancel(&mut self, scene: &RefCell<SceneGraph>) {
        if let DragState::Dragging(session) = std::mem::take(self) {
            Self::clear_visuals(scene, &session);
            log::info!("Drag abgebrochen: {}", session.asset.name);
        }
    }

    fn clear_visuals(scene: &RefCell<SceneGraph>, session: &DragSession) {
        session.ghost.discard();
        scene.borrow_mut().set_highlight(None);
    }
}

/// Kurzform einer [`DropAction`] fürs Logging.
struct DropSummary<'a>(&'a DropAction);

impl std::fmt::Debug for DropSummary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            DropAction::AttachToSlot {
                asset,
                parent,
                slot_name,
            } => write!(f, "{} → {}:{}", asset.name, parent, slot_name),
            DropAction::AddRoot { asset, translation } => {
                write!(f, "{} als Wurzel bei {:?}", asset.name, translation)
            }
        }
    }
}
