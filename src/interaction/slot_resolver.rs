//! Nächster passender, freier Slot zu einem Pick-Strahl.

use super::camera::Ray;
use crate::core::PartId;
use crate::scene::{NodeId, SceneGraph};
use glam::{Quat, Vec3};

/// Gefundener Slot samt Besitzer und Weltlage.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotMatch {
    /// Slot-Container in der Szene
    pub node: NodeId,
    pub slot_name: String,
    pub slot_type: String,
    /// Bauteil, dem der Slot gehört
    pub owner_part: PartId,
    pub owner_container: NodeId,
    pub world_origin: Vec3,
    pub world_rotation: Quat,
    /// Quadrierter Abstand Strahl↔Slot-Ursprung
    pub distance_sq: f32,
}

/// Sucht unter allen freien Slot-Containern vom Typ `slot_type` den mit dem
/// kleinsten quadrierten Abstand zum Strahl.
///
/// Mit `max_distance_sq` werden weiter entfernte Slots ignoriert.
/// Bei Gleichstand gewinnt der zuerst angelegte Slot-Container.
pub fn resolve_nearest_slot(
    scene: &SceneGraph,
    ray: &Ray,
    slot_type: &str,
    max_distance_sq: Option<f32>,
) -> Option<SlotMatch> {
    let mut best: Option<SlotMatch> = None;

    for (node, name, node_type) in scene.slot_containers() {
        if node_type != slot_type || scene.is_slot_occupied(node) {
            continue;
        }
        let Some((owner_container, owner_part)) = scene.ancestor_part_container(node) else {
            continue;
        };

        let (_, world_rotation, world_origin) =
            scene.world_transform(node).to_scale_rotation_translation();
        let distance_sq = ray.distance_sq_to_point(world_origin);
        if max_distance_sq.is_some_and(|max| distance_sq > max) {
            continue;
        }

        let better = match &best {
            None => true,
            Some(current) => {
                distance_sq < current.distance_sq
                    || (distance_sq == current.distance_sq && node < current.node)
            }
        };
        if better {
            best = Some(SlotMatch {
                node,
                slot_name: name.to_string(),
                slot_type: node_type.to_string(),
                owner_part,
                owner_container,
                world_origin,
                world_rotation,
                distance_sq,
            });
        }
    }
    best
}
