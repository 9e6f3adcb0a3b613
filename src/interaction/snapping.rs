//! Einrasten von Posen auf das Raster des Slots, in dem ein Bauteil steckt.

use crate::core::{PartId, Robot};
use glam::{Quat, Vec3};

/// Rastet eine neue Position ein. Wurzelbauteile und Slots ohne Raster bleiben unverändert.
pub fn snap_translation(robot: &Robot, part_id: PartId, translation: Vec3, enabled: bool) -> Vec3 {
    match robot.slot_definition_of(part_id) {
        Some(slot) if enabled => slot.snap_translation(translation),
        _ => translation,
    }
}

/// Rastet eine neue Orientierung ein.
pub fn snap_rotation(robot: &Robot, part_id: PartId, rotation: Quat, enabled: bool) -> Quat {
    match robot.slot_definition_of(part_id) {
        Some(slot) if enabled => slot.snap_rotation(rotation),
        _ => rotation.normalize(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Asset, Part, SlotDefinition};
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;
    use std::sync::Arc;

    fn robot_with_snapped_slot() -> (Robot, PartId, PartId) {
        let mut root = Part::new(Arc::new(Asset::root("bot/body").with_slot(
            "arm",
            SlotDefinition::new("arm").with_snap(Some(0.25), Some(FRAC_PI_2)),
        )));
        let arm = Part::new(Arc::new(Asset::attachable("bot/arm", "arm")));
        let arm_id = arm.id();
        root.add_part("arm", arm).unwrap();
        let root_id = root.id();
        let mut robot = Robot::new();
        robot.add_root_part(root).unwrap();
        (robot, root_id, arm_id)
    }

    #[test]
    fn attached_part_snaps_to_slot_grid() {
        let (robot, _, arm) = robot_with_snapped_slot();
        let t = snap_translation(&robot, arm, Vec3::new(0.3, 0.6, -0.1), true);
        assert_relative_eq!(t.x, 0.25);
        assert_relative_eq!(t.y, 0.5);
        assert_relative_eq!(t.z, 0.0);

        let r = snap_rotation(&robot, arm, Quat::from_rotation_z(1.4), true);
        let (_, _, z) = r.to_euler(glam::EulerRot::XYZ);
        assert_relative_eq!(z, FRAC_PI_2, epsilon = 1e-4);
    }

    #[test]
    fn root_and_disabled_snapping_pass_through() {
        let (robot, root, arm) = robot_with_snapped_slot();
        let v = Vec3::new(0.3, 0.6, -0.1);
        assert_eq!(snap_translation(&robot, root, v, true), v);
        assert_eq!(snap_translation(&robot, arm, v, false), v);
    }
}
