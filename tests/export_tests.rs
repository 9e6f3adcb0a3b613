use glam::{Quat, Vec3};
use robot_composer::core::SlotDefinition;
use robot_composer::export::{write_x3d, DEFAULT_ASSET_BASE_URL};
use robot_composer::{Asset, CommandHistory, EditCommand, Part, PartId, Robot};
use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

fn robot_with_arm() -> (Robot, PartId, PartId) {
    let body = Arc::new(
        Asset::root("bot/body").with_slot(
            "arm",
            SlotDefinition::new("arm")
                .with_translation(Vec3::new(0.0, 1.0, 0.0))
                .with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
        ),
    );
    let arm = Arc::new(Asset::attachable("bot/arm<&>", "arm"));

    let mut robot = Robot::new();
    let mut history = CommandHistory::default();
    let root = Part::new(body).with_translation(Vec3::new(1.0, 0.0, -2.0));
    let root_id = root.id();
    let arm = Part::new(arm);
    let arm_id = arm.id();
    history
        .execute(&mut robot, EditCommand::add_root_part(root))
        .unwrap();
    history
        .execute(&mut robot, EditCommand::add_part(root_id, "arm", arm))
        .unwrap();
    history
        .execute(
            &mut robot,
            EditCommand::set_color(arm_id, Some("#d03030".into())),
        )
        .unwrap();
    (robot, root_id, arm_id)
}

#[test]
fn test_x3d_nests_slot_transforms_and_inlines() {
    let (robot, root, arm) = robot_with_arm();

    let xml = write_x3d(&robot, DEFAULT_ASSET_BASE_URL).expect("Export erfolgreich");

    let root_tag = format!("<Transform DEF=\"part_{}\" translation=\"1.0000 0.0000 -2.0000\"", root.get());
    let slot_tag = format!(
        "<Transform DEF=\"slot_{}_arm\" translation=\"0.0000 1.0000 0.0000\" rotation=\"0.0000 1.0000 0.0000 1.5708\">",
        root.get()
    );
    let arm_tag = format!("<Transform DEF=\"part_{}\"", arm.get());

    let root_at = xml.find(&root_tag).expect("Wurzel-Transform");
    let slot_at = xml.find(&slot_tag).expect("Slot-Transform");
    let arm_at = xml.find(&arm_tag).expect("Arm-Transform");
    assert!(root_at < slot_at && slot_at < arm_at);

    assert!(xml.contains("<Inline url='\"assets/bot/body.x3d\"'/>"));
    assert!(xml.contains("<Inline url='\"assets/bot/arm&lt;&amp;&gt;.x3d\"'/>"));
    assert!(xml.contains("<MetadataString name=\"color\" value='\"#d03030\"'/>"));
    assert_eq!(xml.matches("<Transform").count(), 3);
    assert_eq!(xml.matches("</Transform>").count(), 3);
}

#[test]
fn test_json_export_contains_pose_and_color() {
    let (robot, _, _) = robot_with_arm();

    let json = robot.to_json().expect("JSON-Export");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let root = &value["rootPart"];
    assert_eq!(root["modelName"], "bot/body");
    assert_eq!(root["translation"], serde_json::json!([1.0, 0.0, -2.0]));
    assert_eq!(root["slots"]["arm"]["color"], "#d03030");
    assert!(root.get("color").is_none());
}

#[test]
fn test_empty_robot_exports_empty_scene() {
    let robot = Robot::new();
    let xml = write_x3d(&robot, "https://example.org/parts/").unwrap();
    assert!(xml.contains("<Scene>"));
    assert!(!xml.contains("<Transform"));
    assert_eq!(robot.to_json().unwrap().trim(), "{}");
}
