//! Writer für X3D-Szenenbeschreibungen.
//!
//! Jedes Bauteil wird ein `Transform` mit `Inline`-Verweis auf die Geometrie
//! seines Assets. Belegte Slots werden als verschachtelte `Transform`s mit
//! der Slot-Lage geschrieben.

use crate::core::{Part, Robot};
use anyhow::Result;
use glam::{Quat, Vec3};
use std::fmt::Write;

/// Standard-Basis für `Inline`-URLs (`<base>/<assetName>.x3d`).
pub const DEFAULT_ASSET_BASE_URL: &str = "assets";

const HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<!DOCTYPE X3D PUBLIC \"ISO//Web3D//DTD X3D 3.3//EN\" ",
    "\"http://www.web3d.org/specifications/x3d-3.3.dtd\">\n",
    "<X3D profile=\"Interchange\" version=\"3.3\">\n",
    "  <head>\n",
    "    <meta name=\"generator\" content=\"robot-composer\"/>\n",
    "  </head>\n",
    "  <Scene>\n",
);

const FOOTER: &str = "  </Scene>\n</X3D>\n";

/// Schreibt den Roboter als X3D-Dokument.
///
/// # Parameter
/// - `robot`: Der zu exportierende Roboter
/// - `asset_base_url`: Präfix der Geometrie-Verweise
pub fn write_x3d(robot: &Robot, asset_base_url: &str) -> Result<String> {
    let mut output = String::from(HEADER);
    if let Some(root) = robot.root_part() {
        write_part(&mut output, root, asset_base_url, 2)?;
    }
    output.push_str(FOOTER);
    log::info!("X3D-Export: {} Bauteil(e)", robot.part_count());
    Ok(output)
}

fn write_part(out: &mut String, part: &Part, base_url: &str, depth: usize) -> Result<()> {
    let indent = "  ".repeat(depth);
    writeln!(
        out,
        "{}<Transform DEF=\"part_{}\" translation=\"{}\" rotation=\"{}\">",
        indent,
        part.id().get(),
        format_vec3(part.translation()),
        format_rotation(part.rotation())
    )?;

    writeln!(
        out,
        "{}  <MetadataString name=\"modelName\" value='\"{}\"'/>",
        indent,
        escape_xml(&part.asset().name)
    )?;
    if let Some(color) = part.color() {
        writeln!(
            out,
            "{}  <MetadataString name=\"color\" value='\"{}\"'/>",
            indent,
            escape_xml(color)
        )?;
    }
    writeln!(
        out,
        "{}  <Inline url='\"{}/{}.x3d\"'/>",
        indent,
        escape_xml(base_url.trim_end_matches('/')),
        escape_xml(&part.asset().name)
    )?;

    for (slot_name, occupant) in part.slots() {
        let Some(child) = occupant else {
            continue;
        };
        let Some(slot) = part.asset().slots.get(slot_name) else {
            continue;
        };
        writeln!(
            out,
            "{}  <Transform DEF=\"slot_{}_{}\" translation=\"{}\" rotation=\"{}\">",
            indent,
            part.id().get(),
            escape_xml(slot_name),
            format_vec3(slot.translation),
            format_rotation(slot.rotation)
        )?;
        write_part(out, child, base_url, depth + 2)?;
        writeln!(out, "{}  </Transform>", indent)?;
    }

    writeln!(out, "{}</Transform>", indent)?;
    Ok(())
}

fn format_vec3(v: Vec3) -> String {
    format!("{} {} {}", format_float(v.x), format_float(v.y), format_float(v.z))
}

/// X3D erwartet Achse + Winkel.
fn format_rotation(rotation: Quat) -> String {
    let (axis, angle) = rotation.normalize().to_axis_angle();
    if angle.abs() < 1e-6 {
        return "0 1 0 0".to_string();
    }
    format!("{} {}", format_vec3(axis), format_float(angle))
}

fn format_float(value: f32) -> String {
    let rounded = format!("{:.4}", value);
    if rounded == "-0.0000" {
        "0.0000".to_string()
    } else {
        rounded
    }
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn format_rotation_axis_angle() {
        assert_eq!(format_rotation(Quat::IDENTITY), "0 1 0 0");
        assert_eq!(
            format_rotation(Quat::from_rotation_y(FRAC_PI_2)),
            "0.0000 1.0000 0.0000 1.5708"
        );
    }

    #[test]
    fn format_float_suppresses_negative_zero() {
        assert_eq!(format_float(-0.00001), "0.0000");
        assert_eq!(format_float(1.23456), "1.2346");
    }

    #[test]
    fn escape_xml_replaces_markup() {
        assert_eq!(escape_xml("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&apos;");
    }

    #[test]
    fn empty_robot_has_only_boilerplate() {
        let xml = write_x3d(&Robot::new(), DEFAULT_ASSET_BASE_URL).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.ends_with("</X3D>\n"));
        assert!(!xml.contains("<Transform"));
    }
}
