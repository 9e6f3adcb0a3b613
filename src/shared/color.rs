//! Hex-Farben (`#rrggbb` / `#rrggbbaa`) ↔ RGBA-Floats.

/// Parst `#rrggbb` oder `#rrggbbaa` zu RGBA im Bereich 0..=1.
pub fn parse_hex_color(hex: &str) -> Option<[f32; 4]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
        return None;
    }

    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|v| f32::from(v) / 255.0)
    };
    let alpha = if digits.len() == 8 { channel(6)? } else { 1.0 };
    Some([channel(0)?, channel(2)?, channel(4)?, alpha])
}

/// Formatiert RGB(A) als `#rrggbb` (Alpha wird ignoriert).
pub fn to_hex_color(color: [f32; 4]) -> String {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        byte(color[0]),
        byte(color[1]),
        byte(color[2])
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_rgb_and_rgba() {
        let c = parse_hex_color("#ff8000").expect("gültige Farbe");
        assert_relative_eq!(c[0], 1.0);
        assert_relative_eq!(c[1], 128.0 / 255.0);
        assert_relative_eq!(c[3], 1.0);

        let c = parse_hex_color("00000080").expect("gültige Farbe");
        assert_relative_eq!(c[3], 128.0 / 255.0);
    }

    #[test]
    fn rejects_malformed() {
        assert!(parse_hex_color("#fff").is_none());
        assert!(parse_hex_color("#gg0000").is_none());
        assert!(parse_hex_color("#ääää").is_none());
    }

    #[test]
    fn hex_roundtrip() {
        assert_eq!(to_hex_color([1.0, 0.5, 0.0, 1.0]), "#ff8000");
    }
}
