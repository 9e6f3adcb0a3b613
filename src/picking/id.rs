//! Kodierung von Picking-IDs als 24-Bit-RGB.
//!
//! Farbe 0 ist für den Hintergrund reserviert: kodiert wird `raw + 1`.

/// Größte kodierbare Roh-ID.
pub const MAX_RAW_ID: u32 = 0x00FF_FFFE;

/// Kodiert eine Roh-ID als RGB. `None` wenn sie nicht in 24 Bit passt.
pub fn encode_pick_id(raw: u32) -> Option<[u8; 3]> {
    if raw > MAX_RAW_ID {
        return None;
    }
    let [_, r, g, b] = (raw + 1).to_be_bytes();
    Some([r, g, b])
}

/// Dekodiert ein ausgelesenes Pixel. `None` = Hintergrund.
pub fn decode_pick_color(rgb: [u8; 3]) -> Option<u32> {
    let [r, g, b] = rgb;
    let encoded = u32::from_be_bytes([0, r, g, b]);
    encoded.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_is_not_a_hit() {
        assert_eq!(decode_pick_color([0, 0, 0]), None);
    }

    #[test]
    fn first_primitive_is_pickable() {
        let rgb = encode_pick_id(0).expect("0 ist kodierbar");
        assert_ne!(rgb, [0, 0, 0]);
        assert_eq!(decode_pick_color(rgb), Some(0));
    }

    #[test]
    fn encoding_spans_all_channels() {
        assert_eq!(encode_pick_id(0x0001_02FF), Some([0x01, 0x03, 0x00]));
        assert_eq!(decode_pick_color([0xFF, 0xFF, 0xFF]), Some(MAX_RAW_ID));
        assert_eq!(encode_pick_id(MAX_RAW_ID + 1), None);
    }
}
