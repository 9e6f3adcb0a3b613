//! Picking über einen ID-Farbpuffer.
//!
//! Jedes Primitiv-Element erhält eine fortlaufende ID (kumulativ über alle
//! pickbaren Objekte in Pre-Order). Der ID-Puffer wird nur bei Änderungen neu
//! gerendert; ein Pick liest ein Pixel, dekodiert die ID und läuft vom
//! getroffenen Objekt zum nächsten Bauteil-Container hoch.

mod id;
mod index;
mod picker;
mod target;

pub use id::{decode_pick_color, encode_pick_id, MAX_RAW_ID};
pub use index::{PickObject, PickResolution, PickingIndex};
pub use picker::{PickHit, Picker};
pub use target::{PickTarget, SoftwarePickTarget};
