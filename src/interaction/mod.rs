//! Zeiger-Interaktion: Kamera-Strahlen, Slot-Auflösung, Drag & Drop, Einrasten.

mod camera;
mod drag;
mod ghost;
mod slot_resolver;
pub mod snapping;

pub use camera::{Camera3D, Ray};
pub use drag::{DragHover, DragSession, DragState, DropAction};
pub use ghost::Ghost;
pub use slot_resolver::{resolve_nearest_slot, SlotMatch};
