//! Export des Roboters als statische Szenenbeschreibung.

pub mod x3d;

pub use x3d::{write_x3d, DEFAULT_ASSET_BASE_URL};
