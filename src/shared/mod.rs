//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält Optionen und Farb-Helfer, die von `scene`, `interaction`
//! und `app` gemeinsam genutzt werden.

mod color;
pub mod options;

pub use color::{parse_hex_color, to_hex_color};
pub use options::EditorOptions;
pub use options::{DEFAULT_PART_COLOR, GHOST_OPACITY, HIGHLIGHT_COLOR};
