//! Robot Composer Library.
//! Editor-Kern zum Zusammenstecken von Robotern aus Katalog-Bauteilen.

pub mod app;
pub mod core;
pub mod export;
pub mod interaction;
pub mod mediator;
pub mod picking;
pub mod scene;
pub mod shared;

pub use app::{
    AppCommand, AppController, AppIntent, AppState, CommandHistory, EditCommand, ExportFormat,
};
pub use core::{Asset, AssetCatalog, CommandError, HistoryError, ModelError, Part, PartId, Robot};
pub use scene::{DirectoryLoader, InMemoryLoader, Representation, SceneGraph};
pub use shared::EditorOptions;
