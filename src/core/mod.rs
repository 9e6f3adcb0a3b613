//! Core-Domänentypen: Assets, Bauteile, Roboter und der Ereigniskanal.
//!
//! Die Schicht besitzt keinen Render-Zustand. Mutationen laufen ausschließlich
//! über die Commands in `app::history`.

pub mod asset;
pub mod error;
pub mod observable;
pub mod part;
pub mod robot;
pub mod serialize;

pub use asset::{Asset, AssetCatalog, AssetParameters, SlotDefinition};
pub use error::{CommandError, HistoryError, ModelError};
pub use observable::{Labeled, Observable, ObserverId};
pub use part::{ParentRef, Part, PartEvent, PartEventKind, PartId, PartSnapshot};
pub use robot::{Robot, RobotEvent, RobotEventKind};
pub use serialize::{SerializedPart, SerializedRobot};
