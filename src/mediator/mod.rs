//! Mediator-Schicht: ein Mediator pro Modellknoten.
//!
//! Mediatoren empfangen Modellereignisse ausschließlich über `Observable` und
//! übersetzen sie in Mutationen des Szenengraphen. Das Modell kennt keine
//! Mediatoren.

mod context;
mod part;
mod robot;

pub use context::{MediatorContext, MediatorStats};
pub use part::PartMediator;
pub use robot::RobotMediator;
