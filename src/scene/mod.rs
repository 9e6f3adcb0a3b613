//! Visueller Szenengraph, Asset-Repräsentationen und asynchrones Laden.

mod graph;
mod load_queue;
mod loader;
mod representation;

pub use graph::{Drawable, Element, NodeId, Primitive, SceneGraph, SceneNode, SceneNodeKind};
pub use load_queue::LoadQueue;
pub use loader::{
    DirectoryLoader, InMemoryLoader, LoadError, RepresentationCache, RepresentationLoader,
};
pub use representation::{Representation, RepresentationNode};
