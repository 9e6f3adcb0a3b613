//! Geteilter Kontext aller Mediatoren einer Editor-Sitzung.

use crate::scene::{LoadQueue, SceneGraph};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Zähler für konstruierte und aktuell lebende Bauteil-Mediatoren.
#[derive(Debug, Default)]
pub struct MediatorStats {
    constructed: Cell<usize>,
    live: Cell<usize>,
}

impl MediatorStats {
    /// Anzahl jemals konstruierter Bauteil-Mediatoren.
    pub fn constructed(&self) -> usize {
        self.constructed.get()
    }

    /// Anzahl aktuell angehängter Bauteil-Mediatoren.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    pub(crate) fn on_constructed(&self) {
        self.constructed.set(self.constructed.get() + 1);
        self.live.set(self.live.get() + 1);
    }

    pub(crate) fn on_detached(&self) {
        self.live.set(self.live.get().saturating_sub(1));
    }
}

/// Szene, Ladewarteschlange und Statistik, geteilt von allen Mediatoren.
#[derive(Debug, Clone)]
pub struct MediatorContext {
    pub scene: Rc<RefCell<SceneGraph>>,
    pub loads: LoadQueue,
    stats: Rc<MediatorStats>,
}

impl MediatorContext {
    pub fn new(scene: Rc<RefCell<SceneGraph>>, loads: LoadQueue) -> Self {
        Self {
            scene,
            loads,
            stats: Rc::new(MediatorStats::default()),
        }
    }

    pub fn stats(&self) -> &MediatorStats {
        &self.stats
    }
}
