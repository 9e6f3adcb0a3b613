//! Fire-and-forget Ladeaufträge, die pro Frame abgearbeitet werden.
//!
//! Ein Request blockiert nie. Der Callback läuft später auf demselben Thread,
//! wenn der Host `pump` aufruft. Abbruch gibt es nicht; Empfänger prüfen
//! selbst, ob sie noch leben.

use super::loader::{LoadError, RepresentationCache};
use super::representation::Representation;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

type LoadCallback = Box<dyn FnOnce(Result<Arc<Representation>, LoadError>)>;

struct PendingLoad {
    asset_name: String,
    callback: LoadCallback,
}

/// Geteilte Warteschlange offener Ladeaufträge.
#[derive(Clone, Default)]
pub struct LoadQueue {
    pending: Rc<RefCell<VecDeque<PendingLoad>>>,
}

impl std::fmt::Debug for LoadQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadQueue")
            .field("pending", &self.len())
            .finish()
    }
}

impl LoadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reiht einen Ladeauftrag für `asset_name` ein.
    pub fn request(
        &self,
        asset_name: impl Into<String>,
        callback: impl FnOnce(Result<Arc<Representation>, LoadError>) + 'static,
    ) {
        let asset_name = asset_name.into();
        log::debug!("Repräsentation angefordert: {}", asset_name);
        self.pending.borrow_mut().push_back(PendingLoad {
            asset_name,
            callback: Box::new(callback),
        });
    }

    /// Anzahl offener Aufträge.
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Arbeitet alle beim Aufruf offenen Aufträge ab.
    ///
    /// Während der Callbacks neu eingereihte Aufträge bleiben für den nächsten
    /// Aufruf liegen. Gibt die Anzahl abgearbeiteter Aufträge zurück.
    pub fn pump(&self, cache: &mut RepresentationCache) -> usize {
        let batch: Vec<PendingLoad> = self.pending.borrow_mut().drain(..).collect();
        let count = batch.len();

        for load in batch {
            let result = cache.get_or_load(&load.asset_name);
            if let Err(e) = &result {
                log::warn!("Repräsentation für '{}' nicht geladen: {}", load.asset_name, e);
            }
            (load.callback)(result);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::InMemoryLoader;

    #[test]
    fn callbacks_run_only_on_pump() {
        let queue = LoadQueue::new();
        let mut cache = RepresentationCache::new(Box::new(
            InMemoryLoader::new().with("bot/body", Representation::cube(1.0)),
        ));
        let results = Rc::new(RefCell::new(Vec::new()));

        for name in ["bot/body", "bot/missing"] {
            let r = Rc::clone(&results);
            queue.request(name, move |result| r.borrow_mut().push(result.is_ok()));
        }
        assert!(results.borrow().is_empty());
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.pump(&mut cache), 2);
        assert_eq!(*results.borrow(), vec![true, false]);
        assert!(queue.is_empty());
    }

    #[test]
    fn requests_from_callbacks_wait_for_next_pump() {
        let queue = LoadQueue::new();
        let mut cache = RepresentationCache::new(Box::new(InMemoryLoader::new()));
        let inner = queue.clone();
        queue.request("a/a", move |_| inner.request("a/b", |_| {}));

        assert_eq!(queue.pump(&mut cache), 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pump(&mut cache), 1);
        assert!(queue.is_empty());
    }
}
