//! Minimaler Publish/Subscribe-Kanal zwischen Modell und Mediator-Schicht.
//!
//! Ein `Observable<E>` ist ein billig klonbares Handle auf eine gemeinsame
//! Observer-Liste. Das Modell kennt nur `notify`, die Mediatoren nur
//! `add_observer`/`observe_all`. Zustellung erfolgt synchron auf dem
//! aufrufenden Thread, in Registrierungsreihenfolge.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Ereignis mit geschlossener Menge an Labels.
pub trait Labeled {
    /// Label-Typ (eine Variante pro Ereignisart)
    type Label: Copy + Eq + fmt::Debug;

    /// Liefert das Label dieses Ereignisses.
    fn label(&self) -> Self::Label;
}

/// Handle eines registrierten Observers (für `remove_observer`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback<E> = Rc<dyn Fn(&E)>;

struct ObserverEntry<E: Labeled> {
    id: ObserverId,
    /// `None` = alle Labels
    label: Option<E::Label>,
    callback: Callback<E>,
}

struct ObserverList<E: Labeled> {
    next_id: u64,
    entries: Vec<ObserverEntry<E>>,
}

/// Geteilter Ereigniskanal.
pub struct Observable<E: Labeled> {
    inner: Rc<RefCell<ObserverList<E>>>,
}

impl<E: Labeled> Observable<E> {
    /// Erstellt einen Kanal ohne Observer.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObserverList {
                next_id: 1,
                entries: Vec::new(),
            })),
        }
    }

    /// Registriert `callback` für genau ein Label.
    pub fn add_observer(&self, label: E::Label, callback: impl Fn(&E) + 'static) -> ObserverId {
        self.push(Some(label), Rc::new(callback))
    }

    /// Registriert `callback` für alle Labels (exhaustives `match` beim Empfänger).
    pub fn observe_all(&self, callback: impl Fn(&E) + 'static) -> ObserverId {
        self.push(None, Rc::new(callback))
    }

    fn push(&self, label: Option<E::Label>, callback: Callback<E>) -> ObserverId {
        let mut list = self.inner.borrow_mut();
        let id = ObserverId(list.next_id);
        list.next_id += 1;
        list.entries.push(ObserverEntry {
            id,
            label,
            callback,
        });
        id
    }

    /// Entfernt einen Observer. Gibt `false` zurück, wenn er nicht (mehr) existiert.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        let mut list = self.inner.borrow_mut();
        let before = list.entries.len();
        list.entries.retain(|entry| entry.id != id);
        list.entries.len() != before
    }

    /// Anzahl registrierter Observer.
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Stellt `event` an alle passenden Observer zu.
    ///
    /// Die Observer-Liste wird vor dem Aufruf kopiert, damit Callbacks selbst
    /// wieder `notify`, `add_observer` oder `remove_observer` aufrufen dürfen.
    /// Ein während der Zustellung registrierter Observer erhält dieses Ereignis nicht mehr.
    pub fn notify(&self, event: &E) {
        let label = event.label();
        let callbacks: Vec<Callback<E>> = self
            .inner
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.label.is_none_or(|l| l == label))
            .map(|entry| Rc::clone(&entry.callback))
            .collect();

        for callback in callbacks {
            callback(event);
        }
    }

    /// Prüft, ob zwei Handles denselben Kanal teilen.
    pub fn same_channel(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<E: Labeled> Clone for Observable<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: Labeled> Default for Observable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Labeled> fmt::Debug for Observable<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observer_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        A(u32),
        B,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum PingLabel {
        A,
        B,
    }

    impl Labeled for Ping {
        type Label = PingLabel;

        fn label(&self) -> PingLabel {
            match self {
                Ping::A(_) => PingLabel::A,
                Ping::B => PingLabel::B,
            }
        }
    }

    #[test]
    fn notify_without_observers_is_noop() {
        let channel: Observable<Ping> = Observable::new();
        channel.notify(&Ping::B);
        assert_eq!(channel.observer_count(), 0);
    }

    #[test]
    fn observers_run_in_registration_order_and_filter_by_label() {
        let channel: Observable<Ping> = Observable::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        channel.add_observer(PingLabel::A, move |e| l1.borrow_mut().push(format!("first {e:?}")));
        let l2 = Rc::clone(&log);
        channel.observe_all(move |e| l2.borrow_mut().push(format!("all {e:?}")));
        let l3 = Rc::clone(&log);
        channel.add_observer(PingLabel::B, move |_| l3.borrow_mut().push("b".to_string()));

        channel.notify(&Ping::A(7));
        channel.notify(&Ping::B);

        assert_eq!(
            *log.borrow(),
            vec!["first A(7)", "all A(7)", "all B", "b"]
        );
    }

    #[test]
    fn removed_observer_is_not_called() {
        let channel: Observable<Ping> = Observable::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let id = channel.observe_all(move |_| h.set(h.get() + 1));

        channel.notify(&Ping::B);
        assert!(channel.remove_observer(id));
        assert!(!channel.remove_observer(id));
        channel.notify(&Ping::B);

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn callbacks_may_notify_reentrantly() {
        let channel: Observable<Ping> = Observable::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inner_channel = channel.clone();
        channel.add_observer(PingLabel::A, move |e| {
            if let Ping::A(n) = e {
                if *n > 0 {
                    inner_channel.notify(&Ping::A(n - 1));
                }
            }
        });
        let s = Rc::clone(&seen);
        channel.add_observer(PingLabel::A, move |e| {
            if let Ping::A(n) = e {
                s.borrow_mut().push(*n);
            }
        });

        channel.notify(&Ping::A(2));

        // Tiefste Zustellung endet zuerst
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn clones_share_one_channel() {
        let a: Observable<Ping> = Observable::new();
        let b = a.clone();
        b.observe_all(|_| {});
        assert_eq!(a.observer_count(), 1);
        assert!(a.same_channel(&b));
        assert!(!a.same_channel(&Observable::new()));
    }
}
