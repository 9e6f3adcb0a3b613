//! Mediator eines Bauteils: hält den visuellen Teilbaum synchron zum Modell.

use super::context::MediatorContext;
use crate::core::{Asset, ObserverId, Observable, PartEvent, PartId, PartSnapshot};
use crate::scene::{LoadError, NodeId, Representation, SceneNodeKind};
use crate::shared::parse_hex_color;
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

/// Visuelles Gegenstück zu genau einem eingesetzten Bauteil.
///
/// Besitzt den Bauteil-Container, je Slot einen Slot-Container und die
/// Mediatoren der Bauteile in den eigenen Slots.
pub struct PartMediator {
    ctx: MediatorContext,
    part_id: PartId,
    asset: Arc<Asset>,
    events: Observable<PartEvent>,
    observer: Option<ObserverId>,
    container: NodeId,
    slot_nodes: IndexMap<String, NodeId>,
    children: IndexMap<String, Rc<RefCell<PartMediator>>>,
    representation: Option<NodeId>,
    color: Option<String>,
    alive: Rc<Cell<bool>>,
}

impl PartMediator {
    /// Erstellt den Mediator für `part` unter dem Szenenknoten `parent_node`.
    ///
    /// Legt Container und Slot-Container sofort an, registriert sich am
    /// Ereigniskanal des Bauteils und fordert die Repräsentation an. Bereits
    /// belegte Slots im Abbild erhalten rekursiv eigene Mediatoren.
    /// `None`, wenn `parent_node` nicht (mehr) in der Szene existiert.
    pub fn attach(
        ctx: &MediatorContext,
        part: &PartSnapshot,
        parent_node: NodeId,
    ) -> Option<Rc<RefCell<PartMediator>>> {
        let (container, slot_nodes) = {
            let mut scene = ctx.scene.borrow_mut();
            let Some(container) = scene.add_node_with_transform(
                parent_node,
                SceneNodeKind::PartContainer { part_id: part.id },
                part.translation,
                part.rotation,
            ) else {
                log::error!(
                    "Container für Bauteil {} nicht angelegt: Elternknoten {:?} fehlt",
                    part.id,
                    parent_node
                );
                return None;
            };

            let mut slot_nodes = IndexMap::new();
            for (name, slot) in &part.asset.slots {
                let kind = SceneNodeKind::SlotContainer {
                    slot_name: name.clone(),
                    slot_type: slot.slot_type.clone(),
                };
                if let Some(node) =
                    scene.add_node_with_transform(container, kind, slot.translation, slot.rotation)
                {
                    slot_nodes.insert(name.clone(), node);
                }
            }
            (container, slot_nodes)
        };

        ctx.stats().on_constructed();
        log::debug!("Mediator für Bauteil {} ({}) erstellt", part.id, part.asset.name);

        let mediator = Rc::new(RefCell::new(PartMediator {
            ctx: ctx.clone(),
            part_id: part.id,
            asset: Arc::clone(&part.asset),
            events: part.events.clone(),
            observer: None,
            container,
            slot_nodes,
            children: IndexMap::new(),
            representation: None,
            color: part.color.clone(),
            alive: Rc::new(Cell::new(true)),
        }));

        let weak = Rc::downgrade(&mediator);
        let observer = part.events.observe_all(move |event| {
            if let Some(mediator) = weak.upgrade() {
                mediator.borrow_mut().on_event(event);
            }
        });

        {
            let mut this = mediator.borrow_mut();
            this.observer = Some(observer);
            this.request_representation(&mediator);

            // Vorhandener Teilbaum: je belegtem Slot ein synthetisches PartAdded
            for (slot_name, occupant) in &part.slots {
                if let Some(child) = occupant {
                    this.on_event(&PartEvent::PartAdded {
                        slot_name: slot_name.clone(),
                        part: child.clone(),
                    });
                }
            }
        }

        Some(mediator)
    }

    fn request_representation(&self, this: &Rc<RefCell<PartMediator>>) {
        let alive = Rc::clone(&self.alive);
        let weak = Rc::downgrade(this);
        let part_id = self.part_id;

        self.ctx.loads.request(self.asset.name.clone(), move |result| {
            if !alive.get() {
                log::debug!("Repräsentation für entferntes Bauteil {} verworfen", part_id);
                return;
            }
            if let Some(mediator) = weak.upgrade() {
                mediator.borrow_mut().on_representation_loaded(result);
            }
        });
    }

    fn on_representation_loaded(&mut self, result: Result<Arc<Representation>, LoadError>) {
        let representation = match result {
            Ok(representation) => representation,
            Err(e) => {
                log::debug!("Bauteil {} bleibt ohne Geometrie: {}", self.part_id, e);
                return;
            }
        };

        let node = self.ctx.scene.borrow_mut().instantiate(
            self.container,
            &self.asset.name,
            &representation,
        );
        self.representation = node;
        if self.color.is_some() {
            self.apply_color();
        }
    }

    /// Verarbeitet ein Ereignis des gepaarten Bauteils.
    fn on_event(&mut self, event: &PartEvent) {
        match event {
            PartEvent::PartAdded { slot_name, part } => self.on_part_added(slot_name, part),
            PartEvent::PartRemoved { slot_name, part_id } => {
                self.on_part_removed(slot_name, *part_id)
            }
            PartEvent::Translated { translation } => {
                self.ctx
                    .scene
                    .borrow_mut()
                    .set_translation(self.container, *translation);
            }
            PartEvent::Rotated { rotation } => {
                self.ctx
                    .scene
                    .borrow_mut()
                    .set_rotation(self.container, *rotation);
            }
            PartEvent::ColorChanged { color } => {
                self.color = color.clone();
                self.apply_color();
            }
        }
    }

    fn on_part_added(&mut self, slot_name: &str, part: &PartSnapshot) {
        let Some(&slot_node) = self.slot_nodes.get(slot_name) else {
            log::error!(
                "Bauteil {} hat keinen Slot-Container '{}'",
                self.part_id,
                slot_name
            );
            return;
        };
        if let Some(previous) = self.children.shift_remove(slot_name) {
            log::warn!("Slot '{}' war visuell noch belegt", slot_name);
            previous.borrow_mut().detach();
        }
        if let Some(child) = PartMediator::attach(&self.ctx, part, slot_node) {
            self.children.insert(slot_name.to_string(), child);
        }
    }

    fn on_part_removed(&mut self, slot_name: &str, part_id: PartId) {
        match self.children.shift_remove(slot_name) {
            Some(child) => {
                let child_id = child.borrow().part_id;
                if child_id != part_id {
                    log::warn!(
                        "Slot '{}': erwartet Bauteil {}, gefunden {}",
                        slot_name,
                        part_id,
                        child_id
                    );
                }
                child.borrow_mut().detach();
            }
            None => log::warn!("Slot '{}' hatte keinen Mediator", slot_name),
        }
    }

    /// Übernimmt die gespeicherte Farbe, falls die Geometrie schon geladen ist.
    fn apply_color(&mut self) {
        let Some(node) = self.representation else {
            return;
        };
        let rgba = match self.color.as_deref() {
            Some(hex) => match parse_hex_color(hex) {
                Some(rgba) => Some(rgba),
                None => {
                    log::warn!("Ungültige Farbe '{}' für Bauteil {}", hex, self.part_id);
                    return;
                }
            },
            None => None,
        };
        self.ctx.scene.borrow_mut().recolor(node, rgba);
    }

    /// Löst den Mediator samt Kind-Mediatoren und visuellem Teilbaum auf.
    pub(crate) fn detach(&mut self) {
        for (_, child) in self.children.drain(..) {
            child.borrow_mut().detach();
        }
        if let Some(observer) = self.observer.take() {
            self.events.remove_observer(observer);
        }
        self.alive.set(false);
        self.ctx.scene.borrow_mut().remove_subtree(self.container);
        self.ctx.stats().on_detached();
        log::debug!("Mediator für Bauteil {} aufgelöst", self.part_id);
    }

    pub fn part_id(&self) -> PartId {
        self.part_id
    }

    /// Bauteil-Container in der Szene.
    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn slot_node(&self, slot_name: &str) -> Option<NodeId> {
        self.slot_nodes.get(slot_name).copied()
    }

    /// Kind-Mediator im Slot `slot_name`.
    pub fn child(&self, slot_name: &str) -> Option<Rc<RefCell<PartMediator>>> {
        self.children.get(slot_name).cloned()
    }

    /// Geladene Repräsentation (`None` solange ausstehend oder fehlgeschlagen).
    pub fn representation(&self) -> Option<NodeId> {
        self.representation
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Anzahl der Mediatoren in diesem Teilbaum (inklusive diesem).
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .values()
            .map(|child| child.borrow().subtree_len())
            .sum::<usize>()
    }
}
