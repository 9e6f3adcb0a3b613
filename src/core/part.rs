//! Platzierte Bauteil-Instanz mit Slot-Belegung und eigenem Ereigniskanal.

use super::observable::{Labeled, Observable};
use super::{Asset, ModelError};
use glam::{Quat, Vec3};
use indexmap::IndexMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_PART_ID: AtomicU64 = AtomicU64::new(1);

/// Eindeutige Identität eines Bauteils über seine gesamte Lebensdauer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(u64);

impl PartId {
    fn next() -> Self {
        Self(NEXT_PART_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Numerischer Wert (z.B. für DEF-Namen im Export).
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Nicht-besitzende Rückreferenz auf den Halter eines Bauteils.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// Bauteil ist das Wurzelbauteil des Roboters
    Robot,
    /// Bauteil steckt in einem Slot dieses Bauteils
    Part(PartId),
}

/// Ereignisse eines einzelnen Bauteils.
#[derive(Debug, Clone)]
pub enum PartEvent {
    /// Ein Bauteil (samt Teilbaum) wurde in `slot_name` eingesetzt
    PartAdded {
        slot_name: String,
        part: PartSnapshot,
    },
    /// Das Bauteil in `slot_name` wurde entfernt
    PartRemoved { slot_name: String, part_id: PartId },
    /// Neue lokale Position
    Translated { translation: Vec3 },
    /// Neue lokale Orientierung
    Rotated { rotation: Quat },
    /// Neue Farbe (`None` = Asset-Standard)
    ColorChanged { color: Option<String> },
}

/// Labels von [`PartEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartEventKind {
    PartAdded,
    PartRemoved,
    Translated,
    Rotated,
    ColorChanged,
}

impl Labeled for PartEvent {
    type Label = PartEventKind;

    fn label(&self) -> PartEventKind {
        match self {
            PartEvent::PartAdded { .. } => PartEventKind::PartAdded,
            PartEvent::PartRemoved { .. } => PartEventKind::PartRemoved,
            PartEvent::Translated { .. } => PartEventKind::Translated,
            PartEvent::Rotated { .. } => PartEventKind::Rotated,
            PartEvent::ColorChanged { .. } => PartEventKind::ColorChanged,
        }
    }
}

/// Read-only Abbild eines Bauteils samt belegtem Teilbaum.
///
/// Enthält ein Handle auf den Ereigniskanal des Bauteils, damit Empfänger
/// eines `PartAdded` sich für das neue Bauteil registrieren können.
#[derive(Debug, Clone)]
pub struct PartSnapshot {
    pub id: PartId,
    pub asset: Arc<Asset>,
    pub translation: Vec3,
    pub rotation: Quat,
    pub color: Option<String>,
    pub events: Observable<PartEvent>,
    /// Alle Slots in Asset-Reihenfolge, `None` = frei
    pub slots: Vec<(String, Option<PartSnapshot>)>,
}

impl PartSnapshot {
    /// Anzahl der Bauteile in diesem Teilbaum (inklusive Wurzel).
    pub fn subtree_len(&self) -> usize {
        1 + self
            .slots
            .iter()
            .filter_map(|(_, occupant)| occupant.as_ref())
            .map(PartSnapshot::subtree_len)
            .sum::<usize>()
    }
}

/// Platzierte Instanz eines Assets.
///
/// Besitzt die Bauteile in den eigenen Slots exklusiv; `parent` ist nur
/// eine Nachschlage-Referenz.
#[derive(Debug)]
pub struct Part {
    id: PartId,
    asset: Arc<Asset>,
    translation: Vec3,
    rotation: Quat,
    /// Schlüsselmenge fix ab Konstruktion (aus `asset.slots`)
    slots: IndexMap<String, Option<Part>>,
    parent: Option<ParentRef>,
    color: Option<String>,
    events: Observable<PartEvent>,
}

impl Part {
    /// Erstellt ein neues, nicht eingesetztes Bauteil mit leeren Slots.
    pub fn new(asset: Arc<Asset>) -> Self {
        let slots = asset.slots.keys().map(|name| (name.clone(), None)).collect();
        Self {
            id: PartId::next(),
            asset,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            slots,
            parent: None,
            color: None,
            events: Observable::new(),
        }
    }

    /// Setzt die Startposition vor dem Einsetzen (Builder).
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn asset(&self) -> &Arc<Asset> {
        &self.asset
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Halter des Bauteils (`None` solange nicht eingesetzt).
    pub fn parent(&self) -> Option<ParentRef> {
        self.parent
    }

    /// Ereigniskanal dieses Bauteils.
    pub fn events(&self) -> &Observable<PartEvent> {
        &self.events
    }

    /// Iteriert über alle Slots (Name, Belegung) in Asset-Reihenfolge.
    pub fn slots(&self) -> impl Iterator<Item = (&str, Option<&Part>)> {
        self.slots
            .iter()
            .map(|(name, occupant)| (name.as_str(), occupant.as_ref()))
    }

    /// Belegung eines Slots; `None` wenn der Slot nicht existiert.
    pub fn slot(&self, slot_name: &str) -> Option<Option<&Part>> {
        self.slots.get(slot_name).map(Option::as_ref)
    }

    /// Name des Slots, in dem `part_id` direkt steckt.
    pub fn slot_of(&self, part_id: PartId) -> Option<&str> {
        self.slots.iter().find_map(|(name, occupant)| {
            occupant
                .as_ref()
                .filter(|child| child.id == part_id)
                .map(|_| name.as_str())
        })
    }

    /// Prüft, ob `asset` in den freien Slot `slot_name` eingesetzt werden darf.
    pub fn check_attachable(&self, slot_name: &str, asset: &Asset) -> Result<(), ModelError> {
        let Some(occupant) = self.slots.get(slot_name) else {
            return Err(ModelError::UnknownSlot {
                asset: self.asset.name.clone(),
                slot: slot_name.to_string(),
            });
        };
        if occupant.is_some() {
            return Err(ModelError::SlotOccupied {
                slot: slot_name.to_string(),
            });
        }
        let slot_type = &self.asset.slots[slot_name].slot_type;
        if !asset.fits_slot_type(slot_type) {
            return Err(ModelError::SlotTypeMismatch {
                asset: asset.name.clone(),
                slot_type: slot_type.clone(),
            });
        }
        Ok(())
    }

    /// Setzt `part` (samt Teilbaum) in den Slot `slot_name` ein.
    ///
    /// Der Aufrufer prüft vorher mit [`Part::check_attachable`]; bei Fehler
    /// wird `part` verworfen.
    pub(crate) fn add_part(&mut self, slot_name: &str, mut part: Part) -> Result<(), ModelError> {
        self.check_attachable(slot_name, &part.asset)?;

        part.parent = Some(ParentRef::Part(self.id));
        let snapshot = part.snapshot();
        if let Some(occupant) = self.slots.get_mut(slot_name) {
            *occupant = Some(part);
        }

        self.events.notify(&PartEvent::PartAdded {
            slot_name: slot_name.to_string(),
            part: snapshot,
        });
        Ok(())
    }

    /// Entfernt das direkte Kind `part_id` und gibt Slot-Name und Teilbaum zurück.
    pub(crate) fn remove_part(&mut self, part_id: PartId) -> Result<(String, Part), ModelError> {
        let slot_name = self
            .slot_of(part_id)
            .map(str::to_string)
            .ok_or(ModelError::NotAChild {
                parent: self.id,
                part: part_id,
            })?;

        let mut part = self
            .slots
            .get_mut(&slot_name)
            .and_then(Option::take)
            .ok_or(ModelError::CommandState("Slot-Belegung verschwunden"))?;
        part.parent = None;

        self.events.notify(&PartEvent::PartRemoved {
            slot_name: slot_name.clone(),
            part_id,
        });
        Ok((slot_name, part))
    }

    pub(crate) fn translate(&mut self, translation: Vec3) {
        self.translation = translation;
        self.events.notify(&PartEvent::Translated { translation });
    }

    pub(crate) fn rotate(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.events.notify(&PartEvent::Rotated { rotation });
    }

    pub(crate) fn set_color(&mut self, color: Option<String>) {
        self.color = color.clone();
        self.events.notify(&PartEvent::ColorChanged { color });
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ParentRef>) {
        self.parent = parent;
    }

    /// Erstellt ein Abbild des Teilbaums.
    pub fn snapshot(&self) -> PartSnapshot {
        PartSnapshot {
            id: self.id,
            asset: Arc::clone(&self.asset),
            translation: self.translation,
            rotation: self.rotation,
            color: self.color.clone(),
            events: self.events.clone(),
            slots: self
                .slots
                .iter()
                .map(|(name, occupant)| (name.clone(), occupant.as_ref().map(Part::snapshot)))
                .collect(),
        }
    }

    /// Sucht ein Bauteil im Teilbaum (Pre-Order).
    pub fn find(&self, part_id: PartId) -> Option<&Part> {
        if self.id == part_id {
            return Some(self);
        }
        self.slots
            .values()
            .flatten()
            .find_map(|child| child.find(part_id))
    }

    /// Sucht ein Bauteil im Teilbaum (mutable).
    pub(crate) fn find_mut(&mut self, part_id: PartId) -> Option<&mut Part> {
        if self.id == part_id {
            return Some(self);
        }
        self.slots
            .values_mut()
            .flatten()
            .find_map(|child| child.find_mut(part_id))
    }

    /// Besucht alle Bauteile des Teilbaums in Pre-Order.
    pub fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a Part)) {
        visitor(self);
        for child in self.slots.values().flatten() {
            child.visit(visitor);
        }
    }

    /// Anzahl der Bauteile im Teilbaum (inklusive dieses Bauteils).
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_| count += 1);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SlotDefinition;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn body() -> Arc<Asset> {
        Arc::new(
            Asset::root("bot/body")
                .with_slot("arm", SlotDefinition::new("arm"))
                .with_slot("head", SlotDefinition::new("head")),
        )
    }

    fn arm() -> Arc<Asset> {
        Arc::new(Asset::attachable("bot/arm", "arm").with_slot("tool", SlotDefinition::new("gripper")))
    }

    #[test]
    fn slots_follow_asset_definition() {
        let part = Part::new(body());
        let names: Vec<&str> = part.slots().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["arm", "head"]);
        assert!(part.slots().all(|(_, occupant)| occupant.is_none()));
        assert!(part.parent().is_none());
    }

    #[test]
    fn part_ids_are_unique() {
        let a = Part::new(body());
        let b = Part::new(body());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn add_and_remove_update_parent_and_notify() {
        let mut root = Part::new(body());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        root.events().observe_all(move |event| s.borrow_mut().push(event.label()));

        let child = Part::new(arm());
        let child_id = child.id();
        root.add_part("arm", child).expect("Slot frei");

        let attached = root.find(child_id).expect("Kind eingesetzt");
        assert_eq!(attached.parent(), Some(ParentRef::Part(root.id())));
        assert_eq!(root.slot_of(child_id), Some("arm"));

        let (slot, removed) = root.remove_part(child_id).expect("Kind vorhanden");
        assert_eq!(slot, "arm");
        assert!(removed.parent().is_none());
        assert_eq!(root.slot("arm"), Some(None));

        assert_eq!(
            *seen.borrow(),
            vec![PartEventKind::PartAdded, PartEventKind::PartRemoved]
        );
    }

    #[test]
    fn add_rejects_unknown_occupied_and_mismatching_slots() {
        let mut root = Part::new(body());
        assert!(matches!(
            root.check_attachable("leg", &arm()),
            Err(ModelError::UnknownSlot { .. })
        ));
        assert!(matches!(
            root.check_attachable("head", &arm()),
            Err(ModelError::SlotTypeMismatch { .. })
        ));

        root.add_part("arm", Part::new(arm())).unwrap();
        assert!(matches!(
            root.check_attachable("arm", &arm()),
            Err(ModelError::SlotOccupied { .. })
        ));
    }

    #[test]
    fn remove_of_foreign_part_fails() {
        let mut root = Part::new(body());
        let stranger = Part::new(arm());
        assert!(matches!(
            root.remove_part(stranger.id()),
            Err(ModelError::NotAChild { .. })
        ));
    }

    #[test]
    fn snapshot_contains_occupied_subtree() {
        let mut root = Part::new(body());
        let mut arm_part = Part::new(arm());
        arm_part
            .add_part("tool", Part::new(Arc::new(Asset::attachable("bot/claw", "gripper"))))
            .unwrap();
        root.add_part("arm", arm_part).unwrap();

        let snapshot = root.snapshot();
        assert_eq!(snapshot.subtree_len(), 3);
        assert_eq!(root.subtree_len(), 3);
        assert!(snapshot.events.same_channel(root.events()));
    }

    #[test]
    fn pose_and_color_notifications_carry_new_values() {
        let mut part = Part::new(body());
        let last = Rc::new(RefCell::new(None));
        let l = Rc::clone(&last);
        part.events().observe_all(move |event| *l.borrow_mut() = Some(event.clone()));

        part.translate(Vec3::new(1.0, 2.0, 3.0));
        assert!(matches!(
            *last.borrow(),
            Some(PartEvent::Translated { translation }) if translation == Vec3::new(1.0, 2.0, 3.0)
        ));

        part.set_color(Some("#ff0000".into()));
        assert_eq!(part.color(), Some("#ff0000"));
        assert!(matches!(
            &*last.borrow(),
            Some(PartEvent::ColorChanged { color: Some(c) }) if c == "#ff0000"
        ));
    }
}
