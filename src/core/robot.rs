//! Aggregat-Wurzel: der Roboter mit höchstens einem Wurzelbauteil.

use super::observable::{Labeled, Observable};
use super::part::{ParentRef, Part, PartId, PartSnapshot};
use super::serialize::{SerializedPart, SerializedRobot};
use super::{ModelError, SlotDefinition};
use anyhow::Context;
use indexmap::IndexSet;

/// Ereignisse auf Roboter-Ebene.
#[derive(Debug, Clone)]
pub enum RobotEvent {
    /// Wurzelbauteil (samt Teilbaum) eingesetzt
    RootPartAdded { part: PartSnapshot },
    /// Wurzelbauteil entfernt
    RootPartRemoved { part_id: PartId },
}

/// Labels von [`RobotEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotEventKind {
    RootPartAdded,
    RootPartRemoved,
}

impl Labeled for RobotEvent {
    type Label = RobotEventKind;

    fn label(&self) -> RobotEventKind {
        match self {
            RobotEvent::RootPartAdded { .. } => RobotEventKind::RootPartAdded,
            RobotEvent::RootPartRemoved { .. } => RobotEventKind::RootPartRemoved,
        }
    }
}

/// Der zusammengesteckte Roboter.
#[derive(Debug, Default)]
pub struct Robot {
    root_part: Option<Part>,
    events: Observable<RobotEvent>,
}

impl Robot {
    /// Erstellt einen leeren Roboter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ereigniskanal des Roboters.
    pub fn events(&self) -> &Observable<RobotEvent> {
        &self.events
    }

    pub fn root_part(&self) -> Option<&Part> {
        self.root_part.as_ref()
    }

    pub fn has_root_part(&self) -> bool {
        self.root_part.is_some()
    }

    /// Setzt das Wurzelbauteil ein.
    pub(crate) fn add_root_part(&mut self, mut part: Part) -> Result<(), ModelError> {
        self.check_root_attachable(&part)?;

        part.set_parent(Some(ParentRef::Robot));
        let snapshot = part.snapshot();
        self.root_part = Some(part);

        self.events.notify(&RobotEvent::RootPartAdded { part: snapshot });
        Ok(())
    }

    /// Prüft, ob `part` als Wurzelbauteil eingesetzt werden darf.
    pub fn check_root_attachable(&self, part: &Part) -> Result<(), ModelError> {
        if self.root_part.is_some() {
            return Err(ModelError::RootPartPresent);
        }
        if !part.asset().root {
            return Err(ModelError::NotRootEligible(part.asset().name.clone()));
        }
        Ok(())
    }

    /// Entfernt das Wurzelbauteil und gibt den Teilbaum zurück.
    pub(crate) fn remove_root_part(&mut self) -> Result<Part, ModelError> {
        let mut part = self.root_part.take().ok_or(ModelError::NoRootPart)?;
        part.set_parent(None);

        self.events.notify(&RobotEvent::RootPartRemoved { part_id: part.id() });
        Ok(part)
    }

    /// Sucht ein Bauteil im gesamten Baum.
    pub fn find_part(&self, part_id: PartId) -> Option<&Part> {
        self.root_part.as_ref()?.find(part_id)
    }

    pub(crate) fn find_part_mut(&mut self, part_id: PartId) -> Option<&mut Part> {
        self.root_part.as_mut()?.find_mut(part_id)
    }

    pub(crate) fn part_mut(&mut self, part_id: PartId) -> Result<&mut Part, ModelError> {
        self.find_part_mut(part_id)
            .ok_or(ModelError::UnknownPart(part_id))
    }

    /// Gibt `true` zurück, wenn `part_id` im Baum hängt.
    pub fn contains(&self, part_id: PartId) -> bool {
        self.find_part(part_id).is_some()
    }

    /// Halter und Slot-Name eines eingesetzten Bauteils.
    ///
    /// Für das Wurzelbauteil ist der Slot-Name `None`.
    pub fn attachment_of(&self, part_id: PartId) -> Option<(ParentRef, Option<String>)> {
        let part = self.find_part(part_id)?;
        match part.parent()? {
            ParentRef::Robot => Some((ParentRef::Robot, None)),
            ParentRef::Part(parent_id) => {
                let parent = self.find_part(parent_id)?;
                let slot = parent.slot_of(part_id)?.to_string();
                Some((ParentRef::Part(parent_id), Some(slot)))
            }
        }
    }

    /// Statische Slot-Definition, in der `part_id` steckt (`None` für die Wurzel).
    pub fn slot_definition_of(&self, part_id: PartId) -> Option<&SlotDefinition> {
        let (ParentRef::Part(parent_id), Some(slot)) = self.attachment_of(part_id)? else {
            return None;
        };
        self.find_part(parent_id)?.asset().slots.get(&slot)
    }

    /// Anzahl aller eingesetzten Bauteile.
    pub fn part_count(&self) -> usize {
        self.root_part.as_ref().map_or(0, Part::subtree_len)
    }

    /// Slot-Typen, für die aktuell irgendwo im Baum ein freier Slot existiert.
    ///
    /// Vollständiger Baumdurchlauf, ohne Duplikate, in Pre-Order-Reihenfolge.
    pub fn available_slot_types(&self) -> IndexSet<String> {
        let mut types = IndexSet::new();
        if let Some(root) = &self.root_part {
            root.visit(&mut |part: &Part| {
                for (name, occupant) in part.slots() {
                    if occupant.is_none() {
                        types.insert(part.asset().slots[name].slot_type.clone());
                    }
                }
            });
        }
        types
    }

    /// Flaches, verlustbehaftetes Abbild für Anzeige und Export.
    pub fn serialize(&self) -> SerializedRobot {
        SerializedRobot {
            root_part: self.root_part.as_ref().map(serialize_part),
        }
    }

    /// Serialisiert den Roboter als eingerücktes JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(&self.serialize())
            .context("Roboter konnte nicht als JSON serialisiert werden")
    }
}

fn serialize_part(part: &Part) -> SerializedPart {
    SerializedPart {
        model_name: part.asset().name.clone(),
        translation: part.translation(),
        rotation: part.rotation(),
        color: part.color().map(str::to_string),
        slots: part
            .slots()
            .filter_map(|(name, occupant)| {
                occupant.map(|child| (name.to_string(), serialize_part(child)))
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Asset, SlotDefinition};
    use std::sync::Arc;

    fn robot_with_head_occupied() -> Robot {
        let body = Arc::new(
            Asset::root("bot/body")
                .with_slot("arm", SlotDefinition::new("arm-mount"))
                .with_slot("arm2", SlotDefinition::new("arm-mount"))
                .with_slot("head", SlotDefinition::new("head-mount")),
        );
        let head = Arc::new(
            Asset::attachable("bot/head", "head-mount")
                .with_slot("grip", SlotDefinition::new("gripper")),
        );

        let mut robot = Robot::new();
        let mut root = Part::new(body);
        root.add_part("head", Part::new(head)).unwrap();
        robot.add_root_part(root).unwrap();
        robot
    }

    #[test]
    fn available_slot_types_have_no_duplicates() {
        let robot = robot_with_head_occupied();
        let available = robot.available_slot_types();
        let types: Vec<&str> = available
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(types, vec!["arm-mount", "gripper"]);
    }

    #[test]
    fn empty_robot_has_no_available_slot_types() {
        let robot = Robot::new();
        assert!(robot.available_slot_types().is_empty());
        assert_eq!(robot.part_count(), 0);
        assert!(robot.serialize().root_part.is_none());
    }

    #[test]
    fn only_one_root_part_allowed() {
        let robot = robot_with_head_occupied();
        let another = Part::new(Arc::new(Asset::root("bot/body2")));
        assert_eq!(
            robot.check_root_attachable(&another),
            Err(ModelError::RootPartPresent)
        );
    }

    #[test]
    fn non_root_asset_cannot_be_root() {
        let robot = Robot::new();
        let claw = Part::new(Arc::new(Asset::attachable("bot/claw", "gripper")));
        assert!(matches!(
            robot.check_root_attachable(&claw),
            Err(ModelError::NotRootEligible(_))
        ));
    }

    #[test]
    fn attachment_reports_parent_and_slot() {
        let robot = robot_with_head_occupied();
        let root = robot.root_part().unwrap();
        let head_id = root.slot("head").flatten().unwrap().id();

        assert_eq!(
            robot.attachment_of(root.id()),
            Some((ParentRef::Robot, None))
        );
        assert_eq!(
            robot.attachment_of(head_id),
            Some((ParentRef::Part(root.id()), Some("head".to_string())))
        );
        assert_eq!(
            robot.slot_definition_of(head_id).map(|s| s.slot_type.as_str()),
            Some("head-mount")
        );
        assert!(robot.slot_definition_of(root.id()).is_none());
    }

    #[test]
    fn remove_root_part_returns_subtree() {
        let mut robot = robot_with_head_occupied();
        let removed = robot.remove_root_part().unwrap();
        assert_eq!(removed.subtree_len(), 2);
        assert!(!robot.has_root_part());
        assert_eq!(robot.remove_root_part().unwrap_err(), ModelError::NoRootPart);
    }

    #[test]
    fn serialized_json_uses_camel_case_and_nested_slots() {
        let robot = robot_with_head_occupied();
        let json = robot.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["rootPart"]["modelName"], "bot/body");
        assert_eq!(value["rootPart"]["slots"]["head"]["modelName"], "bot/head");
        assert!(value["rootPart"]["slots"].get("arm").is_none());
        assert!(value["rootPart"].get("color").is_none());
    }
}
