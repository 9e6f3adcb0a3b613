//! Undo/Redo-Engine: lineare History bereits angewendeter, invertierbarer Commands.
//!
//! Jeder Eintrag ist ein geschlossenes Effekt-Paar (vorwärts/rückwärts), kein
//! Zustands-Diff. `execute` wendet den Vorwärts-Effekt sofort an, verwirft die
//! Redo-Zukunft und hängt den Eintrag an.

use crate::core::{
    CommandError, HistoryError, Labeled, ModelError, Observable, ParentRef, Part, PartId, Robot,
};
use glam::{Quat, Vec3};

/// Richtung, in der ein Command angewendet wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Vorwärts-Effekt (execute/redo)
    Redo,
    /// Rückwärts-Effekt (undo)
    Undo,
}

/// Invertierbare Domänen-Mutation.
///
/// `detached` hält den Teilbaum, solange er nicht im Roboter steckt.
#[derive(Debug)]
pub enum EditCommand {
    /// Wurzelbauteil einsetzen
    AddRootPart {
        part_id: PartId,
        detached: Option<Part>,
    },
    /// Wurzelbauteil entfernen
    RemoveRootPart {
        part_id: PartId,
        detached: Option<Part>,
    },
    /// Bauteil in einen Slot einsetzen
    AddPart {
        parent: PartId,
        slot_name: String,
        part_id: PartId,
        detached: Option<Part>,
    },
    /// Bauteil aus seinem Slot entfernen (Slot-Name beim Erstellen festgehalten)
    RemovePart {
        parent: PartId,
        slot_name: String,
        part_id: PartId,
        detached: Option<Part>,
    },
    /// Lokale Position setzen
    Translate {
        part_id: PartId,
        translation: Vec3,
        previous: Option<Vec3>,
    },
    /// Lokale Orientierung setzen
    Rotate {
        part_id: PartId,
        rotation: Quat,
        previous: Option<Quat>,
    },
    /// Farbe setzen
    SetColor {
        part_id: PartId,
        color: Option<String>,
        previous: Option<Option<String>>,
    },
}

/// Beobachtbare Nebenwirkung eines angewendeten Effekts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effect {
    /// Ein Bauteil wurde aus dem Baum entfernt
    pub removed_part: bool,
}

impl EditCommand {
    /// Wurzelbauteil einsetzen.
    pub fn add_root_part(part: Part) -> Self {
        Self::AddRootPart {
            part_id: part.id(),
            detached: Some(part),
        }
    }

    /// Bauteil in `slot_name` von `parent` einsetzen.
    pub fn add_part(parent: PartId, slot_name: impl Into<String>, part: Part) -> Self {
        Self::AddPart {
            parent,
            slot_name: slot_name.into(),
            part_id: part.id(),
            detached: Some(part),
        }
    }

    /// Bauteil entfernen; Halter und Slot werden jetzt festgehalten.
    pub fn remove_part(robot: &Robot, part_id: PartId) -> Result<Self, ModelError> {
        match robot.attachment_of(part_id) {
            Some((ParentRef::Robot, _)) => Ok(Self::RemoveRootPart {
                part_id,
                detached: None,
            }),
            Some((ParentRef::Part(parent), Some(slot_name))) => Ok(Self::RemovePart {
                parent,
                slot_name,
                part_id,
                detached: None,
            }),
            _ => Err(ModelError::UnknownPart(part_id)),
        }
    }

    /// Neue Position; die alte wird beim Anwenden aus dem Bauteil gelesen.
    pub fn translate(part_id: PartId, translation: Vec3) -> Self {
        Self::Translate {
            part_id,
            translation,
            previous: None,
        }
    }

    /// Neue Orientierung; die alte wird beim Anwenden aus dem Bauteil gelesen.
    pub fn rotate(part_id: PartId, rotation: Quat) -> Self {
        Self::Rotate {
            part_id,
            rotation,
            previous: None,
        }
    }

    /// Neue Farbe; die alte wird beim Anwenden aus dem Bauteil gelesen.
    pub fn set_color(part_id: PartId, color: Option<String>) -> Self {
        Self::SetColor {
            part_id,
            color,
            previous: None,
        }
    }

    /// Kurzbezeichnung für Logging/UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AddRootPart { .. } => "Wurzelbauteil einsetzen",
            Self::RemoveRootPart { .. } => "Wurzelbauteil entfernen",
            Self::AddPart { .. } => "Bauteil einsetzen",
            Self::RemovePart { .. } => "Bauteil entfernen",
            Self::Translate { .. } => "Bauteil verschieben",
            Self::Rotate { .. } => "Bauteil drehen",
            Self::SetColor { .. } => "Farbe ändern",
        }
    }

    /// Wendet den Effekt in `direction` auf den Roboter an.
    ///
    /// Schlägt ein Effekt fehl, bleibt das Command in seinem vorherigen Zustand.
    pub fn apply(&mut self, robot: &mut Robot, direction: Direction) -> Result<Effect, ModelError> {
        use Direction::{Redo, Undo};

        match (self, direction) {
            (Self::AddRootPart { detached, .. }, Redo)
            | (Self::RemoveRootPart { detached, .. }, Undo) => {
                let part = detached
                    .take()
                    .ok_or(ModelError::CommandState("Wurzelbauteil nicht gehalten"))?;
                if let Err(err) = robot.check_root_attachable(&part) {
                    *detached = Some(part);
                    return Err(err);
                }
                robot.add_root_part(part)?;
                Ok(Effect::default())
            }
            (Self::AddRootPart { part_id, detached }, Undo)
            | (Self::RemoveRootPart { part_id, detached }, Redo) => {
                if robot.root_part().map(Part::id) != Some(*part_id) {
                    return Err(ModelError::UnknownPart(*part_id));
                }
                *detached = Some(robot.remove_root_part()?);
                Ok(Effect { removed_part: true })
            }
            (
                Self::AddPart {
                    parent,
                    slot_name,
                    detached,
                    ..
                },
                Redo,
            )
            | (
                Self::RemovePart {
                    parent,
                    slot_name,
                    detached,
                    ..
                },
                Undo,
            ) => {
                let holder = robot.part_mut(*parent)?;
                let part = detached
                    .take()
                    .ok_or(ModelError::CommandState("Bauteil nicht gehalten"))?;
                if let Err(err) = holder.check_attachable(slot_name, part.asset()) {
                    *detached = Some(part);
                    return Err(err);
                }
                holder.add_part(slot_name, part)?;
                Ok(Effect::default())
            }
            (
                Self::AddPart {
                    parent,
                    part_id,
                    detached,
                    ..
                },
                Undo,
            )
            | (
                Self::RemovePart {
                    parent,
                    part_id,
                    detached,
                    ..
                },
                Redo,
            ) => {
                let (_, part) = robot.part_mut(*parent)?.remove_part(*part_id)?;
                *detached = Some(part);
                Ok(Effect { removed_part: true })
            }
            (
                Self::Translate {
                    part_id,
                    translation,
                    previous,
                },
                Redo,
            ) => {
                let part = robot.part_mut(*part_id)?;
                *previous = Some(part.translation());
                part.translate(*translation);
                Ok(Effect::default())
            }
            (
                Self::Translate {
                    part_id, previous, ..
                },
                Undo,
            ) => {
                let old = previous.ok_or(ModelError::CommandState("alte Position fehlt"))?;
                robot.part_mut(*part_id)?.translate(old);
                Ok(Effect::default())
            }
            (
                Self::Rotate {
                    part_id,
                    rotation,
                    previous,
                },
                Redo,
            ) => {
                let part = robot.part_mut(*part_id)?;
                *previous = Some(part.rotation());
                part.rotate(*rotation);
                Ok(Effect::default())
            }
            (
                Self::Rotate {
                    part_id, previous, ..
                },
                Undo,
            ) => {
                let old = previous.ok_or(ModelError::CommandState("alte Rotation fehlt"))?;
                robot.part_mut(*part_id)?.rotate(old);
                Ok(Effect::default())
            }
            (
                Self::SetColor {
                    part_id,
                    color,
                    previous,
                },
                Redo,
            ) => {
                let part = robot.part_mut(*part_id)?;
                *previous = Some(part.color().map(str::to_string));
                part.set_color(color.clone());
                Ok(Effect::default())
            }
            (
                Self::SetColor {
                    part_id, previous, ..
                },
                Undo,
            ) => {
                let old = previous
                    .clone()
                    .ok_or(ModelError::CommandState("alte Farbe fehlt"))?;
                robot.part_mut(*part_id)?.set_color(old);
                Ok(Effect::default())
            }
        }
    }
}

/// Benachrichtigungen der History für abhängige UI (Buttons, Katalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEvent {
    /// Nach jedem erfolgreichen execute/undo/redo
    Updated,
    /// Ein Effekt hat ein Bauteil aus dem Baum entfernt
    AnyPartRemoved,
}

impl Labeled for HistoryEvent {
    type Label = HistoryEvent;

    fn label(&self) -> HistoryEvent {
        *self
    }
}

/// Ein erfolgreich angewendeter History-Schritt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStep {
    pub label: &'static str,
    pub direction: Direction,
    /// Wert von [`CommandHistory::revision`] nach dem Schritt
    pub revision: u64,
}

/// Lineare Undo/Redo-History mit Cursor.
pub struct CommandHistory {
    entries: Vec<EditCommand>,
    /// Anzahl angewendeter Einträge (Cursor `current` = `applied - 1`)
    applied: usize,
    max_depth: usize,
    last_step: Option<HistoryStep>,
    events: Observable<HistoryEvent>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new_with_capacity(200)
    }
}

impl CommandHistory {
    /// Erstellt eine leere History mit maximaler Tiefe (mindestens 1).
    pub fn new_with_capacity(max_depth: usize) -> Self {
        Self {
            entries: Vec::new(),
            applied: 0,
            max_depth: max_depth.max(1),
            last_step: None,
            events: Observable::new(),
        }
    }

    /// Ereigniskanal (`Updated`, `AnyPartRemoved`).
    pub fn events(&self) -> &Observable<HistoryEvent> {
        &self.events
    }

    /// Wendet `command` vorwärts an und hängt es an die History.
    ///
    /// Alle Einträge nach dem Cursor werden verworfen. Schlägt der Effekt fehl,
    /// bleibt die History unverändert.
    pub fn execute(&mut self, robot: &mut Robot, mut command: EditCommand) -> Result<(), CommandError> {
        let effect = command.apply(robot, Direction::Redo)?;
        log::info!("Command ausgeführt: {}", command.label());
        self.record_step(command.label(), Direction::Redo);

        self.entries.truncate(self.applied);
        self.entries.push(command);
        self.applied += 1;

        if self.entries.len() > self.max_depth {
            let overflow = self.entries.len() - self.max_depth;
            self.entries.drain(..overflow);
            self.applied -= overflow;
        }

        self.emit(effect);
        Ok(())
    }

    /// Macht den Eintrag am Cursor rückgängig.
    pub fn undo(&mut self, robot: &mut Robot) -> Result<(), CommandError> {
        if self.applied == 0 {
            return Err(HistoryError::NoMoreUndo.into());
        }
        let command = &mut self.entries[self.applied - 1];
        let effect = command.apply(robot, Direction::Undo)?;
        let label = command.label();
        log::info!("Undo: {}", label);

        self.applied -= 1;
        self.record_step(label, Direction::Undo);
        self.emit(effect);
        Ok(())
    }

    /// Wendet den Eintrag nach dem Cursor erneut an.
    pub fn redo(&mut self, robot: &mut Robot) -> Result<(), CommandError> {
        let Some(command) = self.entries.get_mut(self.applied) else {
            return Err(HistoryError::NoMoreRedo.into());
        };
        let effect = command.apply(robot, Direction::Redo)?;
        let label = command.label();
        log::info!("Redo: {}", label);

        self.applied += 1;
        self.record_step(label, Direction::Redo);
        self.emit(effect);
        Ok(())
    }

    fn record_step(&mut self, label: &'static str, direction: Direction) {
        self.last_step = Some(HistoryStep {
            label,
            direction,
            revision: self.revision() + 1,
        });
    }

    /// Zählt erfolgreiche execute/undo/redo-Aufrufe.
    pub fn revision(&self) -> u64 {
        self.last_step.map_or(0, |step| step.revision)
    }

    /// Zuletzt angewendeter Schritt.
    pub fn last_step(&self) -> Option<HistoryStep> {
        self.last_step
    }

    fn emit(&self, effect: Effect) {
        if effect.removed_part {
            self.events.notify(&HistoryEvent::AnyPartRemoved);
        }
        self.events.notify(&HistoryEvent::Updated);
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    /// Cursor auf den zuletzt angewendeten Eintrag (`-1` = nichts angewendet).
    pub fn current(&self) -> isize {
        self.applied as isize - 1
    }

    /// Anzahl der Einträge (angewendet + wiederherstellbar).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Asset, SlotDefinition};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    fn asset_a() -> Arc<Asset> {
        Arc::new(Asset::root("test/a").with_slot("s1", SlotDefinition::new("T")))
    }

    fn asset_t() -> Arc<Asset> {
        Arc::new(Asset::attachable("test/t", "T").with_slot("tip", SlotDefinition::new("U")))
    }

    fn asset_u() -> Arc<Asset> {
        Arc::new(Asset::attachable("test/u", "U"))
    }

    #[test]
    fn add_root_part_scenario() {
        let mut robot = Robot::new();
        let mut history = CommandHistory::default();
        let asset = asset_a();

        history
            .execute(&mut robot, EditCommand::add_root_part(Part::new(Arc::clone(&asset))))
            .unwrap();
        assert!(history.can_undo());
        assert!(!history.can_redo());

        history.undo(&mut robot).unwrap();
        assert!(!robot.has_root_part());

        history.redo(&mut robot).unwrap();
        let root = robot.root_part().expect("Wurzel wiederhergestellt");
        assert!(Arc::ptr_eq(root.asset(), &asset));
        assert_eq!(robot.part_count(), 1);
    }

    #[test]
    fn boundary_errors_leave_cursor_unchanged() {
        let mut robot = Robot::new();
        let mut history = CommandHistory::default();

        assert_eq!(
            history.undo(&mut robot),
            Err(CommandError::History(HistoryError::NoMoreUndo))
        );
        assert_eq!(history.current(), -1);

        history
            .execute(&mut robot, EditCommand::add_root_part(Part::new(asset_a())))
            .unwrap();
        assert_eq!(
            history.redo(&mut robot),
            Err(CommandError::History(HistoryError::NoMoreRedo))
        );
        assert_eq!(history.current(), 0);
    }

    #[test]
    fn steps_count_only_successful_changes() {
        let mut robot = Robot::new();
        let mut history = CommandHistory::default();
        assert_eq!(history.revision(), 0);
        assert!(history.last_step().is_none());

        history
            .execute(&mut robot, EditCommand::add_root_part(Part::new(asset_a())))
            .unwrap();
        history.undo(&mut robot).unwrap();
        let _ = history.undo(&mut robot);

        assert_eq!(history.revision(), 2);
        assert_eq!(
            history.last_step(),
            Some(HistoryStep {
                label: "Wurzelbauteil einsetzen",
                direction: Direction::Undo,
                revision: 2,
            })
        );
    }

    #[test]
    fn execute_after_undo_discards_redo_future() {
        let mut robot = Robot::new();
        let mut history = CommandHistory::default();
        history
            .execute(&mut robot, EditCommand::add_root_part(Part::new(asset_a())))
            .unwrap();
        let root_id = robot.root_part().unwrap().id();
        history
            .execute(&mut robot, EditCommand::translate(root_id, Vec3::X))
            .unwrap();

        history.undo(&mut robot).unwrap();
        assert!(history.can_redo());

        history
            .execute(&mut robot, EditCommand::translate(root_id, Vec3::Y))
            .unwrap();
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(
            history.redo(&mut robot),
            Err(CommandError::History(HistoryError::NoMoreRedo))
        );
    }

    #[test]
    fn undo_all_restores_initial_serialization() {
        let mut robot = Robot::new();
        let mut history = CommandHistory::default();
        let initial = robot.serialize();

        history
            .execute(&mut robot, EditCommand::add_root_part(Part::new(asset_a())))
            .unwrap();
        let root_id = robot.root_part().unwrap().id();
        history
            .execute(&mut robot, EditCommand::add_part(root_id, "s1", Part::new(asset_t())))
            .unwrap();
        history
            .execute(&mut robot, EditCommand::rotate(root_id, Quat::from_rotation_z(0.5)))
            .unwrap();
        history
            .execute(&mut robot, EditCommand::set_color(root_id, Some("#123456".into())))
            .unwrap();
        let t_id = robot.root_part().unwrap().slot("s1").flatten().unwrap().id();
        let cmd = EditCommand::remove_part(&robot, t_id).unwrap();
        history
            .execute(&mut robot, cmd)
            .unwrap();

        for _ in 0..5 {
            history.undo(&mut robot).unwrap();
        }
        assert_eq!(robot.serialize(), initial);
    }

    #[test]
    fn redo_after_undo_restores_exact_state() {
        let mut robot = Robot::new();
        let mut history = CommandHistory::default();
        history
            .execute(&mut robot, EditCommand::add_root_part(Part::new(asset_a())))
            .unwrap();
        let root_id = robot.root_part().unwrap().id();
        let mut t = Part::new(asset_t());
        let t_id = t.id();
        t.add_part("tip", Part::new(asset_u())).unwrap();
        history
            .execute(&mut robot, EditCommand::add_part(root_id, "s1", t))
            .unwrap();
        history
            .execute(&mut robot, EditCommand::translate(t_id, Vec3::new(0.0, 2.0, 0.0)))
            .unwrap();

        let before_undo = robot.serialize();
        history.undo(&mut robot).unwrap();
        history.undo(&mut robot).unwrap();
        history.redo(&mut robot).unwrap();
        history.redo(&mut robot).unwrap();

        assert_eq!(robot.serialize(), before_undo);
        assert!(robot.contains(t_id));
    }

    #[test]
    fn remove_part_undo_reattaches_same_slot() {
        let mut robot = Robot::new();
        let mut history = CommandHistory::default();
        let asset = Arc::new(
            Asset::root("test/b")
                .with_slot("left", SlotDefinition::new("T"))
                .with_slot("right", SlotDefinition::new("T")),
        );
        history
            .execute(&mut robot, EditCommand::add_root_part(Part::new(asset)))
            .unwrap();
        let root_id = robot.root_part().unwrap().id();
        let t = Part::new(asset_t());
        let t_id = t.id();
        history
            .execute(&mut robot, EditCommand::add_part(root_id, "right", t))
            .unwrap();

        let cmd = EditCommand::remove_part(&robot, t_id).unwrap();
        history
            .execute(&mut robot, cmd)
            .unwrap();
        assert!(!robot.contains(t_id));

        history.undo(&mut robot).unwrap();
        assert_eq!(
            robot.attachment_of(t_id),
            Some((ParentRef::Part(root_id), Some("right".to_string())))
        );
    }

    #[test]
    fn failing_command_is_not_recorded() {
        let mut robot = Robot::new();
        let mut history = CommandHistory::default();
        let claw = Part::new(asset_u());

        let result = history.execute(&mut robot, EditCommand::add_root_part(claw));
        assert!(matches!(
            result,
            Err(CommandError::Model(ModelError::NotRootEligible(_)))
        ));
        assert!(history.is_empty());
        assert!(!history.can_undo());
    }

    #[test]
    fn notifications_for_updates_and_removals() {
        let mut robot = Robot::new();
        let mut history = CommandHistory::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        history.events().observe_all(move |e| s.borrow_mut().push(*e));

        history
            .execute(&mut robot, EditCommand::add_root_part(Part::new(asset_a())))
            .unwrap();
        history.undo(&mut robot).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                HistoryEvent::Updated,
                HistoryEvent::AnyPartRemoved,
                HistoryEvent::Updated
            ]
        );
    }

    #[test]
    fn respects_max_depth() {
        let mut robot = Robot::new();
        let mut history = CommandHistory::new_with_capacity(3);
        history
            .execute(&mut robot, EditCommand::add_root_part(Part::new(asset_a())))
            .unwrap();
        let root_id = robot.root_part().unwrap().id();
        for i in 1..=5 {
            history
                .execute(&mut robot, EditCommand::translate(root_id, Vec3::splat(i as f32)))
                .unwrap();
        }

        let mut undo_count = 0;
        while history.can_undo() {
            history.undo(&mut robot).unwrap();
            undo_count += 1;
        }
        assert_eq!(undo_count, 3);
        assert_eq!(robot.root_part().unwrap().translation(), Vec3::splat(2.0));
    }
}
