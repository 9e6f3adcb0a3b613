//! Mediator des Roboters: verwaltet den Roboter-Container und den Wurzel-Mediator.

use super::context::MediatorContext;
use super::part::PartMediator;
use crate::core::{ObserverId, Observable, PartId, Robot, RobotEvent};
use crate::scene::{NodeId, SceneGraph, SceneNodeKind};
use std::cell::RefCell;
use std::rc::Rc;

pub struct RobotMediator {
    ctx: MediatorContext,
    events: Observable<RobotEvent>,
    observer: Option<ObserverId>,
    container: NodeId,
    root: Option<Rc<RefCell<PartMediator>>>,
}

impl RobotMediator {
    /// Legt den Roboter-Container unter der Szenenwurzel an und koppelt sich an `robot`.
    ///
    /// Ein bereits vorhandenes Wurzelbauteil wird sofort samt Teilbaum gespiegelt.
    pub fn attach(ctx: &MediatorContext, robot: &Robot) -> Option<Rc<RefCell<RobotMediator>>> {
        let container = ctx
            .scene
            .borrow_mut()
            .add_node(SceneGraph::ROOT, SceneNodeKind::RobotContainer)?;

        let mediator = Rc::new(RefCell::new(RobotMediator {
            ctx: ctx.clone(),
            events: robot.events().clone(),
            observer: None,
            container,
            root: None,
        }));

        let weak = Rc::downgrade(&mediator);
        let observer = robot.events().observe_all(move |event| {
            if let Some(mediator) = weak.upgrade() {
                mediator.borrow_mut().on_event(event);
            }
        });

        {
            let mut this = mediator.borrow_mut();
            this.observer = Some(observer);
            if let Some(root) = robot.root_part() {
                this.on_event(&RobotEvent::RootPartAdded {
                    part: root.snapshot(),
                });
            }
        }
        Some(mediator)
    }

    fn on_event(&mut self, event: &RobotEvent) {
        match event {
            RobotEvent::RootPartAdded { part } => {
                if let Some(previous) = self.root.take() {
                    log::warn!("Wurzel-Mediator war noch vorhanden, wird ersetzt");
                    previous.borrow_mut().detach();
                }
                self.root = PartMediator::attach(&self.ctx, part, self.container);
            }
            RobotEvent::RootPartRemoved { part_id } => self.on_root_removed(*part_id),
        }
    }

    fn on_root_removed(&mut self, part_id: PartId) {
        let Some(root) = self.root.take() else {
            log::warn!("Wurzelbauteil {} entfernt, aber kein Mediator vorhanden", part_id);
            return;
        };
        root.borrow_mut().detach();
    }

    /// Roboter-Container in der Szene.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Mediator des Wurzelbauteils.
    pub fn root(&self) -> Option<Rc<RefCell<PartMediator>>> {
        self.root.clone()
    }

    /// Anzahl aller Bauteil-Mediatoren unterhalb des Roboters.
    pub fn part_mediator_count(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.borrow().subtree_len())
    }

    /// Entkoppelt sich vom Roboter und entfernt den gesamten visuellen Teilbaum.
    pub fn detach(&mut self) {
        if let Some(root) = self.root.take() {
            root.borrow_mut().detach();
        }
        if let Some(observer) = self.observer.take() {
            self.events.remove_observer(observer);
        }
        self.ctx.scene.borrow_mut().remove_subtree(self.container);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::history::{CommandHistory, EditCommand};
    use crate::core::{Asset, Part, SlotDefinition};
    use crate::scene::LoadQueue;
    use std::sync::Arc;

    fn ctx() -> MediatorContext {
        MediatorContext::new(Rc::new(RefCell::new(SceneGraph::new())), LoadQueue::new())
    }

    fn tree() -> Part {
        let mut root = Part::new(Arc::new(
            Asset::root("bot/body")
                .with_slot("arm", SlotDefinition::new("arm"))
                .with_slot("head", SlotDefinition::new("head")),
        ));
        let mut arm = Part::new(Arc::new(
            Asset::attachable("bot/arm", "arm").with_slot("tool", SlotDefinition::new("gripper")),
        ));
        arm.add_part("tool", Part::new(Arc::new(Asset::attachable("bot/claw", "gripper"))))
            .unwrap();
        root.add_part("arm", arm).unwrap();
        root
    }

    #[test]
    fn mirrors_existing_root_on_attach() {
        let ctx = ctx();
        let mut robot = Robot::new();
        robot.add_root_part(tree()).unwrap();

        let mediator = RobotMediator::attach(&ctx, &robot).unwrap();
        assert_eq!(mediator.borrow().part_mediator_count(), 3);
        assert_eq!(ctx.scene.borrow().part_container_count(), robot.part_count());
    }

    #[test]
    fn undo_of_root_removal_rebuilds_every_descendant() {
        let ctx = ctx();
        let mut robot = Robot::new();
        let mediator = RobotMediator::attach(&ctx, &robot).unwrap();
        let mut history = CommandHistory::default();

        history
            .execute(&mut robot, EditCommand::add_root_part(tree()))
            .unwrap();
        assert_eq!(ctx.stats().constructed(), 3);

        let root_id = robot.root_part().unwrap().id();
        let cmd = EditCommand::remove_part(&robot, root_id).unwrap();
        history
            .execute(&mut robot, cmd)
            .unwrap();
        assert_eq!(ctx.stats().live(), 0);
        assert_eq!(ctx.scene.borrow().part_container_count(), 0);

        history.undo(&mut robot).unwrap();
        assert_eq!(ctx.stats().constructed(), 6);
        assert_eq!(ctx.stats().live(), 3);
        assert_eq!(mediator.borrow().part_mediator_count(), robot.part_count());
        assert_eq!(ctx.scene.borrow().part_container_count(), robot.part_count());
    }

    #[test]
    fn detach_clears_scene_and_unsubscribes() {
        let ctx = ctx();
        let mut robot = Robot::new();
        robot.add_root_part(tree()).unwrap();
        let mediator = RobotMediator::attach(&ctx, &robot).unwrap();

        mediator.borrow_mut().detach();
        assert_eq!(robot.events().observer_count(), 0);
        assert_eq!(ctx.scene.borrow().len(), 1);
        assert_eq!(ctx.stats().live(), 0);
    }
}
