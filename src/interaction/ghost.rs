//! Transluzente Drag-Vorschau eines Assets.
//!
//! Die Repräsentation wird wie bei Bauteilen asynchron geladen. Bis dahin
//! merkt sich die Vorschau nur ihre Soll-Lage.

use crate::scene::{LoadQueue, NodeId, SceneGraph};
use glam::{Quat, Vec3};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
struct GhostState {
    node: Option<NodeId>,
    alive: bool,
    translation: Vec3,
    rotation: Quat,
    visible: bool,
}

/// Handle auf die Vorschau der laufenden Drag-Geste.
#[derive(Debug, Clone)]
pub struct Ghost {
    scene: Rc<RefCell<SceneGraph>>,
    state: Rc<RefCell<GhostState>>,
}

impl Ghost {
    /// Fordert die Repräsentation an; der Knoten entsteht beim Eintreffen.
    pub fn spawn(
        scene: Rc<RefCell<SceneGraph>>,
        loads: &LoadQueue,
        asset_name: &str,
        opacity: f32,
    ) -> Self {
        let state = Rc::new(RefCell::new(GhostState {
            node: None,
            alive: true,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            visible: false,
        }));

        let cb_scene = Rc::clone(&scene);
        let cb_state = Rc::clone(&state);
        let name = asset_name.to_string();
        loads.request(asset_name, move |result| {
            let mut st = cb_state.borrow_mut();
            if !st.alive {
                return;
            }
            let Ok(representation) = result else {
                return;
            };
            let mut scene = cb_scene.borrow_mut();
            let Some(node) =
                scene.instantiate_ghost(SceneGraph::ROOT, &name, &representation, opacity)
            else {
                return;
            };
            scene.set_transform(node, st.translation, st.rotation);
            scene.set_visible(node, st.visible);
            st.node = Some(node);
        });

        Self { scene, state }
    }

    /// Setzt die Vorschau an eine Weltlage und macht sie sichtbar.
    pub fn place(&self, translation: Vec3, rotation: Quat) {
        let mut st = self.state.borrow_mut();
        st.translation = translation;
        st.rotation = rotation;
        st.visible = true;
        if let Some(node) = st.node {
            let mut scene = self.scene.borrow_mut();
            scene.set_transform(node, translation, rotation);
            scene.set_visible(node, true);
        }
    }

    /// Blendet die Vorschau aus (kein Ziel unter dem Zeiger).
    pub fn hide(&self) {
        let mut st = self.state.borrow_mut();
        st.visible = false;
        if let Some(node) = st.node {
            self.scene.borrow_mut().set_visible(node, false);
        }
    }

    /// Szenenknoten der Vorschau (`None` solange nicht geladen).
    pub fn node(&self) -> Option<NodeId> {
        self.state.borrow().node
    }

    /// Sichtbar nach `place`, unsichtbar nach `hide`.
    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    /// Entfernt die Vorschau; ein später eintreffender Ladevorgang wird ignoriert.
    pub fn discard(&self) {
        let mut st = self.state.borrow_mut();
        st.alive = false;
        if let Some(node) = st.node.take() {
            self.scene.borrow_mut().remove_subtree(node);
        }
    }
}
