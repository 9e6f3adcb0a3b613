//! Bildschirmposition → Bauteil-Container über den ID-Puffer.

use super::id::decode_pick_color;
use super::index::PickingIndex;
use super::target::{PickTarget, SoftwarePickTarget};
use crate::core::PartId;
use crate::interaction::{Camera3D, Ray};
use crate::scene::{Element, NodeId, SceneGraph};
use glam::{Mat4, Vec2, Vec3};

/// Treffer eines Picks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Logisches Ziel
    pub part_id: PartId,
    /// Bauteil-Container des Ziels
    pub container: NodeId,
    /// Getroffenes Zeichenobjekt
    pub node: NodeId,
    /// Element-ID innerhalb des Zeichenobjekts
    pub local_id: u32,
    /// Rekonstruierter Trefferpunkt in Weltkoordinaten
    pub point: Vec3,
}

/// Zustand, mit dem der ID-Puffer zuletzt gerendert wurde.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RenderKey {
    scene_version: u64,
    viewport: (u32, u32),
    view_proj: Mat4,
}

/// Picker mit gecachtem ID-Puffer.
///
/// Gerendert wird nur, wenn sich Szene, Viewport oder Kamera seit dem
/// letzten Pick geändert haben.
pub struct Picker<T: PickTarget = SoftwarePickTarget> {
    target: T,
    index: PickingIndex,
    rendered: Option<RenderKey>,
    render_count: usize,
}

impl Default for Picker<SoftwarePickTarget> {
    fn default() -> Self {
        Self::new(SoftwarePickTarget::default())
    }
}

impl<T: PickTarget> Picker<T> {
    /// Picker über dem gegebenen Renderziel; gerendert wird erst beim ersten Pick.
    pub fn new(target: T) -> Self {
        Self {
            target,
            index: PickingIndex::new(),
            rendered: None,
            render_count: 0,
        }
    }

    /// Erzwingt ein Neu-Rendern beim nächsten Pick.
    pub fn mark_dirty(&mut self) {
        self.rendered = None;
    }

    /// Anzahl der bisherigen Picking-Renderdurchläufe.
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    /// Aktueller Picking-Index (Stand des letzten Renderns).
    pub fn index(&self) -> &PickingIndex {
        &self.index
    }

    /// Sucht das Bauteil unter `screen_pos`.
    ///
    /// `None` bei Hintergrund, bei einer ID außerhalb aller Objekte oder wenn
    /// das getroffene Objekt zu keinem Bauteil gehört.
    pub fn pick(
        &mut self,
        scene: &SceneGraph,
        camera: &Camera3D,
        viewport: Vec2,
        screen_pos: Vec2,
    ) -> Option<PickHit> {
        if viewport.x < 1.0 || viewport.y < 1.0 {
            return None;
        }
        if screen_pos.x < 0.0
            || screen_pos.y < 0.0
            || screen_pos.x >= viewport.x
            || screen_pos.y >= viewport.y
        {
            return None;
        }

        self.ensure_rendered(scene, camera, viewport);

        let pixel = self
            .target
            .read_pixel(screen_pos.x as u32, screen_pos.y as u32);
        let raw = decode_pick_color(pixel)?;
        let Some(resolution) = self.index.resolve(raw) else {
            log::debug!("Picking-ID {} liegt in keinem Objekt", raw);
            return None;
        };
        let element = self.index.element(&resolution)?;
        let (container, part_id) = scene.ancestor_part_container(resolution.node)?;

        let point = match camera.screen_to_ray(screen_pos, viewport) {
            Some(ray) => intersection_point(&ray, element),
            None => element_center(element),
        };

        Some(PickHit {
            part_id,
            container,
            node: resolution.node,
            local_id: resolution.local_id,
            point,
        })
    }

    fn ensure_rendered(&mut self, scene: &SceneGraph, camera: &Camera3D, viewport: Vec2) {
        let key = RenderKey {
            scene_version: scene.version(),
            viewport: (viewport.x.ceil() as u32, viewport.y.ceil() as u32),
            view_proj: camera.view_proj(viewport),
        };
        if self.rendered == Some(key) {
            return;
        }

        self.index = PickingIndex::build(scene);
        self.target.resize(key.viewport.0, key.viewport.1);
        self.target.render(&self.index, key.view_proj);
        self.rendered = Some(key);
        self.render_count += 1;
    }
}

/// Exakter Trefferpunkt auf dem getroffenen Element.
fn intersection_point(ray: &Ray, element: Element) -> Vec3 {
    match element {
        Element::Triangle([a, b, c]) => {
            let normal = (b - a).cross(c - a);
            if normal.length_squared() < 1e-12 {
                return element_center(element);
            }
            ray.intersect_plane(a, normal.normalize())
                .map(|t| ray.point_at(t))
                .unwrap_or_else(|| element_center(element))
        }
        Element::Segment([a, b]) => ray.closest_point_on_segment(a, b),
        Element::Point(p) => p,
    }
}

fn element_center(element: Element) -> Vec3 {
    match element {
        Element::Triangle([a, b, c]) => (a + b + c) / 3.0,
        Element::Segment([a, b]) => (a + b) * 0.5,
        Element::Point(p) => p,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Asset, Part};
    use crate::scene::{Primitive, Representation, RepresentationNode, SceneNodeKind};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn camera() -> Camera3D {
        Camera3D::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO)
    }

    const VIEWPORT: Vec2 = Vec2::new(64.0, 64.0);

    /// Quadrat aus zwei Dreiecken in der Ebene z = `z`.
    fn quad(z: f32, half: f32) -> Representation {
        let p = |x: f32, y: f32| Vec3::new(x * half, y * half, z);
        Representation::single(Primitive::Triangles(vec![
            p(-1.0, -1.0),
            p(1.0, -1.0),
            p(1.0, 1.0),
            p(-1.0, -1.0),
            p(1.0, 1.0),
            p(-1.0, 1.0),
        ]))
    }

    fn part_with(scene: &mut SceneGraph, rep: &Representation) -> PartId {
        let id = Part::new(Arc::new(Asset::root("bot/plate"))).id();
        let container = scene
            .add_node(SceneGraph::ROOT, SceneNodeKind::PartContainer { part_id: id })
            .unwrap();
        scene.instantiate(container, "bot/plate", rep).unwrap();
        id
    }

    #[test]
    fn picks_part_at_center_with_exact_point() {
        let mut scene = SceneGraph::new();
        let part_id = part_with(&mut scene, &quad(0.0, 1.0));
        let mut picker = Picker::default();

        let hit = picker
            .pick(&scene, &camera(), VIEWPORT, Vec2::new(32.0, 32.0))
            .expect("Quadrat liegt in der Bildmitte");
        assert_eq!(hit.part_id, part_id);
        assert_relative_eq!(hit.point.z, 0.0, epsilon = 1e-4);
        assert_relative_eq!(hit.point.x, 0.0, epsilon = 0.05);
    }

    #[test]
    fn nearer_part_wins() {
        let mut scene = SceneGraph::new();
        part_with(&mut scene, &quad(-1.0, 1.0));
        let front = part_with(&mut scene, &quad(1.0, 0.5));
        let mut picker = Picker::default();

        let hit = picker
            .pick(&scene, &camera(), VIEWPORT, Vec2::new(32.0, 32.0))
            .unwrap();
        assert_eq!(hit.part_id, front);
        assert_relative_eq!(hit.point.z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn empty_space_and_foreign_geometry_miss() {
        let mut scene = SceneGraph::new();
        part_with(&mut scene, &quad(0.0, 0.2));
        // Geometrie ohne Bauteil-Container (z.B. Hilfsgitter)
        let rep = Representation {
            nodes: vec![RepresentationNode::drawable(Primitive::Triangles(vec![
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(2.5, 1.0, 0.0),
                Vec3::new(1.0, 2.5, 0.0),
            ]))],
        };
        scene.instantiate(SceneGraph::ROOT, "grid", &rep).unwrap();

        let mut picker = Picker::default();
        assert!(picker
            .pick(&scene, &camera(), VIEWPORT, Vec2::new(2.0, 62.0))
            .is_none());
        assert!(picker
            .pick(&scene, &camera(), VIEWPORT, Vec2::new(50.0, 10.0))
            .is_none());
        assert!(picker
            .pick(&scene, &camera(), VIEWPORT, Vec2::new(-1.0, 10.0))
            .is_none());
    }

    #[test]
    fn ground_plate_reaching_behind_camera_is_pickable() {
        let mut scene = SceneGraph::new();
        let plate = Representation::single(Primitive::Triangles(vec![
            Vec3::new(-100.0, 0.0, -100.0),
            Vec3::new(100.0, 0.0, -100.0),
            Vec3::new(0.0, 0.0, 100.0),
        ]));
        let part_id = part_with(&mut scene, &plate);
        let camera = Camera3D::new(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO);
        let center = camera
            .world_to_screen(Vec3::ZERO, VIEWPORT)
            .expect("Ursprung vor der Kamera");
        let mut picker = Picker::default();

        let hit = picker
            .pick(&scene, &camera, VIEWPORT, center)
            .expect("sichtbare Platte unter dem Cursor");
        assert_eq!(hit.part_id, part_id);
        assert_relative_eq!(hit.point.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn lines_near_the_eye_do_not_break_picking() {
        let mut scene = SceneGraph::new();
        let wire = Representation::single(Primitive::Lines(vec![
            Vec3::new(-50.0, 0.0, 4.999996),
            Vec3::new(50.0, 0.0, 4.999996),
        ]));
        part_with(&mut scene, &wire);
        let target = part_with(&mut scene, &quad(0.0, 1.0));
        let mut picker = Picker::default();

        let hit = picker
            .pick(&scene, &camera(), VIEWPORT, Vec2::new(32.0, 32.0))
            .expect("Quadrat hinter dem Draht");
        assert_eq!(hit.part_id, target);
    }

    #[test]
    fn renders_only_when_dirty() {
        let mut scene = SceneGraph::new();
        part_with(&mut scene, &quad(0.0, 1.0));
        let mut picker = Picker::default();
        let center = Vec2::new(32.0, 32.0);

        picker.pick(&scene, &camera(), VIEWPORT, center);
        picker.pick(&scene, &camera(), VIEWPORT, Vec2::new(30.0, 30.0));
        assert_eq!(picker.render_count(), 1);

        part_with(&mut scene, &quad(0.5, 0.1));
        picker.pick(&scene, &camera(), VIEWPORT, center);
        assert_eq!(picker.render_count(), 2);

        picker.pick(&scene, &camera(), Vec2::new(80.0, 64.0), center);
        assert_eq!(picker.render_count(), 3);

        picker.mark_dirty();
        picker.pick(&scene, &camera(), Vec2::new(80.0, 64.0), center);
        assert_eq!(picker.render_count(), 4);
    }
}
