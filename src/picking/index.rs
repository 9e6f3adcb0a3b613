//! Kumulative Picking-IDs über alle pickbaren Zeichenobjekte.
//!
//! `base_id(n) = base_id(n-1) + element_count(n-1)`, vergeben in Pre-Order.
//! Die Vertices werden beim Aufbau in Weltkoordinaten übernommen, damit
//! Rendern und Trefferpunkt-Rekonstruktion dieselben Daten nutzen.

use super::id::MAX_RAW_ID;
use crate::scene::{Element, NodeId, Primitive, SceneGraph};

/// Ein Zeichenobjekt im Picking-Index.
#[derive(Debug, Clone)]
pub struct PickObject {
    pub node: NodeId,
    pub base_id: u32,
    pub element_count: u32,
    /// Vertices in Weltkoordinaten
    pub primitive: Primitive,
}

impl PickObject {
    fn end_id(&self) -> u32 {
        self.base_id + self.element_count
    }
}

/// Auflösung einer Roh-ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickResolution {
    /// Position im Index (Pre-Order)
    pub object_index: usize,
    pub node: NodeId,
    /// Element-ID innerhalb des Objekts
    pub local_id: u32,
}

/// Flache, sortierte Liste aller pickbaren Objekte.
#[derive(Debug, Clone, Default)]
pub struct PickingIndex {
    objects: Vec<PickObject>,
    total: u32,
}

impl PickingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Baut den Index aus allen sichtbaren, pickbaren Zeichenobjekten.
    pub fn build(scene: &SceneGraph) -> Self {
        let mut index = Self::new();
        for (node, drawable, world) in scene.visible_drawables() {
            if drawable.pickable {
                index.push(node, drawable.primitive.transformed(&world));
            }
        }
        log::debug!(
            "Picking-Index aufgebaut: {} Objekte, {} Elemente",
            index.objects.len(),
            index.total
        );
        index
    }

    /// Hängt ein Objekt mit Weltkoordinaten an. Leere Objekte werden übersprungen.
    ///
    /// Gibt `false` zurück, wenn das Objekt leer ist oder der ID-Raum erschöpft wäre.
    pub fn push(&mut self, node: NodeId, primitive: Primitive) -> bool {
        let Ok(count) = u32::try_from(primitive.element_count()) else {
            return false;
        };
        if count == 0 {
            return false;
        }
        if self.total.saturating_add(count) > MAX_RAW_ID + 1 {
            log::warn!("Picking-ID-Raum erschöpft, Objekt {:?} nicht pickbar", node);
            return false;
        }
        self.objects.push(PickObject {
            node,
            base_id: self.total,
            element_count: count,
            primitive,
        });
        self.total += count;
        true
    }

    pub fn objects(&self) -> &[PickObject] {
        &self.objects
    }

    /// Gesamtzahl vergebener Element-IDs.
    pub fn total_elements(&self) -> u32 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Findet das Objekt mit `base_id <= raw < base_id + element_count`.
    pub fn resolve(&self, raw: u32) -> Option<PickResolution> {
        let object_index = self.objects.partition_point(|o| o.end_id() <= raw);
        let object = self.objects.get(object_index)?;
        (object.base_id <= raw).then(|| PickResolution {
            object_index,
            node: object.node,
            local_id: raw - object.base_id,
        })
    }

    /// Element (in Weltkoordinaten) zu einer Auflösung.
    pub fn element(&self, resolution: &PickResolution) -> Option<Element> {
        self.objects
            .get(resolution.object_index)?
            .primitive
            .element(resolution.local_id as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Drawable, SceneNodeKind};
    use glam::Vec3;

    fn triangles(count: usize, x: f32) -> Primitive {
        Primitive::Triangles(
            (0..count)
                .flat_map(|i| {
                    let z = i as f32;
                    [Vec3::new(x, 0.0, z), Vec3::new(x + 1.0, 0.0, z), Vec3::new(x, 1.0, z)]
                })
                .collect(),
        )
    }

    fn drawable_kind(primitive: Primitive) -> SceneNodeKind {
        SceneNodeKind::Drawable(Drawable::new(primitive, [1.0; 4]))
    }

    #[test]
    fn resolves_id_to_second_object() {
        let mut scene = SceneGraph::new();
        let a = scene.add_node(SceneGraph::ROOT, drawable_kind(triangles(10, 0.0))).unwrap();
        let b = scene.add_node(SceneGraph::ROOT, drawable_kind(triangles(5, 5.0))).unwrap();

        let index = PickingIndex::build(&scene);
        let bases: Vec<u32> = index.objects().iter().map(|o| o.base_id).collect();
        assert_eq!(bases, vec![0, 10]);

        let hit = index.resolve(12).expect("ID liegt im zweiten Objekt");
        assert_eq!(hit.node, b);
        assert_eq!(hit.object_index, 1);
        assert_eq!(hit.local_id, 2);

        assert_eq!(index.resolve(0).map(|r| r.node), Some(a));
        assert_eq!(index.resolve(9).map(|r| r.local_id), Some(9));
        assert!(index.resolve(15).is_none());
    }

    #[test]
    fn skips_empty_and_unpickable_objects() {
        let mut scene = SceneGraph::new();
        scene.add_node(SceneGraph::ROOT, drawable_kind(Primitive::Points(vec![]))).unwrap();
        let mut ghost = Drawable::new(triangles(3, 0.0), [1.0; 4]);
        ghost.pickable = false;
        scene.add_node(SceneGraph::ROOT, SceneNodeKind::Drawable(ghost)).unwrap();
        let c = scene
            .add_node(SceneGraph::ROOT, drawable_kind(Primitive::Points(vec![Vec3::ONE])))
            .unwrap();

        let index = PickingIndex::build(&scene);
        assert_eq!(index.objects().len(), 1);
        assert_eq!(index.resolve(0).map(|r| r.node), Some(c));
    }

    #[test]
    fn element_is_in_world_space() {
        let mut scene = SceneGraph::new();
        let group = scene
            .add_node_with_transform(
                SceneGraph::ROOT,
                SceneNodeKind::Group { name: None },
                Vec3::new(0.0, 2.0, 0.0),
                glam::Quat::IDENTITY,
            )
            .unwrap();
        scene.add_node(group, drawable_kind(Primitive::Points(vec![Vec3::X]))).unwrap();

        let index = PickingIndex::build(&scene);
        let resolution = index.resolve(0).unwrap();
        assert_eq!(
            index.element(&resolution),
            Some(Element::Point(Vec3::new(1.0, 2.0, 0.0)))
        );
    }
}
