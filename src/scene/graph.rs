//! Unabhängiger Szenengraph: Arena aus typisierten Knoten.
//!
//! Jeder Knoten trägt eine geschlossene [`SceneNodeKind`]-Variante, die bei
//! der Konstruktion festgelegt wird. Klassifikation (Bauteil-Container,
//! Slot-Container, Geometrie) erfolgt per exhaustivem `match`.

use super::representation::{Representation, RepresentationNode};
use crate::core::PartId;
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stabile ID eines Szenenknotens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Nicht-indizierte Vertex-Liste eines Zeichenobjekts.
///
/// Dreiecke: je 3 Vertices, Linien: je 2 Vertices, Punkte: je 1 Vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "vertices", rename_all = "camelCase")]
pub enum Primitive {
    Triangles(Vec<Vec3>),
    Lines(Vec<Vec3>),
    Points(Vec<Vec3>),
}

/// Einzelnes Primitiv-Element mit konkreten Vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element {
    Triangle([Vec3; 3]),
    Segment([Vec3; 2]),
    Point(Vec3),
}

impl Primitive {
    fn vertices(&self) -> &[Vec3] {
        match self {
            Primitive::Triangles(v) | Primitive::Lines(v) | Primitive::Points(v) => v,
        }
    }

    fn stride(&self) -> usize {
        match self {
            Primitive::Triangles(_) => 3,
            Primitive::Lines(_) => 2,
            Primitive::Points(_) => 1,
        }
    }

    /// Anzahl vollständiger Elemente (überzählige Vertices werden ignoriert).
    pub fn element_count(&self) -> usize {
        self.vertices().len() / self.stride()
    }

    /// Element mit lokaler ID `local`.
    pub fn element(&self, local: usize) -> Option<Element> {
        let stride = self.stride();
        let v = self.vertices().get(local * stride..(local + 1) * stride)?;
        Some(match self {
            Primitive::Triangles(_) => Element::Triangle([v[0], v[1], v[2]]),
            Primitive::Lines(_) => Element::Segment([v[0], v[1]]),
            Primitive::Points(_) => Element::Point(v[0]),
        })
    }

    /// Kopie mit transformierten Vertices.
    pub fn transformed(&self, matrix: &Mat4) -> Primitive {
        let map = |v: &Vec<Vec3>| v.iter().map(|p| matrix.transform_point3(*p)).collect();
        match self {
            Primitive::Triangles(v) => Primitive::Triangles(map(v)),
            Primitive::Lines(v) => Primitive::Lines(map(v)),
            Primitive::Points(v) => Primitive::Points(map(v)),
        }
    }
}

/// Zeichenbares Objekt mit Farbe.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub primitive: Primitive,
    /// Aktuelle Farbe (RGBA)
    pub color: [f32; 4],
    /// Farbe aus der Repräsentation (für Reset auf Asset-Standard)
    pub base_color: [f32; 4],
    /// Nimmt am Picking teil
    pub pickable: bool,
}

impl Drawable {
    pub fn new(primitive: Primitive, color: [f32; 4]) -> Self {
        Self {
            primitive,
            color,
            base_color: color,
            pickable: true,
        }
    }
}

/// Geschlossene Menge an Knotenarten.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNodeKind {
    /// Wurzel der Szene
    Root,
    /// Container des Roboters
    RobotContainer,
    /// Container eines Bauteils (Ziel für Hit-Tests nach oben)
    PartContainer { part_id: PartId },
    /// Andockpunkt eines Bauteils
    SlotContainer { slot_name: String, slot_type: String },
    /// Geladene Repräsentation eines Assets
    Representation { asset_name: String },
    /// Reine Gruppierung innerhalb einer Repräsentation
    Group { name: Option<String> },
    /// Zeichenbares Objekt
    Drawable(Drawable),
    /// Transluzente Drag-Vorschau
    Ghost { asset_name: String },
}

/// Knoten des Szenengraphen.
#[derive(Debug, Clone)]
pub struct SceneNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub translation: Vec3,
    pub rotation: Quat,
    pub visible: bool,
    pub kind: SceneNodeKind,
}

impl SceneNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Lokale Transformationsmatrix.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }
}

/// Stil beim Instanziieren einer Repräsentation.
#[derive(Debug, Clone, Copy)]
struct InstanceStyle {
    default_color: [f32; 4],
    alpha: Option<f32>,
    pickable: bool,
}

/// Der Szenengraph.
///
/// `version` zählt Struktur- und Transformationsänderungen; das Picking nutzt
/// sie als Dirty-Flag.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    next_id: u32,
    version: u64,
    highlighted: Option<NodeId>,
    highlight_color: [f32; 4],
    default_color: [f32; 4],
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Wurzelknoten, existiert immer.
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            Self::ROOT,
            SceneNode {
                parent: None,
                children: Vec::new(),
                translation: Vec3::ZERO,
                rotation: Quat::IDENTITY,
                visible: true,
                kind: SceneNodeKind::Root,
            },
        );
        Self {
            nodes,
            next_id: 1,
            version: 0,
            highlighted: None,
            highlight_color: crate::shared::HIGHLIGHT_COLOR,
            default_color: crate::shared::DEFAULT_PART_COLOR,
        }
    }

    /// Setzt die Farbe für Geometrie ohne eigene Farbangabe.
    pub fn set_default_color(&mut self, color: [f32; 4]) {
        self.default_color = color;
    }

    /// Änderungszähler für Struktur und Transformationen.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Anzahl der Knoten (inklusive Wurzel).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Hängt einen neuen Knoten an `parent`. `None` wenn `parent` nicht existiert.
    pub fn add_node(&mut self, parent: NodeId, kind: SceneNodeKind) -> Option<NodeId> {
        self.add_node_with_transform(parent, kind, Vec3::ZERO, Quat::IDENTITY)
    }

    /// Hängt einen neuen Knoten mit lokaler Transformation an `parent`.
    pub fn add_node_with_transform(
        &mut self,
        parent: NodeId,
        kind: SceneNodeKind,
        translation: Vec3,
        rotation: Quat,
    ) -> Option<NodeId> {
        let id = NodeId(self.next_id);
        self.nodes.get_mut(&parent)?.children.push(id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            SceneNode {
                parent: Some(parent),
                children: Vec::new(),
                translation,
                rotation,
                visible: true,
                kind,
            },
        );
        self.version += 1;
        Some(id)
    }

    /// Entfernt `id` samt Nachfahren. Gibt die Anzahl entfernter Knoten zurück.
    ///
    /// Die Wurzel kann nicht entfernt werden.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        if id == Self::ROOT {
            return 0;
        }
        let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) else {
            return 0;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != id);
        }

        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
                removed += 1;
                if self.highlighted == Some(current) {
                    self.highlighted = None;
                }
            }
        }
        self.version += 1;
        removed
    }

    /// Setzt die lokale Transformation eines Knotens.
    pub fn set_transform(&mut self, id: NodeId, translation: Vec3, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.translation = translation;
            node.rotation = rotation;
            self.version += 1;
        }
    }

    pub fn set_translation(&mut self, id: NodeId, translation: Vec3) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.translation = translation;
            self.version += 1;
        }
    }

    pub fn set_rotation(&mut self, id: NodeId, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.rotation = rotation;
            self.version += 1;
        }
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if node.visible != visible {
                node.visible = visible;
                self.version += 1;
            }
        }
    }

    /// Welt-Transformation (Produkt aller lokalen Matrizen bis zur Wurzel).
    pub fn world_transform(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.nodes.get(&c)) {
            matrix = node.local_matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// Nächster Vorfahre (inklusive `id`) vom Typ Bauteil-Container.
    pub fn ancestor_part_container(&self, id: NodeId) -> Option<(NodeId, PartId)> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(&node_id)?;
            if let SceneNodeKind::PartContainer { part_id } = node.kind {
                return Some((node_id, part_id));
            }
            current = node.parent;
        }
        None
    }

    /// Sucht den Container eines Bauteils.
    pub fn find_part_container(&self, part_id: PartId) -> Option<NodeId> {
        self.nodes.iter().find_map(|(id, node)| match node.kind {
            SceneNodeKind::PartContainer { part_id: p } if p == part_id => Some(*id),
            _ => None,
        })
    }

    /// Direkter Slot-Container `slot_name` unterhalb eines Bauteil-Containers.
    pub fn slot_container(&self, part_container: NodeId, slot_name: &str) -> Option<NodeId> {
        self.children(part_container)
            .iter()
            .copied()
            .find(|child| {
                matches!(
                    self.nodes.get(child).map(|n| &n.kind),
                    Some(SceneNodeKind::SlotContainer { slot_name: name, .. }) if name == slot_name
                )
            })
    }

    /// Alle Slot-Container: (Knoten, Slot-Name, Slot-Typ).
    pub fn slot_containers(&self) -> impl Iterator<Item = (NodeId, &str, &str)> {
        self.nodes.iter().filter_map(|(id, node)| match &node.kind {
            SceneNodeKind::SlotContainer {
                slot_name,
                slot_type,
            } => Some((*id, slot_name.as_str(), slot_type.as_str())),
            _ => None,
        })
    }

    /// Gibt `true` zurück, wenn unter dem Slot-Container ein Bauteil hängt.
    pub fn is_slot_occupied(&self, slot_node: NodeId) -> bool {
        self.children(slot_node).iter().any(|child| {
            matches!(
                self.nodes.get(child).map(|n| &n.kind),
                Some(SceneNodeKind::PartContainer { .. })
            )
        })
    }

    /// Anzahl der Bauteil-Container in der Szene.
    pub fn part_container_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| matches!(n.kind, SceneNodeKind::PartContainer { .. }))
            .count()
    }

    /// Instanziiert eine geladene Repräsentation unter `parent`.
    pub fn instantiate(
        &mut self,
        parent: NodeId,
        asset_name: &str,
        representation: &Representation,
    ) -> Option<NodeId> {
        let style = InstanceStyle {
            default_color: self.default_color,
            alpha: None,
            pickable: true,
        };
        let root = self.add_node(
            parent,
            SceneNodeKind::Representation {
                asset_name: asset_name.to_string(),
            },
        )?;
        self.instantiate_nodes(root, &representation.nodes, style);
        Some(root)
    }

    /// Instanziiert eine transluzente, nicht pickbare Vorschau unter `parent`.
    pub fn instantiate_ghost(
        &mut self,
        parent: NodeId,
        asset_name: &str,
        representation: &Representation,
        opacity: f32,
    ) -> Option<NodeId> {
        let style = InstanceStyle {
            default_color: self.default_color,
            alpha: Some(opacity),
            pickable: false,
        };
        let root = self.add_node(
            parent,
            SceneNodeKind::Ghost {
                asset_name: asset_name.to_string(),
            },
        )?;
        self.instantiate_nodes(root, &representation.nodes, style);
        Some(root)
    }

    fn instantiate_nodes(
        &mut self,
        parent: NodeId,
        nodes: &[RepresentationNode],
        style: InstanceStyle,
    ) {
        for rep in nodes {
            let kind = match &rep.primitive {
                Some(primitive) => {
                    let mut color = rep.color.unwrap_or(style.default_color);
                    if let Some(alpha) = style.alpha {
                        color[3] = alpha;
                    }
                    let mut drawable = Drawable::new(primitive.clone(), color);
                    drawable.pickable = style.pickable;
                    SceneNodeKind::Drawable(drawable)
                }
                None => SceneNodeKind::Group {
                    name: rep.name.clone(),
                },
            };
            if let Some(id) =
                self.add_node_with_transform(parent, kind, rep.translation, rep.rotation)
            {
                self.instantiate_nodes(id, &rep.children, style);
            }
        }
    }

    /// Färbt alle Zeichenobjekte unterhalb von `id` um (`None` = Originalfarbe).
    pub fn recolor(&mut self, id: NodeId, color: Option<[f32; 4]>) -> usize {
        let mut stack = vec![id];
        let mut count = 0;
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&current) else {
                continue;
            };
            if let SceneNodeKind::Drawable(drawable) = &mut node.kind {
                let alpha = drawable.color[3];
                drawable.color = color.unwrap_or(drawable.base_color);
                drawable.color[3] = alpha;
                count += 1;
            }
            stack.extend(node.children.iter().copied());
        }
        count
    }

    /// Hebt genau einen Knoten hervor (oder keinen).
    pub fn set_highlight(&mut self, id: Option<NodeId>) {
        self.highlighted = id.filter(|id| self.nodes.contains_key(id));
    }

    pub fn highlighted(&self) -> Option<NodeId> {
        self.highlighted
    }

    /// Farbe, mit der der Renderer den hervorgehobenen Teilbaum zeichnet.
    pub fn highlight_color(&self) -> [f32; 4] {
        self.highlight_color
    }

    pub fn set_highlight_color(&mut self, color: [f32; 4]) {
        self.highlight_color = color;
    }

    /// Sichtbare Zeichenobjekte in Pre-Order mit Welt-Transformation.
    ///
    /// Unsichtbare Knoten blenden ihren gesamten Teilbaum aus. Die Reihenfolge
    /// ist deterministisch (Kinder in Einfügereihenfolge).
    pub fn visible_drawables(&self) -> Vec<(NodeId, &Drawable, Mat4)> {
        let mut out = Vec::new();
        self.collect_drawables(Self::ROOT, Mat4::IDENTITY, &mut out);
        out
    }

    fn collect_drawables<'a>(
        &'a self,
        id: NodeId,
        parent_matrix: Mat4,
        out: &mut Vec<(NodeId, &'a Drawable, Mat4)>,
    ) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if !node.visible {
            return;
        }
        let matrix = parent_matrix * node.local_matrix();
        if let SceneNodeKind::Drawable(drawable) = &node.kind {
            out.push((id, drawable, matrix));
        }
        for child in &node.children {
            self.collect_drawables(*child, matrix, out);
        }
    }
}
