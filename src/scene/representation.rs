//! Renderbare Repräsentation eines Assets (Ergebnis des Loaders).
//!
//! JSON-Form:
//! ```json
//! { "nodes": [ { "name": "hull", "translation": [0, 1, 0],
//!                "primitive": { "kind": "triangles", "vertices": [[0,0,0], ...] },
//!                "color": [0.8, 0.2, 0.2, 1.0], "children": [] } ] }
//! ```

use super::graph::Primitive;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Baum aus Gruppen und Zeichenobjekten in Asset-Koordinaten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Representation {
    #[serde(default)]
    pub nodes: Vec<RepresentationNode>,
}

/// Knoten einer Repräsentation. Ohne `primitive` eine reine Gruppe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepresentationNode {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub translation: Vec3,
    #[serde(default = "identity_rotation")]
    pub rotation: Quat,
    #[serde(default)]
    pub primitive: Option<Primitive>,
    /// RGBA; ohne Angabe gilt die Standardfarbe der Szene
    #[serde(default)]
    pub color: Option<[f32; 4]>,
    #[serde(default)]
    pub children: Vec<RepresentationNode>,
}

fn identity_rotation() -> Quat {
    Quat::IDENTITY
}

impl RepresentationNode {
    /// Zeichenobjekt ohne Transformation.
    pub fn drawable(primitive: Primitive) -> Self {
        Self {
            name: None,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            primitive: Some(primitive),
            color: None,
            children: Vec::new(),
        }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = Some(color);
        self
    }
}

impl Representation {
    /// Repräsentation aus einem einzigen Zeichenobjekt.
    pub fn single(primitive: Primitive) -> Self {
        Self {
            nodes: vec![RepresentationNode::drawable(primitive)],
        }
    }

    /// Achsenparalleler Würfel mit Kantenlänge `size` um den Ursprung (12 Dreiecke).
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let c = |x: f32, y: f32, z: f32| Vec3::new(x * h, y * h, z * h);
        let corners = [
            c(-1.0, -1.0, -1.0),
            c(1.0, -1.0, -1.0),
            c(1.0, 1.0, -1.0),
            c(-1.0, 1.0, -1.0),
            c(-1.0, -1.0, 1.0),
            c(1.0, -1.0, 1.0),
            c(1.0, 1.0, 1.0),
            c(-1.0, 1.0, 1.0),
        ];
        const FACES: [[usize; 4]; 6] = [
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [2, 3, 7, 6],
            [1, 2, 6, 5],
            [0, 4, 7, 3],
        ];
        let vertices = FACES
            .iter()
            .flat_map(|[a, b, c, d]| {
                [
                    corners[*a], corners[*b], corners[*c], corners[*a], corners[*c], corners[*d],
                ]
            })
            .collect();
        Self::single(Primitive::Triangles(vertices))
    }

    /// Gesamtzahl der Primitiv-Elemente.
    pub fn element_count(&self) -> usize {
        fn count(nodes: &[RepresentationNode]) -> usize {
            nodes
                .iter()
                .map(|n| {
                    n.primitive.as_ref().map_or(0, Primitive::element_count) + count(&n.children)
                })
                .sum()
        }
        count(&self.nodes)
    }
}
