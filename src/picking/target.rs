//! Offscreen-Ziel für den Picking-Pass.
//!
//! [`PickTarget`] ist die Schnittstelle zum Renderer: Größe setzen, den
//! Picking-Index mit ID-Farben rendern, ein Pixel zurücklesen.
//! [`SoftwarePickTarget`] ist ein CPU-Rasterizer mit Tiefentest.

use super::id::encode_pick_id;
use super::index::PickingIndex;
use crate::scene::Element;
use glam::{Mat4, Vec3, Vec4, Vec4Swizzles};

/// Renderziel für ID-Farben.
pub trait PickTarget {
    /// Passt die Größe an den Viewport an (verwirft den Inhalt).
    fn resize(&mut self, width: u32, height: u32);

    fn size(&self) -> (u32, u32);

    /// Rendert alle Objekte des Index mit `encode(base_id + local_id)` als Farbe.
    fn render(&mut self, index: &PickingIndex, view_proj: Mat4);

    /// Liest ein Pixel (RGB). Außerhalb des Ziels: Hintergrund.
    fn read_pixel(&self, x: u32, y: u32) -> [u8; 3];
}

/// Projizierter Vertex: Pixelkoordinaten plus Tiefe (0 = near, 1 = far).
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    z: f32,
}

/// Abstände eines Clip-Space-Punkts zu den sechs Ebenen des Sichtvolumens
/// (`>= 0` heißt innen). Tiefe läuft wie bei `perspective_rh` von 0 bis `w`.
fn plane_distances(v: Vec4) -> [f32; 6] {
    [v.w + v.x, v.w - v.x, v.w + v.y, v.w - v.y, v.z, v.w - v.z]
}

/// Liang-Barsky-Clipping einer Strecke gegen das Sichtvolumen.
fn clip_segment(a: Vec4, b: Vec4) -> Option<(Vec4, Vec4)> {
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (da, db) in plane_distances(a).into_iter().zip(plane_distances(b)) {
        if da < 0.0 && db < 0.0 {
            return None;
        }
        if da < 0.0 {
            t0 = t0.max(da / (da - db));
        } else if db < 0.0 {
            t1 = t1.min(da / (da - db));
        }
    }
    if t0 > t1 {
        return None;
    }
    Some((a.lerp(b, t0), a.lerp(b, t1)))
}

/// Sutherland-Hodgman gegen die Near-Ebene (`z >= 0`).
///
/// Ein Dreieck ergibt höchstens ein Viereck; die übrigen Ebenen erledigt
/// der Rasterizer über Bounding-Box und Tiefentest.
fn clip_triangle_near(input: [Vec4; 3]) -> ([Vec4; 4], usize) {
    let mut out = [Vec4::ZERO; 4];
    let mut len = 0;
    for i in 0..3 {
        let current = input[i];
        let next = input[(i + 1) % 3];
        let (dc, dn) = (current.z, next.z);
        if dc >= 0.0 {
            out[len] = current;
            len += 1;
        }
        if (dc >= 0.0) != (dn >= 0.0) {
            out[len] = current.lerp(next, dc / (dc - dn));
            len += 1;
        }
    }
    (out, len)
}

/// ID-Puffer mit Tiefenpuffer im Hauptspeicher.
#[derive(Debug, Clone, Default)]
pub struct SoftwarePickTarget {
    width: u32,
    height: u32,
    ids: Vec<[u8; 3]>,
    depth: Vec<f32>,
}

impl SoftwarePickTarget {
    pub fn new(width: u32, height: u32) -> Self {
        let mut target = Self::default();
        target.resize(width, height);
        target
    }

    fn clear(&mut self) {
        self.ids.fill([0, 0, 0]);
        self.depth.fill(f32::MAX);
    }

    /// Perspektivische Division eines bereits geclippten Punkts.
    fn to_screen(&self, clip: Vec4) -> Option<ScreenVertex> {
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        Some(ScreenVertex {
            x: (ndc.x + 1.0) * 0.5 * self.width as f32,
            y: (1.0 - ndc.y) * 0.5 * self.height as f32,
            z: ndc.z,
        })
    }

    fn set_pixel_with_depth(&mut self, x: i32, y: i32, z: f32, id: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        if !(0.0..=1.0).contains(&z) {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        if z < self.depth[idx] {
            self.depth[idx] = z;
            self.ids[idx] = id;
        }
    }

    /// Rasterisiert ein Dreieck über Kantenfunktionen (Pixelmitten, beidseitig).
    fn rasterize_triangle(&mut self, v: [ScreenVertex; 3], id: [u8; 3]) {
        let [v1, v2, v3] = v;
        let area = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);
        if area.abs() < 1e-5 {
            return;
        }
        let inv_area = 1.0 / area;

        let min_x = v1.x.min(v2.x).min(v3.x).floor().max(0.0) as i32;
        let max_x = v1.x.max(v2.x).max(v3.x).ceil().min(self.width as f32) as i32;
        let min_y = v1.y.min(v2.y).min(v3.y).floor().max(0.0) as i32;
        let max_y = v1.y.max(v2.y).max(v3.y).ceil().min(self.height as f32) as i32;

        for y in min_y..max_y {
            let py = y as f32 + 0.5;
            for x in min_x..max_x {
                let px = x as f32 + 0.5;
                let bc_x = ((v2.y - v3.y) * (px - v3.x) + (v3.x - v2.x) * (py - v3.y)) * inv_area;
                let bc_y = ((v3.y - v1.y) * (px - v3.x) + (v1.x - v3.x) * (py - v3.y)) * inv_area;
                let bc_z = 1.0 - bc_x - bc_y;

                const ERR: f32 = -0.0001;
                if bc_x >= ERR && bc_y >= ERR && bc_z >= ERR {
                    let z = bc_x * v1.z + bc_y * v2.z + bc_z * v3.z;
                    self.set_pixel_with_depth(x, y, z, id);
                }
            }
        }
    }

    /// Bresenham-Linie mit interpolierter Tiefe.
    ///
    /// Die Endpunkte liegen nach dem Clipping im Viewport, die Schrittzahl ist
    /// damit durch dessen Größe begrenzt.
    fn rasterize_line(&mut self, a: ScreenVertex, b: ScreenVertex, id: [u8; 3]) {
        let max_x = self.width.saturating_sub(1) as f32;
        let max_y = self.height.saturating_sub(1) as f32;
        let pixel = |v: ScreenVertex| {
            (
                v.x.floor().clamp(0.0, max_x) as i32,
                v.y.floor().clamp(0.0, max_y) as i32,
            )
        };
        let (x0, y0) = pixel(a);
        let (x1, y1) = pixel(b);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        let total_steps = dx.max(-dy).max(1) as f32;
        let mut step = 0.0f32;

        loop {
            let t = (step / total_steps).min(1.0);
            self.set_pixel_with_depth(x, y, a.z + t * (b.z - a.z), id);

            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
            step += 1.0;
        }
    }

    fn rasterize_element(&mut self, element: Element, view_proj: &Mat4, id: [u8; 3]) {
        let clip = |p: Vec3| *view_proj * p.extend(1.0);
        match element {
            Element::Triangle(points) => {
                let (polygon, len) = clip_triangle_near(points.map(clip));
                for k in 1..len.saturating_sub(1) {
                    let (Some(a), Some(b), Some(c)) = (
                        self.to_screen(polygon[0]),
                        self.to_screen(polygon[k]),
                        self.to_screen(polygon[k + 1]),
                    ) else {
                        continue;
                    };
                    self.rasterize_triangle([a, b, c], id);
                }
            }
            Element::Segment([start, end]) => {
                let Some((a, b)) = clip_segment(clip(start), clip(end)) else {
                    return;
                };
                if let (Some(a), Some(b)) = (self.to_screen(a), self.to_screen(b)) {
                    self.rasterize_line(a, b, id);
                }
            }
            Element::Point(point) => {
                let p = clip(point);
                if plane_distances(p).iter().any(|d| *d < 0.0) {
                    return;
                }
                if let Some(p) = self.to_screen(p) {
                    self.set_pixel_with_depth(p.x.floor() as i32, p.y.floor() as i32, p.z, id);
                }
            }
        }
    }
}

impl PickTarget for SoftwarePickTarget {
    fn resize(&mut self, width: u32, height: u32) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            let len = width as usize * height as usize;
            self.ids = vec![[0, 0, 0]; len];
            self.depth = vec![f32::MAX; len];
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn render(&mut self, index: &PickingIndex, view_proj: Mat4) {
        self.clear();
        for object in index.objects() {
            for local in 0..object.element_count {
                let Some(id) = encode_pick_id(object.base_id + local) else {
                    break;
                };
                if let Some(element) = object.primitive.element(local as usize) {
                    self.rasterize_element(element, &view_proj, id);
                }
            }
        }
    }

    fn read_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0];
        }
        self.ids[y as usize * self.width as usize + x as usize]
    }
}
