//! 3D-Kamera und Pick-Strahl.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// Strahl im Weltraum (`direction` normiert).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Erstellt einen Strahl; die Richtung wird normiert.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Parameter des zu `point` nächsten Strahlpunkts (nie hinter dem Ursprung).
    pub fn closest_t(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.direction).max(0.0)
    }

    /// Quadrierter Abstand zwischen Strahl und Punkt.
    pub fn distance_sq_to_point(&self, point: Vec3) -> f32 {
        self.point_at(self.closest_t(point)).distance_squared(point)
    }

    /// Schnitt mit der Ebene durch `point` mit Normale `normal`.
    pub fn intersect_plane(&self, point: Vec3, normal: Vec3) -> Option<f32> {
        let denom = normal.dot(self.direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        (t >= 0.0).then_some(t)
    }

    /// Schnitt mit der horizontalen Ebene `y = height`.
    pub fn intersect_ground(&self, height: f32) -> Option<Vec3> {
        self.intersect_plane(Vec3::new(0.0, height, 0.0), Vec3::Y)
            .map(|t| self.point_at(t))
    }

    /// Punkt auf der Strecke `a`–`b`, der dem Strahl am nächsten liegt.
    pub fn closest_point_on_segment(&self, a: Vec3, b: Vec3) -> Vec3 {
        let seg = b - a;
        let len_sq = seg.length_squared();
        if len_sq < 1e-12 {
            return a;
        }
        let w = a - self.origin;
        let d_dot_s = self.direction.dot(seg);
        let denom = len_sq - d_dot_s * d_dot_s;
        // Parallel: Projektion des Strahlursprungs auf die Strecke
        let s = if denom.abs() < 1e-9 {
            (-w).dot(seg) / len_sq
        } else {
            (d_dot_s * self.direction.dot(w) - seg.dot(w)) / denom
        };
        a + seg * s.clamp(0.0, 1.0)
    }
}

/// Perspektivische Kamera (rechtshändig, Y oben).
#[derive(Debug, Clone, PartialEq)]
pub struct Camera3D {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertikaler Öffnungswinkel in Radiant
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new(Vec3::new(3.0, 3.0, 3.0), Vec3::ZERO)
    }
}

impl Camera3D {
    /// Standard-Öffnungswinkel (45°).
    pub const DEFAULT_FOV_Y: f32 = std::f32::consts::FRAC_PI_4;

    pub fn new(eye: Vec3, target: Vec3) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            fov_y: Self::DEFAULT_FOV_Y,
            near: 0.05,
            far: 500.0,
        }
    }

    /// Richtet die Kamera auf einen Punkt aus
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(1e-6), self.near, self.far)
    }

    /// View-Projection für einen Viewport in Pixeln.
    pub fn view_proj(&self, viewport: Vec2) -> Mat4 {
        let aspect = viewport.x / viewport.y.max(1.0);
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Strahl durch die Bildschirmposition (Pixel, Ursprung oben links).
    ///
    /// `None` bei leerem Viewport.
    pub fn screen_to_ray(&self, screen_pos: Vec2, viewport: Vec2) -> Option<Ray> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(
            screen_pos.x / viewport.x * 2.0 - 1.0,
            1.0 - screen_pos.y / viewport.y * 2.0,
        );
        let inverse = self.view_proj(viewport).inverse();
        let unproject = |z: f32| {
            let p = inverse * ndc.extend(z).extend(1.0);
            p.xyz() / p.w
        };
        let near = unproject(0.0);
        let far = unproject(1.0);
        Some(Ray::new(near, far - near))
    }

    /// Projiziert einen Weltpunkt auf Bildschirm-Pixel (`None` hinter der Kamera).
    pub fn world_to_screen(&self, point: Vec3, viewport: Vec2) -> Option<Vec2> {
        let clip = self.view_proj(viewport) * point.extend(1.0);
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.x,
            (1.0 - ndc.y) * 0.5 * viewport.y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn center_ray_points_at_target() {
        let camera = Camera3D::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let ray = camera
            .screen_to_ray(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0))
            .expect("Viewport gültig");
        assert_relative_eq!(ray.direction.z, -1.0, epsilon = 1e-4);
        assert_relative_eq!(ray.distance_sq_to_point(Vec3::ZERO), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn world_to_screen_inverts_screen_to_ray() {
        let camera = Camera3D::default();
        let viewport = Vec2::new(640.0, 480.0);
        let screen = Vec2::new(200.0, 100.0);
        let ray = camera.screen_to_ray(screen, viewport).unwrap();
        let back = camera.world_to_screen(ray.point_at(4.0), viewport).unwrap();
        assert_relative_eq!(back.x, screen.x, epsilon = 1e-2);
        assert_relative_eq!(back.y, screen.y, epsilon = 1e-2);
    }

    #[test]
    fn empty_viewport_has_no_ray() {
        assert!(Camera3D::default()
            .screen_to_ray(Vec2::ZERO, Vec2::new(0.0, 600.0))
            .is_none());
    }

    #[test]
    fn ground_intersection() {
        let ray = Ray::new(Vec3::new(1.0, 5.0, 2.0), Vec3::new(0.0, -1.0, 0.0));
        let hit = ray.intersect_ground(0.0).expect("Boden getroffen");
        assert_relative_eq!(hit.x, 1.0);
        assert_relative_eq!(hit.z, 2.0);
        assert!(ray.intersect_ground(10.0).is_none());
    }

    #[test]
    fn point_behind_origin_uses_origin() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_relative_eq!(ray.distance_sq_to_point(Vec3::new(-2.0, 0.0, 0.0)), 4.0);
    }

    #[test]
    fn closest_point_on_segment() {
        let ray = Ray::new(Vec3::new(0.5, 0.0, 5.0), Vec3::NEG_Z);
        let p = ray.closest_point_on_segment(Vec3::ZERO, Vec3::X);
        assert_relative_eq!(p.x, 0.5, epsilon = 1e-6);
        let clamped = ray.closest_point_on_segment(Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(clamped.x, 2.0, epsilon = 1e-6);
    }
}
