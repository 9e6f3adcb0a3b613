use crate::interaction::Camera3D;
use glam::Vec2;

/// View-bezogener Anwendungszustand
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// 3D-Kamera für die Ansicht
    pub camera: Camera3D,
    /// Aktuelle Viewport-Größe in Pixel
    pub viewport_size: [f32; 2],
}

impl ViewState {
    /// Erstellt den Standard-View-Zustand.
    pub fn new() -> Self {
        Self {
            camera: Camera3D::default(),
            viewport_size: [0.0, 0.0],
        }
    }

    /// Viewport-Größe als Vektor.
    pub fn viewport(&self) -> Vec2 {
        Vec2::from(self.viewport_size)
    }
}
