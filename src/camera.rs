//! Orthographic camera over the fixed game world
//!
//! The world is always `SCREEN_WIDTH` x `SCREEN_HEIGHT` with y up and the
//! origin in the bottom-left corner. The viewport is whatever size the canvas
//! has; the world is stretched to fill it.

use glam::Vec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoCamera {
    /// World area shown by the camera
    pub world_size: Vec2,
    /// Viewport size in pixels
    pub viewport: Vec2,
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl OrthoCamera {
    /// Camera with a viewport the same size as the world
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            world_size: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            viewport: Vec2::new(viewport_width, viewport_height),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    /// World coordinates to normalized device coordinates (-1..1, y up)
    pub fn world_to_ndc(&self, world: Vec2) -> Vec2 {
        world / self.world_size * 2.0 - Vec2::ONE
    }

    /// Viewport pixel (origin top-left, y down) to world coordinates
    pub fn unproject(&self, screen_x: f32, screen_y: f32) -> Vec2 {
        let u = screen_x / self.viewport.x;
        let v = 1.0 - screen_y / self.viewport.y;
        Vec2::new(u, v) * self.world_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndc_corners() {
        let camera = OrthoCamera::default();
        assert_eq!(camera.world_to_ndc(Vec2::ZERO), Vec2::new(-1.0, -1.0));
        assert_eq!(
            camera.world_to_ndc(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT)),
            Vec2::new(1.0, 1.0)
        );
        assert_eq!(camera.world_to_ndc(Vec2::new(400.0, 240.0)), Vec2::ZERO);
    }

    #[test]
    fn test_unproject_flips_y() {
        let camera = OrthoCamera::new(1600.0, 960.0);
        assert_eq!(camera.unproject(0.0, 0.0), Vec2::new(0.0, 480.0));
        assert_eq!(camera.unproject(800.0, 480.0), Vec2::new(400.0, 240.0));
        assert_eq!(camera.unproject(1600.0, 960.0), Vec2::new(800.0, 0.0));
    }

    #[test]
    fn test_unproject_stretched_viewport() {
        let camera = OrthoCamera::new(400.0, 480.0);
        // Half-width viewport: 1 screen pixel = 2 world units horizontally
        assert_eq!(camera.unproject(50.0, 480.0), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_resize_ignores_empty() {
        let mut camera = OrthoCamera::default();
        camera.resize(0.0, 100.0);
        assert_eq!(camera.viewport, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        camera.resize(1024.0, 768.0);
        assert_eq!(camera.viewport, Vec2::new(1024.0, 768.0));
    }
}
