//! 2D Camera
//!
//! The orthographic camera used by planar scenes. World space is Y-up;
//! screen space is pixels with a top-left origin.

use glam::Vec2;

use super::EntityId;
use crate::camera::smoothing::smooth_vec2;
use crate::config::CameraFollowMode;

/// Operations the planar controller needs from a 2D camera.
pub trait Camera2D {
    /// Convert a screen pixel to a world point.
    fn screen_to_world(&self, px: f32, py: f32) -> Vec2;
    /// Track `entity` with the given exponential smoothing rate.
    fn set_follow_target(&mut self, entity: EntityId, smoothing: f32);
    fn clear_follow_target(&mut self);
    fn set_camera_mode(&mut self, mode: CameraFollowMode);
    fn follow_target(&self) -> Option<EntityId>;
    fn camera_mode(&self) -> CameraFollowMode;
    /// Move the view by a screen-space drag; free mode only.
    fn pan(&mut self, dx_pixels: f32, dy_pixels: f32);
    fn zoom_by(&mut self, factor: f32);
}

/// Simple orthographic 2D camera with follow and free panning.
#[derive(Clone, Debug, PartialEq)]
pub struct OrthoCamera2D {
    /// World point at the viewport center
    pub center: Vec2,
    /// Pixels per world unit
    pub zoom: f32,
    /// Viewport size in pixels
    pub viewport: Vec2,
    mode: CameraFollowMode,
    follow: Option<(EntityId, f32)>,
}

const MIN_ZOOM: f32 = 0.05;
const MAX_ZOOM: f32 = 100.0;

impl OrthoCamera2D {
    pub fn new(viewport: Vec2, zoom: f32) -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            viewport,
            mode: CameraFollowMode::Follow,
            follow: None,
        }
    }

    /// Ease the camera toward the followed entity's position.
    pub fn track(&mut self, target: Vec2, dt: f32) {
        if let Some((_, smoothing)) = self.follow {
            self.center = smooth_vec2(self.center, target, smoothing, dt);
        }
    }

    /// Convert a world point back to a screen pixel.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let half = self.viewport * 0.5;
        Vec2::new(
            half.x + (world.x - self.center.x) * self.zoom,
            half.y - (world.y - self.center.y) * self.zoom,
        )
    }
}

impl Camera2D for OrthoCamera2D {
    fn screen_to_world(&self, px: f32, py: f32) -> Vec2 {
        let half = self.viewport * 0.5;
        Vec2::new(
            self.center.x + (px - half.x) / self.zoom,
            self.center.y - (py - half.y) / self.zoom,
        )
    }

    fn set_follow_target(&mut self, entity: EntityId, smoothing: f32) {
        self.follow = Some((entity, smoothing));
    }

    fn clear_follow_target(&mut self) {
        self.follow = None;
    }

    fn set_camera_mode(&mut self, mode: CameraFollowMode) {
        self.mode = mode;
    }

    fn follow_target(&self) -> Option<EntityId> {
        self.follow.map(|(id, _)| id)
    }

    fn camera_mode(&self) -> CameraFollowMode {
        self.mode
    }

    fn pan(&mut self, dx_pixels: f32, dy_pixels: f32) {
        if self.mode != CameraFollowMode::Free {
            return;
        }
        self.center.x -= dx_pixels / self.zoom;
        self.center.y += dy_pixels / self.zoom;
    }

    fn zoom_by(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_to_world_center_and_axes() {
        let mut cam = OrthoCamera2D::new(Vec2::new(800.0, 600.0), 10.0);
        cam.center = Vec2::new(5.0, 5.0);

        assert_eq!(cam.screen_to_world(400.0, 300.0), Vec2::new(5.0, 5.0));
        // Right and up on screen is +x, +y in world
        assert_eq!(cam.screen_to_world(410.0, 290.0), Vec2::new(6.0, 6.0));
    }

    #[test]
    fn test_world_screen_inverse() {
        let cam = OrthoCamera2D::new(Vec2::new(640.0, 480.0), 32.0);
        let world = Vec2::new(3.5, -2.0);
        let screen = cam.world_to_screen(world);
        let back = cam.screen_to_world(screen.x, screen.y);
        assert!((back - world).length() < 1e-4);
    }

    #[test]
    fn test_pan_only_in_free_mode() {
        let mut cam = OrthoCamera2D::new(Vec2::new(100.0, 100.0), 10.0);
        cam.pan(10.0, 0.0);
        assert_eq!(cam.center, Vec2::ZERO);

        cam.set_camera_mode(CameraFollowMode::Free);
        cam.pan(10.0, 0.0);
        assert_eq!(cam.center, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut cam = OrthoCamera2D::new(Vec2::new(100.0, 100.0), 10.0);
        cam.zoom_by(2.0);
        assert_eq!(cam.zoom, 20.0);
        cam.zoom_by(1000.0);
        assert_eq!(cam.zoom, MAX_ZOOM);
        cam.zoom_by(0.0);
        assert_eq!(cam.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_track_requires_follow_target() {
        let mut cam = OrthoCamera2D::new(Vec2::new(100.0, 100.0), 10.0);
        cam.track(Vec2::new(10.0, 0.0), 0.1);
        assert_eq!(cam.center, Vec2::ZERO);

        cam.set_follow_target(EntityId(1), 8.0);
        cam.track(Vec2::new(10.0, 0.0), 0.1);
        assert!(cam.center.x > 0.0 && cam.center.x < 10.0);
        assert_eq!(cam.follow_target(), Some(EntityId(1)));
    }
}
