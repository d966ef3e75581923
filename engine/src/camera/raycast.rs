//! Raycast Module
//!
//! Unprojects screen pixels into world-space rays from a camera transform
//! and lens, and intersects them with horizontal planes for click
//! navigation.

use glam::Vec3;

use crate::scene::{CameraLens, Transform};

/// Rays closer to parallel than this never hit a horizontal plane.
const PARALLEL_EPSILON: f32 = 1e-4;

/// A world-space ray with a normalized direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersect with the plane `y = height`.
    ///
    /// # Returns
    /// * `Some(Vec3)` - The hit point in front of the ray origin
    /// * `None` - If the ray is parallel to the plane or the plane is behind
    pub fn intersect_horizontal_plane(&self, height: f32) -> Option<Vec3> {
        if self.direction.y.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (height - self.origin.y) / self.direction.y;
        if t < 0.0 {
            return None;
        }

        Some(self.at(t))
    }
}

/// Ray from the camera through a screen pixel.
///
/// # Arguments
/// * `camera` - Camera transform; the camera looks down its local -Z
/// * `lens` - Vertical fov (degrees) and viewport size (pixels)
/// * `px`, `py` - Pixel coordinates with the origin at the top-left
pub fn screen_ray(camera: &Transform, lens: &CameraLens, px: f32, py: f32) -> Ray {
    let (width, height) = (lens.width.max(1.0), lens.height.max(1.0));

    // Pixel to NDC (-1 to 1), Y up
    let ndc_x = 2.0 * px / width - 1.0;
    let ndc_y = 1.0 - 2.0 * py / height;

    let half_fov = (lens.fov.to_radians() * 0.5).tan();
    let local = Vec3::new(
        ndc_x * lens.aspect_ratio() * half_fov,
        ndc_y * half_fov,
        -1.0,
    );

    Ray::new(camera.position, camera.rotation * local)
}

/// Unproject a pixel and intersect it with the plane `y = plane_height`.
pub fn raycast_to_plane(
    camera: &Transform,
    lens: &CameraLens,
    px: f32,
    py: f32,
    plane_height: f32,
) -> Option<Vec3> {
    screen_ray(camera, lens, px, py).intersect_horizontal_plane(plane_height)
}
