//! Orbit Camera
//!
//! Third-person camera that orbits a target entity in spherical
//! coordinates (yaw, pitch, distance) and blends continuously into a
//! first-person view as the distance shrinks.
//!
//! Controls:
//! - Right mouse drag or one-finger touch: orbit
//! - Scroll wheel or two-finger pinch: zoom
//! - Home: reset to the initial framing
//!
//! Framing by smoothed distance `d`:
//! - `d <= min_distance + first_person_offset`: eye position, looking ahead
//! - `d < first_person_threshold`: blend between eye and orbit framing
//! - otherwise: full orbit around `target + orbit_height_bias`

use std::any::Any;

use glam::Vec3;

use super::smoothing::{smooth_f32, smooth_vec3, wrap_degrees};
use crate::config::{CameraSettings, ControlConfiguration, MouseSettings};
use crate::control::{ControlContext, Controller, ControllerRole, release_listener};
use crate::input::{
    ChannelSet, InputEvent, InputResponse, ListenerId, MouseButton, Position, RESET_CAMERA_KEY,
};
use crate::scene::{EntityId, SceneError, SceneGraph, update_transform};

// ============================================================================
// LIMITS
// ============================================================================

/// Tunable orbit limits. Angles in degrees, lengths in scene units, rates
/// in 1/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitLimits {
    pub min_pitch: f32,
    pub max_pitch: f32,
    /// Lower bound for zoom input
    pub min_distance: f32,
    pub max_distance: f32,
    /// Below this distance the view blends toward first person
    pub first_person_threshold: f32,
    /// Eye height above the target origin in first person
    pub eye_height: f32,
    /// How far ahead the first-person view looks
    pub look_distance: f32,
    /// Orbit focus height above the target origin
    pub orbit_height_bias: f32,
    /// Pure first person holds up to `min_distance + first_person_offset`
    pub first_person_offset: f32,
    pub zoom_smoothing: f32,
    /// Distance change per wheel notch, before `zoomSpeed`
    pub zoom_step: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_pitch: -10.0,
            max_pitch: 80.0,
            min_distance: 1.0,
            max_distance: 30.0,
            first_person_threshold: 3.0,
            eye_height: 1.6,
            look_distance: 10.0,
            orbit_height_bias: 1.0,
            first_person_offset: 0.5,
            zoom_smoothing: 10.0,
            zoom_step: 1.0,
        }
    }
}

/// Construction-time framing, restored by `reset_to_defaults`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct InitialFraming {
    yaw: f32,
    pitch: f32,
    distance: f32,
    fov: f32,
}

/// Camera placement for one distance, before smoothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    pub position: Vec3,
    pub look_at: Vec3,
}

// ============================================================================
// ORBIT CAMERA
// ============================================================================

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    camera: EntityId,
    target: EntityId,
    limits: OrbitLimits,
    mouse: MouseSettings,
    follow_smoothing: f32,
    initial: InitialFraming,

    /// Degrees, wraps into [0, 360)
    yaw: f32,
    /// Degrees, clamped to the limits
    pitch: f32,
    /// Smoothed distance
    distance: f32,
    target_distance: f32,
    fov: f32,
    fov_dirty: bool,

    position: Vec3,
    look_at: Vec3,

    // -- Transient input state --
    dragging: bool,
    last_pointer: Option<Position>,
    touch_rotating: bool,
    last_touch: Option<Position>,
    pinch_distance: Option<f32>,

    listener: Option<ListenerId>,
    enabled: bool,
}

impl OrbitCamera {
    pub fn new(
        camera: EntityId,
        target: EntityId,
        settings: &CameraSettings,
        config: &ControlConfiguration,
    ) -> Self {
        let mut orbit = Self {
            camera,
            target,
            limits: OrbitLimits::default(),
            mouse: config.mouse,
            follow_smoothing: config.camera.follow_smoothing,
            initial: InitialFraming {
                yaw: wrap_degrees(settings.angle),
                pitch: settings.initial_pitch(),
                distance: settings.distance,
                fov: settings.fov,
            },
            yaw: 0.0,
            pitch: 0.0,
            distance: 0.0,
            target_distance: 0.0,
            fov: settings.fov,
            fov_dirty: false,
            position: Vec3::ZERO,
            look_at: Vec3::ZERO,
            dragging: false,
            last_pointer: None,
            touch_rotating: false,
            last_touch: None,
            pinch_distance: None,
            listener: None,
            enabled: false,
        };
        orbit.apply_limits();
        orbit
    }

    /// Replace the limits; the initial framing is re-clamped to them.
    pub fn with_limits(mut self, limits: OrbitLimits) -> Self {
        self.limits = limits;
        self.apply_limits();
        self
    }

    fn apply_limits(&mut self) {
        let limits = self.limits;
        self.initial.pitch = self.initial.pitch.clamp(limits.min_pitch, limits.max_pitch);
        self.initial.distance = self
            .initial
            .distance
            .clamp(limits.min_distance, limits.max_distance);
        self.yaw = self.initial.yaw;
        self.pitch = self.initial.pitch;
        self.distance = self.initial.distance;
        self.target_distance = self.initial.distance;
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn camera(&self) -> EntityId {
        self.camera
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn limits(&self) -> &OrbitLimits {
        &self.limits
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn target_distance(&self) -> f32 {
        self.target_distance
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Smoothed camera position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Smoothed look-at point.
    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging || self.touch_rotating
    }

    /// True while the smoothed distance is in the pure first-person range.
    pub fn is_first_person(&self) -> bool {
        self.distance <= self.limits.min_distance + self.limits.first_person_offset
    }

    // ========================================================================
    // CONTROL
    // ========================================================================

    /// Set the zoom goal, clamped to [0, max_distance]. Unlike zoom input,
    /// this may go below `min_distance` to force first person.
    pub fn set_target_distance(&mut self, distance: f32) {
        self.target_distance = distance.clamp(0.0, self.limits.max_distance);
    }

    /// Restore yaw, pitch, distance and fov to their construction values.
    pub fn reset_to_defaults(&mut self) {
        self.yaw = self.initial.yaw;
        self.pitch = self.initial.pitch;
        self.distance = self.initial.distance;
        self.target_distance = self.initial.distance;
        self.fov = self.initial.fov;
        self.fov_dirty = true;
    }

    /// Orbit by a screen-space drag in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let dy = if self.mouse.invert_y { -dy } else { dy };
        self.yaw = wrap_degrees(self.yaw - dx * self.mouse.sensitivity);
        self.pitch = (self.pitch + dy * self.mouse.sensitivity)
            .clamp(self.limits.min_pitch, self.limits.max_pitch);
    }

    /// Zoom by wheel notches; positive zooms out.
    pub fn zoom(&mut self, notches: f32) {
        let step = notches * self.limits.zoom_step * self.mouse.zoom_speed;
        self.target_distance = (self.target_distance + step)
            .clamp(self.limits.min_distance, self.limits.max_distance);
    }

    fn pinch(&mut self, previous_span: f32, span: f32) {
        if previous_span <= f32::EPSILON || span <= f32::EPSILON {
            return;
        }
        let scale = (previous_span / span).powf(self.mouse.zoom_speed);
        self.target_distance = (self.target_distance * scale)
            .clamp(self.limits.min_distance, self.limits.max_distance);
    }

    /// Horizontal direction from the target toward the camera.
    fn back_direction(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }

    /// Unsmoothed framing for distance `d` around `target_position`.
    pub fn framing(&self, target_position: Vec3, d: f32) -> Framing {
        let limits = &self.limits;
        let pitch = self.pitch.to_radians();
        let back = self.back_direction();

        let eye = target_position + Vec3::Y * limits.eye_height;
        if d <= limits.min_distance + limits.first_person_offset {
            return Framing {
                position: eye,
                look_at: eye - back * limits.look_distance,
            };
        }

        let horizontal = back * d * pitch.cos();
        let orbit_height = d * pitch.sin() + limits.orbit_height_bias;

        if d < limits.first_person_threshold {
            let span = (limits.first_person_threshold - limits.min_distance).max(f32::EPSILON);
            let t = ((d - limits.min_distance) / span).clamp(0.0, 1.0);
            let height = limits.eye_height + (orbit_height - limits.eye_height) * t;
            let focus = limits.eye_height + (limits.orbit_height_bias - limits.eye_height) * t;
            return Framing {
                position: target_position + horizontal + Vec3::Y * height,
                look_at: target_position + Vec3::Y * focus,
            };
        }

        Framing {
            position: target_position + horizontal + Vec3::Y * orbit_height,
            look_at: target_position + Vec3::Y * limits.orbit_height_bias,
        }
    }

    fn write_camera(&self, scene: &mut dyn SceneGraph) -> Result<(), SceneError> {
        let (position, look_at) = (self.position, self.look_at);
        update_transform(scene, self.camera, |t| {
            t.position = position;
            t.look_at(look_at);
        })?;
        Ok(())
    }

    /// Jump straight to the target framing without smoothing.
    pub fn snap(&mut self, scene: &mut dyn SceneGraph) -> Result<(), SceneError> {
        self.distance = self.target_distance;
        let target = scene.transform(self.target)?.position;
        let framing = self.framing(target, self.distance);
        self.position = framing.position;
        self.look_at = framing.look_at;
        self.write_camera(scene)
    }

    fn clear_gestures(&mut self) {
        self.dragging = false;
        self.last_pointer = None;
        self.touch_rotating = false;
        self.last_touch = None;
        self.pinch_distance = None;
    }
}

impl Controller for OrbitCamera {
    fn name(&self) -> &'static str {
        "OrbitCamera"
    }

    fn role(&self) -> ControllerRole {
        ControllerRole::Camera
    }

    fn enable(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        release_listener(ctx.input, &mut self.listener);
        self.clear_gestures();

        ctx.scene.set_camera_fov(self.camera, self.fov)?;
        self.fov_dirty = false;
        self.snap(ctx.scene)?;

        self.listener = Some(ctx.input.attach(self.name(), ChannelSet::ALL));
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        release_listener(ctx.input, &mut self.listener);
        self.clear_gestures();
        self.enabled = false;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn listener(&self) -> Option<ListenerId> {
        self.listener
    }

    fn handle_input(
        &mut self,
        event: &InputEvent,
        ctx: &mut ControlContext<'_>,
    ) -> Result<InputResponse, SceneError> {
        let response = match event {
            InputEvent::PointerDown { button, position, .. } if *button == MouseButton::Right => {
                self.dragging = true;
                self.last_pointer = Some(*position);
                InputResponse::Consumed
            }
            InputEvent::PointerMove { position, movement } if self.dragging => {
                let (dx, dy) = match (movement, self.last_pointer) {
                    (Some(delta), _) => *delta,
                    (None, Some(last)) => position.delta_from(&last),
                    (None, None) => (0.0, 0.0),
                };
                self.last_pointer = Some(*position);
                self.rotate(dx, dy);
                InputResponse::Consumed
            }
            InputEvent::PointerUp { button, .. } if *button == MouseButton::Right => {
                self.dragging = false;
                self.last_pointer = None;
                InputResponse::Consumed
            }
            InputEvent::ContextMenu { .. } => InputResponse::Consumed,
            InputEvent::Wheel(delta) if !delta.is_zero() => {
                self.zoom(delta.y);
                InputResponse::Consumed
            }
            InputEvent::TouchStart(points) | InputEvent::TouchEnd(points) => {
                self.begin_touch(points);
                InputResponse::Consumed
            }
            InputEvent::TouchMove(points) => {
                match points.as_slice() {
                    [point] if self.touch_rotating => {
                        if let Some(last) = self.last_touch {
                            let (dx, dy) = point.delta_from(&last);
                            self.rotate(dx, dy);
                        }
                        self.last_touch = Some(*point);
                    }
                    [a, b] => {
                        let span = a.distance(b);
                        if let Some(previous) = self.pinch_distance {
                            self.pinch(previous, span);
                        }
                        self.pinch_distance = Some(span);
                    }
                    _ => {}
                }
                InputResponse::Consumed
            }
            InputEvent::KeyDown(key) if *key == RESET_CAMERA_KEY => {
                self.reset_to_defaults();
                ctx.scene.set_camera_fov(self.camera, self.fov)?;
                self.fov_dirty = false;
                log::debug!("orbit camera reset to initial framing");
                InputResponse::Consumed
            }
            InputEvent::FocusLost => {
                self.clear_gestures();
                InputResponse::Ignored
            }
            _ => InputResponse::Ignored,
        };
        Ok(response)
    }

    fn update(&mut self, dt: f32, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        if !self.enabled {
            return Ok(());
        }
        if self.fov_dirty {
            ctx.scene.set_camera_fov(self.camera, self.fov)?;
            self.fov_dirty = false;
        }

        self.distance = smooth_f32(
            self.distance,
            self.target_distance,
            self.limits.zoom_smoothing,
            dt,
        );

        let target = ctx.scene.transform(self.target)?.position;
        let framing = self.framing(target, self.distance);
        self.position = smooth_vec3(self.position, framing.position, self.follow_smoothing, dt);
        self.look_at = smooth_vec3(self.look_at, framing.look_at, self.follow_smoothing, dt);

        self.write_camera(ctx.scene)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl OrbitCamera {
    /// Start a gesture from the fingers currently down.
    fn begin_touch(&mut self, points: &[Position]) {
        self.clear_gestures();
        match points {
            [point] => {
                self.touch_rotating = true;
                self.last_touch = Some(*point);
            }
            [a, b] => {
                self.pinch_distance = Some(a.distance(b));
            }
            _ => {}
        }
    }
}
