//! First-Person Camera
//!
//! Mouse look from the controlled entity's eyes. Pointer-locked sources
//! deliver relative motion and rotate the view directly; otherwise the
//! view rotates while the right button is held. The entity's yaw follows
//! the camera so movement stays aligned with the view.
//!
//! Pitch is clamped to ±89 degrees to prevent the view flipping over.

use std::any::Any;
use std::f32::consts::TAU;

use glam::Vec3;

use crate::config::{CameraSettings, MouseSettings};
use crate::control::{ControlContext, Controller, ControllerRole, release_listener};
use crate::input::{ChannelSet, InputEvent, InputResponse, ListenerId, MouseButton, Position};
use crate::scene::{EntityId, SceneError, look_rotation, update_transform};

/// Pitch limit: 89 degrees in radians
const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Default eye height above the entity origin
pub const DEFAULT_EYE_HEIGHT: f32 = 1.6;

#[derive(Clone, Debug)]
pub struct FirstPersonCamera {
    camera: EntityId,
    target: EntityId,
    /// Eye height above the entity origin
    pub eye_height: f32,
    fov: f32,
    /// Radians per pixel
    sensitivity: f32,
    invert_y: bool,
    /// Horizontal angle (radians), same convention as entity yaw
    yaw: f32,
    /// Vertical angle (radians), positive looks up
    pitch: f32,
    looking: bool,
    last_pointer: Option<Position>,
    listener: Option<ListenerId>,
    enabled: bool,
}

impl FirstPersonCamera {
    pub fn new(
        camera: EntityId,
        target: EntityId,
        settings: &CameraSettings,
        mouse: &MouseSettings,
    ) -> Self {
        Self {
            camera,
            target,
            eye_height: DEFAULT_EYE_HEIGHT,
            fov: settings.fov,
            sensitivity: mouse.sensitivity.to_radians(),
            invert_y: mouse.invert_y,
            yaw: 0.0,
            pitch: 0.0,
            looking: false,
            last_pointer: None,
            listener: None,
            enabled: false,
        }
    }

    pub fn camera(&self) -> EntityId {
        self.camera
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Rotate the view by a mouse delta in pixels.
    ///
    /// Positive `dx` turns right, positive `dy` looks down.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        let dy = if self.invert_y { -dy } else { dy };
        self.yaw = (self.yaw - dx * self.sensitivity).rem_euclid(TAU);
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Direction the camera looks. Yaw 0 and pitch 0 look along +Z, the
    /// way an unrotated entity faces.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
    }

    fn place(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        let yaw = self.yaw;
        let entity = update_transform(ctx.scene, self.target, |t| t.set_yaw(yaw))?;

        let eye = entity.position + Vec3::Y * self.eye_height;
        let rotation = look_rotation(self.forward());
        update_transform(ctx.scene, self.camera, |t| {
            t.position = eye;
            if let Some(rotation) = rotation {
                t.rotation = rotation;
            }
        })?;
        Ok(())
    }
}

impl Controller for FirstPersonCamera {
    fn name(&self) -> &'static str {
        "FirstPersonCamera"
    }

    fn role(&self) -> ControllerRole {
        ControllerRole::Camera
    }

    fn enable(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        release_listener(ctx.input, &mut self.listener);
        self.yaw = ctx.scene.transform(self.target)?.yaw().rem_euclid(TAU);
        self.pitch = 0.0;
        self.looking = false;
        self.last_pointer = None;

        ctx.scene.set_camera_fov(self.camera, self.fov)?;
        self.place(ctx)?;

        self.listener = Some(ctx.input.attach(self.name(), ChannelSet::POINTER));
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        release_listener(ctx.input, &mut self.listener);
        self.looking = false;
        self.last_pointer = None;
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
        _ctx: &mut ControlContext<'_>,
    ) -> Result<InputResponse, SceneError> {
        let response = match event {
            InputEvent::PointerMove {
                movement: Some((dx, dy)),
                position,
            } => {
                self.apply_mouse_delta(*dx, *dy);
                self.last_pointer = Some(*position);
                InputResponse::Consumed
            }
            InputEvent::PointerMove {
                movement: None,
                position,
            } if self.looking => {
                if let Some(last) = self.last_pointer {
                    let (dx, dy) = position.delta_from(&last);
                    self.apply_mouse_delta(dx, dy);
                }
                self.last_pointer = Some(*position);
                InputResponse::Consumed
            }
            InputEvent::PointerDown { button, position, .. } if *button == MouseButton::Right => {
                self.looking = true;
                self.last_pointer = Some(*position);
                InputResponse::Consumed
            }
            InputEvent::PointerUp { button, .. } if *button == MouseButton::Right => {
                self.looking = false;
                InputResponse::Consumed
            }
            InputEvent::FocusLost => {
                self.looking = false;
                self.last_pointer = None;
                InputResponse::Ignored
            }
            _ => InputResponse::Ignored,
        };
        Ok(response)
    }

    fn update(&mut self, _dt: f32, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        if !self.enabled {
            return Ok(());
        }
        self.place(ctx)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputRouter, KeyCode};
    use crate::scene::{EntityInfo, MemoryScene, SceneGraph, Transform};

    const EPSILON: f32 = 1e-4;

    fn camera() -> FirstPersonCamera {
        FirstPersonCamera::new(
            EntityId(0),
            EntityId(1),
            &CameraSettings::default(),
            &MouseSettings::default(),
        )
    }

    #[test]
    fn test_forward_at_zero_faces_plus_z() {
        let cam = camera();
        assert!((cam.forward() - Vec3::Z).length() < EPSILON);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut cam = camera();
        cam.apply_mouse_delta(0.0, -100_000.0);
        assert!((cam.pitch() - PITCH_LIMIT).abs() < EPSILON);
        cam.apply_mouse_delta(0.0, 100_000.0);
        assert!((cam.pitch() + PITCH_LIMIT).abs() < EPSILON);
    }

    #[test]
    fn test_mouse_right_turns_right() {
        let mut cam = camera();
        cam.apply_mouse_delta(10.0, 0.0);
        // Facing +Z, right is -X
        assert!(cam.forward().x < 0.0);
    }

    #[test]
    fn test_camera_sits_at_eye_and_entity_follows_yaw() {
        let mut scene = MemoryScene::new();
        let camera = scene.add_camera("Main", Transform::default(), Default::default(), true);
        let hero = scene.add_entity(
            EntityInfo {
                name: "Hero".into(),
                ..Default::default()
            },
            Transform::from_position(Vec3::new(2.0, 0.0, 3.0)),
        );
        let mut input = InputRouter::new();
        let mut fp = FirstPersonCamera::new(
            camera,
            hero,
            &CameraSettings::default(),
            &MouseSettings::default(),
        );
        let mut ctx = ControlContext::new(&mut scene, &mut input);
        fp.enable(&mut ctx).unwrap();

        let locked_move = InputEvent::PointerMove {
            position: Position::default(),
            movement: Some((300.0, 0.0)),
        };
        fp.handle_input(&locked_move, &mut ctx).unwrap();
        fp.update(0.016, &mut ctx).unwrap();

        let cam = scene.transform(camera).unwrap();
        assert!((cam.position - Vec3::new(2.0, 1.6, 3.0)).length() < EPSILON);
        assert!((cam.view_direction() - fp.forward()).length() < 1e-3);

        let entity = scene.transform(hero).unwrap();
        assert!((entity.facing() - fp.forward()).length() < 1e-3);
    }

    #[test]
    fn test_listens_to_pointer_only() {
        let mut scene = MemoryScene::new();
        let camera = scene.add_camera("Main", Transform::default(), Default::default(), true);
        let hero = scene.add_entity(EntityInfo::default(), Transform::default());
        let mut input = InputRouter::new();
        let mut fp = FirstPersonCamera::new(
            camera,
            hero,
            &CameraSettings::default(),
            &MouseSettings::default(),
        );
        let mut ctx = ControlContext::new(&mut scene, &mut input);
        fp.enable(&mut ctx).unwrap();

        let listener = fp.listener().unwrap();
        let right_down = InputEvent::PointerDown {
            button: MouseButton::Right,
            position: Position::default(),
            modifiers: Default::default(),
        };
        assert!(ctx.input.accepts(listener, &right_down));
        assert!(!ctx.input.accepts(listener, &InputEvent::KeyDown(KeyCode::KeyW)));

        // Focus loss still ends a right-drag look
        assert!(ctx.input.accepts(listener, &InputEvent::FocusLost));
        fp.handle_input(&right_down, &mut ctx).unwrap();
        fp.handle_input(&InputEvent::FocusLost, &mut ctx).unwrap();
        let drag = InputEvent::PointerMove {
            position: Position::new(50.0, 0.0),
            movement: None,
        };
        let yaw = fp.yaw();
        assert!(!fp.handle_input(&drag, &mut ctx).unwrap().is_consumed());
        assert_eq!(fp.yaw(), yaw);
    }
}
