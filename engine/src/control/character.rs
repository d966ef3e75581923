//! Character Controller
//!
//! Keyboard movement of the controlled entity in 3D.
//!
//! # Strategies
//!
//! - **Continuous**: WASD / arrows move relative to the camera's horizontal
//!   view direction at `speed` (times `sprintMultiplier` while sprinting).
//!   With `gravity > 0` the jump key launches the entity and it falls back
//!   to the height it had when the controller was enabled.
//! - **Grid**: each press moves exactly one tile along world X/Z with an
//!   eased transition; input is ignored until the step finishes.

use std::any::Any;

use glam::Vec3;

use super::{
    ControlContext, Controller, ControllerRole, GridTransition, KeyTracker, VerticalMotion,
    release_listener,
};
use crate::camera::smoothing::lerp_angle;
use crate::config::ControlConfiguration;
use crate::input::{ChannelSet, InputEvent, InputResponse, KeyBindings, ListenerId};
use crate::scene::{EntityId, SceneError, update_transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementStrategy {
    Continuous,
    Grid,
}

#[derive(Debug, Clone)]
pub struct CharacterController {
    entity: EntityId,
    /// Camera whose view direction defines "forward"
    camera: EntityId,
    config: ControlConfiguration,
    strategy: MovementStrategy,
    /// Turn the entity toward its movement direction (third person)
    face_movement: bool,
    keys: KeyTracker,
    vertical: VerticalMotion,
    grid: GridTransition,
    velocity: Vec3,
    listener: Option<ListenerId>,
    enabled: bool,
}

impl CharacterController {
    pub fn new(entity: EntityId, camera: EntityId, config: ControlConfiguration) -> Self {
        let strategy = if config.movement.grid_movement {
            MovementStrategy::Grid
        } else {
            MovementStrategy::Continuous
        };
        Self {
            entity,
            camera,
            keys: KeyTracker::new(KeyBindings::from_settings(&config.keys)),
            config,
            strategy,
            face_movement: true,
            vertical: VerticalMotion::default(),
            grid: GridTransition::default(),
            velocity: Vec3::ZERO,
            listener: None,
            enabled: false,
        }
    }

    pub fn with_face_movement(mut self, face_movement: bool) -> Self {
        self.face_movement = face_movement;
        self
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn strategy(&self) -> MovementStrategy {
        self.strategy
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.vertical.grounded
    }

    pub fn grid(&self) -> &GridTransition {
        &self.grid
    }

    fn update_continuous(&mut self, dt: f32, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        let intent = self.keys.intent();
        let forward = ctx.scene.transform(self.camera)?.horizontal_view_direction();
        let right = forward.cross(Vec3::Y);

        let wish = (forward * intent.forward_axis() + right * intent.right_axis()).normalize_or_zero();
        let speed = self.config.effective_speed(intent.sprint);
        self.velocity.x = wish.x * speed;
        self.velocity.z = wish.z * speed;

        let movement = &self.config.movement;
        let (gravity, jump_force, rotation_speed) =
            (movement.gravity, movement.jump_force, movement.rotation_speed);
        let face = self.face_movement && wish != Vec3::ZERO;
        let vertical = &mut self.vertical;
        let velocity = &mut self.velocity;

        update_transform(ctx.scene, self.entity, |t| {
            t.position.x += velocity.x * dt;
            t.position.z += velocity.z * dt;
            if gravity > 0.0 {
                t.position.y = vertical.step(t.position.y, intent.jump, jump_force, gravity, dt);
                velocity.y = vertical.velocity;
            }
            if face {
                let goal = wish.x.atan2(wish.z);
                t.set_yaw(lerp_angle(t.yaw(), goal, rotation_speed * dt));
            }
        })?;
        Ok(())
    }

    fn update_grid(&mut self, dt: f32, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        let tile = self.config.movement.tile_size;
        let speed = self.config.effective_speed(self.keys.intent().sprint);

        if !self.grid.is_moving {
            if let Some(step) = self.keys.next_grid_step() {
                let from = ctx.scene.transform(self.entity)?.position;
                // Forward is world -Z
                let offset = Vec3::new(step.x as f32, 0.0, -(step.y as f32)) * tile;
                self.grid.begin(from, from + offset);
                log::trace!("grid step {:?} -> {:?}", from, from + offset);
            }
        }

        if self.grid.is_moving {
            let position = self.grid.advance(dt, speed, tile);
            update_transform(ctx.scene, self.entity, |t| t.position = position)?;
        }
        Ok(())
    }
}

impl Controller for CharacterController {
    fn name(&self) -> &'static str {
        "CharacterController"
    }

    fn role(&self) -> ControllerRole {
        ControllerRole::Movement
    }

    fn enable(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        release_listener(ctx.input, &mut self.listener);
        let position = ctx.scene.transform(self.entity)?.position;
        self.keys.clear();
        self.grid.reset();
        self.velocity = Vec3::ZERO;
        self.vertical = VerticalMotion::grounded_at(position.y);

        self.listener = Some(ctx.input.attach(self.name(), ChannelSet::KEYBOARD));
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        release_listener(ctx.input, &mut self.listener);
        self.keys.clear();
        self.velocity = Vec3::ZERO;
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
        let action = match event {
            InputEvent::KeyDown(key) => self.keys.key_down(*key),
            InputEvent::KeyUp(key) => self.keys.key_up(*key),
            InputEvent::FocusLost => {
                self.keys.clear();
                None
            }
            _ => None,
        };
        Ok(match action {
            Some(_) => InputResponse::Consumed,
            None => InputResponse::Ignored,
        })
    }

    fn update(&mut self, dt: f32, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        if !self.enabled {
            return Ok(());
        }
        match self.strategy {
            MovementStrategy::Continuous => self.update_continuous(dt, ctx),
            MovementStrategy::Grid => self.update_grid(dt, ctx),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
