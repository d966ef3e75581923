//! Planar 2D Controller
//!
//! Movement of one entity on the XY plane (Y up). The strategy is fixed at
//! construction from the configuration:
//!
//! - **Continuous**: horizontal keys set x velocity. Without gravity the
//!   vertical keys set y velocity; with gravity they jump instead.
//! - **Grid**: one eased tile step per press, most recent axis wins.
//!
//! With `clickToMove` enabled, a pending click target takes precedence over
//! either strategy until the entity lands on it. A grid step already under
//! way lands on its tile first, so the entity never stops between tiles.
//!
//! On enable the scene's 2D camera is put in the configured mode and, in
//! `follow` mode, told to track the entity.

use std::any::Any;

use glam::{Vec2, Vec3};

use super::{
    ControlContext, Controller, ControllerRole, GridTransition, KeyTracker, VerticalMotion,
    release_listener,
};
use crate::config::{CameraFollowMode, ControlConfiguration};
use crate::input::{
    ChannelSet, InputEvent, InputResponse, KeyBindings, ListenerId, MouseButton, Position,
};
use crate::scene::{EntityId, SceneError, update_transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanarStrategy {
    Continuous,
    Grid,
}

#[derive(Debug, Clone)]
pub struct Planar2DController {
    entity: EntityId,
    config: ControlConfiguration,
    strategy: PlanarStrategy,
    keys: KeyTracker,
    velocity: Vec2,
    vertical: VerticalMotion,
    grid: GridTransition,
    click_target: Option<Vec2>,
    listener: Option<ListenerId>,
    enabled: bool,
}

impl Planar2DController {
    pub fn new(entity: EntityId, config: ControlConfiguration) -> Self {
        let strategy = if config.movement.grid_movement {
            PlanarStrategy::Grid
        } else {
            PlanarStrategy::Continuous
        };
        Self {
            entity,
            keys: KeyTracker::new(KeyBindings::from_settings(&config.keys)),
            config,
            strategy,
            velocity: Vec2::ZERO,
            vertical: VerticalMotion::default(),
            grid: GridTransition::default(),
            click_target: None,
            listener: None,
            enabled: false,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn strategy(&self) -> PlanarStrategy {
        self.strategy
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.vertical.grounded
    }

    pub fn grid(&self) -> &GridTransition {
        &self.grid
    }

    pub fn click_target(&self) -> Option<Vec2> {
        self.click_target
    }

    /// Set a click-to-move target in world coordinates.
    pub fn move_to(&mut self, target: Vec2) {
        if self.config.movement.click_to_move {
            self.click_target = Some(target);
            log::debug!("planar click target set to {:?}", target);
        }
    }

    fn click(&mut self, at: Position, ctx: &mut ControlContext<'_>) -> InputResponse {
        match ctx.scene.camera_2d() {
            Some(camera) => {
                let world = camera.screen_to_world(at.x, at.y);
                self.move_to(world);
                InputResponse::Consumed
            }
            None => {
                log::debug!("click ignored: scene has no 2D camera");
                InputResponse::Ignored
            }
        }
    }

    fn update_click(&mut self, target: Vec2, dt: f32, position: Vec3) -> Vec3 {
        let here = position.truncate();
        let remaining = target - here;
        let distance = remaining.length();
        let travel = self.config.effective_speed(self.keys.intent().sprint) * dt;

        if distance <= travel {
            // Land exactly on the target
            self.click_target = None;
            self.velocity = Vec2::ZERO;
            return target.extend(position.z);
        }

        self.velocity = remaining / distance * (travel / dt.max(f32::EPSILON));
        (here + remaining / distance * travel).extend(position.z)
    }

    fn update_continuous(&mut self, dt: f32, mut position: Vec3) -> Vec3 {
        let intent = self.keys.intent();
        let speed = self.config.effective_speed(intent.sprint);
        let movement = &self.config.movement;

        self.velocity.x = intent.right_axis() * speed;
        position.x += self.velocity.x * dt;

        if movement.gravity > 0.0 {
            let jump = intent.jump || intent.forward;
            position.y =
                self.vertical
                    .step(position.y, jump, movement.jump_force, movement.gravity, dt);
            self.velocity.y = self.vertical.velocity;
        } else {
            self.velocity.y = intent.forward_axis() * speed;
            position.y += self.velocity.y * dt;
        }
        position
    }

    fn update_grid(&mut self, dt: f32, position: Vec3) -> Vec3 {
        let tile = self.config.movement.tile_size;
        if !self.grid.is_moving {
            if let Some(step) = self.keys.next_grid_step() {
                let offset = Vec3::new(step.x as f32, step.y as f32, 0.0) * tile;
                self.grid.begin(position, position + offset);
                log::trace!("planar grid step {:?}", step);
            }
        }
        if !self.grid.is_moving {
            return position;
        }
        self.advance_grid_step(dt)
    }

    fn advance_grid_step(&mut self, dt: f32) -> Vec3 {
        let speed = self.config.effective_speed(self.keys.intent().sprint);
        self.grid.advance(dt, speed, self.config.movement.tile_size)
    }
}

impl Controller for Planar2DController {
    fn name(&self) -> &'static str {
        "Planar2DController"
    }

    fn role(&self) -> ControllerRole {
        ControllerRole::Movement
    }

    fn enable(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        release_listener(ctx.input, &mut self.listener);
        let position = ctx.scene.transform(self.entity)?.position;
        self.keys.clear();
        self.velocity = Vec2::ZERO;
        self.vertical = VerticalMotion::grounded_at(position.y);
        self.grid.reset();
        self.click_target = None;

        let camera_settings = self.config.camera;
        if let Some(camera) = ctx.scene.camera_2d() {
            camera.set_camera_mode(camera_settings.mode);
            match camera_settings.mode {
                CameraFollowMode::Follow => {
                    camera.set_follow_target(self.entity, camera_settings.follow_smoothing)
                }
                CameraFollowMode::Free => camera.clear_follow_target(),
            }
        }

        let channels = if self.config.movement.click_to_move {
            ChannelSet::KEYBOARD_AND_POINTER
        } else {
            ChannelSet::KEYBOARD
        };
        self.listener = Some(ctx.input.attach(self.name(), channels));
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        release_listener(ctx.input, &mut self.listener);
        if let Some(camera) = ctx.scene.camera_2d() {
            if camera.follow_target() == Some(self.entity) {
                camera.clear_follow_target();
            }
        }
        self.keys.clear();
        self.click_target = None;
        self.velocity = Vec2::ZERO;
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
            InputEvent::KeyDown(key) => match self.keys.key_down(*key) {
                Some(_) => InputResponse::Consumed,
                None => InputResponse::Ignored,
            },
            InputEvent::KeyUp(key) => match self.keys.key_up(*key) {
                Some(_) => InputResponse::Consumed,
                None => InputResponse::Ignored,
            },
            InputEvent::PointerDown {
                button: MouseButton::Left,
                position,
                modifiers,
            } if self.config.movement.click_to_move && modifiers.is_empty() => {
                self.click(*position, ctx)
            }
            InputEvent::FocusLost => {
                self.keys.clear();
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

        let position = ctx.scene.transform(self.entity)?.position;
        let next = match self.click_target {
            Some(_) if self.grid.is_moving => self.advance_grid_step(dt),
            Some(target) => self.update_click(target, dt, position),
            None => match self.strategy {
                PlanarStrategy::Grid => self.update_grid(dt, position),
                PlanarStrategy::Continuous => self.update_continuous(dt, position),
            },
        };

        if next != position {
            update_transform(ctx.scene, self.entity, |t| t.position = next)?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputRouter, KeyCode};
    use crate::scene::{Camera2D, EntityInfo, MemoryScene, OrthoCamera2D, SceneGraph, Transform};

    fn scene() -> (MemoryScene, EntityId) {
        let mut scene =
            MemoryScene::new().with_camera_2d(OrthoCamera2D::new(Vec2::new(800.0, 600.0), 10.0));
        let hero = scene.add_entity(
            EntityInfo {
                name: "Sprite".into(),
                is_controllable: true,
                ..Default::default()
            },
            Transform::default(),
        );
        (scene, hero)
    }

    fn press(controller: &mut Planar2DController, ctx: &mut ControlContext<'_>, key: KeyCode) {
        controller.handle_input(&InputEvent::KeyDown(key), ctx).unwrap();
    }

    #[test]
    fn test_free_planar_movement_without_gravity() {
        let (mut scene, hero) = scene();
        let mut input = InputRouter::new();
        let mut controller = Planar2DController::new(hero, ControlConfiguration::default());
        let mut ctx = ControlContext::new(&mut scene, &mut input);
        controller.enable(&mut ctx).unwrap();

        press(&mut controller, &mut ctx, KeyCode::KeyW);
        press(&mut controller, &mut ctx, KeyCode::KeyA);
        controller.update(0.2, &mut ctx).unwrap();

        let pos = scene.transform(hero).unwrap().position;
        assert!((pos - Vec3::new(-1.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_jump_with_gravity_lands_on_ground() {
        let (mut scene, hero) = scene();
        let mut input = InputRouter::new();
        let mut config = ControlConfiguration::default();
        config.set_gravity(20.0, 8.0);
        let mut controller = Planar2DController::new(hero, config);
        let mut ctx = ControlContext::new(&mut scene, &mut input);
        controller.enable(&mut ctx).unwrap();

        press(&mut controller, &mut ctx, KeyCode::Space);
        controller.update(1.0 / 60.0, &mut ctx).unwrap();
        controller
            .handle_input(&InputEvent::KeyUp(KeyCode::Space), &mut ctx)
            .unwrap();
        assert!(!controller.is_grounded());

        for _ in 0..120 {
            controller.update(1.0 / 60.0, &mut ctx).unwrap();
        }
        assert!(controller.is_grounded());
        assert_eq!(scene.transform(hero).unwrap().position.y, 0.0);
    }

    #[test]
    fn test_follow_mode_couples_camera() {
        let (mut scene, hero) = scene();
        let mut input = InputRouter::new();
        let mut controller = Planar2DController::new(hero, ControlConfiguration::default());
        let mut ctx = ControlContext::new(&mut scene, &mut input);
        controller.enable(&mut ctx).unwrap();
        assert_eq!(
            ctx.scene.camera_2d().and_then(|c| c.follow_target()),
            Some(hero)
        );

        controller.disable(&mut ctx).unwrap();
        assert_eq!(ctx.scene.camera_2d().and_then(|c| c.follow_target()), None);
    }

    #[test]
    fn test_free_mode_clears_tracking() {
        let (mut scene, hero) = scene();
        if let Some(camera) = scene.camera_2d() {
            camera.set_follow_target(EntityId(99), 5.0);
        }
        let mut input = InputRouter::new();
        let mut config = ControlConfiguration::default();
        config.set_camera_mode(CameraFollowMode::Free);
        let mut controller = Planar2DController::new(hero, config);
        let mut ctx = ControlContext::new(&mut scene, &mut input);
        controller.enable(&mut ctx).unwrap();

        let camera = scene.ortho_camera_2d().unwrap();
        assert_eq!(camera.follow_target(), None);
        assert_eq!(camera.camera_mode(), CameraFollowMode::Free);
    }

    #[test]
    fn test_click_with_modifier_ignored() {
        let (mut scene, hero) = scene();
        let mut input = InputRouter::new();
        let mut config = ControlConfiguration::default();
        config.enable_click_to_move(0.1);
        let mut controller = Planar2DController::new(hero, config);
        let mut ctx = ControlContext::new(&mut scene, &mut input);
        controller.enable(&mut ctx).unwrap();

        let shift_click = InputEvent::PointerDown {
            button: MouseButton::Left,
            position: Position::new(500.0, 300.0),
            modifiers: crate::input::ModifierState {
                shift: true,
                ..Default::default()
            },
        };
        controller.handle_input(&shift_click, &mut ctx).unwrap();
        assert!(controller.click_target().is_none());
    }

    #[test]
    fn test_click_takes_precedence_over_grid() {
        let (mut scene, hero) = scene();
        let mut input = InputRouter::new();
        let mut config = ControlConfiguration::default();
        config.enable_grid(1.0).enable_click_to_move(0.1);
        let mut controller = Planar2DController::new(hero, config);
        let mut ctx = ControlContext::new(&mut scene, &mut input);
        controller.enable(&mut ctx).unwrap();

        // 100 px right of center at zoom 10 is 10 world units
        let click = InputEvent::PointerDown {
            button: MouseButton::Left,
            position: Position::new(500.0, 300.0),
            modifiers: Default::default(),
        };
        controller.handle_input(&click, &mut ctx).unwrap();
        press(&mut controller, &mut ctx, KeyCode::KeyW);
        controller.update(0.1, &mut ctx).unwrap();

        assert!(!controller.grid().is_moving);
        let pos = scene.transform(hero).unwrap().position;
        assert!((pos - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_click_mid_step_waits_for_tile() {
        let (mut scene, hero) = scene();
        let mut input = InputRouter::new();
        let mut config = ControlConfiguration::default();
        config.enable_grid(1.0).enable_click_to_move(0.1);
        let mut controller = Planar2DController::new(hero, config);
        let mut ctx = ControlContext::new(&mut scene, &mut input);
        controller.enable(&mut ctx).unwrap();

        press(&mut controller, &mut ctx, KeyCode::KeyD);
        controller.handle_input(&InputEvent::KeyUp(KeyCode::KeyD), &mut ctx).unwrap();
        controller.update(0.1, &mut ctx).unwrap();
        assert_eq!(controller.grid().progress, 0.5);

        controller.move_to(Vec2::new(3.0, 0.0));
        controller.update(0.1, &mut ctx).unwrap();

        // The step finishes on its tile with the click still pending
        assert!(!controller.grid().is_moving);
        assert_eq!(controller.grid().progress, 1.0);
        assert_eq!(ctx.scene.transform(hero).unwrap().position, Vec3::X);
        assert_eq!(controller.click_target(), Some(Vec2::new(3.0, 0.0)));

        for _ in 0..10 {
            controller.update(0.1, &mut ctx).unwrap();
        }
        assert_eq!(controller.click_target(), None);
        assert_eq!(ctx.scene.transform(hero).unwrap().position, Vec3::new(3.0, 0.0, 0.0));
    }
}
