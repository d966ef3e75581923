//! Planar Movement Tests - Grid Steps, Click Targets and Jumping
//!
//! Tests for Planar2DController, both directly and through a planar
//! ModeOrchestrator.

use glam::{Vec2, Vec3};
use serde_json::json;

use scene_controls::config::ControlConfiguration;
use scene_controls::control::{ControlContext, Controller, Planar2DController, PlanarStrategy};
use scene_controls::input::{InputEvent, InputRouter, KeyCode, ModifierState, MouseButton, Position};
use scene_controls::orchestrator::{Dimension, ModeOrchestrator};
use scene_controls::scene::{EntityId, EntityInfo, MemoryScene, OrthoCamera2D, SceneGraph, Transform};

// ============================================================================
// Helpers
// ============================================================================

fn sprite_scene(position: Vec3) -> (MemoryScene, EntityId) {
    let mut scene =
        MemoryScene::new().with_camera_2d(OrthoCamera2D::new(Vec2::new(800.0, 600.0), 32.0));
    let sprite = scene.add_entity(
        EntityInfo {
            name: "Sprite".into(),
            is_controllable: true,
            ..Default::default()
        },
        Transform::from_position(position),
    );
    (scene, sprite)
}

fn grid_config(tile_size: f32, speed: f32) -> ControlConfiguration {
    let mut config = ControlConfiguration::default();
    config.enable_grid(tile_size).set_speed(speed);
    config
}

fn tap(controller: &mut Planar2DController, ctx: &mut ControlContext<'_>, key: KeyCode) {
    controller.handle_input(&InputEvent::KeyDown(key), ctx).unwrap();
    controller.handle_input(&InputEvent::KeyUp(key), ctx).unwrap();
}

fn frames_until_step_lands(
    controller: &mut Planar2DController,
    ctx: &mut ControlContext<'_>,
    dt: f32,
) -> u32 {
    let mut frames = 0;
    loop {
        controller.update(dt, ctx).unwrap();
        frames += 1;
        if !controller.grid().is_moving {
            return frames;
        }
        assert!(frames < 1000, "grid step never finished");
    }
}

// ============================================================================
// Grid movement
// ============================================================================

#[test]
fn test_grid_tap_moves_exactly_one_tile() {
    let (mut scene, sprite) = sprite_scene(Vec3::new(4.0, 2.0, 0.0));
    let mut input = InputRouter::new();
    let mut controller = Planar2DController::new(sprite, grid_config(1.0, 5.0));
    assert_eq!(controller.strategy(), PlanarStrategy::Grid);

    let mut ctx = ControlContext::new(&mut scene, &mut input);
    controller.enable(&mut ctx).unwrap();
    tap(&mut controller, &mut ctx, KeyCode::KeyD);

    controller.update(0.1, &mut ctx).unwrap();
    assert!(controller.grid().is_moving);
    assert_eq!(controller.grid().progress, 0.5);

    controller.update(0.1, &mut ctx).unwrap();
    assert!(!controller.grid().is_moving);
    assert_eq!(ctx.scene.transform(sprite).unwrap().position, Vec3::new(5.0, 2.0, 0.0));

    // A released tap yields one step only
    controller.update(0.1, &mut ctx).unwrap();
    assert_eq!(ctx.scene.transform(sprite).unwrap().position, Vec3::new(5.0, 2.0, 0.0));
}

#[test]
fn test_grid_step_takes_tile_over_speed_seconds() {
    let (tile, speed, dt) = (2.0, 4.0, 1.0 / 120.0);
    let (mut scene, sprite) = sprite_scene(Vec3::ZERO);
    let mut input = InputRouter::new();
    let mut controller = Planar2DController::new(sprite, grid_config(tile, speed));
    let mut ctx = ControlContext::new(&mut scene, &mut input);
    controller.enable(&mut ctx).unwrap();
    tap(&mut controller, &mut ctx, KeyCode::KeyW);

    // 0.5 s at 120 Hz
    let frames = frames_until_step_lands(&mut controller, &mut ctx, dt);
    assert_eq!(frames, 60);
    assert_eq!(ctx.scene.transform(sprite).unwrap().position, Vec3::new(0.0, 2.0, 0.0));
}

#[test]
fn test_grid_step_at_60hz_lands_on_twelfth_frame() {
    let (mut scene, sprite) = sprite_scene(Vec3::ZERO);
    let mut input = InputRouter::new();
    let mut controller = Planar2DController::new(sprite, grid_config(1.0, 5.0));
    let mut ctx = ControlContext::new(&mut scene, &mut input);
    controller.enable(&mut ctx).unwrap();
    tap(&mut controller, &mut ctx, KeyCode::KeyD);

    // 0.2 s at 60 Hz
    let frames = frames_until_step_lands(&mut controller, &mut ctx, 1.0 / 60.0);
    assert_eq!(frames, 12);
    assert_eq!(ctx.scene.transform(sprite).unwrap().position, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(controller.grid().progress, 1.0);
}

#[test]
fn test_grid_eases_between_tiles() {
    let (mut scene, sprite) = sprite_scene(Vec3::ZERO);
    let mut input = InputRouter::new();
    let mut controller = Planar2DController::new(sprite, grid_config(1.0, 1.0));
    let mut ctx = ControlContext::new(&mut scene, &mut input);
    controller.enable(&mut ctx).unwrap();
    tap(&mut controller, &mut ctx, KeyCode::KeyD);

    // Quadratic ease-in: a quarter of the way in time is 1/8 of the distance
    controller.update(0.25, &mut ctx).unwrap();
    let x = ctx.scene.transform(sprite).unwrap().position.x;
    assert!((x - 0.125).abs() < 1e-5);
}

#[test]
fn test_most_recent_axis_wins_when_both_held() {
    let (mut scene, sprite) = sprite_scene(Vec3::ZERO);
    let mut input = InputRouter::new();
    let mut controller = Planar2DController::new(sprite, grid_config(1.0, 5.0));
    let mut ctx = ControlContext::new(&mut scene, &mut input);
    controller.enable(&mut ctx).unwrap();

    controller.handle_input(&InputEvent::KeyDown(KeyCode::KeyD), &mut ctx).unwrap();
    controller.handle_input(&InputEvent::KeyDown(KeyCode::KeyW), &mut ctx).unwrap();
    controller.update(0.01, &mut ctx).unwrap();
    assert_eq!(controller.grid().target, Vec3::new(0.0, 1.0, 0.0));
}

// ============================================================================
// Continuous movement
// ============================================================================

#[test]
fn test_vertical_key_jumps_under_gravity() {
    let (mut scene, sprite) = sprite_scene(Vec3::ZERO);
    let mut input = InputRouter::new();
    let mut config = ControlConfiguration::default();
    config.set_gravity(20.0, 8.0);
    let mut controller = Planar2DController::new(sprite, config);
    let mut ctx = ControlContext::new(&mut scene, &mut input);
    controller.enable(&mut ctx).unwrap();
    assert!(controller.is_grounded());

    controller.handle_input(&InputEvent::KeyDown(KeyCode::ArrowUp), &mut ctx).unwrap();
    controller.update(1.0 / 60.0, &mut ctx).unwrap();
    controller.handle_input(&InputEvent::KeyUp(KeyCode::ArrowUp), &mut ctx).unwrap();
    assert!(!controller.is_grounded());
    assert!(ctx.scene.transform(sprite).unwrap().position.y > 0.0);

    // Lands back on the starting height
    for _ in 0..240 {
        controller.update(1.0 / 60.0, &mut ctx).unwrap();
    }
    assert!(controller.is_grounded());
    assert_eq!(ctx.scene.transform(sprite).unwrap().position.y, 0.0);
}

// ============================================================================
// Click to move
// ============================================================================

#[test]
fn test_click_target_lands_exactly() {
    let (mut scene, sprite) = sprite_scene(Vec3::ZERO);
    let mut input = InputRouter::new();
    let mut config = ControlConfiguration::default();
    config.enable_click_to_move(0.2);
    let mut controller = Planar2DController::new(sprite, config);
    let mut ctx = ControlContext::new(&mut scene, &mut input);
    controller.enable(&mut ctx).unwrap();

    let target = Vec2::new(3.05, 0.0);
    controller.move_to(target);
    for _ in 0..10 {
        controller.update(0.1, &mut ctx).unwrap();
    }

    assert_eq!(controller.click_target(), None);
    assert_eq!(ctx.scene.transform(sprite).unwrap().position, Vec3::new(3.05, 0.0, 0.0));
    assert_eq!(controller.velocity(), Vec2::ZERO);
}

#[test]
fn test_click_is_ignored_when_disabled_in_config() {
    let (_, sprite) = sprite_scene(Vec3::ZERO);
    let mut controller = Planar2DController::new(sprite, ControlConfiguration::default());
    controller.move_to(Vec2::new(1.0, 1.0));
    assert_eq!(controller.click_target(), None);
}

#[test]
fn test_orchestrated_click_walks_to_world_point() {
    let (mut scene, sprite) = sprite_scene(Vec3::ZERO);
    scene.info_mut(sprite).unwrap().control_settings =
        Some(json!({ "movement": { "clickToMove": true } }));

    let mut orchestrator = ModeOrchestrator::new(Dimension::Planar);
    orchestrator.start(&mut scene).unwrap();

    // 32 px per unit around the viewport center: (2, 1) in world space
    let click = InputEvent::PointerDown {
        button: MouseButton::Left,
        position: Position::new(464.0, 268.0),
        modifiers: ModifierState::default(),
    };
    assert!(orchestrator.handle_input(&click, &mut scene).unwrap().is_consumed());

    for _ in 0..60 {
        orchestrator.update(1.0 / 60.0, &mut scene).unwrap();
    }
    assert_eq!(scene.transform(sprite).unwrap().position, Vec3::new(2.0, 1.0, 0.0));
}

#[test]
fn test_orchestrated_grid_step() {
    let (mut scene, sprite) = sprite_scene(Vec3::ZERO);
    scene.info_mut(sprite).unwrap().control_settings =
        Some(json!({ "movement": { "gridMovement": true, "tileSize": 1.0, "speed": 5.0 } }));

    let mut orchestrator = ModeOrchestrator::new(Dimension::Planar);
    orchestrator.start(&mut scene).unwrap();
    orchestrator
        .handle_input(&InputEvent::KeyDown(KeyCode::KeyD), &mut scene)
        .unwrap();
    orchestrator
        .handle_input(&InputEvent::KeyUp(KeyCode::KeyD), &mut scene)
        .unwrap();

    orchestrator.update(0.1, &mut scene).unwrap();
    orchestrator.update(0.1, &mut scene).unwrap();
    assert_eq!(scene.transform(sprite).unwrap().position, Vec3::new(1.0, 0.0, 0.0));

    orchestrator.stop(&mut scene).unwrap();
    assert_eq!(scene.transform(sprite).unwrap().position, Vec3::ZERO);
}

#[test]
fn test_modified_click_does_not_move() {
    let (mut scene, sprite) = sprite_scene(Vec3::ZERO);
    let mut input = InputRouter::new();
    let mut config = ControlConfiguration::default();
    config.enable_click_to_move(0.2);
    let mut controller = Planar2DController::new(sprite, config);
    let mut ctx = ControlContext::new(&mut scene, &mut input);
    controller.enable(&mut ctx).unwrap();

    let click = InputEvent::PointerDown {
        button: MouseButton::Left,
        position: Position::new(500.0, 300.0),
        modifiers: ModifierState {
            ctrl: true,
            ..Default::default()
        },
    };
    let response = controller.handle_input(&click, &mut ctx).unwrap();
    assert!(!response.is_consumed());
    assert_eq!(controller.click_target(), None);
}
