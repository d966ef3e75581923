//! Control Simulator - headless scene runner
//!
//! Run with: `cargo run --bin control_sim -- [scenario.json]`
//!
//! Loads a scene description and an input script, starts the orchestrator,
//! plays the script frame by frame and prints the controlled entity and
//! camera transforms. Without an argument a built-in third-person scenario
//! runs.
//!
//! Scenario format:
//!
//! ```json
//! {
//!   "dimension": "spatial",
//!   "frames": 120,
//!   "dt": 0.016666,
//!   "printEvery": 30,
//!   "scene": { "entities": [ ... ], "camera2d": { "viewport": [800, 600], "zoom": 32 } },
//!   "script": [
//!     { "frame": 0, "type": "keyDown", "key": "KeyW" },
//!     { "frame": 60, "type": "keyUp", "key": "KeyW" },
//!     { "frame": 70, "type": "click", "x": 640, "y": 400 }
//!   ]
//! }
//! ```
//!
//! Set `RUST_LOG=debug` to see controller logs.

use std::error::Error;
use std::fs;

use serde::Deserialize;
use serde_json::json;

use scene_controls::input::{InputEvent, KeyCode, ModifierState, MouseButton, Position, ScrollDelta};
use scene_controls::orchestrator::{Dimension, ModeOrchestrator};
use scene_controls::scene::{EntityId, MemoryScene, SceneDescription, SceneGraph};

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DimensionArg {
    Spatial,
    Planar,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ScriptAction {
    KeyDown { key: KeyCode },
    KeyUp { key: KeyCode },
    Click { x: f32, y: f32 },
    /// Right-button drag by a pixel delta
    Drag { dx: f32, dy: f32 },
    Wheel { delta: f32 },
}

#[derive(Debug, Clone, Deserialize)]
struct ScriptStep {
    frame: u32,
    #[serde(flatten)]
    action: ScriptAction,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Scenario {
    dimension: DimensionArg,
    frames: u32,
    dt: f32,
    #[serde(default = "default_print_every")]
    print_every: u32,
    scene: SceneDescription,
    #[serde(default)]
    script: Vec<ScriptStep>,
}

fn default_print_every() -> u32 {
    30
}

/// Third-person hero walking forward, then orbiting the camera.
fn builtin_scenario() -> Result<Scenario, serde_json::Error> {
    serde_json::from_value(json!({
        "dimension": "spatial",
        "frames": 120,
        "dt": 1.0 / 60.0,
        "printEvery": 20,
        "scene": {
            "entities": [
                {
                    "name": "Hero",
                    "isControllable": true,
                    "cameraMode": "thirdPerson",
                    "controlSettings": { "movement": { "speed": 4.0 } }
                },
                {
                    "name": "Main Camera",
                    "kind": "camera",
                    "isPrimaryCamera": true,
                    "transform": { "position": [0.0, 5.0, 10.0] }
                }
            ]
        },
        "script": [
            { "frame": 0, "type": "keyDown", "key": "KeyW" },
            { "frame": 60, "type": "keyUp", "key": "KeyW" },
            { "frame": 70, "type": "drag", "dx": 120.0, "dy": 0.0 },
            { "frame": 90, "type": "wheel", "delta": -3.0 }
        ]
    }))
}

/// Events a script step expands to.
fn events_for(action: &ScriptAction) -> Vec<InputEvent> {
    match *action {
        ScriptAction::KeyDown { key } => vec![InputEvent::KeyDown(key)],
        ScriptAction::KeyUp { key } => vec![InputEvent::KeyUp(key)],
        ScriptAction::Click { x, y } => vec![
            InputEvent::PointerDown {
                button: MouseButton::Left,
                position: Position::new(x, y),
                modifiers: ModifierState::default(),
            },
            InputEvent::PointerUp {
                button: MouseButton::Left,
                position: Position::new(x, y),
            },
        ],
        ScriptAction::Drag { dx, dy } => {
            let start = Position::new(400.0, 300.0);
            let end = Position::new(start.x + dx, start.y + dy);
            vec![
                InputEvent::PointerDown {
                    button: MouseButton::Right,
                    position: start,
                    modifiers: ModifierState::default(),
                },
                InputEvent::PointerMove {
                    position: end,
                    movement: None,
                },
                InputEvent::PointerUp {
                    button: MouseButton::Right,
                    position: end,
                },
            ]
        }
        ScriptAction::Wheel { delta } => vec![InputEvent::Wheel(ScrollDelta::new(0.0, delta))],
    }
}

fn print_transform(scene: &MemoryScene, label: &str, id: Option<EntityId>) {
    let Some(id) = id else {
        return;
    };
    if let Ok(t) = scene.transform(id) {
        println!(
            "    {:<8} pos=({:>7.3}, {:>7.3}, {:>7.3}) yaw={:>7.2}deg",
            label,
            t.position.x,
            t.position.y,
            t.position.z,
            t.yaw().to_degrees()
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let scenario = match std::env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str::<Scenario>(&text)?
        }
        None => builtin_scenario()?,
    };

    let dimension = match scenario.dimension {
        DimensionArg::Spatial => Dimension::Spatial,
        DimensionArg::Planar => Dimension::Planar,
    };

    let mut scene = MemoryScene::from_description(scenario.scene);
    let mut orchestrator = ModeOrchestrator::new(dimension);
    orchestrator.start(&mut scene)?;

    println!("=== Control Simulator ===");
    println!("Scheme: {:?}", orchestrator.scheme());
    println!("Controllers: {}", orchestrator.controller_names().join(", "));

    for frame in 0..scenario.frames {
        for step in scenario.script.iter().filter(|s| s.frame == frame) {
            for event in events_for(&step.action) {
                orchestrator.handle_input(&event, &mut scene)?;
            }
        }

        orchestrator.frame(scenario.dt, &mut scene)?;
        scene.track_camera_2d(scenario.dt);

        if scenario.print_every > 0 && frame % scenario.print_every == 0 {
            println!("[frame {:>4}]", frame);
            print_transform(&scene, "entity", orchestrator.controlled_entity());
            print_transform(&scene, "camera", orchestrator.camera());
        }
    }

    println!("Listeners before stop: {}", orchestrator.listener_count());
    orchestrator.stop(&mut scene)?;
    println!("Listeners after stop: {}", orchestrator.listener_count());
    Ok(())
}
