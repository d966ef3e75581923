//! Scene Controls Library
//!
//! Control schemes and cameras for a scene runtime: pick a scheme from the
//! controllable entity's settings, drive its movement and camera every
//! frame, and restore the scene when play stops.
//!
//! # Modules
//!
//! - [`orchestrator`] - Scheme selection, controller lifecycle, frame scheduling
//! - [`camera`] - Orbit, first-person and free cameras; raycasting; smoothing
//! - [`control`] - Controller interface and movement controllers (3D, click, 2D)
//! - [`input`] - Input events, key bindings, listener routing, winit adapter
//! - [`config`] - Control configuration and camera settings (serde)
//! - [`scene`] - The scene graph interface and an in-memory implementation
//!
//! # Example
//!
//! ```ignore
//! use scene_controls::input::{InputEvent, KeyCode};
//! use scene_controls::orchestrator::{Dimension, ModeOrchestrator};
//! use scene_controls::scene::{EntityInfo, MemoryScene, Transform};
//!
//! let mut scene = MemoryScene::new();
//! scene.add_entity(
//!     EntityInfo { name: "Hero".into(), is_controllable: true, ..Default::default() },
//!     Transform::default(),
//! );
//!
//! let mut orchestrator = ModeOrchestrator::new(Dimension::Spatial);
//! orchestrator.start(&mut scene)?;
//!
//! orchestrator.handle_input(&InputEvent::KeyDown(KeyCode::KeyW), &mut scene)?;
//! orchestrator.frame(1.0 / 60.0, &mut scene)?;
//!
//! orchestrator.stop(&mut scene)?;
//! ```

pub mod camera;
pub mod config;
pub mod control;
pub mod input;
pub mod orchestrator;
pub mod scene;

// Re-export the types most hosts need
pub use config::{CameraSettings, ControlConfiguration};
pub use control::{ControlContext, Controller, ControllerRole};
pub use input::{InputEvent, InputResponse, KeyCode, MouseButton};
pub use orchestrator::{ControlScheme, Dimension, ModeOrchestrator, OrchestratorState};
pub use scene::{EntityId, MemoryScene, SceneError, SceneGraph, Transform};
