//! Control Module
//!
//! The [`Controller`] interface every movement and camera controller
//! implements, plus the movement controllers themselves.
//!
//! # Lifecycle
//!
//! ```text
//! enable(ctx)  -> attach input listener, reset transient state
//! handle_input -> only called while the listener is attached
//! update(dt)   -> once per rendered frame
//! fixed_update -> at fixed cadence (pass-through, reserved for physics)
//! disable(ctx) -> detach listener, drop transient visuals; idempotent
//! ```

pub mod character;
pub mod grid;
pub mod intent;
pub mod navigator;
pub mod planar;
pub mod vertical;

pub use character::{CharacterController, MovementStrategy};
pub use grid::GridTransition;
pub use intent::{Axis, KeyTracker, MovementIntent};
pub use navigator::PointNavigator;
pub use planar::{Planar2DController, PlanarStrategy};
pub use vertical::VerticalMotion;

use std::any::Any;

use crate::input::{InputEvent, InputResponse, InputRouter, ListenerId};
use crate::scene::{SceneError, SceneGraph};

/// What a controller drives. Movement controllers update before camera
/// controllers within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerRole {
    Movement,
    Camera,
}

/// Collaborators handed to a controller for the duration of one call.
pub struct ControlContext<'a> {
    pub scene: &'a mut dyn SceneGraph,
    pub input: &'a mut InputRouter,
}

impl<'a> ControlContext<'a> {
    pub fn new(scene: &'a mut dyn SceneGraph, input: &'a mut InputRouter) -> Self {
        Self { scene, input }
    }
}

/// Common interface of movement and camera controllers.
pub trait Controller {
    fn name(&self) -> &'static str;
    fn role(&self) -> ControllerRole;

    fn enable(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError>;

    /// Release listeners and transient visuals. Calling it again is a no-op.
    fn disable(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError>;

    fn is_enabled(&self) -> bool;

    /// Listener registered while enabled.
    fn listener(&self) -> Option<ListenerId>;

    fn handle_input(
        &mut self,
        event: &InputEvent,
        ctx: &mut ControlContext<'_>,
    ) -> Result<InputResponse, SceneError>;

    fn update(&mut self, dt: f32, ctx: &mut ControlContext<'_>) -> Result<(), SceneError>;

    fn fixed_update(&mut self, _fixed_dt: f32, _ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;
}

static_assertions::assert_obj_safe!(Controller);

/// Detach `listener` if present. Shared by every `disable()`.
pub(crate) fn release_listener(input: &mut InputRouter, listener: &mut Option<ListenerId>) {
    if let Some(id) = listener.take() {
        input.detach(id);
    }
}
