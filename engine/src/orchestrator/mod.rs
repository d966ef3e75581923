//! Mode Orchestrator
//!
//! Picks the control scheme for a scene, builds and enables the
//! controllers it needs, forwards frames and input to them, and restores
//! the scene when stopped.
//!
//! # Scheme selection (spatial scenes)
//!
//! | entity `cameraMode` | movement             | camera            |
//! |---------------------|----------------------|-------------------|
//! | `firstPerson`       | CharacterController  | FirstPersonCamera |
//! | `clickToMove`       | PointNavigator       | OrbitCamera       |
//! | anything else       | CharacterController  | OrbitCamera       |
//! | no entity           | -                    | FreeCamera        |
//!
//! Planar scenes get a single `Planar2DController`.

pub mod scheduler;

pub use scheduler::{FrameScheduler, FrameTicks, GameLoopScheduler};

use crate::camera::{FirstPersonCamera, FreeCamera, OrbitCamera, OrbitLimits};
use crate::config::{CameraSettings, ControlConfiguration, CursorStyle};
use crate::control::{
    CharacterController, ControlContext, Controller, ControllerRole, Planar2DController,
    PointNavigator,
};
use crate::input::{InputEvent, InputResponse, InputRouter};
use crate::scene::{EntityId, EntityInfo, SceneError, SceneGraph, Transform};

/// Whether the scene is 3D or 2D.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Spatial,
    Planar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlScheme {
    FirstPerson,
    ThirdPerson,
    ClickToMove,
    /// No controllable entity; fly camera only
    Free,
    Planar,
}

impl ControlScheme {
    /// Scheme for an entity's stored camera mode.
    pub fn from_camera_mode(mode: Option<&str>) -> Self {
        match mode {
            Some("firstPerson") => ControlScheme::FirstPerson,
            Some("clickToMove") => ControlScheme::ClickToMove,
            _ => ControlScheme::ThirdPerson,
        }
    }

    /// Cursor for this scheme; an explicitly configured style wins.
    pub fn cursor_style(self, configured: CursorStyle) -> CursorStyle {
        if configured != CursorStyle::Default {
            return configured;
        }
        match self {
            ControlScheme::FirstPerson => CursorStyle::Crosshair,
            ControlScheme::ClickToMove => CursorStyle::Pointer,
            _ => CursorStyle::Default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Stopped,
    Running,
}

pub struct ModeOrchestrator {
    dimension: Dimension,
    state: OrchestratorState,
    scheme: Option<ControlScheme>,
    /// Active controllers in creation order (movement first)
    controllers: Vec<Box<dyn Controller>>,
    input: InputRouter,
    scheduler: Box<dyn GameLoopScheduler>,
    /// Transforms captured at start, restored at stop
    snapshot: Vec<(EntityId, Transform)>,
    entity: Option<EntityId>,
    camera: Option<EntityId>,
    orbit_limits: OrbitLimits,
}

impl ModeOrchestrator {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            state: OrchestratorState::Stopped,
            scheme: None,
            controllers: Vec::new(),
            input: InputRouter::new(),
            scheduler: Box::new(FrameScheduler::default()),
            snapshot: Vec::new(),
            entity: None,
            camera: None,
            orbit_limits: OrbitLimits::default(),
        }
    }

    pub fn with_scheduler(mut self, scheduler: Box<dyn GameLoopScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Limits used for every orbit camera this orchestrator builds.
    pub fn with_orbit_limits(mut self, limits: OrbitLimits) -> Self {
        self.orbit_limits = limits;
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == OrchestratorState::Running
    }

    pub fn scheme(&self) -> Option<ControlScheme> {
        self.scheme
    }

    /// The controlled entity, if one was found.
    pub fn controlled_entity(&self) -> Option<EntityId> {
        self.entity
    }

    /// The 3D camera in use.
    pub fn camera(&self) -> Option<EntityId> {
        self.camera
    }

    pub fn controller_names(&self) -> Vec<&'static str> {
        self.controllers.iter().map(|c| c.name()).collect()
    }

    /// First active controller of type `T`.
    pub fn controller<T: 'static>(&self) -> Option<&T> {
        self.controllers
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<T>())
    }

    pub fn input(&self) -> &InputRouter {
        &self.input
    }

    /// Input listeners currently attached.
    pub fn listener_count(&self) -> usize {
        self.input.listener_count()
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Detect the scheme, build and enable its controllers, start the
    /// scheduler. Does nothing while already running.
    pub fn start(&mut self, scene: &mut dyn SceneGraph) -> Result<(), SceneError> {
        if self.is_running() {
            return Ok(());
        }

        if let Err(err) = self.build(scene) {
            // Leave nothing half-enabled behind
            if let Err(cleanup) = self.teardown(scene) {
                log::warn!("cleanup after failed start: {}", cleanup);
            }
            return Err(err);
        }

        self.scheduler.start();
        self.state = OrchestratorState::Running;
        log::info!(
            "control started: {:?} with [{}]",
            self.scheme,
            self.controller_names().join(", ")
        );
        Ok(())
    }

    /// Disable controllers in reverse creation order, restore the
    /// snapshotted transforms, stop the scheduler. Does nothing while
    /// stopped.
    pub fn stop(&mut self, scene: &mut dyn SceneGraph) -> Result<(), SceneError> {
        if !self.is_running() {
            return Ok(());
        }

        let result = self.teardown(scene);
        self.scheduler.stop();
        self.state = OrchestratorState::Stopped;
        log::info!("control stopped");
        result
    }

    fn build(&mut self, scene: &mut dyn SceneGraph) -> Result<(), SceneError> {
        let controlled = find_controllable(scene)?;
        match self.dimension {
            Dimension::Spatial => self.build_spatial(scene, controlled)?,
            Dimension::Planar => self.build_planar(scene, controlled)?,
        }

        let mut ctx = ControlContext::new(scene, &mut self.input);
        for controller in self.controllers.iter_mut() {
            controller.enable(&mut ctx)?;
        }
        Ok(())
    }

    fn build_spatial(
        &mut self,
        scene: &mut dyn SceneGraph,
        controlled: Option<(EntityId, EntityInfo)>,
    ) -> Result<(), SceneError> {
        let camera = find_camera(scene, controlled.as_ref().map(|(id, _)| *id))?;
        self.camera = Some(camera);
        self.snapshot.push((camera, scene.transform(camera)?));

        let Some((entity, info)) = controlled else {
            log::info!("no controllable entity, using free camera");
            self.scheme = Some(ControlScheme::Free);
            self.controllers
                .push(Box::new(FreeCamera::new(camera, ControlConfiguration::default())));
            return Ok(());
        };

        self.entity = Some(entity);
        self.snapshot.push((entity, scene.transform(entity)?));

        let config = load_control_config(&info);
        let settings = load_camera_settings(&info);
        let scheme = ControlScheme::from_camera_mode(info.camera_mode.as_deref());
        self.scheme = Some(scheme);
        scene.set_cursor_style(scheme.cursor_style(config.cursor));

        match scheme {
            ControlScheme::FirstPerson => {
                let mut walk = config.clone();
                walk.movement.grid_movement = false;
                walk.movement.click_to_move = false;
                self.controllers.push(Box::new(
                    CharacterController::new(entity, camera, walk).with_face_movement(false),
                ));
                self.controllers.push(Box::new(FirstPersonCamera::new(
                    camera,
                    entity,
                    &settings,
                    &config.mouse,
                )));
            }
            ControlScheme::ClickToMove => {
                let orbit = self.orbit(camera, entity, &settings, &config);
                self.controllers
                    .push(Box::new(PointNavigator::new(entity, camera, config)));
                self.controllers.push(Box::new(orbit));
            }
            _ => {
                let orbit = self.orbit(camera, entity, &settings, &config);
                self.controllers
                    .push(Box::new(CharacterController::new(entity, camera, config)));
                self.controllers.push(Box::new(orbit));
            }
        }
        Ok(())
    }

    fn build_planar(
        &mut self,
        scene: &mut dyn SceneGraph,
        controlled: Option<(EntityId, EntityInfo)>,
    ) -> Result<(), SceneError> {
        let Some((entity, info)) = controlled else {
            log::warn!("planar scene has no controllable entity; nothing to control");
            return Ok(());
        };

        self.entity = Some(entity);
        self.snapshot.push((entity, scene.transform(entity)?));

        let config = load_control_config(&info);
        self.scheme = Some(ControlScheme::Planar);
        scene.set_cursor_style(ControlScheme::Planar.cursor_style(config.cursor));
        self.controllers
            .push(Box::new(Planar2DController::new(entity, config)));
        Ok(())
    }

    fn orbit(
        &self,
        camera: EntityId,
        entity: EntityId,
        settings: &CameraSettings,
        config: &ControlConfiguration,
    ) -> OrbitCamera {
        OrbitCamera::new(camera, entity, settings, config).with_limits(self.orbit_limits)
    }

    /// Disable everything, restore the snapshot and clear references.
    /// Every step runs even if an earlier one fails; the first error wins.
    fn teardown(&mut self, scene: &mut dyn SceneGraph) -> Result<(), SceneError> {
        let mut first_error = None;

        {
            let mut ctx = ControlContext::new(scene, &mut self.input);
            for controller in self.controllers.iter_mut().rev() {
                if let Err(err) = controller.disable(&mut ctx) {
                    first_error.get_or_insert(err);
                }
            }
        }
        self.controllers.clear();

        for (id, transform) in self.snapshot.drain(..) {
            if let Err(err) = scene.set_transform(id, transform) {
                first_error.get_or_insert(err);
            }
        }
        scene.set_cursor_style(CursorStyle::Default);

        self.scheme = None;
        self.entity = None;
        self.camera = None;

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    // ========================================================================
    // PER-FRAME
    // ========================================================================

    /// Variable-rate update: movement controllers first, then the camera.
    pub fn update(&mut self, dt: f32, scene: &mut dyn SceneGraph) -> Result<(), SceneError> {
        if !self.is_running() {
            return Ok(());
        }
        let mut ctx = ControlContext::new(scene, &mut self.input);
        for role in [ControllerRole::Movement, ControllerRole::Camera] {
            for controller in self.controllers.iter_mut().filter(|c| c.role() == role) {
                controller.update(dt, &mut ctx)?;
            }
        }
        Ok(())
    }

    pub fn fixed_update(&mut self, fixed_dt: f32, scene: &mut dyn SceneGraph) -> Result<(), SceneError> {
        if !self.is_running() {
            return Ok(());
        }
        let mut ctx = ControlContext::new(scene, &mut self.input);
        for controller in self.controllers.iter_mut() {
            controller.fixed_update(fixed_dt, &mut ctx)?;
        }
        Ok(())
    }

    /// Drive one rendered frame through the scheduler.
    pub fn frame(
        &mut self,
        frame_dt: f32,
        scene: &mut dyn SceneGraph,
    ) -> Result<Option<FrameTicks>, SceneError> {
        let Some(ticks) = self.scheduler.advance(frame_dt) else {
            return Ok(None);
        };
        self.update(ticks.dt, scene)?;
        for _ in 0..ticks.fixed_steps {
            self.fixed_update(ticks.fixed_dt, scene)?;
        }
        Ok(Some(ticks))
    }

    /// Deliver an event to every controller listening on its channel.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        scene: &mut dyn SceneGraph,
    ) -> Result<InputResponse, SceneError> {
        let mut response = InputResponse::Ignored;
        if !self.is_running() {
            return Ok(response);
        }

        let mut ctx = ControlContext::new(scene, &mut self.input);
        for controller in self.controllers.iter_mut() {
            let Some(listener) = controller.listener() else {
                continue;
            };
            if !ctx.input.accepts(listener, event) {
                continue;
            }
            response = response.merge(controller.handle_input(event, &mut ctx)?);
        }
        Ok(response)
    }
}

// ============================================================================
// SCENE DETECTION
// ============================================================================

/// The first non-locked controllable entity. Extra candidates are ignored.
fn find_controllable(
    scene: &dyn SceneGraph,
) -> Result<Option<(EntityId, EntityInfo)>, SceneError> {
    let mut found: Option<(EntityId, EntityInfo)> = None;
    for id in scene.entities()? {
        let info = scene.entity_info(id)?;
        if !info.is_controllable || info.locked || info.is_camera() {
            continue;
        }
        match &found {
            None => found = Some((id, info)),
            Some((_, first)) => log::warn!(
                "more than one controllable entity; using '{}', ignoring '{}'",
                first.name,
                info.name
            ),
        }
    }
    Ok(found)
}

/// Primary camera, else a camera parented to the entity, else the scene's
/// default camera.
fn find_camera(scene: &mut dyn SceneGraph, entity: Option<EntityId>) -> Result<EntityId, SceneError> {
    let mut child_camera = None;
    for id in scene.entities()? {
        let info = scene.entity_info(id)?;
        if !info.is_camera() {
            continue;
        }
        if info.is_primary_camera {
            return Ok(id);
        }
        if child_camera.is_none() && entity.is_some() && info.parent == entity {
            child_camera = Some(id);
        }
    }
    match child_camera {
        Some(id) => Ok(id),
        None => scene.default_camera(),
    }
}

fn load_control_config(info: &EntityInfo) -> ControlConfiguration {
    let Some(overrides) = &info.control_settings else {
        return ControlConfiguration::default();
    };
    ControlConfiguration::from_overrides(overrides).unwrap_or_else(|err| {
        log::warn!("'{}': invalid controlSettings ({}), using defaults", info.name, err);
        ControlConfiguration::default()
    })
}

fn load_camera_settings(info: &EntityInfo) -> CameraSettings {
    let Some(overrides) = &info.camera_settings else {
        return CameraSettings::default();
    };
    CameraSettings::from_overrides(overrides).unwrap_or_else(|err| {
        log::warn!("'{}': invalid cameraSettings ({}), using defaults", info.name, err);
        CameraSettings::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;
    use serde_json::json;

    #[test]
    fn test_scheme_from_camera_mode() {
        assert_eq!(
            ControlScheme::from_camera_mode(Some("firstPerson")),
            ControlScheme::FirstPerson
        );
        assert_eq!(
            ControlScheme::from_camera_mode(Some("clickToMove")),
            ControlScheme::ClickToMove
        );
        assert_eq!(
            ControlScheme::from_camera_mode(Some("orbit")),
            ControlScheme::ThirdPerson
        );
        assert_eq!(ControlScheme::from_camera_mode(None), ControlScheme::ThirdPerson);
    }

    #[test]
    fn test_cursor_style_prefers_configured() {
        assert_eq!(
            ControlScheme::FirstPerson.cursor_style(CursorStyle::Default),
            CursorStyle::Crosshair
        );
        assert_eq!(
            ControlScheme::FirstPerson.cursor_style(CursorStyle::Hidden),
            CursorStyle::Hidden
        );
    }

    #[test]
    fn test_locked_and_extra_entities_skipped() {
        let mut scene = MemoryScene::new();
        scene.add_entity(
            EntityInfo {
                name: "Statue".into(),
                is_controllable: true,
                locked: true,
                ..Default::default()
            },
            Transform::default(),
        );
        let hero = scene.add_entity(
            EntityInfo {
                name: "Hero".into(),
                is_controllable: true,
                ..Default::default()
            },
            Transform::default(),
        );
        scene.add_entity(
            EntityInfo {
                name: "Sidekick".into(),
                is_controllable: true,
                ..Default::default()
            },
            Transform::default(),
        );

        let (found, _) = find_controllable(&scene).unwrap().unwrap();
        assert_eq!(found, hero);
    }

    #[test]
    fn test_camera_parented_to_entity() {
        let mut scene = MemoryScene::new();
        let hero = scene.add_entity(
            EntityInfo {
                name: "Hero".into(),
                is_controllable: true,
                ..Default::default()
            },
            Transform::default(),
        );
        scene.add_camera("Other", Transform::default(), Default::default(), false);
        let child = scene.add_camera("Head", Transform::default(), Default::default(), false);
        if let Some(info) = scene.info_mut(child) {
            info.parent = Some(hero);
        }

        assert_eq!(find_camera(&mut scene, Some(hero)).unwrap(), child);
    }

    #[test]
    fn test_invalid_overrides_fall_back_to_defaults() {
        let info = EntityInfo {
            name: "Hero".into(),
            control_settings: Some(json!({ "movement": { "speed": "fast" } })),
            camera_settings: Some(json!({ "fov": -5.0 })),
            ..Default::default()
        };
        assert_eq!(load_control_config(&info), ControlConfiguration::default());
        assert_eq!(load_camera_settings(&info), CameraSettings::default());
    }

    #[test]
    fn test_not_running_ignores_frames_and_input() {
        let mut scene = MemoryScene::new();
        let mut orchestrator = ModeOrchestrator::new(Dimension::Spatial);
        assert_eq!(orchestrator.frame(0.016, &mut scene).unwrap(), None);
        let response = orchestrator
            .handle_input(&InputEvent::FocusLost, &mut scene)
            .unwrap();
        assert_eq!(response, InputResponse::Ignored);
    }
}
