//! Camera Module
//!
//! Camera controllers and the math they share.
//!
//! - [`OrbitCamera`]: third-person orbit with a first-person blend
//! - [`FirstPersonCamera`]: mouse look from the entity's eyes
//! - [`FreeCamera`]: fly camera for scenes without a controllable entity
//! - [`raycast`]: screen-to-ground picking
//! - [`smoothing`]: exponential smoothing and angle helpers

pub mod first_person;
pub mod free;
pub mod orbit;
pub mod raycast;
pub mod smoothing;

pub use first_person::FirstPersonCamera;
pub use free::FreeCamera;
pub use orbit::{Framing, OrbitCamera, OrbitLimits};
pub use raycast::{Ray, raycast_to_plane, screen_ray};
