//! Input Module
//!
//! Platform-agnostic input handling: physical key codes, pointer and touch
//! events, key-to-action bindings and the listener router controllers attach
//! to while enabled. The winit adapter is the only windowing-system bridge.
//!
//! # Example
//!
//! ```rust,ignore
//! use scene_controls::input::{InputEvent, InputRouter, ChannelSet, KeyCode};
//!
//! let mut router = InputRouter::new();
//! let id = router.attach("my-controller", ChannelSet::KEYBOARD);
//! assert!(router.accepts(id, &InputEvent::KeyDown(KeyCode::KeyW)));
//! router.detach(id);
//! ```

pub mod bindings;
pub mod events;
pub mod keyboard;
pub mod mouse;
pub mod router;
pub mod winit_adapter;

pub use bindings::{InputAction, KeyBindings, RESET_CAMERA_KEY};
pub use events::{InputChannel, InputEvent, InputResponse};
pub use keyboard::{KeyCode, ModifierState};
pub use mouse::{MouseButton, Position, ScrollDelta};
pub use router::{ChannelSet, InputRouter, ListenerId};
pub use winit_adapter::WinitInputAdapter;
