//! winit Input Adapter
//!
//! Translates `winit` window events into [`InputEvent`]s. This is the only
//! place the crate touches the windowing system; everything downstream works
//! with the platform-agnostic types in this module's parent.

use std::collections::BTreeMap;

use winit::event::{ElementState, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};

use super::{InputEvent, KeyCode, ModifierState, MouseButton, Position, ScrollDelta};

impl From<WinitKey> for KeyCode {
    fn from(key: WinitKey) -> Self {
        match key {
            WinitKey::KeyA => KeyCode::KeyA,
            WinitKey::KeyB => KeyCode::KeyB,
            WinitKey::KeyC => KeyCode::KeyC,
            WinitKey::KeyD => KeyCode::KeyD,
            WinitKey::KeyE => KeyCode::KeyE,
            WinitKey::KeyF => KeyCode::KeyF,
            WinitKey::KeyG => KeyCode::KeyG,
            WinitKey::KeyH => KeyCode::KeyH,
            WinitKey::KeyI => KeyCode::KeyI,
            WinitKey::KeyJ => KeyCode::KeyJ,
            WinitKey::KeyK => KeyCode::KeyK,
            WinitKey::KeyL => KeyCode::KeyL,
            WinitKey::KeyM => KeyCode::KeyM,
            WinitKey::KeyN => KeyCode::KeyN,
            WinitKey::KeyO => KeyCode::KeyO,
            WinitKey::KeyP => KeyCode::KeyP,
            WinitKey::KeyQ => KeyCode::KeyQ,
            WinitKey::KeyR => KeyCode::KeyR,
            WinitKey::KeyS => KeyCode::KeyS,
            WinitKey::KeyT => KeyCode::KeyT,
            WinitKey::KeyU => KeyCode::KeyU,
            WinitKey::KeyV => KeyCode::KeyV,
            WinitKey::KeyW => KeyCode::KeyW,
            WinitKey::KeyX => KeyCode::KeyX,
            WinitKey::KeyY => KeyCode::KeyY,
            WinitKey::KeyZ => KeyCode::KeyZ,
            WinitKey::Digit0 => KeyCode::Digit0,
            WinitKey::Digit1 => KeyCode::Digit1,
            WinitKey::Digit2 => KeyCode::Digit2,
            WinitKey::Digit3 => KeyCode::Digit3,
            WinitKey::Digit4 => KeyCode::Digit4,
            WinitKey::Digit5 => KeyCode::Digit5,
            WinitKey::Digit6 => KeyCode::Digit6,
            WinitKey::Digit7 => KeyCode::Digit7,
            WinitKey::Digit8 => KeyCode::Digit8,
            WinitKey::Digit9 => KeyCode::Digit9,
            WinitKey::ArrowUp => KeyCode::ArrowUp,
            WinitKey::ArrowDown => KeyCode::ArrowDown,
            WinitKey::ArrowLeft => KeyCode::ArrowLeft,
            WinitKey::ArrowRight => KeyCode::ArrowRight,
            WinitKey::ShiftLeft => KeyCode::ShiftLeft,
            WinitKey::ShiftRight => KeyCode::ShiftRight,
            WinitKey::ControlLeft => KeyCode::ControlLeft,
            WinitKey::ControlRight => KeyCode::ControlRight,
            WinitKey::AltLeft => KeyCode::AltLeft,
            WinitKey::AltRight => KeyCode::AltRight,
            WinitKey::Space => KeyCode::Space,
            WinitKey::Enter => KeyCode::Enter,
            WinitKey::Escape => KeyCode::Escape,
            WinitKey::Tab => KeyCode::Tab,
            WinitKey::Backspace => KeyCode::Backspace,
            WinitKey::Home => KeyCode::Home,
            WinitKey::End => KeyCode::End,
            WinitKey::PageUp => KeyCode::PageUp,
            WinitKey::PageDown => KeyCode::PageDown,
            _ => KeyCode::Unknown,
        }
    }
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            winit::event::MouseButton::Back => MouseButton::Other(3),
            winit::event::MouseButton::Forward => MouseButton::Other(4),
            winit::event::MouseButton::Other(n) => MouseButton::Other(n),
        }
    }
}

/// Stateful translator: winit reports cursor position and modifiers as
/// separate events, while [`InputEvent`] carries them on every pointer event.
#[derive(Debug, Default)]
pub struct WinitInputAdapter {
    cursor: Position,
    modifiers: ModifierState,
    touches: BTreeMap<u64, Position>,
}

impl WinitInputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate one window event. Returns `None` for events the control
    /// layer does not care about (and for key auto-repeat).
    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                let key = KeyCode::from(code);
                match event.state {
                    ElementState::Pressed if event.repeat => None,
                    ElementState::Pressed => Some(InputEvent::KeyDown(key)),
                    ElementState::Released => Some(InputEvent::KeyUp(key)),
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.modifiers = ModifierState {
                    shift: state.shift_key(),
                    ctrl: state.control_key(),
                    alt: state.alt_key(),
                    meta: state.super_key(),
                };
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Position::new(position.x as f32, position.y as f32);
                Some(InputEvent::PointerMove {
                    position: self.cursor,
                    movement: None,
                })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from(*button);
                match state {
                    ElementState::Pressed => Some(InputEvent::PointerDown {
                        button,
                        position: self.cursor,
                        modifiers: self.modifiers,
                    }),
                    ElementState::Released => Some(InputEvent::PointerUp {
                        button,
                        position: self.cursor,
                    }),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // winit: positive y scrolls away from the user (zoom in)
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(x, y) => ScrollDelta::new(-*x, -*y),
                    MouseScrollDelta::PixelDelta(p) => ScrollDelta::from_pixels(-p.x, -p.y),
                };
                if scroll.is_zero() {
                    None
                } else {
                    Some(InputEvent::Wheel(scroll))
                }
            }
            WindowEvent::Touch(touch) => {
                let location = Position::new(touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started => {
                        self.touches.insert(touch.id, location);
                        Some(InputEvent::TouchStart(self.touch_points()))
                    }
                    TouchPhase::Moved => {
                        self.touches.insert(touch.id, location);
                        Some(InputEvent::TouchMove(self.touch_points()))
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        self.touches.remove(&touch.id);
                        Some(InputEvent::TouchEnd(self.touch_points()))
                    }
                }
            }
            WindowEvent::Focused(false) => {
                self.touches.clear();
                Some(InputEvent::FocusLost)
            }
            _ => None,
        }
    }

    /// Translate raw device motion (pointer lock) into a relative move.
    pub fn translate_motion(&self, delta: (f64, f64)) -> InputEvent {
        InputEvent::PointerMove {
            position: self.cursor,
            movement: Some((delta.0 as f32, delta.1 as f32)),
        }
    }

    fn touch_points(&self) -> Vec<Position> {
        self.touches.values().copied().collect()
    }
}
