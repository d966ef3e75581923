//! Input Events
//!
//! The event vocabulary delivered to controllers. An `InputSource` (a window
//! adapter, a test script, a replay) produces these; the orchestrator routes
//! them to every controller holding a listener on the event's channel.

use super::{KeyCode, ModifierState, MouseButton, Position, ScrollDelta};

/// Broad category of an input event, used for listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputChannel {
    Keyboard,
    Pointer,
    Wheel,
    Touch,
}

/// A single discrete input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    PointerDown {
        button: MouseButton,
        position: Position,
        modifiers: ModifierState,
    },
    PointerMove {
        position: Position,
        /// Relative motion; set by pointer-lock sources, otherwise derived
        /// from consecutive positions by the receiver.
        movement: Option<(f32, f32)>,
    },
    PointerUp {
        button: MouseButton,
        position: Position,
    },
    /// Secondary-click context menu request (suppressed by navigation).
    ContextMenu { position: Position },
    Wheel(ScrollDelta),
    /// All active touch points after a finger went down.
    TouchStart(Vec<Position>),
    /// All active touch points after motion.
    TouchMove(Vec<Position>),
    /// Remaining touch points after a finger lifted.
    TouchEnd(Vec<Position>),
    /// Window lost focus; held keys and buttons must be treated as released.
    /// Delivered to every listener regardless of channel.
    FocusLost,
}

impl InputEvent {
    /// Channel this event is delivered on.
    pub fn channel(&self) -> InputChannel {
        match self {
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) | InputEvent::FocusLost => {
                InputChannel::Keyboard
            }
            InputEvent::PointerDown { .. }
            | InputEvent::PointerMove { .. }
            | InputEvent::PointerUp { .. }
            | InputEvent::ContextMenu { .. } => InputChannel::Pointer,
            InputEvent::Wheel(_) => InputChannel::Wheel,
            InputEvent::TouchStart(_) | InputEvent::TouchMove(_) | InputEvent::TouchEnd(_) => {
                InputChannel::Touch
            }
        }
    }
}

/// What a controller did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResponse {
    /// Event was not relevant to the controller.
    Ignored,
    /// Event was used; the host should suppress its default action.
    Consumed,
}

impl InputResponse {
    pub fn is_consumed(self) -> bool {
        self == InputResponse::Consumed
    }

    /// Combine responses from several controllers.
    pub fn merge(self, other: InputResponse) -> InputResponse {
        if self.is_consumed() || other.is_consumed() {
            InputResponse::Consumed
        } else {
            InputResponse::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_channels() {
        assert_eq!(InputEvent::KeyDown(KeyCode::KeyW).channel(), InputChannel::Keyboard);
        assert_eq!(InputEvent::FocusLost.channel(), InputChannel::Keyboard);
        assert_eq!(
            InputEvent::ContextMenu {
                position: Position::default()
            }
            .channel(),
            InputChannel::Pointer
        );
        assert_eq!(InputEvent::Wheel(ScrollDelta::new(0.0, 1.0)).channel(), InputChannel::Wheel);
        assert_eq!(InputEvent::TouchEnd(Vec::new()).channel(), InputChannel::Touch);
    }

    #[test]
    fn test_response_merge() {
        use InputResponse::*;
        assert_eq!(Ignored.merge(Ignored), Ignored);
        assert_eq!(Ignored.merge(Consumed), Consumed);
        assert_eq!(Consumed.merge(Ignored), Consumed);
    }
}
