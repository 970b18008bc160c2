//! Event descriptors handed to the document for dispatch.

use crate::document::NodeId;
use crate::pointer::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive DOM event types emitted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// `pointerover`
    PointerOver,
    /// `pointerenter`
    PointerEnter,
    /// `mouseover`
    MouseOver,
    /// `mouseenter`
    MouseEnter,
    /// `pointermove`
    PointerMove,
    /// `mousemove`
    MouseMove,
    /// `pointerdown`
    PointerDown,
    /// `mousedown`
    MouseDown,
    /// `focus`
    Focus,
    /// `focusin`
    FocusIn,
    /// `pointerup`
    PointerUp,
    /// `mouseup`
    MouseUp,
    /// `click`
    Click,
    /// `blur`
    Blur,
    /// `focusout`
    FocusOut,
    /// `input`
    Input,
    /// `change`
    Change,
}

/// DOM interface an event is constructed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventInterface {
    /// `PointerEvent`
    Pointer,
    /// `MouseEvent`
    Mouse,
    /// `FocusEvent`
    Focus,
    /// Plain `Event`
    Event,
}

impl EventType {
    /// DOM event name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PointerOver => "pointerover",
            Self::PointerEnter => "pointerenter",
            Self::MouseOver => "mouseover",
            Self::MouseEnter => "mouseenter",
            Self::PointerMove => "pointermove",
            Self::MouseMove => "mousemove",
            Self::PointerDown => "pointerdown",
            Self::MouseDown => "mousedown",
            Self::Focus => "focus",
            Self::FocusIn => "focusin",
            Self::PointerUp => "pointerup",
            Self::MouseUp => "mouseup",
            Self::Click => "click",
            Self::Blur => "blur",
            Self::FocusOut => "focusout",
            Self::Input => "input",
            Self::Change => "change",
        }
    }

    /// Whether the event propagates to ancestors
    #[must_use]
    pub const fn bubbles(self) -> bool {
        !matches!(
            self,
            Self::PointerEnter | Self::MouseEnter | Self::Focus | Self::Blur
        )
    }

    /// Interface the event is created with
    #[must_use]
    pub const fn interface(self) -> EventInterface {
        match self {
            Self::PointerOver
            | Self::PointerEnter
            | Self::PointerMove
            | Self::PointerDown
            | Self::PointerUp => EventInterface::Pointer,
            Self::MouseOver
            | Self::MouseEnter
            | Self::MouseMove
            | Self::MouseDown
            | Self::MouseUp
            | Self::Click => EventInterface::Mouse,
            Self::Focus | Self::FocusIn | Self::Blur | Self::FocusOut => EventInterface::Focus,
            Self::Input | Self::Change => EventInterface::Event,
        }
    }

    /// Whether the event reports a state mutation of a form control
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        matches!(self, Self::Input | Self::Change)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mouse button as reported in `MouseEvent.button`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseButton {
    /// Primary button (0)
    #[default]
    Left,
    /// Auxiliary button (1)
    Middle,
    /// Secondary button (2)
    Right,
}

impl MouseButton {
    /// `MouseEvent.button` index
    #[must_use]
    pub const fn index(self) -> i16 {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
        }
    }

    /// Bit in `MouseEvent.buttons`
    #[must_use]
    pub const fn mask(self) -> u16 {
        match self {
            Self::Left => 1,
            Self::Right => 2,
            Self::Middle => 4,
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Left => "Left",
            Self::Middle => "Middle",
            Self::Right => "Right",
        };
        write!(f, "{label} ({})", self.index())
    }
}

/// Modifier keys held during an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Alt / Option
    pub alt: bool,
    /// Control
    pub ctrl: bool,
    /// Meta / Command
    pub meta: bool,
    /// Shift
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers held
    #[must_use]
    pub const fn none() -> Self {
        Self {
            alt: false,
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    /// Hold shift
    #[must_use]
    pub const fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Hold control
    #[must_use]
    pub const fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Hold alt
    #[must_use]
    pub const fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Hold meta
    #[must_use]
    pub const fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }
}

/// Fields shared by `MouseEvent` and `PointerEvent`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MousePayload {
    /// Button that changed state
    pub button: MouseButton,
    /// Bitmask of pressed buttons after the event
    pub buttons: u16,
    /// Viewport coordinates
    pub client: Point,
    /// Click count (`UIEvent.detail`)
    pub detail: u32,
    /// Modifier keys
    pub modifiers: Modifiers,
}

/// Extra `PointerEvent` fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerPayload {
    /// Mouse-compatible fields
    pub mouse: MousePayload,
    /// Pointer identifier
    pub pointer_id: u32,
    /// Pointer kind (`mouse`, `pen`, `touch`)
    pub pointer_type: String,
    /// Whether this is the primary pointer
    pub is_primary: bool,
}

/// Event-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EventPayload {
    /// `PointerEvent` init
    Pointer(PointerPayload),
    /// `MouseEvent` init
    Mouse(MousePayload),
    /// `FocusEvent` init
    Focus {
        /// Element losing or gaining focus on the other side
        related_target: Option<NodeId>,
    },
    /// Plain `Event`
    Plain,
}

/// A single event ready for dispatch
///
/// Built, handed to [`Document::dispatch_event`](crate::document::Document::dispatch_event),
/// then dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDescriptor {
    /// Event type
    pub event_type: EventType,
    /// Dispatch target
    pub target: NodeId,
    /// Whether ancestors observe the event
    pub bubbles: bool,
    /// Event-specific fields
    pub payload: EventPayload,
}

impl EventDescriptor {
    /// Plain event with default bubbling for its type
    #[must_use]
    pub const fn plain(event_type: EventType, target: NodeId) -> Self {
        Self {
            event_type,
            target,
            bubbles: event_type.bubbles(),
            payload: EventPayload::Plain,
        }
    }

    /// Focus-family event
    #[must_use]
    pub const fn focus(event_type: EventType, target: NodeId, related_target: Option<NodeId>) -> Self {
        Self {
            event_type,
            target,
            bubbles: event_type.bubbles(),
            payload: EventPayload::Focus { related_target },
        }
    }

    /// Mouse-family event
    #[must_use]
    pub const fn mouse(event_type: EventType, target: NodeId, mouse: MousePayload) -> Self {
        Self {
            event_type,
            target,
            bubbles: event_type.bubbles(),
            payload: EventPayload::Mouse(mouse),
        }
    }

    /// Pointer-family event
    #[must_use]
    pub fn pointer(event_type: EventType, target: NodeId, pointer: PointerPayload) -> Self {
        Self {
            event_type,
            target,
            bubbles: event_type.bubbles(),
            payload: EventPayload::Pointer(pointer),
        }
    }

    /// DOM event name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.event_type.name()
    }

    /// Mouse fields, for both mouse and pointer events
    #[must_use]
    pub const fn mouse_payload(&self) -> Option<&MousePayload> {
        match &self.payload {
            EventPayload::Mouse(mouse) => Some(mouse),
            EventPayload::Pointer(pointer) => Some(&pointer.mouse),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_serde() {
        let json = serde_json::to_string(&EventType::PointerOver).unwrap();
        assert_eq!(json, "\"pointerover\"");
        let back: EventType = serde_json::from_str("\"focusout\"").unwrap();
        assert_eq!(back, EventType::FocusOut);
    }

    #[test]
    fn test_non_bubbling_events() {
        for ty in [
            EventType::PointerEnter,
            EventType::MouseEnter,
            EventType::Focus,
            EventType::Blur,
        ] {
            assert!(!ty.bubbles(), "{ty} should not bubble");
        }
        for ty in [
            EventType::FocusIn,
            EventType::FocusOut,
            EventType::Click,
            EventType::Input,
            EventType::Change,
        ] {
            assert!(ty.bubbles(), "{ty} should bubble");
        }
    }

    #[test]
    fn test_interfaces() {
        assert_eq!(EventType::PointerDown.interface(), EventInterface::Pointer);
        assert_eq!(EventType::Click.interface(), EventInterface::Mouse);
        assert_eq!(EventType::FocusIn.interface(), EventInterface::Focus);
        assert_eq!(EventType::Change.interface(), EventInterface::Event);
        assert!(EventType::Input.is_mutation());
        assert!(!EventType::Click.is_mutation());
    }

    #[test]
    fn test_mouse_button_display() {
        assert_eq!(MouseButton::Left.to_string(), "Left (0)");
        assert_eq!(MouseButton::Right.mask(), 2);
    }

    #[test]
    fn test_modifiers_builder() {
        let mods = Modifiers::none().with_shift().with_meta();
        assert!(mods.shift && mods.meta);
        assert!(!mods.ctrl && !mods.alt);
    }

    #[test]
    fn test_descriptor_bubbles_from_type() {
        let ev = EventDescriptor::plain(EventType::Change, NodeId(1));
        assert!(ev.bubbles);
        assert!(ev.mouse_payload().is_none());
        let ev = EventDescriptor::focus(EventType::Focus, NodeId(1), None);
        assert!(!ev.bubbles);
    }
}
